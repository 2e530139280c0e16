use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Opens a new transaction on top of the current one. Transactions nest without limit.
#[derive(Debug, PartialEq)]
pub struct Begin;

impl Executable for Begin {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        store.begin();

        Ok(Frame::Empty)
    }
}

impl TryFrom<&mut CommandParser> for Begin {
    type Error = CommandParserError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Closes every open transaction, keeping the changes they made.
#[derive(Debug, PartialEq)]
pub struct Commit;

impl Executable for Commit {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        match store.commit() {
            Ok(()) => Ok(Frame::Empty),
            Err(err) => Ok(Frame::Error(err.to_string())),
        }
    }
}

impl TryFrom<&mut CommandParser> for Commit {
    type Error = CommandParserError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Ends the session. Nothing is written back and no further input is read.
#[derive(Debug, PartialEq)]
pub struct End;

impl Executable for End {
    fn exec(self, _store: &mut Store) -> Result<Frame, Error> {
        Ok(Frame::Empty)
    }
}

impl TryFrom<&mut CommandParser> for End {
    type Error = CommandParserError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}

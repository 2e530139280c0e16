use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Discards the innermost open transaction.
#[derive(Debug, PartialEq)]
pub struct Rollback;

impl Executable for Rollback {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        match store.rollback() {
            Ok(()) => Ok(Frame::Empty),
            Err(err) => Ok(Frame::Error(err.to_string())),
        }
    }
}

impl TryFrom<&mut CommandParser> for Rollback {
    type Error = CommandParserError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}

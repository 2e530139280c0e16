use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Unset `key` in the current transaction. Unsetting a key that holds no value does nothing.
#[derive(Debug, PartialEq)]
pub struct Unset {
    pub key: String,
}

impl Executable for Unset {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        store.unset(&self.key);

        Ok(Frame::Empty)
    }
}

impl TryFrom<&mut CommandParser> for Unset {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}

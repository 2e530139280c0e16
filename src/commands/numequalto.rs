use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Returns the number of keys currently holding `value`, `0` if none does.
#[derive(Debug, PartialEq)]
pub struct NumEqualTo {
    pub value: Bytes,
}

impl Executable for NumEqualTo {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        let count = store.num_equal_to(&self.value);

        Ok(Frame::Integer(i64::try_from(count)?))
    }
}

impl TryFrom<&mut CommandParser> for NumEqualTo {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let value = parser.next_bytes()?;
        Ok(Self { value })
    }
}

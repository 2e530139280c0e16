use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Get the value of `key` in the current transaction. If the key is not set the special value
/// `NULL` is returned.
#[derive(Debug, PartialEq)]
pub struct Get {
    pub key: String,
}

impl Executable for Get {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        let value = store.get(&self.key);

        match value {
            Some(value) => Ok(Frame::Bulk(value.clone())),
            None => Ok(Frame::Null),
        }
    }
}

impl TryFrom<&mut CommandParser> for Get {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use bytes::Bytes;

    #[test]
    fn existing_key() {
        let frame = Frame::parse(b"GET key1");
        let cmd = Command::try_from(frame).unwrap();

        assert_eq!(
            cmd,
            Command::Get(Get {
                key: String::from("key1")
            })
        );

        let mut store = Store::new();
        store.set(String::from("key1"), Bytes::from("1"));

        let result = cmd.exec(&mut store).unwrap();

        assert_eq!(result, Frame::Bulk(Bytes::from("1")));
    }

    #[test]
    fn missing_key() {
        let frame = Frame::parse(b"GET key1");
        let cmd = Command::try_from(frame).unwrap();

        let mut store = Store::new();

        let result = cmd.exec(&mut store).unwrap();

        assert_eq!(result, Frame::Null);
    }

    #[test]
    fn unset_key() {
        let mut store = Store::new();
        store.set(String::from("key1"), Bytes::from("1"));
        store.unset("key1");

        let cmd = Command::try_from(Frame::parse(b"GET key1")).unwrap();
        let result = cmd.exec(&mut store).unwrap();

        assert_eq!(result, Frame::Null);
    }
}

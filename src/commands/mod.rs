pub mod begin;
pub mod commit;
pub mod end;
pub mod executable;
pub mod get;
pub mod numequalto;
pub mod rollback;
pub mod set;
pub mod unset;

use bytes::Bytes;
use std::str::{self, FromStr};
use std::vec;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error as ThisError;

use crate::commands::executable::Executable;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

use begin::Begin;
use commit::Commit;
use end::End;
use get::Get;
use numequalto::NumEqualTo;
use rollback::Rollback;
use set::Set;
use unset::Unset;

/// The verbs understood by the protocol. Matching is exact, so `set` is not `SET`.
#[derive(Clone, Copy, Debug, Display, EnumIter, EnumString, PartialEq, Eq)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Verb {
    Begin,
    Commit,
    End,
    Get,
    #[strum(serialize = "NUMEQUALTO")]
    NumEqualTo,
    Rollback,
    Set,
    Unset,
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Get(Get),
    NumEqualTo(NumEqualTo),
    Set(Set),
    Unset(Unset),

    Begin(Begin),
    Commit(Commit),
    Rollback(Rollback),

    End(End),
}

impl Command {
    /// Whether the session should stop after this command.
    pub fn is_end(&self) -> bool {
        matches!(self, Command::End(_))
    }
}

impl Executable for Command {
    fn exec(self, store: &mut Store) -> Result<Frame, Error> {
        match self {
            Command::Begin(cmd) => cmd.exec(store),
            Command::Commit(cmd) => cmd.exec(store),
            Command::End(cmd) => cmd.exec(store),
            Command::Get(cmd) => cmd.exec(store),
            Command::NumEqualTo(cmd) => cmd.exec(store),
            Command::Rollback(cmd) => cmd.exec(store),
            Command::Set(cmd) => cmd.exec(store),
            Command::Unset(cmd) => cmd.exec(store),
        }
    }
}

impl TryFrom<Frame> for Command {
    type Error = CommandParserError;

    fn try_from(frame: Frame) -> Result<Self, Self::Error> {
        // Each request line reaches us as an array of words.
        let words = match frame {
            Frame::Array(words) => words,
            // The codec reports lines it refused to decode as errors.
            Frame::Error(reason) => return Err(CommandParserError::Rejected(reason)),
            frame => {
                return Err(CommandParserError::UnknownCommand {
                    command: frame.to_string(),
                })
            }
        };

        let mut parts = words.into_iter();
        let command = parse_command_name(parts.next())?;

        let parser = &mut CommandParser { command, parts };

        let cmd = match command {
            Verb::Begin => Begin::try_from(&mut *parser).map(Command::Begin),
            Verb::Commit => Commit::try_from(&mut *parser).map(Command::Commit),
            Verb::End => End::try_from(&mut *parser).map(Command::End),
            Verb::Get => Get::try_from(&mut *parser).map(Command::Get),
            Verb::NumEqualTo => NumEqualTo::try_from(&mut *parser).map(Command::NumEqualTo),
            Verb::Rollback => Rollback::try_from(&mut *parser).map(Command::Rollback),
            Verb::Set => Set::try_from(&mut *parser).map(Command::Set),
            Verb::Unset => Unset::try_from(&mut *parser).map(Command::Unset),
        }?;

        parser.finish()?;

        Ok(cmd)
    }
}

fn parse_command_name(word: Option<Bytes>) -> Result<Verb, CommandParserError> {
    let name = word
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default();

    Verb::from_str(&name).map_err(|_| CommandParserError::UnknownCommand { command: name })
}

pub struct CommandParser {
    command: Verb,
    parts: vec::IntoIter<Bytes>,
}

impl CommandParser {
    fn next_string(&mut self) -> Result<String, CommandParserError> {
        let bytes = self.next_bytes()?;

        str::from_utf8(&bytes[..])
            .map(|s| s.to_string())
            .map_err(CommandParserError::InvalidUTF8String)
    }

    fn next_bytes(&mut self) -> Result<Bytes, CommandParserError> {
        self.parts.next().ok_or(CommandParserError::WrongArity {
            command: self.command,
        })
    }

    /// Fails if the command was given more arguments than it takes.
    fn finish(&mut self) -> Result<(), CommandParserError> {
        match self.parts.next() {
            Some(_) => Err(CommandParserError::WrongArity {
                command: self.command,
            }),
            None => Ok(()),
        }
    }
}

/// Problems with a request line. None of them end the session: each one is sent back to the
/// client as a reply.
#[derive(Debug, ThisError, PartialEq)]
pub enum CommandParserError {
    #[error("Invalid command. Try again.")]
    UnknownCommand { command: String },
    #[error("ERR wrong number of arguments for '{command}' command")]
    WrongArity { command: Verb },
    #[error("ERR invalid UTF-8 in key")]
    InvalidUTF8String(#[from] str::Utf8Error),
    #[error("{0}")]
    Rejected(String),
}

impl From<CommandParserError> for Frame {
    fn from(err: CommandParserError) -> Self {
        match &err {
            CommandParserError::UnknownCommand { .. } => Frame::Simple(err.to_string()),
            _ => Frame::Error(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn line(line: &str) -> Frame {
        Frame::parse(line.as_bytes())
    }

    #[test]
    fn every_verb_parses_from_its_name() {
        for verb in Verb::iter() {
            assert_eq!(Verb::from_str(&verb.to_string()), Ok(verb));
        }

        assert_eq!(Verb::NumEqualTo.to_string(), "NUMEQUALTO");
    }

    #[test]
    fn parse_set_command() {
        let cmd = Command::try_from(line("SET foo baz")).unwrap();

        assert_eq!(
            cmd,
            Command::Set(Set {
                key: String::from("foo"),
                value: Bytes::from("baz")
            })
        );
    }

    #[test]
    fn unknown_command() {
        let err = Command::try_from(line("FLUSHALL")).unwrap_err();

        assert_eq!(
            err,
            CommandParserError::UnknownCommand {
                command: String::from("FLUSHALL")
            }
        );
        assert_eq!(
            Frame::from(err),
            Frame::Simple(String::from("Invalid command. Try again."))
        );
    }

    #[test]
    fn verbs_are_case_sensitive() {
        let err = Command::try_from(line("get a")).unwrap_err();

        assert_eq!(
            err,
            CommandParserError::UnknownCommand {
                command: String::from("get")
            }
        );
    }

    #[test]
    fn empty_line_is_unknown_command() {
        let err = Command::try_from(line("")).unwrap_err();

        assert_eq!(
            err,
            CommandParserError::UnknownCommand {
                command: String::new()
            }
        );
    }

    #[test]
    fn missing_argument() {
        let err = Command::try_from(line("SET a")).unwrap_err();

        assert_eq!(err, CommandParserError::WrongArity { command: Verb::Set });
        assert_eq!(
            Frame::from(err),
            Frame::Error(String::from(
                "ERR wrong number of arguments for 'SET' command"
            ))
        );
    }

    #[test]
    fn extra_argument() {
        let err = Command::try_from(line("BEGIN now")).unwrap_err();

        assert_eq!(
            err,
            CommandParserError::WrongArity {
                command: Verb::Begin
            }
        );
    }

    #[test]
    fn invalid_utf8_key() {
        let frame = Frame::Array(vec![Bytes::from("GET"), Bytes::from(vec![0xff, 0xfe])]);

        let err = Command::try_from(frame).unwrap_err();

        assert!(matches!(err, CommandParserError::InvalidUTF8String(_)));
    }

    #[test]
    fn rejected_line() {
        let frame = Frame::Error(String::from("ERR line exceeds 8 bytes"));

        let err = Command::try_from(frame).unwrap_err();

        assert_eq!(
            Frame::from(err),
            Frame::Error(String::from("ERR line exceeds 8 bytes"))
        );
    }
}

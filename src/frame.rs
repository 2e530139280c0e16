use bytes::Bytes;
use std::fmt;

static LF: &[u8; 1] = b"\n";
static NULL: &[u8; 4] = b"NULL";

/// A unit of the line protocol. Requests arrive as an `Array` holding one token per
/// space-separated word. Replies are written as a single line each, except `Empty`, which writes
/// nothing at all.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Bytes),
    Null,
    Empty,
    Array(Vec<Bytes>),
}

impl Frame {
    /// Splits a request line into its tokens. Leading and trailing whitespace is ignored, words
    /// are separated by single spaces.
    pub fn parse(line: &[u8]) -> Self {
        let line = trim(line);

        let tokens = line
            .split(|byte| *byte == b' ')
            .map(Bytes::copy_from_slice)
            .collect();

        Frame::Array(tokens)
    }

    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Frame::Simple(s) | Frame::Error(s) => {
                let mut bytes = Vec::with_capacity(s.len() + LF.len());
                bytes.extend_from_slice(s.as_bytes());
                bytes.extend_from_slice(LF);
                bytes
            }
            Frame::Integer(i) => {
                let i = i.to_string();
                let mut bytes = Vec::with_capacity(i.len() + LF.len());
                bytes.extend_from_slice(i.as_bytes());
                bytes.extend_from_slice(LF);
                bytes
            }
            Frame::Bulk(data) => {
                let mut bytes = Vec::with_capacity(data.len() + LF.len());
                bytes.extend_from_slice(data);
                bytes.extend_from_slice(LF);
                bytes
            }
            Frame::Null => {
                let mut bytes = Vec::with_capacity(NULL.len() + LF.len());
                bytes.extend_from_slice(NULL);
                bytes.extend_from_slice(LF);
                bytes
            }
            // Requests are never written back.
            Frame::Empty | Frame::Array(_) => vec![],
        }
    }
}

fn trim(line: &[u8]) -> &[u8] {
    let start = line
        .iter()
        .position(|byte| !byte.is_ascii_whitespace())
        .unwrap_or(line.len());
    let end = line
        .iter()
        .rposition(|byte| !byte.is_ascii_whitespace())
        .map_or(start, |index| index + 1);

    &line[start..end]
}

impl From<Frame> for Vec<u8> {
    fn from(frame: Frame) -> Self {
        frame.serialize()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Simple(s) => write!(f, "{}", s),
            Frame::Error(s) => write!(f, "(error) {}", s),
            Frame::Integer(i) => write!(f, "(integer) {}", i),
            Frame::Bulk(bytes) => write!(f, "\"{}\"", String::from_utf8_lossy(bytes)),
            Frame::Null => write!(f, "(nil)"),
            Frame::Empty => write!(f, "(empty)"),
            Frame::Array(arr) => {
                write!(f, "[")?;
                for (i, token) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "\"{}\"", String::from_utf8_lossy(token))?;
                }
                write!(f, "]")
            }
        }
    }
}

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::frame::Frame;
use crate::Error;

pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;

/// Splits the incoming byte stream into one request frame per line and writes replies back as
/// text lines.
pub struct FrameCodec {
    max_line_length: usize,
    // Set while skipping the remainder of a line that was already reported as too long.
    discarding: bool,
}

impl FrameCodec {
    pub fn new(max_line_length: usize) -> Self {
        Self {
            max_line_length,
            discarding: false,
        }
    }

    /// Length of the line ending at the newline found at `index`, not counting a trailing `\r`.
    fn line_length(src: &BytesMut, index: usize) -> usize {
        if index > 0 && src[index - 1] == b'\r' {
            index - 1
        } else {
            index
        }
    }

    fn too_long(&self) -> Frame {
        Frame::Error(format!("ERR line exceeds {} bytes", self.max_line_length))
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_LENGTH)
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            let newline = src.iter().position(|byte| *byte == b'\n');

            match (self.discarding, newline) {
                (true, Some(index)) => {
                    src.advance(index + 1);
                    self.discarding = false;
                }
                (true, None) => {
                    src.clear();
                    return Ok(None);
                }
                (false, Some(index)) if Self::line_length(src, index) > self.max_line_length => {
                    src.advance(index + 1);
                    return Ok(Some(self.too_long()));
                }
                (false, Some(index)) => {
                    let line = src.split_to(index + 1);
                    // `Frame::parse` trims the trailing `\r\n`.
                    return Ok(Some(Frame::parse(&line)));
                }
                // One extra byte leaves room for a `\r` still waiting for its `\n`.
                (false, None) if src.len() > self.max_line_length.saturating_add(1) => {
                    src.clear();
                    self.discarding = true;
                    return Ok(Some(self.too_long()));
                }
                (false, None) => {
                    // Not enough data to form a line, reserve room for the rest of it.
                    src.reserve(self.max_line_length.min(4096));
                    return Ok(None);
                }
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }

        if src.is_empty() || self.discarding {
            src.clear();
            return Ok(None);
        }

        // The input ended without a trailing newline.
        let line = src.split();
        Ok(Some(Frame::parse(&line)))
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = Error;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let bytes = frame.serialize();
        dst.reserve(bytes.len());
        dst.put_slice(&bytes);
        Ok(())
    }
}

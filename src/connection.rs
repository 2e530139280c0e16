use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};
use uuid::Uuid;

use crate::codec::FrameCodec;
use crate::frame::Frame;
use crate::Error;

/// A command stream: request lines are decoded from `reader` and replies are encoded onto
/// `writer`. Works the same over a TCP socket's halves or over stdin and stdout.
pub struct Connection<R, W> {
    pub id: Uuid,
    reader: FramedRead<R, FrameCodec>,
    writer: FramedWrite<W, FrameCodec>,
}

impl<R, W> Connection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_codec(reader, writer, FrameCodec::default)
    }

    pub fn with_max_line_length(reader: R, writer: W, max_line_length: usize) -> Self {
        Self::with_codec(reader, writer, || FrameCodec::new(max_line_length))
    }

    fn with_codec(reader: R, writer: W, codec: impl Fn() -> FrameCodec) -> Self {
        Self {
            id: Uuid::new_v4(),
            reader: FramedRead::new(reader, codec()),
            writer: FramedWrite::new(writer, codec()),
        }
    }

    /// Reads the next request frame, `None` once the input is exhausted.
    pub async fn read_frame(&mut self) -> Result<Option<Frame>, Error> {
        self.reader.next().await.transpose()
    }

    /// Writes and flushes a reply. Frames that carry no output are skipped.
    pub async fn write_frame(&mut self, frame: Frame) -> Result<(), Error> {
        if frame == Frame::Empty {
            return Ok(());
        }

        self.writer.send(frame).await
    }

    pub fn into_writer(self) -> W {
        self.writer.into_inner()
    }
}

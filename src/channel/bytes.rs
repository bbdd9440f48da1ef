//! Reader adapter over an async byte stream.

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::{ReadResult, Reader, StreamError, Utf8Decoder};

/// Size of the scratch buffer used for each OS read.
pub const READ_BUFFER_SIZE: usize = 8192;

/// Turns any [`AsyncRead`] into a [`Reader`] of text chunks.
///
/// Bytes are decoded with [`Utf8Decoder`], so a code point split across
/// two OS reads is delivered whole in the later chunk.
#[derive(Debug)]
pub struct ByteReader<R> {
    inner: R,
    decoder: Utf8Decoder,
    buf: Vec<u8>,
    done: bool,
}

impl<R> ByteReader<R> {
    /// Wrap `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            decoder: Utf8Decoder::new(),
            buf: vec![0; READ_BUFFER_SIZE],
            done: false,
        }
    }
}

#[async_trait]
impl<R> Reader for ByteReader<R>
where
    R: AsyncRead + Unpin + Send,
{
    async fn read(&mut self) -> Result<ReadResult, StreamError> {
        if self.done {
            return Ok(ReadResult::Done);
        }
        loop {
            let n = self.inner.read(&mut self.buf).await?;
            if n == 0 {
                self.done = true;
                let tail = self.decoder.finish();
                return Ok(if tail.is_empty() {
                    ReadResult::Done
                } else {
                    ReadResult::Chunk(tail)
                });
            }
            let text = self.decoder.decode(&self.buf[..n]);
            if !text.is_empty() {
                return Ok(ReadResult::Chunk(text));
            }
        }
    }
}

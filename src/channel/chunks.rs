//! In-memory reader over a fixed list of chunks.

use std::collections::VecDeque;

use async_trait::async_trait;

use super::{ReadResult, Reader, StreamError};

/// Yields preset chunks in order, then [`ReadResult::Done`].
///
/// Empty chunks are dropped so the reader contract (no empty chunks) holds.
#[derive(Debug, Clone, Default)]
pub struct ChunkReader {
    chunks: VecDeque<String>,
}

impl ChunkReader {
    /// Create a reader over the given chunks.
    pub fn new<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chunks: chunks
                .into_iter()
                .map(Into::into)
                .filter(|c: &String| !c.is_empty())
                .collect(),
        }
    }

    /// Deliver `text` as a single chunk.
    #[must_use]
    pub fn whole(text: &str) -> Self {
        Self::new([text])
    }

    /// Deliver `text` one character at a time.
    #[must_use]
    pub fn by_char(text: &str) -> Self {
        Self::new(text.chars().map(String::from))
    }

    /// Number of chunks not yet read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.chunks.len()
    }
}

#[async_trait]
impl Reader for ChunkReader {
    async fn read(&mut self) -> Result<ReadResult, StreamError> {
        Ok(self
            .chunks
            .pop_front()
            .map_or(ReadResult::Done, ReadResult::Chunk))
    }
}

//! Async handoff primitives for streamed text.
//!
//! Everything downstream of the generator process speaks in terms of the
//! [`Reader`] and [`Writer`] traits defined here. A reader yields non-empty
//! text chunks followed by [`ReadResult::Done`]; a writer accepts chunks until
//! the consumer answers with [`Cancelled`].

mod bytes;
mod chunks;
mod completer;
mod error;
mod pipe;
mod utf8;

use async_trait::async_trait;

pub use bytes::*;
pub use chunks::*;
pub use completer::*;
pub use error::*;
pub use pipe::*;
pub use utf8::*;

/// A unit of streamed text, or the end-of-stream sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadResult {
    /// A non-empty piece of text.
    Chunk(String),
    /// The source is exhausted. Every later read returns `Done` again.
    Done,
}

impl ReadResult {
    /// Returns true for the end-of-stream sentinel.
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Pull-based text source.
///
/// Taking `&mut self` keeps at most one read in flight per instance.
#[async_trait]
pub trait Reader: Send {
    /// Wait for the next chunk, or [`ReadResult::Done`] at end of stream.
    async fn read(&mut self) -> Result<ReadResult, StreamError>;
}

/// Push-based text sink.
#[async_trait]
pub trait Writer: Send {
    /// Send `data` downstream.
    ///
    /// Returns `Err(Cancelled)` when the destination no longer accepts data;
    /// the caller should stop sending and may assume cleanup happens.
    async fn write(&mut self, data: &str) -> Result<(), Cancelled>;
}

/// A [`Writer`] that can signal end of stream.
#[async_trait]
pub trait WriteCloser: Writer {
    /// Signal that no more data follows.
    async fn close(&mut self) -> Result<(), Cancelled>;
}

//! Channel error types.

/// Errors raised by a [`Reader`](super::Reader) source.
#[derive(thiserror::Error, Debug)]
pub enum StreamError {
    /// The underlying OS stream faulted.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The writing half went away without sending end of stream.
    #[error("Writer dropped without closing the stream")]
    WriterDropped,
}

/// Cooperative stop signal: the consumer declined further data.
///
/// This is not a fault and should not be reported as one.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Consumer stopped accepting data")]
pub struct Cancelled;

/// A [`Completer`](super::Completer) was dropped before it produced a value.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Completer dropped without a value")]
pub struct Abandoned;

/// Failure while forwarding text from a reader to a writer.
#[derive(thiserror::Error, Debug)]
pub enum CopyError {
    /// The writer stopped accepting data.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    /// The reader failed.
    #[error(transparent)]
    Stream(#[from] StreamError),
}

//! Unbuffered rendezvous pipe.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use super::{Cancelled, ReadResult, Reader, StreamError, WriteCloser, Writer};

/// A value in transit plus the acknowledgement the reader sends on receipt.
type Handoff = (ReadResult, oneshot::Sender<()>);

/// Create a connected reader/writer pair with zero buffering.
///
/// Each `write` (and the final `close`) resolves only once the reader has
/// taken the value. Values arrive in the order they were written.
#[must_use]
pub fn pipe() -> (PipeReader, PipeWriter) {
    let (tx, rx) = mpsc::channel(1);
    (
        PipeReader { rx, done: false },
        PipeWriter { tx, closed: false },
    )
}

/// Reading half of [`pipe`].
#[derive(Debug)]
pub struct PipeReader {
    rx: mpsc::Receiver<Handoff>,
    done: bool,
}

impl PipeReader {
    /// Stop reading. Pending and future writes fail with [`Cancelled`].
    pub fn cancel(&mut self) {
        self.rx.close();
        // Dropping queued handoffs releases any writer waiting on its ack.
        while self.rx.try_recv().is_ok() {}
        self.done = true;
    }
}

#[async_trait]
impl Reader for PipeReader {
    async fn read(&mut self) -> Result<ReadResult, StreamError> {
        if self.done {
            return Ok(ReadResult::Done);
        }
        match self.rx.recv().await {
            Some((item, ack)) => {
                let _ = ack.send(());
                if item.is_done() {
                    self.done = true;
                }
                Ok(item)
            }
            None => {
                self.done = true;
                Err(StreamError::WriterDropped)
            }
        }
    }
}

/// Writing half of [`pipe`].
#[derive(Debug)]
pub struct PipeWriter {
    tx: mpsc::Sender<Handoff>,
    closed: bool,
}

impl PipeWriter {
    async fn hand_off(&mut self, item: ReadResult) -> Result<(), Cancelled> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx.send((item, ack_tx)).await.map_err(|_| Cancelled)?;
        ack_rx.await.map_err(|_| Cancelled)
    }
}

#[async_trait]
impl Writer for PipeWriter {
    async fn write(&mut self, data: &str) -> Result<(), Cancelled> {
        assert!(!self.closed, "write on a closed rendezvous pipe");
        if data.is_empty() {
            return Ok(());
        }
        self.hand_off(ReadResult::Chunk(data.to_string())).await
    }
}

#[async_trait]
impl WriteCloser for PipeWriter {
    async fn close(&mut self) -> Result<(), Cancelled> {
        assert!(!self.closed, "rendezvous pipe closed twice");
        self.closed = true;
        self.hand_off(ReadResult::Done).await
    }
}

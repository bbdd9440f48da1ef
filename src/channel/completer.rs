//! Single-shot value cell bridging callbacks into awaitable results.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use super::Abandoned;

/// Create a connected [`Completer`] / [`Completion`] pair.
#[must_use]
pub fn completer<T>() -> (Completer<T>, Completion<T>) {
    let (tx, rx) = oneshot::channel();
    (Completer { tx: Some(tx) }, Completion { rx })
}

/// The producing side: completed at most once.
#[derive(Debug)]
pub struct Completer<T> {
    tx: Option<oneshot::Sender<T>>,
}

impl<T> Completer<T> {
    /// Deliver `value`.
    ///
    /// Returns false when already completed or when nobody is waiting.
    pub fn complete(&mut self, value: T) -> bool {
        match self.tx.take() {
            Some(tx) => tx.send(value).is_ok(),
            None => false,
        }
    }

    /// Whether `complete` has been called.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.tx.is_none()
    }
}

/// The awaiting side. Resolves to [`Abandoned`] if the completer is dropped
/// without a value.
#[derive(Debug)]
pub struct Completion<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> Completion<T> {
    /// Take the value if it has already been delivered, without waiting.
    pub fn try_take(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}

impl<T> Future for Completion<T> {
    type Output = Result<T, Abandoned>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map_err(|_| Abandoned)
    }
}

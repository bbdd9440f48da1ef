//! Sink contract for parsed cells.

use async_trait::async_trait;

use crate::channel::{Cancelled, WriteCloser};

/// Destination for a stream of cells.
///
/// The parser calls `start_*` before writing a cell's text with
/// [`Writer::write`](crate::channel::Writer::write), and calls
/// [`WriteCloser::close`] once at the end of the session. Any method may
/// answer `Err(Cancelled)` to stop the session; no further calls follow.
#[async_trait]
pub trait CellWriter: WriteCloser {
    /// Begin a code cell. `language` is the header type name or the info
    /// string of a fenced block, possibly empty.
    async fn start_code_cell(&mut self, language: &str) -> Result<(), Cancelled>;

    /// Begin a markdown cell.
    async fn start_markdown_cell(&mut self) -> Result<(), Cancelled>;
}

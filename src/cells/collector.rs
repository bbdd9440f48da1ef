//! In-memory sink that gathers cells.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::CellWriter;
use crate::channel::{Cancelled, WriteCloser, Writer};

/// Whether a cell holds prose or code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Markdown,
    Code,
}

/// A finished cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub kind: CellKind,
    /// Language of a code cell; `None` for markdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub text: String,
}

impl Cell {
    /// A markdown cell with `text`.
    #[must_use]
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Markdown,
            language: None,
            text: text.into(),
        }
    }

    /// A code cell in `language` with `text`.
    #[must_use]
    pub fn code(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Code,
            language: Some(language.into()),
            text: text.into(),
        }
    }
}

/// Collects everything written to it into a list of [`Cell`]s.
///
/// An optional limit cancels the session when one more cell than allowed
/// would start.
#[derive(Debug, Default)]
pub struct CellCollector {
    cells: Vec<Cell>,
    max_cells: Option<usize>,
    closed: bool,
}

impl CellCollector {
    /// Create an empty collector with no limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collector that cancels once `max_cells` cells exist.
    #[must_use]
    pub fn with_max_cells(max_cells: usize) -> Self {
        Self {
            max_cells: Some(max_cells),
            ..Self::default()
        }
    }

    /// Cells gathered so far.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Consume the collector, returning its cells.
    #[must_use]
    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    /// Whether `close` was called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn push(&mut self, cell: Cell) -> Result<(), Cancelled> {
        if self.closed || self.max_cells.is_some_and(|max| self.cells.len() >= max) {
            return Err(Cancelled);
        }
        self.cells.push(cell);
        Ok(())
    }
}

#[async_trait]
impl Writer for CellCollector {
    async fn write(&mut self, data: &str) -> Result<(), Cancelled> {
        if self.closed {
            return Err(Cancelled);
        }
        match self.cells.last_mut() {
            Some(cell) => cell.text.push_str(data),
            None => self.push(Cell::markdown(data))?,
        }
        Ok(())
    }
}

#[async_trait]
impl WriteCloser for CellCollector {
    async fn close(&mut self) -> Result<(), Cancelled> {
        self.closed = true;
        Ok(())
    }
}

#[async_trait]
impl CellWriter for CellCollector {
    async fn start_code_cell(&mut self, language: &str) -> Result<(), Cancelled> {
        self.push(Cell::code(language, ""))
    }

    async fn start_markdown_cell(&mut self) -> Result<(), Cancelled> {
        self.push(Cell::markdown(""))
    }
}

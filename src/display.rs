//! Colored terminal output for parsed cells.
//!
//! [`TerminalSink`] is a [`CellWriter`] that prints each cell as it streams
//! in. Pretty mode labels cells with colored headers. Raw mode prints the
//! wire format the generator itself speaks, so parsing the output again
//! yields the same cells: `%type` header lines for known cell types and
//! closed fences for any other code language.

use std::io::{self, Write};

use async_trait::async_trait;
use owo_colors::OwoColorize;

use crate::cells::{CellType, CellWriter};
use crate::channel::{Cancelled, WriteCloser, Writer};

const FENCE: &str = "```";

/// Streams cells to a terminal or any other byte sink.
#[derive(Debug)]
pub struct TerminalSink<W> {
    out: W,
    raw_mode: bool,
    at_line_start: bool,
    cells: usize,
    /// Raw mode: the current cell was opened with a fence.
    open_fence: bool,
    /// Raw mode: the current cell was opened with a code header.
    in_code_header: bool,
}

impl TerminalSink<io::Stdout> {
    /// Print to stdout.
    #[must_use]
    pub fn stdout(raw_mode: bool) -> Self {
        Self::new(io::stdout(), raw_mode)
    }
}

impl<W: Write + Send> TerminalSink<W> {
    #[must_use]
    pub fn new(out: W, raw_mode: bool) -> Self {
        Self {
            out,
            raw_mode,
            at_line_start: true,
            cells: 0,
            open_fence: false,
            in_code_header: false,
        }
    }

    /// Number of cells started so far.
    #[must_use]
    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Consume the sink, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) -> Result<(), Cancelled> {
        self.out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|e| {
                // A closed pipe means the reader went away, e.g. `| head`.
                if e.kind() == io::ErrorKind::BrokenPipe {
                    tracing::debug!("Output closed by reader");
                } else {
                    tracing::warn!(error = %e, "Failed to write output");
                }
                Cancelled
            })?;
        if let Some(last) = text.chars().last() {
            self.at_line_start = last == '\n';
        }
        Ok(())
    }

    /// End the current line, and the current fence in raw mode.
    fn finish_cell(&mut self) -> Result<(), Cancelled> {
        if !self.at_line_start {
            self.emit("\n")?;
        }
        if self.open_fence {
            self.open_fence = false;
            self.emit(&format!("{FENCE}\n"))?;
        }
        Ok(())
    }

    /// Print the opener of a new cell. The previous cell must be finished.
    fn start_cell(&mut self, label: &str, raw_header: &str) -> Result<(), Cancelled> {
        let header = if self.raw_mode {
            raw_header.to_string()
        } else if self.cells == 0 {
            format!("{label}\n")
        } else {
            format!("\n{label}\n")
        };
        self.cells += 1;
        self.emit(&header)
    }

    /// Raw opener for a code cell in `language`.
    fn code_header(&mut self, language: &str) -> String {
        if let Some(cell_type) = CellType::from_name(language).filter(|t| t.is_code()) {
            self.in_code_header = true;
            return cell_type.header().line.to_string();
        }
        // Fences are only recognized in markdown sections.
        let prefix = if self.in_code_header {
            CellType::Markdown.header().line
        } else {
            ""
        };
        self.in_code_header = false;
        self.open_fence = self.raw_mode;
        format!("{prefix}{FENCE}{language}\n")
    }
}

#[async_trait]
impl<W: Write + Send> Writer for TerminalSink<W> {
    async fn write(&mut self, data: &str) -> Result<(), Cancelled> {
        self.emit(data)
    }
}

#[async_trait]
impl<W: Write + Send> WriteCloser for TerminalSink<W> {
    async fn close(&mut self) -> Result<(), Cancelled> {
        self.finish_cell()
    }
}

#[async_trait]
impl<W: Write + Send> CellWriter for TerminalSink<W> {
    async fn start_code_cell(&mut self, language: &str) -> Result<(), Cancelled> {
        let name = if language.is_empty() { "code" } else { language };
        let label = format!("[{}]", name.to_uppercase());
        let label = label.cyan().bold().to_string();
        self.finish_cell()?;
        let header = self.code_header(language);
        self.start_cell(&label, &header)
    }

    async fn start_markdown_cell(&mut self) -> Result<(), Cancelled> {
        let label = "[MARKDOWN]".blue().bold().to_string();
        self.finish_cell()?;
        self.in_code_header = false;
        self.start_cell(&label, CellType::Markdown.header().line)
    }
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), message);
}

/// Print the result of a generator probe.
pub fn print_probe(command: &str, version: Option<&str>) {
    match version {
        Some(version) => println!(
            "{} {} - {}",
            "[PROBE]".magenta().bold(),
            command.cyan(),
            version.green()
        ),
        None => println!(
            "{} {} - {}",
            "[PROBE]".magenta().bold(),
            command.cyan(),
            "failed".red()
        ),
    }
    let _ = io::stdout().flush();
}

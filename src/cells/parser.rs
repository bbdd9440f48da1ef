//! Streaming cell splitter for generator output.
//!
//! The generator writes prose, `%<type>\n` header markers and fenced code
//! blocks. [`BotResponse`] reclassifies that flat text into cell starts and
//! cell text on a [`CellWriter`] while the text is still arriving. Every
//! decision depends only on content, never on where chunk boundaries fall,
//! so any chunking of the same input produces the same cells.

use std::sync::LazyLock;

use regex::Regex;

use super::{CellType, CellWriter, HeaderLine, HEADERS};
use crate::channel::{Cancelled, CopyError, Reader, StreamError};
use crate::scanner::{Scanner, HORIZONTAL_SPACE, LABEL};

/// Speaker cue added to prose that does not start with one.
pub const DEFAULT_CUE: &str = "bot";

/// Text of the cell emitted when the generator produced no cells at all.
pub const NO_RESPONSE: &str = "(no response)";

const FENCE: &str = "```";

static FENCE_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^```([A-Za-z0-9_+#.\-]*)[ \t]*\r?\n$").expect("fence open pattern is valid")
});

static FENCE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```\s*$").expect("fence close pattern is valid"));

static MARKER_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^%([A-Za-z]+)\r?\n").expect("marker pattern is valid"));

/// Errors that end a parse session.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    /// The sink declined further cells or text.
    #[error("Cell sink cancelled the response")]
    Cancelled,

    /// Reading the generator output failed.
    #[error("Failed to read response: {0}")]
    Stream(#[from] StreamError),
}

impl From<Cancelled> for ParseError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

impl From<CopyError> for ParseError {
    fn from(err: CopyError) -> Self {
        match err {
            CopyError::Cancelled(_) => Self::Cancelled,
            CopyError::Stream(e) => Self::Stream(e),
        }
    }
}

impl ParseError {
    /// Returns true when the sink stopped the session.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Prose. `cue` is set for the implicit leading section, where speaker
    /// cues are added; explicit `%markdown` sections are copied as-is.
    InMarkdown { cue: bool },
    InCodeCell(CellType),
    AtEnd,
}

impl State {
    fn after(header: &HeaderLine) -> Self {
        if header.cell_type.is_code() {
            Self::InCodeCell(header.cell_type)
        } else {
            Self::InMarkdown { cue: false }
        }
    }
}

/// What the next line turned out to be.
enum LineStart {
    End,
    Header(&'static HeaderLine),
    Fence(String),
    /// A line that had to be consumed to classify it but is plain text.
    Literal(String),
    Text,
}

/// One parse session over a generator response.
#[derive(Debug)]
pub struct BotResponse<R> {
    scanner: Scanner<R>,
    cue: String,
    cells: usize,
}

impl<R: Reader> BotResponse<R> {
    /// Parse `reader` using [`DEFAULT_CUE`].
    pub fn new(reader: R) -> Self {
        Self::with_cue(reader, DEFAULT_CUE)
    }

    /// Parse `reader`, adding `cue` to prose that lacks a speaker cue.
    pub fn with_cue(reader: R, cue: impl Into<String>) -> Self {
        Self {
            scanner: Scanner::new(reader),
            cue: cue.into(),
            cells: 0,
        }
    }

    /// Copy the whole response into `sink` as cells, then close the sink.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Cancelled` as soon as the sink declines a call,
    /// or `ParseError::Stream` if the reader fails.
    pub async fn copy<W>(mut self, sink: &mut W) -> Result<(), ParseError>
    where
        W: CellWriter + ?Sized,
    {
        let result = self.copy_cells(sink).await;
        match &result {
            Ok(()) => tracing::debug!(cells = self.cells, "Response copied"),
            Err(ParseError::Cancelled) => {
                tracing::debug!(cells = self.cells, "Sink stopped the response");
            }
            Err(e) => tracing::warn!(error = %e, cells = self.cells, "Response copy failed"),
        }
        result
    }

    async fn copy_cells<W>(&mut self, sink: &mut W) -> Result<(), ParseError>
    where
        W: CellWriter + ?Sized,
    {
        self.skip_blank_lines().await?;
        let mut state = match self.take_header().await? {
            Some(header) => State::after(header),
            None => State::InMarkdown { cue: true },
        };

        loop {
            state = match state {
                State::InMarkdown { cue } => self.copy_markdown(cue, sink).await?,
                State::InCodeCell(cell_type) => self.copy_code_cell(cell_type, sink).await?,
                State::AtEnd => break,
            };
        }

        if self.cells == 0 {
            sink.start_markdown_cell().await?;
            sink.write(&format!("{}: {NO_RESPONSE}", self.cue)).await?;
        }
        sink.close().await?;
        Ok(())
    }

    async fn skip_blank_lines(&mut self) -> Result<(), StreamError> {
        while !self.scanner.take_blank_line().await?.is_empty() {}
        Ok(())
    }

    async fn take_header(&mut self) -> Result<Option<&'static HeaderLine>, StreamError> {
        for header in HEADERS {
            if self.scanner.skip_token(header.line).await? {
                tracing::trace!(cell_type = ?header.cell_type, "Header marker");
                return Ok(Some(header));
            }
        }
        if let Some(caps) = MARKER_LIKE.captures(self.scanner.buffer()) {
            tracing::debug!(marker = &caps[1], "Unknown header marker, keeping as text");
        }
        Ok(None)
    }

    async fn classify_line(&mut self) -> Result<LineStart, StreamError> {
        if self.scanner.at_end().await? {
            return Ok(LineStart::End);
        }
        if let Some(header) = self.take_header().await? {
            return Ok(LineStart::Header(header));
        }
        if self.scanner.starts_with(FENCE).await? {
            let line = self.scanner.take_line().await?;
            return Ok(match FENCE_OPEN.captures(&line) {
                Some(caps) => LineStart::Fence(caps[1].to_string()),
                None => LineStart::Literal(line),
            });
        }
        Ok(LineStart::Text)
    }

    async fn copy_markdown<W>(&mut self, cue: bool, sink: &mut W) -> Result<State, ParseError>
    where
        W: CellWriter + ?Sized,
    {
        self.skip_blank_lines().await?;
        match self.classify_line().await? {
            LineStart::End => Ok(State::AtEnd),
            LineStart::Header(header) => Ok(State::after(header)),
            LineStart::Fence(language) => {
                self.copy_fenced(&language, sink).await?;
                Ok(State::InMarkdown { cue })
            }
            LineStart::Literal(line) => self.copy_markdown_cell(cue, Some(line), sink).await,
            LineStart::Text => self.copy_markdown_cell(cue, None, sink).await,
        }
    }

    async fn copy_markdown_cell<W>(
        &mut self,
        cue: bool,
        first_line: Option<String>,
        sink: &mut W,
    ) -> Result<State, ParseError>
    where
        W: CellWriter + ?Sized,
    {
        sink.start_markdown_cell().await?;
        self.cells += 1;

        match first_line {
            Some(line) => {
                if cue {
                    sink.write(&format!("{}: ", self.cue)).await?;
                }
                sink.write(&line).await?;
            }
            None => {
                if cue {
                    self.copy_or_add_cue(sink).await?;
                }
                self.scanner.copy_line_to(sink).await?;
            }
        }

        // Blank lines are only written once more text of this cell follows.
        let mut held = String::new();
        loop {
            let blank = self.scanner.take_blank_line().await?;
            if !blank.is_empty() {
                held.push_str(&blank);
                continue;
            }
            let next = self.classify_line().await?;
            if matches!(next, LineStart::Literal(_) | LineStart::Text) && !held.is_empty() {
                sink.write(&held).await?;
                held.clear();
            }
            match next {
                LineStart::End => return Ok(State::AtEnd),
                LineStart::Header(header) => return Ok(State::after(header)),
                LineStart::Fence(language) => {
                    self.copy_fenced(&language, sink).await?;
                    return Ok(State::InMarkdown { cue });
                }
                LineStart::Literal(line) => sink.write(&line).await?,
                LineStart::Text => self.scanner.copy_line_to(sink).await?,
            }
        }
    }

    /// Keep an existing `label: ` cue, or write the default cue in front of
    /// whatever was read while looking for one.
    async fn copy_or_add_cue<W>(&mut self, sink: &mut W) -> Result<(), ParseError>
    where
        W: CellWriter + ?Sized,
    {
        self.scanner.take_matching_prefix(HORIZONTAL_SPACE).await?;

        let mut label = String::new();
        loop {
            let run = self.scanner.take_matching_prefix(LABEL).await?;
            let emoji = self.scanner.take_emoji().await?;
            if run.is_empty() && emoji.is_empty() {
                break;
            }
            label.push_str(&run);
            label.push_str(&emoji);
        }

        if self.scanner.skip_token(": ").await? {
            sink.write(&format!("{label}: ")).await?;
        } else {
            sink.write(&format!("{}: {label}", self.cue)).await?;
        }
        Ok(())
    }

    /// Copy a fenced block body up to its closing fence. The code cell is
    /// started on the first line, so an empty block emits nothing.
    async fn copy_fenced<W>(&mut self, language: &str, sink: &mut W) -> Result<(), ParseError>
    where
        W: CellWriter + ?Sized,
    {
        let mut started = false;
        loop {
            if self.scanner.starts_with(FENCE).await? {
                let line = self.scanner.take_line().await?;
                if FENCE_CLOSE.is_match(&line) {
                    return Ok(());
                }
                self.start_code_cell(&mut started, language, sink).await?;
                sink.write(&line).await?;
                continue;
            }
            if self.scanner.at_end().await? {
                tracing::debug!(language, "Fenced block not closed before end of response");
                return Ok(());
            }
            self.start_code_cell(&mut started, language, sink).await?;
            self.scanner.copy_line_to(sink).await?;
        }
    }

    async fn start_code_cell<W>(
        &mut self,
        started: &mut bool,
        language: &str,
        sink: &mut W,
    ) -> Result<(), Cancelled>
    where
        W: CellWriter + ?Sized,
    {
        if !*started {
            sink.start_code_cell(language).await?;
            self.cells += 1;
            *started = true;
        }
        Ok(())
    }

    /// Copy a header-introduced code cell. Blank lines are dropped and the
    /// cell is only started once it has a non-blank line.
    async fn copy_code_cell<W>(
        &mut self,
        cell_type: CellType,
        sink: &mut W,
    ) -> Result<State, ParseError>
    where
        W: CellWriter + ?Sized,
    {
        let mut started = false;
        loop {
            self.skip_blank_lines().await?;
            if let Some(header) = self.take_header().await? {
                return Ok(State::after(header));
            }
            if self.scanner.at_end().await? {
                return Ok(State::AtEnd);
            }
            self.start_code_cell(&mut started, cell_type.name(), sink)
                .await?;
            self.scanner.copy_line_to(sink).await?;
        }
    }
}

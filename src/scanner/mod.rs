//! Buffered look-ahead cursor over a live [`Reader`].
//!
//! The scanner pulls only as much input as a decision needs. Callers use it
//! to decide where cells begin the moment enough text has arrived, without
//! waiting for whole lines or the whole response.

mod charset;

pub use charset::*;

use crate::channel::{CopyError, ReadResult, Reader, StreamError, Writer};

/// Bounded look-ahead parser primitives over a streaming [`Reader`].
///
/// The buffer holds text that has been read but not consumed. It is owned
/// by the scanner and never handed out mutably.
#[derive(Debug)]
pub struct Scanner<R> {
    reader: R,
    buffer: String,
    exhausted: bool,
}

impl<R: Reader> Scanner<R> {
    /// Create a scanner over `reader` with an empty buffer.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::new(),
            exhausted: false,
        }
    }

    /// Text read but not yet consumed.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Read one more chunk into the buffer.
    ///
    /// Returns false once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `StreamError` if the underlying reader fails.
    pub async fn pull(&mut self) -> Result<bool, StreamError> {
        if self.exhausted {
            return Ok(false);
        }
        match self.reader.read().await? {
            ReadResult::Chunk(chunk) => {
                tracing::trace!(len = chunk.len(), "Pulled chunk");
                self.buffer.push_str(&chunk);
                Ok(true)
            }
            ReadResult::Done => {
                tracing::trace!("Reader exhausted");
                self.exhausted = true;
                Ok(false)
            }
        }
    }

    /// Pull until at least `n` bytes are buffered.
    ///
    /// Returns false if the source ended first.
    ///
    /// # Errors
    ///
    /// Returns `StreamError` if the underlying reader fails.
    pub async fn fill_to(&mut self, n: usize) -> Result<bool, StreamError> {
        while self.buffer.len() < n {
            if !self.pull().await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// True when nothing is buffered and the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `StreamError` if the underlying reader fails.
    pub async fn at_end(&mut self) -> Result<bool, StreamError> {
        Ok(!self.fill_to(1).await?)
    }

    /// Check whether the input continues with `prefix`.
    ///
    /// Stops pulling as soon as the buffered text contradicts `prefix`.
    ///
    /// # Errors
    ///
    /// Returns `StreamError` if the underlying reader fails.
    pub async fn starts_with(&mut self, prefix: &str) -> Result<bool, StreamError> {
        loop {
            let have = self.buffer.len().min(prefix.len());
            if self.buffer.as_bytes()[..have] != prefix.as_bytes()[..have] {
                return Ok(false);
            }
            if have == prefix.len() {
                return Ok(true);
            }
            if !self.pull().await? {
                return Ok(false);
            }
        }
    }

    /// Consume `token` if the input continues with it.
    ///
    /// # Errors
    ///
    /// Returns `StreamError` if the underlying reader fails.
    pub async fn skip_token(&mut self, token: &str) -> Result<bool, StreamError> {
        if self.starts_with(token).await? {
            self.take(token.len());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Empty the buffer and return its contents. Never pulls.
    pub fn take_buffer(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    fn take(&mut self, n: usize) -> String {
        let rest = self.buffer.split_off(n);
        std::mem::replace(&mut self.buffer, rest)
    }

    /// Take buffered text up to and including the next newline.
    ///
    /// With nothing buffered, pulls once. Returns `""` only at end of stream.
    ///
    /// # Errors
    ///
    /// Returns `StreamError` if the underlying reader fails.
    pub async fn take_chunk_within_line(&mut self) -> Result<String, StreamError> {
        if self.buffer.is_empty() && !self.pull().await? {
            return Ok(String::new());
        }
        Ok(match self.buffer.find('\n') {
            Some(i) => self.take(i + 1),
            None => self.take_buffer(),
        })
    }

    /// Take the next full line including its newline.
    ///
    /// At end of stream returns the trailing partial line, or `""`.
    ///
    /// # Errors
    ///
    /// Returns `StreamError` if the underlying reader fails.
    pub async fn take_line(&mut self) -> Result<String, StreamError> {
        let mut searched = 0;
        loop {
            if let Some(i) = self.buffer[searched..].find('\n') {
                return Ok(self.take(searched + i + 1));
            }
            searched = self.buffer.len();
            if !self.pull().await? {
                return Ok(self.take_buffer());
            }
        }
    }

    /// Take the next line if it holds only horizontal whitespace.
    ///
    /// A whitespace-only tail at end of stream counts as a blank line.
    /// Returns `""` without consuming anything otherwise.
    ///
    /// # Errors
    ///
    /// Returns `StreamError` if the underlying reader fails.
    pub async fn take_blank_line(&mut self) -> Result<String, StreamError> {
        let mut end = 0;
        loop {
            if end == self.buffer.len() {
                if !self.pull().await? {
                    return Ok(self.take(end));
                }
                continue;
            }
            match self.buffer.as_bytes()[end] {
                b' ' | b'\t' | b'\r' => end += 1,
                b'\n' => return Ok(self.take(end + 1)),
                _ => return Ok(String::new()),
            }
        }
    }

    /// Consume one character from `set`, if the next one belongs to it.
    ///
    /// # Errors
    ///
    /// Returns `StreamError` if the underlying reader fails.
    pub async fn take_matching_char(&mut self, set: CharSet) -> Result<Option<char>, StreamError> {
        if !self.fill_to(1).await? {
            return Ok(None);
        }
        match self.buffer.chars().next() {
            Some(c) if set.contains(c) => {
                self.take(c.len_utf8());
                Ok(Some(c))
            }
            _ => Ok(None),
        }
    }

    /// Consume the longest run of characters drawn from `set`.
    ///
    /// # Errors
    ///
    /// Returns `StreamError` if the underlying reader fails.
    pub async fn take_matching_prefix(&mut self, set: CharSet) -> Result<String, StreamError> {
        let mut end = 0;
        loop {
            if end == self.buffer.len() && !self.pull().await? {
                break;
            }
            let Some(c) = self.buffer[end..].chars().next() else {
                continue;
            };
            if !set.contains(c) {
                break;
            }
            end += c.len_utf8();
        }
        Ok(self.take(end))
    }

    /// Consume one allow-listed cue emoji, plus a trailing variation
    /// selector if present.
    ///
    /// Does not pull when the buffered character already rules a match out.
    ///
    /// # Errors
    ///
    /// Returns `StreamError` if the underlying reader fails.
    pub async fn take_emoji(&mut self) -> Result<String, StreamError> {
        if !self.fill_to(1).await? {
            return Ok(String::new());
        }
        let Some(c) = self.buffer.chars().next() else {
            return Ok(String::new());
        };
        if !is_cue_emoji(c) {
            return Ok(String::new());
        }
        let mut end = c.len_utf8();
        if self.fill_to(end + 1).await? && self.buffer[end..].starts_with(VARIATION_SELECTOR) {
            end += VARIATION_SELECTOR.len_utf8();
        }
        Ok(self.take(end))
    }

    /// Forward the next line to `writer` chunk by chunk as it arrives.
    ///
    /// # Errors
    ///
    /// Returns `CopyError::Cancelled` if the writer declines a chunk, or
    /// `CopyError::Stream` if the reader fails.
    pub async fn copy_line_to<W>(&mut self, writer: &mut W) -> Result<(), CopyError>
    where
        W: Writer + ?Sized,
    {
        loop {
            let chunk = self.take_chunk_within_line().await?;
            if chunk.is_empty() {
                return Ok(());
            }
            writer.write(&chunk).await?;
            if chunk.ends_with('\n') {
                return Ok(());
            }
        }
    }
}

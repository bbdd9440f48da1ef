//! Subprocess error types.

use std::fmt;
use std::time::Duration;

use crate::cells::ParseError;
use crate::channel::{Cancelled, StreamError};

/// Error type for process spawning operations.
#[derive(thiserror::Error, Debug)]
pub enum SpawnError {
    /// The binary was not found.
    #[error("Command not found: {path}")]
    NotFound { path: String },
    /// Permission denied when spawning.
    #[error("Permission denied running {path}")]
    PermissionDenied { path: String },
    /// Other I/O error.
    #[error("Failed to start {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SpawnError {
    /// Create a `SpawnError` from an I/O error, classifying common cases.
    pub(crate) fn from_io(path: &str, err: std::io::Error) -> Self {
        let path = path.to_string();
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source: err },
        }
    }
}

/// The child process ended unsuccessfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildExitError {
    pub path: String,
    pub args: Vec<String>,
    /// Exit code, when the process exited normally.
    pub exit_code: Option<i32>,
    /// Terminating signal, when the process was killed (Unix only).
    pub signal: Option<i32>,
    /// Everything the process wrote to stderr.
    pub stderr: String,
}

impl fmt::Display for ChildExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.exit_code, self.signal) {
            (Some(code), _) => write!(f, "{} exited with code {code}", self.path)?,
            (None, Some(signal)) => write!(
                f,
                "{} terminated by signal {}",
                self.path,
                signal_name(signal)
            )?,
            (None, None) => write!(f, "{} terminated abnormally", self.path)?,
        }
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            write!(f, "\nstderr: {stderr}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ChildExitError {}

#[cfg(unix)]
fn signal_name(signal: i32) -> String {
    nix::sys::signal::Signal::try_from(signal)
        .map_or_else(|_| signal.to_string(), |s| s.as_str().to_string())
}

#[cfg(not(unix))]
fn signal_name(signal: i32) -> String {
    signal.to_string()
}

/// Error type for [`ChildPipe`](super::ChildPipe) sessions.
#[derive(thiserror::Error, Debug)]
pub enum PipeError {
    /// The process could not be started.
    #[error(transparent)]
    Spawn(#[from] SpawnError),

    /// The process exited with a failure after its output was consumed.
    #[error(transparent)]
    Exit(#[from] ChildExitError),

    /// The output consumer stopped the session.
    #[error("Cancelled by output consumer")]
    Cancelled,

    /// A standard stream of the process faulted.
    #[error("Process stream failed: {0}")]
    Stream(#[from] StreamError),

    /// `write` was called after the output handler finished.
    #[error("Write after output handler finished")]
    WriteAfterDone,

    /// `write` was called after stdin was closed.
    #[error("Process stdin already closed")]
    StdinClosed,

    /// A standard stream was not captured at spawn time.
    #[error("Process {0} not captured")]
    MissingStream(&'static str),

    /// Waiting for the process to exit failed.
    #[error("Failed to wait for process: {0}")]
    Wait(#[source] std::io::Error),

    /// The output handler task panicked or was aborted.
    #[error("Output handler failed: {0}")]
    HandlerPanicked(String),

    /// A bounded operation ran past its deadline.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// The command succeeded without printing anything.
    #[error("Command produced no output")]
    NoOutput,
}

impl PipeError {
    /// Returns true for a cooperative stop rather than a fault.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<Cancelled> for PipeError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

impl From<ParseError> for PipeError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Cancelled => Self::Cancelled,
            ParseError::Stream(e) => Self::Stream(e),
        }
    }
}

//! Subprocess owner wiring stdin, stdout and stderr into one session.
//!
//! A [`ChildPipe`] spawns the process immediately. Its stdout is handed to a
//! caller-supplied handler task as a [`ChildReader`]; stderr is captured in
//! the background; stdin is written through [`ChildPipe::write`]. The single
//! terminal operation, [`ChildPipe::close`], folds the handler result, the
//! exit status and any cancellation into one `Result`.

use std::future::Future;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tokio::task::JoinHandle;

use super::{ChildExitError, PipeError, SpawnError};
use crate::channel::{
    completer, ByteReader, Completer, Completion, ReadResult, Reader, StreamError,
};

/// Stdout of a [`ChildPipe`] process as a text [`Reader`].
///
/// Dropping it closes the OS stream.
#[derive(Debug)]
pub struct ChildReader {
    inner: ByteReader<ChildStdout>,
    reached_end: Completer<bool>,
}

#[async_trait]
impl Reader for ChildReader {
    async fn read(&mut self) -> Result<ReadResult, StreamError> {
        let result = self.inner.read().await;
        match &result {
            Ok(ReadResult::Done) => {
                if !self.reached_end.is_completed() {
                    self.reached_end.complete(true);
                }
            }
            Ok(ReadResult::Chunk(_)) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to read process stdout"),
        }
        result
    }
}

/// One external process, owned for its whole lifetime.
#[derive(Debug)]
pub struct ChildPipe<T> {
    path: String,
    args: Vec<String>,
    child: Child,
    stdin: Option<ChildStdin>,
    handler: JoinHandle<Result<T, PipeError>>,
    reached_end: Completion<bool>,
    stderr: Option<JoinHandle<String>>,
    killed: bool,
}

impl<T: Send + 'static> ChildPipe<T> {
    /// Spawn `path` with `args` and start `handler` on its stdout.
    ///
    /// Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `PipeError::Spawn` if the process could not be started.
    pub fn spawn<F, Fut>(
        path: impl Into<String>,
        args: Vec<String>,
        handler: F,
    ) -> Result<Self, PipeError>
    where
        F: FnOnce(ChildReader) -> Fut,
        Fut: Future<Output = Result<T, PipeError>> + Send + 'static,
    {
        let path = path.into();
        let mut cmd = Command::new(&path);
        cmd.args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| SpawnError::from_io(&path, e))?;
        tracing::debug!(path = %path, args = ?args, pid = ?child.id(), "Spawned process");

        let stdout = child
            .stdout
            .take()
            .ok_or(PipeError::MissingStream("stdout"))?;
        let stdin = child.stdin.take();
        let stderr = child
            .stderr
            .take()
            .map(|stderr| capture_stderr(stderr, path.clone()));

        let (done, reached_end) = completer();
        let reader = ChildReader {
            inner: ByteReader::new(stdout),
            reached_end: done,
        };
        let handler = tokio::spawn(handler(reader));

        Ok(Self {
            path,
            args,
            child,
            stdin,
            handler,
            reached_end,
            stderr,
            killed: false,
        })
    }

    /// Path the process was spawned from.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Arguments the process was spawned with.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Process ID, if still running.
    #[must_use]
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Send `data` to the process stdin, waiting for the pipe to drain.
    ///
    /// # Errors
    ///
    /// Returns `PipeError::WriteAfterDone` once the output handler has
    /// finished, `PipeError::StdinClosed` if stdin is gone, or
    /// `PipeError::Stream` if the write itself fails.
    pub async fn write(&mut self, data: &str) -> Result<(), PipeError> {
        if self.handler.is_finished() {
            return Err(PipeError::WriteAfterDone);
        }
        let stdin = self.stdin.as_mut().ok_or(PipeError::StdinClosed)?;
        stdin
            .write_all(data.as_bytes())
            .await
            .map_err(StreamError::from)?;
        stdin.flush().await.map_err(StreamError::from)?;
        Ok(())
    }

    /// Force-terminate the process. Safe to call more than once.
    pub fn kill(&mut self) {
        if self.killed {
            return;
        }
        self.killed = true;
        match self.child.start_kill() {
            Ok(()) => tracing::debug!(path = %self.path, "Killed process"),
            Err(e) => tracing::debug!(path = %self.path, error = %e, "Process already gone"),
        }
    }

    /// Close stdin, then wait for the handler and the process.
    ///
    /// A handler error wins over the exit status. When the handler stopped
    /// before the end of stdout its result is final and the process is
    /// killed. Otherwise a failed exit becomes `PipeError::Exit`.
    ///
    /// # Errors
    ///
    /// Returns the handler's error, `PipeError::Exit` with captured stderr,
    /// or `PipeError::Wait` if the exit status cannot be read.
    pub async fn close(mut self) -> Result<T, PipeError> {
        drop(self.stdin.take());

        let outcome = match (&mut self.handler).await {
            Ok(result) => result,
            Err(e) => Err(PipeError::HandlerPanicked(e.to_string())),
        };
        let reached_end = self.reached_end.try_take().unwrap_or(false);

        let value = match outcome {
            Err(err) => {
                if err.is_cancelled() {
                    tracing::debug!(path = %self.path, "Output consumer cancelled");
                } else {
                    tracing::warn!(path = %self.path, error = %err, "Output handler failed");
                }
                self.terminate().await;
                return Err(err);
            }
            Ok(value) if !reached_end => {
                tracing::debug!(path = %self.path, "Handler finished before end of output");
                self.terminate().await;
                return Ok(value);
            }
            Ok(value) => value,
        };

        let status = self.child.wait().await.map_err(PipeError::Wait)?;
        if status.success() {
            tracing::debug!(path = %self.path, "Process exited successfully");
            return Ok(value);
        }
        if self.killed {
            return Err(PipeError::Cancelled);
        }
        let stderr = self.collect_stderr().await;
        Err(self.exit_error(status, stderr).into())
    }

    /// Kill and reap the process after a terminal event.
    async fn terminate(&mut self) {
        self.kill();
        if let Err(e) = self.child.wait().await {
            tracing::debug!(path = %self.path, error = %e, "Failed to reap process");
        }
    }

    async fn collect_stderr(&mut self) -> String {
        match self.stderr.take() {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        }
    }

    fn exit_error(&self, status: ExitStatus, stderr: String) -> ChildExitError {
        let err = ChildExitError {
            path: self.path.clone(),
            args: self.args.clone(),
            exit_code: status.code(),
            signal: exit_signal(status),
            stderr,
        };
        tracing::warn!(path = %self.path, exit_code = ?err.exit_code, signal = ?err.signal, "Process failed");
        err
    }
}

impl<T> Drop for ChildPipe<T> {
    fn drop(&mut self) {
        self.handler.abort();
        if let Some(task) = &self.stderr {
            task.abort();
        }
        if !self.killed {
            let _ = self.child.start_kill();
        }
    }
}

#[cfg(unix)]
fn exit_signal(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: ExitStatus) -> Option<i32> {
    None
}

/// Accumulate stderr in a background task, logging each line.
fn capture_stderr(stderr: ChildStderr, path: String) -> JoinHandle<String> {
    tokio::spawn(async move {
        let mut reader = BufReader::new(stderr);
        let mut captured = String::new();
        let mut line = Vec::new();
        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line).await {
                Ok(0) => break,
                Ok(_) => {
                    let text = String::from_utf8_lossy(&line);
                    tracing::debug!(path = %path, line = %text.trim_end(), "Process stderr");
                    captured.push_str(&text);
                }
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "Failed to read process stderr");
                    break;
                }
            }
        }
        captured
    })
}

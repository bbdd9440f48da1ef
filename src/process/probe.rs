//! Check that the generator command is runnable at all.

use std::time::Duration;

use super::{ChildPipe, PipeError};
use crate::channel::{ReadResult, Reader};

/// Default deadline for [`probe_version`].
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default flag passed by [`probe_version`].
pub const DEFAULT_VERSION_FLAG: &str = "--version";

/// Run `path flag` and return the first line it prints, trimmed.
///
/// The probe succeeds as soon as that line arrives. A process that keeps
/// running afterwards is killed.
///
/// # Errors
///
/// - `PipeError::Spawn` if the command cannot be started
/// - `PipeError::Timeout` if no line arrives within `timeout`; the process
///   is killed
/// - `PipeError::Exit` if it fails without printing
/// - `PipeError::NoOutput` if it succeeds silently
pub async fn probe_version(path: &str, flag: &str, timeout: Duration) -> Result<String, PipeError> {
    let pipe = ChildPipe::spawn(path, vec![flag.to_string()], move |mut reader| async move {
        let mut output = String::new();
        while let ReadResult::Chunk(chunk) = reader.read().await? {
            output.push_str(&chunk);
            // Stop once a complete non-blank line is in.
            if output
                .rfind('\n')
                .is_some_and(|end| !output[..end].trim().is_empty())
            {
                break;
            }
        }
        Ok::<_, PipeError>(first_line(&output).to_string())
    })?;

    // Dropping the pipe on timeout kills the process.
    match tokio::time::timeout(timeout, pipe.close()).await {
        Err(_) => {
            tracing::warn!(path, flag, ?timeout, "Version probe timed out");
            Err(PipeError::Timeout(timeout))
        }
        Ok(Ok(output)) => {
            let version = output.trim();
            if version.is_empty() {
                Err(PipeError::NoOutput)
            } else {
                tracing::debug!(path, version, "Version probe succeeded");
                Ok(version.to_string())
            }
        }
        Ok(Err(e)) => Err(e),
    }
}

/// First non-blank line of `output`.
fn first_line(output: &str) -> &str {
    output
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or_default()
}

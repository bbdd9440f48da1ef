//! Run the generator and stream its response into a cell sink.

use super::{ChildPipe, GeneratorCommand, PipeError};
use crate::cells::{BotResponse, CellWriter};

/// Spawn `command`, send `prompt` on stdin and parse stdout into `sink`.
///
/// Returns the sink once the response has been copied and the process has
/// exited cleanly, even if the generator stopped reading the prompt early.
///
/// # Errors
///
/// Returns `PipeError::Cancelled` if the sink stopped the response, or any
/// spawn, stream or exit error from the process.
pub async fn stream_cells<W>(
    command: &GeneratorCommand,
    prompt: &str,
    cue: &str,
    mut sink: W,
) -> Result<W, PipeError>
where
    W: CellWriter + 'static,
{
    let cue = cue.to_string();
    let mut pipe = ChildPipe::spawn(command.path(), command.build_args(), move |reader| async move {
        BotResponse::with_cue(reader, cue).copy(&mut sink).await?;
        Ok::<_, PipeError>(sink)
    })?;

    // A generator may answer without reading the whole prompt. The outcome
    // of `close` decides the session either way.
    if let Err(e) = pipe.write(prompt).await {
        tracing::debug!(error = %e, "Failed to send prompt");
    }
    pipe.close().await
}

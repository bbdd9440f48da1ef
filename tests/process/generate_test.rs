//! End-to-end tests running a scripted generator.

use std::path::Path;

use llm_cells::cells::{Cell, CellCollector};
use llm_cells::process::{stream_cells, GeneratorCommand, PipeError};
use tempfile::TempDir;

use super::script;

fn command(path: &Path) -> GeneratorCommand {
    GeneratorCommand::new(path.to_string_lossy(), "system prompt")
}

#[tokio::test]
async fn prompt_is_answered_with_cells() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "gen", "echo 'Sure:'\nprintf '%%python\\n'\ncat\n");

    let sink = stream_cells(&command(&path), "print(2)\n", "bot", CellCollector::new())
        .await
        .unwrap();

    assert!(sink.is_closed());
    assert_eq!(
        sink.into_cells(),
        vec![
            Cell::markdown("bot: Sure:\n"),
            Cell::code("python", "print(2)\n"),
        ]
    );
}

#[tokio::test]
async fn generator_receives_built_arguments() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "args", "cat >/dev/null\nfor arg in \"$@\"; do echo \"$arg\"; done\n");

    let command = command(&path).model("tiny").extra_args(["--flag"]);
    let sink = stream_cells(&command, "hi", "me", CellCollector::new())
        .await
        .unwrap();

    assert_eq!(
        sink.into_cells(),
        vec![Cell::markdown(
            "me: --system\nsystem prompt\n--model\ntiny\n--flag\n"
        )]
    );
}

#[tokio::test]
async fn silent_generator_is_no_response() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "silent", "cat >/dev/null\n");

    let sink = stream_cells(&command(&path), "hello", "bot", CellCollector::new())
        .await
        .unwrap();
    assert_eq!(sink.into_cells(), vec![Cell::markdown("bot: (no response)")]);
}

#[tokio::test]
async fn generator_ignoring_large_prompt_still_answers() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "deaf", "echo hi\nexit 0\n");
    let prompt = "x".repeat(1024 * 1024);

    let sink = stream_cells(&command(&path), &prompt, "bot", CellCollector::new())
        .await
        .unwrap();
    assert_eq!(sink.into_cells(), vec![Cell::markdown("bot: hi\n")]);
}

#[tokio::test]
async fn failing_generator_reports_stderr() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "fail", "echo 'unknown model' >&2\nexit 2\n");

    let err = stream_cells(&command(&path), "hello", "bot", CellCollector::new())
        .await
        .unwrap_err();

    let PipeError::Exit(exit) = &err else {
        panic!("Expected exit error, got {err:?}");
    };
    assert_eq!(exit.exit_code, Some(2));
    assert_eq!(exit.stderr, "unknown model\n");
}

#[tokio::test]
async fn sink_cancellation_wins() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "chatty", "while :; do echo '%shell'; echo ls; done\n");

    let err = stream_cells(
        &command(&path),
        "",
        "bot",
        CellCollector::with_max_cells(3),
    )
    .await
    .unwrap_err();
    assert!(err.is_cancelled(), "got {err:?}");
}

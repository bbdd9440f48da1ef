//! Tests for splitting generator output into cells.

use llm_cells::cells::Cell;

use super::parse;

#[tokio::test]
async fn headers_split_cells() {
    let cells = parse("%python\nx = 1\n%shell\nls -la\n%markdown\nSee above.\n").await;

    assert_eq!(
        cells,
        vec![
            Cell::code("python", "x = 1\n"),
            Cell::code("shell", "ls -la\n"),
            Cell::markdown("See above.\n"),
        ]
    );
}

#[tokio::test]
async fn leading_blank_lines_before_header_are_skipped() {
    assert_eq!(
        parse("\n \n%typescript\nlet x = 1;\n").await,
        vec![Cell::code("typescript", "let x = 1;\n")]
    );
}

#[tokio::test]
async fn markdown_keeps_inner_blank_lines_only() {
    let cells = parse("%markdown\nOne\n\n\nTwo\n\n\n%javascript\nx()\n").await;

    assert_eq!(
        cells,
        vec![
            Cell::markdown("One\n\n\nTwo\n"),
            Cell::code("javascript", "x()\n"),
        ]
    );
}

#[tokio::test]
async fn trailing_blank_lines_are_dropped() {
    assert_eq!(parse("hello\n\n  \n").await, vec![Cell::markdown("bot: hello\n")]);
}

#[tokio::test]
async fn code_cell_with_only_blank_lines_is_not_emitted() {
    assert_eq!(
        parse("%python\n\n\n%markdown\nok").await,
        vec![Cell::markdown("ok")]
    );
}

#[tokio::test]
async fn only_empty_cells_is_no_response() {
    assert_eq!(
        parse("%python\n\n").await,
        vec![Cell::markdown("bot: (no response)")]
    );
}

#[tokio::test]
async fn fenced_block_becomes_code_cell() {
    let cells = parse("Here is code:\n```python\nprint(1)\n```\nDone.\n").await;

    assert_eq!(
        cells,
        vec![
            Cell::markdown("bot: Here is code:\n"),
            Cell::code("python", "print(1)\n"),
            Cell::markdown("bot: Done.\n"),
        ]
    );
}

#[tokio::test]
async fn fenced_block_without_language() {
    assert_eq!(parse("```\nls\n```").await, vec![Cell::code("", "ls\n")]);
}

#[tokio::test]
async fn fenced_block_is_copied_verbatim() {
    assert_eq!(
        parse("```\n%python\n\n  x\n```\n").await,
        vec![Cell::code("", "%python\n\n  x\n")]
    );
}

#[tokio::test]
async fn empty_fenced_block_is_no_response() {
    assert_eq!(
        parse("```python\n```\n").await,
        vec![Cell::markdown("bot: (no response)")]
    );
}

#[tokio::test]
async fn unclosed_fence_runs_to_end() {
    assert_eq!(
        parse("```sh\necho hi\n").await,
        vec![Cell::code("sh", "echo hi\n")]
    );
}

#[tokio::test]
async fn malformed_fence_is_text() {
    assert_eq!(
        parse("```not a fence\nhi\n").await,
        vec![Cell::markdown("bot: ```not a fence\nhi\n")]
    );
}

#[tokio::test]
async fn fence_inside_explicit_markdown_has_no_cue() {
    let cells = parse("%markdown\nRun:\n```shell\nls\n```\nthen check.\n").await;

    assert_eq!(
        cells,
        vec![
            Cell::markdown("Run:\n"),
            Cell::code("shell", "ls\n"),
            Cell::markdown("then check.\n"),
        ]
    );
}

#[tokio::test]
async fn speaker_cue_with_leading_space_is_normalized() {
    assert_eq!(parse("  alice: hi").await, vec![Cell::markdown("alice: hi")]);
}

#[tokio::test]
async fn emoji_cue_is_kept() {
    assert_eq!(
        parse("🤖\u{FE0F} bot: hi\n").await,
        vec![Cell::markdown("🤖\u{FE0F} bot: hi\n")]
    );
}

#[tokio::test]
async fn colon_without_space_is_not_a_cue() {
    assert_eq!(
        parse("Note:the end").await,
        vec![Cell::markdown("bot: Note:the end")]
    );
}

#[tokio::test]
async fn unknown_marker_is_text() {
    assert_eq!(
        parse("%python\nx\n%rust\ny\n").await,
        vec![Cell::code("python", "x\n%rust\ny\n")]
    );
}

#[tokio::test]
async fn header_without_newline_is_text() {
    assert_eq!(parse("%python").await, vec![Cell::markdown("bot: %python")]);
}

#[tokio::test]
async fn crlf_lines_pass_through() {
    assert_eq!(
        parse("hi\r\n\r\nthere\r\n").await,
        vec![Cell::markdown("bot: hi\r\n\r\nthere\r\n")]
    );
}

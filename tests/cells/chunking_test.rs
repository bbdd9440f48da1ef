//! Chunk boundaries must never change the cells produced.

use llm_cells::cells::Cell;
use llm_cells::channel::{ChunkReader, Utf8Decoder};
use proptest::prelude::*;

use super::collect;

const FRAGMENTS: &[&str] = &[
    "%python\n",
    "%markdown\n",
    "%shell\n",
    "%rust\n",
    "```python\n",
    "```\n",
    "``` x\n",
    "bot: ",
    "🤖\u{FE0F}: ",
    "Hello",
    " world",
    ":",
    "x = 1",
    "日本語",
    "\n",
    "\n\n",
    "  \n",
    "\r\n",
    "\t",
];

fn response() -> impl Strategy<Value = String> {
    prop::collection::vec(0..FRAGMENTS.len(), 0..24)
        .prop_map(|picks| picks.into_iter().map(|i| FRAGMENTS[i]).collect())
}

fn whole(text: &str) -> Vec<Cell> {
    tokio_test::block_on(collect(ChunkReader::whole(text)))
}

/// Split `text` at the given cut points, moved forward to char boundaries.
fn split_chars(text: &str, cuts: &[usize]) -> Vec<String> {
    let mut cuts: Vec<usize> = cuts
        .iter()
        .map(|&cut| {
            let mut cut = cut % (text.len() + 1);
            while !text.is_char_boundary(cut) {
                cut += 1;
            }
            cut
        })
        .collect();
    cuts.sort_unstable();

    let mut chunks = Vec::new();
    let mut start = 0;
    for cut in cuts {
        chunks.push(text[start..cut].to_string());
        start = cut;
    }
    chunks.push(text[start..].to_string());
    chunks
}

/// Split the bytes of `text` anywhere and decode them back into chunks.
fn split_bytes(text: &str, cuts: &[usize]) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut cuts: Vec<usize> = cuts.iter().map(|&cut| cut % (bytes.len() + 1)).collect();
    cuts.sort_unstable();

    let mut decoder = Utf8Decoder::new();
    let mut chunks = Vec::new();
    let mut start = 0;
    for cut in cuts {
        chunks.push(decoder.decode(&bytes[start..cut]));
        start = cut;
    }
    chunks.push(decoder.decode(&bytes[start..]));
    chunks.push(decoder.finish());
    chunks
}

proptest! {
    #[test]
    fn char_chunking_does_not_change_cells(
        text in response(),
        cuts in prop::collection::vec(any::<usize>(), 0..12),
    ) {
        let chunked = tokio_test::block_on(collect(ChunkReader::new(split_chars(&text, &cuts))));
        prop_assert_eq!(chunked, whole(&text));
    }

    #[test]
    fn byte_chunking_does_not_change_cells(
        text in response(),
        cuts in prop::collection::vec(any::<usize>(), 0..12),
    ) {
        let chunked = tokio_test::block_on(collect(ChunkReader::new(split_bytes(&text, &cuts))));
        prop_assert_eq!(chunked, whole(&text));
    }

    #[test]
    fn one_char_at_a_time_does_not_change_cells(text in response()) {
        let chunked = tokio_test::block_on(collect(ChunkReader::by_char(&text)));
        prop_assert_eq!(chunked, whole(&text));
    }

    #[test]
    fn every_response_has_a_cell(text in response()) {
        prop_assert!(!whole(&text).is_empty());
    }
}

#[test]
fn fragment_boundaries_are_not_cell_boundaries() {
    let text = "bot: Hello\n%python\nx = 1\n";
    let pieces = ["bo", "t", ": Hel", "lo\n%py", "thon", "\nx = ", "1\n"];
    let chunked = tokio_test::block_on(collect(ChunkReader::new(pieces)));

    assert_eq!(chunked, whole(text));
    assert_eq!(
        chunked,
        vec![Cell::markdown("bot: Hello\n"), Cell::code("python", "x = 1\n")]
    );
}

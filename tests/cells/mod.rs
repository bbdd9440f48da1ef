//! Cell splitting tests.

mod chunking_test;
mod parser_test;

use llm_cells::cells::{BotResponse, Cell, CellCollector};
use llm_cells::channel::ChunkReader;

/// Parse `reader` to completion and return the collected cells.
pub async fn collect(reader: ChunkReader) -> Vec<Cell> {
    let mut sink = CellCollector::new();
    BotResponse::new(reader)
        .copy(&mut sink)
        .await
        .expect("in-memory parse cannot fail");
    assert!(sink.is_closed(), "parser must close the sink");
    sink.into_cells()
}

/// Parse `text` delivered as a single chunk.
pub async fn parse(text: &str) -> Vec<Cell> {
    collect(ChunkReader::whole(text)).await
}

//! Tests wiring readers, the scanner and the parser together.

use llm_cells::cells::{BotResponse, Cell, CellCollector};
use llm_cells::channel::{pipe, ByteReader, ReadResult, Reader, WriteCloser, Writer};
use llm_cells::scanner::Scanner;

#[tokio::test]
async fn byte_reader_rejoins_split_code_points() {
    let text = "naïve → 日本";
    let bytes = text.as_bytes();
    let mock = tokio_test::io::Builder::new()
        .read(&bytes[..3])
        .read(&bytes[3..9])
        .read(&bytes[9..])
        .build();

    let mut reader = ByteReader::new(mock);
    let mut received = String::new();
    while let ReadResult::Chunk(chunk) = reader.read().await.unwrap() {
        assert!(!chunk.is_empty());
        received.push_str(&chunk);
    }
    assert_eq!(received, text);
}

#[tokio::test]
async fn scanner_reads_lines_from_pipe() {
    let (reader, mut writer) = pipe();
    let producer = tokio::spawn(async move {
        for chunk in ["first li", "ne\nsec", "ond\n", "tail"] {
            writer.write(chunk).await.unwrap();
        }
        writer.close().await.unwrap();
    });

    let mut scanner = Scanner::new(reader);
    assert_eq!(scanner.take_line().await.unwrap(), "first line\n");
    assert!(scanner.starts_with("sec").await.unwrap());
    assert_eq!(scanner.take_line().await.unwrap(), "second\n");
    assert_eq!(scanner.take_line().await.unwrap(), "tail");
    assert!(scanner.at_end().await.unwrap());

    producer.await.unwrap();
}

#[tokio::test]
async fn parser_consumes_pipe_while_it_is_written() {
    let (reader, mut writer) = pipe();
    let producer = tokio::spawn(async move {
        for chunk in ["Let me ", "check.\n%she", "ll\nls\n", "\n%mark", "down\nDone"] {
            writer.write(chunk).await.unwrap();
        }
        writer.close().await.unwrap();
    });

    let mut sink = CellCollector::new();
    BotResponse::new(reader).copy(&mut sink).await.unwrap();
    producer.await.unwrap();

    assert_eq!(
        sink.into_cells(),
        vec![
            Cell::markdown("bot: Let me check.\n"),
            Cell::code("shell", "ls\n"),
            Cell::markdown("Done"),
        ]
    );
}

#[tokio::test]
async fn parser_over_bytes() {
    let input: &[u8] = "%python\nprint('héllo')\n".as_bytes();
    let mut sink = CellCollector::new();
    BotResponse::new(ByteReader::new(input))
        .copy(&mut sink)
        .await
        .unwrap();

    assert_eq!(
        sink.into_cells(),
        vec![Cell::code("python", "print('héllo')\n")]
    );
}

//! Tests for the rendezvous pipe.

use llm_cells::channel::{pipe, Cancelled, ReadResult, Reader, StreamError, WriteCloser, Writer};
use tokio_test::{assert_pending, assert_ready, assert_ready_eq, task};

#[test]
fn write_waits_for_reader() {
    let (mut reader, mut writer) = pipe();

    let mut write = task::spawn(async move { writer.write("hello").await });
    assert_pending!(write.poll());
    assert_pending!(write.poll());

    let mut read = task::spawn(async { reader.read().await });
    let chunk = assert_ready!(read.poll()).unwrap();
    assert_eq!(chunk, ReadResult::Chunk("hello".to_string()));
    drop(read);

    assert!(write.is_woken());
    assert_ready_eq!(write.poll(), Ok(()));
}

#[test]
fn close_waits_for_reader() {
    let (mut reader, mut writer) = pipe();

    let mut close = task::spawn(async move { writer.close().await });
    assert_pending!(close.poll());

    let mut read = task::spawn(async { reader.read().await });
    assert_eq!(assert_ready!(read.poll()).unwrap(), ReadResult::Done);
    drop(read);

    assert_ready_eq!(close.poll(), Ok(()));
}

#[test]
fn cancel_releases_blocked_writer() {
    let (mut reader, mut writer) = pipe();

    let mut write = task::spawn(async move { writer.write("stuck").await });
    assert_pending!(write.poll());

    reader.cancel();
    assert_ready_eq!(write.poll(), Err(Cancelled));
}

#[tokio::test]
async fn read_after_cancel_is_done() {
    let (mut reader, _writer) = pipe();
    reader.cancel();
    assert_eq!(reader.read().await.unwrap(), ReadResult::Done);
}

#[tokio::test]
async fn writes_arrive_in_order() {
    let (mut reader, mut writer) = pipe();
    let words: Vec<String> = (0..50).map(|i| format!("w{i} ")).collect();

    let expected: String = words.concat();
    let producer = tokio::spawn(async move {
        for word in &words {
            writer.write(word).await?;
        }
        writer.close().await
    });

    let mut received = String::new();
    while let ReadResult::Chunk(chunk) = reader.read().await.unwrap() {
        received.push_str(&chunk);
    }

    assert_eq!(received, expected);
    assert_eq!(producer.await.unwrap(), Ok(()));
}

#[tokio::test]
async fn dropped_writer_is_an_error() {
    let (mut reader, mut writer) = pipe();
    tokio::spawn(async move {
        writer.write("partial").await.unwrap();
    });

    assert_eq!(
        reader.read().await.unwrap(),
        ReadResult::Chunk("partial".to_string())
    );
    assert!(matches!(
        reader.read().await,
        Err(StreamError::WriterDropped)
    ));
}

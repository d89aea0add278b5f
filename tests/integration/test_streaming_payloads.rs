use futures::channel::mpsc;
use futures::stream::{self, StreamExt};
use header_stamp::core::header::{prepend_stream, HeaderPrepender};
use header_stamp::core::item::{ByteStream, Content, Item};
use header_stamp::utils::files;
use serde_json::json;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

fn chunks(parts: &[&str]) -> ByteStream {
    let items: Vec<io::Result<Vec<u8>>> = parts.iter().map(|p| Ok(p.as_bytes().to_vec())).collect();
    stream::iter(items).boxed()
}

fn take_stream(item: Item) -> ByteStream {
    match item.content {
        Some(Content::Stream(stream)) => stream,
        other => panic!("expected stream content, got {:?}", other),
    }
}

async fn drain_to_string(stream: ByteStream) -> String {
    let bytes = files::drain(Content::Stream(stream)).await.unwrap();
    String::from_utf8(bytes).unwrap()
}

/// Sets its flag when dropped, to observe release of the original stream.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_prepends_header_to_stream() {
    let stage = HeaderPrepender::create("And then i said : ", None).unwrap();
    let item = Item::new("./test/fixture/anotherFile.txt").with_stream(chunks(&["Hello world"]));

    let item = stage.process(item).unwrap();
    assert!(item.is_stream());
    assert_eq!(
        drain_to_string(take_stream(item)).await,
        "And then i said : Hello world"
    );
}

#[tokio::test]
async fn test_stream_chunks_keep_order_and_boundaries() {
    let stage = HeaderPrepender::create("<%= n %>:", serde_json::from_value(json!({"n": 1})).ok())
        .unwrap();
    let item = stage
        .process(Item::new("a.txt").with_stream(chunks(&["one", "two", "three"])))
        .unwrap();

    let collected: Vec<Vec<u8>> = take_stream(item)
        .map(|chunk| chunk.unwrap())
        .collect()
        .await;
    assert_eq!(
        collected,
        vec![
            b"1:".to_vec(),
            b"one".to_vec(),
            b"two".to_vec(),
            b"three".to_vec()
        ]
    );
}

#[tokio::test]
async fn test_wraps_a_channel_that_is_still_open() {
    let (tx, rx) = mpsc::unbounded::<io::Result<Vec<u8>>>();
    let stage = HeaderPrepender::create("// head\n", None).unwrap();
    let item = stage.process(Item::new("live.txt").with_stream(rx.boxed())).unwrap();

    tx.unbounded_send(Ok(b"late ".to_vec())).unwrap();
    tx.unbounded_send(Ok(b"data".to_vec())).unwrap();
    drop(tx);

    assert_eq!(drain_to_string(take_stream(item)).await, "// head\nlate data");
}

#[tokio::test]
async fn test_stream_errors_are_forwarded_verbatim() {
    let parts: Vec<io::Result<Vec<u8>>> = vec![
        Ok(b"partial".to_vec()),
        Err(io::Error::new(io::ErrorKind::UnexpectedEof, "producer died")),
        Ok(b"after".to_vec()),
    ];
    let stage = HeaderPrepender::create("H|", None).unwrap();
    let item = stage
        .process(Item::new("a.txt").with_stream(stream::iter(parts).boxed()))
        .unwrap();

    let results: Vec<io::Result<Vec<u8>>> = take_stream(item).collect().await;
    assert_eq!(results.len(), 4);
    assert_eq!(results[0].as_ref().unwrap(), b"H|");
    assert_eq!(results[1].as_ref().unwrap(), b"partial");
    let err = results[2].as_ref().unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    assert_eq!(err.to_string(), "producer died");
    assert_eq!(results[3].as_ref().unwrap(), b"after");
}

#[tokio::test]
async fn test_wrapper_pulls_lazily() {
    let pulled = Arc::new(AtomicUsize::new(0));
    let counter = pulled.clone();
    let inner = stream::iter(vec!["a", "b", "c"])
        .map(move |part| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(part.as_bytes().to_vec())
        })
        .boxed();

    let mut wrapped = prepend_stream(b"header".to_vec(), inner);
    assert_eq!(pulled.load(Ordering::SeqCst), 0);

    assert_eq!(wrapped.next().await.unwrap().unwrap(), b"header");
    assert_eq!(pulled.load(Ordering::SeqCst), 0);

    assert_eq!(wrapped.next().await.unwrap().unwrap(), b"a");
    assert_eq!(pulled.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_dropping_wrapper_releases_original() {
    let released = Arc::new(AtomicBool::new(false));
    let guard = DropFlag(released.clone());
    let inner = stream::iter(vec!["x"])
        .map(move |part| {
            let _keep = &guard;
            Ok(part.as_bytes().to_vec())
        })
        .boxed();

    let stage = HeaderPrepender::create("h", None).unwrap();
    let item = stage.process(Item::new("a.txt").with_stream(inner)).unwrap();
    let mut wrapped = take_stream(item);
    assert_eq!(wrapped.next().await.unwrap().unwrap(), b"h");
    assert!(!released.load(Ordering::SeqCst));

    drop(wrapped);
    assert!(released.load(Ordering::SeqCst));
}

#[test]
fn test_empty_header_returns_original_stream() {
    let wrapped = prepend_stream(Vec::new(), chunks(&["only"]));
    let collected: Vec<_> = tokio_test::block_on(wrapped.collect::<Vec<_>>());
    assert_eq!(collected.len(), 1);
    assert_eq!(collected[0].as_ref().unwrap(), b"only");
}

#[tokio::test]
async fn test_streamed_files_from_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("big.txt");
    let body = "0123456789".repeat(20_000);
    std::fs::write(&path, &body).unwrap();

    let item = files::read_item(&path, dir.path(), files::ReadMode::Stream)
        .await
        .unwrap();
    let stage = HeaderPrepender::create("/* <%= file.relative %> */\n", None).unwrap();
    let item = stage.process(item).unwrap();

    let text = drain_to_string(take_stream(item)).await;
    assert!(text.starts_with("/* big.txt */\n0123456789"));
    assert_eq!(text.len(), "/* big.txt */\n".len() + body.len());
}

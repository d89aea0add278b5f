use header_stamp::core::item::{Content, Item};
use header_stamp::core::types::PayloadMode;
use serde_json::json;
use std::path::Path;

#[test]
fn test_vinyl_style_paths() {
    let item = Item::new("./test/fixture/file.txt")
        .with_cwd("./test/")
        .with_base("./test/fixture/");

    assert_eq!(item.path(), Path::new("test/fixture/file.txt"));
    assert_eq!(item.relative(), Path::new("file.txt"));
    assert_eq!(item.base(), Path::new("test/fixture"));
    assert_eq!(item.cwd(), Path::new("test"));
}

#[test]
fn test_relative_falls_back_to_full_path_outside_base() {
    let item = Item::new("other/file.txt").with_base("test/fixture");
    assert_eq!(item.relative(), Path::new("other/file.txt"));
}

#[test]
fn test_payload_modes() {
    assert_eq!(Item::new("dir").payload_mode(), PayloadMode::Null);
    assert_eq!(
        Item::new("a.txt").with_buffer("x").payload_mode(),
        PayloadMode::Buffer
    );

    let stream = futures::stream::iter(vec![Ok::<_, std::io::Error>(b"x".to_vec())]);
    let item = Item::new("a.txt").with_stream(Box::pin(stream));
    assert_eq!(item.payload_mode(), PayloadMode::Stream);
    assert!(matches!(item.content, Some(Content::Stream(_))));
}

#[test]
fn test_context_value_shape() {
    let mut item = Item::new("src/lib/util.rs").with_base("src");
    item.data.insert("owner".to_string(), json!("core-team"));

    let value = item.context_value();
    assert_eq!(value["relative"], "lib/util.rs");
    assert_eq!(value["dirname"], "src/lib");
    assert_eq!(value["basename"], "util.rs");
    assert_eq!(value["stem"], "util");
    assert_eq!(value["extname"], ".rs");
    assert_eq!(value["data"]["owner"], "core-team");
    assert_eq!(value["is_buffer"], false);
    assert_eq!(value["is_stream"], false);
}

#[test]
fn test_content_debug_hides_bytes() {
    let content = Content::from(b"secret".to_vec());
    assert_eq!(format!("{:?}", content), "Buffer(6)");
    assert_eq!(content.as_bytes(), Some(&b"secret"[..]));
}

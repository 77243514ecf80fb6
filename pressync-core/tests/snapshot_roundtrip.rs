//! Roundtrip serialisation tests for snapshot records.
//!
//! Each `#[case]` is isolated — no shared state.

use chrono::{TimeZone, Utc};
use pressync_core::types::{ContentItem, Media, Post, RemoteId};
use rstest::rstest;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fresh_post() -> Post {
    Post::from_local(
        "fresh.md".to_string(),
        Utc.with_ymd_and_hms(2021, 3, 1, 12, 0, 0).unwrap(),
    )
}

fn published_post() -> Post {
    let mut post = Post::from_local(
        "hello.md".to_string(),
        Utc.timestamp_opt(1_614_600_000, 123_456_000).unwrap(),
    );
    post.remote_id = Some(RemoteId(12));
    post.remote_url = Some("https://blog.example.com/hello/".to_string());
    post.title = "Hello".to_string();
    post.category = "notes".to_string();
    post.tags = "rust, sync".to_string();
    post.status = "draft".to_string();
    post
}

fn unicode_post() -> Post {
    let mut post = Post::from_local("日本語-пост.md".to_string(), Utc::now());
    post.title = "Émojis 🚀 & spéçïal chars: <>&\"'".to_string();
    post
}

// ---------------------------------------------------------------------------
// Parameterised roundtrip test
// ---------------------------------------------------------------------------

#[rstest]
#[case("fresh", fresh_post())]
#[case("published", published_post())]
#[case("unicode", unicode_post())]
fn post_roundtrip(#[case] label: &str, #[case] post: Post) {
    let json = serde_json::to_string(&vec![post.clone()])
        .unwrap_or_else(|e| panic!("[{label}] serialize failed: {e}"));
    let back: Vec<Post> = serde_json::from_str(&json)
        .unwrap_or_else(|e| panic!("[{label}] deserialize failed: {e}"));
    assert_eq!(back, vec![post], "[{label}] post");
}

#[test]
fn media_roundtrip_keeps_remote_identifiers() {
    let mut media = Media::from_local("cat.jpg".to_string(), Utc::now());
    media.remote_id = Some(RemoteId(40));
    media.remote_url = Some("https://blog.example.com/cat.jpg".to_string());

    let json = serde_json::to_string(&media).expect("serialize");
    let back: Media = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.local_file, media.local_file);
    assert_eq!(back.remote_id, media.remote_id);
    assert_eq!(back.remote_url, media.remote_url);
}

#[test]
fn timestamp_precision_survives_roundtrip() {
    let post = published_post();
    let json = serde_json::to_string(&post).expect("serialize");
    let back: Post = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.modified_at(), post.modified_at());
}

//! Config error-message, atomic-write-safety, and layout integration tests.

use assert_fs::prelude::*;
use predicates::prelude::predicate;
use pressync_core::{
    config::{self, SiteConfig},
    ConfigError, ContentKind,
};
use std::fs;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// 1. Load
// ---------------------------------------------------------------------------

#[test]
fn load_missing_config_returns_defaults() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    let loaded = config::load_at(root.path()).expect("load");
    assert_eq!(loaded.posts_dir, PathBuf::from("posts"));
    assert_eq!(loaded.media_dir, PathBuf::from("media"));
    assert!(loaded.site_url.is_empty());
}

#[test]
fn load_corrupt_yaml_returns_parse_error_with_path() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("pressync.yaml")
        .write_str(": : corrupt : yaml : !!!\n  - broken: [unclosed")
        .expect("write");

    let err = config::load_at(root.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("pressync.yaml"), "got: {err}");
}

#[test]
fn load_partial_config_fills_defaults() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    root.child("pressync.yaml")
        .write_str("site_url: https://blog.example.com\nposts_dir: content/posts\n")
        .expect("write");

    let loaded = config::load_at(root.path()).expect("load");
    assert_eq!(loaded.site_url, "https://blog.example.com");
    assert_eq!(
        loaded.content_dir(root.path(), ContentKind::Post),
        root.path().join("content/posts")
    );
    assert_eq!(loaded.media_dir, PathBuf::from("media"));
}

// ---------------------------------------------------------------------------
// 2. Save
// ---------------------------------------------------------------------------

#[test]
fn save_then_load_preserves_fields() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    let config = SiteConfig {
        site_url: "https://blog.example.com".to_string(),
        username: "editor".to_string(),
        state_dir: PathBuf::from(".pressync"),
        ..SiteConfig::default()
    };
    config::save_at(root.path(), &config).expect("save");
    root.child("pressync.yaml").assert(predicate::path::exists());
    root.child("pressync.yaml")
        .assert(predicate::str::contains("site_url: https://blog.example.com"));

    let loaded = config::load_at(root.path()).expect("load");
    assert_eq!(loaded.site_url, config.site_url);
    assert_eq!(loaded.username, config.username);
    assert_eq!(loaded.state_dir, config.state_dir);
}

#[test]
fn save_omits_empty_password() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    config::save_at(root.path(), &SiteConfig::default()).expect("save");
    let yaml = fs::read_to_string(config::config_path_at(root.path())).expect("read");
    assert!(!yaml.contains("password"), "got: {yaml}");
}

#[test]
fn mid_write_crash_leaves_original_intact() {
    let root = assert_fs::TempDir::new().expect("tempdir");
    config::save_at(root.path(), &SiteConfig::default()).expect("save");

    let path = config::config_path_at(root.path());
    let original_bytes = fs::read(&path).expect("read original");

    // Simulate crash: .tmp written but process died before rename
    let tmp = root.path().join("pressync.yaml.tmp");
    fs::write(&tmp, b"CRASH - INCOMPLETE WRITE").expect("write crash tmp");

    let current_bytes = fs::read(&path).expect("read after crash");
    assert_eq!(original_bytes, current_bytes, "original must be unchanged after crash");
    assert!(config::load_at(root.path()).is_ok());
}

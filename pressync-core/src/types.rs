//! Domain types for published content.
//!
//! Both content kinds share one shape: a `local_file` join key plus the
//! identifiers the remote site assigns on first publish. Snapshot files use
//! camelCase JSON field names.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Identifier assigned by the remote site to a published post or media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteId(pub u64);

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for RemoteId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// The two parallel content tracks, each with its own directory and snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Post,
    Media,
}

/// How a kind reacts when a local item already has a remote counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePolicy {
    /// Re-send the item when the local timestamp is strictly newer.
    WhenNewer,
    /// Never touch an item again once it has been published.
    PublishOnce,
}

impl ContentKind {
    pub fn all() -> &'static [ContentKind] {
        &[ContentKind::Post, ContentKind::Media]
    }

    /// Default content directory name, relative to the working directory.
    pub fn dir_name(self) -> &'static str {
        match self {
            ContentKind::Post => "posts",
            ContentKind::Media => "media",
        }
    }

    /// Snapshot file name inside the state directory.
    pub fn state_file(self) -> &'static str {
        match self {
            ContentKind::Post => "posts.json",
            ContentKind::Media => "media.json",
        }
    }

    /// File extension (without the dot) accepted by the scanner.
    pub fn extension(self) -> &'static str {
        match self {
            ContentKind::Post => "md",
            ContentKind::Media => "jpg",
        }
    }

    pub fn update_policy(self) -> UpdatePolicy {
        match self {
            ContentKind::Post => UpdatePolicy::WhenNewer,
            ContentKind::Media => UpdatePolicy::PublishOnce,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Post => write!(f, "post"),
            ContentKind::Media => write!(f, "media"),
        }
    }
}

// ---------------------------------------------------------------------------
// ContentItem
// ---------------------------------------------------------------------------

/// Behaviour shared by [`Post`] and [`Media`].
///
/// The reconciler and the state store are generic over this trait; `KIND`
/// selects the snapshot file and the update policy.
pub trait ContentItem: Clone + fmt::Debug + Serialize + DeserializeOwned {
    const KIND: ContentKind;

    /// Fresh local descriptor as produced by the scanner.
    fn from_local(local_file: String, modified_at: DateTime<Utc>) -> Self;

    fn local_file(&self) -> &str;
    fn remote_id(&self) -> Option<RemoteId>;
    fn remote_url(&self) -> Option<&str>;
    fn modified_at(&self) -> DateTime<Utc>;

    /// Carry the remote identifiers of a snapshot entry over to this item.
    fn adopt_remote(&mut self, remote: &Self);
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A markdown post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub local_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<RemoteId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    pub modified_at: DateTime<Utc>,
    #[serde(default)]
    pub title: String,
    /// Rendered body; only populated while a post is being published.
    #[serde(skip)]
    pub body_html: String,
    #[serde(default)]
    pub category: String,
    /// Free-form, comma separated as written in front matter.
    #[serde(default)]
    pub tags: String,
    #[serde(default = "default_status")]
    pub status: String,
    /// Publication date set in front matter; only populated while a post is
    /// being published.
    #[serde(skip)]
    pub publish_date: Option<DateTime<Utc>>,
}

pub fn default_status() -> String {
    "publish".to_string()
}

impl ContentItem for Post {
    const KIND: ContentKind = ContentKind::Post;

    fn from_local(local_file: String, modified_at: DateTime<Utc>) -> Self {
        Self {
            local_file,
            remote_id: None,
            remote_url: None,
            modified_at,
            title: String::new(),
            body_html: String::new(),
            category: String::new(),
            tags: String::new(),
            status: default_status(),
            publish_date: None,
        }
    }

    fn local_file(&self) -> &str {
        &self.local_file
    }

    fn remote_id(&self) -> Option<RemoteId> {
        self.remote_id
    }

    fn remote_url(&self) -> Option<&str> {
        self.remote_url.as_deref()
    }

    fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    fn adopt_remote(&mut self, remote: &Self) {
        self.remote_id = remote.remote_id;
        self.remote_url = remote.remote_url.clone();
    }
}

/// An image uploaded to the remote media library.
///
/// Only the file name and remote identifiers are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub local_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<RemoteId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    #[serde(skip, default = "Utc::now")]
    pub modified_at: DateTime<Utc>,
}

impl ContentItem for Media {
    const KIND: ContentKind = ContentKind::Media;

    fn from_local(local_file: String, modified_at: DateTime<Utc>) -> Self {
        Self {
            local_file,
            remote_id: None,
            remote_url: None,
            modified_at,
        }
    }

    fn local_file(&self) -> &str {
        &self.local_file
    }

    fn remote_id(&self) -> Option<RemoteId> {
        self.remote_id
    }

    fn remote_url(&self) -> Option<&str> {
        self.remote_url.as_deref()
    }

    fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    fn adopt_remote(&mut self, remote: &Self) {
        self.remote_id = remote.remote_id;
        self.remote_url = remote.remote_url.clone();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

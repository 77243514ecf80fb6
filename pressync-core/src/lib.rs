//! pressync core library — domain types, site configuration, errors.
//!
//! - [`types`] — [`Post`], [`Media`] and the [`ContentItem`] trait
//! - [`config`] — [`SiteConfig`] load / save
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::SiteConfig;
pub use error::ConfigError;
pub use types::{ContentItem, ContentKind, Media, Post, RemoteId, UpdatePolicy};

//! Publisher driver.
//!
//! Sends classified items to a [`Publisher`] one at a time, in order, and
//! returns new item values carrying what the remote site assigned. A failed
//! call is reported and recorded; the remaining items still run. Nothing is
//! retried.

use std::path::Path;

use chrono::{DateTime, Utc};

use pressync_core::{Media, Post, RemoteId};
use pressync_render::{front_matter, MarkdownRenderer};

use crate::error::PublishError;
use crate::report::Reporter;

/// What the remote site returns for a newly created post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePost {
    pub id: RemoteId,
    pub url: String,
    /// Canonical remote timestamp, stored as the post's `modified_at`.
    pub date: DateTime<Utc>,
}

/// What the remote site returns for an uploaded media file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteMedia {
    pub id: RemoteId,
    pub url: String,
}

/// The remote publishing service.
pub trait Publisher {
    /// Create a post from fully parsed fields.
    fn publish_post(&self, post: &Post) -> Result<RemotePost, PublishError>;

    /// Re-send a post that has a `remote_id`; returns the new remote timestamp.
    fn update_post(&self, post: &Post) -> Result<DateTime<Utc>, PublishError>;

    /// Upload the file at `path` for `media`.
    fn publish_media(&self, media: &Media, path: &Path) -> Result<RemoteMedia, PublishError>;
}

/// An item the publisher rejected.
#[derive(Debug)]
pub struct FailedItem {
    pub local_file: String,
    pub error: PublishError,
}

/// Outcome of one driver call.
#[derive(Debug)]
pub struct PublishBatch<T> {
    /// Items the remote site accepted, with remote fields filled in.
    pub done: Vec<T>,
    pub failed: Vec<FailedItem>,
}

impl<T> Default for PublishBatch<T> {
    fn default() -> Self {
        Self {
            done: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T> PublishBatch<T> {
    fn fail(&mut self, local_file: &str, error: PublishError, reporter: &dyn Reporter) {
        reporter.warn(&format!("failed to publish {local_file}: {error}"));
        self.failed.push(FailedItem {
            local_file: local_file.to_string(),
            error,
        });
    }
}

/// Drives a [`Publisher`] over classified items.
pub struct PublishDriver<'a> {
    publisher: &'a dyn Publisher,
    renderer: &'a dyn MarkdownRenderer,
    reporter: &'a dyn Reporter,
    posts_dir: &'a Path,
    media_dir: &'a Path,
}

impl<'a> PublishDriver<'a> {
    pub fn new(
        publisher: &'a dyn Publisher,
        renderer: &'a dyn MarkdownRenderer,
        reporter: &'a dyn Reporter,
        posts_dir: &'a Path,
        media_dir: &'a Path,
    ) -> Self {
        Self {
            publisher,
            renderer,
            reporter,
            posts_dir,
            media_dir,
        }
    }

    /// Create every post in `items` on the remote site.
    pub fn publish_new_posts(&self, items: Vec<Post>) -> PublishBatch<Post> {
        let mut batch = PublishBatch::default();
        for post in items {
            let mut post = self.prepare_post(post);
            match self.publisher.publish_post(&post) {
                Ok(remote) => {
                    self.reporter
                        .info(&format!("published {} as #{}", post.local_file, remote.id));
                    post.remote_id = Some(remote.id);
                    post.remote_url = Some(remote.url);
                    post.modified_at = remote.date;
                    batch.done.push(post);
                }
                Err(err) => batch.fail(&post.local_file, err, self.reporter),
            }
        }
        batch
    }

    /// Re-send every post in `items`; each must already carry a `remote_id`.
    pub fn publish_post_updates(&self, items: Vec<Post>) -> PublishBatch<Post> {
        let mut batch = PublishBatch::default();
        for post in items {
            let Some(id) = post.remote_id else {
                let err = PublishError::MissingRemoteId {
                    local_file: post.local_file.clone(),
                };
                batch.fail(&post.local_file, err, self.reporter);
                continue;
            };
            self.reporter
                .debug(&format!("updating post #{id} from {}", post.local_file));
            let mut post = self.prepare_post(post);
            match self.publisher.update_post(&post) {
                Ok(date) => {
                    self.reporter.info(&format!("updated {}", post.local_file));
                    post.modified_at = date;
                    batch.done.push(post);
                }
                Err(err) => batch.fail(&post.local_file, err, self.reporter),
            }
        }
        batch
    }

    /// Upload every media file in `items`.
    pub fn publish_new_media(&self, items: Vec<Media>) -> PublishBatch<Media> {
        let mut batch = PublishBatch::default();
        for mut media in items {
            let path = self.media_dir.join(&media.local_file);
            match self.publisher.publish_media(&media, &path) {
                Ok(remote) => {
                    self.reporter
                        .info(&format!("uploaded {} as #{}", media.local_file, remote.id));
                    media.remote_id = Some(remote.id);
                    media.remote_url = Some(remote.url);
                    batch.done.push(media);
                }
                Err(err) => batch.fail(&media.local_file, err, self.reporter),
            }
        }
        batch
    }

    /// Read and parse the post's source file into its publishable fields.
    ///
    /// An unreadable file is reported and parsed as empty content.
    fn prepare_post(&self, mut post: Post) -> Post {
        let path = self.posts_dir.join(&post.local_file);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                self.reporter
                    .warn(&format!("can't read file {}: {err}", path.display()));
                String::new()
            }
        };

        let page = front_matter::parse(&raw, self.renderer);
        post.title = page.meta.title;
        post.modified_at = page.meta.date;
        post.publish_date = page.meta.date_set.then_some(page.meta.date);
        post.category = page.meta.category;
        post.tags = page.meta.tags;
        post.status = page.meta.status;
        post.body_html = page.body_html;
        post
    }
}

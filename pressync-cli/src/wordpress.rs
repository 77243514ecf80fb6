//! WordPress REST client implementing [`Publisher`].
//!
//! Authenticates with HTTP basic auth using an application password.
//! Endpoints (relative to the site URL):
//!
//! ```text
//! POST /wp-json/wp/v2/posts        create
//! POST /wp-json/wp/v2/posts/{id}   update
//! POST /wp-json/wp/v2/media        upload, raw body + Content-Disposition
//! ```

use std::path::Path;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use pressync_core::{Media, Post, RemoteId, SiteConfig};
use pressync_sync::{PublishError, Publisher, RemoteMedia, RemotePost};

const API_PREFIX: &str = "wp-json/wp/v2";
const TIMEOUT: Duration = Duration::from_secs(60);
/// Format of the `*_gmt` fields; WordPress omits the offset.
const GMT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Deserialize)]
struct WpPost {
    id: u64,
    link: String,
    modified_gmt: String,
}

#[derive(Debug, Deserialize)]
struct WpMedia {
    id: u64,
    source_url: String,
}

#[derive(Debug, Deserialize)]
struct WpError {
    message: String,
}

pub struct WordPressClient {
    agent: ureq::Agent,
    base_url: String,
    authorization: String,
}

impl WordPressClient {
    /// Expects credentials to have been checked with
    /// [`SiteConfig::require_credentials`].
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(TIMEOUT).build(),
            base_url: site.site_url.trim_end_matches('/').to_string(),
            authorization: basic_auth(&site.username, &site.password),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{API_PREFIX}/{path}", self.base_url)
    }

    fn send_json<R: DeserializeOwned>(
        &self,
        url: &str,
        body: serde_json::Value,
    ) -> Result<R, PublishError> {
        tracing::debug!(%url, "POST");
        let response = self
            .agent
            .post(url)
            .set("Authorization", &self.authorization)
            .send_json(body)
            .map_err(request_error)?;
        read_json(response)
    }
}

impl Publisher for WordPressClient {
    fn publish_post(&self, post: &Post) -> Result<RemotePost, PublishError> {
        let created: WpPost = self.send_json(&self.endpoint("posts"), create_body(post))?;
        Ok(RemotePost {
            id: RemoteId(created.id),
            url: created.link,
            date: parse_gmt(&created.modified_gmt)?,
        })
    }

    fn update_post(&self, post: &Post) -> Result<DateTime<Utc>, PublishError> {
        let id = post.remote_id.ok_or_else(|| PublishError::MissingRemoteId {
            local_file: post.local_file.clone(),
        })?;
        let url = self.endpoint(&format!("posts/{id}"));
        let updated: WpPost = self.send_json(&url, post_body(post))?;
        parse_gmt(&updated.modified_gmt)
    }

    fn publish_media(&self, media: &Media, path: &Path) -> Result<RemoteMedia, PublishError> {
        let bytes = std::fs::read(path).map_err(|e| PublishError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let url = self.endpoint("media");
        tracing::debug!(%url, bytes = bytes.len(), "upload");
        let response = self
            .agent
            .post(&url)
            .set("Authorization", &self.authorization)
            .set("Content-Type", "image/jpeg")
            .set("Content-Disposition", &content_disposition(&media.local_file))
            .send_bytes(&bytes)
            .map_err(request_error)?;
        let uploaded: WpMedia = read_json(response)?;
        Ok(RemoteMedia {
            id: RemoteId(uploaded.id),
            url: uploaded.source_url,
        })
    }
}

fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

fn content_disposition(file_name: &str) -> String {
    format!("attachment; filename=\"{}\"", file_name.replace('"', ""))
}

/// Fields sent on both create and update. Categories and tags need numeric
/// term ids on WordPress, so they stay local.
fn post_body(post: &Post) -> serde_json::Value {
    json!({
        "title": post.title,
        "content": post.body_html,
        "status": post.status,
    })
}

/// Without a front-matter date the site picks its own publication time, so
/// local clock skew cannot turn a post into a scheduled one.
fn create_body(post: &Post) -> serde_json::Value {
    let mut body = post_body(post);
    if let Some(date) = post.publish_date {
        body["date_gmt"] = json!(date.format(GMT_FORMAT).to_string());
    }
    body
}

fn read_json<R: DeserializeOwned>(response: ureq::Response) -> Result<R, PublishError> {
    response
        .into_json::<R>()
        .map_err(|e| PublishError::Response(e.to_string()))
}

fn request_error(err: ureq::Error) -> PublishError {
    match err {
        ureq::Error::Status(status, response) => PublishError::Remote {
            status,
            message: remote_message(&response.into_string().unwrap_or_default()),
        },
        ureq::Error::Transport(transport) => PublishError::Transport(transport.to_string()),
    }
}

/// The `message` of a WordPress error body, or the raw body.
fn remote_message(body: &str) -> String {
    match serde_json::from_str::<WpError>(body) {
        Ok(error) => error.message,
        Err(_) => body.trim().to_string(),
    }
}

fn parse_gmt(value: &str) -> Result<DateTime<Utc>, PublishError> {
    NaiveDateTime::parse_from_str(value, GMT_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| PublishError::Response(format!("bad timestamp '{value}': {e}")))
}

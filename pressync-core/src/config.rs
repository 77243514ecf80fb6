//! Site configuration stored as YAML in the working directory.
//!
//! # Storage layout
//!
//! ```text
//! <root>/
//!   pressync.yaml   (mode 0600 — may hold an application password)
//!   posts/          (markdown sources)
//!   media/          (images)
//!   posts.json      (snapshot, see pressync-sync)
//!   media.json
//! ```
//!
//! Every path in [`SiteConfig`] is relative to `<root>` unless absolute.
//! A missing config file is not an error: defaults are returned so that
//! read-only commands work in a bare content directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::ContentKind;

/// Config file name inside the working directory.
pub const CONFIG_FILE: &str = "pressync.yaml";

/// Environment variable that overrides `password` from the config file.
pub const PASSWORD_ENV: &str = "PRESSYNC_PASSWORD";

/// Connection details and directory layout for one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL of the site, e.g. `https://blog.example.com`.
    pub site_url: String,
    pub username: String,
    /// Application password. Prefer `PRESSYNC_PASSWORD` over storing it here.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    pub posts_dir: PathBuf,
    pub media_dir: PathBuf,
    /// Directory holding `posts.json` and `media.json`.
    pub state_dir: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_url: String::new(),
            username: String::new(),
            password: String::new(),
            posts_dir: PathBuf::from(ContentKind::Post.dir_name()),
            media_dir: PathBuf::from(ContentKind::Media.dir_name()),
            state_dir: PathBuf::from("."),
        }
    }
}

impl SiteConfig {
    /// Content directory for `kind`, resolved against `root`.
    pub fn content_dir(&self, root: &Path, kind: ContentKind) -> PathBuf {
        let dir = match kind {
            ContentKind::Post => &self.posts_dir,
            ContentKind::Media => &self.media_dir,
        };
        root.join(dir)
    }

    /// Snapshot directory resolved against `root`.
    pub fn state_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.state_dir)
    }

    /// Replace the password with `value` when it is set and non-empty.
    pub fn with_password_override(mut self, value: Option<String>) -> Self {
        if let Some(password) = value.filter(|p| !p.is_empty()) {
            self.password = password;
        }
        self
    }

    /// Check that everything needed to talk to the remote site is present.
    pub fn require_credentials(&self) -> Result<(), ConfigError> {
        if self.site_url.trim().is_empty() {
            return Err(ConfigError::Missing { field: "site_url" });
        }
        if self.username.trim().is_empty() {
            return Err(ConfigError::Missing { field: "username" });
        }
        if self.password.is_empty() {
            return Err(ConfigError::Missing { field: "password" });
        }
        Ok(())
    }
}

/// `<root>/pressync.yaml` — pure, no I/O.
pub fn config_path_at(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Load `<root>/pressync.yaml`, applying the `PRESSYNC_PASSWORD` override.
///
/// Returns defaults if the file does not exist,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(root: &Path) -> Result<SiteConfig, ConfigError> {
    let path = config_path_at(root);
    let config = if path.exists() {
        let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;
        serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })?
    } else {
        SiteConfig::default()
    };
    Ok(config.with_password_override(std::env::var(PASSWORD_ENV).ok()))
}

/// Atomically save `config` to `<root>/pressync.yaml`.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `chmod 0600` → `rename`.
pub fn save_at(root: &Path, config: &SiteConfig) -> Result<(), ConfigError> {
    let path = config_path_at(root);
    let tmp_path = path.with_file_name(format!("{CONFIG_FILE}.tmp"));

    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&tmp_path, yaml).map_err(|e| ConfigError::Io {
        path: tmp_path.clone(),
        source: e,
    })?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, &path).map_err(|e| ConfigError::Io { path, source: e })?;
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).map_err(|e| {
        ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

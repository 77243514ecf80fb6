//! `pressync init [--site-url <url>] [--username <name>]`

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use pressync_core::{
    config::{self, PASSWORD_ENV},
    ContentKind, SiteConfig,
};

/// Prepare a directory for publishing.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Base URL of the site, e.g. https://blog.example.com
    #[arg(long)]
    pub site_url: Option<String>,

    /// Account that owns the application password.
    #[arg(long, short = 'u')]
    pub username: Option<String>,
}

impl InitArgs {
    /// Idempotent: an existing pressync.yaml is kept as is.
    pub fn run(self, root: &Path) -> Result<()> {
        let path = config::config_path_at(root);
        let site = if path.exists() {
            println!("· {} already exists, leaving it untouched", path.display());
            config::load_at(root)
                .with_context(|| format!("failed to read '{}'", path.display()))?
        } else {
            let site = SiteConfig {
                site_url: self.site_url.unwrap_or_default(),
                username: self.username.unwrap_or_default(),
                ..SiteConfig::default()
            };
            std::fs::create_dir_all(root)
                .with_context(|| format!("cannot create '{}'", root.display()))?;
            config::save_at(root, &site)
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            println!("✓ Wrote {}", path.display());
            site
        };

        for kind in ContentKind::all() {
            let dir = site.content_dir(root, *kind);
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("cannot create '{}'", dir.display()))?;
            println!("✓ {} directory: {}", kind, dir.display());
        }

        if site.password.is_empty() {
            println!(
                "  Set {PASSWORD_ENV} to an application password before running `pressync sync`."
            );
        }
        Ok(())
    }
}

//! # pressync-render
//!
//! Turns a markdown source file into the fields a post is published with.
//!
//! ## Usage
//!
//! ```rust
//! use pressync_render::{front_matter, CmarkRenderer};
//!
//! let page = front_matter::parse("---\ntitle: Hello\n---\nBody *text*\n", &CmarkRenderer);
//! assert_eq!(page.meta.title, "Hello");
//! assert_eq!(page.body_html, "<p>Body <em>text</em></p>\n");
//! ```

pub mod front_matter;
pub mod markdown;

pub use front_matter::{FrontMatter, Page};
pub use markdown::{CmarkRenderer, MarkdownRenderer};

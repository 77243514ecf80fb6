//! Front-matter parsing.
//!
//! A post file may open with a metadata block fenced by two lines that read
//! exactly `---`:
//!
//! ```text
//! ---
//! title: "Hello"
//! date: 2021-03-01
//! category: notes
//! tags: rust, sync
//! status: draft
//! ---
//! Body text in markdown.
//! ```
//!
//! Only the leading block counts; a later `---` is a markdown rule. Files
//! with fewer than two delimiters are all body and keep default metadata.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::markdown::MarkdownRenderer;

const DELIMITER: &str = "---";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Metadata recognised in the front-matter block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrontMatter {
    pub title: String,
    pub date: DateTime<Utc>,
    /// `true` when `date` came from the file rather than the default.
    #[serde(skip)]
    pub date_set: bool,
    pub category: String,
    pub tags: String,
    pub status: String,
}

impl FrontMatter {
    /// Defaults used for any key the file does not set.
    pub fn with_date(date: DateTime<Utc>) -> Self {
        Self {
            title: String::new(),
            date,
            date_set: false,
            category: String::new(),
            tags: String::new(),
            status: "publish".to_string(),
        }
    }

    fn apply(&mut self, key: &str, value: &str) {
        match key {
            "title" => self.title = value.to_string(),
            "date" => {
                if let Some(date) = parse_date(value) {
                    self.date = date;
                    self.date_set = true;
                }
            }
            "category" => self.category = value.to_string(),
            "tags" => self.tags = value.to_string(),
            "status" => self.status = value.to_string(),
            _ => {}
        }
    }
}

/// A parsed post file: metadata plus the rendered body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub meta: FrontMatter,
    pub body_html: String,
}

/// Parse `raw`, defaulting `date` to the current time.
pub fn parse(raw: &str, renderer: &dyn MarkdownRenderer) -> Page {
    parse_at(raw, renderer, Utc::now())
}

/// Parse `raw` with `now` as the default `date`.
pub fn parse_at(raw: &str, renderer: &dyn MarkdownRenderer, now: DateTime<Utc>) -> Page {
    let mut meta = FrontMatter::with_date(now);
    let (block, body) = split(raw);
    if let Some(block) = block {
        for (key, value) in block.lines().filter_map(key_value) {
            meta.apply(key, value);
        }
    }
    Page {
        meta,
        body_html: renderer.render(body),
    }
}

/// Split `raw` into the front-matter block (without delimiters) and the body.
///
/// Blank lines before the opening delimiter are allowed. Returns `(None, raw)`
/// when the file does not open with a complete block.
pub fn split(raw: &str) -> (Option<&str>, &str) {
    let mut offset = 0;
    let mut block_start = None;

    for line in raw.split_inclusive('\n') {
        let line_end = offset + line.len();
        match block_start {
            None if line.trim().is_empty() => {}
            None if is_delimiter(line) => block_start = Some(line_end),
            None => return (None, raw),
            Some(start) if is_delimiter(line) => {
                return (Some(&raw[start..offset]), &raw[line_end..]);
            }
            Some(_) => {}
        }
        offset = line_end;
    }
    (None, raw)
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// `key: value` with surrounding whitespace and double quotes removed.
/// Lines without a key before the colon are skipped.
fn key_value(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    let colon = line.find(':')?;
    if colon == 0 {
        return None;
    }
    let key = line[..colon].trim();
    let value = line[colon + 1..].trim().trim_matches('"');
    Some((key, value))
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT).ok()?;
    Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::default())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(markdown: &str) -> String {
        markdown.to_string()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn split_returns_block_and_body() {
        let (block, body) = split("---\ntitle: x\n---\nbody\n");
        assert_eq!(block, Some("title: x\n"));
        assert_eq!(body, "body\n");
    }

    #[test]
    fn split_without_closing_delimiter_is_all_body() {
        let raw = "---\ntitle: x\nbody\n";
        assert_eq!(split(raw), (None, raw));
    }

    #[test]
    fn split_ignores_rules_after_body_text() {
        let raw = "intro\n---\ntitle: x\n---\nrest\n";
        assert_eq!(split(raw), (None, raw));
    }

    #[test]
    fn split_tolerates_crlf_and_leading_blank_lines() {
        let (block, body) = split("\r\n---\r\ntitle: x\r\n---\r\nbody");
        assert_eq!(block, Some("title: x\r\n"));
        assert_eq!(body, "body");
    }

    #[test]
    fn empty_block_keeps_defaults() {
        let page = parse_at("---\n---\nbody", &identity, now());
        assert_eq!(page.meta, FrontMatter::with_date(now()));
        assert_eq!(page.body_html, "body");
    }

    #[test]
    fn unparsable_date_keeps_default() {
        let page = parse_at("---\ndate: March 1st\n---\n", &identity, now());
        assert_eq!(page.meta.date, now());
        assert!(!page.meta.date_set);
    }

    #[test]
    fn explicit_date_is_flagged() {
        let page = parse_at("---\ndate: 2021-03-01\n---\n", &identity, now());
        assert_eq!(page.meta.date, Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap());
        assert!(page.meta.date_set);
    }

    #[test]
    fn unknown_keys_and_bare_lines_are_ignored() {
        let raw = "---\nauthor: me\n: orphan\njust words\ntitle: Kept\n---\n";
        let page = parse_at(raw, &identity, now());
        assert_eq!(page.meta.title, "Kept");
        assert_eq!(page.meta.category, "");
    }

    #[test]
    fn value_may_contain_colons() {
        let page = parse_at("---\ntitle: \"Rust: a primer\"\n---\n", &identity, now());
        assert_eq!(page.meta.title, "Rust: a primer");
    }

    #[test]
    fn unclosed_block_discards_metadata() {
        let raw = "---\ntitle: Lost\nbody";
        let page = parse_at(raw, &identity, now());
        assert_eq!(page.meta.title, "");
        assert_eq!(page.body_html, raw);
    }
}

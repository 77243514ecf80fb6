//! Front-matter extraction with the real markdown renderer.

use chrono::{TimeZone, Utc};
use pressync_render::{front_matter, CmarkRenderer, MarkdownRenderer};
use rstest::rstest;

#[test]
fn extracts_metadata_and_renders_body() {
    let raw = "---\ntitle: \"Hello\"\ndate: 2021-03-01\nstatus: draft\n---\nBody text\n";
    let page = front_matter::parse(raw, &CmarkRenderer);

    assert_eq!(page.meta.title, "Hello");
    assert_eq!(page.meta.date, Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap());
    assert_eq!(page.meta.status, "draft");
    assert_eq!(page.body_html, "<p>Body text</p>\n");
}

#[test]
fn file_without_delimiters_uses_defaults_and_whole_body() {
    let raw = "# Heading\n\nJust prose, no metadata.\n";
    let before = Utc::now();
    let page = front_matter::parse(raw, &CmarkRenderer);
    let after = Utc::now();

    assert_eq!(page.meta.status, "publish");
    assert!(page.meta.title.is_empty());
    assert!(page.meta.category.is_empty());
    assert!(page.meta.tags.is_empty());
    assert!(page.meta.date >= before && page.meta.date <= after);
    assert_eq!(page.body_html, CmarkRenderer.render(raw));
}

#[test]
fn horizontal_rule_in_body_is_not_front_matter() {
    let raw = "---\ntitle: Rules\n---\nabove\n\n---\n\nbelow\n";
    let page = front_matter::parse(raw, &CmarkRenderer);
    assert_eq!(page.meta.title, "Rules");
    assert!(page.body_html.contains("<hr />"), "got: {}", page.body_html);
    assert!(page.body_html.contains("below"));
}

#[rstest]
#[case("category: notes", "notes")]
#[case("category: \"quoted notes\"", "quoted notes")]
#[case("category:    padded   ", "padded")]
fn category_values_are_normalised(#[case] line: &str, #[case] expected: &str) {
    let raw = format!("---\n{line}\n---\n");
    let page = front_matter::parse(&raw, &CmarkRenderer);
    assert_eq!(page.meta.category, expected);
}

#[test]
fn tags_are_kept_verbatim() {
    let page = front_matter::parse("---\ntags: rust, sync, cli\n---\n", &CmarkRenderer);
    assert_eq!(page.meta.tags, "rust, sync, cli");
}

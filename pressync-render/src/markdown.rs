//! Markdown to HTML rendering.

use pulldown_cmark::{html, Options, Parser};

/// Converts markdown text into an HTML fragment. Rendering never fails.
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> String;
}

impl<F> MarkdownRenderer for F
where
    F: Fn(&str) -> String,
{
    fn render(&self, markdown: &str) -> String {
        self(markdown)
    }
}

/// CommonMark renderer with the usual blog extensions (tables, footnotes,
/// strikethrough, task lists).
#[derive(Debug, Clone, Copy, Default)]
pub struct CmarkRenderer;

impl CmarkRenderer {
    fn options() -> Options {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options
    }
}

impl MarkdownRenderer for CmarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, Self::options());
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_paragraph() {
        assert_eq!(CmarkRenderer.render("Body text"), "<p>Body text</p>\n");
    }

    #[test]
    fn renders_tables() {
        let html = CmarkRenderer.render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"), "got: {html}");
    }

    #[test]
    fn empty_input_renders_empty() {
        assert_eq!(CmarkRenderer.render(""), "");
    }

    #[test]
    fn closures_are_renderers() {
        let upper = |s: &str| s.to_uppercase();
        assert_eq!(upper.render("abc"), "ABC");
    }
}

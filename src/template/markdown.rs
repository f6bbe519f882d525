//! Markdown to HTML conversion for installer pages.

use pulldown_cmark::{Options, Parser, html};

/// Document head used for converted pages. The installer renders these in a
/// small embedded web view, so a charset and a readable default font are
/// all that is wanted.
const HTML_HEAD: &str = "<head> <meta charset=\"utf-8\" /> <style> body { font-family: Helvetica, sans-serif; font-size: 14px; } </style> </head>";

/// Convert Markdown text to a complete minimal HTML document.
///
/// Tables and footnotes are enabled on top of CommonMark (which already
/// covers fenced code blocks).
pub fn to_html_document(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(markdown, options);
    let mut body = String::new();
    html::push_html(&mut body, parser);

    format!("<!DOCTYPE html>\n<html>\n{HTML_HEAD}\n<body>\n{body}\n</body>\n</html>\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_in_document() {
        let html = to_html_document("# Title");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<meta charset=\"utf-8\" />"));
        assert!(html.contains("<h1>Title</h1>"));
    }

    #[test]
    fn renders_links_and_tables() {
        let html = to_html_document("[site](https://example.com)\n\n| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<a href=\"https://example.com\">site</a>"));
        assert!(html.contains("<table>"));
    }
}

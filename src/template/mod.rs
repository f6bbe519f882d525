//! Template rendering for scripts, HTML pages, and the Distribution descriptor.
//!
//! Rendering uses handlebars with HTML escaping disabled and non-strict
//! variable lookup: a variable absent from the mapping renders as empty
//! text, matching the engine's default behavior. Welcome and conclusion
//! pages may start life as Markdown; those are converted to a minimal
//! styled HTML document after template rendering.

pub mod builtin;
mod markdown;

use crate::error::{Error, ErrorExt, Result};
use crate::util::fs;
use handlebars::Handlebars;
use std::path::Path;

pub use markdown::to_html_document;

/// Extensions treated as Markdown sources for the welcome/conclusion pages.
const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Renders templates against a variable mapping.
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    /// Create a renderer with HTML escaping disabled.
    ///
    /// Scripts and the Distribution descriptor are not HTML documents;
    /// values must land in the output verbatim.
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        Self { registry }
    }

    /// Render template text to a string.
    ///
    /// `name` identifies the template in error messages only.
    pub fn render_str(
        &self,
        name: &str,
        template: &str,
        data: &serde_json::Value,
    ) -> Result<String> {
        self.registry
            .render_template(template, data)
            .map_err(|e| Error::Template {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }

    /// Render template text into a file, creating parent directories first.
    pub async fn render_file(
        &self,
        name: &str,
        template: &str,
        data: &serde_json::Value,
        output: &Path,
    ) -> Result<()> {
        let rendered = self.render_str(name, template, data)?;
        fs::write_file(output, &rendered).await
    }

    /// Render a user-supplied template file into an output file.
    pub async fn render_user_file(
        &self,
        source: &Path,
        data: &serde_json::Value,
        output: &Path,
    ) -> Result<()> {
        let template = tokio::fs::read_to_string(source)
            .await
            .fs_context("reading template file", source)?;
        self.render_file(&source.display().to_string(), &template, data, output)
            .await
    }

    /// Render a welcome/conclusion page into an HTML file.
    ///
    /// Loads `source` if given, else the named built-in. The Markdown path
    /// applies when the source has a Markdown extension or when no user
    /// file was given (the built-in pages are Markdown); an HTML source is
    /// rendered as plain templated text.
    pub async fn render_html_page(
        &self,
        source: Option<&Path>,
        builtin_name: &str,
        builtin: &str,
        data: &serde_json::Value,
        output: &Path,
    ) -> Result<()> {
        let (name, template, is_markdown) = match source {
            Some(path) => {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .fs_context("reading template file", path)?;
                let is_markdown = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| MARKDOWN_EXTENSIONS.iter().any(|m| e.eq_ignore_ascii_case(m)))
                    .unwrap_or(false);
                (path.display().to_string(), text, is_markdown)
            }
            None => (builtin_name.to_string(), builtin.to_string(), true),
        };

        let rendered = self.render_str(&name, &template, data)?;
        let html = if is_markdown {
            to_html_document(&rendered)
        } else {
            rendered
        };
        fs::write_file(output, &html).await
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_variables() {
        let renderer = Renderer::new();
        let out = renderer
            .render_str(
                "identifier",
                "com.example.{{ app }}",
                &json!({"app": "myapp"}),
            )
            .unwrap();
        assert_eq!(out, "com.example.myapp");
    }

    #[test]
    fn absent_variables_render_empty() {
        let renderer = Renderer::new();
        let out = renderer
            .render_str("t", "a{{ missing }}b", &json!({}))
            .unwrap();
        assert_eq!(out, "ab");
    }

    #[test]
    fn values_are_not_html_escaped() {
        let renderer = Renderer::new();
        let out = renderer
            .render_str("t", "{{ v }}", &json!({"v": "a & b <c>"}))
            .unwrap();
        assert_eq!(out, "a & b <c>");
    }

    #[test]
    fn syntax_errors_name_the_template() {
        let renderer = Renderer::new();
        let err = renderer
            .render_str("broken", "{{#if x}}no close", &json!({}))
            .unwrap_err();
        assert!(err.to_string().contains("broken"));
    }
}

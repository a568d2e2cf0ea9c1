//! Fragment to HTML conversion.
//!
//! Turns the JSX-like text captured inside a marker into a standalone HTML
//! page. Expressions in braces have no static value and are dropped.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use seo_export_core::{ExtractedFragment, MarkerNames};
use thiserror::Error;
use tracing::debug;

use crate::template::{TemplateContext, TemplateError, TemplateRegistry, escape_html};

const PLACEHOLDER_OPEN: &str = "<span data-placeholder>";
const PLACEHOLDER_CLOSE: &str = "</span>";
const PLACEHOLDER_SELECTOR_STR: &str = "span[data-placeholder]";
const LINK_REPLACEMENT: &str = r#"<a href="${1}"${2}>${3}</a>"#;

static PLACEHOLDER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(PLACEHOLDER_SELECTOR_STR)
        .expect("Failed to parse placeholder selector - this is a bug")
});

/// Conversion errors.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A marker-derived pattern failed to compile.
    #[error("invalid pattern for <{tag}>: {source}")]
    Pattern {
        tag: String,
        #[source]
        source: regex::Error,
    },

    /// Page template rendering failed.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
}

/// Result type for conversion.
pub type Result<T> = std::result::Result<T, ConvertError>;

fn marker_regex(tag: &str, pattern: String) -> Result<Regex> {
    Regex::new(&pattern).map_err(|source| ConvertError::Pattern {
        tag: tag.to_string(),
        source,
    })
}

/// Converts extracted fragments into HTML pages.
#[derive(Debug, Clone)]
pub struct HtmlConverter {
    link: Regex,
    seo: Regex,
    nested_marker: Regex,
    export_tag: String,
    lang: String,
    templates: TemplateRegistry,
}

impl HtmlConverter {
    /// Build a converter for the given marker names.
    pub fn new(markers: &MarkerNames) -> Result<Self> {
        let link = regex::escape(&markers.link);
        let seo = regex::escape(&markers.seo);
        let export = regex::escape(&markers.export);

        Ok(Self {
            link: marker_regex(
                &markers.link,
                format!(r#"<{link}\s+to=["']([^"']+)["']([^>]*)>([\s\S]*?)</{link}>"#),
            )?,
            // metadata expressions may nest one level of braces: {{ title: "x" }}
            seo: marker_regex(
                &markers.seo,
                format!(
                    r"<{seo}\s+metadata=\{{(?:[^{{}}]|\{{[^{{}}]*\}})*\}}[^>]*?(?:/>|>[\s\S]*?</{seo}>)"
                ),
            )?,
            nested_marker: marker_regex(&markers.export, format!(r"</?{export}(?:\s[^>]*)?/?>"))?,
            export_tag: markers.export.clone(),
            lang: "en".to_string(),
            templates: TemplateRegistry::new(),
        })
    }

    /// Set the `lang` attribute written on generated pages.
    #[must_use]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Source-level cleanup, before any HTML parsing.
    pub fn clean(&self, fragment: &ExtractedFragment) -> String {
        let content = if fragment.link_mode.rewrites_links() {
            debug!(filename = %fragment.filename, "rewriting links to anchors");
            self.link
                .replace_all(&fragment.content, LINK_REPLACEMENT)
                .into_owned()
        } else {
            fragment.content.clone()
        };

        let content = self.seo.replace_all(&content, "");
        let content = self.nested_marker.replace_all(&content, "");
        let content = content
            .replace('{', PLACEHOLDER_OPEN)
            .replace('}', PLACEHOLDER_CLOSE);

        content.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Inner HTML of a fragment with every expression placeholder removed.
    pub fn body_html(&self, fragment: &ExtractedFragment) -> String {
        let mut html = Html::parse_fragment(&self.clean(fragment));
        if !html.errors.is_empty() {
            debug!(
                filename = %fragment.filename,
                errors = html.errors.len(),
                "recovered from malformed markup"
            );
        }

        let placeholders: Vec<_> = html.select(&PLACEHOLDER_SELECTOR).map(|el| el.id()).collect();
        for id in placeholders {
            if let Some(mut node) = html.tree.get_mut(id) {
                node.detach();
            }
        }

        html.root_element().inner_html()
    }

    /// Convert a fragment into a complete HTML document.
    pub fn convert(&self, fragment: &ExtractedFragment) -> Result<String> {
        let ctx = TemplateContext::new()
            .with_var("lang", escape_html(&self.lang))
            .with_var("title", escape_html(&fragment.filename))
            .with_var("body", self.body_html(fragment));

        Ok(self.templates.render("page", &ctx)?)
    }

    /// Placeholder page for a source file that had no markers.
    pub fn fallback_page(&self, title: &str, source_file: &str) -> Result<String> {
        let ctx = TemplateContext::new()
            .with_var("lang", escape_html(&self.lang))
            .with_var("title", escape_html(title))
            .with_var("source_file", comment_safe(source_file))
            .with_var("marker", escape_html(&self.export_tag));

        Ok(self.templates.render("fallback", &ctx)?)
    }
}

/// Make `text` safe inside an HTML comment by breaking up every `--`.
fn comment_safe(text: &str) -> String {
    let mut out = text.to_string();
    while out.contains("--") {
        out = out.replace("--", "- -");
    }
    out
}

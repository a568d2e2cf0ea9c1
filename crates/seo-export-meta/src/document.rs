//! Applying head state to real documents.
//!
//! [`HeadState::apply`] is pure; a [`HeadTarget`] is the thin adapter that
//! reads the current head from somewhere and writes the next one back.

use std::cell::Cell;

use lol_html::{RewriteStrSettings, element, html_content::ContentType, rewrite_str};
use scraper::{ElementRef, Html};
use thiserror::Error;
use tracing::debug;

use crate::{
    head::{HeadElement, HeadState, MetaAttribute},
    metadata::Metadata,
};

/// Document adapter errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// HTML rewriting failed.
    #[error("rewrite error: {0}")]
    Rewrite(#[from] lol_html::errors::RewritingError),
}

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Something with a head that metadata can be applied to.
pub trait HeadTarget {
    /// Read the current head state.
    fn head(&self) -> Result<HeadState>;

    /// Replace the head with `head`.
    fn commit(&mut self, head: &HeadState) -> Result<()>;
}

/// Apply `metadata` to `target`, returning the state that was written.
///
/// There is no rollback; the result stays until the next application.
pub fn apply_metadata<T: HeadTarget + ?Sized>(
    target: &mut T,
    metadata: &Metadata,
) -> Result<HeadState> {
    let current = target.head()?;
    let next = current.apply(metadata);

    if next == current {
        debug!("head already up to date");
    } else {
        target.commit(&next)?;
    }

    Ok(next)
}

/// An owned HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlDocument {
    html: String,
}

impl HtmlDocument {
    /// Wrap an HTML string.
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// The current markup.
    pub fn as_str(&self) -> &str {
        &self.html
    }

    /// Consume the document, returning its markup.
    pub fn into_string(self) -> String {
        self.html
    }
}

impl From<String> for HtmlDocument {
    fn from(html: String) -> Self {
        Self::new(html)
    }
}

impl HeadTarget for HtmlDocument {
    fn head(&self) -> Result<HeadState> {
        let document = Html::parse_document(&self.html);
        let root = document.root_element();

        let elements: Vec<HeadElement> = root
            .children()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "head")
            .map(|head| head.children().filter_map(ElementRef::wrap).map(classify).collect())
            .unwrap_or_default();

        Ok(HeadState {
            lang: root.value().attr("lang").map(str::to_string),
            elements,
        })
    }

    fn commit(&mut self, head: &HeadState) -> Result<()> {
        let inner = head.to_html();
        let seen_head = Cell::new(false);

        let rewritten = rewrite_str(
            &self.html,
            RewriteStrSettings {
                element_content_handlers: vec![
                    element!("html", |el| {
                        if let Some(lang) = &head.lang {
                            el.set_attribute("lang", lang)?;
                        }
                        Ok(())
                    }),
                    element!("head", |el| {
                        seen_head.set(true);
                        el.set_inner_content(&inner, ContentType::Html);
                        Ok(())
                    }),
                ],
                ..RewriteStrSettings::new()
            },
        )?;

        self.html = if seen_head.get() {
            rewritten
        } else {
            insert_head(&rewritten, &inner)?
        };

        Ok(())
    }
}

/// Insert a `<head>` into a document that has none.
fn insert_head(html: &str, inner: &str) -> Result<String> {
    let head = format!("<head>{inner}</head>");
    let seen_html = Cell::new(false);

    let rewritten = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("html", |el| {
                seen_html.set(true);
                el.prepend(&head, ContentType::Html);
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    )?;

    if seen_html.get() {
        Ok(rewritten)
    } else {
        Ok(format!("{head}{rewritten}"))
    }
}

/// Map a parsed head child onto a [`HeadElement`].
///
/// Canonical links and named meta tags are recognized whatever other
/// attributes they carry; those attributes are kept in `extra`.
fn classify(el: ElementRef<'_>) -> HeadElement {
    let value = el.value();

    match value.name() {
        "title" => HeadElement::Title(el.text().collect()),
        "script" if value.attr("type") == Some("application/ld+json") => {
            HeadElement::JsonLd(el.text().collect())
        }
        "link"
            if value
                .attr("rel")
                .is_some_and(|rel| rel.eq_ignore_ascii_case("canonical")) =>
        {
            match value.attr("href") {
                Some(href) => HeadElement::Canonical {
                    href: href.to_string(),
                    extra: other_attrs(el, &["rel", "href"]),
                },
                None => HeadElement::Raw(el.html()),
            }
        }
        "meta" => {
            let content = value.attr("content");
            let named = value
                .attr("name")
                .map(|key| (MetaAttribute::Name, key))
                .or_else(|| value.attr("property").map(|key| (MetaAttribute::Property, key)));

            match (named, content) {
                (Some((attribute, key)), Some(content)) => HeadElement::Meta {
                    attribute,
                    key: key.to_string(),
                    content: content.to_string(),
                    extra: other_attrs(el, &[attribute.as_str(), "content"]),
                },
                _ => HeadElement::Raw(el.html()),
            }
        }
        _ => HeadElement::Raw(el.html()),
    }
}

/// Attributes of `el` other than `known`, in parse order.
fn other_attrs(el: ElementRef<'_>, known: &[&str]) -> Vec<(String, String)> {
    el.value()
        .attrs()
        .filter(|(name, _)| !known.contains(name))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>home</title>
  <meta name="description" content="old description">
  <script type="application/ld+json">{"@type":"Thing"}</script>
</head>
<body>
  <h1>Hello</h1>
</body>
</html>"#;

    #[test]
    fn test_head_reads_existing_tags() {
        let doc = HtmlDocument::new(PAGE);
        let head = doc.head().unwrap();

        assert_eq!(head.lang.as_deref(), Some("en"));
        assert_eq!(head.title(), Some("home"));
        assert_eq!(
            head.meta(MetaAttribute::Name, "description"),
            Some("old description")
        );
        assert_eq!(
            head.meta(MetaAttribute::Name, "viewport"),
            Some("width=device-width, initial-scale=1.0")
        );
        assert_eq!(head.json_ld(), vec![r#"{"@type":"Thing"}"#]);
        assert!(matches!(&head.elements[0], HeadElement::Raw(raw) if raw.contains("charset")));
    }

    #[test]
    fn test_apply_metadata_rewrites_document() {
        let mut doc = HtmlDocument::new(PAGE);
        let metadata = Metadata::new()
            .with_title("Home page")
            .with_description("new description")
            .with_language("de")
            .with_canonical_url("https://example.com/home.html")
            .with_structured_data(json!({"@type": "WebPage"}));

        apply_metadata(&mut doc, &metadata).unwrap();
        let html = doc.as_str();

        assert!(html.contains(r#"<html lang="de">"#));
        assert!(html.contains("<title>Home page</title>"));
        assert!(html.contains(r#"content="new description""#));
        assert!(!html.contains("old description"));
        assert!(html.contains(r#"<link rel="canonical" href="https://example.com/home.html">"#));
        assert!(html.contains(r#"{"@type":"WebPage"}"#));
        assert!(!html.contains("Thing"));
        assert!(html.contains("<h1>Hello</h1>"));
    }

    #[test]
    fn test_apply_metadata_twice_leaves_single_tags() {
        let mut doc = HtmlDocument::new(PAGE);
        let metadata = Metadata::new()
            .with_description("desc")
            .with("ogTitle", "Home")
            .with_structured_data(json!({"@type": "WebPage"}));

        apply_metadata(&mut doc, &metadata).unwrap();
        apply_metadata(&mut doc, &metadata).unwrap();
        let html = doc.as_str();

        assert_eq!(html.matches("application/ld+json").count(), 1);
        assert_eq!(html.matches(r#"name="description""#).count(), 1);
        assert_eq!(html.matches(r#"property="og:title""#).count(), 1);
    }

    #[test]
    fn test_tags_with_extra_attributes_are_updated_in_place() {
        let mut doc = HtmlDocument::new(
            r#"<html><head>
<meta name="description" content="old" data-rh="true">
<link rel="canonical" href="https://old/" data-rh="true">
</head><body></body></html>"#,
        );
        let metadata = Metadata::new()
            .with_description("new")
            .with_canonical_url("https://new/");

        apply_metadata(&mut doc, &metadata).unwrap();
        apply_metadata(&mut doc, &metadata).unwrap();
        let html = doc.as_str();

        assert_eq!(html.matches(r#"name="description""#).count(), 1);
        assert_eq!(html.matches(r#"rel="canonical""#).count(), 1);
        assert!(html.contains(r#"content="new""#));
        assert!(html.contains(r#"href="https://new/""#));
        assert!(!html.contains("old"));
        assert_eq!(html.matches(r#"data-rh="true""#).count(), 2);
    }

    #[test]
    fn test_commit_inserts_missing_head() {
        let mut doc = HtmlDocument::new("<html><body><p>x</p></body></html>");
        apply_metadata(&mut doc, &Metadata::new().with_title("Inserted")).unwrap();

        assert!(doc.as_str().contains("<head>"));
        assert!(doc.as_str().contains("<title>Inserted</title>"));
        assert!(doc.as_str().contains("<p>x</p>"));
    }

    #[test]
    fn test_unchanged_document_is_left_alone() {
        let mut doc = HtmlDocument::new(PAGE);
        apply_metadata(&mut doc, &Metadata::new()).unwrap();
        // the ld+json script is dropped because no structured data was given
        assert!(!doc.as_str().contains("Thing"));

        let before = doc.clone();
        apply_metadata(&mut doc, &Metadata::new()).unwrap();
        assert_eq!(doc, before);
    }
}

//! Document head state and the pure metadata transition.

use serde_json::Value;

use crate::metadata::{Metadata, is_truthy};

/// Attribute that names a meta tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaAttribute {
    /// `<meta name="…">`
    Name,
    /// `<meta property="…">`
    Property,
}

impl MetaAttribute {
    /// Attribute name as written in HTML.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Property => "property",
        }
    }
}

/// A single child of `<head>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadElement {
    /// `<title>`
    Title(String),

    /// `<meta name|property="key" content="…">`
    ///
    /// `extra` holds any other attributes the tag carried, such as the
    /// `data-*` markers head managers add. They survive content updates.
    Meta {
        attribute: MetaAttribute,
        key: String,
        content: String,
        extra: Vec<(String, String)>,
    },

    /// `<link rel="canonical" href="…">`, plus any other attributes.
    Canonical {
        href: String,
        extra: Vec<(String, String)>,
    },

    /// `<script type="application/ld+json">`, holding the serialized payload.
    JsonLd(String),

    /// Any other element, kept verbatim.
    Raw(String),
}

impl HeadElement {
    /// Render this element as HTML.
    pub fn to_html(&self) -> String {
        match self {
            Self::Title(title) => format!("<title>{}</title>", escape_text(title)),
            Self::Meta {
                attribute,
                key,
                content,
                extra,
            } => format!(
                r#"<meta {}="{}" content="{}"{}>"#,
                attribute.as_str(),
                escape_attr(key),
                escape_attr(content),
                render_attrs(extra)
            ),
            Self::Canonical { href, extra } => format!(
                r#"<link rel="canonical" href="{}"{}>"#,
                escape_attr(href),
                render_attrs(extra)
            ),
            Self::JsonLd(json) => format!(r#"<script type="application/ld+json">{json}</script>"#),
            Self::Raw(html) => html.clone(),
        }
    }
}

/// The observable state of a document head.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadState {
    /// `lang` attribute of the root `<html>` element.
    pub lang: Option<String>,

    /// Children of `<head>`, in document order.
    pub elements: Vec<HeadElement>,
}

impl HeadState {
    /// Create an empty head.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current title, if any.
    pub fn title(&self) -> Option<&str> {
        self.elements.iter().find_map(|e| match e {
            HeadElement::Title(t) => Some(t.as_str()),
            _ => None,
        })
    }

    /// Set the title, updating an existing `<title>` in place.
    pub fn set_title(&mut self, title: &str) {
        for element in &mut self.elements {
            if let HeadElement::Title(existing) = element {
                *existing = title.to_string();
                return;
            }
        }
        self.elements.push(HeadElement::Title(title.to_string()));
    }

    /// Content of the first meta tag with the given key.
    pub fn meta(&self, attribute: MetaAttribute, key: &str) -> Option<&str> {
        self.elements.iter().find_map(|e| match e {
            HeadElement::Meta {
                attribute: a,
                key: k,
                content,
                ..
            } if *a == attribute && k == key => Some(content.as_str()),
            _ => None,
        })
    }

    /// Update the first matching meta tag in place, or append a new one.
    pub fn upsert_meta(&mut self, attribute: MetaAttribute, key: &str, content: &str) {
        for element in &mut self.elements {
            if let HeadElement::Meta {
                attribute: a,
                key: k,
                content: existing,
                ..
            } = element
                && *a == attribute
                && k == key
            {
                *existing = content.to_string();
                return;
            }
        }
        self.elements.push(HeadElement::Meta {
            attribute,
            key: key.to_string(),
            content: content.to_string(),
            extra: Vec::new(),
        });
    }

    /// Current canonical URL, if any.
    pub fn canonical(&self) -> Option<&str> {
        self.elements.iter().find_map(|e| match e {
            HeadElement::Canonical { href, .. } => Some(href.as_str()),
            _ => None,
        })
    }

    /// Set the canonical URL, updating an existing link in place.
    pub fn set_canonical(&mut self, href: &str) {
        for element in &mut self.elements {
            if let HeadElement::Canonical { href: existing, .. } = element {
                *existing = href.to_string();
                return;
            }
        }
        self.elements.push(HeadElement::Canonical {
            href: href.to_string(),
            extra: Vec::new(),
        });
    }

    /// Serialized JSON-LD payloads, in document order.
    pub fn json_ld(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                HeadElement::JsonLd(json) => Some(json.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Compute the head that results from applying `metadata`.
    ///
    /// Existing JSON-LD scripts are always removed; the canonical link and
    /// matching meta tags are updated in place. Applying the same metadata
    /// twice yields the same state.
    #[must_use]
    pub fn apply(&self, metadata: &Metadata) -> HeadState {
        let mut next = self.clone();

        if let Some(title) = metadata.title.as_deref().filter(|t| !t.is_empty()) {
            next.set_title(title);
        }

        next.elements
            .retain(|e| !matches!(e, HeadElement::JsonLd(_)));
        if let Some(data) = metadata.structured_data.as_ref().filter(|v| is_truthy(v)) {
            next.elements.push(HeadElement::JsonLd(json_ld_payload(data)));
        }

        if let Some(url) = metadata.canonical_url.as_deref().filter(|u| !u.is_empty()) {
            next.set_canonical(url);
        }

        for (key, content) in metadata.meta_tags() {
            next.upsert_meta(key.attribute, &key.name, &content);
        }

        if let Some(lang) = metadata.language.as_deref().filter(|l| !l.is_empty()) {
            next.lang = Some(lang.to_string());
        }

        next
    }

    /// Render the children of `<head>`.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for element in &self.elements {
            html.push_str("\n  ");
            html.push_str(&element.to_html());
        }
        html.push('\n');
        html
    }
}

/// Serialize a JSON-LD payload so it cannot terminate its script element.
fn json_ld_payload(data: &Value) -> String {
    data.to_string().replace("</", "<\\/")
}

/// Render extra attributes, each with a leading space.
fn render_attrs(attrs: &[(String, String)]) -> String {
    attrs
        .iter()
        .map(|(name, value)| format!(r#" {name}="{}""#, escape_attr(value)))
        .collect()
}

/// Escape text content.
fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value.
fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn base_head() -> HeadState {
        HeadState {
            lang: Some("en".to_string()),
            elements: vec![
                HeadElement::Raw(r#"<meta charset="UTF-8">"#.to_string()),
                HeadElement::Title("home".to_string()),
            ],
        }
    }

    fn full_metadata() -> Metadata {
        Metadata::new()
            .with_title("Home page")
            .with_description("Home page of the app")
            .with_canonical_url("https://example.com/")
            .with_language("fr")
            .with_structured_data(json!({"@type": "WebSite", "name": "Example"}))
            .with("ogTitle", "Home")
            .with("twitterCard", "summary")
    }

    #[test]
    fn test_apply_sets_everything() {
        let next = base_head().apply(&full_metadata());

        assert_eq!(next.title(), Some("Home page"));
        assert_eq!(next.lang.as_deref(), Some("fr"));
        assert_eq!(next.canonical(), Some("https://example.com/"));
        assert_eq!(
            next.meta(MetaAttribute::Name, "description"),
            Some("Home page of the app")
        );
        assert_eq!(next.meta(MetaAttribute::Property, "og:title"), Some("Home"));
        assert_eq!(next.meta(MetaAttribute::Name, "twitter:card"), Some("summary"));
        assert_eq!(next.json_ld().len(), 1);
        // the charset tag is untouched and stays first
        assert!(matches!(&next.elements[0], HeadElement::Raw(_)));
    }

    #[test]
    fn test_apply_twice_is_idempotent() {
        let metadata = full_metadata();
        let once = base_head().apply(&metadata);
        let twice = once.apply(&metadata);

        assert_eq!(once, twice);
        assert_eq!(twice.json_ld().len(), 1);
        let descriptions = twice
            .elements
            .iter()
            .filter(|e| matches!(e, HeadElement::Meta { key, .. } if key == "description"))
            .count();
        assert_eq!(descriptions, 1);
    }

    #[test]
    fn test_apply_replaces_structured_data() {
        let first = Metadata::new().with_structured_data(json!({"@type": "Article"}));
        let second = Metadata::new().with_structured_data(json!({"@type": "Product"}));

        let head = HeadState::new().apply(&first).apply(&second);

        assert_eq!(head.json_ld(), vec![r#"{"@type":"Product"}"#]);
    }

    #[test]
    fn test_apply_without_structured_data_clears_scripts() {
        let with = Metadata::new().with_structured_data(json!({"@type": "Article"}));
        let head = HeadState::new().apply(&with).apply(&Metadata::new());

        assert!(head.json_ld().is_empty());
    }

    #[test]
    fn test_apply_updates_existing_meta_in_place() {
        let mut head = HeadState::new();
        head.upsert_meta(MetaAttribute::Name, "description", "old");
        head.elements.push(HeadElement::Raw("<link rel=\"icon\" href=\"/favicon.ico\">".into()));

        let next = head.apply(&Metadata::new().with_description("new"));

        assert_eq!(next.elements.len(), 2);
        assert_eq!(next.meta(MetaAttribute::Name, "description"), Some("new"));
    }

    #[test]
    fn test_update_keeps_extra_attributes() {
        let head = HeadState {
            lang: None,
            elements: vec![
                HeadElement::Meta {
                    attribute: MetaAttribute::Name,
                    key: "description".to_string(),
                    content: "old".to_string(),
                    extra: vec![("data-rh".to_string(), "true".to_string())],
                },
                HeadElement::Canonical {
                    href: "https://old/".to_string(),
                    extra: vec![("data-rh".to_string(), "true".to_string())],
                },
            ],
        };

        let next = head.apply(
            &Metadata::new()
                .with_description("new")
                .with_canonical_url("https://new/"),
        );

        assert_eq!(next.elements.len(), 2);
        let html = next.to_html();
        assert!(html.contains(r#"<meta name="description" content="new" data-rh="true">"#));
        assert!(html.contains(r#"<link rel="canonical" href="https://new/" data-rh="true">"#));
    }

    #[test]
    fn test_json_ld_payload_is_script_safe() {
        let head = HeadState::new()
            .apply(&Metadata::new().with_structured_data(json!({"name": "</script>"})));
        assert!(!head.to_html().contains("</script>\"}"));
        assert!(head.json_ld()[0].contains("<\\/script>"));
    }

    #[test]
    fn test_to_html_escapes() {
        let mut head = HeadState::new();
        head.set_title("Tom & Jerry");
        head.upsert_meta(MetaAttribute::Name, "description", "say \"hi\"");

        let html = head.to_html();
        assert!(html.contains("<title>Tom &amp; Jerry</title>"));
        assert!(html.contains(r#"content="say &quot;hi&quot;""#));
    }
}

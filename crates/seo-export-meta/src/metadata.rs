//! The metadata record and its mapping onto head tags.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::head::MetaAttribute;

/// SEO metadata for a single page.
///
/// Recognized keys are typed fields. Every other key lands in `extra`:
/// `og*` keys become `<meta property="og:…">`, `twitter*` keys become
/// `<meta name="twitter:…">`, and the rest become `<meta name="…">`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Document title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,

    /// Canonical URL, written to `<link rel="canonical">`.
    #[serde(default, alias = "canonical_url", skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,

    /// Robots directive (e.g., "noindex, nofollow").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robots: Option<String>,

    /// Document language, written to `<html lang>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// JSON-LD payload.
    #[serde(
        default,
        alias = "structured_data",
        skip_serializing_if = "Option::is_none"
    )]
    pub structured_data: Option<Value>,

    /// Open Graph, Twitter card, and arbitrary additional keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Where a metadata key is written in the head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaKey {
    /// Attribute that carries the key.
    pub attribute: MetaAttribute,
    /// Attribute value (e.g., "og:title").
    pub name: String,
}

impl MetaKey {
    /// Map a metadata key to its meta tag.
    ///
    /// `ogImage` → `property="og:image"`, `twitterCard` → `name="twitter:card"`,
    /// `author` → `name="author"`.
    pub fn for_key(key: &str) -> Self {
        if let Some(suffix) = namespaced_suffix(key, "og") {
            return Self {
                attribute: MetaAttribute::Property,
                name: format!("og:{suffix}"),
            };
        }
        if let Some(suffix) = namespaced_suffix(key, "twitter") {
            return Self {
                attribute: MetaAttribute::Name,
                name: format!("twitter:{suffix}"),
            };
        }
        Self {
            attribute: MetaAttribute::Name,
            name: key.to_string(),
        }
    }
}

fn namespaced_suffix(key: &str, prefix: &str) -> Option<String> {
    let rest = key.strip_prefix(prefix)?;
    let rest = rest.trim_start_matches(['_', ':', '-']);
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_lowercase())
    }
}

impl Metadata {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the canonical URL.
    #[must_use]
    pub fn with_canonical_url(mut self, url: impl Into<String>) -> Self {
        self.canonical_url = Some(url.into());
        self
    }

    /// Set the document language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the JSON-LD payload.
    #[must_use]
    pub fn with_structured_data(mut self, data: Value) -> Self {
        self.structured_data = Some(data);
        self
    }

    /// Set an additional key.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Meta tags this record produces, in application order.
    ///
    /// Title, canonical URL, and structured data have dedicated elements and
    /// are not included. Falsy values are skipped.
    pub fn meta_tags(&self) -> Vec<(MetaKey, String)> {
        let known = [
            ("description", self.description.as_deref()),
            ("keywords", self.keywords.as_deref()),
            ("robots", self.robots.as_deref()),
            ("language", self.language.as_deref()),
            ("author", self.author.as_deref()),
        ];

        let known = known.into_iter().filter_map(|(key, value)| {
            value
                .filter(|v| !v.is_empty())
                .map(|v| (MetaKey::for_key(key), v.to_string()))
        });

        let extra = self
            .extra
            .iter()
            .filter(|(_, value)| is_truthy(value))
            .map(|(key, value)| (MetaKey::for_key(key), value_to_content(value)));

        known.chain(extra).collect()
    }
}

/// Whether a value counts as set. Empty strings, `false`, zero and `null` do not.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_to_content(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

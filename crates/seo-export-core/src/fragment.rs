//! Extracted fragments and the collection they accumulate in.

use std::{path::Path, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;

/// How internal navigation tags inside a fragment are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkMode {
    /// Navigation tags are left as they are.
    #[default]
    None,
    /// Navigation tags are rewritten to plain anchors before parsing.
    Link,
}

impl LinkMode {
    /// Interpret the raw value of a marker's `to` attribute.
    ///
    /// Only `link` enables rewriting; any other value leaves links alone.
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some("link") => Self::Link,
            _ => Self::None,
        }
    }

    /// Whether navigation tags should be rewritten.
    pub fn rewrites_links(&self) -> bool {
        matches!(self, Self::Link)
    }
}

/// One discovered marker instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtractedFragment {
    /// Output base name (without `.html`).
    pub filename: String,

    /// Raw inner text between the marker's opening and closing tags.
    pub content: String,

    /// Originating file name, for diagnostics.
    pub source_file: String,

    /// Link rewriting mode.
    #[serde(default)]
    pub link_mode: LinkMode,
}

impl ExtractedFragment {
    /// Create a new fragment.
    pub fn new(
        filename: impl Into<String>,
        content: impl Into<String>,
        source_file: impl Into<String>,
        link_mode: LinkMode,
    ) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            source_file: source_file.into(),
            link_mode,
        }
    }

    /// Output file name for this fragment.
    pub fn output_name(&self) -> String {
        format!("{}.html", self.filename)
    }
}

/// Default output name for a source file: the text before the first `.` of
/// its file name, lowercased.
///
/// `src/components/Dash.tsx` → `dash`, `Home.test.jsx` → `home`.
pub fn default_filename(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    name.split('.').next().unwrap_or_default().to_lowercase()
}

/// What to do with a fragment identical to one already collected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Append every discovery, identical or not.
    #[default]
    Keep,
    /// Skip fragments equal in every field to one already collected.
    Drop,
}

impl FromStr for DuplicatePolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keep" => Ok(Self::Keep),
            "drop" => Ok(Self::Drop),
            _ => Err(CoreError::invalid_option("export.duplicates", s)),
        }
    }
}

/// Accumulator threaded through scan, transform and emit.
#[derive(Debug, Clone, Default)]
pub struct FragmentCollection {
    fragments: Vec<ExtractedFragment>,
    policy: DuplicatePolicy,
}

impl FragmentCollection {
    /// Create an empty collection with the given duplicate policy.
    #[must_use]
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            fragments: Vec::new(),
            policy,
        }
    }

    /// Append a fragment. Returns `false` when the policy dropped it.
    pub fn push(&mut self, fragment: ExtractedFragment) -> bool {
        if self.policy == DuplicatePolicy::Drop && self.fragments.contains(&fragment) {
            debug!(
                filename = %fragment.filename,
                source = %fragment.source_file,
                "dropping duplicate fragment"
            );
            return false;
        }
        self.fragments.push(fragment);
        true
    }

    /// Append several fragments, returning how many were kept.
    pub fn extend(&mut self, fragments: impl IntoIterator<Item = ExtractedFragment>) -> usize {
        fragments
            .into_iter()
            .map(|f| self.push(f))
            .filter(|kept| *kept)
            .count()
    }

    /// Duplicate policy in effect.
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Number of collected fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Iterate over fragments in discovery order.
    pub fn iter(&self) -> std::slice::Iter<'_, ExtractedFragment> {
        self.fragments.iter()
    }

    /// Fragments in discovery order.
    pub fn as_slice(&self) -> &[ExtractedFragment] {
        &self.fragments
    }
}

impl<'a> IntoIterator for &'a FragmentCollection {
    type Item = &'a ExtractedFragment;
    type IntoIter = std::slice::Iter<'a, ExtractedFragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

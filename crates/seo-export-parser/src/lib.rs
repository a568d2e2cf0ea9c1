//! seo-export Parser Library
//!
//! Locates export markers in JSX source text without compiling it.

pub mod attrs;
pub mod markup;

use std::path::Path;

pub use attrs::MarkerAttributes;
pub use markup::{Tag, TagKind, Tokenizer};
use regex::Regex;
use seo_export_core::{ExtractStrategy, ExtractedFragment, LinkMode, default_filename};
use thiserror::Error;
use tracing::{debug, info};

/// Parser errors.
#[derive(Debug, Error)]
pub enum ParserError {
    /// The marker pattern could not be compiled.
    #[error("invalid marker pattern for <{tag}>: {source}")]
    Pattern {
        tag: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// One marker occurrence in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerMatch<'a> {
    /// Raw attribute text of the opening tag.
    pub attributes: &'a str,
    /// Raw text between the opening and closing tags.
    pub content: &'a str,
    /// Byte offset of the opening tag.
    pub offset: usize,
}

/// Extracts marker fragments from source text.
#[derive(Debug, Clone)]
pub struct MarkerExtractor {
    tag: String,
    strategy: ExtractStrategy,
    pattern: Regex,
}

impl MarkerExtractor {
    /// Create an extractor for markers named `tag`.
    pub fn new(tag: &str, strategy: ExtractStrategy) -> Result<Self> {
        let pattern = format!(
            r"<{name}(?:\s+([^>]*))?>([\s\S]*?)</{name}>",
            name = regex::escape(tag)
        );
        let pattern = Regex::new(&pattern).map_err(|source| ParserError::Pattern {
            tag: tag.to_string(),
            source,
        })?;

        Ok(Self {
            tag: tag.to_string(),
            strategy,
            pattern,
        })
    }

    /// Marker tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Strategy in use.
    pub fn strategy(&self) -> ExtractStrategy {
        self.strategy
    }

    /// Find marker occurrences, ordered by the position of their opening tag.
    pub fn find<'a>(&self, source: &'a str) -> Vec<MarkerMatch<'a>> {
        match self.strategy {
            ExtractStrategy::Structural => self.find_structural(source),
            ExtractStrategy::Pattern => self.find_pattern(source),
        }
    }

    /// Depth-tracking match over the tag stream.
    ///
    /// Nested markers keep the whole outer content and also yield their own
    /// match. Self-closing and unclosed markers yield nothing.
    fn find_structural<'a>(&self, source: &'a str) -> Vec<MarkerMatch<'a>> {
        let mut open: Vec<Tag<'a>> = Vec::new();
        let mut found = Vec::new();

        for tag in Tokenizer::new(source).filter(|t| t.name == self.tag) {
            match tag.kind {
                TagKind::Open { self_closing: true } => {
                    debug!(offset = tag.start, "skipping self-closing marker");
                }
                TagKind::Open { self_closing: false } => open.push(tag),
                TagKind::Close => match open.pop() {
                    Some(start) => found.push(MarkerMatch {
                        attributes: start.attributes,
                        content: &source[start.end..tag.start],
                        offset: start.start,
                    }),
                    None => debug!(offset = tag.start, "ignoring stray closing marker"),
                },
            }
        }

        for unclosed in &open {
            debug!(offset = unclosed.start, "ignoring unclosed marker");
        }

        found.sort_by_key(|m| m.offset);
        found
    }

    /// Non-greedy regex match; stops at the first closing marker.
    fn find_pattern<'a>(&self, source: &'a str) -> Vec<MarkerMatch<'a>> {
        self.pattern
            .captures_iter(source)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some(MarkerMatch {
                    attributes: caps.get(1).map_or("", |m| m.as_str()),
                    content: caps.get(2).map_or("", |m| m.as_str()),
                    offset: whole.start(),
                })
            })
            .collect()
    }

    /// Extract fragments from the text of the file at `path`.
    ///
    /// The path only supplies the default filename and the diagnostic source
    /// name; nothing is read from disk.
    pub fn extract(&self, source: &str, path: &Path) -> Vec<ExtractedFragment> {
        let source_file = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let fragments: Vec<_> = self
            .find(source)
            .into_iter()
            .map(|m| {
                let attrs = MarkerAttributes::parse(m.attributes);
                let filename = attrs.filename.unwrap_or_else(|| default_filename(path));
                let link_mode = LinkMode::from_attribute(attrs.to.as_deref());

                debug!(
                    source = %source_file,
                    filename = %filename,
                    ?link_mode,
                    "found marker"
                );

                ExtractedFragment::new(filename, m.content, source_file.clone(), link_mode)
            })
            .collect();

        if fragments.is_empty() {
            info!(source = %source_file, tag = %self.tag, "no markers found");
            debug!(sample = %sample(source), "file content sample");
        }

        fragments
    }
}

/// First 200 characters of `source`.
fn sample(source: &str) -> &str {
    match source.char_indices().nth(200) {
        Some((idx, _)) => &source[..idx],
        None => source,
    }
}

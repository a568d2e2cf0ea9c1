//! Marker attribute parsing.

use std::sync::LazyLock;

use regex::Regex;

/// Compile a regex that is a compile-time constant.
fn compile_regex_unsafe(pattern: &str, context: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!("Failed to compile regex '{pattern}' in {context}: {e}. This is a programming error.")
    })
}

// Each attribute has its own pattern so attribute order does not matter.
// The leading boundary keeps `data-filename=` and `goto=` from matching.
static FILENAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(r#"(?:^|\s)filename=["']([^"']+)["']"#, "FILENAME_RE")
});
static TO_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r#"(?:^|\s)to=["']([^"']+)["']"#, "TO_RE"));

/// Attributes understood on an export marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerAttributes {
    /// Explicit output base name.
    pub filename: Option<String>,
    /// Raw `to` value; `link` enables link rewriting.
    pub to: Option<String>,
}

impl MarkerAttributes {
    /// Parse the raw attribute text of a marker's opening tag.
    ///
    /// Missing or malformed attributes are simply absent from the result.
    pub fn parse(raw: &str) -> Self {
        Self {
            filename: capture(&FILENAME_RE, raw),
            to: capture(&TO_RE, raw),
        }
    }
}

fn capture(re: &Regex, raw: &str) -> Option<String> {
    re.captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

//! Page templates.
//!
//! Plain `{{ variable }}` interpolation; `{{ variable? }}` renders empty when
//! the variable is unset.

use std::collections::HashMap;

use thiserror::Error;

/// Failures while filling in a page template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A required placeholder had no value.
    #[error("template `{template}` has no value for `{name}`")]
    MissingVariable { template: String, name: String },

    /// No template is registered under this name.
    #[error("no template named `{0}`")]
    NotFound(String),

    /// A `{{` was never closed.
    #[error("template `{template}` has an unclosed placeholder at byte {offset}")]
    Unclosed { template: String, offset: usize },
}

/// Result alias for rendering.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Values for a template's placeholders, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    /// A context with no values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, overwriting an earlier value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Value for `key`, if set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

/// A named page template with `{{ key }}` placeholders.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    content: String,
}

impl Template {
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fill in every placeholder from `context`.
    ///
    /// The template is scanned once and values are copied to the output, so
    /// a value containing `{{` is written verbatim.
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        let mut out = String::with_capacity(self.content.len());
        let mut rest = self.content.as_str();

        while let Some(open) = rest.find("{{") {
            out.push_str(&rest[..open]);
            let after = &rest[open + 2..];
            let close = after.find("}}").ok_or_else(|| TemplateError::Unclosed {
                template: self.name.clone(),
                offset: self.content.len() - rest.len() + open,
            })?;

            let placeholder = after[..close].trim();
            let (key, optional) = placeholder
                .strip_suffix('?')
                .map_or((placeholder, false), |key| (key, true));

            match context.get(key) {
                Some(value) => out.push_str(value),
                None if optional => {}
                None => {
                    return Err(TemplateError::MissingVariable {
                        template: self.name.clone(),
                        name: key.to_string(),
                    });
                }
            }

            rest = &after[close + 2..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

/// Registry of page templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    /// Create a registry holding the built-in `page` and `fallback` templates.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register(Template::new("page", DEFAULT_PAGE_TEMPLATE));
        registry.register(Template::new("fallback", DEFAULT_FALLBACK_TEMPLATE));
        registry
    }

    /// Add `template`; an existing one with the same name is dropped.
    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.name.clone(), template);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Render a named template with the given context.
    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        let template = self
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        template.render(context)
    }
}

/// Escape text for use in HTML text or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Page wrapping converted fragment markup.
pub const DEFAULT_PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="{{ lang }}">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{{ title }}</title>
</head>
<body>
  {{ body }}
</body>
</html>"#;

/// Placeholder page written when no fragments were found.
pub const DEFAULT_FALLBACK_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="{{ lang }}">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{{ title }}</title>
</head>
<body>
  <!-- Generated from {{ source_file }} -->
  <p>This is a fallback export. Add {{ marker }} components to customize the content.</p>
</body>
</html>"#;

//! Export configuration management.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    str::FromStr,
};

use seo_export_meta::Metadata;
use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    fragment::DuplicatePolicy,
};

/// Main configuration structure for seo-export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Scanning and output settings.
    #[serde(default)]
    pub export: ExportConfig,

    /// Tag names of the marker components.
    #[serde(default)]
    pub markers: MarkerNames,

    /// Sitemap settings.
    #[serde(default)]
    pub sitemap: SitemapOptions,

    /// Robots.txt settings.
    #[serde(default)]
    pub robots: RobotsOptions,

    /// Per-page head metadata, keyed by output base name.
    #[serde(default)]
    pub metadata: BTreeMap<String, Metadata>,
}

/// How marker components are located in source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractStrategy {
    /// Tokenize tags and match markers by nesting depth.
    #[default]
    Structural,
    /// Non-greedy regex; stops at the first closing marker.
    Pattern,
}

impl FromStr for ExtractStrategy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "structural" => Ok(Self::Structural),
            "pattern" => Ok(Self::Pattern),
            _ => Err(CoreError::invalid_option("export.strategy", s)),
        }
    }
}

/// Scanning and output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Root of the source tree to scan.
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Directory generated artifacts are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// File extensions that are scanned for markers.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Marker extraction strategy.
    #[serde(default)]
    pub strategy: ExtractStrategy,

    /// Handling of fragments discovered more than once.
    #[serde(default)]
    pub duplicates: DuplicatePolicy,

    /// Run the incremental per-file pass after the eager directory pass.
    #[serde(default)]
    pub transform_pass: bool,
}

/// Tag names recognized in source text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerNames {
    /// Export marker wrapping a subtree.
    #[serde(default = "default_export_tag")]
    pub export: String,

    /// Metadata marker stripped from exported content.
    #[serde(default = "default_seo_tag")]
    pub seo: String,

    /// Internal navigation tag rewritten to `<a>` in link mode.
    #[serde(default = "default_link_tag")]
    pub link: String,
}

/// Sitemap configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapOptions {
    /// Whether sitemap.xml is generated.
    #[serde(default = "default_true")]
    pub enable: bool,

    /// Base URL prefixed to every entry (e.g., "https://example.com").
    #[serde(default = "default_hostname")]
    pub hostname: String,

    /// Literal `<changefreq>` value.
    #[serde(default = "default_changefreq")]
    pub changefreq: String,

    /// Literal `<priority>` value for non-root entries.
    #[serde(default = "default_priority")]
    pub priority: String,
}

/// Robots.txt configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotsOptions {
    /// Whether robots.txt is generated.
    #[serde(default = "default_true")]
    pub enable: bool,

    /// Stanzas, rendered in order.
    #[serde(default = "default_rules")]
    pub rules: Vec<RobotsRule>,
}

/// A single `User-agent` stanza.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotsRule {
    /// Crawler the stanza applies to.
    #[serde(alias = "userAgent")]
    pub user_agent: String,

    /// Allowed path prefixes.
    #[serde(default)]
    pub allow: Vec<String>,

    /// Disallowed path prefixes.
    #[serde(default)]
    pub disallow: Vec<String>,
}

// Default value functions
fn default_source_dir() -> PathBuf {
    PathBuf::from("src")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_extensions() -> Vec<String> {
    vec!["tsx".to_string(), "jsx".to_string()]
}

fn default_export_tag() -> String {
    "Export".to_string()
}

fn default_seo_tag() -> String {
    "SEO".to_string()
}

fn default_link_tag() -> String {
    "Link".to_string()
}

fn default_true() -> bool {
    true
}

fn default_hostname() -> String {
    "https://example.com".to_string()
}

fn default_changefreq() -> String {
    "weekly".to_string()
}

fn default_priority() -> String {
    "0.8".to_string()
}

fn default_rules() -> Vec<RobotsRule> {
    vec![RobotsRule {
        user_agent: "*".to_string(),
        allow: vec!["/".to_string()],
        disallow: vec!["/private/".to_string(), "/admin/".to_string()],
    }]
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            output_dir: default_output_dir(),
            extensions: default_extensions(),
            strategy: ExtractStrategy::default(),
            duplicates: DuplicatePolicy::default(),
            transform_pass: false,
        }
    }
}

impl Default for MarkerNames {
    fn default() -> Self {
        Self {
            export: default_export_tag(),
            seo: default_seo_tag(),
            link: default_link_tag(),
        }
    }
}

impl Default for SitemapOptions {
    fn default() -> Self {
        Self {
            enable: true,
            hostname: default_hostname(),
            changefreq: default_changefreq(),
            priority: default_priority(),
        }
    }
}

impl Default for RobotsOptions {
    fn default() -> Self {
        Self {
            enable: true,
            rules: default_rules(),
        }
    }
}

impl ExportConfig {
    /// Whether a path has one of the scanned extensions.
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|allowed| allowed == ext))
    }
}

impl SitemapOptions {
    /// Get the full URL for a path below the hostname.
    pub fn url_for(&self, path: &str) -> String {
        // A hostname written with a trailing slash must not yield `//` here.
        let base = self.hostname.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration, layering `SEO_EXPORT__*` environment variables on
    /// top of the file.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("SEO_EXPORT").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file when it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_with_env(path)
        } else {
            tracing::info!(path = %path.display(), "no configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.sitemap.hostname.is_empty() {
            return Err(CoreError::config("sitemap.hostname cannot be empty"));
        }

        if self.sitemap.hostname.ends_with('/') {
            tracing::warn!("sitemap.hostname should not have a trailing slash");
        }

        if self.export.extensions.is_empty() {
            return Err(CoreError::config("export.extensions cannot be empty"));
        }

        for (option, name) in [
            ("markers.export", &self.markers.export),
            ("markers.seo", &self.markers.seo),
            ("markers.link", &self.markers.link),
        ] {
            if !is_tag_name(name) {
                return Err(CoreError::config(format!(
                    "{option} must be a tag name, got {name:?}"
                )));
            }
        }

        for rule in &self.robots.rules {
            if rule.user_agent.is_empty() {
                return Err(CoreError::config("robots.rules user_agent cannot be empty"));
            }
        }

        Ok(())
    }

    /// Metadata configured for an output base name.
    pub fn metadata_for(&self, filename: &str) -> Option<&Metadata> {
        self.metadata.get(filename)
    }
}

fn is_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

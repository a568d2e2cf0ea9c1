//! Sitemap generation.
//!
//! Lists the site root and every generated page in sitemap protocol 0.9
//! format.

use std::{fs, path::Path};

use chrono::NaiveDate;
use seo_export_core::SitemapOptions;
use thiserror::Error;
use tracing::{debug, info};

/// Sitemap generation errors.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sitemap operations.
pub type Result<T> = std::result::Result<T, SitemapError>;

/// A sitemap URL entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapUrl {
    pub loc: String,
    pub lastmod: NaiveDate,
    pub changefreq: String,
    pub priority: String,
}

/// Sitemap generator.
#[derive(Debug, Clone)]
pub struct SitemapGenerator {
    options: SitemapOptions,
    lastmod: NaiveDate,
}

impl SitemapGenerator {
    /// Create a generator stamping every entry with `lastmod`.
    #[must_use]
    pub fn new(options: SitemapOptions, lastmod: NaiveDate) -> Self {
        Self { options, lastmod }
    }

    /// Entries for the given generated files, root first.
    ///
    /// `index.html` is listed at the bare hostname with the page priority, so
    /// it appears alongside the root entry rather than replacing it.
    pub fn urls(&self, files: &[String]) -> Vec<SitemapUrl> {
        let root = SitemapUrl {
            loc: self.options.url_for(""),
            lastmod: self.lastmod,
            changefreq: self.options.changefreq.clone(),
            priority: "1.0".to_string(),
        };

        std::iter::once(root)
            .chain(
                files.iter().map(|file| SitemapUrl {
                    loc: self.options.url_for(page_path(file)),
                    lastmod: self.lastmod,
                    changefreq: self.options.changefreq.clone(),
                    priority: self.options.priority.clone(),
                }),
            )
            .collect()
    }

    /// Generate sitemap XML.
    pub fn generate(&self, files: &[String]) -> String {
        debug!(count = files.len(), "generating sitemap");

        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        xml.push('\n');

        for url in self.urls(files) {
            xml.push_str(&url_to_xml(&url));
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// Write sitemap.xml into `output_dir`.
    ///
    /// Returns `false` when disabled or when there is nothing to list.
    pub fn write(&self, output_dir: &Path, files: &[String]) -> Result<bool> {
        if !self.options.enable || files.is_empty() {
            return Ok(false);
        }

        fs::write(output_dir.join("sitemap.xml"), self.generate(files))?;
        info!(entries = files.len() + 1, "generated sitemap.xml");

        Ok(true)
    }
}

/// Path of a page below the hostname; `index.html` is served at the root.
fn page_path(file: &str) -> &str {
    if file == "index.html" { "" } else { file }
}

fn url_to_xml(url: &SitemapUrl) -> String {
    let mut xml = String::from("  <url>\n");
    xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&url.loc)));
    xml.push_str(&format!("    <lastmod>{}</lastmod>\n", url.lastmod.format("%Y-%m-%d")));
    xml.push_str(&format!("    <changefreq>{}</changefreq>\n", escape_xml(&url.changefreq)));
    xml.push_str(&format!("    <priority>{}</priority>\n", escape_xml(&url.priority)));
    xml.push_str("  </url>\n");
    xml
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

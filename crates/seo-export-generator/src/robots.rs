//! robots.txt generation.

use std::{fs, path::Path};

use seo_export_core::{RobotsOptions, SitemapOptions};
use thiserror::Error;
use tracing::info;

/// Robots generation errors.
#[derive(Debug, Error)]
pub enum RobotsError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for robots generation.
pub type Result<T> = std::result::Result<T, RobotsError>;

/// robots.txt generator.
#[derive(Debug, Clone)]
pub struct RobotsGenerator {
    robots: RobotsOptions,
    sitemap: SitemapOptions,
}

impl RobotsGenerator {
    #[must_use]
    pub fn new(robots: RobotsOptions, sitemap: SitemapOptions) -> Self {
        Self { robots, sitemap }
    }

    /// Render robots.txt: one stanza per rule, then the sitemap reference.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();

        for rule in &self.robots.rules {
            out.push_str(&format!("User-agent: {}\n", rule.user_agent));
            for path in &rule.allow {
                out.push_str(&format!("Allow: {path}\n"));
            }
            for path in &rule.disallow {
                out.push_str(&format!("Disallow: {path}\n"));
            }
            out.push('\n');
        }

        if self.sitemap.enable {
            out.push_str(&format!("Sitemap: {}\n", self.sitemap.url_for("sitemap.xml")));
        }

        out
    }

    /// Write robots.txt into `output_dir`. Returns `false` when disabled.
    pub fn generate(&self, output_dir: &Path) -> Result<bool> {
        if !self.robots.enable {
            return Ok(false);
        }

        fs::write(output_dir.join("robots.txt"), self.render())?;
        info!("generated robots.txt");

        Ok(true)
    }
}

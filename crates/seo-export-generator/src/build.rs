//! Artifact emission.
//!
//! Writes one page per fragment (or fallback pages), then robots.txt and
//! sitemap.xml. Every failure is logged and counted; nothing aborts the run.

use std::{
    fs,
    path::{Component, Path, PathBuf},
    time::Instant,
};

use chrono::{NaiveDate, Utc};
use seo_export_core::{Config, ExtractedFragment, FragmentCollection, default_filename};
use seo_export_meta::{DocumentError, HtmlDocument, apply_metadata};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    convert::{ConvertError, HtmlConverter},
    robots::{RobotsError, RobotsGenerator},
    scanner::{ScanError, SourceScanner},
    sitemap::{SitemapError, SitemapGenerator},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Scanner error.
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// Conversion error.
    #[error("conversion error: {0}")]
    Convert(#[from] ConvertError),

    /// Metadata could not be applied to a page.
    #[error("metadata error: {0}")]
    Document(#[from] DocumentError),

    /// robots.txt error.
    #[error("robots error: {0}")]
    Robots(#[from] RobotsError),

    /// Sitemap generation error.
    #[error("sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    /// Output name escapes the output directory.
    #[error("unsafe output filename: {0:?}")]
    UnsafeFilename(String),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Outcome of one emission run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitReport {
    /// Pages written from fragments.
    pub pages: usize,

    /// Placeholder pages written because no fragments were found.
    pub fallback_pages: usize,

    /// Artifacts that failed to convert or write.
    pub failures: usize,

    /// Whether robots.txt was written.
    pub robots: bool,

    /// Whether sitemap.xml was written.
    pub sitemap: bool,

    /// Generated page files relative to the output directory, in write order.
    pub generated: Vec<String>,

    /// Emission duration in milliseconds.
    pub duration_ms: u64,
}

/// Writes the export artifacts.
#[derive(Debug, Clone)]
pub struct Builder {
    config: Config,
    scanner: SourceScanner,
    converter: HtmlConverter,
    lastmod: NaiveDate,
}

impl Builder {
    /// Create a builder. Fails only when the marker names cannot be compiled.
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            scanner: SourceScanner::new(&config)?,
            converter: HtmlConverter::new(&config.markers)?,
            lastmod: Utc::now().date_naive(),
            config,
        })
    }

    /// Override the sitemap `lastmod` date.
    #[must_use]
    pub fn with_lastmod(mut self, date: NaiveDate) -> Self {
        self.lastmod = date;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scanner(&self) -> &SourceScanner {
        &self.scanner
    }

    fn output_dir(&self) -> &Path {
        &self.config.export.output_dir
    }

    /// Emit every artifact for `fragments`.
    pub fn emit(&self, fragments: &FragmentCollection) -> EmitReport {
        let start = Instant::now();
        let mut report = EmitReport::default();

        info!(
            output = %self.output_dir().display(),
            fragments = fragments.len(),
            "emitting export artifacts"
        );

        if let Err(e) = fs::create_dir_all(self.output_dir()) {
            error!(dir = %self.output_dir().display(), error = %e, "failed to create output directory");
        }

        if fragments.is_empty() {
            info!("no export markers found, writing fallback pages");
            self.emit_fallback(&mut report);
        } else {
            self.emit_pages(fragments, &mut report);
        }

        let robots = RobotsGenerator::new(self.config.robots.clone(), self.config.sitemap.clone());
        match robots.generate(self.output_dir()) {
            Ok(written) => report.robots = written,
            Err(e) => {
                report.failures += 1;
                error!(error = %e, "failed to write robots.txt");
            }
        }

        let sitemap = SitemapGenerator::new(self.config.sitemap.clone(), self.lastmod);
        match sitemap.write(self.output_dir(), &report.generated) {
            Ok(written) => report.sitemap = written,
            Err(e) => {
                report.failures += 1;
                error!(error = %e, "failed to write sitemap.xml");
            }
        }

        report.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!(
            pages = report.pages,
            fallback_pages = report.fallback_pages,
            failures = report.failures,
            duration_ms = report.duration_ms,
            "export complete"
        );

        report
    }

    fn emit_pages(&self, fragments: &FragmentCollection, report: &mut EmitReport) {
        for fragment in fragments {
            match self.emit_page(fragment) {
                Ok(name) => {
                    info!(file = %name, source = %fragment.source_file, "generated page");
                    report.pages += 1;
                    report.generated.push(name);
                }
                Err(e) => {
                    report.failures += 1;
                    warn!(filename = %fragment.filename, error = %e, "failed to generate page");
                }
            }
        }
    }

    fn emit_page(&self, fragment: &ExtractedFragment) -> Result<String> {
        let html = self.converter.convert(fragment)?;
        self.write_page(&fragment.filename, html)
    }

    fn emit_fallback(&self, report: &mut EmitReport) {
        let source_dir = &self.config.export.source_dir;
        let sources = match self.scanner.top_level_sources(source_dir) {
            Ok(sources) => sources,
            Err(e) => {
                warn!(error = %e, "cannot list source files for fallback pages");
                return;
            }
        };

        for path in sources {
            let source_file = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let filename = default_filename(&path);

            let written = self
                .converter
                .fallback_page(&filename, &source_file)
                .map_err(BuildError::from)
                .and_then(|html| self.write_page(&filename, html));

            match written {
                Ok(name) => {
                    info!(file = %name, source = %source_file, "generated fallback page");
                    report.fallback_pages += 1;
                    report.generated.push(name);
                }
                Err(e) => {
                    report.failures += 1;
                    warn!(source = %source_file, error = %e, "failed to generate fallback page");
                }
            }
        }
    }

    /// Apply configured metadata and write `<filename>.html`.
    fn write_page(&self, filename: &str, html: String) -> Result<String> {
        let path = output_path(self.output_dir(), filename)?;

        let html = match self.config.metadata_for(filename) {
            Some(metadata) => {
                debug!(filename, "applying page metadata");
                let mut document = HtmlDocument::new(html);
                apply_metadata(&mut document, metadata)?;
                document.into_string()
            }
            None => html,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, html)?;

        Ok(format!("{filename}.html"))
    }
}

/// Path of `<filename>.html` below `output_dir`.
///
/// The name must be relative and may not step outside the directory.
pub fn output_path(output_dir: &Path, filename: &str) -> Result<PathBuf> {
    let relative = Path::new(filename);
    let is_safe = !filename.is_empty()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

    if !is_safe {
        return Err(BuildError::UnsafeFilename(filename.to_string()));
    }

    Ok(output_dir.join(format!("{filename}.html")))
}

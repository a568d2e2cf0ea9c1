//! Export session.
//!
//! Drives the three bundler stages over one explicit fragment collection:
//! `build_start` (eager scan), `transform` (per-file pass) and `close_bundle`
//! (emission). Stages run sequentially in caller order.

use std::{fs, path::Path};

use chrono::NaiveDate;
use seo_export_core::{Config, FragmentCollection};
use tracing::{info, warn};

use crate::{
    build::{Builder, EmitReport, Result},
    scanner::ScanStats,
};

/// One export run.
#[derive(Debug, Clone)]
pub struct ExportSession {
    builder: Builder,
    fragments: FragmentCollection,
}

impl ExportSession {
    pub fn new(config: Config) -> Result<Self> {
        let fragments = FragmentCollection::new(config.export.duplicates);
        Ok(Self {
            builder: Builder::new(config)?,
            fragments,
        })
    }

    /// Override the sitemap `lastmod` date.
    #[must_use]
    pub fn with_lastmod(mut self, date: NaiveDate) -> Self {
        self.builder = self.builder.with_lastmod(date);
        self
    }

    pub fn config(&self) -> &Config {
        self.builder.config()
    }

    /// Fragments collected so far.
    pub fn fragments(&self) -> &FragmentCollection {
        &self.fragments
    }

    /// Eager pass over the whole source directory.
    pub fn build_start(&mut self) -> ScanStats {
        let root = &self.builder.config().export.source_dir;
        self.builder.scanner().scan(root, &mut self.fragments)
    }

    /// Incremental pass over one module's text.
    pub fn transform(&mut self, code: &str, id: &Path) -> usize {
        self.builder.scanner().transform(code, id, &mut self.fragments)
    }

    /// Emit all artifacts for the collected fragments.
    pub fn close_bundle(&self) -> EmitReport {
        self.builder.emit(&self.fragments)
    }

    /// Run every stage once.
    ///
    /// The per-file pass only runs when `export.transform_pass` is set; it
    /// re-reads each source file the eager pass already saw.
    pub fn run(mut self) -> EmitReport {
        let stats = self.build_start();
        info!(files = stats.files, fragments = stats.fragments, "build start");

        if self.config().export.transform_pass {
            let root = &self.builder.config().export.source_dir;
            for path in self.builder.scanner().find_source_files(root) {
                match fs::read_to_string(&path) {
                    Ok(code) => {
                        self.builder
                            .scanner()
                            .transform(&code, &path, &mut self.fragments);
                    }
                    Err(e) => warn!(path = %path.display(), error = %e, "failed to read file"),
                }
            }
            info!(fragments = self.fragments.len(), "transform pass complete");
        }

        self.close_bundle()
    }
}

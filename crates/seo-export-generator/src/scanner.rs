//! Source scanning.
//!
//! Walks the source tree for marker fragments (the eager pass) and offers the
//! same extraction for one file at a time (the incremental pass).

use std::{
    fs,
    path::{Path, PathBuf},
};

use seo_export_core::{Config, ExportConfig, ExtractedFragment, FragmentCollection};
use seo_export_parser::{MarkerExtractor, ParserError};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Scanner errors.
#[derive(Debug, Error)]
pub enum ScanError {
    /// IO error.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Marker extractor could not be built.
    #[error("parser error: {0}")]
    Parser(#[from] ParserError),
}

/// Result type for scanner operations.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Counters for one scan pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Source files read.
    pub files: usize,
    /// Fragments added to the collection.
    pub fragments: usize,
    /// Files that could not be read.
    pub skipped: usize,
}

/// Finds export markers in source files.
#[derive(Debug, Clone)]
pub struct SourceScanner {
    export: ExportConfig,
    extractor: MarkerExtractor,
}

impl SourceScanner {
    /// Create a scanner from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            export: config.export.clone(),
            extractor: MarkerExtractor::new(&config.markers.export, config.export.strategy)?,
        })
    }

    /// All recognized source files below `root`, in file-name order.
    ///
    /// Hidden entries are skipped. Unreadable directory entries are logged.
    pub fn find_source_files(&self, root: &Path) -> Vec<PathBuf> {
        if !root.exists() {
            warn!(dir = %root.display(), "source directory does not exist");
            return Vec::new();
        }

        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    None
                }
            })
            .filter(|e| e.file_type().is_file() && self.export.is_source_file(e.path()))
            .map(DirEntry::into_path)
            .collect()
    }

    /// Recognized source files directly inside `root`, sorted by name.
    pub fn top_level_sources(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let io_err = |source| ScanError::Io {
            path: root.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(root).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_file() && self.export.is_source_file(&path) {
                files.push(path);
            }
        }
        files.sort();

        Ok(files)
    }

    /// Read one file and extract its fragments.
    pub fn scan_file(&self, path: &Path) -> Result<Vec<ExtractedFragment>> {
        debug!(path = %path.display(), "scanning file");
        let code = fs::read_to_string(path).map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(self.extractor.extract(&code, path))
    }

    /// Eager pass: scan every source file below `root` into `collection`.
    pub fn scan(&self, root: &Path, collection: &mut FragmentCollection) -> ScanStats {
        info!(dir = %root.display(), "scanning for export markers");
        let mut stats = ScanStats::default();

        for path in self.find_source_files(root) {
            match self.scan_file(&path) {
                Ok(fragments) => {
                    stats.files += 1;
                    stats.fragments += collection.extend(fragments);
                }
                Err(e) => {
                    stats.skipped += 1;
                    warn!(path = %path.display(), error = %e, "failed to scan file");
                }
            }
        }

        info!(
            files = stats.files,
            fragments = stats.fragments,
            skipped = stats.skipped,
            "scan complete"
        );
        stats
    }

    /// Incremental pass over one file's text.
    ///
    /// Files without a recognized extension are ignored. Returns the number of
    /// fragments added.
    pub fn transform(&self, code: &str, id: &Path, collection: &mut FragmentCollection) -> usize {
        if !self.export.is_source_file(id) {
            return 0;
        }

        debug!(id = %id.display(), "transform: scanning file");
        collection.extend(self.extractor.extract(code, id))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

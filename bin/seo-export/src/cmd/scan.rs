//! Scan command - lists discovered fragments without writing anything

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use seo_export_core::{Config, LinkMode};
use seo_export_generator::ExportSession;

/// Run the scan command. Returns the number of fragments found.
pub fn run(config_path: &Path, source: Option<PathBuf>) -> Result<usize> {
    let mut config = Config::load_or_default(config_path).wrap_err("Failed to load configuration")?;
    if let Some(source) = source {
        config.export.source_dir = source;
    }

    tracing::info!(source = %config.export.source_dir.display(), "Scanning sources");

    let mut session = ExportSession::new(config).wrap_err("Failed to set up scanner")?;
    let stats = session.build_start();

    println!();
    println!("  Files scanned: {}", stats.files);
    println!("  Unreadable:    {}", stats.skipped);
    println!("  Fragments:     {}", stats.fragments);
    println!();

    for fragment in session.fragments() {
        let links = match fragment.link_mode {
            LinkMode::Link => " (links)",
            LinkMode::None => "",
        };
        println!(
            "  {:<24} <- {}{links}",
            fragment.output_name(),
            fragment.source_file
        );
    }

    if session.fragments().is_empty() {
        println!("  No markers found; export would write fallback pages.");
    }
    println!();

    Ok(stats.fragments)
}

//! Export command - runs the full pipeline

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use color_eyre::eyre::{Result, WrapErr};
use seo_export_core::Config;
use seo_export_generator::{EmitReport, ExportSession};

/// Command-line overrides applied on top of the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub source: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub hostname: Option<String>,
    pub transform_pass: bool,
}

impl Overrides {
    /// Apply the overrides to `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(source) = &self.source {
            config.export.source_dir = source.clone();
        }
        if let Some(output) = &self.output {
            config.export.output_dir = output.clone();
        }
        if let Some(hostname) = &self.hostname {
            tracing::info!(hostname, "Overriding sitemap hostname from CLI");
            config.sitemap.hostname = hostname.clone();
        }
        if self.transform_pass {
            config.export.transform_pass = true;
        }
    }
}

/// Load configuration from `config_path` (defaults when missing) and apply
/// overrides.
pub fn load_config(config_path: &Path, overrides: &Overrides) -> Result<Config> {
    let mut config = Config::load_or_default(config_path).wrap_err("Failed to load configuration")?;
    overrides.apply(&mut config);
    config
        .validate()
        .wrap_err("Invalid configuration after applying overrides")?;

    tracing::debug!(?config, "Loaded configuration");
    Ok(config)
}

/// Run the export command.
pub fn run(config_path: &Path, overrides: &Overrides) -> Result<EmitReport> {
    let start = Instant::now();
    tracing::info!(?config_path, ?overrides, "Starting export");

    let config = load_config(config_path, overrides)?;
    let output = config.export.output_dir.clone();

    let report = ExportSession::new(config)
        .wrap_err("Failed to set up export")?
        .run();

    let duration = start.elapsed();

    println!();
    println!("  Export completed.");
    println!();
    println!("  Pages:      {}", report.pages);
    println!("  Fallbacks:  {}", report.fallback_pages);
    println!("  Failures:   {}", report.failures);
    println!("  robots.txt: {}", if report.robots { "written" } else { "skipped" });
    println!("  sitemap:    {}", if report.sitemap { "written" } else { "skipped" });
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", output.display());
    println!();

    if report.failures > 0 {
        tracing::warn!(failures = report.failures, "Some artifacts were not written");
    }

    Ok(report)
}

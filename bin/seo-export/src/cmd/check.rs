//! Check command - validate configuration and source layout

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use seo_export_core::Config;
use seo_export_generator::SourceScanner;

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }
}

/// Run the check command.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = if config_path.exists() {
        match Config::load_with_env(config_path) {
            Ok(c) => {
                println!("  ✓ Configuration valid");
                Some(c)
            }
            Err(e) => {
                result.add_error(format!("Configuration error: {e}"));
                println!("  ✗ Configuration invalid: {e}");
                None
            }
        }
    } else {
        result.add_warning(format!(
            "{} not found, defaults are used",
            config_path.display()
        ));
        Some(Config::default())
    };

    if let Some(cfg) = &config {
        println!("\nChecking configuration values...");
        check_config_values(cfg, &mut result);

        println!("\nChecking sources...");
        check_sources(cfg, &mut result);
    }

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if !result.errors.is_empty() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if !result.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if !result.errors.is_empty() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && !result.warnings.is_empty() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

fn check_config_values(config: &Config, result: &mut ValidationResult) {
    let hostname = &config.sitemap.hostname;
    if hostname.ends_with('/') {
        result.add_warning("sitemap.hostname has a trailing slash");
    }
    if !hostname.starts_with("http://") && !hostname.starts_with("https://") {
        result.add_warning(format!("sitemap.hostname is not an absolute URL: {hostname}"));
    }
    if config.sitemap.enable && hostname.contains("example.com") {
        result.add_warning("sitemap.hostname still points at example.com");
    }

    if config.export.source_dir == config.export.output_dir {
        result.add_error("export.source_dir and export.output_dir are the same directory");
    }

    for filename in config.metadata.keys() {
        if seo_export_generator::output_path(&config.export.output_dir, filename).is_err() {
            result.add_error(format!("metadata.{filename} is not a valid page name"));
        }
    }
}

fn check_sources(config: &Config, result: &mut ValidationResult) {
    let source_dir = &config.export.source_dir;
    if !source_dir.is_dir() {
        result.add_warning(format!(
            "Source directory does not exist: {}",
            source_dir.display()
        ));
        return;
    }

    match SourceScanner::new(config) {
        Ok(scanner) => {
            let files = scanner.find_source_files(source_dir);
            println!("  {} source file(s) in {}", files.len(), source_dir.display());
            if files.is_empty() {
                result.add_warning(format!(
                    "No .{} files below {}",
                    config.export.extensions.join("/."),
                    source_dir.display()
                ));
            }
        }
        Err(e) => result.add_error(format!("Marker configuration error: {e}")),
    }
}

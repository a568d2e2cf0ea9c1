//! seo-export CLI
//!
//! Exports static HTML pages, robots.txt and sitemap.xml from marker
//! components in React sources.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use seo_export::cmd::{self, export::Overrides};

/// Command-line interface for seo-export.
#[derive(Parser)]
#[command(
    name = "seo-export",
    version,
    about = "Static HTML and SEO artifact export for React sources"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "seo-export.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Scan sources and write pages, robots.txt and sitemap.xml
    Export {
        /// Source directory to scan
        #[arg(short, long)]
        source: Option<PathBuf>,
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override sitemap hostname (e.g., https://example.com)
        #[arg(long)]
        hostname: Option<String>,
        /// Also run the per-file transform pass
        #[arg(long)]
        with_transform_pass: bool,
    },
    /// List the fragments an export would write
    Scan {
        /// Source directory to scan
        #[arg(short, long)]
        source: Option<PathBuf>,
    },
    /// Apply a metadata JSON file to an HTML document in place
    Meta {
        /// HTML file to update
        html: PathBuf,
        /// JSON file with the metadata record
        metadata: PathBuf,
    },
    /// Validate configuration and sources
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    seo_export::init_tracing(cli.verbose);

    match cli.command {
        Commands::Export {
            source,
            output,
            hostname,
            with_transform_pass,
        } => {
            let overrides = Overrides {
                source,
                output,
                hostname,
                transform_pass: with_transform_pass,
            };
            cmd::export::run(&cli.config, &overrides)?;
        }
        Commands::Scan { source } => {
            cmd::scan::run(&cli.config, source)?;
        }
        Commands::Meta { html, metadata } => {
            cmd::meta::run(&html, &metadata)?;
        }
        Commands::Check { strict } => {
            cmd::check::run(&cli.config, strict)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_export_defaults() {
        let cli = Cli::parse_from(["seo-export", "export"]);

        assert_eq!(cli.config, PathBuf::from("seo-export.toml"));
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Export {
                source,
                output,
                hostname,
                with_transform_pass,
            } => {
                assert!(source.is_none());
                assert!(output.is_none());
                assert!(hostname.is_none());
                assert!(!with_transform_pass);
            }
            _ => panic!("Expected Export command"),
        }
    }

    #[test]
    fn test_cli_export_with_overrides() {
        let cli = Cli::parse_from([
            "seo-export",
            "-vv",
            "--config",
            "site.toml",
            "export",
            "--source",
            "app",
            "-o",
            "public",
            "--hostname",
            "https://site.dev",
            "--with-transform-pass",
        ]);

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, PathBuf::from("site.toml"));
        match cli.command {
            Commands::Export {
                source,
                output,
                hostname,
                with_transform_pass,
            } => {
                assert_eq!(source, Some(PathBuf::from("app")));
                assert_eq!(output, Some(PathBuf::from("public")));
                assert_eq!(hostname.as_deref(), Some("https://site.dev"));
                assert!(with_transform_pass);
            }
            _ => panic!("Expected Export command"),
        }
    }

    #[test]
    fn test_cli_meta_command() {
        let cli = Cli::parse_from(["seo-export", "meta", "dist/home.html", "home.json"]);

        match cli.command {
            Commands::Meta { html, metadata } => {
                assert_eq!(html, PathBuf::from("dist/home.html"));
                assert_eq!(metadata, PathBuf::from("home.json"));
            }
            _ => panic!("Expected Meta command"),
        }
    }

    #[test]
    fn test_cli_scan_and_check() {
        let cli = Cli::parse_from(["seo-export", "scan", "-s", "app"]);
        assert!(matches!(cli.command, Commands::Scan { source: Some(_) }));

        let cli = Cli::parse_from(["seo-export", "check", "--strict"]);
        assert!(matches!(cli.command, Commands::Check { strict: true }));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["seo-export"]).is_err());
    }
}

//! seo-export CLI Library
//!
//! Command implementations for the `seo-export` binary.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (export, scan, meta, check)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use seo_export::cmd::export::{self, Overrides};
//!
//! export::run(Path::new("seo-export.toml"), &Overrides::default()).unwrap();
//! ```

pub mod cmd;

pub use seo_export_core::Config;
pub use seo_export_generator::{EmitReport, ExportSession};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

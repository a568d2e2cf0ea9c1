//! seo-export Generator Library
//!
//! Scans sources for export markers, converts the captured fragments to
//! static HTML, and writes the pages together with robots.txt and
//! sitemap.xml.
//!
//! # Modules
//!
//! - [`scanner`] - Source tree walking and marker extraction
//! - [`convert`] - Fragment to HTML conversion
//! - [`template`] - Page templates with variable interpolation
//! - [`robots`] - robots.txt generation
//! - [`sitemap`] - XML sitemap generation
//! - [`build`] - Artifact emission
//! - [`session`] - Scan, transform and emit stages over one collection

pub mod build;
pub mod convert;
pub mod robots;
pub mod scanner;
pub mod session;
pub mod sitemap;
pub mod template;

pub use build::{BuildError, Builder, EmitReport, output_path};
pub use convert::{ConvertError, HtmlConverter};
pub use robots::RobotsGenerator;
pub use scanner::{ScanError, ScanStats, SourceScanner};
pub use session::ExportSession;
pub use sitemap::{SitemapGenerator, SitemapUrl};
pub use template::{Template, TemplateContext, TemplateError, TemplateRegistry};

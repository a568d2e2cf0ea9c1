//! seo-export Core Library
//!
//! Configuration, error handling, and the fragment model shared by the
//! scanner, converter, and emitter.

pub mod config;
pub mod error;
pub mod fragment;

pub use config::{
    Config, ExportConfig, ExtractStrategy, MarkerNames, RobotsOptions, RobotsRule, SitemapOptions,
};
pub use error::{CoreError, Result};
pub use fragment::{DuplicatePolicy, ExtractedFragment, FragmentCollection, LinkMode, default_filename};

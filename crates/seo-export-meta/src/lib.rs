//! seo-export Metadata Library
//!
//! Page metadata and its application to a document head.
//!
//! # Modules
//!
//! - [`metadata`] - The metadata record and key-to-tag mapping
//! - [`head`] - Head state and the pure `apply` transition
//! - [`document`] - Adapters that read and write real documents
//! - [`structured`] - schema.org JSON-LD builders

pub mod document;
pub mod head;
pub mod metadata;
pub mod structured;

pub use document::{DocumentError, HeadTarget, HtmlDocument, apply_metadata};
pub use head::{HeadElement, HeadState, MetaAttribute};
pub use metadata::{MetaKey, Metadata};

//! CLI command implementations.

pub mod check;
pub mod export;
pub mod meta;
pub mod scan;

//! Core data types for pomscope.
//!
//! - [`config`]: project (`pomscope.toml`) and global configuration
//! - [`snapshot`]: immutable file-tree snapshot with containment queries
//! - [`xml`]: arena-backed generic XML element tree

pub mod config;
pub mod snapshot;
pub mod xml;

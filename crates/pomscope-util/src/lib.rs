//! Shared utilities for pomscope.
//!
//! This crate provides the cross-cutting concerns used by every other
//! pomscope crate: the unified error type and path helpers.

pub mod errors;
pub mod fs;

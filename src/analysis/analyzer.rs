//! Analyzer implementations.

#[allow(clippy::module_inception)]
pub mod analyzer;
pub mod keyword;
pub mod per_field;
pub mod simple;
pub mod standard;

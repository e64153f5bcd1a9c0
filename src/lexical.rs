//! The index-engine side of the mapping layer.
//!
//! Mappers produce and consume these types; the inverted index that stores
//! documents and executes queries lives outside this crate.
//!
//! # Module Structure
//!
//! - `core`: documents, fields and per-field index options
//! - `query`: the query object model and the classic query-syntax parser
//! - `search`: sort specifications and search-session settings

pub mod core;
pub mod query;
pub mod search;

// Re-exports
pub use core::document::Document;
pub use core::field::{
    Field, FieldValue, IndexMode, NumericType, NumericValue, StoreMode, TermVectorMode,
};
pub use query::{Query, QueryParser};
pub use search::{SearchSettings, Sort, SortField, SortType};

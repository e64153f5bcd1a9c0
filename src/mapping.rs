//! Mapping between typed records and documents.
//!
//! # Module Structure
//!
//! - `accessor`: typed properties and the shared accessor cache
//! - `converter`: value to text converters
//! - `field_mapper`: one mapper per property
//! - `document_mapper`: all mappers of a record type
//! - `key`: record identity keys
//! - `ordering`: multi-key sort requests
//! - `query_parser`: query parsing against a mapping

pub mod accessor;
pub mod converter;
pub mod document_mapper;
pub mod field_mapper;
pub mod key;
pub mod ordering;
pub mod query_parser;

// Re-exports
pub use accessor::{Accessor, Property, accessor_for};
pub use converter::{
    BooleanConverter, DateTimeConverter, DateTimeToTicksConverter, FloatConverter,
    IntegerConverter, ValueConverter,
};
pub use document_mapper::DocumentMapper;
pub use field_mapper::{
    DocumentBoostMapper, DocumentKeyFieldMapper, FieldEncoding, FieldMapper, FieldSettings,
    QueryExecutionContext, ReflectionFieldMapper, ScoreMapper,
};
pub use key::{DocumentKey, KeyEntry};
pub use ordering::CompositeOrdering;
pub use query_parser::FieldMappingQueryParser;

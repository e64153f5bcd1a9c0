//! # Lexmap
//!
//! Maps typed Rust records onto search-engine documents and compiles
//! field-aware queries against the same mapping.
//!
//! ## Features
//!
//! - Fluent per-property mapping with field names, index modes and analyzers
//! - Custom value converters and numeric (trie-encoded) fields
//! - Identity keys, change detection and partial document reads
//! - A classic query-syntax parser that compiles each clause through the
//!   mapped field
//! - Sorting by converted values or stored text
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use lexmap::fluent::ClassMap;
//! use lexmap::mapping::FieldMappingQueryParser;
//! use lexmap::property;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Product {
//!     id: String,
//!     name: String,
//! }
//!
//! let mut map = ClassMap::<Product>::new();
//! map.key(property!(Product, id)).to_field("Id");
//! map.property(property!(Product, name)).to_field("Name");
//! let mapper = Arc::new(map.to_document_mapper().unwrap());
//!
//! let widget = Product { id: "A-1".into(), name: "Widget".into() };
//! let doc = mapper.to_document(&widget).unwrap();
//! assert_eq!(doc.get("Name").as_deref(), Some("Widget"));
//! assert_eq!(mapper.create_object(&doc), widget);
//!
//! let parser = FieldMappingQueryParser::new("Name", Arc::clone(&mapper));
//! assert_eq!(parser.parse("widget").unwrap().to_string(), "Name:widget");
//! ```

// Core modules
pub mod analysis;
pub mod data;
pub mod error;
pub mod fluent;
pub mod lexical;
pub mod mapping;

// Re-exports for the public API
pub use analysis::Analyzer;
pub use data::{PropertyType, Value};
pub use error::{LexmapError, Result};
pub use fluent::{ClassMap, PropertyMap};
pub use lexical::{Document, Field, Query};
pub use mapping::{
    DocumentKey, DocumentMapper, FieldMapper, FieldMappingQueryParser, Property,
    QueryExecutionContext, ValueConverter,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

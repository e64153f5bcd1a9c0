//! Field mappers: one per mapped property.
//!
//! A [`FieldMapper`] moves one property of a record between the record and a
//! [`Document`], and compiles queries, range queries and sort keys scoped to
//! its field. The implementations are:
//!
//! - [`ReflectionFieldMapper`]: an ordinary property stored as text or as a
//!   numeric field
//! - [`ScoreMapper`]: a property that receives the relevance score of a hit
//! - [`DocumentBoostMapper`]: a property bound to the document boost
//! - [`DocumentKeyFieldMapper`]: a constant field that scopes documents to
//!   one record type

use std::fmt::Debug;
use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::data::Value;
use crate::error::{LexmapError, Result};
use crate::lexical::core::document::Document;
use crate::lexical::core::field::IndexMode;
use crate::lexical::query::{Query, QueryParser, RangeType};
use crate::lexical::search::SortField;

pub mod boost;
pub mod document_key;
pub mod reflection;
pub mod score;

pub use boost::DocumentBoostMapper;
pub use document_key::DocumentKeyFieldMapper;
pub use reflection::{FieldEncoding, FieldSettings, ReflectionFieldMapper};
pub use score::ScoreMapper;

/// Per-hit data available while a document is turned back into a record.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QueryExecutionContext {
    score: f32,
}

impl QueryExecutionContext {
    pub fn new(score: f32) -> Self {
        QueryExecutionContext { score }
    }

    /// Relevance score of the current hit.
    pub fn score(&self) -> f32 {
        self.score
    }
}

/// Maps one property of `T` onto one document field.
///
/// Mappers are immutable once built and safe to share between threads.
pub trait FieldMapper<T>: Send + Sync + Debug {
    /// Name of the mapped property.
    fn property_name(&self) -> &str;

    /// Name of the document field.
    fn field_name(&self) -> &str;

    /// Analyzer for the field's text.
    fn analyzer(&self) -> &Arc<dyn Analyzer>;

    fn index_mode(&self) -> IndexMode;

    /// Read the property of `source`.
    fn property_value(&self, source: &T) -> Value;

    /// Replace this field in `target` with the property value of `source`.
    fn copy_to_document(&self, source: &T, target: &mut Document) -> Result<()>;

    /// Assign the property of `target` from `source`.
    fn copy_from_document(
        &self,
        source: &Document,
        context: &QueryExecutionContext,
        target: &mut T,
    ) -> Result<()>;

    /// The property value stored in `document`, converted back to a value.
    ///
    /// `Ok(None)` when the document has no such field.
    fn field_value(&self, document: &Document) -> Result<Option<Value>> {
        let _ = document;
        Err(LexmapError::unsupported(format!(
            "the mapping for field '{}' cannot read values back from documents",
            self.field_name()
        )))
    }

    /// Text used for `value` in a query on this field.
    fn convert_to_query_expression(&self, value: &Value) -> Result<String>;

    /// Escape query syntax in a value. `None` gives the empty string.
    fn escape_special_characters(&self, value: Option<&str>) -> String {
        QueryParser::escape(value.unwrap_or_default())
    }

    /// Compile query text against this field.
    fn create_query(&self, pattern: &str) -> Result<Query>;

    /// Compile a range query. `None` bounds are open.
    fn create_range_query(
        &self,
        lower: Option<&Value>,
        upper: Option<&Value>,
        lower_type: RangeType,
        upper_type: RangeType,
    ) -> Result<Query>;

    /// Sort key for this field.
    fn create_sort_field(&self, reverse: bool) -> Result<SortField>;

    /// Whether the property receives the hit score instead of stored data.
    fn is_score_field(&self) -> bool {
        false
    }
    /// Whether `copy_to_document` stores anything the document can give back.
    fn is_persisted(&self) -> bool {
        true
    }
}

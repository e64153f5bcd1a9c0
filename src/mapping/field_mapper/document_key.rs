//! Constant key fields that scope documents to one record type.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use log::trace;

use crate::analysis::{Analyzer, KeywordAnalyzer};
use crate::data::Value;
use crate::error::{LexmapError, Result};
use crate::lexical::core::document::Document;
use crate::lexical::core::field::{Field, IndexMode, StoreMode};
use crate::lexical::query::{Query, RangeType, TermQuery};
use crate::lexical::search::SortField;
use crate::mapping::field_mapper::{FieldMapper, QueryExecutionContext};

/// Writes a fixed value to a fixed field on every document.
///
/// Several record types can share one index when each mapping adds its own
/// constant, for example `Type = "Product"`. The constant is part of the
/// record's key, so key queries only ever match documents of the right type.
pub struct DocumentKeyFieldMapper<T> {
    field_name: String,
    value: String,
    analyzer: Arc<dyn Analyzer>,
    _record: PhantomData<fn() -> T>,
}

impl<T> DocumentKeyFieldMapper<T> {
    pub fn new<F: Into<String>, V: Into<String>>(field_name: F, value: V) -> Self {
        DocumentKeyFieldMapper {
            field_name: field_name.into(),
            value: value.into(),
            analyzer: Arc::new(KeywordAnalyzer::new()),
            _record: PhantomData,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl<T> FieldMapper<T> for DocumentKeyFieldMapper<T> {
    fn property_name(&self) -> &str {
        &self.field_name
    }

    fn field_name(&self) -> &str {
        &self.field_name
    }

    fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }

    fn index_mode(&self) -> IndexMode {
        IndexMode::NotAnalyzed
    }

    fn property_value(&self, _source: &T) -> Value {
        Value::Text(self.value.clone())
    }

    fn copy_to_document(&self, _source: &T, target: &mut Document) -> Result<()> {
        target.remove_fields(&self.field_name);
        target.add(
            Field::text(self.field_name.as_str(), self.value.as_str())
                .with_store(StoreMode::Yes)
                .with_index(IndexMode::NotAnalyzed),
        );
        Ok(())
    }

    fn copy_from_document(
        &self,
        _source: &Document,
        _context: &QueryExecutionContext,
        _target: &mut T,
    ) -> Result<()> {
        Ok(())
    }

    fn field_value(&self, document: &Document) -> Result<Option<Value>> {
        Ok(document.get(&self.field_name).map(Value::Text))
    }

    fn convert_to_query_expression(&self, value: &Value) -> Result<String> {
        Ok(match value {
            Value::Null => String::new(),
            Value::Text(text) => text.clone(),
            other => other.to_string(),
        })
    }

    fn create_query(&self, _pattern: &str) -> Result<Query> {
        trace!("document key '{}' = '{}'", self.field_name, self.value);
        Ok(TermQuery::new(self.field_name.as_str(), self.value.as_str()).into())
    }

    fn create_range_query(
        &self,
        _lower: Option<&Value>,
        _upper: Option<&Value>,
        _lower_type: RangeType,
        _upper_type: RangeType,
    ) -> Result<Query> {
        Err(LexmapError::unsupported(format!(
            "document key '{}' does not support range queries",
            self.field_name
        )))
    }

    fn create_sort_field(&self, _reverse: bool) -> Result<SortField> {
        Err(LexmapError::unsupported(format!(
            "document key '{}' does not support sorting",
            self.field_name
        )))
    }
}

impl<T> fmt::Debug for DocumentKeyFieldMapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentKeyFieldMapper")
            .field("field_name", &self.field_name)
            .field("value", &self.value)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Product;

    #[test]
    fn test_constant_is_written_and_queried() {
        let mapper = DocumentKeyFieldMapper::<Product>::new("Type", "Product");
        let mut doc = Document::new().with_field(Field::text("Type", "Stale"));
        mapper.copy_to_document(&Product, &mut doc).unwrap();

        assert_eq!(doc.get_fields("Type").count(), 1);
        let field = doc.get_field("Type").unwrap();
        assert_eq!(field.string_value(), "Product");
        assert_eq!(field.index(), IndexMode::NotAnalyzed);

        assert_eq!(mapper.property_value(&Product), Value::from("Product"));
        assert_eq!(
            mapper.create_query("anything").unwrap(),
            Query::Term(TermQuery::new("Type", "Product"))
        );
        assert!(mapper.create_sort_field(false).is_err());
    }
}

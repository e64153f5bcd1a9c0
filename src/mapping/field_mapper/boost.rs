//! Binds a property to the document boost.

use std::fmt;
use std::sync::Arc;

use crate::analysis::{Analyzer, KeywordAnalyzer};
use crate::data::{PropertyType, Value};
use crate::error::{LexmapError, Result};
use crate::lexical::core::document::Document;
use crate::lexical::core::field::IndexMode;
use crate::lexical::query::{Query, RangeType};
use crate::lexical::search::SortField;
use crate::mapping::accessor::{Accessor, Property, accessor_for};
use crate::mapping::field_mapper::{FieldMapper, QueryExecutionContext};

/// Copies a numeric property to and from [`Document::boost`].
pub struct DocumentBoostMapper<T> {
    accessor: Arc<Accessor<T>>,
    analyzer: Arc<dyn Analyzer>,
}

impl<T: Send + Sync + 'static> DocumentBoostMapper<T> {
    pub fn new<V: PropertyType>(property: &Property<T, V>) -> Self {
        DocumentBoostMapper {
            accessor: accessor_for(property),
            analyzer: Arc::new(KeywordAnalyzer::new()),
        }
    }
}

impl<T> DocumentBoostMapper<T> {
    fn unsupported(&self, what: &str) -> LexmapError {
        LexmapError::unsupported(format!(
            "property '{}' is the document boost and does not support {what}",
            self.accessor.name()
        ))
    }
}

impl<T: Send + Sync> FieldMapper<T> for DocumentBoostMapper<T> {
    fn property_name(&self) -> &str {
        self.accessor.name()
    }

    fn field_name(&self) -> &str {
        self.accessor.name()
    }

    fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }

    fn index_mode(&self) -> IndexMode {
        IndexMode::NotIndexed
    }

    fn property_value(&self, source: &T) -> Value {
        self.accessor.get(source)
    }

    fn copy_to_document(&self, source: &T, target: &mut Document) -> Result<()> {
        let boost = match self.accessor.get(source) {
            Value::Float(f) => f as f32,
            Value::Int(i) => i as f32,
            Value::Null => 1.0,
            other => {
                return Err(LexmapError::field_conversion(
                    self.accessor.name(),
                    format!("'{other}' is not a valid document boost"),
                ));
            }
        };
        target.set_boost(boost);
        Ok(())
    }

    fn copy_from_document(
        &self,
        source: &Document,
        _context: &QueryExecutionContext,
        target: &mut T,
    ) -> Result<()> {
        self.accessor
            .set(target, Value::Float(f64::from(source.boost())))
            .map(|_| ())
    }

    fn field_value(&self, document: &Document) -> Result<Option<Value>> {
        Ok(Some(Value::Float(f64::from(document.boost()))))
    }

    fn convert_to_query_expression(&self, _value: &Value) -> Result<String> {
        Err(self.unsupported("queries"))
    }

    fn create_query(&self, _pattern: &str) -> Result<Query> {
        Err(self.unsupported("queries"))
    }

    fn create_range_query(
        &self,
        _lower: Option<&Value>,
        _upper: Option<&Value>,
        _lower_type: RangeType,
        _upper_type: RangeType,
    ) -> Result<Query> {
        Err(self.unsupported("range queries"))
    }

    fn create_sort_field(&self, _reverse: bool) -> Result<SortField> {
        Err(self.unsupported("sorting"))
    }
}

impl<T> fmt::Debug for DocumentBoostMapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentBoostMapper")
            .field("property", &self.accessor.name())
            .finish()
    }
}

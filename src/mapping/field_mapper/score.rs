//! Binds a property to the relevance score of each hit.

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

/// Receives the score of the hit a record was built from.
///
/// Nothing is written to documents, and the property cannot be queried.
/// Sorting on it sorts by relevance.
pub struct ScoreMapper<T> {
    accessor: Arc<Accessor<T>>,
    analyzer: Arc<dyn Analyzer>,
}

impl<T: Send + Sync + 'static> ScoreMapper<T> {
    pub fn new<V: PropertyType>(property: &Property<T, V>) -> Self {
        ScoreMapper {
            accessor: accessor_for(property),
            analyzer: Arc::new(KeywordAnalyzer::new()),
        }
    }
}

impl<T> ScoreMapper<T> {
    fn not_queryable(&self) -> LexmapError {
        LexmapError::unsupported(format!(
            "property '{}' holds the hit score and cannot be queried",
            self.accessor.name()
        ))
    }
}

impl<T: Send + Sync> FieldMapper<T> for ScoreMapper<T> {
    fn property_name(&self) -> &str {
        self.accessor.name()
    }

    /// The score has no document field; the property name stands in.
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

    fn copy_to_document(&self, _source: &T, _target: &mut Document) -> Result<()> {
        Ok(())
    }

    fn copy_from_document(
        &self,
        _source: &Document,
        context: &QueryExecutionContext,
        target: &mut T,
    ) -> Result<()> {
        self.accessor
            .set(target, Value::Float(f64::from(context.score())))
            .map(|_| ())
    }

    fn convert_to_query_expression(&self, _value: &Value) -> Result<String> {
        Err(self.not_queryable())
    }

    fn create_query(&self, _pattern: &str) -> Result<Query> {
        Err(self.not_queryable())
    }

    fn create_range_query(
        &self,
        _lower: Option<&Value>,
        _upper: Option<&Value>,
        _lower_type: RangeType,
        _upper_type: RangeType,
    ) -> Result<Query> {
        Err(self.not_queryable())
    }

    fn create_sort_field(&self, reverse: bool) -> Result<SortField> {
        Ok(SortField::score().with_reverse(reverse))
    }

    fn is_score_field(&self) -> bool {
        true
    }

    fn is_persisted(&self) -> bool {
        false
    }
}

impl<T> fmt::Debug for ScoreMapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoreMapper")
            .field("property", &self.accessor.name())
            .finish()
    }
}

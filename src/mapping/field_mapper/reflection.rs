//! The mapper for ordinary properties.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::analysis::Analyzer;
use crate::data::{PropertyType, Value, ValueOrdering};
use crate::error::{LexmapError, Result};
use crate::lexical::core::document::Document;
use crate::lexical::core::field::{
    Field, FieldValue, IndexMode, NumericType, NumericValue, StoreMode, TermVectorMode,
};
use crate::lexical::query::{
    DefaultOperator, NumericRangeQuery, Query, QueryParser, RangeType, TermQuery, TermRangeQuery,
    Version, WildcardQuery,
};
use crate::lexical::search::{FieldComparatorSource, SortField, SortType};
use crate::mapping::accessor::{Accessor, Property, accessor_for};
use crate::mapping::converter::ValueConverter;
use crate::mapping::field_mapper::{FieldMapper, QueryExecutionContext};

/// Default precision step of numeric fields.
pub const DEFAULT_PRECISION_STEP: u32 = 4;

/// How a property is encoded in its document field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEncoding {
    /// Text produced by the converter, or the text value itself.
    Text,
    /// A trie-encoded number.
    Numeric {
        numeric_type: NumericType,
        precision_step: u32,
    },
}

/// Everything about a field mapping except the property itself.
#[derive(Debug, Clone)]
pub struct FieldSettings {
    pub field_name: String,
    pub store: StoreMode,
    pub index: IndexMode,
    pub term_vector: TermVectorMode,
    pub converter: Option<Arc<dyn ValueConverter>>,
    pub default_operator: DefaultOperator,
    pub case_sensitive: bool,
    pub analyzer: Arc<dyn Analyzer>,
    pub boost: f32,
    pub native_sort: bool,
    /// Precision step when the property is indexed as a number.
    pub numeric_precision_step: Option<u32>,
}

/// Maps a property onto a text or numeric field.
pub struct ReflectionFieldMapper<T> {
    accessor: Arc<Accessor<T>>,
    settings: FieldSettings,
    encoding: FieldEncoding,
    ordering: Option<ValueOrdering>,
    is_collection: bool,
}

impl<T: Send + Sync + 'static> ReflectionFieldMapper<T> {
    /// Build the mapper for `property`.
    ///
    /// Fails when a numeric encoding is requested for a property that is
    /// neither a number nor given a converter.
    pub fn new<V: PropertyType>(property: &Property<T, V>, settings: FieldSettings) -> Result<Self> {
        let encoding = match settings.numeric_precision_step {
            None => FieldEncoding::Text,
            Some(precision_step) => {
                let numeric_type = match (V::numeric_type(), &settings.converter) {
                    (Some(numeric_type), _) => numeric_type,
                    (None, Some(_)) => NumericType::Integer,
                    (None, None) => {
                        return Err(LexmapError::configuration(format!(
                            "Property '{}' is mapped as a numeric field but is not a number and has no converter",
                            property.name()
                        )));
                    }
                };
                FieldEncoding::Numeric {
                    numeric_type,
                    precision_step,
                }
            }
        };

        Ok(ReflectionFieldMapper {
            accessor: accessor_for(property),
            settings,
            encoding,
            ordering: V::ordering(),
            is_collection: V::is_collection(),
        })
    }
}

impl<T: Send + Sync> ReflectionFieldMapper<T> {
    pub fn settings(&self) -> &FieldSettings {
        &self.settings
    }

    pub fn encoding(&self) -> FieldEncoding {
        self.encoding
    }

    pub fn converter(&self) -> Option<&Arc<dyn ValueConverter>> {
        self.settings.converter.as_ref()
    }

    pub fn case_sensitive(&self) -> bool {
        self.settings.case_sensitive
    }

    pub fn native_sort(&self) -> bool {
        self.settings.native_sort
    }

    pub fn boost(&self) -> f32 {
        self.settings.boost
    }

    pub fn store(&self) -> StoreMode {
        self.settings.store
    }

    pub fn term_vector(&self) -> TermVectorMode {
        self.settings.term_vector
    }

    pub fn default_operator(&self) -> DefaultOperator {
        self.settings.default_operator
    }

    fn field_error(&self, err: LexmapError) -> LexmapError {
        err.for_field(self.settings.field_name.as_str())
    }

    /// The stored form of one value, or `None` when nothing should be written.
    fn to_field(&self, value: &Value) -> Result<Option<Field>> {
        let name = self.settings.field_name.as_str();
        let field = match self.encoding {
            FieldEncoding::Numeric {
                numeric_type,
                precision_step,
            } => {
                let number = self.to_numeric(numeric_type, value)?;
                Field::numeric(name, number, precision_step)
            }
            FieldEncoding::Text => {
                let text = match (&self.settings.converter, value) {
                    (Some(converter), value) => {
                        converter.to_text(value).map_err(|e| self.field_error(e))?
                    }
                    (None, Value::Text(text)) => text.clone(),
                    (None, other) => {
                        trace!(
                            "field '{name}': no converter for {} value, nothing written",
                            other.kind_name()
                        );
                        return Ok(None);
                    }
                };
                Field::text(name, text)
            }
        };

        Ok(Some(
            field
                .with_store(self.settings.store)
                .with_index(self.settings.index)
                .with_term_vector(self.settings.term_vector)
                .with_boost(self.settings.boost),
        ))
    }

    fn to_numeric(&self, numeric_type: NumericType, value: &Value) -> Result<NumericValue> {
        let text = match (&self.settings.converter, value) {
            (None, Value::Int(i)) => {
                return Ok(match numeric_type {
                    NumericType::Integer => NumericValue::Integer(*i),
                    NumericType::Float => NumericValue::Float(*i as f64),
                });
            }
            (None, Value::Float(f)) if numeric_type == NumericType::Float => {
                return Ok(NumericValue::Float(*f));
            }
            (Some(converter), value) => converter.to_text(value).map_err(|e| self.field_error(e))?,
            (None, Value::Text(text)) => text.clone(),
            (None, other) => other.to_string(),
        };

        NumericValue::parse(numeric_type, &text).ok_or_else(|| {
            LexmapError::field_conversion(
                self.settings.field_name.as_str(),
                format!("'{text}' is not a valid {numeric_type:?} value"),
            )
        })
    }

    fn from_field(&self, field: &Field) -> Result<Value> {
        if let Some(converter) = &self.settings.converter {
            return converter
                .from_text(&field.string_value())
                .map_err(|e| self.field_error(e));
        }

        Ok(match field.value() {
            FieldValue::Text(text) => Value::Text(text.clone()),
            FieldValue::Numeric(NumericValue::Integer(i)) => Value::Int(*i),
            FieldValue::Numeric(NumericValue::Float(f)) => Value::Float(*f),
        })
    }

    /// Convert a range bound and pass it through the field's analyzer.
    fn analyzed_bound(&self, value: &Value) -> Result<String> {
        let text = self.convert_to_query_expression(value)?;
        self.settings
            .analyzer
            .analyze_to_string(&self.settings.field_name, &text)
    }

    /// Handle keyword text that contains whitespace.
    ///
    /// The query parser would split such text into several clauses even when
    /// the field's analyzer keeps it as one token. When the analyzer yields
    /// exactly one token, build the term or wildcard query directly.
    fn keyword_containing_whitespace(&self, pattern: &str) -> Result<Option<Query>> {
        if !pattern.contains([' ', '\t', '\r', '\n']) {
            return Ok(None);
        }

        let field = self.settings.field_name.as_str();
        let mut terms = self.settings.analyzer.terms(field, pattern)?;
        if terms.len() != 1 {
            return Ok(None);
        }
        let term = terms.remove(0);

        if is_wildcard_pattern(&term) {
            Ok(Some(WildcardQuery::new(field, term)?.into()))
        } else {
            Ok(Some(TermQuery::new(field, unescape(&term)).into()))
        }
    }
}

/// True if `pattern` has a `*` or `?` that is not escaped.
fn is_wildcard_pattern(pattern: &str) -> bool {
    let stripped = pattern.replace(r"\\", "");
    stripped.replace(r"\*", "").contains('*') || stripped.replace(r"\?", "").contains('?')
}

fn unescape(pattern: &str) -> String {
    pattern.replace('\\', "")
}

impl<T: Send + Sync> FieldMapper<T> for ReflectionFieldMapper<T> {
    fn property_name(&self) -> &str {
        self.accessor.name()
    }

    fn field_name(&self) -> &str {
        &self.settings.field_name
    }

    fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.settings.analyzer
    }

    fn index_mode(&self) -> IndexMode {
        self.settings.index
    }

    fn is_persisted(&self) -> bool {
        self.settings.index.is_indexed()
    }

    fn property_value(&self, source: &T) -> Value {
        self.accessor.get(source)
    }

    fn copy_to_document(&self, source: &T, target: &mut Document) -> Result<()> {
        let value = self.accessor.get(source);
        target.remove_fields(&self.settings.field_name);

        if !self.settings.index.is_indexed() {
            return Ok(());
        }

        let values = match value {
            Value::List(items) => items,
            single => vec![single],
        };
        for value in values.iter().filter(|v| !v.is_null()) {
            if let Some(field) = self.to_field(value)? {
                target.add(field);
            }
        }
        Ok(())
    }

    fn copy_from_document(
        &self,
        source: &Document,
        _context: &QueryExecutionContext,
        target: &mut T,
    ) -> Result<()> {
        if !self.accessor.can_write() {
            return Ok(());
        }
        if let Some(value) = self.field_value(source)? {
            self.accessor
                .set(target, value)
                .map_err(|e| LexmapError::field_conversion(self.settings.field_name.as_str(), e.to_string()))?;
        }
        Ok(())
    }

    fn field_value(&self, document: &Document) -> Result<Option<Value>> {
        let mut fields = document.get_fields(&self.settings.field_name).peekable();
        if fields.peek().is_none() {
            return Ok(None);
        }

        if self.is_collection {
            let values = fields.map(|f| self.from_field(f)).collect::<Result<Vec<_>>>()?;
            return Ok(Some(Value::List(values)));
        }

        match fields.next() {
            Some(field) => self.from_field(field).map(Some),
            None => Ok(None),
        }
    }

    fn convert_to_query_expression(&self, value: &Value) -> Result<String> {
        match (&self.settings.converter, value) {
            (Some(converter), value) => converter.to_text(value).map_err(|e| self.field_error(e)),
            (None, Value::Text(text)) => Ok(text.clone()),
            (None, Value::Null) => Ok(String::new()),
            (None, other) => Ok(other.to_string()),
        }
    }

    fn create_query(&self, pattern: &str) -> Result<Query> {
        let field = self.settings.field_name.as_str();

        if let FieldEncoding::Numeric {
            numeric_type,
            precision_step,
        } = self.encoding
        {
            let number = NumericValue::parse(numeric_type, pattern).ok_or_else(|| {
                LexmapError::field_conversion(
                    field,
                    format!("'{pattern}' is not a valid {numeric_type:?} value"),
                )
            })?;
            let query = NumericRangeQuery::new(
                field,
                numeric_type,
                precision_step,
                Some(number),
                Some(number),
                true,
                true,
            );
            trace!("field '{field}': '{pattern}' compiled to {query:?}");
            return Ok(query.into());
        }

        if let Some(query) = self.keyword_containing_whitespace(pattern)? {
            trace!("field '{field}': keyword '{pattern}' compiled to {query}");
            return Ok(query);
        }

        let mut parser = QueryParser::new(Version::V3_0, field, Arc::clone(&self.settings.analyzer));
        parser.set_allow_leading_wildcard(true);
        parser.set_lowercase_expanded_terms(!self.settings.case_sensitive);
        parser.set_default_operator(self.settings.default_operator);

        let query = parser.parse(pattern)?;
        trace!("field '{field}': '{pattern}' compiled to {query}");
        Ok(query)
    }

    fn create_range_query(
        &self,
        lower: Option<&Value>,
        upper: Option<&Value>,
        lower_type: RangeType,
        upper_type: RangeType,
    ) -> Result<Query> {
        let field = self.settings.field_name.as_str();

        if let FieldEncoding::Numeric {
            numeric_type,
            precision_step,
        } = self.encoding
        {
            let lower = lower
                .map(|v| self.to_numeric(numeric_type, v))
                .transpose()?;
            let upper = upper
                .map(|v| self.to_numeric(numeric_type, v))
                .transpose()?;
            return Ok(NumericRangeQuery::new(
                field,
                numeric_type,
                precision_step,
                lower,
                upper,
                lower_type.is_inclusive(),
                upper_type.is_inclusive(),
            )
            .into());
        }

        let lower = lower.map(|v| self.analyzed_bound(v)).transpose()?;
        let upper = upper.map(|v| self.analyzed_bound(v)).transpose()?;
        Ok(TermRangeQuery::new(
            field,
            lower,
            upper,
            lower_type.is_inclusive(),
            upper_type.is_inclusive(),
        )
        .into())
    }

    fn create_sort_field(&self, reverse: bool) -> Result<SortField> {
        let field = self.settings.field_name.as_str();

        if let FieldEncoding::Numeric { numeric_type, .. } = self.encoding {
            let sort_type = match numeric_type {
                NumericType::Integer => SortType::Long,
                NumericType::Float => SortType::Double,
            };
            return Ok(SortField::new(field, sort_type, reverse));
        }

        let converter = match &self.settings.converter {
            Some(converter) if !self.settings.native_sort => converter,
            _ => return Ok(SortField::new(field, SortType::String, reverse)),
        };

        let ordering = self.ordering.ok_or_else(|| {
            LexmapError::configuration(format!(
                "The type of property '{}' has no ordering. To sort by the stored text, enable native sort on the mapping.",
                self.accessor.name()
            ))
        })?;

        let source = ConvertingComparatorSource {
            converter: Arc::clone(converter),
            ordering,
        };
        Ok(SortField::new(field, SortType::Custom(Arc::new(source)), reverse))
    }
}

impl<T> fmt::Debug for ReflectionFieldMapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectionFieldMapper")
            .field("property", &self.accessor.name())
            .field("settings", &self.settings)
            .field("encoding", &self.encoding)
            .finish()
    }
}

/// Sorts by converting stored text back to values and comparing those.
///
/// Documents without the field, or whose text the converter rejects, sort
/// before all others.
#[derive(Debug)]
struct ConvertingComparatorSource {
    converter: Arc<dyn ValueConverter>,
    ordering: ValueOrdering,
}

impl ConvertingComparatorSource {
    fn convert(&self, text: Option<&str>) -> Value {
        text.and_then(|t| self.converter.from_text(t).ok())
            .unwrap_or(Value::Null)
    }
}

impl FieldComparatorSource for ConvertingComparatorSource {
    fn compare(&self, a: Option<&str>, b: Option<&str>) -> Ordering {
        let a = self.convert(a);
        let b = self.convert(b);
        match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => (self.ordering)(&a, &b),
        }
    }
}

//! Per-property mapping options.

use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::analysis::{Analyzer, CaseInsensitiveKeywordAnalyzer, KeywordAnalyzer};
use crate::data::PropertyType;
use crate::error::Result;
use crate::lexical::core::field::{IndexMode, StoreMode, TermVectorMode};
use crate::lexical::query::DefaultOperator;
use crate::mapping::accessor::Property;
use crate::mapping::converter::ValueConverter;
use crate::mapping::field_mapper::reflection::DEFAULT_PRECISION_STEP;
use crate::mapping::field_mapper::{FieldMapper, FieldSettings, ReflectionFieldMapper};

type MapperFactory<T> =
    Arc<dyn Fn(FieldSettings) -> Result<ReflectionFieldMapper<T>> + Send + Sync>;

/// Options for one mapped property.
///
/// Returned by [`super::ClassMap::property`] and [`super::ClassMap::key`];
/// every option returns the same entry so calls can be chained.
pub struct PropertyMap<T> {
    property_name: &'static str,
    factory: MapperFactory<T>,
    type_converter: Option<Arc<dyn ValueConverter>>,
    pub(crate) is_key: bool,
    field_name: Option<String>,
    precision_step: Option<u32>,
    converter: Option<Arc<dyn ValueConverter>>,
    analyzer: Option<Arc<dyn Analyzer>>,
    index: IndexMode,
    store: StoreMode,
    term_vector: TermVectorMode,
    boost: f32,
    case_sensitive: bool,
    default_operator: DefaultOperator,
    native_sort: bool,
}

impl<T: Send + Sync + 'static> PropertyMap<T> {
    pub(crate) fn new<V: PropertyType>(property: Property<T, V>, is_key: bool) -> Self {
        let factory: MapperFactory<T> =
            Arc::new(move |settings: FieldSettings| ReflectionFieldMapper::new(&property, settings));
        PropertyMap {
            property_name: property.name(),
            factory,
            type_converter: V::default_converter(),
            is_key,
            field_name: None,
            precision_step: None,
            converter: None,
            analyzer: None,
            index: IndexMode::Analyzed,
            store: StoreMode::Yes,
            term_vector: TermVectorMode::No,
            boost: 1.0,
            case_sensitive: false,
            default_operator: DefaultOperator::Or,
            native_sort: false,
        }
    }
}

impl<T> PropertyMap<T> {
    pub fn property_name(&self) -> &'static str {
        self.property_name
    }

    pub fn is_key(&self) -> bool {
        self.is_key
    }

    /// Store the property under a different field name.
    pub fn to_field<S: Into<String>>(&mut self, field_name: S) -> &mut Self {
        self.field_name = Some(field_name.into());
        self
    }

    /// Index the property as a trie-encoded number.
    pub fn as_numeric_field(&mut self) -> &mut Self {
        if self.precision_step.is_none() {
            self.precision_step = Some(DEFAULT_PRECISION_STEP);
        }
        self
    }

    /// Index as a number with the given precision step.
    pub fn with_precision_step(&mut self, precision_step: u32) -> &mut Self {
        self.precision_step = Some(precision_step);
        self
    }

    pub fn converter(&mut self, converter: Arc<dyn ValueConverter>) -> &mut Self {
        self.converter = Some(converter);
        self
    }

    pub fn analyze_with(&mut self, analyzer: Arc<dyn Analyzer>) -> &mut Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn index_mode(&mut self, index: IndexMode) -> &mut Self {
        self.index = index;
        self
    }

    pub fn analyzed(&mut self) -> &mut Self {
        self.index_mode(IndexMode::Analyzed)
    }

    pub fn analyzed_no_norms(&mut self) -> &mut Self {
        self.index_mode(IndexMode::AnalyzedNoNorms)
    }

    pub fn not_analyzed(&mut self) -> &mut Self {
        self.index_mode(IndexMode::NotAnalyzed)
    }

    pub fn not_analyzed_no_norms(&mut self) -> &mut Self {
        self.index_mode(IndexMode::NotAnalyzedNoNorms)
    }

    pub fn not_indexed(&mut self) -> &mut Self {
        self.index_mode(IndexMode::NotIndexed)
    }

    pub fn stored(&mut self) -> &mut Self {
        self.store = StoreMode::Yes;
        self
    }

    pub fn not_stored(&mut self) -> &mut Self {
        self.store = StoreMode::No;
        self
    }

    pub fn boost(&mut self, boost: f32) -> &mut Self {
        self.boost = boost;
        self
    }

    /// Keep case when indexing and querying.
    pub fn case_sensitive(&mut self) -> &mut Self {
        self.case_sensitive = true;
        self
    }

    /// Operator joining the terms of multi-term query text.
    pub fn default_operator(&mut self, operator: DefaultOperator) -> &mut Self {
        self.default_operator = operator;
        self
    }

    /// Sort by the stored text instead of the converted value.
    pub fn native_sort(&mut self) -> &mut Self {
        self.native_sort = true;
        self
    }

    pub fn term_vector(&mut self, term_vector: TermVectorMode) -> &mut Self {
        self.term_vector = term_vector;
        self
    }

    /// The analyzer the field ends up with.
    ///
    /// Explicit analyzers win. Otherwise values are kept verbatim when case
    /// matters, when the field is not analyzed or when an explicit converter
    /// produces the text, and are lower-cased in every other case.
    fn resolve_analyzer(&self) -> Arc<dyn Analyzer> {
        if let Some(analyzer) = &self.analyzer {
            return Arc::clone(analyzer);
        }
        let verbatim = self.case_sensitive
            || matches!(
                self.index,
                IndexMode::NotAnalyzed | IndexMode::NotAnalyzedNoNorms
            )
            || self.converter.is_some();
        if verbatim {
            Arc::new(KeywordAnalyzer::new())
        } else {
            Arc::new(CaseInsensitiveKeywordAnalyzer::new())
        }
    }

    fn settings(&self) -> FieldSettings {
        FieldSettings {
            field_name: self
                .field_name
                .clone()
                .unwrap_or_else(|| self.property_name.to_string()),
            store: self.store,
            index: self.index,
            term_vector: self.term_vector,
            converter: self.converter.clone().or_else(|| self.type_converter.clone()),
            default_operator: self.default_operator,
            case_sensitive: self.case_sensitive,
            analyzer: self.resolve_analyzer(),
            boost: self.boost,
            native_sort: self.native_sort,
            numeric_precision_step: self.precision_step,
        }
    }

    /// Build the field mapper for this property.
    pub fn to_field_mapper(&self) -> Result<Arc<dyn FieldMapper<T>>>
    where
        T: Send + Sync + 'static,
    {
        let settings = self.settings();
        trace!(
            "building mapper for property '{}' (field '{}', analyzer {})",
            self.property_name,
            settings.field_name,
            settings.analyzer.name()
        );
        let mapper = (self.factory)(settings)?;
        Ok(Arc::new(mapper))
    }
}

impl<T> fmt::Debug for PropertyMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMap")
            .field("property", &self.property_name)
            .field("is_key", &self.is_key)
            .field("field_name", &self.field_name)
            .field("index", &self.index)
            .field("precision_step", &self.precision_step)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::converter::IntegerConverter;
    use crate::property;

    #[derive(Debug, Default)]
    struct Product {
        sku: String,
        price: i64,
    }

    #[test]
    fn test_analyzer_defaults() {
        let mut map = PropertyMap::new(property!(Product, sku), false);
        assert_eq!(map.resolve_analyzer().name(), "case_insensitive_keyword");

        map.case_sensitive();
        assert_eq!(map.resolve_analyzer().name(), "keyword");

        let mut map = PropertyMap::new(property!(Product, sku), false);
        map.not_analyzed();
        assert_eq!(map.resolve_analyzer().name(), "keyword");

        let mut map = PropertyMap::new(property!(Product, price), false);
        assert_eq!(map.resolve_analyzer().name(), "case_insensitive_keyword");
        map.converter(Arc::new(IntegerConverter));
        assert_eq!(map.resolve_analyzer().name(), "keyword");
    }

    #[test]
    fn test_settings() {
        let mut map = PropertyMap::new(property!(Product, price), true);
        map.to_field("Price").as_numeric_field().as_numeric_field().boost(2.0);

        let settings = map.settings();
        assert_eq!(settings.field_name, "Price");
        assert_eq!(settings.numeric_precision_step, Some(DEFAULT_PRECISION_STEP));
        assert_eq!(settings.boost, 2.0);
        assert!(settings.converter.is_some());

        let mapper = map.to_field_mapper().unwrap();
        assert_eq!(mapper.field_name(), "Price");
        assert_eq!(mapper.property_name(), "price");
    }
}

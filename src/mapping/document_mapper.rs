//! The per-record-type mapping.
//!
//! A [`DocumentMapper`] owns the field mappers of one record type and applies
//! them together: whole-record conversion, identity keys, change detection,
//! per-field analysis and sorting. It is normally produced by
//! [`crate::fluent::ClassMap::to_document_mapper`] and shared behind an
//! [`Arc`] once built.

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use indexmap::IndexMap;
use log::{debug, trace, warn};

use crate::analysis::{Analyzer, KeywordAnalyzer, PerFieldAnalyzer};
use crate::data::Value;
use crate::error::{LexmapError, Result};
use crate::lexical::core::document::Document;
use crate::lexical::query::{Query, QueryParser, Version};
use crate::lexical::search::{SearchSettings, Sort};
use crate::mapping::field_mapper::{FieldMapper, QueryExecutionContext};
use crate::mapping::key::{DocumentKey, KeyEntry};
use crate::mapping::ordering::CompositeOrdering;

/// Field mappers for record type `T`, applied together.
pub struct DocumentMapper<T> {
    version: Version,
    fields: IndexMap<String, Arc<dyn FieldMapper<T>>>,
    /// Field name to property name.
    field_names: AHashMap<String, String>,
    key_properties: Vec<String>,
    analyzer: Arc<PerFieldAnalyzer>,
    external_analyzer: Option<Arc<dyn Analyzer>>,
    track_scores: bool,
}

impl<T> DocumentMapper<T> {
    pub fn new(version: Version) -> Self {
        DocumentMapper {
            version,
            fields: IndexMap::new(),
            field_names: AHashMap::new(),
            key_properties: Vec::new(),
            analyzer: Arc::new(PerFieldAnalyzer::new(Arc::new(KeywordAnalyzer::new()))),
            external_analyzer: None,
            track_scores: false,
        }
    }

    /// Create a mapper whose multi-field queries use `analyzer`.
    pub fn with_external_analyzer(version: Version, analyzer: Arc<dyn Analyzer>) -> Self {
        let mut mapper = DocumentMapper::new(version);
        mapper.external_analyzer = Some(analyzer);
        mapper
    }

    /// Register a field mapper.
    ///
    /// Its analyzer is registered for its field name. A second mapping for
    /// the same property or the same field name is a configuration error.
    pub fn add_field(&mut self, mapping: Arc<dyn FieldMapper<T>>) -> Result<()> {
        let property = mapping.property_name().to_string();
        let field = mapping.field_name().to_string();

        if self.fields.contains_key(&property) {
            return Err(LexmapError::configuration(format!(
                "Property '{property}' of '{}' is mapped more than once",
                type_name::<T>()
            )));
        }
        if let Some(existing) = self.field_names.get(&field) {
            return Err(LexmapError::configuration(format!(
                "Properties '{existing}' and '{property}' of '{}' both map to field '{field}'",
                type_name::<T>()
            )));
        }

        if mapping.is_score_field() {
            self.enable_score_tracking();
        }

        Arc::make_mut(&mut self.analyzer).add_analyzer(field.as_str(), Arc::clone(mapping.analyzer()));
        debug!(
            "{}: property '{property}' mapped to field '{field}' ({:?}, analyzer {})",
            type_name::<T>(),
            mapping.index_mode(),
            mapping.analyzer().name()
        );

        self.field_names.insert(field, property.clone());
        self.fields.insert(property, mapping);
        Ok(())
    }

    /// Register a field mapper that is part of the record's identity.
    pub fn add_key_field(&mut self, mapping: Arc<dyn FieldMapper<T>>) -> Result<()> {
        let property = mapping.property_name().to_string();
        self.add_field(mapping)?;
        self.key_properties.push(property);
        Ok(())
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// The per-field analyzer built from every registered mapping.
    pub fn analyzer(&self) -> Arc<dyn Analyzer> {
        Arc::clone(&self.analyzer) as Arc<dyn Analyzer>
    }

    pub fn external_analyzer(&self) -> Option<&Arc<dyn Analyzer>> {
        self.external_analyzer.as_ref()
    }

    /// Write every mapped property of `source` into a new document.
    pub fn to_document(&self, source: &T) -> Result<Document> {
        let mut document = Document::new();
        self.copy_to_document(source, &mut document)?;
        Ok(document)
    }

    /// Write every mapped property of `source` into `target`, in mapping order.
    pub fn copy_to_document(&self, source: &T, target: &mut Document) -> Result<()> {
        for mapping in self.fields.values() {
            mapping.copy_to_document(source, target)?;
        }
        trace!("{}: wrote document with {} fields", type_name::<T>(), target.len());
        Ok(())
    }

    /// Assign the properties of `target` from `source`.
    ///
    /// Fields that are missing or cannot be converted are skipped, so a
    /// document holding only some of the fields still fills what it can.
    pub fn to_object(&self, source: &Document, target: &mut T) {
        self.to_object_with_context(source, &QueryExecutionContext::default(), target);
    }

    /// Like [`DocumentMapper::to_object`], also filling the score property
    /// from `context`.
    pub fn to_object_with_context(
        &self,
        source: &Document,
        context: &QueryExecutionContext,
        target: &mut T,
    ) {
        for mapping in self.fields.values() {
            if let Err(e) = mapping.copy_from_document(source, context, target) {
                warn!(
                    "{}: skipping property '{}': {e}",
                    type_name::<T>(),
                    mapping.property_name()
                );
            }
        }
    }

    /// Build a new record from `source`.
    pub fn create_object(&self, source: &Document) -> T
    where
        T: Default,
    {
        let mut target = T::default();
        self.to_object(source, &mut target);
        target
    }

    /// The identity key of a record.
    pub fn to_key(&self, source: &T) -> Result<DocumentKey> {
        self.build_key(|mapping| Ok(mapping.property_value(source)))
    }

    /// The identity key of a stored document.
    pub fn document_to_key(&self, source: &Document) -> Result<DocumentKey> {
        self.build_key(|mapping| Ok(mapping.field_value(source)?.unwrap_or(Value::Null)))
    }

    fn build_key<F>(&self, value_of: F) -> Result<DocumentKey>
    where
        F: Fn(&dyn FieldMapper<T>) -> Result<Value>,
    {
        let mut values = Vec::with_capacity(self.key_properties.len());
        let mut empty = Vec::new();

        for property in &self.key_properties {
            let Some(mapping) = self.fields.get(property) else {
                continue;
            };
            let value = value_of(mapping.as_ref())?;
            if value.is_empty() {
                empty.push(property.as_str());
            } else {
                values.push((mapping, value));
            }
        }

        if !empty.is_empty() {
            return Err(LexmapError::key_integrity(format!(
                "Cannot create key for record of type '{}' with empty value(s) for key properties: {}",
                type_name::<T>(),
                empty.join(", ")
            )));
        }

        let entries = values
            .into_iter()
            .map(|(mapping, value)| KeyEntry::new(mapping.as_ref(), value))
            .collect::<Result<Vec<_>>>()?;
        Ok(DocumentKey::new(entries))
    }

    /// Whether every mapped property of `a` equals the one of `b`.
    pub fn equals(&self, a: &T, b: &T) -> bool {
        self.fields
            .values()
            .all(|mapping| values_equal(&mapping.property_value(a), &mapping.property_value(b)))
    }

    /// Whether `record` differs from what `document` stores.
    ///
    /// The score property and fields that are never written are not compared.
    pub fn is_modified(&self, record: &T, document: &Document) -> Result<bool> {
        for mapping in self.fields.values() {
            if mapping.is_score_field() || !mapping.is_persisted() {
                continue;
            }
            let stored = mapping.field_value(document)?.unwrap_or(Value::Null);
            let current = mapping.property_value(record);
            if !values_equal(&current, &stored) {
                trace!(
                    "{}: property '{}' modified: {current} != {stored}",
                    type_name::<T>(),
                    mapping.property_name()
                );
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Parse `text` against every indexed field at once.
    ///
    /// Uses the external analyzer, or a keyword analyzer when none was given.
    /// Field-specific conversion and analysis are not applied, so the result
    /// only approximates querying each field through its own mapper.
    pub fn create_multi_field_query(&self, text: &str) -> Result<Query> {
        let fields: Vec<String> = self
            .fields
            .values()
            .filter(|mapping| mapping.index_mode().is_indexed())
            .map(|mapping| mapping.field_name().to_string())
            .collect();
        let analyzer = self
            .external_analyzer
            .clone()
            .unwrap_or_else(|| Arc::new(KeywordAnalyzer::new()));

        QueryParser::multi_field(self.version, fields, analyzer).parse(text)
    }

    /// Ask search sessions to keep the score of every hit.
    pub fn enable_score_tracking(&mut self) {
        self.track_scores = true;
    }

    pub fn is_score_tracking_enabled(&self) -> bool {
        self.track_scores
    }

    /// Apply the settings this mapping needs to a search session.
    pub fn prepare_search_settings(&self, settings: &mut SearchSettings) {
        if self.track_scores {
            settings.track_doc_scores = true;
        }
    }

    /// Property names in mapping order.
    pub fn all_properties(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// Property names whose fields are searchable.
    pub fn indexed_properties(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, mapping)| mapping.index_mode().is_indexed())
            .map(|(property, _)| property.as_str())
            .collect()
    }

    pub fn key_properties(&self) -> Vec<&str> {
        self.key_properties.iter().map(String::as_str).collect()
    }

    /// The mapping for a property name, or failing that a field name.
    pub fn get_mapping_info(&self, name: &str) -> Option<&dyn FieldMapper<T>> {
        self.fields
            .get(name)
            .or_else(|| {
                self.field_names
                    .get(name)
                    .and_then(|property| self.fields.get(property))
            })
            .map(|mapping| mapping.as_ref())
    }

    pub fn mappings(&self) -> impl Iterator<Item = &dyn FieldMapper<T>> {
        self.fields.values().map(|mapping| mapping.as_ref())
    }

    /// Start a multi-key sort over this mapping's properties.
    pub fn ordering(&self) -> CompositeOrdering<'_, T> {
        CompositeOrdering::new(self)
    }

    /// Build the sort for an ordering.
    pub fn create_sort(&self, ordering: &CompositeOrdering<'_, T>) -> Result<Sort> {
        ordering.to_sort()
    }
}

/// Equality that compares lists element-wise and treats a missing value as
/// an empty list.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::List(x), Value::List(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| values_equal(x, y))
        }
        (Value::Null, Value::List(items)) | (Value::List(items), Value::Null) => items.is_empty(),
        _ => a == b,
    }
}

impl<T> fmt::Debug for DocumentMapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentMapper")
            .field("type", &type_name::<T>())
            .field("version", &self.version)
            .field("fields", &self.fields)
            .field("key_properties", &self.key_properties)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fluent::ClassMap;
    use crate::lexical::core::field::Field;
    use crate::mapping::field_mapper::DocumentKeyFieldMapper;
    use crate::property;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Product {
        id: String,
        name: String,
        price: i64,
        tags: Vec<String>,
        score: f32,
    }

    fn mapper() -> DocumentMapper<Product> {
        let mut map = ClassMap::<Product>::new();
        map.key(property!(Product, id)).to_field("Id");
        map.property(property!(Product, name)).to_field("Name");
        map.property(property!(Product, price)).to_field("Price");
        map.property(property!(Product, tags)).to_field("Tags");
        map.score(property!(Product, score));
        map.to_document_mapper().unwrap()
    }

    fn widget() -> Product {
        Product {
            id: "A-1".to_string(),
            name: "Widget".to_string(),
            price: 15,
            tags: vec!["tools".to_string(), "sale".to_string()],
            score: 0.0,
        }
    }

    #[test]
    fn test_round_trip() {
        let mapper = mapper();
        let doc = mapper.to_document(&widget()).unwrap();
        let restored = mapper.create_object(&doc);
        assert!(mapper.equals(&widget(), &restored));
        assert!(!mapper.is_modified(&restored, &doc).unwrap());
    }

    #[test]
    fn test_partial_document_is_tolerated() {
        let mapper = mapper();
        let doc = Document::new()
            .with_field(Field::text("Name", "Gadget"))
            .with_field(Field::text("Price", "not a number"));
        let product = mapper.create_object(&doc);
        assert_eq!(product.name, "Gadget");
        assert_eq!(product.price, 0);
    }

    #[test]
    fn test_is_modified() {
        let mapper = mapper();
        let doc = mapper.to_document(&widget()).unwrap();
        let mut changed = widget();
        changed.tags.push("new".to_string());
        assert!(mapper.is_modified(&changed, &doc).unwrap());

        let mut scored = widget();
        scored.score = 9.0;
        assert!(!mapper.is_modified(&scored, &doc).unwrap());
    }

    #[test]
    fn test_empty_keys_are_all_reported() {
        let mut map = ClassMap::<Product>::new();
        map.key(property!(Product, id));
        map.key(property!(Product, name));
        let mapper = map.to_document_mapper().unwrap();

        let err = mapper.to_key(&Product::default()).unwrap_err();
        assert!(matches!(err, LexmapError::KeyIntegrity(_)));
        assert!(err.to_string().ends_with("key properties: id, name"));
    }

    #[test]
    fn test_key_from_record_and_document_agree() {
        let mapper = mapper();
        let doc = mapper.to_document(&widget()).unwrap();
        let from_record = mapper.to_key(&widget()).unwrap();
        let from_document = mapper.document_to_key(&doc).unwrap();
        assert_eq!(from_record, from_document);
        assert_eq!(from_record.to_query().to_string(), "+Id:a-1");
    }

    #[test]
    fn test_duplicate_field_name_is_rejected() {
        let mut mapper = DocumentMapper::<Product>::new(Version::default());
        mapper
            .add_field(Arc::new(DocumentKeyFieldMapper::new("Type", "Product")))
            .unwrap();
        let err = mapper
            .add_field(Arc::new(DocumentKeyFieldMapper::new("Type", "Other")))
            .unwrap_err();
        assert!(matches!(err, LexmapError::Configuration(_)));
    }

    #[test]
    fn test_mapping_info_by_property_or_field() {
        let mapper = mapper();
        assert_eq!(mapper.get_mapping_info("name").map(|m| m.field_name()), Some("Name"));
        assert_eq!(mapper.get_mapping_info("Name").map(|m| m.property_name()), Some("name"));
        assert!(mapper.get_mapping_info("Bogus").is_none());
        assert_eq!(mapper.key_properties(), vec!["id"]);
        assert_eq!(mapper.indexed_properties(), vec!["id", "name", "price", "tags"]);
    }

    #[test]
    fn test_score_tracking() {
        let mapper = mapper();
        assert!(mapper.is_score_tracking_enabled());
        let mut settings = SearchSettings::default();
        mapper.prepare_search_settings(&mut settings);
        assert!(settings.track_doc_scores);
    }

    #[test]
    fn test_multi_field_query() {
        let mapper = mapper();
        let query = mapper.create_multi_field_query("tools").unwrap();
        assert_eq!(query.to_string(), "Id:tools Name:tools Price:tools Tags:tools");
    }
}

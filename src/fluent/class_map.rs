//! The mapping builder for one record type.

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;

use crate::analysis::Analyzer;
use crate::data::PropertyType;
use crate::error::{LexmapError, Result};
use crate::fluent::property_map::PropertyMap;
use crate::lexical::query::Version;
use crate::mapping::accessor::Property;
use crate::mapping::document_mapper::DocumentMapper;
use crate::mapping::field_mapper::{
    DocumentBoostMapper, DocumentKeyFieldMapper, FieldMapper, ScoreMapper,
};

/// A constant key field declared on a [`ClassMap`].
#[derive(Debug, Clone)]
pub struct DocumentKeyMap {
    field_name: String,
    value: Option<String>,
}

impl DocumentKeyMap {
    /// Set the constant written to every document. It must not be empty.
    pub fn with_value<S: Into<String>>(&mut self, value: S) -> &mut Self {
        self.value = Some(value.into());
        self
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// Collects the mapping of record type `T` and builds its [`DocumentMapper`].
///
/// Properties keep the order in which they were first declared. Declaring a
/// property again starts its options over but keeps it a key if it was one.
///
/// ```
/// use lexmap::fluent::ClassMap;
/// use lexmap::property;
///
/// #[derive(Default)]
/// struct Product {
///     id: String,
///     name: String,
///     price: i64,
/// }
///
/// let mut map = ClassMap::<Product>::new();
/// map.key(property!(Product, id)).to_field("Id").not_analyzed();
/// map.property(property!(Product, name)).to_field("Name");
/// map.property(property!(Product, price)).to_field("Price").as_numeric_field();
/// map.document_key("Type").with_value("Product");
///
/// let mapper = map.to_document_mapper().unwrap();
/// assert_eq!(mapper.key_properties(), vec!["id", "Type"]);
/// ```
pub struct ClassMap<T> {
    version: Version,
    analyzer: Option<Arc<dyn Analyzer>>,
    properties: IndexMap<&'static str, PropertyMap<T>>,
    document_keys: IndexMap<String, DocumentKeyMap>,
    score: Option<Arc<dyn FieldMapper<T>>>,
    document_boost: Option<Arc<dyn FieldMapper<T>>>,
}

impl<T: Send + Sync + 'static> ClassMap<T> {
    pub fn new() -> Self {
        ClassMap::with_version(Version::default())
    }

    pub fn with_version(version: Version) -> Self {
        ClassMap {
            version,
            analyzer: None,
            properties: IndexMap::new(),
            document_keys: IndexMap::new(),
            score: None,
            document_boost: None,
        }
    }

    /// Analyzer for queries that span every field.
    pub fn external_analyzer(&mut self, analyzer: Arc<dyn Analyzer>) -> &mut Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Map a property to a field.
    pub fn property<V: PropertyType>(&mut self, property: Property<T, V>) -> &mut PropertyMap<T> {
        self.declare(property, false)
    }

    /// Map a property that is part of the record's identity.
    pub fn key<V: PropertyType>(&mut self, property: Property<T, V>) -> &mut PropertyMap<T> {
        self.declare(property, true)
    }

    fn declare<V: PropertyType>(&mut self, property: Property<T, V>, is_key: bool) -> &mut PropertyMap<T> {
        let name = property.name();
        let was_key = self.properties.get(name).is_some_and(PropertyMap::is_key);
        let entry = PropertyMap::new(property, is_key || was_key);

        match self.properties.entry(name) {
            indexmap::map::Entry::Occupied(mut occupied) => {
                occupied.insert(entry);
                occupied.into_mut()
            }
            indexmap::map::Entry::Vacant(vacant) => vacant.insert(entry),
        }
    }

    /// Fill a property with the relevance score of each hit.
    pub fn score<V: PropertyType>(&mut self, property: Property<T, V>) -> &mut Self {
        self.score = Some(Arc::new(ScoreMapper::new(&property)));
        self
    }

    /// Bind a property to the document boost.
    pub fn document_boost<V: PropertyType>(&mut self, property: Property<T, V>) -> &mut Self {
        self.document_boost = Some(Arc::new(DocumentBoostMapper::new(&property)));
        self
    }

    /// Declare a constant key field. Give it a value with
    /// [`DocumentKeyMap::with_value`].
    pub fn document_key<S: Into<String>>(&mut self, field_name: S) -> &mut DocumentKeyMap {
        let field_name = field_name.into();
        self.document_keys
            .entry(field_name.clone())
            .or_insert_with(|| DocumentKeyMap {
                field_name,
                value: None,
            })
    }

    /// Build the document mapper.
    ///
    /// Can be called any number of times; each call builds an independent
    /// mapper from the current declarations.
    pub fn to_document_mapper(&self) -> Result<DocumentMapper<T>> {
        let mut mapper = match &self.analyzer {
            Some(analyzer) => DocumentMapper::with_external_analyzer(self.version, Arc::clone(analyzer)),
            None => DocumentMapper::new(self.version),
        };

        for property in self.properties.values() {
            let field = property.to_field_mapper()?;
            if property.is_key() {
                mapper.add_key_field(field)?;
            } else {
                mapper.add_field(field)?;
            }
        }

        for special in [&self.score, &self.document_boost].into_iter().flatten() {
            mapper.add_field(Arc::clone(special))?;
        }

        for key in self.document_keys.values() {
            let value = key.value.as_deref().filter(|v| !v.is_empty()).ok_or_else(|| {
                LexmapError::configuration(format!(
                    "Document key '{}' of '{}' has no value",
                    key.field_name,
                    type_name::<T>()
                ))
            })?;
            mapper.add_key_field(Arc::new(DocumentKeyFieldMapper::new(key.field_name.as_str(), value)))?;
        }

        debug!(
            "built document mapper for '{}' with {} properties",
            type_name::<T>(),
            mapper.all_properties().len()
        );
        Ok(mapper)
    }
}

impl<T: Send + Sync + 'static> Default for ClassMap<T> {
    fn default() -> Self {
        ClassMap::new()
    }
}

impl<T> fmt::Debug for ClassMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassMap")
            .field("type", &type_name::<T>())
            .field("version", &self.version)
            .field("properties", &self.properties)
            .field("document_keys", &self.document_keys)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::core::field::IndexMode;

    #[derive(Debug, Default)]
    struct Product {
        id: String,
        name: String,
        weight: f32,
        score: f32,
    }

    #[test]
    fn test_redeclaring_keeps_key_flag_and_order() {
        let mut map = ClassMap::<Product>::new();
        map.key(crate::property!(Product, id)).to_field("Identifier");
        map.property(crate::property!(Product, name));
        map.property(crate::property!(Product, id)).not_indexed();

        let mapper = map.to_document_mapper().unwrap();
        assert_eq!(mapper.all_properties(), vec!["id", "name"]);
        assert_eq!(mapper.key_properties(), vec!["id"]);

        let id = mapper.get_mapping_info("id").unwrap();
        assert_eq!(id.field_name(), "id");
        assert_eq!(id.index_mode(), IndexMode::NotIndexed);
    }

    #[test]
    fn test_document_key_needs_a_value() {
        let mut map = ClassMap::<Product>::new();
        map.document_key("Type");
        let err = map.to_document_mapper().unwrap_err();
        assert!(matches!(err, LexmapError::Configuration(_)));

        map.document_key("Type").with_value("");
        let err = map.to_document_mapper().unwrap_err();
        assert!(matches!(err, LexmapError::Configuration(_)));

        map.document_key("Type").with_value("Product");
        let mapper = map.to_document_mapper().unwrap();
        let doc = mapper.to_document(&Product::default()).unwrap();
        assert_eq!(doc.get("Type").as_deref(), Some("Product"));
    }

    #[test]
    fn test_special_fields() {
        let mut map = ClassMap::<Product>::new();
        map.property(crate::property!(Product, name));
        map.score(crate::property!(Product, score))
            .document_boost(crate::property!(Product, weight));

        let mapper = map.to_document_mapper().unwrap();
        assert!(mapper.is_score_tracking_enabled());
        assert_eq!(mapper.indexed_properties(), vec!["name"]);

        let product = Product {
            weight: 3.0,
            ..Default::default()
        };
        let doc = mapper.to_document(&product).unwrap();
        assert_eq!(doc.boost(), 3.0);
    }
}

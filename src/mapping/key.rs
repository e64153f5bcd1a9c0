//! Identity keys of mapped records.

use std::fmt;

use crate::data::Value;
use crate::error::Result;
use crate::lexical::query::{BooleanQuery, Query};
use crate::mapping::field_mapper::FieldMapper;

/// One component of a [`DocumentKey`].
#[derive(Debug, Clone)]
pub struct KeyEntry {
    field: String,
    property: String,
    value: Value,
    query: Query,
}

impl KeyEntry {
    /// Build the entry for `value` and compile its exact-match query.
    pub fn new<T>(mapper: &dyn FieldMapper<T>, value: Value) -> Result<Self> {
        let expression = mapper.convert_to_query_expression(&value)?;
        let query = mapper.create_query(&mapper.escape_special_characters(Some(&expression)))?;
        Ok(KeyEntry {
            field: mapper.field_name().to_string(),
            property: mapper.property_name().to_string(),
            value,
            query,
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Query matching exactly this value in this field.
    pub fn query(&self) -> &Query {
        &self.query
    }
}

/// The identity of a record: its key field values in mapping order.
///
/// Two keys are equal when they name the same fields with equal values.
/// Sessions use [`DocumentKey::to_query`] to find the document that stores
/// a record, for example to replace or delete it.
#[derive(Debug, Clone, Default)]
pub struct DocumentKey {
    entries: Vec<KeyEntry>,
}

impl DocumentKey {
    pub fn new(entries: Vec<KeyEntry>) -> Self {
        DocumentKey { entries }
    }

    pub fn entries(&self) -> &[KeyEntry] {
        &self.entries
    }

    /// Value of the key field named `field`.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| &entry.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// A record type without key fields has an empty key.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A query that requires every key field to match.
    pub fn to_query(&self) -> Query {
        let mut query = BooleanQuery::new();
        for entry in &self.entries {
            query.add_must(entry.query.clone());
        }
        query.into()
    }
}

impl PartialEq for DocumentKey {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|(a, b)| a.field == b.field && a.value == b.value)
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", entry.field, entry.value)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::field_mapper::DocumentKeyFieldMapper;

    struct Product;

    #[test]
    fn test_key_query_and_equality() {
        let mapper = DocumentKeyFieldMapper::<Product>::new("Type", "Product");
        let entry = KeyEntry::new::<Product>(&mapper, Value::from("Product")).unwrap();
        let key = DocumentKey::new(vec![entry.clone()]);

        assert_eq!(key.get("Type"), Some(&Value::from("Product")));
        assert_eq!(key.to_string(), "{Type: Product}");
        assert_eq!(key.to_query().to_string(), "+Type:Product");
        assert_eq!(key, DocumentKey::new(vec![entry]));
        assert_ne!(key, DocumentKey::default());
    }
}

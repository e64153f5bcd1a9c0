//! Documents as seen by the index engine.
//!
//! A [`Document`] is an ordered multiset of named fields plus a document-level
//! boost. Several fields may share a name (one per element of a collection
//! property); lookups by name return the first match.

use serde::{Deserialize, Serialize};

use crate::lexical::core::field::Field;

/// An ordered collection of named fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    fields: Vec<Field>,
    boost: f32,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Document {
            fields: Vec::new(),
            boost: 1.0,
        }
    }

    /// Append a field.
    pub fn add(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Append a field, builder style.
    pub fn with_field(mut self, field: Field) -> Self {
        self.add(field);
        self
    }

    /// Remove every field with the given name.
    pub fn remove_fields(&mut self, name: &str) {
        self.fields.retain(|f| f.name() != name);
    }

    /// First field with the given name.
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Every field with the given name, in insertion order.
    pub fn get_fields<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields.iter().filter(move |f| f.name() == name)
    }

    /// Text of the first field with the given name.
    pub fn get(&self, name: &str) -> Option<String> {
        self.get_field(name).map(Field::string_value)
    }

    /// Check if the document has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }

    /// All fields, in insertion order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Distinct field names, in order of first appearance.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for field in &self.fields {
            if !names.contains(&field.name()) {
                names.push(field.name());
            }
        }
        names
    }

    pub fn boost(&self) -> f32 {
        self.boost
    }

    pub fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_valued_fields() {
        let mut doc = Document::new()
            .with_field(Field::text("Tags", "a"))
            .with_field(Field::text("Name", "Widget"))
            .with_field(Field::text("Tags", "b"));

        let tags: Vec<_> = doc.get_fields("Tags").map(Field::string_value).collect();
        assert_eq!(tags, vec!["a", "b"]);
        assert_eq!(doc.field_names(), vec!["Tags", "Name"]);

        doc.remove_fields("Tags");
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get("Name").as_deref(), Some("Widget"));
        assert!(!doc.has_field("Tags"));
    }
}

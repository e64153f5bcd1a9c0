//! Document fields and their indexing options.
//!
//! This module defines:
//! - [`Field`] - a named value together with its storage and indexing options
//! - [`FieldValue`] - the value held by a field (text or numeric)
//! - [`IndexMode`], [`StoreMode`], [`TermVectorMode`] - per-field options
//!
//! # Examples
//!
//! ```
//! use lexmap::lexical::core::field::{Field, IndexMode, StoreMode};
//!
//! let field = Field::text("Name", "Widget")
//!     .with_index(IndexMode::NotAnalyzed)
//!     .with_store(StoreMode::Yes);
//! assert_eq!(field.string_value(), "Widget");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric type classification for numeric fields and range queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericType {
    /// Integer type (i64).
    Integer,
    /// Float type (f64).
    Float,
}

/// A numeric field value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NumericValue {
    Integer(i64),
    Float(f64),
}

impl NumericValue {
    /// Parse `text` as a number of the given type.
    pub fn parse(numeric_type: NumericType, text: &str) -> Option<Self> {
        let text = text.trim();
        match numeric_type {
            NumericType::Integer => text.parse::<i64>().ok().map(NumericValue::Integer),
            NumericType::Float => text.parse::<f64>().ok().map(NumericValue::Float),
        }
    }

    /// The numeric type of this value.
    pub fn numeric_type(&self) -> NumericType {
        match self {
            NumericValue::Integer(_) => NumericType::Integer,
            NumericValue::Float(_) => NumericType::Float,
        }
    }

    /// This value as a float.
    pub fn as_f64(&self) -> f64 {
        match self {
            NumericValue::Integer(i) => *i as f64,
            NumericValue::Float(f) => *f,
        }
    }

    /// Compare two numeric values, widening to float when the types differ.
    pub fn total_cmp(&self, other: &NumericValue) -> std::cmp::Ordering {
        match (self, other) {
            (NumericValue::Integer(a), NumericValue::Integer(b)) => a.cmp(b),
            _ => self.as_f64().total_cmp(&other.as_f64()),
        }
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericValue::Integer(i) => write!(f, "{i}"),
            NumericValue::Float(v) => write!(f, "{v}"),
        }
    }
}

/// The value stored in a document field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Numeric(NumericValue),
}

impl FieldValue {
    /// Returns the text value if this is a Text variant.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Numeric(_) => None,
        }
    }

    /// Returns the numeric value if this is a Numeric variant.
    pub fn as_numeric(&self) -> Option<NumericValue> {
        match self {
            FieldValue::Numeric(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }
}

/// How a field is indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IndexMode {
    /// Tokenized by the field's analyzer.
    #[default]
    Analyzed,
    /// Tokenized, without length norms.
    AnalyzedNoNorms,
    /// Indexed as a single verbatim term.
    NotAnalyzed,
    /// Indexed as a single verbatim term, without length norms.
    NotAnalyzedNoNorms,
    /// Not searchable at all.
    NotIndexed,
}

impl IndexMode {
    /// Returns true unless the mode is [`IndexMode::NotIndexed`].
    pub fn is_indexed(&self) -> bool {
        !matches!(self, IndexMode::NotIndexed)
    }

    /// Returns true for the two analyzed modes.
    pub fn is_analyzed(&self) -> bool {
        matches!(self, IndexMode::Analyzed | IndexMode::AnalyzedNoNorms)
    }

    /// Returns true when length norms are omitted.
    pub fn omits_norms(&self) -> bool {
        matches!(
            self,
            IndexMode::AnalyzedNoNorms | IndexMode::NotAnalyzedNoNorms
        )
    }
}

/// Whether the original field value is kept for retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StoreMode {
    #[default]
    Yes,
    No,
}

/// Which term vector data is recorded for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TermVectorMode {
    #[default]
    No,
    Yes,
    WithPositions,
    WithOffsets,
    WithPositionsOffsets,
}

/// A named document field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    name: String,
    value: FieldValue,
    store: StoreMode,
    index: IndexMode,
    term_vector: TermVectorMode,
    boost: f32,
    /// Precision step for trie-encoded numeric fields.
    precision_step: Option<u32>,
}

impl Field {
    /// Create a field with default options (stored, analyzed, no term vectors).
    pub fn new<S: Into<String>>(name: S, value: FieldValue) -> Self {
        Field {
            name: name.into(),
            value,
            store: StoreMode::Yes,
            index: IndexMode::Analyzed,
            term_vector: TermVectorMode::No,
            boost: 1.0,
            precision_step: None,
        }
    }

    /// Create a text field with default options.
    pub fn text<S: Into<String>, T: Into<String>>(name: S, text: T) -> Self {
        Field::new(name, FieldValue::Text(text.into()))
    }

    /// Create a numeric field with the given precision step.
    pub fn numeric<S: Into<String>>(name: S, value: NumericValue, precision_step: u32) -> Self {
        let mut field = Field::new(name, FieldValue::Numeric(value));
        field.precision_step = Some(precision_step);
        field
    }

    pub fn with_store(mut self, store: StoreMode) -> Self {
        self.store = store;
        self
    }

    pub fn with_index(mut self, index: IndexMode) -> Self {
        self.index = index;
        self
    }

    pub fn with_term_vector(mut self, term_vector: TermVectorMode) -> Self {
        self.term_vector = term_vector;
        self
    }

    /// Set the index-time boost of this field.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn store(&self) -> StoreMode {
        self.store
    }

    pub fn index(&self) -> IndexMode {
        self.index
    }

    pub fn term_vector(&self) -> TermVectorMode {
        self.term_vector
    }

    pub fn boost(&self) -> f32 {
        self.boost
    }

    pub fn precision_step(&self) -> Option<u32> {
        self.precision_step
    }

    /// The field value rendered as text. Numeric values use their decimal form.
    pub fn string_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Numeric(n) => n.to_string(),
        }
    }
}

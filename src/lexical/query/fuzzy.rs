//! Fuzzy query implementation for approximate string matching.

use serde::{Deserialize, Serialize};

/// A fuzzy query for approximate string matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyQuery {
    /// Field to search in
    field: String,
    /// Term to search for
    term: String,
    /// Minimum similarity in `(0, 1)`; the allowed edit distance is derived from it.
    min_similarity: f32,
    /// Minimum prefix length that must match exactly
    prefix_length: u32,
    /// Boost factor for the query
    boost: f32,
}

impl FuzzyQuery {
    /// Create a new fuzzy query with default settings.
    pub fn new<F: Into<String>, T: Into<String>>(field: F, term: T) -> Self {
        FuzzyQuery {
            field: field.into(),
            term: term.into(),
            min_similarity: 0.5,
            prefix_length: 0,
            boost: 1.0,
        }
    }

    /// Set the minimum similarity.
    pub fn min_similarity(mut self, min_similarity: f32) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    /// Set the minimum prefix length that must match exactly.
    pub fn prefix_length(mut self, prefix_length: u32) -> Self {
        self.prefix_length = prefix_length;
        self
    }

    /// Set the boost factor for this query.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the search term.
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn get_min_similarity(&self) -> f32 {
        self.min_similarity
    }

    pub fn get_prefix_length(&self) -> u32 {
        self.prefix_length
    }

    pub fn boost(&self) -> f32 {
        self.boost
    }

    /// Maximum number of edits allowed for a candidate term of `len` characters.
    pub fn max_edits_for(&self, len: usize) -> u32 {
        let len = len.max(self.term.chars().count()) as f32;
        ((1.0 - self.min_similarity) * len).floor() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_edits_from_similarity() {
        let query = FuzzyQuery::new("Name", "widget").min_similarity(0.5);
        assert_eq!(query.max_edits_for(6), 3);

        let strict = FuzzyQuery::new("Name", "widget").min_similarity(0.8);
        assert_eq!(strict.max_edits_for(6), 1);
    }
}

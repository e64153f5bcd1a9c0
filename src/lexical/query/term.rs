//! Exact term and prefix queries.

use serde::{Deserialize, Serialize};

/// Matches documents whose field contains exactly the given term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermQuery {
    field: String,
    term: String,
    boost: f32,
}

impl TermQuery {
    pub fn new<F: Into<String>, T: Into<String>>(field: F, term: T) -> Self {
        TermQuery {
            field: field.into(),
            term: term.into(),
            boost: 1.0,
        }
    }

    /// Set the boost factor for this query.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn boost(&self) -> f32 {
        self.boost
    }
}

/// Matches terms starting with a prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixQuery {
    field: String,
    prefix: String,
    boost: f32,
}

impl PrefixQuery {
    pub fn new<F: Into<String>, P: Into<String>>(field: F, prefix: P) -> Self {
        PrefixQuery {
            field: field.into(),
            prefix: prefix.into(),
            boost: 1.0,
        }
    }

    /// Set the boost factor for this query.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn boost(&self) -> f32 {
        self.boost
    }

    /// Check if a term starts with the prefix.
    pub fn matches(&self, term: &str) -> bool {
        term.starts_with(&self.prefix)
    }
}

/// Matches a sequence of terms at given relative positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseQuery {
    field: String,
    /// Terms with their positions relative to the first term.
    terms: Vec<(String, usize)>,
    slop: u32,
    boost: f32,
}

impl PhraseQuery {
    pub fn new<F: Into<String>>(field: F) -> Self {
        PhraseQuery {
            field: field.into(),
            terms: Vec::new(),
            slop: 0,
            boost: 1.0,
        }
    }

    /// Add a term at an explicit position.
    pub fn add_term<T: Into<String>>(&mut self, term: T, position: usize) {
        self.terms.push((term.into(), position));
    }

    /// Set the maximum positional distance between terms.
    pub fn with_slop(mut self, slop: u32) -> Self {
        self.slop = slop;
        self
    }

    /// Set the boost factor for this query.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn terms(&self) -> &[(String, usize)] {
        &self.terms
    }

    pub fn slop(&self) -> u32 {
        self.slop
    }

    pub fn boost(&self) -> f32 {
        self.boost
    }
}

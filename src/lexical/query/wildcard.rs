//! Wildcard query implementation for pattern matching.

use std::sync::Arc;

use regex::Regex;

use crate::error::{LexmapError, Result};

/// A query that matches terms against a wildcard pattern.
///
/// Supports the following wildcards:
/// - `*` matches zero or more characters
/// - `?` matches exactly one character
/// - `\*` and `\?` match literal `*` and `?` characters
#[derive(Debug, Clone)]
pub struct WildcardQuery {
    /// The field to search in.
    field: String,
    /// The wildcard pattern.
    pattern: String,
    /// The compiled regex for matching.
    regex: Arc<Regex>,
    /// The boost factor for this query.
    boost: f32,
}

impl WildcardQuery {
    /// Create a new wildcard query.
    pub fn new<F: Into<String>, P: Into<String>>(field: F, pattern: P) -> Result<Self> {
        let field = field.into();
        let pattern = pattern.into();
        let regex_pattern = Self::compile_pattern(&pattern);
        let regex = Regex::new(&regex_pattern)
            .map_err(|e| LexmapError::analysis(format!("Invalid wildcard pattern: {e}")))?;

        Ok(WildcardQuery {
            field,
            pattern,
            regex: Arc::new(regex),
            boost: 1.0,
        })
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

    /// Get the wildcard pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn boost(&self) -> f32 {
        self.boost
    }

    /// Compile a wildcard pattern into an anchored regex string.
    fn compile_pattern(pattern: &str) -> String {
        let mut regex_pattern = String::from("^");
        let mut chars = pattern.chars();

        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(escaped) => regex_pattern.push_str(&regex::escape(&escaped.to_string())),
                    None => regex_pattern.push_str("\\\\"),
                },
                '*' => regex_pattern.push_str(".*"),
                '?' => regex_pattern.push('.'),
                c => regex_pattern.push_str(&regex::escape(&c.to_string())),
            }
        }

        regex_pattern.push('$');
        regex_pattern
    }

    /// Check if a term matches the wildcard pattern.
    pub fn matches(&self, term: &str) -> bool {
        self.regex.is_match(term)
    }
}

impl PartialEq for WildcardQuery {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.pattern == other.pattern && self.boost == other.boost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_query_creation() {
        let query = WildcardQuery::new("content", "hello*").unwrap();

        assert_eq!(query.field(), "content");
        assert_eq!(query.pattern(), "hello*");
        assert_eq!(query.boost(), 1.0);
    }

    #[test]
    fn test_wildcard_pattern_compilation() {
        let query = WildcardQuery::new("field", "hello*").unwrap();
        assert!(query.matches("hello"));
        assert!(query.matches("helloworld"));
        assert!(!query.matches("hell"));

        let query = WildcardQuery::new("field", "h?llo").unwrap();
        assert!(query.matches("hallo"));
        assert!(!query.matches("heello"));
    }

    #[test]
    fn test_escaped_wildcards_are_literal() {
        let query = WildcardQuery::new("field", r"a\*b*").unwrap();
        assert!(query.matches("a*bcd"));
        assert!(!query.matches("axbcd"));

        let query = WildcardQuery::new("field", "big widget (v2)*").unwrap();
        assert!(query.matches("big widget (v2) deluxe"));
    }
}

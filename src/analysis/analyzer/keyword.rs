//! Keyword analyzers: the whole input becomes a single token.

use std::any::Any;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

fn single_token(text: String, len: usize) -> TokenStream {
    if text.is_empty() {
        return Box::new(std::iter::empty());
    }
    Box::new(std::iter::once(Token::new(text, 0).with_offsets(0, len)))
}

/// Emits the input unchanged as one token.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordAnalyzer;

impl KeywordAnalyzer {
    pub fn new() -> Self {
        KeywordAnalyzer
    }
}

impl Analyzer for KeywordAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        Ok(single_token(text.to_string(), text.len()))
    }

    fn name(&self) -> &'static str {
        "keyword"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Emits the lower-cased input as one token.
///
/// This is the default analyzer for mapped properties that are neither
/// case-sensitive nor stored verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitiveKeywordAnalyzer;

impl CaseInsensitiveKeywordAnalyzer {
    pub fn new() -> Self {
        CaseInsensitiveKeywordAnalyzer
    }
}

impl Analyzer for CaseInsensitiveKeywordAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        Ok(single_token(text.to_lowercase(), text.len()))
    }

    fn name(&self) -> &'static str {
        "case_insensitive_keyword"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_keeps_whitespace_and_case() {
        let terms = KeywordAnalyzer.terms("Name", "Big Widget").unwrap();
        assert_eq!(terms, vec!["Big Widget"]);
    }

    #[test]
    fn test_case_insensitive_keyword() {
        let terms = CaseInsensitiveKeywordAnalyzer
            .terms("Name", "Big Widget")
            .unwrap();
        assert_eq!(terms, vec!["big widget"]);
    }

    #[test]
    fn test_empty_input_has_no_tokens() {
        assert!(KeywordAnalyzer.terms("Name", "").unwrap().is_empty());
    }
}

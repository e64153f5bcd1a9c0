//! Standard analyzer based on Unicode word boundaries.

use std::any::Any;
use std::collections::HashSet;

use lazy_static::lazy_static;
use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

lazy_static! {
    static ref ENGLISH_STOP_WORDS: HashSet<&'static str> = [
        "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is",
        "it", "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there",
        "these", "they", "this", "to", "was", "will", "with",
    ]
    .into_iter()
    .collect();
}

/// Segments text into Unicode words, lower-cases them and removes English
/// stop words.
///
/// Removed stop words still advance the token position, so phrase queries
/// built from this analyzer keep their gaps.
#[derive(Debug, Clone)]
pub struct StandardAnalyzer {
    stop_words: bool,
}

impl StandardAnalyzer {
    pub fn new() -> Self {
        StandardAnalyzer { stop_words: true }
    }

    /// Keep stop words in the token stream.
    pub fn without_stop_words() -> Self {
        StandardAnalyzer { stop_words: false }
    }
}

impl Default for StandardAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for StandardAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = Vec::new();
        for (position, (offset, word)) in text.unicode_word_indices().enumerate() {
            let lower = word.to_lowercase();
            if self.stop_words && ENGLISH_STOP_WORDS.contains(lower.as_str()) {
                continue;
            }
            tokens.push(Token::new(lower, position).with_offsets(offset, offset + word.len()));
        }
        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "standard"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

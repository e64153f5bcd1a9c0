//! Simple splitting analyzers.

use std::any::Any;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// Split `text` wherever `is_separator` holds, keeping byte offsets.
fn split_tokens<F>(text: &str, is_separator: F, lowercase: bool) -> Vec<Token>
where
    F: Fn(char) -> bool,
{
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    let push = |s: usize, e: usize, tokens: &mut Vec<Token>| {
        let slice = &text[s..e];
        let text = if lowercase {
            slice.to_lowercase()
        } else {
            slice.to_string()
        };
        let position = tokens.len();
        tokens.push(Token::new(text, position).with_offsets(s, e));
    };

    for (i, c) in text.char_indices() {
        if is_separator(c) {
            if let Some(s) = start.take() {
                push(s, i, &mut tokens);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        push(s, text.len(), &mut tokens);
    }

    tokens
}

/// Splits on whitespace; token text is unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceAnalyzer;

impl WhitespaceAnalyzer {
    pub fn new() -> Self {
        WhitespaceAnalyzer
    }
}

impl Analyzer for WhitespaceAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        Ok(Box::new(
            split_tokens(text, char::is_whitespace, false).into_iter(),
        ))
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Splits on every non-letter and lower-cases the tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleAnalyzer;

impl SimpleAnalyzer {
    pub fn new() -> Self {
        SimpleAnalyzer
    }
}

impl Analyzer for SimpleAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        Ok(Box::new(
            split_tokens(text, |c| !c.is_alphabetic(), true).into_iter(),
        ))
    }

    fn name(&self) -> &'static str {
        "simple"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_analyzer() {
        let tokens: Vec<_> = WhitespaceAnalyzer.analyze(" Foo  bar\tBaz ").unwrap().collect();
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Foo", "bar", "Baz"]);
        assert_eq!(tokens[1].start_offset, 6);
        assert_eq!(tokens[2].position, 2);
    }

    #[test]
    fn test_simple_analyzer() {
        let terms = SimpleAnalyzer.terms("f", "Hello, World-42x").unwrap();
        assert_eq!(terms, vec!["hello", "world", "x"]);
    }
}

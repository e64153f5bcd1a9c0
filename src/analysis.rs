//! Text analysis used while indexing mapped fields and compiling queries.
//!
//! The mapping layer only needs the analyzer abstraction: a field's text goes
//! in, an ordered sequence of tokens comes out. A handful of analyzers ship
//! with the crate:
//!
//! - [`KeywordAnalyzer`]: the whole input is one token (case preserved)
//! - [`CaseInsensitiveKeywordAnalyzer`]: the whole input, lower-cased
//! - [`WhitespaceAnalyzer`]: splits on whitespace
//! - [`SimpleAnalyzer`]: splits on non-letters and lower-cases
//! - [`StandardAnalyzer`]: Unicode word segmentation, lower-casing, English stop words
//! - [`PerFieldAnalyzer`]: dispatches to a per-field analyzer with a fallback
//!
//! # Examples
//!
//! ```
//! use lexmap::analysis::{Analyzer, StandardAnalyzer};
//!
//! let analyzer = StandardAnalyzer::new();
//! let terms = analyzer.terms("Name", "The Quick Fox").unwrap();
//! assert_eq!(terms, vec!["quick", "fox"]);
//! ```

pub mod analyzer;
pub mod token;

// Re-exports
pub use analyzer::analyzer::Analyzer;
pub use analyzer::keyword::{CaseInsensitiveKeywordAnalyzer, KeywordAnalyzer};
pub use analyzer::per_field::PerFieldAnalyzer;
pub use analyzer::simple::{SimpleAnalyzer, WhitespaceAnalyzer};
pub use analyzer::standard::StandardAnalyzer;
pub use token::{Token, TokenStream};

//! The analyzer trait.

use std::any::Any;
use std::fmt::Debug;

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Turns field text into an ordered sequence of tokens.
///
/// Analyzers are shared between mappers and parsers, so implementations must
/// be `Send + Sync` and must not keep per-call state.
pub trait Analyzer: Send + Sync + Debug {
    /// Analyze text that is not bound to a particular field.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Analyze text for the named field.
    ///
    /// Most analyzers ignore the field name; [`super::per_field::PerFieldAnalyzer`]
    /// uses it to pick the analyzer registered for the field.
    fn analyze_field(&self, field: &str, text: &str) -> Result<TokenStream> {
        let _ = field;
        self.analyze(text)
    }

    /// Name of this analyzer, for diagnostics.
    fn name(&self) -> &'static str;

    /// Provide access to the concrete type for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Collect the token texts produced for `text` in `field`.
    fn terms(&self, field: &str, text: &str) -> Result<Vec<String>> {
        Ok(self.analyze_field(field, text)?.map(|t| t.text).collect())
    }

    /// Analyze `text` and concatenate the resulting token texts.
    ///
    /// Keyword-style analyzers return the (possibly case-folded) input; used
    /// to normalize range bounds before they reach the index.
    fn analyze_to_string(&self, field: &str, text: &str) -> Result<String> {
        Ok(self.terms(field, text)?.concat())
    }
}

//! Per-field analyzer dispatch.

use std::any::Any;
use std::sync::Arc;

use ahash::AHashMap;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Routes analysis to the analyzer registered for a field, falling back to a
/// default analyzer for unregistered fields.
#[derive(Debug, Clone)]
pub struct PerFieldAnalyzer {
    default_analyzer: Arc<dyn Analyzer>,
    field_analyzers: AHashMap<String, Arc<dyn Analyzer>>,
}

impl PerFieldAnalyzer {
    /// Create a per-field analyzer with the given fallback.
    pub fn new(default_analyzer: Arc<dyn Analyzer>) -> Self {
        PerFieldAnalyzer {
            default_analyzer,
            field_analyzers: AHashMap::new(),
        }
    }

    /// Register the analyzer for a field, replacing any previous one.
    pub fn add_analyzer<S: Into<String>>(&mut self, field: S, analyzer: Arc<dyn Analyzer>) {
        self.field_analyzers.insert(field.into(), analyzer);
    }

    /// Analyzer registered for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&Arc<dyn Analyzer>> {
        self.field_analyzers.get(field)
    }

    /// Analyzer used for `field`: the registered one or the default.
    pub fn analyzer_for(&self, field: &str) -> &Arc<dyn Analyzer> {
        self.field_analyzers
            .get(field)
            .unwrap_or(&self.default_analyzer)
    }

    /// The fallback analyzer.
    pub fn default_analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.default_analyzer
    }

    /// Names of fields with a registered analyzer.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.field_analyzers.keys().map(String::as_str)
    }
}

impl Analyzer for PerFieldAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.default_analyzer.analyze(text)
    }

    fn analyze_field(&self, field: &str, text: &str) -> Result<TokenStream> {
        self.analyzer_for(field).analyze_field(field, text)
    }

    fn name(&self) -> &'static str {
        "per_field"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{KeywordAnalyzer, StandardAnalyzer};

    #[test]
    fn test_dispatch_by_field() {
        let mut analyzer = PerFieldAnalyzer::new(Arc::new(KeywordAnalyzer));
        analyzer.add_analyzer("Body", Arc::new(StandardAnalyzer::new()));

        assert_eq!(
            analyzer.terms("Body", "Quick Fox").unwrap(),
            vec!["quick", "fox"]
        );
        assert_eq!(analyzer.terms("Id", "Quick Fox").unwrap(), vec!["Quick Fox"]);
        assert_eq!(analyzer.analyzer_for("Id").name(), "keyword");
    }
}

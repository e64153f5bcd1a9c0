//! Classic query-syntax parser.
//!
//! Parses query text such as `+Name:widget -Tags:"on sale" Price:[10 TO 20}`
//! into a [`Query`]. The grammar lives in `parser.pest`; this module turns the
//! parse tree into queries.
//!
//! Construction of every leaf query goes through a [`QueryBuilder`]. The
//! default hook methods produce the standard queries, so a caller that wants
//! different leaf semantics (for example resolving field names against a
//! mapping) implements the trait, overrides the hooks it cares about and calls
//! [`QueryParser::parse_with`].
//!
//! # Supported Syntax
//!
//! - `term`, `field:term`, `field:(a b)`
//! - `"a phrase"`, `"a phrase"~2`
//! - `[a TO b]`, `{a TO b}`, `[a TO b}`, `[* TO b]`
//! - `wild*card?`, `prefix*`, `fuzzy~`, `fuzzy~0.7`
//! - `term^2`, `(a b)^0.5`
//! - `AND` / `&&`, `OR` / `||`, `NOT` / `!`, `+`, `-`
//! - backslash escapes for every special character
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use lexmap::analysis::StandardAnalyzer;
//! use lexmap::lexical::query::QueryParser;
//!
//! let parser = QueryParser::new(Default::default(), "Name", Arc::new(StandardAnalyzer::new()));
//! let query = parser.parse("widget AND Tags:sale*").unwrap();
//! assert_eq!(query.to_string(), "+Name:widget +Tags:sale*");
//! ```

use std::sync::Arc;

use log::trace;
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use serde::{Deserialize, Serialize};

use crate::analysis::Analyzer;
use crate::error::{LexmapError, Result};
use crate::lexical::query::{
    BooleanQuery, FuzzyQuery, Occur, PhraseQuery, PrefixQuery, Query, TermQuery, TermRangeQuery,
    WildcardQuery,
};

/// Pest grammar parser for the classic query syntax.
#[derive(Parser)]
#[grammar = "lexical/query/parser.pest"]
struct QueryStringParser;

/// Compatibility version of the query syntax and analysis rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Version {
    /// Phrase terms get sequential positions.
    V2_9,
    /// Phrase terms keep the analyzer's position increments.
    #[default]
    V3_0,
}

impl Version {
    /// Whether phrase queries honour position gaps left by the analyzer.
    pub fn enable_position_increments(&self) -> bool {
        matches!(self, Version::V3_0)
    }
}

/// Operator applied between clauses that have no explicit conjunction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DefaultOperator {
    And,
    #[default]
    Or,
}

/// Tunable parser settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParserConfig {
    /// Operator used between clauses without a conjunction.
    pub default_operator: DefaultOperator,
    /// Accept wildcard queries that start with `*` or `?`.
    pub allow_leading_wildcard: bool,
    /// Lower-case the text of wildcard, prefix, fuzzy and range queries.
    pub lowercase_expanded_terms: bool,
    /// Slop for phrases that do not give one.
    pub phrase_slop: u32,
    /// Minimum similarity for fuzzy queries that do not give one.
    pub fuzzy_min_sim: f32,
    /// Number of leading characters fuzzy queries must match exactly.
    pub fuzzy_prefix_length: u32,
}

impl Default for QueryParserConfig {
    fn default() -> Self {
        QueryParserConfig {
            default_operator: DefaultOperator::Or,
            allow_leading_wildcard: false,
            lowercase_expanded_terms: true,
            phrase_slop: 0,
            fuzzy_min_sim: 0.5,
            fuzzy_prefix_length: 0,
        }
    }
}

impl QueryParserConfig {
    /// Load settings from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            LexmapError::configuration(format!("Invalid query parser config: {e}"))
        })
    }
}

/// Hooks used by [`QueryParser`] to construct leaf queries.
///
/// Every method has a default that delegates to the matching `new_*`
/// constructor on the parser. A `None` result means the clause produced no
/// query (for example, the analyzer removed every token) and is dropped.
pub trait QueryBuilder {
    /// Build the query for a bare term.
    fn field_query(&self, parser: &QueryParser, field: &str, text: &str) -> Result<Option<Query>> {
        parser.new_field_query(field, text)
    }

    /// Build the query for a quoted phrase.
    ///
    /// Goes through [`QueryBuilder::field_query`] and then applies the slop.
    fn phrase_query(
        &self,
        parser: &QueryParser,
        field: &str,
        text: &str,
        slop: u32,
    ) -> Result<Option<Query>> {
        let query = self.field_query(parser, field, text)?;
        Ok(query.map(|query| match query {
            Query::Phrase(phrase) => Query::Phrase(phrase.with_slop(slop)),
            other => other,
        }))
    }

    /// Build a range query. `None` bounds are open.
    fn range_query(
        &self,
        parser: &QueryParser,
        field: &str,
        lower: Option<&str>,
        upper: Option<&str>,
        include_lower: bool,
        include_upper: bool,
    ) -> Result<Query> {
        parser.new_range_query(field, lower, upper, include_lower, include_upper)
    }

    /// Build a query for a term containing `*` or `?`.
    fn wildcard_query(&self, parser: &QueryParser, field: &str, pattern: &str) -> Result<Query> {
        parser.new_wildcard_query(field, pattern)
    }

    /// Build a query for a term ending in a single `*`.
    fn prefix_query(&self, parser: &QueryParser, field: &str, prefix: &str) -> Result<Query> {
        parser.new_prefix_query(field, prefix)
    }

    /// Build a query for `term~similarity`.
    fn fuzzy_query(
        &self,
        parser: &QueryParser,
        field: &str,
        term: &str,
        min_similarity: f32,
    ) -> Result<Query> {
        parser.new_fuzzy_query(field, term, min_similarity)
    }
}

/// The builder that keeps every default hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardQueryBuilder;

impl QueryBuilder for StandardQueryBuilder {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conjunction {
    None,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    None,
    Required,
    Prohibited,
}

/// Parser for the classic query syntax.
#[derive(Debug, Clone)]
pub struct QueryParser {
    version: Version,
    default_fields: Vec<String>,
    analyzer: Arc<dyn Analyzer>,
    config: QueryParserConfig,
}

impl QueryParser {
    /// Create a parser whose unqualified clauses target `default_field`.
    pub fn new<S: Into<String>>(version: Version, default_field: S, analyzer: Arc<dyn Analyzer>) -> Self {
        QueryParser {
            version,
            default_fields: vec![default_field.into()],
            analyzer,
            config: QueryParserConfig::default(),
        }
    }

    /// Create a parser that expands unqualified clauses over several fields.
    ///
    /// Each unqualified clause becomes a SHOULD group with one query per field.
    pub fn multi_field(version: Version, fields: Vec<String>, analyzer: Arc<dyn Analyzer>) -> Self {
        QueryParser {
            version,
            default_fields: fields,
            analyzer,
            config: QueryParserConfig::default(),
        }
    }

    pub fn with_config(mut self, config: QueryParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn config(&self) -> &QueryParserConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut QueryParserConfig {
        &mut self.config
    }

    pub fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }

    /// The first default field, if any.
    pub fn default_field(&self) -> Option<&str> {
        self.default_fields.first().map(String::as_str)
    }

    pub fn default_fields(&self) -> &[String] {
        &self.default_fields
    }

    pub fn set_default_operator(&mut self, operator: DefaultOperator) {
        self.config.default_operator = operator;
    }

    pub fn set_allow_leading_wildcard(&mut self, allow: bool) {
        self.config.allow_leading_wildcard = allow;
    }

    pub fn set_lowercase_expanded_terms(&mut self, lowercase: bool) {
        self.config.lowercase_expanded_terms = lowercase;
    }

    pub fn set_phrase_slop(&mut self, slop: u32) {
        self.config.phrase_slop = slop;
    }

    /// Parse query text with the standard leaf constructors.
    pub fn parse(&self, text: &str) -> Result<Query> {
        self.parse_with(text, &StandardQueryBuilder)
    }

    /// Parse query text, building leaf queries through `builder`.
    pub fn parse_with(&self, text: &str, builder: &dyn QueryBuilder) -> Result<Query> {
        let pairs = QueryStringParser::parse(Rule::query, text).map_err(|e| {
            LexmapError::query_compilation(format!("Cannot parse '{text}': {e}"))
        })?;

        let mut query = None;
        for pair in pairs {
            if pair.as_rule() == Rule::query {
                for inner in pair.into_inner() {
                    if inner.as_rule() == Rule::sequence {
                        query = self.parse_sequence(inner, None, builder)?;
                    }
                }
            }
        }

        // Every clause analyzed away: match nothing rather than fail.
        let query = query.unwrap_or_else(|| Query::Boolean(BooleanQuery::new()));
        trace!("parsed '{text}' into {query}");
        Ok(query)
    }

    /// Escape every character that has a meaning in the query syntax.
    pub fn escape(text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        for c in text.chars() {
            if matches!(
                c,
                '\\' | '+'
                    | '-'
                    | '!'
                    | '('
                    | ')'
                    | ':'
                    | '^'
                    | '['
                    | ']'
                    | '"'
                    | '{'
                    | '}'
                    | '~'
                    | '*'
                    | '?'
                    | '|'
                    | '&'
            ) {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped
    }

    /// Analyze `text` and build a term, boolean or phrase query from the tokens.
    pub fn new_field_query(&self, field: &str, text: &str) -> Result<Option<Query>> {
        let tokens: Vec<_> = self.analyzer.analyze_field(field, text)?.collect();

        match tokens.len() {
            0 => Ok(None),
            1 => Ok(Some(TermQuery::new(field, tokens[0].text.clone()).into())),
            _ => {
                let first = tokens[0].position;
                if tokens.iter().all(|t| t.position == first) {
                    // Synonyms stacked at one position.
                    let mut query = BooleanQuery::new();
                    for token in tokens {
                        query.add_should(TermQuery::new(field, token.text).into());
                    }
                    return Ok(Some(query.into()));
                }

                let mut phrase = PhraseQuery::new(field).with_slop(self.config.phrase_slop);
                for (i, token) in tokens.into_iter().enumerate() {
                    let position = if self.version.enable_position_increments() {
                        token.position - first
                    } else {
                        i
                    };
                    phrase.add_term(token.text, position);
                }
                Ok(Some(phrase.into()))
            }
        }
    }

    /// Build a term range query, lower-casing the bounds when configured.
    pub fn new_range_query(
        &self,
        field: &str,
        lower: Option<&str>,
        upper: Option<&str>,
        include_lower: bool,
        include_upper: bool,
    ) -> Result<Query> {
        let lower = lower.map(|s| self.expanded(s));
        let upper = upper.map(|s| self.expanded(s));
        Ok(TermRangeQuery::new(field, lower, upper, include_lower, include_upper).into())
    }

    /// Build a wildcard query. `*:*` becomes a match-all query.
    pub fn new_wildcard_query(&self, field: &str, pattern: &str) -> Result<Query> {
        if field == "*" && pattern == "*" {
            return Ok(Query::MatchAll);
        }
        if !self.config.allow_leading_wildcard && (pattern.starts_with('*') || pattern.starts_with('?')) {
            return Err(LexmapError::query_compilation(
                "'*' or '?' not allowed as first character in WildcardQuery",
            ));
        }
        Ok(WildcardQuery::new(field, self.expanded(pattern))?.into())
    }

    pub fn new_prefix_query(&self, field: &str, prefix: &str) -> Result<Query> {
        if !self.config.allow_leading_wildcard && prefix.is_empty() {
            return Err(LexmapError::query_compilation(
                "'*' not allowed as first character in PrefixQuery",
            ));
        }
        Ok(PrefixQuery::new(field, self.expanded(prefix)).into())
    }

    pub fn new_fuzzy_query(&self, field: &str, term: &str, min_similarity: f32) -> Result<Query> {
        Ok(FuzzyQuery::new(field, self.expanded(term))
            .min_similarity(min_similarity)
            .prefix_length(self.config.fuzzy_prefix_length)
            .into())
    }

    fn expanded(&self, text: &str) -> String {
        if self.config.lowercase_expanded_terms {
            text.to_lowercase()
        } else {
            text.to_string()
        }
    }

    fn parse_sequence(
        &self,
        pair: Pair<Rule>,
        field: Option<&str>,
        builder: &dyn QueryBuilder,
    ) -> Result<Option<Query>> {
        let mut clauses: Vec<(Query, Occur)> = Vec::new();
        let mut conjunction = Conjunction::None;
        let mut count = 0;
        let mut first_unmodified = false;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::conjunction => {
                    conjunction = match inner.into_inner().next().map(|p| p.as_rule()) {
                        Some(Rule::and_op) => Conjunction::And,
                        _ => Conjunction::Or,
                    };
                }
                Rule::modified_clause => {
                    let (modifier, query) = self.parse_modified_clause(inner, field, builder)?;
                    if count == 0 {
                        first_unmodified = modifier == Modifier::None;
                    }
                    self.add_clause(&mut clauses, conjunction, modifier, query);
                    conjunction = Conjunction::None;
                    count += 1;
                }
                _ => {}
            }
        }

        if count == 1 && first_unmodified && clauses.len() == 1 {
            return Ok(clauses.pop().map(|(query, _)| query));
        }
        if clauses.is_empty() {
            return Ok(None);
        }

        let mut query = BooleanQuery::new();
        for (clause, occur) in clauses {
            match occur {
                Occur::Must => query.add_must(clause),
                Occur::Should => query.add_should(clause),
                Occur::MustNot => query.add_must_not(clause),
            }
        }
        Ok(Some(query.into()))
    }

    fn add_clause(
        &self,
        clauses: &mut Vec<(Query, Occur)>,
        conjunction: Conjunction,
        modifier: Modifier,
        query: Option<Query>,
    ) {
        // A conjunction also changes the occurrence of the clause before it.
        if let Some((_, previous)) = clauses.last_mut() {
            if *previous != Occur::MustNot {
                match (conjunction, self.config.default_operator) {
                    (Conjunction::And, _) => *previous = Occur::Must,
                    (Conjunction::Or, DefaultOperator::And) => *previous = Occur::Should,
                    _ => {}
                }
            }
        }

        let Some(query) = query else {
            return;
        };

        let prohibited = modifier == Modifier::Prohibited;
        let required = match self.config.default_operator {
            DefaultOperator::Or => {
                modifier == Modifier::Required || (conjunction == Conjunction::And && !prohibited)
            }
            DefaultOperator::And => !prohibited && conjunction != Conjunction::Or,
        };

        let occur = if prohibited {
            Occur::MustNot
        } else if required {
            Occur::Must
        } else {
            Occur::Should
        };
        clauses.push((query, occur));
    }

    fn parse_modified_clause(
        &self,
        pair: Pair<Rule>,
        field: Option<&str>,
        builder: &dyn QueryBuilder,
    ) -> Result<(Modifier, Option<Query>)> {
        let mut modifier = Modifier::None;
        let mut query = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::modifier => {
                    modifier = match inner.into_inner().next().map(|p| p.as_rule()) {
                        Some(Rule::required) => Modifier::Required,
                        _ => Modifier::Prohibited,
                    };
                }
                Rule::clause => query = self.parse_clause(inner, field, builder)?,
                _ => {}
            }
        }

        Ok((modifier, query))
    }

    fn parse_clause(
        &self,
        pair: Pair<Rule>,
        field: Option<&str>,
        builder: &dyn QueryBuilder,
    ) -> Result<Option<Query>> {
        let mut explicit_field: Option<String> = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::field_prefix => {
                    explicit_field = inner
                        .into_inner()
                        .find(|p| p.as_rule() == Rule::field_name)
                        .map(|p| discard_escape_chars(p.as_str()));
                }
                Rule::group => {
                    let field = explicit_field.as_deref().or(field);
                    return self.parse_group(inner, field, builder);
                }
                Rule::range => {
                    let field = explicit_field.as_deref().or(field);
                    return self.parse_range(inner, field, builder);
                }
                Rule::phrase => {
                    let field = explicit_field.as_deref().or(field);
                    return self.parse_phrase(inner, field, builder);
                }
                Rule::term => {
                    let field = explicit_field.as_deref().or(field);
                    return self.parse_term(inner, field, builder);
                }
                _ => {}
            }
        }

        Ok(None)
    }

    fn parse_group(
        &self,
        pair: Pair<Rule>,
        field: Option<&str>,
        builder: &dyn QueryBuilder,
    ) -> Result<Option<Query>> {
        let mut query = None;
        let mut boost = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::sequence => query = self.parse_sequence(inner, field, builder)?,
                Rule::boost => boost = Some(parse_boost(inner)?),
                _ => {}
            }
        }

        Ok(apply_boost(query, boost))
    }

    fn parse_range(
        &self,
        pair: Pair<Rule>,
        field: Option<&str>,
        builder: &dyn QueryBuilder,
    ) -> Result<Option<Query>> {
        let mut include_lower = true;
        let mut include_upper = true;
        let mut bounds: Vec<Option<String>> = Vec::with_capacity(2);
        let mut boost = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::range_open => include_lower = inner.as_str() == "[",
                Rule::range_close => include_upper = inner.as_str() == "]",
                Rule::range_bound => bounds.push(parse_range_bound(inner)),
                Rule::boost => boost = Some(parse_boost(inner)?),
                _ => {}
            }
        }

        let upper = bounds.pop().flatten();
        let lower = bounds.pop().flatten();

        let query = self.for_fields(field, |field| {
            builder
                .range_query(
                    self,
                    field,
                    lower.as_deref(),
                    upper.as_deref(),
                    include_lower,
                    include_upper,
                )
                .map(Some)
        })?;
        Ok(apply_boost(query, boost))
    }

    fn parse_phrase(
        &self,
        pair: Pair<Rule>,
        field: Option<&str>,
        builder: &dyn QueryBuilder,
    ) -> Result<Option<Query>> {
        let mut text = String::new();
        let mut slop = self.config.phrase_slop;
        let mut boost = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::quoted => text = quoted_text(inner),
                Rule::slop => {
                    if let Some(number) = inner.into_inner().next() {
                        slop = parse_number(number.as_str())? as u32;
                    }
                }
                Rule::boost => boost = Some(parse_boost(inner)?),
                _ => {}
            }
        }

        let query = self.for_fields(field, |field| builder.phrase_query(self, field, &text, slop))?;
        Ok(apply_boost(query, boost))
    }

    fn parse_term(
        &self,
        pair: Pair<Rule>,
        field: Option<&str>,
        builder: &dyn QueryBuilder,
    ) -> Result<Option<Query>> {
        let mut image = "";
        let mut fuzzy: Option<f32> = None;
        let mut boost = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::term_text => image = inner.as_str(),
                Rule::fuzzy => {
                    let similarity = match inner.into_inner().next() {
                        Some(number) => parse_number(number.as_str())?,
                        None => self.config.fuzzy_min_sim,
                    };
                    if !(0.0..1.0).contains(&similarity) {
                        return Err(LexmapError::query_compilation(
                            "Minimum similarity for a FuzzyQuery has to be between 0.0 and 1.0",
                        ));
                    }
                    fuzzy = Some(similarity);
                }
                Rule::boost => boost = Some(parse_boost(inner)?),
                _ => {}
            }
        }

        let wildcards = unescaped_wildcards(image);
        let query = if field == Some("*") && image == "*" {
            Some(Query::MatchAll)
        } else if let Some(similarity) = fuzzy {
            let term = discard_escape_chars(image);
            self.for_fields(field, |field| builder.fuzzy_query(self, field, &term, similarity).map(Some))?
        } else if wildcards.len() == 1 && wildcards[0] == image.len() - 1 && image.ends_with('*') && image.len() > 1 {
            let prefix = discard_escape_chars(&image[..image.len() - 1]);
            self.for_fields(field, |field| builder.prefix_query(self, field, &prefix).map(Some))?
        } else if !wildcards.is_empty() {
            self.for_fields(field, |field| builder.wildcard_query(self, field, image).map(Some))?
        } else {
            let text = discard_escape_chars(image);
            self.for_fields(field, |field| builder.field_query(self, field, &text))?
        };

        Ok(apply_boost(query, boost))
    }

    /// Run `build` for the explicit field, or for every default field.
    fn for_fields<F>(&self, field: Option<&str>, mut build: F) -> Result<Option<Query>>
    where
        F: FnMut(&str) -> Result<Option<Query>>,
    {
        if let Some(field) = field {
            return build(field);
        }

        match self.default_fields.as_slice() {
            [] => Err(LexmapError::query_compilation(
                "No field given and no default field configured",
            )),
            [single] => build(single.as_str()),
            fields => {
                let mut query = BooleanQuery::new();
                for field in fields {
                    if let Some(q) = build(field.as_str())? {
                        query.add_should(q);
                    }
                }
                Ok((!query.is_empty()).then(|| query.into()))
            }
        }
    }
}

fn apply_boost(query: Option<Query>, boost: Option<f32>) -> Option<Query> {
    match (query, boost) {
        (Some(query), Some(boost)) => Some(query.with_boost(boost)),
        (query, _) => query,
    }
}

fn parse_number(text: &str) -> Result<f32> {
    text.parse::<f32>()
        .map_err(|e| LexmapError::query_compilation(format!("Invalid number '{text}': {e}")))
}

fn parse_boost(pair: Pair<Rule>) -> Result<f32> {
    match pair.into_inner().next() {
        Some(number) => parse_number(number.as_str()),
        None => Ok(1.0),
    }
}

fn quoted_text(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .find(|p| p.as_rule() == Rule::quoted_text)
        .map(|p| discard_escape_chars(p.as_str()))
        .unwrap_or_default()
}

fn parse_range_bound(pair: Pair<Rule>) -> Option<String> {
    let inner = pair.into_inner().next()?;
    match inner.as_rule() {
        Rule::quoted => Some(quoted_text(inner)),
        _ if inner.as_str() == "*" => None,
        _ => Some(discard_escape_chars(inner.as_str())),
    }
}

/// Byte offsets of every `*` or `?` not preceded by an escape.
fn unescaped_wildcards(text: &str) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '*' || c == '?' {
            positions.push(i);
        }
    }
    positions
}

/// Remove backslash escapes, keeping the escaped characters.
pub(crate) fn discard_escape_chars(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                result.push(next);
            }
        } else {
            result.push(c);
        }
    }
    result
}

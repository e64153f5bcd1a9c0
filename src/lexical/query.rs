//! The query object model produced by query compilation.
//!
//! Queries are plain values: the index engine that executes them is outside
//! this crate. [`Query`] is a closed set of query kinds; `Display` renders a
//! query in the classic query syntax, which is handy for logging and for
//! comparing compiled queries.
//!
//! # Examples
//!
//! ```
//! use lexmap::lexical::query::{Query, TermQuery};
//!
//! let query = Query::from(TermQuery::new("Name", "widget").with_boost(2.0));
//! assert_eq!(query.to_string(), "Name:widget^2");
//! ```

use std::fmt;

pub mod boolean;
pub mod fuzzy;
pub mod parser;
pub mod range;
pub mod term;
pub mod wildcard;

pub use boolean::{BooleanClause, BooleanQuery, Occur};
pub use fuzzy::FuzzyQuery;
pub use parser::{
    DefaultOperator, QueryBuilder, QueryParser, QueryParserConfig, StandardQueryBuilder, Version,
};
pub use range::{NumericRangeQuery, RangeType, TermRangeQuery};
pub use term::{PhraseQuery, PrefixQuery, TermQuery};
pub use wildcard::WildcardQuery;

/// A compiled query.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Term(TermQuery),
    Phrase(PhraseQuery),
    Wildcard(WildcardQuery),
    Prefix(PrefixQuery),
    Fuzzy(FuzzyQuery),
    TermRange(TermRangeQuery),
    NumericRange(NumericRangeQuery),
    Boolean(BooleanQuery),
    MatchAll,
}

impl Query {
    /// The field a leaf query targets. Boolean and match-all queries have none.
    pub fn field(&self) -> Option<&str> {
        match self {
            Query::Term(q) => Some(q.field()),
            Query::Phrase(q) => Some(q.field()),
            Query::Wildcard(q) => Some(q.field()),
            Query::Prefix(q) => Some(q.field()),
            Query::Fuzzy(q) => Some(q.field()),
            Query::TermRange(q) => Some(q.field()),
            Query::NumericRange(q) => Some(q.field()),
            Query::Boolean(_) | Query::MatchAll => None,
        }
    }

    /// The boost factor of this query.
    pub fn boost(&self) -> f32 {
        match self {
            Query::Term(q) => q.boost(),
            Query::Phrase(q) => q.boost(),
            Query::Wildcard(q) => q.boost(),
            Query::Prefix(q) => q.boost(),
            Query::Fuzzy(q) => q.boost(),
            Query::TermRange(q) => q.boost(),
            Query::NumericRange(q) => q.boost(),
            Query::Boolean(q) => q.boost(),
            Query::MatchAll => 1.0,
        }
    }

    /// Return this query with a new boost factor.
    pub fn with_boost(self, boost: f32) -> Query {
        match self {
            Query::Term(q) => Query::Term(q.with_boost(boost)),
            Query::Phrase(q) => Query::Phrase(q.with_boost(boost)),
            Query::Wildcard(q) => Query::Wildcard(q.with_boost(boost)),
            Query::Prefix(q) => Query::Prefix(q.with_boost(boost)),
            Query::Fuzzy(q) => Query::Fuzzy(q.with_boost(boost)),
            Query::TermRange(q) => Query::TermRange(q.with_boost(boost)),
            Query::NumericRange(q) => Query::NumericRange(q.with_boost(boost)),
            Query::Boolean(q) => Query::Boolean(q.with_boost(boost)),
            Query::MatchAll => Query::MatchAll,
        }
    }

    /// Returns the boolean query if this is a Boolean variant.
    pub fn as_boolean(&self) -> Option<&BooleanQuery> {
        match self {
            Query::Boolean(q) => Some(q),
            _ => None,
        }
    }
}

macro_rules! query_from {
    ($($variant:ident($ty:ty)),*) => {
        $(
            impl From<$ty> for Query {
                fn from(q: $ty) -> Self {
                    Query::$variant(q)
                }
            }
        )*
    };
}

query_from!(
    Term(TermQuery),
    Phrase(PhraseQuery),
    Wildcard(WildcardQuery),
    Prefix(PrefixQuery),
    Fuzzy(FuzzyQuery),
    TermRange(TermRangeQuery),
    NumericRange(NumericRangeQuery),
    Boolean(BooleanQuery)
);

fn bound<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "*".to_string(), |v| v.to_string())
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Term(q) => write!(f, "{}:{}", q.field(), q.term())?,
            Query::Phrase(q) => {
                let terms: Vec<&str> = q.terms().iter().map(|(t, _)| t.as_str()).collect();
                write!(f, "{}:\"{}\"", q.field(), terms.join(" "))?;
                if q.slop() > 0 {
                    write!(f, "~{}", q.slop())?;
                }
            }
            Query::Wildcard(q) => write!(f, "{}:{}", q.field(), q.pattern())?,
            Query::Prefix(q) => write!(f, "{}:{}*", q.field(), q.prefix())?,
            Query::Fuzzy(q) => write!(f, "{}:{}~{}", q.field(), q.term(), q.get_min_similarity())?,
            Query::TermRange(q) => write!(
                f,
                "{}:{}{} TO {}{}",
                q.field(),
                if q.includes_lower() { '[' } else { '{' },
                bound(q.lower()),
                bound(q.upper()),
                if q.includes_upper() { ']' } else { '}' },
            )?,
            Query::NumericRange(q) => write!(
                f,
                "{}:{}{} TO {}{}",
                q.field(),
                if q.includes_lower() { '[' } else { '{' },
                bound(q.lower()),
                bound(q.upper()),
                if q.includes_upper() { ']' } else { '}' },
            )?,
            Query::Boolean(q) => {
                if q.boost() != 1.0 {
                    write!(f, "({})", q.to_string_query())?;
                } else {
                    write!(f, "{}", q.to_string_query())?;
                }
            }
            Query::MatchAll => write!(f, "*:*")?,
        }

        let boost = self.boost();
        if boost != 1.0 {
            write!(f, "^{boost}")?;
        }
        Ok(())
    }
}

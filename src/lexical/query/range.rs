//! Range queries over term text and over numeric values.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::lexical::core::field::{NumericType, NumericValue};

/// Whether a range bound includes its endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeType {
    Inclusive,
    Exclusive,
}

impl RangeType {
    pub fn is_inclusive(&self) -> bool {
        matches!(self, RangeType::Inclusive)
    }

    pub fn from_inclusive(inclusive: bool) -> Self {
        if inclusive {
            RangeType::Inclusive
        } else {
            RangeType::Exclusive
        }
    }
}

fn within<T, F>(value: &T, lower: Option<&T>, upper: Option<&T>, lower_inc: bool, upper_inc: bool, cmp: F) -> bool
where
    F: Fn(&T, &T) -> Ordering,
{
    let lower_ok = match lower {
        None => true,
        Some(l) => match cmp(value, l) {
            Ordering::Greater => true,
            Ordering::Equal => lower_inc,
            Ordering::Less => false,
        },
    };
    let upper_ok = match upper {
        None => true,
        Some(u) => match cmp(value, u) {
            Ordering::Less => true,
            Ordering::Equal => upper_inc,
            Ordering::Greater => false,
        },
    };
    lower_ok && upper_ok
}

/// A lexicographic range over term text. Either bound may be open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermRangeQuery {
    field: String,
    lower: Option<String>,
    upper: Option<String>,
    include_lower: bool,
    include_upper: bool,
    boost: f32,
}

impl TermRangeQuery {
    pub fn new<F: Into<String>>(
        field: F,
        lower: Option<String>,
        upper: Option<String>,
        include_lower: bool,
        include_upper: bool,
    ) -> Self {
        TermRangeQuery {
            field: field.into(),
            lower,
            upper,
            include_lower,
            include_upper,
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

    pub fn lower(&self) -> Option<&str> {
        self.lower.as_deref()
    }

    pub fn upper(&self) -> Option<&str> {
        self.upper.as_deref()
    }

    pub fn includes_lower(&self) -> bool {
        self.include_lower
    }

    pub fn includes_upper(&self) -> bool {
        self.include_upper
    }

    pub fn boost(&self) -> f32 {
        self.boost
    }

    /// Check whether a term falls inside the range.
    pub fn includes(&self, term: &str) -> bool {
        within(
            &term,
            self.lower.as_deref().as_ref(),
            self.upper.as_deref().as_ref(),
            self.include_lower,
            self.include_upper,
            |a, b| a.cmp(b),
        )
    }
}

/// A range over trie-encoded numeric values. Either bound may be open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericRangeQuery {
    field: String,
    numeric_type: NumericType,
    precision_step: u32,
    lower: Option<NumericValue>,
    upper: Option<NumericValue>,
    include_lower: bool,
    include_upper: bool,
    boost: f32,
}

impl NumericRangeQuery {
    #[allow(clippy::too_many_arguments)]
    pub fn new<F: Into<String>>(
        field: F,
        numeric_type: NumericType,
        precision_step: u32,
        lower: Option<NumericValue>,
        upper: Option<NumericValue>,
        include_lower: bool,
        include_upper: bool,
    ) -> Self {
        NumericRangeQuery {
            field: field.into(),
            numeric_type,
            precision_step,
            lower,
            upper,
            include_lower,
            include_upper,
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

    pub fn numeric_type(&self) -> NumericType {
        self.numeric_type
    }

    pub fn precision_step(&self) -> u32 {
        self.precision_step
    }

    pub fn lower(&self) -> Option<NumericValue> {
        self.lower
    }

    pub fn upper(&self) -> Option<NumericValue> {
        self.upper
    }

    pub fn includes_lower(&self) -> bool {
        self.include_lower
    }

    pub fn includes_upper(&self) -> bool {
        self.include_upper
    }

    pub fn boost(&self) -> f32 {
        self.boost
    }

    /// Check whether a value falls inside the range.
    pub fn includes(&self, value: NumericValue) -> bool {
        within(
            &value,
            self.lower.as_ref(),
            self.upper.as_ref(),
            self.include_lower,
            self.include_upper,
            NumericValue::total_cmp,
        )
    }
}

//! Dynamic property values and the [`PropertyType`] trait.
//!
//! Record properties are read and written through [`Value`], a small dynamic
//! value type. [`PropertyType`] is implemented for every Rust type that can be
//! mapped onto a document field; it knows how to move a typed value in and out
//! of a [`Value`], which converter to use by default, whether the type has a
//! total ordering, and whether it can be indexed numerically.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LexmapError, Result};
use crate::lexical::core::field::NumericType;
use crate::mapping::converter::{
    BooleanConverter, DateTimeConverter, FloatConverter, IntegerConverter, ValueConverter,
};

/// Total ordering over two values of the same property type.
pub type ValueOrdering = fn(&Value, &Value) -> Ordering;

/// The dynamic value of a record property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Absent value (`None` for optional properties).
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Date and time in UTC.
    DateTime(DateTime<Utc>),
    /// Ordered collection of values (e.g. tags).
    List(Vec<Value>),
}

impl Value {
    /// Returns true for `Null` and for empty text.
    ///
    /// Key fields with an empty value cannot form an identity key.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns true if this is the `Null` variant.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the text value if this is a Text variant.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value if this is an Int variant.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float value, widening integers.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the boolean value if this is a Bool variant.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the datetime value if this is a DateTime variant.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Returns the elements if this is a List variant.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::DateTime(_) => "datetime",
            Value::List(_) => "list",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::DateTime(_) => 3,
            Value::Text(_) => 4,
            Value::List(_) => 5,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Total order over all values.
///
/// Null sorts first, then booleans, numbers, datetimes, text and lists.
/// Integers and floats compare numerically; floats use IEEE total ordering.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            let x = a.as_float().unwrap_or_default();
            let y = b.as_float().unwrap_or_default();
            x.total_cmp(&y)
        }
        (Value::DateTime(x), Value::DateTime(y)) => x.cmp(y),
        (Value::Text(x), Value::Text(y)) => x.cmp(y),
        (Value::List(x), Value::List(y)) => {
            for (l, r) in x.iter().zip(y.iter()) {
                match compare_values(l, r) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            x.len().cmp(&y.len())
        }
        _ => a.rank().cmp(&b.rank()),
    }
}

// --- Conversions ---

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

/// A Rust type that can back a mapped property.
///
/// This is the compile-time replacement for runtime type inspection: the
/// fluent builder asks the property's type for its default converter, its
/// numeric encoding and its ordering when the mapper is built.
///
/// # Examples
///
/// ```
/// use lexmap::data::{PropertyType, Value};
///
/// assert_eq!(42i32.to_value(), Value::Int(42));
/// assert_eq!(i32::from_value(Value::Int(7)).unwrap(), 7);
/// assert!(Vec::<String>::ordering().is_none());
/// ```
pub trait PropertyType: Sized + Send + Sync + 'static {
    /// Read the typed value as a dynamic value.
    fn to_value(&self) -> Value;

    /// Build a typed value from a dynamic value.
    fn from_value(value: Value) -> Result<Self>;

    /// Total ordering used when sorting by converted value.
    ///
    /// `None` means the type cannot be sorted by value; such properties must
    /// use native (lexicographic) sorting.
    fn ordering() -> Option<ValueOrdering> {
        None
    }

    /// Converter used when the mapping does not name one explicitly.
    fn default_converter() -> Option<Arc<dyn ValueConverter>> {
        None
    }

    /// Numeric encoding for numeric fields, if the type is a number.
    fn numeric_type() -> Option<NumericType> {
        None
    }

    /// Whether the property holds several values, one document field each.
    fn is_collection() -> bool {
        false
    }
}

fn mismatch(expected: &str, value: &Value) -> LexmapError {
    LexmapError::invalid_argument(format!(
        "expected {expected}, found {} '{value}'",
        value.kind_name()
    ))
}

impl PropertyType for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            Value::Null | Value::List(_) => Err(mismatch("text", &value)),
            other => Ok(other.to_string()),
        }
    }

    fn ordering() -> Option<ValueOrdering> {
        Some(compare_values)
    }
}

impl PropertyType for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Bool(b) => Ok(*b),
            Value::Text(s) => s.parse::<bool>().map_err(|_| mismatch("bool", &value)),
            _ => Err(mismatch("bool", &value)),
        }
    }

    fn ordering() -> Option<ValueOrdering> {
        Some(compare_values)
    }

    fn default_converter() -> Option<Arc<dyn ValueConverter>> {
        Some(Arc::new(BooleanConverter))
    }
}

macro_rules! integer_property_type {
    ($($ty:ty),*) => {
        $(
            impl PropertyType for $ty {
                fn to_value(&self) -> Value {
                    Value::Int(*self as i64)
                }

                fn from_value(value: Value) -> Result<Self> {
                    match &value {
                        Value::Int(i) => {
                            <$ty>::try_from(*i).map_err(|_| mismatch(stringify!($ty), &value))
                        }
                        Value::Text(s) => {
                            s.trim().parse::<$ty>().map_err(|_| mismatch(stringify!($ty), &value))
                        }
                        _ => Err(mismatch(stringify!($ty), &value)),
                    }
                }

                fn ordering() -> Option<ValueOrdering> {
                    Some(compare_values)
                }

                fn default_converter() -> Option<Arc<dyn ValueConverter>> {
                    Some(Arc::new(IntegerConverter))
                }

                fn numeric_type() -> Option<NumericType> {
                    Some(NumericType::Integer)
                }
            }
        )*
    };
}

integer_property_type!(i32, i64, u32);

impl PropertyType for u64 {
    fn to_value(&self) -> Value {
        Value::Int(i64::try_from(*self).unwrap_or(i64::MAX))
    }

    fn from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Int(i) => u64::try_from(*i).map_err(|_| mismatch("u64", &value)),
            Value::Text(s) => s.trim().parse::<u64>().map_err(|_| mismatch("u64", &value)),
            _ => Err(mismatch("u64", &value)),
        }
    }

    fn ordering() -> Option<ValueOrdering> {
        Some(compare_values)
    }

    fn default_converter() -> Option<Arc<dyn ValueConverter>> {
        Some(Arc::new(IntegerConverter))
    }

    fn numeric_type() -> Option<NumericType> {
        Some(NumericType::Integer)
    }
}

impl PropertyType for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Float(f) => Ok(*f),
            Value::Int(i) => Ok(*i as f64),
            Value::Text(s) => s.trim().parse::<f64>().map_err(|_| mismatch("f64", &value)),
            _ => Err(mismatch("f64", &value)),
        }
    }

    fn ordering() -> Option<ValueOrdering> {
        Some(compare_values)
    }

    fn default_converter() -> Option<Arc<dyn ValueConverter>> {
        Some(Arc::new(FloatConverter))
    }

    fn numeric_type() -> Option<NumericType> {
        Some(NumericType::Float)
    }
}

impl PropertyType for f32 {
    fn to_value(&self) -> Value {
        Value::Float(*self as f64)
    }

    fn from_value(value: Value) -> Result<Self> {
        f64::from_value(value).map(|f| f as f32)
    }

    fn ordering() -> Option<ValueOrdering> {
        Some(compare_values)
    }

    fn default_converter() -> Option<Arc<dyn ValueConverter>> {
        Some(Arc::new(FloatConverter))
    }

    fn numeric_type() -> Option<NumericType> {
        Some(NumericType::Float)
    }
}

impl PropertyType for DateTime<Utc> {
    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match &value {
            Value::DateTime(dt) => Ok(*dt),
            Value::Text(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| mismatch("datetime", &value)),
            _ => Err(mismatch("datetime", &value)),
        }
    }

    fn ordering() -> Option<ValueOrdering> {
        Some(compare_values)
    }

    fn default_converter() -> Option<Arc<dyn ValueConverter>> {
        Some(Arc::new(DateTimeConverter))
    }
}

impl<T: PropertyType> PropertyType for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn ordering() -> Option<ValueOrdering> {
        T::ordering()
    }

    fn default_converter() -> Option<Arc<dyn ValueConverter>> {
        T::default_converter()
    }

    fn numeric_type() -> Option<NumericType> {
        T::numeric_type()
    }

    fn is_collection() -> bool {
        T::is_collection()
    }
}

impl<T: PropertyType> PropertyType for Vec<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(PropertyType::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            single => T::from_value(single).map(|v| vec![v]),
        }
    }

    fn default_converter() -> Option<Arc<dyn ValueConverter>> {
        T::default_converter()
    }

    fn numeric_type() -> Option<NumericType> {
        T::numeric_type()
    }

    fn is_collection() -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        assert!(Value::Null.is_empty());
        assert!(Value::Text(String::new()).is_empty());
        assert!(!Value::Text("A-1".to_string()).is_empty());
        assert!(!Value::Int(0).is_empty());
    }

    #[test]
    fn test_compare_values_orders_numbers_across_kinds() {
        assert_eq!(
            compare_values(&Value::Int(2), &Value::Float(10.5)),
            Ordering::Less
        );
        assert_eq!(compare_values(&Value::Null, &Value::Int(-5)), Ordering::Less);
        assert_eq!(
            compare_values(&Value::from("b"), &Value::from("a")),
            Ordering::Greater
        );
    }

    #[test]
    fn test_optional_round_trip() {
        let value: Option<i64> = None;
        assert_eq!(value.to_value(), Value::Null);
        assert_eq!(Option::<i64>::from_value(Value::Null).unwrap(), None);
        assert_eq!(Option::<i64>::from_value(Value::Int(3)).unwrap(), Some(3));
    }

    #[test]
    fn test_integer_range_is_checked() {
        assert!(u32::from_value(Value::Int(-1)).is_err());
        assert_eq!(i32::from_value(Value::from("17")).unwrap(), 17);
    }

    #[test]
    fn test_list_values() {
        let tags = vec!["a".to_string(), "b".to_string()];
        let value = tags.to_value();
        assert_eq!(value.as_list().map(|l| l.len()), Some(2));
        assert_eq!(Vec::<String>::from_value(value).unwrap(), tags);
        assert!(Vec::<String>::ordering().is_none());
    }
}

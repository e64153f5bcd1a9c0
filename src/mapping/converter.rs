//! Value converters.
//!
//! A [`ValueConverter`] turns a property value into the text stored in a
//! document field and back. Converters are chosen when the mapper is built:
//! either named explicitly on the mapping or taken from the property type's
//! [`crate::data::PropertyType::default_converter`].
//!
//! Converters accept text input in `to_text` as well as their native value
//! kind. Query text reaches a converter as text, so a converter both
//! validates it and normalizes it to the indexed form.

use std::fmt::Debug;

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeDelta, Utc};

use crate::data::Value;
use crate::error::{LexmapError, Result};

/// Bidirectional conversion between a property value and field text.
pub trait ValueConverter: Send + Sync + Debug {
    /// Convert a value to the text stored in the index.
    fn to_text(&self, value: &Value) -> Result<String>;

    /// Convert stored text back to a value.
    fn from_text(&self, text: &str) -> Result<Value>;

    /// Name of this converter, for diagnostics.
    fn name(&self) -> &'static str;
}

fn rejected(converter: &str, value: &Value) -> LexmapError {
    LexmapError::field_conversion(
        "",
        format!("{converter} cannot convert {} value '{value}'", value.kind_name()),
    )
}

fn unparsable(converter: &str, text: &str) -> LexmapError {
    LexmapError::field_conversion("", format!("{converter} cannot parse '{text}'"))
}

/// Decimal integers.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerConverter;

impl ValueConverter for IntegerConverter {
    fn to_text(&self, value: &Value) -> Result<String> {
        match value {
            Value::Int(i) => Ok(i.to_string()),
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Ok((*f as i64).to_string()),
            Value::Text(s) => self.from_text(s).and_then(|v| self.to_text(&v)),
            other => Err(rejected(self.name(), other)),
        }
    }

    fn from_text(&self, text: &str) -> Result<Value> {
        text.trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| unparsable(self.name(), text))
    }

    fn name(&self) -> &'static str {
        "integer"
    }
}

/// Decimal floating point numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatConverter;

impl ValueConverter for FloatConverter {
    fn to_text(&self, value: &Value) -> Result<String> {
        match value {
            Value::Float(f) => Ok(f.to_string()),
            Value::Int(i) => Ok((*i as f64).to_string()),
            Value::Text(s) => self.from_text(s).and_then(|v| self.to_text(&v)),
            other => Err(rejected(self.name(), other)),
        }
    }

    fn from_text(&self, text: &str) -> Result<Value> {
        text.trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| unparsable(self.name(), text))
    }

    fn name(&self) -> &'static str {
        "float"
    }
}

/// `true` / `false`, case-insensitive on input.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanConverter;

impl ValueConverter for BooleanConverter {
    fn to_text(&self, value: &Value) -> Result<String> {
        match value {
            Value::Bool(b) => Ok(b.to_string()),
            Value::Text(s) => self.from_text(s).and_then(|v| self.to_text(&v)),
            other => Err(rejected(self.name(), other)),
        }
    }

    fn from_text(&self, text: &str) -> Result<Value> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("true") {
            Ok(Value::Bool(true))
        } else if text.eq_ignore_ascii_case("false") {
            Ok(Value::Bool(false))
        } else {
            Err(unparsable(self.name(), text))
        }
    }

    fn name(&self) -> &'static str {
        "boolean"
    }
}

/// RFC 3339 in UTC with nanosecond precision.
///
/// The output has a fixed width for years 0000 to 9999, so the stored text
/// sorts in chronological order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeConverter;

impl ValueConverter for DateTimeConverter {
    fn to_text(&self, value: &Value) -> Result<String> {
        match value {
            Value::DateTime(dt) => Ok(dt.to_rfc3339_opts(SecondsFormat::Nanos, true)),
            Value::Text(s) => self.from_text(s).and_then(|v| self.to_text(&v)),
            other => Err(rejected(self.name(), other)),
        }
    }

    fn from_text(&self, text: &str) -> Result<Value> {
        DateTime::parse_from_rfc3339(text.trim())
            .map(|dt| Value::DateTime(dt.with_timezone(&Utc)))
            .map_err(|_| unparsable(self.name(), text))
    }

    fn name(&self) -> &'static str {
        "datetime"
    }
}

const TICKS_PER_SECOND: i64 = 10_000_000;

/// Date-times as 100-nanosecond ticks since 0001-01-01T00:00:00Z.
///
/// Intended for numeric fields, where the tick count is indexed as a long.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeToTicksConverter;

impl DateTimeToTicksConverter {
    fn epoch() -> Result<DateTime<Utc>> {
        NaiveDate::from_ymd_opt(1, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
            .ok_or_else(|| LexmapError::field_conversion("", "invalid tick epoch"))
    }

    /// Ticks for a date-time.
    pub fn ticks(dt: &DateTime<Utc>) -> Result<i64> {
        let elapsed = *dt - Self::epoch()?;
        let seconds = elapsed.num_seconds();
        let sub_ticks = i64::from(elapsed.subsec_nanos()) / 100;
        seconds
            .checked_mul(TICKS_PER_SECOND)
            .and_then(|t| t.checked_add(sub_ticks))
            .ok_or_else(|| LexmapError::field_conversion("", format!("{dt} is out of tick range")))
    }

    /// Date-time for a tick count.
    pub fn from_ticks(ticks: i64) -> Result<DateTime<Utc>> {
        let seconds = TimeDelta::try_seconds(ticks.div_euclid(TICKS_PER_SECOND));
        let nanos = TimeDelta::nanoseconds(ticks.rem_euclid(TICKS_PER_SECOND) * 100);
        seconds
            .and_then(|s| Self::epoch().ok()?.checked_add_signed(s))
            .and_then(|dt| dt.checked_add_signed(nanos))
            .ok_or_else(|| LexmapError::field_conversion("", format!("{ticks} is out of range")))
    }
}

impl ValueConverter for DateTimeToTicksConverter {
    fn to_text(&self, value: &Value) -> Result<String> {
        match value {
            Value::DateTime(dt) => Ok(Self::ticks(dt)?.to_string()),
            Value::Int(ticks) => Ok(ticks.to_string()),
            Value::Text(s) => match s.trim().parse::<i64>() {
                Ok(ticks) => Ok(ticks.to_string()),
                Err(_) => DateTimeConverter
                    .from_text(s)
                    .and_then(|v| self.to_text(&v))
                    .map_err(|_| unparsable(self.name(), s)),
            },
            other => Err(rejected(self.name(), other)),
        }
    }

    fn from_text(&self, text: &str) -> Result<Value> {
        let ticks = text
            .trim()
            .parse::<i64>()
            .map_err(|_| unparsable(self.name(), text))?;
        Ok(Value::DateTime(Self::from_ticks(ticks)?))
    }

    fn name(&self) -> &'static str {
        "datetime-ticks"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_integer_normalizes_text() {
        assert_eq!(IntegerConverter.to_text(&Value::from(" 042 ")).unwrap(), "42");
        assert_eq!(IntegerConverter.from_text("-7").unwrap(), Value::Int(-7));

        let err = IntegerConverter.to_text(&Value::from("abc")).unwrap_err();
        assert!(err.to_string().contains("cannot parse 'abc'"));
    }

    #[test]
    fn test_boolean_is_case_insensitive() {
        assert_eq!(BooleanConverter.to_text(&Value::from("TRUE")).unwrap(), "true");
        assert!(BooleanConverter.from_text("yes").is_err());
    }

    #[test]
    fn test_datetime_text_sorts_chronologically() {
        let early = Utc.with_ymd_and_hms(999, 12, 31, 23, 59, 59).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        let early_text = DateTimeConverter.to_text(&Value::DateTime(early)).unwrap();
        let late_text = DateTimeConverter.to_text(&Value::DateTime(late)).unwrap();
        assert_eq!(early_text.len(), late_text.len());
        assert!(early_text < late_text);
        assert_eq!(
            DateTimeConverter.from_text(&late_text).unwrap(),
            Value::DateTime(late)
        );
    }

    #[test]
    fn test_ticks() {
        let dt = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let ticks = DateTimeToTicksConverter::ticks(&dt).unwrap();
        assert_eq!(ticks, 630_822_816_000_000_000);

        let text = DateTimeToTicksConverter.to_text(&Value::DateTime(dt)).unwrap();
        assert_eq!(
            DateTimeToTicksConverter.from_text(&text).unwrap(),
            Value::DateTime(dt)
        );
    }

    #[test]
    fn test_for_field_names_the_field() {
        let err = FloatConverter.from_text("x").unwrap_err().for_field("Price");
        assert!(err.to_string().starts_with("Field conversion error on 'Price'"));
    }
}

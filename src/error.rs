//! Error types for the mapping and query-compilation layer.
//!
//! All fallible operations in this crate return [`Result`], whose error type
//! is [`LexmapError`]. The variants follow the life cycle of a mapping:
//!
//! - [`LexmapError::Configuration`] is raised while a mapper is being built
//!   (or while a sort field is constructed) and never at query time.
//! - [`LexmapError::KeyIntegrity`] is raised when an identity key cannot be
//!   computed because one or more key fields are empty.
//! - [`LexmapError::QueryCompilation`] is raised while parsing or compiling
//!   a query and keeps the underlying failure as its `source()`.
//! - [`LexmapError::FieldConversion`] is raised by value converters.

use thiserror::Error;

/// The main error type for lexmap operations.
#[derive(Error, Debug)]
pub enum LexmapError {
    /// The mapping is misconfigured. Detected at build time.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// One or more key fields are empty.
    #[error("Key integrity error: {0}")]
    KeyIntegrity(String),

    /// A query could not be parsed or compiled.
    #[error("Query compilation error: {message}")]
    QueryCompilation {
        message: String,
        #[source]
        source: Option<Box<LexmapError>>,
    },

    /// A converter rejected a value.
    #[error("Field conversion error on '{field}': {message}")]
    FieldConversion { field: String, message: String },

    /// A field mapper was asked for a capability it does not provide.
    #[error("Unsupported capability: {0}")]
    UnsupportedCapability(String),

    /// Text analysis failed.
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Invalid argument passed to an API.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for operations that may fail with LexmapError.
pub type Result<T> = std::result::Result<T, LexmapError>;

impl LexmapError {
    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        LexmapError::Configuration(msg.into())
    }

    /// Create a new key integrity error.
    pub fn key_integrity<S: Into<String>>(msg: S) -> Self {
        LexmapError::KeyIntegrity(msg.into())
    }

    /// Create a new query compilation error without an underlying cause.
    pub fn query_compilation<S: Into<String>>(msg: S) -> Self {
        LexmapError::QueryCompilation {
            message: msg.into(),
            source: None,
        }
    }

    /// Wrap an error raised while compiling a query.
    ///
    /// The wrapped error's message becomes the message of the new error and
    /// the original error is kept as its source.
    pub fn wrap_query_compilation(err: LexmapError) -> Self {
        if let LexmapError::QueryCompilation { .. } = err {
            return err;
        }
        LexmapError::QueryCompilation {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Create a new field conversion error.
    pub fn field_conversion<F: Into<String>, S: Into<String>>(field: F, msg: S) -> Self {
        LexmapError::FieldConversion {
            field: field.into(),
            message: msg.into(),
        }
    }

    /// Name the field of a conversion error raised by a field-agnostic converter.
    pub fn for_field<S: Into<String>>(self, name: S) -> Self {
        match self {
            LexmapError::FieldConversion { field, message } if field.is_empty() => {
                LexmapError::FieldConversion {
                    field: name.into(),
                    message,
                }
            }
            other => other,
        }
    }

    /// Create a new unsupported capability error.
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        LexmapError::UnsupportedCapability(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        LexmapError::Analysis(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        LexmapError::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_wrap_keeps_cause() {
        let cause = LexmapError::field_conversion("Price", "not a number: abc");
        let wrapped = LexmapError::wrap_query_compilation(cause);

        assert!(wrapped.to_string().contains("not a number: abc"));
        let source = wrapped.source().expect("source should be kept");
        assert!(source.to_string().contains("Price"));
    }

    #[test]
    fn test_wrap_does_not_nest_compilation_errors() {
        let err = LexmapError::query_compilation("Unrecognized field: 'Bogus'");
        let wrapped = LexmapError::wrap_query_compilation(err);

        assert!(wrapped.source().is_none());
        assert_eq!(
            wrapped.to_string(),
            "Query compilation error: Unrecognized field: 'Bogus'"
        );
    }
}

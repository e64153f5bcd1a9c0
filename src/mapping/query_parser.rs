//! A query parser that resolves fields through a document mapping.
//!
//! Every field clause in the query text is looked up in the
//! [`DocumentMapper`] by property or field name. Term, phrase and range
//! clauses are compiled by that field's mapper, so conversion and analysis
//! match what was written to the index. Wildcard, prefix and fuzzy clauses
//! work on raw term text and only have their field resolved.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use lexmap::fluent::ClassMap;
//! use lexmap::mapping::FieldMappingQueryParser;
//! use lexmap::property;
//!
//! #[derive(Default)]
//! struct Product {
//!     name: String,
//!     price: i64,
//! }
//!
//! let mut map = ClassMap::<Product>::new();
//! map.property(property!(Product, name)).to_field("Name");
//! map.property(property!(Product, price)).to_field("Price").as_numeric_field();
//! let mapper = Arc::new(map.to_document_mapper().unwrap());
//!
//! let parser = FieldMappingQueryParser::new("name", mapper);
//! let query = parser.parse("Widget AND price:[10 TO 20}").unwrap();
//! assert_eq!(query.to_string(), "+Name:widget +Price:[10 TO 20}");
//! ```

use std::sync::Arc;

use log::trace;

use crate::data::Value;
use crate::error::{LexmapError, Result};
use crate::lexical::query::{Query, QueryBuilder, QueryParser, RangeType};
use crate::mapping::document_mapper::DocumentMapper;
use crate::mapping::field_mapper::FieldMapper;

/// Parses query text into queries compiled by a mapping's field mappers.
#[derive(Debug)]
pub struct FieldMappingQueryParser<T> {
    mapper: Arc<DocumentMapper<T>>,
    parser: QueryParser,
    default_search_field: String,
    default_search_property: String,
}

impl<T> FieldMappingQueryParser<T> {
    /// Create a parser whose unqualified clauses target `default_search_field`.
    pub fn new<S: Into<String>>(default_search_field: S, mapper: Arc<DocumentMapper<T>>) -> Self {
        let default_search_field = default_search_field.into();
        let parser = QueryParser::new(
            mapper.version(),
            default_search_field.as_str(),
            mapper.analyzer(),
        );
        FieldMappingQueryParser {
            mapper,
            parser,
            default_search_property: default_search_field.clone(),
            default_search_field,
        }
    }

    pub fn mapper(&self) -> &Arc<DocumentMapper<T>> {
        &self.mapper
    }

    /// The underlying parser, for syntax settings such as the default operator.
    pub fn parser_mut(&mut self) -> &mut QueryParser {
        &mut self.parser
    }

    pub fn default_search_field(&self) -> &str {
        &self.default_search_field
    }

    pub fn default_search_property(&self) -> &str {
        &self.default_search_property
    }

    /// Resolve unqualified clauses, and clauses naming the default search
    /// field, to `property` instead.
    pub fn set_default_search_property<S: Into<String>>(&mut self, property: S) {
        self.default_search_property = property.into();
    }

    /// Parse query text.
    pub fn parse(&self, text: &str) -> Result<Query> {
        let query = self.parser.parse_with(text, self)?;
        trace!("mapped query '{text}' compiled to {query}");
        Ok(query)
    }

    fn override_field<'a>(&'a self, field: &'a str) -> &'a str {
        if field == self.default_search_field {
            &self.default_search_property
        } else {
            field
        }
    }

    fn mapping(&self, field: &str) -> Result<&dyn FieldMapper<T>> {
        self.mapper
            .get_mapping_info(field)
            .ok_or_else(|| LexmapError::query_compilation(format!("Unrecognized field: '{field}'")))
    }
}

impl<T> QueryBuilder for FieldMappingQueryParser<T> {
    fn field_query(&self, _parser: &QueryParser, field: &str, text: &str) -> Result<Option<Query>> {
        let mapping = self.mapping(self.override_field(field))?;
        mapping
            .convert_to_query_expression(&Value::Text(text.to_string()))
            .and_then(|expression| mapping.create_query(&expression))
            .map(Some)
            .map_err(LexmapError::wrap_query_compilation)
    }

    fn range_query(
        &self,
        _parser: &QueryParser,
        field: &str,
        lower: Option<&str>,
        upper: Option<&str>,
        include_lower: bool,
        include_upper: bool,
    ) -> Result<Query> {
        let mapping = self.mapping(self.override_field(field))?;
        let lower = lower.map(|text| Value::Text(text.to_string()));
        let upper = upper.map(|text| Value::Text(text.to_string()));
        mapping
            .create_range_query(
                lower.as_ref(),
                upper.as_ref(),
                RangeType::from_inclusive(include_lower),
                RangeType::from_inclusive(include_upper),
            )
            .map_err(LexmapError::wrap_query_compilation)
    }

    fn wildcard_query(&self, parser: &QueryParser, field: &str, pattern: &str) -> Result<Query> {
        let mapping = self.mapping(self.override_field(field))?;
        parser.new_wildcard_query(mapping.field_name(), pattern)
    }

    fn prefix_query(&self, parser: &QueryParser, field: &str, prefix: &str) -> Result<Query> {
        let mapping = self.mapping(self.override_field(field))?;
        parser.new_prefix_query(mapping.field_name(), prefix)
    }

    fn fuzzy_query(
        &self,
        parser: &QueryParser,
        field: &str,
        term: &str,
        min_similarity: f32,
    ) -> Result<Query> {
        let mapping = self.mapping(self.override_field(field))?;
        parser.new_fuzzy_query(mapping.field_name(), term, min_similarity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fluent::ClassMap;
    use crate::lexical::core::field::NumericValue;
    use crate::property;
    use std::error::Error as _;

    #[derive(Debug, Default)]
    struct Product {
        id: String,
        name: String,
        price: i64,
        weight: f64,
    }

    fn parser() -> FieldMappingQueryParser<Product> {
        let mut map = ClassMap::<Product>::new();
        map.key(property!(Product, id)).to_field("Id");
        map.property(property!(Product, name)).to_field("Name");
        map.property(property!(Product, price))
            .to_field("Price")
            .as_numeric_field();
        map.property(property!(Product, weight)).to_field("Weight");
        FieldMappingQueryParser::new("Name", Arc::new(map.to_document_mapper().unwrap()))
    }

    #[test]
    fn test_field_and_property_names_resolve() {
        let parser = parser();
        assert_eq!(parser.parse("Id:A-1").unwrap().to_string(), "Id:a-1");
        assert_eq!(parser.parse("id:A-1").unwrap().to_string(), "Id:a-1");
        assert_eq!(parser.parse("Big").unwrap().to_string(), "Name:big");
    }

    #[test]
    fn test_unrecognized_field() {
        let err = parser().parse("Bogus:foo").unwrap_err();
        assert!(matches!(err, LexmapError::QueryCompilation { .. }));
        assert!(err.to_string().contains("Unrecognized field: 'Bogus'"));
    }

    #[test]
    fn test_numeric_range() {
        match parser().parse("Price:[10 TO 20}").unwrap() {
            Query::NumericRange(range) => {
                assert!(range.includes(NumericValue::Integer(10)));
                assert!(range.includes(NumericValue::Integer(19)));
                assert!(!range.includes(NumericValue::Integer(20)));
            }
            other => panic!("expected numeric range, got {other}"),
        }
    }

    #[test]
    fn test_conversion_failure_keeps_its_cause() {
        let err = parser().parse("Weight:heavy").unwrap_err();
        assert!(matches!(err, LexmapError::QueryCompilation { .. }));
        assert!(err.to_string().contains("cannot parse 'heavy'"));
        let source = err.source().map(|e| e.to_string()).unwrap_or_default();
        assert!(source.starts_with("Field conversion error on 'Weight'"));
    }

    #[test]
    fn test_default_search_property() {
        let mut parser = parser();
        parser.set_default_search_property("id");
        assert_eq!(parser.parse("X-9").unwrap(), parser.parse("Name:X-9").unwrap());
        assert_eq!(parser.parse("X-9").unwrap().to_string(), "Id:x-9");
    }

    #[test]
    fn test_wildcards_skip_conversion() {
        let parser = parser();
        assert_eq!(parser.parse("name:wid*").unwrap().to_string(), "Name:wid*");
        assert_eq!(parser.parse("Weight:4?").unwrap().to_string(), "Weight:4?");
    }
}

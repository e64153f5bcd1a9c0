use std::sync::Arc;

use lexmap::analysis::StandardAnalyzer;
use lexmap::lexical::NumericValue;
use lexmap::lexical::query::{DefaultOperator, Query, RangeType};
use lexmap::mapping::{FieldMappingQueryParser, IntegerConverter};
use lexmap::{ClassMap, DocumentMapper, LexmapError, Value, property};

#[derive(Debug, Default)]
struct Product {
    id: String,
    name: String,
    description: String,
    price: i64,
    stock: i64,
    category: String,
}

fn product_mapper() -> lexmap::Result<Arc<DocumentMapper<Product>>> {
    let mut map = ClassMap::<Product>::new();
    map.key(property!(Product, id)).to_field("Id");
    map.property(property!(Product, name)).to_field("Name");
    map.property(property!(Product, description))
        .to_field("Description")
        .analyze_with(Arc::new(StandardAnalyzer::new()))
        .default_operator(DefaultOperator::And);
    map.property(property!(Product, price))
        .to_field("Price")
        .as_numeric_field();
    map.property(property!(Product, stock))
        .to_field("Stock")
        .converter(Arc::new(IntegerConverter));
    map.property(property!(Product, category))
        .to_field("Category")
        .case_sensitive();
    Ok(Arc::new(map.to_document_mapper()?))
}

#[test]
fn test_numeric_range_scenario() -> lexmap::Result<()> {
    let mapper = product_mapper()?;
    let price = mapper.get_mapping_info("Price").unwrap();
    let query = price.create_range_query(
        Some(&Value::Int(10)),
        Some(&Value::Int(20)),
        RangeType::Inclusive,
        RangeType::Exclusive,
    )?;

    let Query::NumericRange(range) = query else {
        panic!("expected a numeric range query");
    };
    for v in [10, 15, 19] {
        assert!(range.includes(NumericValue::Integer(v)));
    }
    for v in [9, 20, 21] {
        assert!(!range.includes(NumericValue::Integer(v)));
    }
    Ok(())
}

#[test]
fn test_unrecognized_field_scenario() -> lexmap::Result<()> {
    let parser = FieldMappingQueryParser::new("Name", product_mapper()?);
    match parser.parse("Bogus:foo") {
        Err(LexmapError::QueryCompilation { message, .. }) => {
            assert!(message.contains("Bogus"));
        }
        other => panic!("expected a query compilation error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_keyword_with_whitespace_stays_one_term() -> lexmap::Result<()> {
    let parser = FieldMappingQueryParser::new("Name", product_mapper()?);

    let query = parser.parse(r#"Name:"Big Red Widget""#)?;
    assert_eq!(query.to_string(), "Name:big red widget");

    let query = parser.parse(r#"Category:"Home Garden""#)?;
    assert_eq!(query.to_string(), "Category:Home Garden");
    Ok(())
}

#[test]
fn test_analyzed_field_uses_its_operator() -> lexmap::Result<()> {
    let parser = FieldMappingQueryParser::new("Name", product_mapper()?);
    let query = parser.parse(r#"Description:"sturdy steel""#)?;
    assert_eq!(query.to_string(), "+Description:sturdy +Description:steel");

    // A group is split by the outer parser, whose operator is OR.
    let query = parser.parse("Description:(sturdy steel)")?;
    assert_eq!(query.to_string(), "Description:sturdy Description:steel");
    Ok(())
}

#[test]
fn test_mapped_phrase_is_split_by_field_analyzer() -> lexmap::Result<()> {
    let mapper = product_mapper()?;
    let description = mapper.get_mapping_info("description").unwrap();
    let query = description.create_query("sturdy steel")?;
    assert_eq!(query.to_string(), "+Description:sturdy +Description:steel");
    Ok(())
}

#[test]
fn test_converted_field_normalizes_query_text() -> lexmap::Result<()> {
    let parser = FieldMappingQueryParser::new("Name", product_mapper()?);
    assert_eq!(parser.parse("Stock:007")?.to_string(), "Stock:7");
    assert_eq!(parser.parse("Stock:[1 TO 5]")?.to_string(), "Stock:[1 TO 5]");

    let err = parser.parse("Stock:many").unwrap_err();
    assert!(err.to_string().contains("many"));
    Ok(())
}

#[test]
fn test_default_field_substitution() -> lexmap::Result<()> {
    let mut parser = FieldMappingQueryParser::new("_all", product_mapper()?);
    parser.set_default_search_property("name");

    let unqualified = parser.parse("widget")?;
    let qualified = parser.parse("Name:widget")?;
    let explicit = parser.parse("_all:widget")?;
    assert_eq!(unqualified, qualified);
    assert_eq!(unqualified, explicit);
    Ok(())
}

#[test]
fn test_wildcard_prefix_and_fuzzy_only_resolve_the_field() -> lexmap::Result<()> {
    let parser = FieldMappingQueryParser::new("Name", product_mapper()?);
    assert_eq!(parser.parse("name:Wid*et")?.to_string(), "Name:wid*et");
    assert_eq!(parser.parse("name:Wid*")?.to_string(), "Name:wid*");
    assert!(matches!(parser.parse("name:widgit~")?, Query::Fuzzy(_)));
    assert!(parser.parse("Bogus:wid*").is_err());
    Ok(())
}

#[test]
fn test_compound_query() -> lexmap::Result<()> {
    let parser = FieldMappingQueryParser::new("Name", product_mapper()?);
    let query = parser.parse("+id:A-1 -Category:Discontinued Price:[* TO 100]")?;
    assert_eq!(
        query.to_string(),
        "+Id:a-1 -Category:Discontinued Price:[* TO 100]"
    );
    Ok(())
}

#[test]
fn test_multi_field_query_is_an_approximation() -> lexmap::Result<()> {
    let mapper = product_mapper()?;
    let query = mapper.create_multi_field_query("Widget")?;
    assert_eq!(
        query.to_string(),
        "Id:Widget Name:Widget Description:Widget Price:Widget Stock:Widget Category:Widget"
    );
    Ok(())
}

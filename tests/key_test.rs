use lexmap::lexical::query::Query;
use lexmap::{ClassMap, LexmapError, Value, property};

#[derive(Debug, Default)]
struct OrderLine {
    order_id: String,
    line: i64,
    sku: String,
    note: Option<String>,
}

fn line(order_id: &str, line: i64, sku: &str) -> OrderLine {
    OrderLine {
        order_id: order_id.to_string(),
        line,
        sku: sku.to_string(),
        note: None,
    }
}

fn mapper() -> lexmap::Result<lexmap::DocumentMapper<OrderLine>> {
    let mut map = ClassMap::<OrderLine>::new();
    map.key(property!(OrderLine, order_id)).to_field("OrderId").case_sensitive();
    map.key(property!(OrderLine, line)).to_field("Line");
    map.key(property!(OrderLine, note)).to_field("Note");
    map.property(property!(OrderLine, sku)).to_field("Sku");
    map.document_key("Type").with_value("OrderLine");
    map.to_document_mapper()
}

#[test]
fn test_every_empty_key_is_reported() -> lexmap::Result<()> {
    let mapper = mapper()?;
    let err = mapper.to_key(&line("", 1, "X")).unwrap_err();
    let LexmapError::KeyIntegrity(message) = err else {
        panic!("expected a key integrity error");
    };
    assert!(message.ends_with("key properties: order_id, note"));
    Ok(())
}

#[test]
fn test_key_of_record_matches_key_of_document() -> lexmap::Result<()> {
    let mapper = mapper()?;
    let mut record = line("SO-100", 2, "X");
    record.note = Some("gift wrap".to_string());

    let doc = mapper.to_document(&record)?;
    let key = mapper.to_key(&record)?;
    assert_eq!(key, mapper.document_to_key(&doc)?);
    assert_eq!(key.len(), 4);
    assert_eq!(key.get("Line"), Some(&Value::Int(2)));
    assert_eq!(key.get("Type"), Some(&Value::from("OrderLine")));

    let other = OrderLine {
        note: Some("gift wrap".to_string()),
        ..line("SO-100", 3, "X")
    };
    assert_ne!(key, mapper.to_key(&other)?);
    Ok(())
}

#[test]
fn test_key_query_requires_every_component() -> lexmap::Result<()> {
    let mapper = mapper()?;
    let mut record = line("SO-100", 2, "X");
    record.note = Some("gift wrap".to_string());

    let query = mapper.to_key(&record)?.to_query();
    let Query::Boolean(boolean) = &query else {
        panic!("expected a boolean query");
    };
    assert_eq!(boolean.len(), 4);
    assert_eq!(
        query.to_string(),
        "+OrderId:SO-100 +Line:2 +Note:gift wrap +Type:OrderLine"
    );
    Ok(())
}

#[test]
fn test_key_values_with_syntax_characters() -> lexmap::Result<()> {
    let mapper = mapper()?;
    let mut record = line("SO:1 (rush)*", 1, "X");
    record.note = Some("n".to_string());

    let query = mapper.to_key(&record)?.to_query();
    assert_eq!(
        query.to_string(),
        "+OrderId:SO:1 (rush)* +Line:1 +Note:n +Type:OrderLine"
    );
    Ok(())
}

use chrono::{TimeZone, Utc};

use lexmap::lexical::{FieldValue, IndexMode, NumericValue, StoreMode};
use lexmap::mapping::{DateTimeToTicksConverter, QueryExecutionContext};
use lexmap::{ClassMap, Document, DocumentMapper, property};

#[derive(Debug, Clone, Default, PartialEq)]
struct Article {
    id: String,
    title: String,
    body: Option<String>,
    views: u32,
    rating: f64,
    published: Option<chrono::DateTime<Utc>>,
    tags: Vec<String>,
    draft: bool,
    internal_note: String,
    relevance: f32,
}

fn article_mapper() -> lexmap::Result<DocumentMapper<Article>> {
    let mut map = ClassMap::<Article>::new();
    map.key(property!(Article, id)).to_field("Id").not_analyzed();
    map.property(property!(Article, title)).to_field("Title");
    map.property(property!(Article, body)).to_field("Body").not_stored();
    map.property(property!(Article, views)).to_field("Views").as_numeric_field();
    map.property(property!(Article, rating)).to_field("Rating");
    map.property(property!(Article, published))
        .to_field("Published")
        .converter(std::sync::Arc::new(DateTimeToTicksConverter))
        .as_numeric_field();
    map.property(property!(Article, tags)).to_field("Tag");
    map.property(property!(Article, draft)).to_field("Draft");
    map.property(property!(Article, internal_note)).not_indexed();
    map.score(property!(Article, relevance));
    map.to_document_mapper()
}

fn sample() -> Article {
    Article {
        id: "A-1".to_string(),
        title: "Widget".to_string(),
        body: None,
        views: 1200,
        rating: 4.5,
        published: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
        tags: vec!["tools".to_string(), "hardware".to_string()],
        draft: false,
        internal_note: "do not index".to_string(),
        relevance: 0.0,
    }
}

#[test]
fn test_record_survives_round_trip() -> lexmap::Result<()> {
    let mapper = article_mapper()?;
    let article = sample();

    let doc = mapper.to_document(&article)?;
    let mut restored = Article::default();
    mapper.to_object(&doc, &mut restored);

    // The not-indexed property is never written, so it cannot come back.
    assert_eq!(restored.internal_note, "");
    restored.internal_note = article.internal_note.clone();
    assert!(mapper.equals(&article, &restored));
    assert_eq!(restored, article);
    Ok(())
}

#[test]
fn test_document_layout() -> lexmap::Result<()> {
    let mapper = article_mapper()?;
    let doc = mapper.to_document(&sample())?;

    assert_eq!(
        doc.field_names(),
        vec!["Id", "Title", "Views", "Rating", "Published", "Tag", "Draft"]
    );
    assert_eq!(doc.get_fields("Tag").count(), 2);
    assert!(!doc.has_field("Body"));
    assert!(!doc.has_field("internal_note"));

    let id = doc.get_field("Id").unwrap();
    assert_eq!(id.index(), IndexMode::NotAnalyzed);
    assert_eq!(id.store(), StoreMode::Yes);

    assert_eq!(
        doc.get_field("Views").map(|f| f.value().clone()),
        Some(FieldValue::Numeric(NumericValue::Integer(1200)))
    );
    assert_eq!(doc.get("Rating").as_deref(), Some("4.5"));
    assert_eq!(doc.get("Draft").as_deref(), Some("false"));
    Ok(())
}

#[test]
fn test_scenario_key_and_name() -> lexmap::Result<()> {
    #[derive(Debug, Default)]
    struct Item {
        id: String,
        name: String,
    }

    let mut map = ClassMap::<Item>::new();
    map.key(property!(Item, id)).to_field("Id");
    map.property(property!(Item, name)).to_field("Name").analyzed();
    let mapper = map.to_document_mapper()?;

    let item = Item {
        id: "A-1".to_string(),
        name: "Widget".to_string(),
    };
    let doc = mapper.to_document(&item)?;
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.get("Id").as_deref(), Some("A-1"));
    assert_eq!(doc.get("Name").as_deref(), Some("Widget"));

    let key = mapper.document_to_key(&doc)?;
    assert_eq!(key.len(), 1);
    assert_eq!(key.get("Id"), Some(&lexmap::Value::from("A-1")));
    Ok(())
}

#[test]
fn test_rewriting_replaces_fields() -> lexmap::Result<()> {
    let mapper = article_mapper()?;
    let mut doc = mapper.to_document(&sample())?;

    let mut changed = sample();
    changed.tags = vec!["garden".to_string()];
    changed.published = None;
    mapper.copy_to_document(&changed, &mut doc)?;

    let tags: Vec<_> = doc.get_fields("Tag").map(|f| f.string_value()).collect();
    assert_eq!(tags, vec!["garden"]);
    assert!(!doc.has_field("Published"));
    Ok(())
}

#[test]
fn test_score_comes_from_context() -> lexmap::Result<()> {
    let mapper = article_mapper()?;
    let doc = mapper.to_document(&sample())?;

    let mut hit = Article::default();
    mapper.to_object_with_context(&doc, &QueryExecutionContext::new(2.5), &mut hit);
    assert_eq!(hit.relevance, 2.5);
    assert!(!mapper.is_modified(&hit, &doc)?);
    Ok(())
}

#[test]
fn test_empty_document_leaves_defaults() -> lexmap::Result<()> {
    let mapper = article_mapper()?;
    let article = mapper.create_object(&Document::new());
    assert_eq!(article.title, "");
    assert!(article.tags.is_empty());
    assert!(mapper.is_modified(&sample(), &Document::new())?);
    Ok(())
}

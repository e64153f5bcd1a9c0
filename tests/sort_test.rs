use lexmap::lexical::{Sort, SortType};
use lexmap::{ClassMap, Document, DocumentMapper, LexmapError, property};

#[derive(Debug, Default, Clone)]
struct Track {
    title: String,
    plays: i64,
    duration: f64,
    genres: Vec<String>,
    ratings: Vec<i64>,
    popularity: f32,
}

fn track_mapper() -> lexmap::Result<DocumentMapper<Track>> {
    let mut map = ClassMap::<Track>::new();
    map.property(property!(Track, title)).to_field("Title");
    map.property(property!(Track, plays)).to_field("Plays");
    map.property(property!(Track, duration))
        .to_field("Duration")
        .as_numeric_field();
    map.property(property!(Track, genres)).to_field("Genre");
    map.property(property!(Track, ratings)).to_field("Rating");
    map.score(property!(Track, popularity));
    map.to_document_mapper()
}

fn track(title: &str, plays: i64, duration: f64) -> Track {
    Track {
        title: title.to_string(),
        plays,
        duration,
        ..Default::default()
    }
}

fn titles(docs: &[Document]) -> Vec<String> {
    docs.iter().filter_map(|d| d.get("Title")).collect()
}

#[test]
fn test_converted_values_sort_numerically() -> lexmap::Result<()> {
    let mapper = track_mapper()?;
    let mut docs = vec![
        mapper.to_document(&track("b", 9, 1.0))?,
        mapper.to_document(&track("a", 100, 2.0))?,
        mapper.to_document(&track("c", 10, 3.0))?,
    ];

    let sort = mapper.create_sort(&mapper.ordering().ascending("plays")?)?;
    assert!(matches!(sort.fields()[0].sort_type(), SortType::Custom(_)));
    sort.sort_documents(&mut docs);
    assert_eq!(titles(&docs), vec!["b", "c", "a"]);

    // Lexicographic order of the stored text would differ.
    Sort::new(vec![lexmap::lexical::SortField::new("Plays", SortType::String, false)])
        .sort_documents(&mut docs);
    assert_eq!(titles(&docs), vec!["c", "a", "b"]);
    Ok(())
}

#[test]
fn test_composite_ordering_breaks_ties() -> lexmap::Result<()> {
    let mapper = track_mapper()?;
    let mut docs = vec![
        mapper.to_document(&track("x", 5, 3.5))?,
        mapper.to_document(&track("y", 5, 1.5))?,
        mapper.to_document(&track("z", 7, 2.5))?,
    ];

    let ordering = mapper.ordering().descending("plays")?.ascending("Duration")?;
    let sort = ordering.to_sort()?;
    assert!(matches!(sort.fields()[1].sort_type(), SortType::Double));
    sort.sort_documents(&mut docs);
    assert_eq!(titles(&docs), vec!["z", "y", "x"]);
    Ok(())
}

#[test]
fn test_unordered_property_needs_native_sort() -> lexmap::Result<()> {
    let mapper = track_mapper()?;
    let err = mapper.ordering().ascending("ratings")?.to_sort().unwrap_err();
    assert!(matches!(err, LexmapError::Configuration(_)));

    // Plain text collections sort by their stored text.
    let sort = mapper.ordering().ascending("Genre")?.to_sort()?;
    assert!(matches!(sort.fields()[0].sort_type(), SortType::String));

    let mut map = ClassMap::<Track>::new();
    map.property(property!(Track, ratings)).to_field("Rating").native_sort();
    let mapper = map.to_document_mapper()?;
    let sort = mapper.ordering().ascending("ratings")?.to_sort()?;
    assert!(matches!(sort.fields()[0].sort_type(), SortType::String));
    Ok(())
}

#[test]
fn test_score_and_unknown_properties() -> lexmap::Result<()> {
    let mapper = track_mapper()?;
    let sort = mapper.ordering().descending("popularity")?.to_sort()?;
    assert!(matches!(sort.fields()[0].sort_type(), SortType::Score));
    assert!(sort.fields()[0].reverse());

    assert!(mapper.ordering().ascending("missing").is_err());
    Ok(())
}

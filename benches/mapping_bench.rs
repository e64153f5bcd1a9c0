use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use lexmap::mapping::FieldMappingQueryParser;
use lexmap::{ClassMap, DocumentMapper, property};

#[derive(Debug, Default, Clone)]
struct Product {
    id: String,
    name: String,
    description: String,
    price: i64,
    tags: Vec<String>,
}

fn product_mapper() -> DocumentMapper<Product> {
    let mut map = ClassMap::<Product>::new();
    map.key(property!(Product, id)).to_field("Id").not_analyzed();
    map.property(property!(Product, name)).to_field("Name");
    map.property(property!(Product, description))
        .to_field("Description")
        .not_stored();
    map.property(property!(Product, price)).to_field("Price").as_numeric_field();
    map.property(property!(Product, tags)).to_field("Tag");
    map.to_document_mapper().unwrap()
}

fn generate_products(count: usize) -> Vec<Product> {
    (0..count)
        .map(|i| Product {
            id: format!("P-{}", i),
            name: format!("Widget {}", i),
            description: "A sturdy steel widget for the garden".to_string(),
            price: (i % 500) as i64,
            tags: vec!["garden".to_string(), format!("batch-{}", i % 10)],
        })
        .collect()
}

fn bench_to_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("To Document");
    let mapper = product_mapper();

    for count in [100, 1000].iter() {
        let products = generate_products(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &products, |b, products| {
            b.iter(|| {
                for product in products {
                    black_box(mapper.to_document(product).unwrap());
                }
            })
        });
    }
    group.finish();
}

fn bench_create_object(c: &mut Criterion) {
    let mapper = product_mapper();
    let docs: Vec<_> = generate_products(1000)
        .iter()
        .map(|p| mapper.to_document(p).unwrap())
        .collect();

    c.bench_function("Create Object", |b| {
        b.iter(|| {
            for doc in &docs {
                black_box(mapper.create_object(doc));
            }
        })
    });
}

fn bench_query_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("Query Parse");
    let mapper = Arc::new(product_mapper());
    let parser = FieldMappingQueryParser::new("Name", Arc::clone(&mapper));

    let queries = [
        ("term", "widget"),
        ("range", "Price:[10 TO 20}"),
        ("compound", "+Id:P-1 -Tag:discontinued Name:wid* Price:[* TO 100]"),
    ];
    for (name, text) in queries.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(name), text, |b, text| {
            b.iter(|| black_box(parser.parse(text).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_to_document, bench_create_object, bench_query_parse);
criterion_main!(benches);

//! Sort specifications.
//!
//! A [`Sort`] is an ordered list of [`SortField`]s; the first field decides
//! and later fields break ties. Each sort field either uses a native ordering
//! over the stored field text (string, integer, float) or delegates to a
//! [`FieldComparatorSource`].

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::lexical::core::document::Document;

/// Compares the stored text of one field across two documents.
///
/// `None` means the document has no such field.
pub trait FieldComparatorSource: Send + Sync + fmt::Debug {
    fn compare(&self, a: Option<&str>, b: Option<&str>) -> Ordering;
}

/// How the values of a sort field are compared.
#[derive(Clone)]
pub enum SortType {
    /// Lexicographic over the stored text.
    String,
    /// Stored values parsed as integers. Missing or unparsable values are 0.
    Long,
    /// Stored values parsed as floats. Missing or unparsable values are 0.0.
    Double,
    /// Relevance score. Not comparable from documents alone.
    Score,
    /// Index order. Not comparable from documents alone.
    DocumentOrder,
    /// A caller-supplied comparator.
    Custom(Arc<dyn FieldComparatorSource>),
}

impl fmt::Debug for SortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortType::String => write!(f, "String"),
            SortType::Long => write!(f, "Long"),
            SortType::Double => write!(f, "Double"),
            SortType::Score => write!(f, "Score"),
            SortType::DocumentOrder => write!(f, "DocumentOrder"),
            SortType::Custom(source) => write!(f, "Custom({source:?})"),
        }
    }
}

/// One key of a sort.
#[derive(Debug, Clone)]
pub struct SortField {
    field: Option<String>,
    sort_type: SortType,
    reverse: bool,
}

impl SortField {
    /// Sort by a field.
    pub fn new<S: Into<String>>(field: S, sort_type: SortType, reverse: bool) -> Self {
        SortField {
            field: Some(field.into()),
            sort_type,
            reverse,
        }
    }

    /// Sort by relevance score, best first.
    pub fn score() -> Self {
        SortField {
            field: None,
            sort_type: SortType::Score,
            reverse: false,
        }
    }

    /// Sort in index order.
    pub fn document_order() -> Self {
        SortField {
            field: None,
            sort_type: SortType::DocumentOrder,
            reverse: false,
        }
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn sort_type(&self) -> &SortType {
        &self.sort_type
    }

    pub fn reverse(&self) -> bool {
        self.reverse
    }

    /// Compare two documents on this key, honouring `reverse`.
    ///
    /// Score and document-order keys compare equal here; the searcher that
    /// owns scores and positions resolves them.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let Some(field) = self.field.as_deref() else {
            return Ordering::Equal;
        };

        let a = a.get(field);
        let b = b.get(field);
        let ordering = match &self.sort_type {
            SortType::String => a.cmp(&b),
            SortType::Long => parse_long(a.as_deref()).cmp(&parse_long(b.as_deref())),
            SortType::Double => parse_double(a.as_deref()).total_cmp(&parse_double(b.as_deref())),
            SortType::Custom(source) => source.compare(a.as_deref(), b.as_deref()),
            SortType::Score | SortType::DocumentOrder => Ordering::Equal,
        };

        if self.reverse {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

fn parse_long(text: Option<&str>) -> i64 {
    text.and_then(|t| t.trim().parse::<i64>().ok()).unwrap_or(0)
}

fn parse_double(text: Option<&str>) -> f64 {
    text.and_then(|t| t.trim().parse::<f64>().ok()).unwrap_or(0.0)
}

/// An ordered list of sort keys.
#[derive(Debug, Clone, Default)]
pub struct Sort {
    fields: Vec<SortField>,
}

impl Sort {
    pub fn new(fields: Vec<SortField>) -> Self {
        Sort { fields }
    }

    /// Sort by relevance only.
    pub fn relevance() -> Self {
        Sort::new(vec![SortField::score()])
    }

    pub fn add(&mut self, field: SortField) {
        self.fields.push(field);
    }

    pub fn fields(&self) -> &[SortField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Compare two documents key by key.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        self.fields
            .iter()
            .map(|field| field.compare(a, b))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    /// Stable in-place sort of documents.
    pub fn sort_documents(&self, documents: &mut [Document]) {
        documents.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::core::field::Field;

    fn doc(name: &str, price: &str) -> Document {
        Document::new()
            .with_field(Field::text("Name", name))
            .with_field(Field::text("Price", price))
    }

    #[test]
    fn test_string_versus_long() {
        let mut docs = vec![doc("b", "9"), doc("a", "10"), doc("c", "100")];

        Sort::new(vec![SortField::new("Price", SortType::String, false)]).sort_documents(&mut docs);
        let prices: Vec<_> = docs.iter().filter_map(|d| d.get("Price")).collect();
        assert_eq!(prices, vec!["10", "100", "9"]);

        Sort::new(vec![SortField::new("Price", SortType::Long, true)]).sort_documents(&mut docs);
        let prices: Vec<_> = docs.iter().filter_map(|d| d.get("Price")).collect();
        assert_eq!(prices, vec!["100", "10", "9"]);
    }

    #[test]
    fn test_tie_breaking() {
        let mut docs = vec![doc("b", "1"), doc("a", "2"), doc("a", "1")];
        let sort = Sort::new(vec![
            SortField::new("Name", SortType::String, false),
            SortField::new("Price", SortType::Double, false),
        ]);
        sort.sort_documents(&mut docs);

        let keys: Vec<_> = docs
            .iter()
            .map(|d| format!("{}{}", d.get("Name").unwrap(), d.get("Price").unwrap()))
            .collect();
        assert_eq!(keys, vec!["a1", "a2", "b1"]);
    }

    #[test]
    fn test_missing_field_sorts_first() {
        let with = doc("a", "1");
        let without = Document::new();
        let field = SortField::new("Name", SortType::String, false);
        assert_eq!(field.compare(&without, &with), Ordering::Less);
    }
}

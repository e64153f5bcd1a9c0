//! Multi-key sort requests.

use std::fmt;

use crate::error::{LexmapError, Result};
use crate::lexical::search::Sort;
use crate::mapping::document_mapper::DocumentMapper;
use crate::mapping::field_mapper::FieldMapper;

/// An ordered list of mapped properties, each ascending or descending.
///
/// Built from a [`DocumentMapper`] with [`DocumentMapper::ordering`]; the
/// keys borrow the mapper's field mappers.
///
/// ```
/// use lexmap::fluent::ClassMap;
/// use lexmap::property;
///
/// #[derive(Default)]
/// struct Product {
///     name: String,
///     price: i64,
/// }
///
/// let mut map = ClassMap::<Product>::new();
/// map.property(property!(Product, name));
/// map.property(property!(Product, price));
/// let mapper = map.to_document_mapper().unwrap();
///
/// let sort = mapper
///     .ordering()
///     .descending("price").unwrap()
///     .ascending("name").unwrap()
///     .to_sort()
///     .unwrap();
/// assert_eq!(sort.fields().len(), 2);
/// assert!(sort.fields()[0].reverse());
/// ```
pub struct CompositeOrdering<'a, T> {
    mapper: &'a DocumentMapper<T>,
    keys: Vec<(&'a dyn FieldMapper<T>, bool)>,
}

impl<'a, T> CompositeOrdering<'a, T> {
    pub(crate) fn new(mapper: &'a DocumentMapper<T>) -> Self {
        CompositeOrdering {
            mapper,
            keys: Vec::new(),
        }
    }

    /// Append an ascending key.
    pub fn ascending(self, property: &str) -> Result<Self> {
        self.then_by(property, false)
    }

    /// Append a descending key.
    pub fn descending(self, property: &str) -> Result<Self> {
        self.then_by(property, true)
    }

    /// Append a key by property or field name.
    pub fn then_by(mut self, property: &str, descending: bool) -> Result<Self> {
        let mapping = self.mapper.get_mapping_info(property).ok_or_else(|| {
            LexmapError::invalid_argument(format!("No mapping for property '{property}'"))
        })?;
        self.keys.push((mapping, descending));
        Ok(self)
    }

    /// The keys in order, with `true` for descending.
    pub fn keys(&self) -> impl Iterator<Item = (&'a dyn FieldMapper<T>, bool)> + '_ {
        self.keys.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Build the sort, asking each field mapper for its sort key.
    pub fn to_sort(&self) -> Result<Sort> {
        let mut sort = Sort::default();
        for (mapping, descending) in &self.keys {
            sort.add(mapping.create_sort_field(*descending)?);
        }
        Ok(sort)
    }
}

impl<T> fmt::Debug for CompositeOrdering<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<_> = self
            .keys
            .iter()
            .map(|(mapping, descending)| (mapping.property_name(), *descending))
            .collect();
        f.debug_struct("CompositeOrdering").field("keys", &keys).finish()
    }
}

//! Property accessors.
//!
//! A [`Property`] names one field of a record type and carries a typed getter
//! and an optional setter. The [`property!`](crate::property) macro builds
//! one from a struct field:
//!
//! ```
//! use lexmap::property;
//!
//! struct Product {
//!     id: String,
//!     price: i64,
//! }
//!
//! let id = property!(Product, id);
//! let price = property!(Product, price, read_only);
//! assert_eq!(id.name(), "id");
//! assert!(price.is_read_only());
//! ```
//!
//! Field mappers work on the erased form, [`Accessor`], which moves values
//! through [`Value`]. Accessors are built at most once per
//! (record type, property name, value type, writability) and shared
//! process-wide.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use lazy_static::lazy_static;
use log::trace;
use parking_lot::RwLock;

use crate::data::{PropertyType, Value};
use crate::error::Result;

/// A typed property of record type `T` with value type `V`.
pub struct Property<T, V> {
    name: &'static str,
    getter: fn(&T) -> &V,
    setter: Option<fn(&mut T, V)>,
}

impl<T, V> Property<T, V> {
    /// Create a read-only property.
    pub fn new(name: &'static str, getter: fn(&T) -> &V) -> Self {
        Property {
            name,
            getter,
            setter: None,
        }
    }

    /// Make the property writable.
    pub fn with_setter(mut self, setter: fn(&mut T, V)) -> Self {
        self.setter = Some(setter);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_read_only(&self) -> bool {
        self.setter.is_none()
    }

    /// Read the property.
    pub fn get<'a>(&self, record: &'a T) -> &'a V {
        (self.getter)(record)
    }
}

impl<T, V> Clone for Property<T, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, V> Copy for Property<T, V> {}

impl<T, V> fmt::Debug for Property<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("read_only", &self.is_read_only())
            .finish()
    }
}

/// Build a [`Property`] from a struct field.
///
/// `property!(Type, field)` is readable and writable;
/// `property!(Type, field, read_only)` has no setter.
#[macro_export]
macro_rules! property {
    ($ty:ty, $field:ident) => {
        $crate::mapping::accessor::Property::new(stringify!($field), |record: &$ty| {
            &record.$field
        })
        .with_setter(|record: &mut $ty, value| record.$field = value)
    };
    ($ty:ty, $field:ident, read_only) => {
        $crate::mapping::accessor::Property::new(stringify!($field), |record: &$ty| {
            &record.$field
        })
    };
}

type Getter<T> = Arc<dyn Fn(&T) -> Value + Send + Sync>;
type Setter<T> = Arc<dyn Fn(&mut T, Value) -> Result<()> + Send + Sync>;

/// A property accessor that moves values through [`Value`].
pub struct Accessor<T> {
    name: &'static str,
    getter: Getter<T>,
    setter: Option<Setter<T>>,
}

impl<T> Accessor<T> {
    fn compile<V: PropertyType>(property: &Property<T, V>) -> Self
    where
        T: 'static,
    {
        let get = property.getter;
        let getter: Getter<T> = Arc::new(move |record: &T| get(record).to_value());

        let setter = property.setter.map(|set| {
            let setter: Setter<T> = Arc::new(move |record: &mut T, value: Value| {
                set(record, V::from_value(value)?);
                Ok(())
            });
            setter
        });

        Accessor {
            name: property.name,
            getter,
            setter,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn can_write(&self) -> bool {
        self.setter.is_some()
    }

    /// Read the property of `record`.
    pub fn get(&self, record: &T) -> Value {
        (self.getter)(record)
    }

    /// Assign `value` to the property of `record`.
    ///
    /// Returns `Ok(false)` for read-only properties.
    pub fn set(&self, record: &mut T, value: Value) -> Result<bool> {
        match &self.setter {
            Some(setter) => setter(record, value).map(|_| true),
            None => Ok(false),
        }
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("name", &self.name)
            .field("can_write", &self.setter.is_some())
            .finish()
    }
}

type CacheKey = (TypeId, &'static str, TypeId, bool);

lazy_static! {
    static ref ACCESSOR_CACHE: RwLock<AHashMap<CacheKey, Arc<dyn Any + Send + Sync>>> =
        RwLock::new(AHashMap::new());
}

/// Return the shared accessor for `property`, compiling it on first use.
///
/// Accessors are keyed by record type, property name, value type and
/// writability. The name must identify the getter: two properties of the
/// same record type with the same name and value type share one accessor.
pub fn accessor_for<T, V>(property: &Property<T, V>) -> Arc<Accessor<T>>
where
    T: Send + Sync + 'static,
    V: PropertyType,
{
    let key = (
        TypeId::of::<T>(),
        property.name,
        TypeId::of::<V>(),
        property.setter.is_some(),
    );

    if let Some(cached) = ACCESSOR_CACHE.read().get(&key) {
        if let Ok(accessor) = Arc::clone(cached).downcast::<Accessor<T>>() {
            return accessor;
        }
    }

    let mut cache = ACCESSOR_CACHE.write();
    let entry = cache.entry(key).or_insert_with(|| {
        trace!("compiling accessor for property '{}'", property.name);
        Arc::new(Accessor::compile(property)) as Arc<dyn Any + Send + Sync>
    });

    match Arc::clone(entry).downcast::<Accessor<T>>() {
        Ok(accessor) => accessor,
        Err(_) => Arc::new(Accessor::compile(property)),
    }
}

/// Number of accessors compiled so far.
pub fn cached_accessor_count() -> usize {
    ACCESSOR_CACHE.read().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Item {
        sku: String,
        quantity: u32,
        total: i64,
        label: String,
    }

    #[test]
    fn test_get_and_set_through_values() {
        let accessor = accessor_for(&property!(Item, quantity));
        let mut item = Item::default();

        assert!(accessor.set(&mut item, Value::Int(5)).unwrap());
        assert_eq!(item.quantity, 5);
        assert_eq!(accessor.get(&item), Value::Int(5));

        assert!(accessor.set(&mut item, Value::Int(-1)).is_err());
        assert_eq!(item.quantity, 5);
    }

    #[test]
    fn test_read_only_property_is_not_written() {
        let accessor = accessor_for(&property!(Item, sku, read_only));
        let mut item = Item::default();

        assert!(!accessor.can_write());
        assert!(!accessor.set(&mut item, Value::from("X")).unwrap());
        assert_eq!(item.sku, "");
    }

    #[test]
    fn test_accessor_is_compiled_once() {
        let first = accessor_for(&property!(Item, sku));
        let second = accessor_for(&property!(Item, sku));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_same_name_with_other_value_type_is_not_shared() {
        let numeric = accessor_for(&Property::new("total", |item: &Item| &item.total));
        let text = accessor_for(&Property::new("total", |item: &Item| &item.label));

        let item = Item {
            total: 12,
            label: "twelve".to_string(),
            ..Default::default()
        };
        assert!(!Arc::ptr_eq(&numeric, &text));
        assert_eq!(numeric.get(&item), Value::Int(12));
        assert_eq!(text.get(&item), Value::from("twelve"));
    }
}

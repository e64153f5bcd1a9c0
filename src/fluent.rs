//! Fluent construction of document mappers.
//!
//! A [`ClassMap`] collects one [`PropertyMap`] per mapped property plus the
//! special mappings (score, document boost, constant document keys) and
//! turns them into a [`crate::mapping::DocumentMapper`].

pub mod class_map;
pub mod property_map;

pub use class_map::{ClassMap, DocumentKeyMap};
pub use property_map::PropertyMap;

//! Search-time collaborators: sort specifications and session settings.

pub mod settings;
pub mod sort;

pub use settings::SearchSettings;
pub use sort::{FieldComparatorSource, Sort, SortField, SortType};

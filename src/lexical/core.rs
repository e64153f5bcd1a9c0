//! Document and field types exchanged with the index engine.

pub mod document;
pub mod field;

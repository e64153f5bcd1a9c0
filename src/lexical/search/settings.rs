//! Session-level search settings.

use serde::{Deserialize, Serialize};

/// Knobs a search session reads before executing a query.
///
/// Mappers flip these when the record type needs more than the default
/// result data (for example a mapped score property).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Keep the score of every hit.
    pub track_doc_scores: bool,
    /// Keep the maximum score over all hits.
    pub track_max_score: bool,
}

use serde::{Deserialize, Serialize};

/// Projection of a catalog product carrying only what search needs to match and display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub discount_price: Option<f64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub is_visible: bool,
}

/// A candidate with the weight it earned in a single ranking pass.
#[derive(Debug, Clone)]
pub(crate) struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f64,
}

/// The fallback tier that produced a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchLayer {
    /// Whole normalized name equals the query.
    Exact,
    /// Single-word query equals one word of the name.
    ExactWord,
    /// Every query word occurs in the name.
    AllWords,
    /// At least one query word occurs in the name.
    AnyWord,
    /// Query word prefixes occur in the name.
    FuzzyPrefix,
    /// No tier matched anything.
    None,
}

/// One page of ranked candidates plus the size of the full match set.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub data: Vec<Candidate>,
    /// Matches in the winning layer before pagination.
    pub total: usize,
    pub layer: MatchLayer,
}

/// Query-string parameters accepted by the search endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Per-node search defaults, shared with handlers through an `Extension`.
#[derive(Debug, Clone, Copy)]
pub struct SearchSettings {
    pub default_limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_limit: crate::pagination::DEFAULT_LIMIT,
        }
    }
}

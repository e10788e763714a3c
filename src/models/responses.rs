use serde::{Deserialize, Serialize};
use crate::core::catalog::KeywordGroup;
use crate::core::filters::DirectoryEntry;
use crate::core::selection::KeywordSelectionSet;
use crate::models::domain::{Category, MatchSummary, RankedMatch};

/// Response for both ranking endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankResponse {
    pub viewer_id: String,
    pub matches: Vec<RankedMatch>,
    pub summary: MatchSummary,
    pub total_candidates: usize,
    pub excluded_count: usize,
}

/// A party's stored keyword selection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResponse {
    pub party_id: String,
    pub keyword_selections: KeywordSelectionSet,
    /// Fewer keywords than the recommended minimum
    pub sparse: bool,
}

/// Catalog grouped by category
#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
    pub groups: Vec<KeywordGroup>,
    pub total: usize,
}

/// Filtered directory listing
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryResponse {
    pub entries: Vec<DirectoryEntry>,
    pub categories: Vec<Category>,
    pub total: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

// Core algorithm exports
pub mod catalog;
pub mod filters;
pub mod matcher;
pub mod ranking;
pub mod scoring;
pub mod selection;

pub use catalog::{KeywordCatalog, KeywordGroup};
pub use filters::{directory_categories, filter_directory, matches_category, matches_search, DirectoryEntry};
pub use matcher::{MatchError, MatchRun, Matcher, Participant};
pub use ranking::{classify, rank, summarize, RankingView};
pub use scoring::{calculate_match_score, score_flat, score_tiered, Criteria, Score};
pub use selection::{KeywordSelectionSet, SelectionError, UnknownKeywords};

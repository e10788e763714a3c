//! Keymatch - keyword-based matching for a job seeker / employer recruitment platform
//!
//! Parties tag themselves with catalog keywords; employers split theirs into
//! required and preferred tiers. This library scores every (job seeker,
//! employer) pair, ranks the results and classifies them into eligibility tiers.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{KeywordCatalog, KeywordSelectionSet, MatchRun, Matcher, Participant, RankingView};
pub use crate::models::{Keyword, KeywordId, MatchResult, MatchingRules, PartyKind, PartyRecord, Priority, RankedMatch};

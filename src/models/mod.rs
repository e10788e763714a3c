// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Category, EligibilityTier, Keyword, KeywordId, KeywordSelection, MatchResult, MatchSummary,
    MatchedKeyword, MatchingRules, PartyKind, PartyProfile, Priority, ProfileFields, RankedMatch,
    ScoringPolicy, SelectionRecord, DEFAULT_PRIORITY,
};
pub use requests::{DirectoryQuery, MatchesQuery, PartyRecord, RankRequest, ReplaceKeywordsRequest};
pub use responses::{
    CatalogResponse, DirectoryResponse, ErrorResponse, HealthResponse, RankResponse, SelectionResponse,
};

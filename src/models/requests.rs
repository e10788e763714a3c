use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::core::ranking::RankingView;
use crate::models::domain::{Keyword, PartyKind, PartyProfile, ProfileFields, SelectionRecord};

/// A party together with its raw keyword selection
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PartyRecord {
    #[validate(length(min = 1))]
    pub party_id: String,
    pub kind: PartyKind,
    #[serde(default)]
    pub keyword_selections: Vec<SelectionRecord>,
    #[serde(default)]
    pub profile: ProfileFields,
}

impl PartyRecord {
    /// Split into the profile and the selection records
    pub fn into_parts(self) -> (PartyProfile, Vec<SelectionRecord>) {
        (
            PartyProfile {
                party_id: self.party_id,
                kind: self.kind,
                profile: self.profile,
            },
            self.keyword_selections,
        )
    }
}

/// Request to rank counterparties supplied inline
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RankRequest {
    #[validate(nested)]
    pub viewer: PartyRecord,
    #[serde(default)]
    pub counterparties: Vec<PartyRecord>,
    #[validate(length(min = 1))]
    pub keywords: Vec<Keyword>,
    #[serde(default)]
    pub view: RankingView,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<u16>,
}

/// Query string for store-backed matching
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MatchesQuery {
    #[serde(default)]
    pub view: RankingView,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<u16>,
}

/// Full replacement of a party's keyword selection
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceKeywordsRequest {
    #[validate(length(max = 200))]
    pub keyword_selections: Vec<SelectionRecord>,
}

/// Query string for the public directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryQuery {
    pub kind: PartyKind,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

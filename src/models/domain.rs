use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Catalog identifier of a keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordId(pub i64);

impl fmt::Display for KeywordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Keyword category.
///
/// The set is open: catalogs ship English names (Skills, Experience, Location, ...)
/// as well as locale-specific ones, so this is a plain string wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Category(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category(value.to_string())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A catalog keyword
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub id: KeywordId,
    #[serde(alias = "keyword")]
    pub text: String,
    pub category: Category,
}

/// Priority tier of an employer keyword.
///
/// Stored as `1` (required) and `2` (preferred). Deserialization also accepts
/// the names, which is what configuration files use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    Required,
    Preferred,
}

/// Tier given to a keyword selected without an explicit priority
pub const DEFAULT_PRIORITY: Priority = Priority::Preferred;

impl Priority {
    pub fn code(self) -> u8 {
        match self {
            Priority::Required => 1,
            Priority::Preferred => 2,
        }
    }

    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            1 => Some(Priority::Required),
            2 => Some(Priority::Preferred),
            _ => None,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        DEFAULT_PRIORITY
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Required => f.write_str("required"),
            Priority::Preferred => f.write_str("preferred"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "required" | "1" => Ok(Priority::Required),
            "preferred" | "2" => Ok(Priority::Preferred),
            other => Err(format!("unknown priority '{}', expected required or preferred", other)),
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

struct PriorityVisitor;

impl<'de> Visitor<'de> for PriorityVisitor {
    type Value = Priority;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("1, 2, \"required\" or \"preferred\"")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Priority, E> {
        Priority::from_code(v).ok_or_else(|| E::custom(format!("invalid priority code {}", v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Priority, E> {
        u64::try_from(v)
            .ok()
            .and_then(Priority::from_code)
            .ok_or_else(|| E::custom(format!("invalid priority code {}", v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Priority, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PriorityVisitor)
    }
}

/// One validated entry of a party's keyword selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordSelection {
    pub keyword_id: KeywordId,
    pub category: Category,
    pub priority: Priority,
}

/// Keyword selection as it arrives from the data layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRecord {
    pub keyword_id: KeywordId,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

impl SelectionRecord {
    pub fn new(keyword_id: i64, priority: Option<Priority>) -> Self {
        Self {
            keyword_id: KeywordId(keyword_id),
            category: None,
            priority,
        }
    }
}

/// Which side of the platform a party is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PartyKind {
    JobSeeker,
    Employer,
}

impl PartyKind {
    /// The kind a party of this kind is matched against
    pub fn counterpart(self) -> Self {
        match self {
            PartyKind::JobSeeker => PartyKind::Employer,
            PartyKind::Employer => PartyKind::JobSeeker,
        }
    }
}

impl fmt::Display for PartyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartyKind::JobSeeker => f.write_str("jobSeeker"),
            PartyKind::Employer => f.write_str("employer"),
        }
    }
}

/// Displayable profile fields.
///
/// Matching ignores these; they are passed through to ranked output. The named
/// fields are the ones the directory search looks at, everything else is kept
/// in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A party without its keyword selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyProfile {
    pub party_id: String,
    pub kind: PartyKind,
    #[serde(default)]
    pub profile: ProfileFields,
}

/// Matched keyword, annotated with the tier it satisfied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedKeyword {
    pub keyword_id: KeywordId,
    pub text: String,
    pub category: Category,
    pub tier: Priority,
}

/// Eligibility label derived from a match result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityTier {
    /// All required keywords met and a high match rate
    FastTrack,
    Qualified,
    Partial,
    #[serde(rename = "none")]
    NoMatch,
}

/// Score of one (seeker, employer) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub match_rate: u8,
    pub meets_all_required: bool,
    pub eligibility: EligibilityTier,
    pub matched_keywords: Vec<MatchedKeyword>,
    pub missing_required: Vec<Keyword>,
    pub matched_required_count: usize,
    pub total_required_count: usize,
    pub matched_preferred_count: usize,
    pub total_preferred_count: usize,
}

/// Match result for one counterparty, with its profile passed through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedMatch {
    pub counterparty_id: String,
    #[serde(flatten)]
    pub result: MatchResult,
    pub profile: ProfileFields,
}

/// Aggregate numbers for a ranked list
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub total: usize,
    pub fast_track_count: usize,
    pub high_match_count: usize,
    pub average_match_rate: u8,
}

/// How employer keywords are turned into a match rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringPolicy {
    /// Required keywords gate a 50 point floor, preferred keywords earn the rest
    #[default]
    Tiered,
    /// Plain overlap percentage over all employer keywords
    Flat,
}

/// Scoring and classification knobs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchingRules {
    pub policy: ScoringPolicy,
    pub default_priority: Priority,
    pub fast_track_threshold: u8,
    pub high_match_threshold: u8,
    pub min_recommended_keywords: usize,
}

impl Default for MatchingRules {
    fn default() -> Self {
        Self {
            policy: ScoringPolicy::Tiered,
            default_priority: DEFAULT_PRIORITY,
            fast_track_threshold: 80,
            high_match_threshold: 80,
            min_recommended_keywords: 3,
        }
    }
}

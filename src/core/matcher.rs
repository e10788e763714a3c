use crate::core::{
    catalog::KeywordCatalog,
    ranking::{classify, rank, summarize, RankingView},
    scoring::{calculate_match_score, Criteria},
    selection::{KeywordSelectionSet, SelectionError, UnknownKeywords},
};
use crate::models::{
    MatchResult, MatchSummary, MatchedKeyword, MatchingRules, PartyKind, PartyProfile, PartyRecord,
    Priority, RankedMatch,
};
use thiserror::Error;

/// Errors that fail a whole matching run
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid keyword selection for {party_id}: {source}")]
    InvalidViewerSelection {
        party_id: String,
        #[source]
        source: SelectionError,
    },
}

/// A party with a validated selection
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub party: PartyProfile,
    pub selection: KeywordSelectionSet,
}

impl Participant {
    pub fn new(party: PartyProfile, selection: KeywordSelectionSet) -> Self {
        Self { party, selection }
    }

    /// Validate a raw record; unknown keywords are dropped, conflicting tiers fail.
    /// Selections without a priority get `default_tier`.
    pub fn from_record(
        record: PartyRecord,
        catalog: &KeywordCatalog,
        default_tier: Priority,
    ) -> Result<Self, SelectionError> {
        let (party, records) = record.into_parts();
        let selection =
            KeywordSelectionSet::from_records(&records, catalog, UnknownKeywords::Skip, default_tier)?;
        Ok(Self { party, selection })
    }

    pub fn id(&self) -> &str {
        &self.party.party_id
    }

    pub fn kind(&self) -> PartyKind {
        self.party.kind
    }
}

/// Result of the matching process
#[derive(Debug)]
pub struct MatchRun {
    pub matches: Vec<RankedMatch>,
    pub summary: MatchSummary,
    pub total_candidates: usize,
    /// Counterparties dropped for being malformed or on the wrong side
    pub excluded: usize,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Counterparty validation (malformed or same-side parties are excluded)
/// 2. Per-pair scoring
/// 3. View filtering, ranking and summary
#[derive(Debug, Clone)]
pub struct Matcher {
    rules: MatchingRules,
}

impl Matcher {
    pub fn new(rules: MatchingRules) -> Self {
        Self { rules }
    }

    pub fn with_default_rules() -> Self {
        Self {
            rules: MatchingRules::default(),
        }
    }

    pub fn rules(&self) -> &MatchingRules {
        &self.rules
    }

    /// Score one candidate selection against one employer selection
    pub fn score_pair(
        &self,
        catalog: &KeywordCatalog,
        employer: &KeywordSelectionSet,
        candidate: &KeywordSelectionSet,
    ) -> MatchResult {
        let criteria = Criteria::from_selection(employer, self.rules.policy);
        let score = calculate_match_score(self.rules.policy, &criteria, &candidate.all_ids());

        let mut matched: Vec<MatchedKeyword> = employer
            .iter()
            .filter_map(|selection| {
                let tier = if score.matched_required.contains(&selection.keyword_id) {
                    Priority::Required
                } else if score.matched_preferred.contains(&selection.keyword_id) {
                    Priority::Preferred
                } else {
                    return None;
                };
                let keyword = catalog.get(selection.keyword_id)?;
                Some(MatchedKeyword {
                    keyword_id: keyword.id,
                    text: keyword.text.clone(),
                    category: keyword.category.clone(),
                    tier,
                })
            })
            .collect();
        // Required first, employer selection order within a tier
        matched.sort_by_key(|kw| kw.tier);

        let missing_required = score
            .missing_required
            .iter()
            .filter_map(|id| catalog.get(*id).cloned())
            .collect();

        MatchResult {
            match_rate: score.match_rate,
            meets_all_required: score.meets_all_required,
            eligibility: classify(
                score.match_rate,
                score.meets_all_required,
                self.rules.fast_track_threshold,
            ),
            matched_keywords: matched,
            missing_required,
            matched_required_count: score.matched_required.len(),
            total_required_count: score.total_required,
            matched_preferred_count: score.matched_preferred.len(),
            total_preferred_count: score.total_preferred,
        }
    }

    /// Rank validated counterparties for a viewer.
    ///
    /// An employer viewer supplies the criteria and each job seeker is the
    /// candidate; a job seeker viewer is the candidate for every employer.
    pub fn find_matches(
        &self,
        viewer: &Participant,
        counterparties: Vec<Participant>,
        catalog: &KeywordCatalog,
        view: RankingView,
        limit: Option<usize>,
    ) -> MatchRun {
        let total_candidates = counterparties.len();
        let wanted = viewer.kind().counterpart();

        let scored: Vec<RankedMatch> = counterparties
            .into_iter()
            .filter(|cp| {
                if cp.kind() != wanted || cp.id() == viewer.id() {
                    tracing::warn!(
                        "Excluding {} ({}) from matches for {} ({})",
                        cp.id(),
                        cp.kind(),
                        viewer.id(),
                        viewer.kind()
                    );
                    return false;
                }
                true
            })
            .map(|cp| {
                let result = match viewer.kind() {
                    PartyKind::Employer => self.score_pair(catalog, &viewer.selection, &cp.selection),
                    PartyKind::JobSeeker => self.score_pair(catalog, &cp.selection, &viewer.selection),
                };
                RankedMatch {
                    counterparty_id: cp.party.party_id,
                    result,
                    profile: cp.party.profile,
                }
            })
            .collect();

        let excluded = total_candidates - scored.len();
        let matches = rank(scored, view, limit);
        let summary = summarize(&matches, self.rules.high_match_threshold);

        tracing::debug!(
            "Ranked {} of {} counterparties for {} ({} excluded)",
            matches.len(),
            total_candidates,
            viewer.id(),
            excluded
        );

        MatchRun {
            matches,
            summary,
            total_candidates,
            excluded,
        }
    }

    /// Validate raw records, then rank.
    ///
    /// A malformed viewer fails the run; a malformed counterparty is logged and
    /// excluded so the rest of the list still ranks.
    pub fn find_matches_from_records(
        &self,
        viewer: PartyRecord,
        counterparties: Vec<PartyRecord>,
        catalog: &KeywordCatalog,
        view: RankingView,
        limit: Option<usize>,
    ) -> Result<MatchRun, MatchError> {
        let viewer_id = viewer.party_id.clone();
        let default_tier = self.rules.default_priority;
        let viewer = Participant::from_record(viewer, catalog, default_tier).map_err(|source| {
            MatchError::InvalidViewerSelection {
                party_id: viewer_id,
                source,
            }
        })?;

        let total_candidates = counterparties.len();
        let valid: Vec<Participant> = counterparties
            .into_iter()
            .filter_map(|record| {
                let id = record.party_id.clone();
                match Participant::from_record(record, catalog, default_tier) {
                    Ok(participant) => Some(participant),
                    Err(e) => {
                        tracing::warn!("Excluding {} from matches: {}", id, e);
                        None
                    }
                }
            })
            .collect();
        let malformed = total_candidates - valid.len();

        let mut run = self.find_matches(&viewer, valid, catalog, view, limit);
        run.total_candidates = total_candidates;
        run.excluded += malformed;
        Ok(run)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

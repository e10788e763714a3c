use crate::core::selection::KeywordSelectionSet;
use crate::models::{KeywordId, ScoringPolicy};
use std::collections::BTreeSet;

/// Points guaranteed once every required keyword is met
pub const PASS_FLOOR: f64 = 50.0;

/// Ceiling for candidates that miss at least one required keyword
pub const PARTIAL_CEILING: f64 = 30.0;

/// Employer-side keyword sets used as matching criteria
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub required: BTreeSet<KeywordId>,
    pub preferred: BTreeSet<KeywordId>,
}

impl Criteria {
    pub fn new(required: BTreeSet<KeywordId>, preferred: BTreeSet<KeywordId>) -> Self {
        Self { required, preferred }
    }

    /// Criteria of an employer selection under the given policy.
    ///
    /// The flat policy ignores tiers: every keyword counts as preferred.
    pub fn from_selection(selection: &KeywordSelectionSet, policy: ScoringPolicy) -> Self {
        match policy {
            ScoringPolicy::Tiered => Self {
                required: selection.required_ids(),
                preferred: selection.preferred_ids(),
            },
            ScoringPolicy::Flat => Self {
                required: BTreeSet::new(),
                preferred: selection.all_ids(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.preferred.is_empty()
    }
}

/// Raw outcome of scoring one candidate against one set of criteria
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    pub match_rate: u8,
    pub meets_all_required: bool,
    pub matched_required: BTreeSet<KeywordId>,
    pub matched_preferred: BTreeSet<KeywordId>,
    pub missing_required: BTreeSet<KeywordId>,
    pub total_required: usize,
    pub total_preferred: usize,
}

/// Score a candidate with the configured policy
pub fn calculate_match_score(
    policy: ScoringPolicy,
    criteria: &Criteria,
    candidate: &BTreeSet<KeywordId>,
) -> Score {
    match policy {
        ScoringPolicy::Tiered => score_tiered(criteria, candidate),
        ScoringPolicy::Flat => {
            let employer: BTreeSet<KeywordId> =
                criteria.required.union(&criteria.preferred).copied().collect();
            score_flat(&employer, candidate)
        }
    }
}

/// Tiered scoring.
///
/// ```text
/// no criteria                 -> 0
/// all required met            -> 50 + 50 * matched_preferred / preferred   (50 + 50 when no preferred)
/// some required missing       -> 30 * matched_required / required
/// ```
pub fn score_tiered(criteria: &Criteria, candidate: &BTreeSet<KeywordId>) -> Score {
    let matched_required: BTreeSet<KeywordId> =
        criteria.required.intersection(candidate).copied().collect();
    let matched_preferred: BTreeSet<KeywordId> =
        criteria.preferred.intersection(candidate).copied().collect();
    let missing_required: BTreeSet<KeywordId> =
        criteria.required.difference(candidate).copied().collect();

    let meets_all_required = missing_required.is_empty();

    let rate = if criteria.is_empty() {
        0.0
    } else if meets_all_required {
        PASS_FLOOR + (100.0 - PASS_FLOOR) * ratio(matched_preferred.len(), criteria.preferred.len(), 1.0)
    } else {
        PARTIAL_CEILING * ratio(matched_required.len(), criteria.required.len(), 0.0)
    };

    Score {
        match_rate: round_rate(rate),
        meets_all_required,
        matched_required,
        matched_preferred,
        missing_required,
        total_required: criteria.required.len(),
        total_preferred: criteria.preferred.len(),
    }
}

/// Flat overlap scoring: `100 * matched / employer`, 0 for an empty employer set.
///
/// There is no required tier, so every candidate meets all required keywords
/// and matches are reported as preferred.
pub fn score_flat(employer: &BTreeSet<KeywordId>, candidate: &BTreeSet<KeywordId>) -> Score {
    let matched: BTreeSet<KeywordId> = employer.intersection(candidate).copied().collect();
    let rate = 100.0 * ratio(matched.len(), employer.len(), 0.0);

    Score {
        match_rate: round_rate(rate),
        meets_all_required: true,
        matched_required: BTreeSet::new(),
        matched_preferred: matched,
        missing_required: BTreeSet::new(),
        total_required: 0,
        total_preferred: employer.len(),
    }
}

/// `part / whole`, or `empty` when `whole` is zero
#[inline]
fn ratio(part: usize, whole: usize, empty: f64) -> f64 {
    if whole == 0 {
        empty
    } else {
        part as f64 / whole as f64
    }
}

#[inline]
fn round_rate(rate: f64) -> u8 {
    rate.round().clamp(0.0, 100.0) as u8
}

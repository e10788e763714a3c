use crate::models::{EligibilityTier, MatchSummary, RankedMatch};
use serde::{Deserialize, Serialize};

/// Which results a ranked view keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingView {
    /// Any keyword overlap (`match_rate > 0`)
    #[default]
    Active,
    /// Overlap and every required keyword met
    Qualified,
    /// Everything, including zero matches
    All,
}

impl RankingView {
    pub fn admits(self, entry: &RankedMatch) -> bool {
        match self {
            RankingView::Active => entry.result.match_rate > 0,
            RankingView::Qualified => entry.result.match_rate > 0 && entry.result.meets_all_required,
            RankingView::All => true,
        }
    }
}

/// Eligibility label for a score.
///
/// Meeting every required keyword is a precondition of both upper tiers, so
/// a high rate alone never reaches fast-track.
pub fn classify(match_rate: u8, meets_all_required: bool, fast_track_threshold: u8) -> EligibilityTier {
    if match_rate == 0 {
        EligibilityTier::NoMatch
    } else if meets_all_required && match_rate >= fast_track_threshold {
        EligibilityTier::FastTrack
    } else if meets_all_required {
        EligibilityTier::Qualified
    } else {
        EligibilityTier::Partial
    }
}

/// Filter by `view`, order by (meets all required, match rate) descending,
/// then truncate to `limit`.
///
/// The sort is stable: entries with equal keys keep their input order.
pub fn rank(mut entries: Vec<RankedMatch>, view: RankingView, limit: Option<usize>) -> Vec<RankedMatch> {
    entries.retain(|entry| view.admits(entry));

    entries.sort_by(|a, b| {
        b.result
            .meets_all_required
            .cmp(&a.result.meets_all_required)
            .then_with(|| b.result.match_rate.cmp(&a.result.match_rate))
    });

    if let Some(limit) = limit {
        entries.truncate(limit);
    }

    entries
}

/// Aggregate numbers shown under a ranked list
pub fn summarize(entries: &[RankedMatch], high_match_threshold: u8) -> MatchSummary {
    if entries.is_empty() {
        return MatchSummary::default();
    }

    let total = entries.len();
    let rate_sum: u64 = entries.iter().map(|e| u64::from(e.result.match_rate)).sum();
    let average = (rate_sum as f64 / total as f64).round() as u8;

    MatchSummary {
        total,
        fast_track_count: entries
            .iter()
            .filter(|e| e.result.eligibility == EligibilityTier::FastTrack)
            .count(),
        high_match_count: entries
            .iter()
            .filter(|e| e.result.match_rate >= high_match_threshold)
            .count(),
        average_match_rate: average,
    }
}

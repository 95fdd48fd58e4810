//! Step-by-step review of recognition results before anything is written.

pub mod multi;
pub mod single;

use crate::models::MatchCandidate;

/// Candidates must be strictly more similar than this to be offered
pub const ELIGIBLE_SIMILARITY: f64 = 0.70;

/// Candidates above the similarity threshold, in the service's rank order
pub fn eligible_candidates(matches: &[MatchCandidate]) -> Vec<MatchCandidate> {
    matches
        .iter()
        .filter(|m| m.similarity > ELIGIBLE_SIMILARITY)
        .cloned()
        .collect()
}

pub use multi::{CardDecision, MultiCardReview, MultiPhase, ReviewStep, ReviewSummary};
pub use single::{ProcessStep, SingleCardReview, SingleOutcome, SingleView};

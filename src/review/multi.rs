//! Review of a multi-card scan.
//!
//! One card at a time; within a card the user cycles through ranked
//! variants. Skipping past the last variant skips the card, and moving past
//! the last card ends the review with a summary.

use std::fmt;

use crate::models::{DetectedCard, MatchVariant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardDecision {
    #[default]
    Pending,
    Added,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReviewSummary {
    pub added: usize,
    pub skipped: usize,
    pub total: usize,
}

impl ReviewSummary {
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.added + self.skipped)
    }
}

impl fmt::Display for ReviewSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scanning Complete!\n\nAdded: {} cards\nSkipped: {} cards\nTotal detected: {} cards",
            self.added, self.skipped, self.total
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiPhase {
    /// Detection image and crops, shown before reviewing when requested
    Overview,
    Reviewing,
    Finished(ReviewSummary),
}

/// What a skip or accept led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStep {
    NextVariant,
    NextCard,
    Finished(ReviewSummary),
}

#[derive(Debug, Clone)]
pub struct MultiCardReview {
    cards: Vec<DetectedCard>,
    decisions: Vec<CardDecision>,
    variants: Vec<usize>,
    index: usize,
    phase: MultiPhase,
}

impl MultiCardReview {
    pub fn new(cards: Vec<DetectedCard>, show_process: bool) -> Self {
        let total = cards.len();
        let phase = if total == 0 {
            MultiPhase::Finished(ReviewSummary::default())
        } else if show_process {
            MultiPhase::Overview
        } else {
            MultiPhase::Reviewing
        };
        Self {
            decisions: vec![CardDecision::Pending; total],
            variants: vec![0; total],
            cards,
            index: 0,
            phase,
        }
    }

    pub fn phase(&self) -> MultiPhase {
        self.phase
    }

    pub fn cards(&self) -> &[DetectedCard] {
        &self.cards
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn start_reviewing(&mut self) {
        if self.phase == MultiPhase::Overview {
            self.phase = MultiPhase::Reviewing;
            self.index = 0;
        }
    }

    pub fn current_card(&self) -> Option<&DetectedCard> {
        match self.phase {
            MultiPhase::Reviewing => self.cards.get(self.index),
            _ => None,
        }
    }

    pub fn variant_index(&self) -> usize {
        self.variants.get(self.index).copied().unwrap_or(0)
    }

    /// The variant on display for the current card
    pub fn current_variant(&self) -> Option<MatchVariant> {
        self.current_card()
            .map(|card| card.variant(self.variant_index()))
    }

    pub fn decision(&self, index: usize) -> CardDecision {
        self.decisions.get(index).copied().unwrap_or_default()
    }

    fn current_is_pending(&self) -> bool {
        self.phase == MultiPhase::Reviewing && self.decision(self.index) == CardDecision::Pending
    }

    pub fn summary(&self) -> ReviewSummary {
        let count = |wanted: CardDecision| self.decisions.iter().filter(|&&d| d == wanted).count();
        ReviewSummary {
            added: count(CardDecision::Added),
            skipped: count(CardDecision::Skipped),
            total: self.cards.len(),
        }
    }

    /// Show the next variant; past the last one, skip the card
    pub fn skip(&mut self) -> Option<ReviewStep> {
        if !self.current_is_pending() {
            return None;
        }
        let count = self.cards[self.index].variant_count();
        let variant = self.variants[self.index];
        if variant + 1 < count {
            self.variants[self.index] = variant + 1;
            return Some(ReviewStep::NextVariant);
        }
        log::debug!("Card {} skipped after {} variant(s)", self.index + 1, count);
        self.decisions[self.index] = CardDecision::Skipped;
        self.variants[self.index] = 0;
        Some(self.advance())
    }

    /// Record the displayed variant as added. Call only after it was written.
    pub fn accept(&mut self) -> Option<ReviewStep> {
        if !self.current_is_pending() {
            return None;
        }
        self.decisions[self.index] = CardDecision::Added;
        self.variants[self.index] = 0;
        Some(self.advance())
    }

    fn advance(&mut self) -> ReviewStep {
        if self.index + 1 < self.cards.len() {
            self.index += 1;
            ReviewStep::NextCard
        } else {
            ReviewStep::Finished(self.finish())
        }
    }

    /// End the review now and report what was decided
    pub fn finish(&mut self) -> ReviewSummary {
        let summary = self.summary();
        log::info!(
            "Review finished: {} added, {} skipped of {}",
            summary.added,
            summary.skipped,
            summary.total
        );
        self.phase = MultiPhase::Finished(summary);
        summary
    }

    pub fn previous(&mut self) -> bool {
        if self.phase != MultiPhase::Reviewing || self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn next(&mut self) -> bool {
        if self.phase != MultiPhase::Reviewing || self.index + 1 >= self.cards.len() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Jump to a card, e.g. from the overview grid
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.cards.len() || matches!(self.phase, MultiPhase::Finished(_)) {
            return false;
        }
        self.phase = MultiPhase::Reviewing;
        self.index = index;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(card_id: &str, variants: usize) -> DetectedCard {
        DetectedCard {
            card_id: card_id.to_string(),
            card_name: card_id.to_string(),
            similarity: 0.9,
            all_matches: (0..variants)
                .map(|i| MatchVariant {
                    rank: i as u32 + 1,
                    card_id: format!("{card_id}-v{i}"),
                    card_name: card_id.to_string(),
                    similarity: 0.9 - i as f64 * 0.05,
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_skip_cycles_variants_then_skips_card() {
        let mut review = MultiCardReview::new(vec![card("a", 3), card("b", 1)], false);

        assert_eq!(review.current_variant().unwrap().card_id, "a-v0");
        assert_eq!(review.skip(), Some(ReviewStep::NextVariant));
        assert_eq!(review.current_variant().unwrap().card_id, "a-v1");
        assert_eq!(review.skip(), Some(ReviewStep::NextVariant));
        assert_eq!(review.current_variant().unwrap().card_id, "a-v2");
        assert_eq!(review.skip(), Some(ReviewStep::NextCard));

        assert_eq!(review.decision(0), CardDecision::Skipped);
        assert_eq!(review.index(), 1);
        assert_eq!(review.variant_index(), 0);
    }

    #[test]
    fn test_card_without_variant_list_has_one() {
        let mut review = MultiCardReview::new(vec![card("a", 0)], false);
        assert_eq!(review.current_variant().unwrap().card_id, "a");
        let step = review.skip().unwrap();
        assert_eq!(
            step,
            ReviewStep::Finished(ReviewSummary {
                added: 0,
                skipped: 1,
                total: 1
            })
        );
    }

    #[test]
    fn test_accept_advances_and_finishes() {
        let mut review = MultiCardReview::new(vec![card("a", 2), card("b", 2)], false);
        review.skip();
        assert_eq!(review.current_variant().unwrap().card_id, "a-v1");
        assert_eq!(review.accept(), Some(ReviewStep::NextCard));
        assert_eq!(review.current_variant().unwrap().card_id, "b-v0");

        let summary = ReviewSummary {
            added: 2,
            skipped: 0,
            total: 2,
        };
        assert_eq!(review.accept(), Some(ReviewStep::Finished(summary)));
        assert_eq!(review.phase(), MultiPhase::Finished(summary));
        assert!(review.current_card().is_none());
    }

    #[test]
    fn test_navigation_keeps_decisions() {
        let mut review = MultiCardReview::new(vec![card("a", 1), card("b", 1), card("c", 1)], false);
        review.accept();
        assert!(review.previous());
        assert!(!review.previous());
        assert_eq!(review.decision(0), CardDecision::Added);

        // Decided cards refuse further decisions
        assert_eq!(review.accept(), None);
        assert_eq!(review.skip(), None);

        assert!(review.next());
        assert!(review.next());
        assert!(!review.next());
        assert_eq!(review.summary().remaining(), 2);
    }

    #[test]
    fn test_overview_precedes_review() {
        let mut review = MultiCardReview::new(vec![card("a", 1), card("b", 1)], true);
        assert_eq!(review.phase(), MultiPhase::Overview);
        assert!(review.current_card().is_none());
        assert_eq!(review.accept(), None);

        review.start_reviewing();
        assert_eq!(review.phase(), MultiPhase::Reviewing);
        assert_eq!(review.index(), 0);
    }

    #[test]
    fn test_go_to_from_overview() {
        let mut review = MultiCardReview::new(vec![card("a", 1), card("b", 1)], true);
        assert!(review.go_to(1));
        assert_eq!(review.current_card().unwrap().card_id, "b");
        assert!(!review.go_to(2));
    }

    #[test]
    fn test_empty_scan_is_finished() {
        let review = MultiCardReview::new(Vec::new(), false);
        assert!(review.is_empty());
        assert_eq!(review.phase(), MultiPhase::Finished(ReviewSummary::default()));
    }

    #[test]
    fn test_finish_early_and_summary_text() {
        let mut review = MultiCardReview::new(vec![card("a", 1), card("b", 1)], false);
        review.accept();
        let summary = review.finish();
        assert_eq!(
            summary.to_string(),
            "Scanning Complete!\n\nAdded: 1 cards\nSkipped: 0 cards\nTotal detected: 2 cards"
        );
    }
}

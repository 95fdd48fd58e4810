//! Review of a single-card scan: optional walk through the processing
//! images, then one candidate at a time until the user accepts one or the
//! list runs out.

use super::eligible_candidates;
use crate::models::MatchCandidate;

pub const NO_ELIGIBLE_MATCHES: &str =
    "No matches found for this card with sufficient confidence (>70%).";
pub const NO_MORE_MATCHES: &str = "No more matches available.";

/// Intermediate images shown before the candidates, in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStep {
    CapturedImage,
    BoundingBox,
    CroppedImage,
    OcrExtracted,
}

impl ProcessStep {
    pub fn next(self) -> Option<ProcessStep> {
        match self {
            ProcessStep::CapturedImage => Some(ProcessStep::BoundingBox),
            ProcessStep::BoundingBox => Some(ProcessStep::CroppedImage),
            ProcessStep::CroppedImage => Some(ProcessStep::OcrExtracted),
            ProcessStep::OcrExtracted => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ProcessStep::CapturedImage => "Captured Image",
            ProcessStep::BoundingBox => "Card Detection",
            ProcessStep::CroppedImage => "Cropped Card",
            ProcessStep::OcrExtracted => "Text Extraction (OCR)",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SingleOutcome {
    Accepted(MatchCandidate),
    Failed(String),
    Exhausted,
    Cancelled,
}

impl SingleOutcome {
    /// Message for outcomes that end without a card
    pub fn message(&self) -> Option<&str> {
        match self {
            SingleOutcome::Failed(message) => Some(message),
            SingleOutcome::Exhausted => Some(NO_MORE_MATCHES),
            SingleOutcome::Accepted(_) | SingleOutcome::Cancelled => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SingleView {
    /// Waiting for the scan response
    Loading,
    Process(ProcessStep),
    Confirmation { index: usize },
    Finished(SingleOutcome),
}

#[derive(Debug, Clone)]
pub struct SingleCardReview {
    show_process: bool,
    candidates: Vec<MatchCandidate>,
    view: SingleView,
}

impl SingleCardReview {
    pub fn new(show_process: bool) -> Self {
        Self {
            show_process,
            candidates: Vec::new(),
            view: SingleView::Loading,
        }
    }

    pub fn show_process(&self) -> bool {
        self.show_process
    }

    pub fn view(&self) -> &SingleView {
        &self.view
    }

    pub fn candidates(&self) -> &[MatchCandidate] {
        &self.candidates
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.view, SingleView::Finished(_))
    }

    /// Feed the scan's ranked matches
    pub fn receive(&mut self, matches: &[MatchCandidate]) -> &SingleView {
        if self.view != SingleView::Loading {
            return &self.view;
        }
        self.candidates = eligible_candidates(matches);
        log::info!(
            "{} of {} candidates above the similarity threshold",
            self.candidates.len(),
            matches.len()
        );
        self.view = if self.candidates.is_empty() {
            SingleView::Finished(SingleOutcome::Failed(NO_ELIGIBLE_MATCHES.to_string()))
        } else if self.show_process {
            SingleView::Process(ProcessStep::CapturedImage)
        } else {
            SingleView::Confirmation { index: 0 }
        };
        &self.view
    }

    /// The scan request itself failed
    pub fn fail(&mut self, message: impl Into<String>) {
        if !self.is_finished() {
            self.view = SingleView::Finished(SingleOutcome::Failed(message.into()));
        }
    }

    /// Advance one processing step; the last one leads to the first candidate
    pub fn continue_step(&mut self) -> &SingleView {
        if let SingleView::Process(step) = self.view {
            self.view = match step.next() {
                Some(next) => SingleView::Process(next),
                None => SingleView::Confirmation { index: 0 },
            };
        }
        &self.view
    }

    /// Leave the flow from any unfinished state
    pub fn go_back(&mut self) {
        if !self.is_finished() {
            self.view = SingleView::Finished(SingleOutcome::Cancelled);
        }
    }

    pub fn current_candidate(&self) -> Option<&MatchCandidate> {
        match self.view {
            SingleView::Confirmation { index } => self.candidates.get(index),
            _ => None,
        }
    }

    /// Show the next candidate, or finish once none are left
    pub fn reject(&mut self) -> &SingleView {
        if let SingleView::Confirmation { index } = self.view {
            let next = index + 1;
            self.view = if next < self.candidates.len() {
                SingleView::Confirmation { index: next }
            } else {
                log::info!("All {} candidates rejected", self.candidates.len());
                SingleView::Finished(SingleOutcome::Exhausted)
            };
        }
        &self.view
    }

    /// Take the displayed candidate and finish
    pub fn accept(&mut self) -> Option<MatchCandidate> {
        let candidate = self.current_candidate()?.clone();
        self.view = SingleView::Finished(SingleOutcome::Accepted(candidate.clone()));
        Some(candidate)
    }
}

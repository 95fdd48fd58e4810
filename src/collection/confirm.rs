//! Two-press delete confirmation.
//!
//! The first press arms the confirmation for one card; a second press on
//! the same card inside [`CONFIRM_WINDOW`] fires. Time is read through a
//! [`Clock`] so tests can move it forward by hand.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub const CONFIRM_WINDOW: Duration = Duration::from_secs(5);

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-driven clock; clones share the same time
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmState {
    Unarmed,
    Armed { card_id: String, since: Instant },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletePress {
    /// Waiting for the second press
    Armed,
    /// Second press landed in time; delete this card
    Confirmed(String),
}

#[derive(Debug, Clone)]
pub struct DeleteConfirm {
    state: ConfirmState,
}

impl Default for DeleteConfirm {
    fn default() -> Self {
        Self {
            state: ConfirmState::Unarmed,
        }
    }
}

impl DeleteConfirm {
    pub fn state(&self) -> &ConfirmState {
        &self.state
    }

    /// Armed for `card_id` and still inside the window at `now`
    pub fn is_armed_for(&self, card_id: &str, now: Instant) -> bool {
        match &self.state {
            ConfirmState::Armed { card_id: armed, since } => {
                armed == card_id && now.duration_since(*since) < CONFIRM_WINDOW
            }
            ConfirmState::Unarmed => false,
        }
    }

    pub fn press(&mut self, card_id: &str, now: Instant) -> DeletePress {
        if self.is_armed_for(card_id, now) {
            self.state = ConfirmState::Unarmed;
            return DeletePress::Confirmed(card_id.to_string());
        }
        log::debug!("Delete armed for {}", card_id);
        self.state = ConfirmState::Armed {
            card_id: card_id.to_string(),
            since: now,
        };
        DeletePress::Armed
    }

    /// Disarm once the window has passed. Returns true if it disarmed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if let ConfirmState::Armed { since, .. } = &self.state {
            if now.duration_since(*since) >= CONFIRM_WINDOW {
                log::debug!("Delete confirmation expired");
                self.state = ConfirmState::Unarmed;
                return true;
            }
        }
        false
    }

    pub fn cancel(&mut self) {
        self.state = ConfirmState::Unarmed;
    }
}

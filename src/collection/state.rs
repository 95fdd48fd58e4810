//! Local view of the signed-in user's collection.
//!
//! Writes go to the remote store; the local copy is patched so totals stay
//! consistent without a reload. Quantity updates wait for the server, deletes
//! are applied locally first and kept even if the server refuses them.

use crate::api::{AddAction, CollectionResponse, ScannerApi};
use crate::collection::confirm::{Clock, ConfirmState, DeleteConfirm, DeletePress, SystemClock};
use crate::collection::sort::{sorted_view, SortKey, SortOrder};
use crate::config::Session;
use crate::error::ApiResult;
use crate::models::CollectionItem;
use crate::notice::Notice;
use crate::validation::validate_quantity;

pub const DELETE_REJECTED: &str = "Card removed locally, but failed to delete on the server. It may reappear after a refresh if the server still has it.";
pub const DELETE_UNREACHABLE: &str = "Could not reach server to delete card. The card was removed locally and may still exist on the server.";
pub const DELETE_FAILED: &str = "Failed to delete card on the server.";
pub const DELETE_FAILED_UNREACHABLE: &str = "Could not reach server to delete card.";
pub const LOGIN_REQUIRED: &str = "Please login to add cards to your collection";

/// What a delete did locally, plus the message to show
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOutcome {
    pub removed: Option<CollectionItem>,
    pub notice: Notice,
}

#[derive(Debug)]
pub struct CollectionState<C: Clock = SystemClock> {
    items: Vec<CollectionItem>,
    total_cards: usize,
    total_quantity: u64,
    selected: Option<CollectionItem>,
    confirm: DeleteConfirm,
    clock: C,
}

impl CollectionState<SystemClock> {
    pub fn from_response(response: CollectionResponse) -> Self {
        Self::with_clock(response, SystemClock)
    }

    pub fn new(items: Vec<CollectionItem>) -> Self {
        let total_cards = items.len();
        Self::from_response(CollectionResponse {
            total_cards,
            collection: items,
        })
    }
}

impl<C: Clock> CollectionState<C> {
    pub fn with_clock(response: CollectionResponse, clock: C) -> Self {
        let total_quantity = response
            .collection
            .iter()
            .map(|item| u64::from(item.quantity))
            .sum();
        Self {
            items: response.collection,
            total_cards: response.total_cards,
            total_quantity,
            selected: None,
            confirm: DeleteConfirm::default(),
            clock,
        }
    }

    pub fn items(&self) -> &[CollectionItem] {
        &self.items
    }

    /// Unique cards, as reported by the server and adjusted by deletes
    pub fn total_cards(&self) -> usize {
        self.total_cards
    }

    pub fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    pub fn selected(&self) -> Option<&CollectionItem> {
        self.selected.as_ref()
    }

    pub fn find(&self, card_id: &str) -> Option<&CollectionItem> {
        self.items.iter().find(|item| item.card_id == card_id)
    }

    pub fn view(&self, key: SortKey, order: SortOrder, query: &str) -> Vec<&CollectionItem> {
        sorted_view(&self.items, key, order, query)
    }

    /// Open the detail view for a card. Returns false if it is not in the collection.
    pub fn open(&mut self, card_id: &str) -> bool {
        let Some(item) = self.find(card_id).cloned() else {
            return false;
        };
        if self.selected.as_ref().map(|s| s.card_id.as_str()) != Some(card_id) {
            self.confirm.cancel();
        }
        self.selected = Some(item);
        true
    }

    pub fn close(&mut self) {
        self.selected = None;
        self.confirm.cancel();
    }

    /// Set a card's quantity and patch the running total. Returns false if
    /// the card is not in the collection.
    pub fn apply_quantity(&mut self, card_id: &str, quantity: u32) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.card_id == card_id) else {
            return false;
        };
        item.quantity = quantity;
        if let Some(selected) = self.selected.as_mut().filter(|s| s.card_id == card_id) {
            selected.quantity = quantity;
        }
        self.total_quantity = self.items.iter().map(|item| u64::from(item.quantity)).sum();
        true
    }

    /// Drop a card from the local copy. The detail view is closed and any
    /// pending delete disarmed even when the card is not held locally.
    pub fn remove_local(&mut self, card_id: &str) -> Option<CollectionItem> {
        self.close();
        let index = self.items.iter().position(|item| item.card_id == card_id)?;
        let removed = self.items.remove(index);
        self.total_cards = self.total_cards.saturating_sub(1);
        self.total_quantity = self
            .total_quantity
            .saturating_sub(u64::from(removed.quantity));
        Some(removed)
    }

    pub fn press_delete(&mut self, card_id: &str) -> DeletePress {
        let now = self.clock.now();
        self.confirm.press(card_id, now)
    }

    /// Disarm an expired delete confirmation
    pub fn poll_confirm(&mut self) -> bool {
        let now = self.clock.now();
        self.confirm.poll(now)
    }

    pub fn is_delete_armed(&self, card_id: &str) -> bool {
        self.confirm.is_armed_for(card_id, self.clock.now())
    }

    pub fn confirm_state(&self) -> &ConfirmState {
        self.confirm.state()
    }

    /// Write a new quantity, then patch local state. Negative values are
    /// rejected before any request; a failed write leaves state untouched.
    pub async fn update_quantity(
        &mut self,
        api: &ScannerApi,
        session: &Session,
        card_id: &str,
        quantity: i64,
    ) -> ApiResult<u32> {
        let quantity = validate_quantity(quantity)?;
        match api.update_quantity(&session.user_id, card_id, quantity).await {
            Ok(_) => {
                self.apply_quantity(card_id, quantity);
                Ok(quantity)
            }
            Err(e) => {
                log::error!("Failed to update quantity of {}: {}", card_id, e);
                Err(e)
            }
        }
    }

    /// Remove a card locally, then on the server. A server failure keeps the
    /// local removal and is reported through the notice.
    pub async fn delete_card(
        &mut self,
        api: &ScannerApi,
        session: Option<&Session>,
        card_id: &str,
    ) -> DeleteOutcome {
        let removed = self.remove_local(card_id);
        let Some(session) = session else {
            log::warn!("No session; {} removed locally only", card_id);
            let notice = if removed.is_some() {
                Notice::info("Card removed locally")
            } else {
                Notice::info("Card is not in your collection")
            };
            return DeleteOutcome { removed, notice };
        };

        let held_locally = removed.is_some();
        let notice = match api.delete_card(&session.user_id, card_id).await {
            Ok(()) => Notice::success("Card removed from your collection"),
            Err(e) if e.is_transport() => {
                log::error!("Failed to delete card {}: {}", card_id, e);
                Notice::error(if held_locally {
                    DELETE_UNREACHABLE
                } else {
                    DELETE_FAILED_UNREACHABLE
                })
            }
            Err(e) => {
                log::warn!("Server refused delete of {}: {}", card_id, e);
                Notice::error(if held_locally {
                    DELETE_REJECTED
                } else {
                    DELETE_FAILED
                })
            }
        };
        DeleteOutcome { removed, notice }
    }
}

/// Add one copy of an accepted match to the collection and describe the result
pub async fn add_accepted(api: &ScannerApi, session: Option<&Session>, card_id: &str) -> Notice {
    let Some(session) = session else {
        return Notice::error(LOGIN_REQUIRED);
    };
    match api.add_to_collection(&session.user_id, card_id, 1).await {
        Ok(outcome) => {
            let action = match outcome.action {
                AddAction::Added => "added",
                AddAction::Updated => "updated",
            };
            Notice::success(format!(
                "Card {} to your collection! You now have {} of this card.",
                action, outcome.quantity
            ))
        }
        Err(e) => {
            log::error!("Failed to add {} to collection: {}", card_id, e);
            Notice::error(format!("Failed to add card to collection: {e}"))
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;

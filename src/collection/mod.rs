//! The user's collection: sorting and filtering, local state and delete confirmation.

pub mod confirm;
pub mod sort;
pub mod state;

pub use confirm::{Clock, ConfirmState, DeleteConfirm, DeletePress, ManualClock, SystemClock};
pub use sort::{sorted_view, sorted_view_by_label, SortKey, SortOrder};
pub use state::{add_accepted, CollectionState, DeleteOutcome};

//! Pokémon card scanner client
//!
//! Review recognition results for scanned cards, keep a collection in sync
//! with the remote store, and browse it sorted and filtered.

pub mod api;
pub mod cache;
pub mod capture;
pub mod collection;
pub mod config;
pub mod error;
pub mod formatters;
pub mod leaderboard;
pub mod models;
pub mod notice;
pub mod ranking;
pub mod review;
pub mod validation;

// Re-export commonly used items
pub use api::{CollectionResponse, MultiScanResponse, NewUser, ScanResponse, ScannerApi};
pub use cache::{fetch_card_cached, CardCache};
pub use capture::{capture_once, CaptureDevice, CaptureSession, FileCapture};
pub use collection::{
    add_accepted, sorted_view, CollectionState, DeleteOutcome, DeletePress, SortKey, SortOrder,
};
pub use config::{Config, Session};
pub use error::{ApiError, ApiResult, ValidationError};
pub use leaderboard::{open_public_collection, CollectionAccess, LeaderboardView};
pub use models::{CardDetails, CollectionItem, DetectedCard, LeaderboardEntry, MatchCandidate};
pub use notice::{Notice, NoticeLevel};
pub use review::{MultiCardReview, SingleCardReview};

//! Leaderboard browsing and access to other users' public collections.

use crate::api::{CollectionResponse, ScannerApi};
use crate::error::{ApiError, ApiResult};
use crate::models::LeaderboardEntry;

pub const PAGE_SIZE: usize = 5;

/// Filtered, paginated view over the leaderboard
#[derive(Debug, Clone)]
pub struct LeaderboardView {
    entries: Vec<LeaderboardEntry>,
    query: String,
    page: usize,
}

impl LeaderboardView {
    pub fn new(entries: Vec<LeaderboardEntry>) -> Self {
        Self {
            entries,
            query: String::new(),
            page: 1,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Change the name filter; always returns to the first page
    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_lowercase();
        self.page = 1;
    }

    pub fn filtered(&self) -> Vec<&LeaderboardEntry> {
        self.entries
            .iter()
            .filter(|entry| self.query.is_empty() || entry.name.to_lowercase().contains(&self.query))
            .collect()
    }

    pub fn total_pages(&self) -> usize {
        self.filtered().len().div_ceil(PAGE_SIZE).max(1)
    }

    /// 1-based current page
    pub fn page(&self) -> usize {
        self.page
    }

    /// Entries on the current page, with their overall rank (1-based)
    pub fn current_items(&self) -> Vec<(usize, &LeaderboardEntry)> {
        let start = (self.page - 1) * PAGE_SIZE;
        self.filtered()
            .into_iter()
            .enumerate()
            .skip(start)
            .take(PAGE_SIZE)
            .map(|(i, entry)| (i + 1, entry))
            .collect()
    }

    /// Move to `page`; out-of-range requests are ignored
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages() {
            return false;
        }
        self.page = page;
        true
    }
}

/// Result of trying to open someone's collection from the leaderboard
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionAccess {
    Public(CollectionResponse),
    Private(String),
}

fn private_message(entry: &LeaderboardEntry) -> String {
    format!("{}'s collection is private", entry.name)
}

/// Check visibility first, then load the collection if it is public
pub async fn open_public_collection(
    api: &ScannerApi,
    entry: &LeaderboardEntry,
) -> ApiResult<CollectionAccess> {
    if !api.profile_status(&entry.user_id).await? {
        log::info!("Collection of {} is private", entry.user_id);
        return Ok(CollectionAccess::Private(private_message(entry)));
    }
    match api.user_collection(&entry.user_id).await {
        Ok(collection) => Ok(CollectionAccess::Public(collection)),
        Err(ApiError::PrivateCollection) => Ok(CollectionAccess::Private(private_message(entry))),
        Err(e) => Err(e),
    }
}

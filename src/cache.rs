use crate::api::ScannerApi;
use crate::error::ApiResult;
use crate::models::CardDetails;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// On-disk cache of catalog lookups, keyed by card id (`base1-4`)
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct CardCache {
    cards: HashMap<String, CardDetails>,
    /// File this cache was loaded from; `None` keeps it in memory only
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl CardCache {
    /// Default cache file: `<cache dir>/pokemon_scanner/card_cache.json`
    pub fn cache_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pokemon_scanner")
            .join("card_cache.json")
    }

    pub fn load() -> Self {
        Self::load_from(&Self::cache_path())
    }

    /// Load cache from `path`, or start empty if it is missing or unreadable
    pub fn load_from(path: &Path) -> Self {
        let mut cache = Self::read(path).unwrap_or_default();
        cache.path = Some(path.to_path_buf());
        cache
    }

    fn read(path: &Path) -> Option<Self> {
        if !path.exists() {
            log::info!("Starting with empty card cache");
            return None;
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<CardCache>(&content) {
                Ok(cache) => {
                    log::info!("Loaded card cache with {} entries", cache.len());
                    Some(cache)
                }
                Err(e) => {
                    log::warn!("Failed to parse cache file, starting fresh: {}", e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read cache file, starting fresh: {}", e);
                None
            }
        }
    }

    /// Save to the file this cache was loaded from
    pub fn save(&self) -> ApiResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;

        log::debug!("Saved card cache with {} entries", self.cards.len());
        Ok(())
    }

    pub fn get(&self, card_id: &str) -> Option<&CardDetails> {
        self.cards.get(card_id)
    }

    pub fn insert(&mut self, card_id: &str, card: CardDetails) {
        self.cards.insert(card_id.to_string(), card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Fetch a card's catalog entry, checking the cache first
pub async fn fetch_card_cached(
    cache: &mut CardCache,
    api: &ScannerApi,
    card_id: &str,
) -> ApiResult<CardDetails> {
    if let Some(card) = cache.get(card_id) {
        log::info!("Cache hit for {}", card_id);
        return Ok(card.clone());
    }

    log::info!("Cache miss for {}, fetching from API", card_id);
    let card = api.get_card(card_id).await?;

    cache.insert(card_id, card.clone());
    if let Err(e) = cache.save() {
        log::warn!("Failed to save cache: {}", e);
    }

    Ok(card)
}

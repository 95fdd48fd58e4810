//! Client for the card recognition and collection storage API.
//!
//! Every endpoint returns a typed payload; `success: false`, non-2xx statuses
//! and malformed bodies all surface as distinct [`ApiError`] variants.

mod collection;
mod response;
mod scan;
mod users;

use std::time::Duration;

use reqwest::{Client, RequestBuilder};

use crate::config::Config;
use crate::error::ApiResult;

pub use collection::{AddAction, AddOutcome, CollectionResponse};
pub use scan::{
    BestMatch, CardLookup, FailedCard, MultiScanResponse, ProcessImages, ScanResponse,
    NO_CARDS_DETECTED,
};
pub use users::NewUser;

const USER_AGENT: &str = "Pokemon-Scanner/1.0";

/// Remote API client. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ScannerApi {
    pub(crate) client: Client,
    pub(crate) base_url: String,
}

impl ScannerApi {
    /// Creates a client for the API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = crate::config::normalize_api_url(&base_url.into());
        log::info!("Creating scanner API client for {}", base_url);
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Creates a client with the configured base URL and request timeout.
    pub fn from_config(config: &Config) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        log::info!("Creating scanner API client for {}", config.api_url);
        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        log::debug!("GET {}", url);
        self.client.get(url).header("User-Agent", USER_AGENT)
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        log::debug!("POST {}", url);
        self.client.post(url).header("User-Agent", USER_AGENT)
    }
}

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;

//! Currency list API client
//!
//! Fetches the code -> name mapping from Open Exchange Rates, removes the
//! codes the rate API does not quote, and caches the result on disk.

use std::collections::BTreeMap;

use chrono::Duration;
use reqwest::Client;
use thiserror::Error;

use super::{http_client, Currency};
use crate::cache::DiskCache;

/// Time-to-live for the currency list cache entry in hours
const CACHE_TTL_HOURS: i64 = 24;

/// Cache key for the currency list
const CACHE_KEY: &str = "currencies";

/// Endpoint listing every known currency code and its name
const CURRENCIES_URL: &str = "https://openexchangerates.org/api/currencies.json";

/// Codes listed by the currency endpoint but never quoted by the rate API:
/// precious metals, crypto, offshore and retired codes.
pub const EXCLUDED_CODES: &[&str] = &[
    "BTC", "CLF", "CNH", "CUC", "MRO", "SSP", "STD", "SVC", "VEF", "XAG", "XAU", "XPD", "XPT",
];

/// Errors that can occur when fetching the currency list
#[derive(Debug, Error)]
pub enum CurrencyListError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Currency API returned status {0}")]
    Status(u16),

    /// Failed to parse API response
    #[error("Failed to parse currency list: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Client for fetching the list of selectable currencies
#[derive(Debug, Clone)]
pub struct CurrencyListClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Disk cache for the last good list
    cache: Option<DiskCache>,
    /// URL of the currency list (allows override for testing)
    url: String,
}

impl CurrencyListClient {
    /// Creates a new CurrencyListClient with the default XDG cache
    pub fn new() -> Self {
        Self {
            http_client: http_client(),
            cache: DiskCache::new(),
            url: CURRENCIES_URL.to_string(),
        }
    }

    /// Creates a new CurrencyListClient with a custom cache
    pub fn with_cache(cache: DiskCache) -> Self {
        Self {
            cache: Some(cache),
            ..Self::new()
        }
    }

    /// Creates a client that never reads or writes the disk cache
    pub fn without_cache() -> Self {
        Self {
            cache: None,
            ..Self::new()
        }
    }

    /// Points the client at a different currency list URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Fetches the selectable currencies, sorted by code
    ///
    /// # Behavior
    /// - Returns fresh cached data without touching the network
    /// - Otherwise fetches from the API and refreshes the cache
    /// - On API failure, falls back to expired cache data if any exists
    pub async fn fetch_currencies(&self) -> Result<Vec<Currency>, CurrencyListError> {
        let cached = self
            .cache
            .as_ref()
            .and_then(|cache| cache.load::<Vec<Currency>>(CACHE_KEY));
        let stale = match cached {
            Some(cached) if !cached.stale => {
                tracing::debug!(count = cached.value.len(), "currency list served from cache");
                return Ok(cached.value);
            }
            other => other,
        };

        match self.fetch_from_api().await {
            Ok(currencies) => {
                if let Some(ref cache) = self.cache {
                    let ttl = Duration::hours(CACHE_TTL_HOURS);
                    if let Err(e) = cache.store(CACHE_KEY, &currencies, ttl) {
                        tracing::warn!(error = %e, "failed to cache currency list");
                    }
                }
                Ok(currencies)
            }
            Err(api_error) => match stale {
                Some(cached) => {
                    tracing::warn!(error = %api_error, "currency API failed, using stale cache");
                    Ok(cached.value)
                }
                None => Err(api_error),
            },
        }
    }

    /// Fetches the currency list directly from the API
    async fn fetch_from_api(&self) -> Result<Vec<Currency>, CurrencyListError> {
        let response = self.http_client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CurrencyListError::Status(status.as_u16()));
        }
        let text = response.text().await?;
        parse_currency_list(&text)
    }
}

impl Default for CurrencyListClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Shapes a `{ "CODE": "Name", ... }` body into an ordered, filtered list
pub fn parse_currency_list(body: &str) -> Result<Vec<Currency>, CurrencyListError> {
    let raw: BTreeMap<String, String> = serde_json::from_str(body)?;
    Ok(raw
        .into_iter()
        .filter(|(code, _)| !EXCLUDED_CODES.contains(&code.as_str()))
        .map(|(code, name)| Currency { code, name })
        .collect())
}

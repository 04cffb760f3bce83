//! Exchange rate API client
//!
//! Fetches the latest rate table for a base currency from exchangerate-api.com
//! and parses it into a `RateTable`.

use std::collections::HashMap;
use std::future::Future;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::{http_client, RateTable};

/// Base URL for the exchange rate API; the base currency code is appended
const EXCHANGE_RATE_BASE_URL: &str = "https://api.exchangerate-api.com/v4/latest";

/// Errors that can occur when fetching a rate table
#[derive(Debug, Error)]
pub enum RateFetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Rate API returned status {0}")]
    Status(u16),

    /// Failed to parse JSON response
    #[error("Failed to parse rate response: {0}")]
    Parse(#[from] serde_json::Error),

    /// No base currency selected, so there is nothing to fetch
    #[error("No base currency selected")]
    NoBaseCurrency,
}

/// Anything that can produce a rate table for a base currency code
pub trait RateSource {
    /// Fetches the full rate table for `base`
    fn fetch_rates(&self, base: &str) -> impl Future<Output = Result<RateTable, RateFetchError>> + Send;
}

/// Body of a `/latest/{BASE}` response; fields we do not use are ignored
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: HashMap<String, f64>,
}

/// Client for fetching rate tables from the exchange rate API
#[derive(Debug, Clone)]
pub struct RatesClient {
    client: Client,
    base_url: String,
}

impl Default for RatesClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RatesClient {
    /// Create a new RatesClient pointed at the public API
    pub fn new() -> Self {
        Self {
            client: http_client(),
            base_url: EXCHANGE_RATE_BASE_URL.to_string(),
        }
    }

    /// Create a RatesClient against a different endpoint (mirrors, tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: http_client(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// URL of the rate table for a base currency
    fn latest_url(&self, base: &str) -> String {
        format!("{}/{}", self.base_url, base)
    }

    /// Fetch the latest rate table for `base`
    ///
    /// # Returns
    /// * `Ok(RateTable)` - The full table, stamped with the fetch time
    /// * `Err(RateFetchError)` - On transport failure, non-2xx status or a malformed body
    pub async fn fetch_latest(&self, base: &str) -> Result<RateTable, RateFetchError> {
        let url = self.latest_url(base);
        tracing::debug!(%url, "fetching rate table");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RateFetchError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        parse_rates(base, &text)
    }
}

impl RateSource for RatesClient {
    fn fetch_rates(&self, base: &str) -> impl Future<Output = Result<RateTable, RateFetchError>> + Send {
        self.fetch_latest(base)
    }
}

/// Parse a `/latest` response body into a rate table for `base`
pub fn parse_rates(base: &str, body: &str) -> Result<RateTable, RateFetchError> {
    let response: LatestRatesResponse = serde_json::from_str(body)?;
    Ok(RateTable::new(base, response.rates))
}

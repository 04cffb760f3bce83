//! Core data models for fxconvert
//!
//! This module contains the currency and rate-table types shared by the
//! session, the UI and the two HTTP clients.

pub mod currencies;
pub mod rates;

pub use currencies::{CurrencyListClient, CurrencyListError};
pub use rates::{RateFetchError, RateSource, RatesClient};

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Requests that run longer than this fail as transport errors
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client shared by both API clients
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_default()
}

/// A currency the user can convert from or to
///
/// Identified by its ISO 4217 `code`; two currencies with the same code are
/// the same currency regardless of display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    /// Three-letter currency code, e.g. "GBP"
    pub code: String,
    /// Human-readable name, e.g. "British Pound Sterling"
    pub name: String,
}

impl Currency {
    /// Creates a new currency
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Text shown in pickers and matched against search queries
    pub fn search_name(&self) -> String {
        format!("{} {}", self.code, self.name)
    }

    /// Case-insensitive substring match on the search name
    pub fn matches(&self, query: &str) -> bool {
        self.search_name()
            .to_lowercase()
            .contains(&query.trim().to_lowercase())
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Currency {}

/// Exchange rates for every quoted currency relative to one base currency
///
/// Fetched and replaced as a unit; never partially updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    /// Code of the currency the rates are expressed against
    pub base: String,
    /// Units of each currency per one unit of `base`
    pub rates: HashMap<String, f64>,
    /// When this table was fetched
    pub fetched_at: DateTime<Utc>,
}

impl RateTable {
    /// Creates a rate table stamped with the current time
    pub fn new(base: impl Into<String>, rates: HashMap<String, f64>) -> Self {
        Self {
            base: base.into(),
            rates,
            fetched_at: Utc::now(),
        }
    }

    /// Fetch time as shown next to a conversion, e.g. "14:05:09 UTC"
    pub fn fetched_label(&self) -> String {
        self.fetched_at.format("%H:%M:%S UTC").to_string()
    }

    /// Looks up the rate for a currency code
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }
}

/// Preferred initial base currency
pub const DEFAULT_BASE: &str = "GBP";

/// Preferred initial counter currency
pub const DEFAULT_COUNTER: &str = "EUR";

/// Finds a currency in the list by code
pub fn find_currency<'a>(currencies: &'a [Currency], code: &str) -> Option<&'a Currency> {
    currencies.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

/// Picks the initial base/counter pair for a freshly loaded list
///
/// GBP and EUR when present, otherwise the first and second entries.
pub fn default_pair(currencies: &[Currency]) -> (Option<Currency>, Option<Currency>) {
    let base = find_currency(currencies, DEFAULT_BASE)
        .or_else(|| currencies.first())
        .cloned();
    let counter = find_currency(currencies, DEFAULT_COUNTER)
        .or_else(|| currencies.get(1))
        .cloned();
    (base, counter)
}

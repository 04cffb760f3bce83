//! Conversion session state
//!
//! `ConversionSession` holds the selected currency pair, the amount, the last
//! fetched rate table and the captured conversion rate, and derives the
//! sentence shown to the user. A captured rate stays on screen until its
//! countdown runs out or the user edits any input.

use tracing::{debug, info, warn};

use crate::countdown::{format_countdown, Countdown, TickOutcome, DEFAULT_EXPIRY_SECS};
use crate::data::{Currency, RateFetchError, RateSource, RateTable};

/// Amount pre-filled when the converter opens
pub const DEFAULT_AMOUNT: f64 = 100.0;

/// Whether a conversion is currently on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayState {
    /// No conversion shown
    #[default]
    Idle,
    /// Conversion shown with the countdown running
    Active,
}

/// Which fetch failed; both are reported to the user the same way
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The currency list could not be loaded
    CurrencyList,
    /// The rate table could not be loaded
    Rates,
}

/// Mutable state behind the converter screen
///
/// Fields are only reachable through the operations below so that the
/// display can never show a rate that does not match the current inputs.
#[derive(Debug, Clone)]
pub struct ConversionSession {
    base: Option<Currency>,
    counter: Option<Currency>,
    amount: f64,
    rate_table: Option<RateTable>,
    conversion_rate: Option<f64>,
    countdown: Countdown,
    display: DisplayState,
    error: Option<FetchErrorKind>,
    in_flight: usize,
    precision: usize,
    expiry_secs: u32,
}

impl Default for ConversionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionSession {
    /// Creates a session with no currencies selected
    pub fn new() -> Self {
        Self {
            base: None,
            counter: None,
            amount: DEFAULT_AMOUNT,
            rate_table: None,
            conversion_rate: None,
            countdown: Countdown::new(),
            display: DisplayState::Idle,
            error: None,
            in_flight: 0,
            precision: 0,
            expiry_secs: DEFAULT_EXPIRY_SECS,
        }
    }

    /// Number of decimal places in the converted amount
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Seconds a conversion stays on screen after `convert`
    pub fn with_expiry_secs(mut self, expiry_secs: u32) -> Self {
        self.expiry_secs = expiry_secs.max(1);
        self
    }

    /// Seconds each conversion stays on screen
    pub fn expiry_secs(&self) -> u32 {
        self.expiry_secs
    }

    pub fn base(&self) -> Option<&Currency> {
        self.base.as_ref()
    }

    pub fn counter(&self) -> Option<&Currency> {
        self.counter.as_ref()
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn rate_table(&self) -> Option<&RateTable> {
        self.rate_table.as_ref()
    }

    pub fn conversion_rate(&self) -> Option<f64> {
        self.conversion_rate
    }

    pub fn seconds_remaining(&self) -> Option<u32> {
        self.countdown.remaining()
    }

    pub fn state(&self) -> DisplayState {
        self.display
    }

    pub fn error(&self) -> Option<FetchErrorKind> {
        self.error
    }

    /// Whether a rate request is outstanding
    pub fn is_fetching(&self) -> bool {
        self.in_flight > 0
    }

    /// Whether the conversion sentence and countdown are shown
    pub fn is_visible(&self) -> bool {
        self.display == DisplayState::Active
            && self.conversion_rate.is_some()
            && self.base.is_some()
            && self.counter.is_some()
            && self.countdown.is_running()
    }

    /// Drops any shown conversion and its countdown
    fn go_idle(&mut self) {
        self.display = DisplayState::Idle;
        self.conversion_rate = None;
        self.countdown.stop();
    }

    /// Stores a new amount; the shown conversion becomes stale
    ///
    /// Any number is accepted. NaN or infinite amounts simply produce no
    /// display string.
    pub fn set_amount(&mut self, amount: f64) {
        self.amount = amount;
        self.go_idle();
    }

    /// Selects the currency to convert from
    pub fn set_base_currency(&mut self, currency: Currency) {
        self.base = Some(currency);
        self.go_idle();
    }

    /// Selects the currency to convert to
    pub fn set_counter_currency(&mut self, currency: Currency) {
        self.counter = Some(currency);
        self.go_idle();
    }

    /// Exchanges base and counter, discarding the rate table fetched for the old base
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.base, &mut self.counter);
        self.rate_table = None;
        self.go_idle();
    }

    /// Marks a rate request as started and returns the base code to request
    ///
    /// Returns `None` when no base currency is selected.
    pub fn begin_fetch(&mut self) -> Option<String> {
        let code = self.base.as_ref()?.code.clone();
        self.in_flight += 1;
        self.error = None;
        Some(code)
    }

    /// Applies the outcome of a rate request started with `begin_fetch`
    ///
    /// On success the rate table is replaced wholesale. On failure the error
    /// flag is set and the previous table is kept. A table for a base that is
    /// no longer selected is dropped.
    pub fn finish_fetch(
        &mut self,
        base: &str,
        result: Result<RateTable, RateFetchError>,
    ) -> Result<(), RateFetchError> {
        self.in_flight = self.in_flight.saturating_sub(1);

        match result {
            Ok(table) => {
                if self.base.as_ref().map(|c| c.code.as_str()) != Some(base) {
                    debug!(base, "dropping rate table for deselected base");
                    return Ok(());
                }
                info!(base, quotes = table.rates.len(), "rate table updated");
                self.rate_table = Some(table);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(base, error = %e, "rate fetch failed");
                self.error = Some(FetchErrorKind::Rates);
                Err(e)
            }
        }
    }

    /// Fetches the rate table for the selected base currency
    pub async fn fetch_rates<S: RateSource>(&mut self, source: &S) -> Result<(), RateFetchError> {
        let base = self.begin_fetch().ok_or(RateFetchError::NoBaseCurrency)?;
        let result = source.fetch_rates(&base).await;
        self.finish_fetch(&base, result)
    }

    /// Records a failed fetch that happened outside the session (currency list)
    pub fn record_error(&mut self, kind: FetchErrorKind) {
        self.error = Some(kind);
    }

    /// Captures the rate for the counter currency and starts the countdown
    ///
    /// Does nothing and returns `false` unless a rate table for the current
    /// base is loaded and quotes the counter currency.
    pub fn convert(&mut self) -> bool {
        let (Some(table), Some(counter)) = (&self.rate_table, &self.counter) else {
            return false;
        };
        if let Some(base) = &self.base {
            if table.base != base.code {
                return false;
            }
        }
        let Some(rate) = table.rate(&counter.code) else {
            debug!(counter = %counter.code, "rate table has no quote for counter currency");
            return false;
        };

        info!(counter = %counter.code, rate, "conversion captured");
        self.conversion_rate = Some(rate);
        self.countdown.start(self.expiry_secs);
        self.display = DisplayState::Active;
        true
    }

    /// Advances the countdown by one second
    ///
    /// Reaching zero hides the conversion. Ticks while idle change nothing.
    pub fn tick(&mut self) -> TickOutcome {
        if self.display != DisplayState::Active {
            return TickOutcome::Idle;
        }
        let outcome = self.countdown.tick();
        if outcome == TickOutcome::Expired {
            info!("conversion expired");
            self.display = DisplayState::Idle;
        }
        outcome
    }

    /// The sentence describing the current conversion, if one is shown
    pub fn display_string(&self) -> Option<String> {
        if !self.is_visible() {
            return None;
        }
        let base = self.base.as_ref()?;
        let counter = self.counter.as_ref()?;
        let rate = self.conversion_rate?;

        let converted = self.amount * rate;
        if !self.amount.is_finite() || !converted.is_finite() {
            return None;
        }

        Some(format!(
            "{} {} is equivalent to {:.prec$} {}",
            self.amount,
            base.code,
            round_half_away(converted, self.precision),
            counter.code,
            prec = self.precision
        ))
    }

    /// Remaining time as `m:ss` while a conversion is shown
    pub fn countdown_label(&self) -> Option<String> {
        if !self.is_visible() {
            return None;
        }
        self.seconds_remaining().map(format_countdown)
    }
}

/// Rounds to `precision` decimals with ties away from zero
///
/// `format!` alone rounds exact ties to even, so 2.5 would print as "2".
fn round_half_away(value: f64, precision: usize) -> f64 {
    let factor = 10f64.powi(precision.min(i32::MAX as usize) as i32);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}

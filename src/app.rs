//! Application state management for fxconvert
//!
//! This module contains the main application state: keyboard handling, the
//! background fetch channel and the countdown ticker around a
//! `ConversionSession`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::cache::DiskCache;
use crate::cli::StartupConfig;
use crate::countdown::{TickOutcome, Ticker};
use crate::data::{
    default_pair, find_currency, Currency, CurrencyListClient, CurrencyListError, RateFetchError,
    RateTable, RatesClient,
};
use crate::picker::{CurrencyPicker, PickerSide};
use crate::session::{ConversionSession, FetchErrorKind};

/// Application state enum representing the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Initial loading state while fetching the currency list
    Loading,
    /// Converter screen
    Converter,
    /// Currency picker overlay open over the converter
    Picking,
}

/// Results delivered from background tasks to the main loop
#[derive(Debug)]
pub enum AppMessage {
    /// A rate request started for `base` finished
    RatesFetched {
        base: String,
        result: Result<RateTable, RateFetchError>,
    },
    /// The currency list request finished
    CurrenciesLoaded(Result<Vec<Currency>, CurrencyListError>),
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the user asked for a conversion
    pub convert_requested: bool,
    /// Currency selection, rates and countdown
    session: ConversionSession,
    /// Currencies offered by the pickers, sorted by code
    currencies: Vec<Currency>,
    /// Raw text of the amount field
    amount_input: String,
    /// Open picker, if any
    picker: Option<CurrencyPicker>,
    /// Convert as soon as the in-flight rate request lands
    convert_on_arrival: bool,
    /// Codes requested on the command line
    preferred_base: Option<String>,
    preferred_counter: Option<String>,
    /// Runs while a conversion is shown
    ticker: Option<Ticker>,
    rates_client: RatesClient,
    currency_client: CurrencyListClient,
    message_tx: mpsc::Sender<AppMessage>,
    message_rx: mpsc::Receiver<AppMessage>,
}

impl App {
    /// Creates a new App from the startup configuration
    pub fn new(config: StartupConfig) -> Self {
        let currency_client = if config.use_cache {
            DiskCache::new()
                .map(CurrencyListClient::with_cache)
                .unwrap_or_else(CurrencyListClient::without_cache)
        } else {
            CurrencyListClient::without_cache()
        };
        Self::with_clients(config, RatesClient::new(), currency_client)
    }

    /// Creates a new App with custom clients
    pub fn with_clients(
        config: StartupConfig,
        rates_client: RatesClient,
        currency_client: CurrencyListClient,
    ) -> Self {
        let (message_tx, message_rx) = mpsc::channel(16);
        let mut session = ConversionSession::new()
            .with_precision(config.precision)
            .with_expiry_secs(config.expiry_secs);
        session.set_amount(config.amount);

        Self {
            state: AppState::Loading,
            should_quit: false,
            show_help: false,
            convert_requested: false,
            session,
            currencies: Vec::new(),
            amount_input: config.amount.to_string(),
            picker: None,
            convert_on_arrival: false,
            preferred_base: config.base,
            preferred_counter: config.counter,
            ticker: None,
            rates_client,
            currency_client,
            message_tx,
            message_rx,
        }
    }

    pub fn session(&self) -> &ConversionSession {
        &self.session
    }

    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    pub fn amount_input(&self) -> &str {
        &self.amount_input
    }

    pub fn picker(&self) -> Option<&CurrencyPicker> {
        self.picker.as_ref()
    }

    /// Whether the countdown ticker task is running
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Fetches the currency list on a background task
    ///
    /// The app stays in `Loading` until the result arrives through
    /// `process_messages`.
    pub fn start_loading(&self) {
        let client = self.currency_client.clone();
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let result = client.fetch_currencies().await;
            let _ = tx.send(AppMessage::CurrenciesLoaded(result)).await;
        });
    }

    /// Installs a loaded currency list and the initial pair
    ///
    /// Command-line codes win when the list contains them; otherwise GBP/EUR
    /// or the first two entries. A failed load leaves the list empty and
    /// raises the error flag.
    pub fn apply_currencies(&mut self, result: Result<Vec<Currency>, CurrencyListError>) {
        match result {
            Ok(currencies) => {
                tracing::info!(count = currencies.len(), "currency list loaded");
                let (default_base, default_counter) = default_pair(&currencies);
                let base = self
                    .preferred_base
                    .as_deref()
                    .and_then(|code| find_currency(&currencies, code).cloned())
                    .or(default_base);
                let counter = self
                    .preferred_counter
                    .as_deref()
                    .and_then(|code| find_currency(&currencies, code).cloned())
                    .or(default_counter);

                if let Some(base) = base {
                    self.session.set_base_currency(base);
                }
                if let Some(counter) = counter {
                    self.session.set_counter_currency(counter);
                }
                self.currencies = currencies;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load currency list");
                self.session.record_error(FetchErrorKind::CurrencyList);
            }
        }
        self.state = AppState::Converter;
    }

    /// Starts a rate request for the selected base on a background task
    ///
    /// The table is converted as soon as it arrives.
    pub fn start_conversion(&mut self) {
        self.convert_requested = false;
        let Some(base) = self.session.begin_fetch() else {
            return;
        };
        self.convert_on_arrival = true;

        let client = self.rates_client.clone();
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let result = client.fetch_latest(&base).await;
            let _ = tx.send(AppMessage::RatesFetched { base, result }).await;
        });
    }

    /// Applies a background result
    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::RatesFetched { base, result } => {
                let succeeded = self.session.finish_fetch(&base, result).is_ok();
                if succeeded && self.convert_on_arrival && self.session.convert() {
                    self.ticker = Some(Ticker::every_second());
                }
                if !self.session.is_fetching() {
                    self.convert_on_arrival = false;
                }
            }
            AppMessage::CurrenciesLoaded(result) => self.apply_currencies(result),
        }
        self.sync_ticker();
    }

    /// Drains pending background results without blocking
    pub fn process_messages(&mut self) {
        while let Ok(message) = self.message_rx.try_recv() {
            self.handle_message(message);
        }
    }

    /// Applies ticks delivered since the last call
    pub fn process_ticks(&mut self) {
        let ticks = self.ticker.as_mut().map(Ticker::drain).unwrap_or(0);
        for _ in 0..ticks {
            if self.session.tick() == TickOutcome::Expired {
                break;
            }
        }
        self.sync_ticker();
    }

    /// Cancels the ticker once nothing is on screen
    fn sync_ticker(&mut self) {
        if !self.session.is_visible() {
            self.ticker = None;
        }
    }

    /// Stops background work before the app goes away
    pub fn shutdown(&mut self) {
        self.ticker = None;
    }

    /// Re-parses the amount field into the session
    ///
    /// Text that is not a number becomes NaN, which suppresses the display.
    fn update_amount(&mut self) {
        let amount = self.amount_input.trim().parse::<f64>().unwrap_or(f64::NAN);
        self.session.set_amount(amount);
    }

    fn open_picker(&mut self, side: PickerSide) {
        let current = match side {
            PickerSide::Base => self.session.base(),
            PickerSide::Counter => self.session.counter(),
        };
        self.picker = Some(CurrencyPicker::open(side, &self.currencies, current));
        self.state = AppState::Picking;
    }

    fn close_picker(&mut self) {
        self.picker = None;
        self.state = AppState::Converter;
    }

    fn confirm_picker(&mut self) {
        let Some(picker) = self.picker.as_ref() else {
            return;
        };
        let side = picker.side;
        let Some(currency) = picker.selection(&self.currencies).cloned() else {
            return;
        };
        match side {
            PickerSide::Base => self.session.set_base_currency(currency),
            PickerSide::Counter => self.session.set_counter_currency(currency),
        }
        self.close_picker();
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `0`-`9`, `.`, `-`, Backspace: Edit the amount
    /// - `b` / `c`: Pick the base / counter currency
    /// - `s`: Swap base and counter
    /// - `Enter`: Fetch rates and convert
    /// - `?`: Toggle help
    /// - `q` or `Esc`: Quit
    /// - In the picker: type to filter, `Up`/`Down` to move, `Enter` to choose, `Esc` to cancel
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            self.should_quit = true;
            return;
        }

        // Help overlay intercepts all keys when shown
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        match self.state {
            AppState::Loading => {
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::Converter => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
                    self.amount_input.push(c);
                    self.update_amount();
                }
                KeyCode::Backspace => {
                    self.amount_input.pop();
                    self.update_amount();
                }
                KeyCode::Char('b') => self.open_picker(PickerSide::Base),
                KeyCode::Char('c') => self.open_picker(PickerSide::Counter),
                KeyCode::Char('s') => self.session.swap(),
                KeyCode::Enter => {
                    self.convert_requested = true;
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
            AppState::Picking => {
                let Some(picker) = self.picker.as_mut() else {
                    self.state = AppState::Converter;
                    return;
                };
                match key_event.code {
                    KeyCode::Esc => self.close_picker(),
                    KeyCode::Enter => self.confirm_picker(),
                    KeyCode::Up => picker.move_up(&self.currencies),
                    KeyCode::Down => picker.move_down(&self.currencies),
                    KeyCode::Backspace => picker.pop_char(),
                    KeyCode::Char(c) => picker.push_char(c),
                    _ => {}
                }
            }
        }

        self.sync_ticker();
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}

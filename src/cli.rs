//! Command-line interface parsing for fxconvert
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a validated `StartupConfig`.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::countdown::DEFAULT_EXPIRY_SECS;
use crate::session::DEFAULT_AMOUNT;

/// Largest number of decimal places accepted for the converted amount
pub const MAX_PRECISION: usize = 8;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The currency code is not three ASCII letters
    #[error("Invalid currency code: '{0}'. Expected a three-letter code such as USD")]
    InvalidCurrencyCode(String),

    /// A zero expiry would hide every conversion immediately
    #[error("Expiry must be at least one second")]
    ZeroExpiry,

    /// Too many decimal places requested
    #[error("Precision {0} is out of range (0-8)")]
    PrecisionOutOfRange(usize),
}

/// fxconvert - Convert currencies at live exchange rates
#[derive(Parser, Debug)]
#[command(name = "fxconvert")]
#[command(about = "Terminal currency converter with live exchange rates")]
#[command(version)]
pub struct Cli {
    /// Currency to convert from (defaults to GBP)
    #[arg(long, value_name = "CODE")]
    pub base: Option<String>,

    /// Currency to convert to (defaults to EUR)
    #[arg(long, value_name = "CODE")]
    pub counter: Option<String>,

    /// Amount pre-filled in the converter
    #[arg(long, default_value_t = DEFAULT_AMOUNT, allow_negative_numbers = true)]
    pub amount: f64,

    /// Decimal places shown in the converted amount
    #[arg(long, default_value_t = 0)]
    pub precision: usize,

    /// Seconds a conversion stays valid before it is hidden
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_EXPIRY_SECS)]
    pub expiry: u32,

    /// Do not read or write the on-disk currency list cache
    #[arg(long)]
    pub no_cache: bool,

    /// Write logs to this file instead of the cache directory
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log filter directive, e.g. "fxconvert=debug" (overrides RUST_LOG)
    #[arg(long, value_name = "DIRECTIVE")]
    pub log_level: Option<String>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq)]
pub struct StartupConfig {
    /// Base currency code to select once the list loads
    pub base: Option<String>,
    /// Counter currency code to select once the list loads
    pub counter: Option<String>,
    /// Initial amount
    pub amount: f64,
    /// Decimal places in the converted amount
    pub precision: usize,
    /// Lifetime of a conversion in seconds
    pub expiry_secs: u32,
    /// Whether the currency list cache is used
    pub use_cache: bool,
    /// Explicit log file path
    pub log_file: Option<PathBuf>,
    /// Explicit log filter directive
    pub log_level: Option<String>,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            base: None,
            counter: None,
            amount: DEFAULT_AMOUNT,
            precision: 0,
            expiry_secs: DEFAULT_EXPIRY_SECS,
            use_cache: true,
            log_file: None,
            log_level: None,
        }
    }
}

/// Validates a currency code argument and normalises it to upper case
///
/// # Returns
/// * `Ok(String)` if the argument is three ASCII letters
/// * `Err(CliError::InvalidCurrencyCode)` otherwise
pub fn parse_currency_code(s: &str) -> Result<String, CliError> {
    let code = s.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(CliError::InvalidCurrencyCode(s.to_string()))
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if a code, the expiry or the precision is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.expiry == 0 {
            return Err(CliError::ZeroExpiry);
        }
        if cli.precision > MAX_PRECISION {
            return Err(CliError::PrecisionOutOfRange(cli.precision));
        }

        Ok(StartupConfig {
            base: cli.base.as_deref().map(parse_currency_code).transpose()?,
            counter: cli.counter.as_deref().map(parse_currency_code).transpose()?,
            amount: cli.amount,
            precision: cli.precision,
            expiry_secs: cli.expiry,
            use_cache: !cli.no_cache,
            log_file: cli.log_file.clone(),
            log_level: cli.log_level.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_currency_code_normalises_case() {
        assert_eq!(parse_currency_code("usd").unwrap(), "USD");
        assert_eq!(parse_currency_code("Eur").unwrap(), "EUR");
        assert_eq!(parse_currency_code(" gbp ").unwrap(), "GBP");
    }

    #[test]
    fn test_parse_currency_code_invalid() {
        for bad in ["", "US", "USDT", "U5D", "€€€"] {
            let result = parse_currency_code(bad);
            assert!(result.is_err(), "{:?} should be rejected", bad);
        }
        let err = parse_currency_code("dollar").unwrap_err();
        assert!(err.to_string().contains("Invalid currency code"));
        assert!(err.to_string().contains("dollar"));
    }

    #[test]
    fn test_startup_config_default() {
        let config = StartupConfig::default();
        assert!(config.base.is_none());
        assert!(config.counter.is_none());
        assert_eq!(config.amount, 100.0);
        assert_eq!(config.precision, 0);
        assert_eq!(config.expiry_secs, 600);
        assert!(config.use_cache);
    }

    #[test]
    fn test_cli_parse_no_args_matches_default_config() {
        let cli = Cli::parse_from(["fxconvert"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config, StartupConfig::default());
    }

    #[test]
    fn test_cli_parse_pair_and_amount() {
        let cli = Cli::parse_from([
            "fxconvert", "--base", "usd", "--counter", "jpy", "--amount", "2.5",
        ]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.base.as_deref(), Some("USD"));
        assert_eq!(config.counter.as_deref(), Some("JPY"));
        assert_eq!(config.amount, 2.5);
    }

    #[test]
    fn test_cli_parse_negative_amount() {
        let cli = Cli::parse_from(["fxconvert", "--amount", "-20"]);
        assert_eq!(cli.amount, -20.0);
    }

    #[test]
    fn test_cli_parse_flags() {
        let cli = Cli::parse_from([
            "fxconvert",
            "--no-cache",
            "--precision",
            "2",
            "--expiry",
            "30",
            "--log-level",
            "fxconvert=debug",
        ]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert!(!config.use_cache);
        assert_eq!(config.precision, 2);
        assert_eq!(config.expiry_secs, 30);
        assert_eq!(config.log_level.as_deref(), Some("fxconvert=debug"));
    }

    #[test]
    fn test_startup_config_rejects_invalid_code() {
        let cli = Cli::parse_from(["fxconvert", "--counter", "euro"]);
        let result = StartupConfig::from_cli(&cli);
        assert!(matches!(result, Err(CliError::InvalidCurrencyCode(_))));
    }

    #[test]
    fn test_startup_config_rejects_zero_expiry() {
        let cli = Cli::parse_from(["fxconvert", "--expiry", "0"]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(CliError::ZeroExpiry)
        ));
    }

    #[test]
    fn test_startup_config_rejects_large_precision() {
        let cli = Cli::parse_from(["fxconvert", "--precision", "12"]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(CliError::PrecisionOutOfRange(12))
        ));
    }
}

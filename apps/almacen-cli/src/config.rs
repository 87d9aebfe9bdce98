//! # Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--db`, `--tax-rate`)
//! 2. Environment variables (`ALMACEN_*`)
//! 3. Defaults (this file)
//!
//! Configuration is read-only after startup.

use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::warn;

use almacen_core::{Money, TaxRate};

/// File name of the store database inside the data directory.
pub const DATABASE_FILE_NAME: &str = "almacen.db";

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// SQLite database file.
    pub db_path: PathBuf,

    /// Tax applied to cart subtotals.
    pub tax_rate: TaxRate,

    /// Store name (printed on receipts)
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,
}

impl Default for AppConfig {
    /// ## Default Values
    /// - Database: `almacen.db` in the platform data directory
    /// - Tax: 16%
    /// - Currency: `$`
    fn default() -> Self {
        AppConfig {
            db_path: default_database_path(),
            tax_rate: TaxRate::default(),
            store_name: "Almacen".to_string(),
            currency_symbol: "$".to_string(),
        }
    }
}

impl AppConfig {
    /// Creates a config from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `ALMACEN_DB_PATH`: database file
    /// - `ALMACEN_TAX_RATE`: tax percentage (e.g., "16" or "8.25")
    /// - `ALMACEN_STORE_NAME`: store name
    /// - `ALMACEN_CURRENCY_SYMBOL`: currency symbol
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = AppConfig::default();

        if let Ok(path) = std::env::var("ALMACEN_DB_PATH") {
            if !path.trim().is_empty() {
                config.db_path = PathBuf::from(path);
            }
        }

        if let Ok(rate) = std::env::var("ALMACEN_TAX_RATE") {
            match parse_tax_percentage(&rate) {
                Ok(rate) => config.tax_rate = rate,
                Err(reason) => warn!(value = %rate, "Ignoring ALMACEN_TAX_RATE: {}", reason),
            }
        }

        if let Ok(store_name) = std::env::var("ALMACEN_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Ok(symbol) = std::env::var("ALMACEN_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        config
    }

    /// Formats an amount with the configured symbol.
    ///
    /// ```rust,ignore
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.cents();
        let whole = (cents / 100).abs();
        let frac = (cents % 100).abs();

        format!(
            "{}{}{}.{:02}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            whole,
            frac
        )
    }
}

/// Parses a tax percentage such as `"16"` or `"8.25"`.
///
/// Used for both `ALMACEN_TAX_RATE` and the `--tax-rate` flag.
pub fn parse_tax_percentage(input: &str) -> Result<TaxRate, String> {
    let pct: f64 = input
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a percentage", input.trim()))?;

    if !(0.0..=100.0).contains(&pct) {
        return Err(format!("{} is outside 0..=100", pct));
    }

    Ok(TaxRate::from_percentage(pct))
}

/// Returns `almacen.db` inside the platform data directory.
///
/// ## Platform Paths
/// - Linux: `~/.local/share/almacen/almacen.db`
/// - macOS: `~/Library/Application Support/com.almacen.pos/almacen.db`
/// - Windows: `C:\Users\<user>\AppData\Roaming\almacen\pos\data\almacen.db`
///
/// Falls back to the working directory when no home directory is known.
pub fn default_database_path() -> PathBuf {
    match ProjectDirs::from("com", "almacen", "pos") {
        Some(dirs) => dirs.data_dir().join(DATABASE_FILE_NAME),
        None => PathBuf::from(DATABASE_FILE_NAME),
    }
}

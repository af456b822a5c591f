//! Store Settings

use jiff::tz::TimeZone;
use rusty_money::{Findable, iso::Currency};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreSettingsError {
    #[error("unknown currency code {0}")]
    UnknownCurrency(String),

    #[error("unknown time zone {0}")]
    UnknownTimeZone(String, #[source] jiff::Error),
}

/// Per-deployment store settings: prices are in `currency` and discount windows are read as
/// wall clock times in `time_zone`.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub currency: &'static Currency,
    pub time_zone: TimeZone,
}

impl StoreSettings {
    /// Resolve settings from an ISO 4217 code and an IANA time zone name.
    ///
    /// # Errors
    ///
    /// Returns an error if either name is unknown.
    pub fn from_names(currency: &str, time_zone: &str) -> Result<Self, StoreSettingsError> {
        let currency = Currency::find(&currency.to_ascii_uppercase())
            .ok_or_else(|| StoreSettingsError::UnknownCurrency(currency.to_string()))?;

        let time_zone = TimeZone::get(time_zone)
            .map_err(|error| StoreSettingsError::UnknownTimeZone(time_zone.to_string(), error))?;

        Ok(Self {
            currency,
            time_zone,
        })
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            currency: rusty_money::iso::USD,
            time_zone: TimeZone::UTC,
        }
    }
}

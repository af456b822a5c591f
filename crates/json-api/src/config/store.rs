//! Store Config

use clap::Args;
use tessera_app::settings::{StoreSettings, StoreSettingsError};

/// Store pricing and calendar settings.
#[derive(Debug, Args)]
pub struct StoreConfig {
    /// ISO 4217 currency cart prices and discount amounts are expressed in
    #[arg(long, env = "STORE_CURRENCY", default_value = "USD")]
    pub currency: String,

    /// IANA time zone discount start and end dates are read in
    #[arg(long, env = "STORE_TIME_ZONE", default_value = "UTC")]
    pub time_zone: String,
}

impl StoreConfig {
    /// Resolve the configured names.
    ///
    /// # Errors
    ///
    /// Returns an error if the currency or time zone is unknown.
    pub fn settings(&self) -> Result<StoreSettings, StoreSettingsError> {
        StoreSettings::from_names(&self.currency, &self.time_zone)
    }
}

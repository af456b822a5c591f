//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::discounts::{CatalogDiscountsService, DiscountsService, PgDiscountCatalog},
    settings::StoreSettings,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub discounts: Arc<dyn DiscountsService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        settings: StoreSettings,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let catalog = Arc::new(PgDiscountCatalog::new(Db::new(pool)));

        Ok(Self {
            discounts: Arc::new(CatalogDiscountsService::new(catalog, settings)),
        })
    }
}

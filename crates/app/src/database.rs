//! Database connection management

use sqlx::{PgPool, Postgres, Transaction, migrate::MigrateError, query};
use tessera::uuids::StoreId;

/// SQL used to set store context for row-level security.
pub const SET_STORE_CONTEXT_SQL: &str = "SELECT set_config('app.current_store_uuid', $1, true)";

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction and set store context for RLS policies.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting store context fails.
    pub async fn begin_store_transaction(
        &self,
        store: StoreId,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(SET_STORE_CONTEXT_SQL)
            .bind(store.to_string())
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Apply pending migrations.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

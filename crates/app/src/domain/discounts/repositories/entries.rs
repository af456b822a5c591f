//! Discount Entries Repository

use sqlx::{Postgres, Transaction, query_as};
use uuid::Uuid;

use crate::domain::discounts::records::{EligibilityEntryRow, ItemEntryRow};

const LIST_ELIGIBILITY_ENTRIES_SQL: &str = include_str!("sql/list_eligibility_entries.sql");
const LIST_ITEM_ENTRIES_SQL: &str = include_str!("sql/list_item_entries.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgEntriesRepository;

impl PgEntriesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_eligibility_entries(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        discounts: &[Uuid],
    ) -> Result<Vec<EligibilityEntryRow>, sqlx::Error> {
        query_as::<Postgres, EligibilityEntryRow>(LIST_ELIGIBILITY_ENTRIES_SQL)
            .bind(discounts)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_item_entries(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        discounts: &[Uuid],
    ) -> Result<Vec<ItemEntryRow>, sqlx::Error> {
        query_as::<Postgres, ItemEntryRow>(LIST_ITEM_ENTRIES_SQL)
            .bind(discounts)
            .fetch_all(&mut **tx)
            .await
    }
}

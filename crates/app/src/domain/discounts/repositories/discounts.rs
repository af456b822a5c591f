//! Discounts Repository

use sqlx::{Postgres, Transaction, query_as};
use tessera::{discounts::DiscountFamily, uuids::StoreId};

use crate::domain::discounts::records::DiscountRow;

const FIND_ACTIVE_AUTOMATIC_DISCOUNTS_SQL: &str =
    include_str!("sql/find_active_automatic_discounts.sql");
const FIND_ACTIVE_DISCOUNT_BY_CODE_SQL: &str =
    include_str!("sql/find_active_discount_by_code.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgDiscountsRepository;

impl PgDiscountsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_active_automatic(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        store: StoreId,
        family: DiscountFamily,
    ) -> Result<Vec<DiscountRow>, sqlx::Error> {
        query_as::<Postgres, DiscountRow>(FIND_ACTIVE_AUTOMATIC_DISCOUNTS_SQL)
            .bind(store.into_uuid())
            .bind(family.as_str())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn find_active_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        store: StoreId,
        family: DiscountFamily,
        code: &str,
    ) -> Result<Option<DiscountRow>, sqlx::Error> {
        query_as::<Postgres, DiscountRow>(FIND_ACTIVE_DISCOUNT_BY_CODE_SQL)
            .bind(store.into_uuid())
            .bind(family.as_str())
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }
}

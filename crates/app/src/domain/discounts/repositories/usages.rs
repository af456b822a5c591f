//! Discount Usages Repository
//!
//! The ledger write path. A reservation bumps the discount's counter only while it is under its
//! total-uses limit, and the usage insert carries the single-use customer column that the
//! `(discount_uuid, single_use_customer_uuid)` unique constraint guards. Both happen in the
//! caller's transaction.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};
use tessera::{
    evaluation::UsageSnapshot,
    uuids::{CustomerId, DiscountId, StoreId},
};

use crate::domain::discounts::{
    data::NewUsage,
    models::{UsageRecord, UsageSummary},
};

const USAGE_SNAPSHOT_SQL: &str = include_str!("sql/usage_snapshot.sql");
const USAGE_SUMMARY_SQL: &str = include_str!("sql/usage_summary.sql");
const RESERVE_DISCOUNT_USE_SQL: &str = include_str!("sql/reserve_discount_use.sql");
const DISCOUNT_EXISTS_SQL: &str = include_str!("sql/discount_exists.sql");
const CREATE_USAGE_SQL: &str = include_str!("sql/create_usage.sql");

/// Result of trying to take one use of a discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reservation {
    /// Counter bumped; `single_use` says whether the customer column must be set
    Reserved { single_use: bool },

    /// The discount is at its limit
    LimitReached,

    /// No such discount in this store
    Missing,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgUsagesRepository;

impl PgUsagesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn usage_snapshot(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        store: StoreId,
        discount: DiscountId,
        customer: CustomerId,
    ) -> Result<UsageSnapshot, sqlx::Error> {
        let (total_uses, used_by_customer): (i64, bool) = query_as(USAGE_SNAPSHOT_SQL)
            .bind(store.into_uuid())
            .bind(discount.into_uuid())
            .bind(customer.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(UsageSnapshot {
            total_uses: to_u64("total_uses", total_uses)?,
            used_by_customer,
        })
    }

    pub(crate) async fn usage_summary(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        store: StoreId,
        discount: DiscountId,
    ) -> Result<UsageSummary, sqlx::Error> {
        query_as::<Postgres, UsageSummary>(USAGE_SUMMARY_SQL)
            .bind(store.into_uuid())
            .bind(discount.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn reserve(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        store: StoreId,
        discount: DiscountId,
    ) -> Result<Reservation, sqlx::Error> {
        let single_use: Option<bool> = query_scalar(RESERVE_DISCOUNT_USE_SQL)
            .bind(store.into_uuid())
            .bind(discount.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        if let Some(single_use) = single_use {
            return Ok(Reservation::Reserved { single_use });
        }

        let exists: bool = query_scalar(DISCOUNT_EXISTS_SQL)
            .bind(store.into_uuid())
            .bind(discount.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(if exists {
            Reservation::LimitReached
        } else {
            Reservation::Missing
        })
    }

    pub(crate) async fn create_usage(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        usage: &NewUsage,
        discount_amount: u64,
        single_use: bool,
    ) -> Result<UsageRecord, sqlx::Error> {
        let amount_i64 =
            i64::try_from(discount_amount).map_err(|e| sqlx::Error::ColumnDecode {
                index: "discount_amount".to_string(),
                source: Box::new(e),
            })?;

        let created_at: SqlxTimestamp = query_scalar(CREATE_USAGE_SQL)
            .bind(usage.uuid.into_uuid())
            .bind(usage.store.into_uuid())
            .bind(usage.discount.into_uuid())
            .bind(usage.customer.into_uuid())
            .bind(usage.order.map(tessera::uuids::OrderId::into_uuid))
            .bind(amount_i64)
            .bind(single_use.then(|| usage.customer.into_uuid()))
            .fetch_one(&mut **tx)
            .await?;

        Ok(UsageRecord {
            uuid: usage.uuid,
            store: usage.store,
            discount: usage.discount,
            customer: usage.customer,
            order: usage.order,
            discount_amount,
            created_at: created_at.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for UsageSummary {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let total_uses_limit: Option<i32> = row.try_get("total_uses_limit")?;

        Ok(Self {
            total_uses: to_u64("total_uses", row.try_get("total_uses")?)?,
            uses_count: to_u64("uses_count", row.try_get("uses_count")?)?,
            total_uses_limit: total_uses_limit
                .map(u32::try_from)
                .transpose()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "total_uses_limit".to_string(),
                    source: Box::new(e),
                })?,
        })
    }
}

fn to_u64(column: &str, value: i64) -> Result<u64, sqlx::Error> {
    u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

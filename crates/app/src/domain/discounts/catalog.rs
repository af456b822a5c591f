//! Discount Catalog
//!
//! The data-access seam the discounts service is written against. Evaluation only ever sees
//! assembled [`Discount`]s, so the service can be exercised with an in-memory mock.

use async_trait::async_trait;
use mockall::automock;
use tessera::{
    discounts::{Discount, DiscountFamily},
    evaluation::UsageSnapshot,
    uuids::{CustomerId, DiscountId, SegmentId, StoreId},
};
use tracing::{Span, info};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::discounts::{
        DiscountsServiceError,
        data::NewUsage,
        models::{UsageRecord, UsageSummary},
        records::{DiscountEntries, DiscountRow},
        repositories::{
            discounts::PgDiscountsRepository,
            entries::PgEntriesRepository,
            segments::PgSegmentsRepository,
            usages::{PgUsagesRepository, Reservation},
        },
    },
};

#[automock]
#[async_trait]
pub trait DiscountCatalog: Send + Sync {
    /// Active automatic discounts of one family, ordered by id.
    async fn find_active_automatic(
        &self,
        store: StoreId,
        family: DiscountFamily,
    ) -> Result<Vec<Discount>, DiscountsServiceError>;

    /// The active code discount of one family whose code is exactly `code`.
    async fn find_active_by_code(
        &self,
        store: StoreId,
        family: DiscountFamily,
        code: String,
    ) -> Result<Option<Discount>, DiscountsServiceError>;

    /// Segments the customer belongs to.
    async fn customer_segments(
        &self,
        store: StoreId,
        customer: CustomerId,
    ) -> Result<Vec<SegmentId>, DiscountsServiceError>;

    /// Advisory usage counts for validation.
    async fn usage_snapshot(
        &self,
        store: StoreId,
        discount: DiscountId,
        customer: CustomerId,
    ) -> Result<UsageSnapshot, DiscountsServiceError>;

    /// Usage totals for reporting.
    async fn usage_summary(
        &self,
        store: StoreId,
        discount: DiscountId,
    ) -> Result<UsageSummary, DiscountsServiceError>;

    /// Atomically reserve one use and record it.
    ///
    /// This is the authoritative limit check: it fails with
    /// [`DiscountsServiceError::UsageLimitReached`] or [`DiscountsServiceError::AlreadyUsed`]
    /// even when validation passed moments earlier.
    async fn reserve_usage(
        &self,
        usage: NewUsage,
        discount_amount: u64,
    ) -> Result<UsageRecord, DiscountsServiceError>;
}

#[derive(Debug, Clone)]
pub struct PgDiscountCatalog {
    db: Db,
    discounts: PgDiscountsRepository,
    entries: PgEntriesRepository,
    segments: PgSegmentsRepository,
    usages: PgUsagesRepository,
}

impl PgDiscountCatalog {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            discounts: PgDiscountsRepository::new(),
            entries: PgEntriesRepository::new(),
            segments: PgSegmentsRepository::new(),
            usages: PgUsagesRepository::new(),
        }
    }

    async fn assemble(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        rows: Vec<DiscountRow>,
    ) -> Result<Vec<Discount>, DiscountsServiceError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let uuids: Vec<Uuid> = rows.iter().map(|row| row.uuid).collect();

        let eligibility = self.entries.list_eligibility_entries(tx, &uuids).await?;
        let items = self.entries.list_item_entries(tx, &uuids).await?;

        let mut entries = DiscountEntries::new(eligibility, items)?;

        rows.into_iter()
            .map(|row| row.into_discount(&mut entries))
            .collect()
    }
}

#[async_trait]
impl DiscountCatalog for PgDiscountCatalog {
    #[tracing::instrument(
        name = "discounts.catalog.find_active_automatic",
        skip(self),
        fields(store_uuid = %store, family = %family, discount_count = tracing::field::Empty),
        err
    )]
    async fn find_active_automatic(
        &self,
        store: StoreId,
        family: DiscountFamily,
    ) -> Result<Vec<Discount>, DiscountsServiceError> {
        let mut tx = self.db.begin_store_transaction(store).await?;

        let rows = self
            .discounts
            .find_active_automatic(&mut tx, store, family)
            .await?;

        let discounts = self.assemble(&mut tx, rows).await?;

        tx.commit().await?;

        Span::current().record("discount_count", tracing::field::display(discounts.len()));

        Ok(discounts)
    }

    #[tracing::instrument(
        name = "discounts.catalog.find_active_by_code",
        skip(self, code),
        fields(store_uuid = %store, family = %family),
        err
    )]
    async fn find_active_by_code(
        &self,
        store: StoreId,
        family: DiscountFamily,
        code: String,
    ) -> Result<Option<Discount>, DiscountsServiceError> {
        let mut tx = self.db.begin_store_transaction(store).await?;

        let row = self
            .discounts
            .find_active_by_code(&mut tx, store, family, &code)
            .await?;

        let discount = match row {
            Some(row) => self.assemble(&mut tx, vec![row]).await?.pop(),
            None => None,
        };

        tx.commit().await?;

        Ok(discount)
    }

    async fn customer_segments(
        &self,
        store: StoreId,
        customer: CustomerId,
    ) -> Result<Vec<SegmentId>, DiscountsServiceError> {
        let mut tx = self.db.begin_store_transaction(store).await?;

        let segments = self
            .segments
            .list_customer_segments(&mut tx, store, customer)
            .await?;

        tx.commit().await?;

        Ok(segments)
    }

    async fn usage_snapshot(
        &self,
        store: StoreId,
        discount: DiscountId,
        customer: CustomerId,
    ) -> Result<UsageSnapshot, DiscountsServiceError> {
        let mut tx = self.db.begin_store_transaction(store).await?;

        let snapshot = self
            .usages
            .usage_snapshot(&mut tx, store, discount, customer)
            .await?;

        tx.commit().await?;

        Ok(snapshot)
    }

    async fn usage_summary(
        &self,
        store: StoreId,
        discount: DiscountId,
    ) -> Result<UsageSummary, DiscountsServiceError> {
        let mut tx = self.db.begin_store_transaction(store).await?;

        let summary = self.usages.usage_summary(&mut tx, store, discount).await?;

        tx.commit().await?;

        Ok(summary)
    }

    #[tracing::instrument(
        name = "discounts.catalog.reserve_usage",
        skip(self, usage),
        fields(
            store_uuid = %usage.store,
            discount_uuid = %usage.discount,
            usage_uuid = %usage.uuid,
            single_use = tracing::field::Empty
        ),
        err
    )]
    async fn reserve_usage(
        &self,
        usage: NewUsage,
        discount_amount: u64,
    ) -> Result<UsageRecord, DiscountsServiceError> {
        let mut tx = self.db.begin_store_transaction(usage.store).await?;

        let single_use = match self.usages.reserve(&mut tx, usage.store, usage.discount).await? {
            Reservation::Reserved { single_use } => single_use,
            Reservation::LimitReached => return Err(DiscountsServiceError::UsageLimitReached),
            Reservation::Missing => return Err(DiscountsServiceError::NotFound),
        };

        Span::current().record("single_use", tracing::field::display(single_use));

        let record = self
            .usages
            .create_usage(&mut tx, &usage, discount_amount, single_use)
            .await?;

        tx.commit().await?;

        info!(usage_uuid = %record.uuid, discount_uuid = %record.discount, "recorded discount usage");

        Ok(record)
    }
}

//! Customer Segments Repository

use sqlx::{Postgres, Transaction, query_scalar};
use tessera::uuids::{CustomerId, SegmentId, StoreId};
use uuid::Uuid;

const LIST_CUSTOMER_SEGMENTS_SQL: &str = include_str!("sql/list_customer_segments.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgSegmentsRepository;

impl PgSegmentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_customer_segments(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        store: StoreId,
        customer: CustomerId,
    ) -> Result<Vec<SegmentId>, sqlx::Error> {
        let segments: Vec<Uuid> = query_scalar(LIST_CUSTOMER_SEGMENTS_SQL)
            .bind(store.into_uuid())
            .bind(customer.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        Ok(segments.into_iter().map(SegmentId::from_uuid).collect())
    }
}

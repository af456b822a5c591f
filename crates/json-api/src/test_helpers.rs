//! Test helpers.

use std::sync::Arc;

use salvo::{affix_state::inject, prelude::*};
use tessera::uuids::{CustomerId, StoreId};
use tessera_app::{
    domain::discounts::{
        CatalogDiscountsService, DiscountsService, MockDiscountCatalog, MockDiscountsService,
    },
    settings::StoreSettings,
};
use uuid::Uuid;

use crate::{router::app_router, state::State};

pub(crate) const TEST_STORE_UUID: StoreId = StoreId::from_uuid(Uuid::from_u128(1));
pub(crate) const TEST_CUSTOMER_UUID: CustomerId = CustomerId::from_uuid(Uuid::from_u128(2));

pub(crate) fn state_with_discounts(discounts: MockDiscountsService) -> Arc<State> {
    Arc::new(State::new(Arc::new(discounts)))
}

/// The full API router over a mocked discounts service.
pub(crate) fn discounts_service(discounts: MockDiscountsService) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_discounts(discounts)))
            .push(app_router()),
    )
}

/// The full API router over the real discounts service backed by a mocked catalog.
pub(crate) fn catalog_service(catalog: MockDiscountCatalog) -> Service {
    let discounts: Arc<dyn DiscountsService> = Arc::new(CatalogDiscountsService::new(
        Arc::new(catalog),
        StoreSettings::default(),
    ));

    Service::new(
        Router::new()
            .hoop(inject(Arc::new(State::new(discounts))))
            .push(app_router()),
    )
}

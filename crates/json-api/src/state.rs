//! State

use std::sync::Arc;

use tessera_app::{context::AppContext, domain::discounts::DiscountsService};

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) discounts: Arc<dyn DiscountsService>,
}

impl State {
    #[must_use]
    pub(crate) fn new(discounts: Arc<dyn DiscountsService>) -> Self {
        Self { discounts }
    }

    #[must_use]
    pub(crate) fn from_app_context(app: AppContext) -> Arc<Self> {
        Arc::new(Self::new(app.discounts))
    }
}

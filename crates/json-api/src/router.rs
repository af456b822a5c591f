//! App Router

use salvo::Router;

use crate::discounts::{check, usages, validate_code};

pub fn app_router() -> Router {
    Router::with_path("discounts")
        .push(
            Router::with_path("amount-off-order")
                .push(Router::with_path("check").post(check::amount_off_order))
                .push(Router::with_path("validate-code").post(validate_code::amount_off_order)),
        )
        .push(
            Router::with_path("buy-x-get-y")
                .push(Router::with_path("check").post(check::buy_x_get_y))
                .push(Router::with_path("validate-code").post(validate_code::buy_x_get_y)),
        )
        .push(Router::with_path("usages").post(usages::create))
}

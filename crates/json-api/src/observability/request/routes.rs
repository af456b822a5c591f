//! Route labels for spans and metrics.

/// Paths served by the API; anything else is reported as `unmatched` to keep label cardinality
/// bounded.
const KNOWN_ROUTES: &[&str] = &[
    "/discounts/amount-off-order/check",
    "/discounts/amount-off-order/validate-code",
    "/discounts/buy-x-get-y/check",
    "/discounts/buy-x-get-y/validate-code",
    "/discounts/usages",
    "/healthcheck",
];

pub(super) fn route_label(path: &str) -> &'static str {
    let trimmed = path.trim_end_matches('/');

    KNOWN_ROUTES
        .iter()
        .find(|route| **route == trimmed)
        .copied()
        .unwrap_or("unmatched")
}

//! Discounts Service

use std::sync::Arc;

use async_trait::async_trait;
use jiff::{Timestamp, civil::DateTime};
use mockall::automock;
use rust_decimal::Decimal;
use rusty_money::Money;
use tessera::{
    cart::{Cart, LineItem},
    customers::Customer,
    discounts::{DiscountFamily, DiscountKind, GetsValue, OrderValue},
    evaluation::{EvaluationContext, UsageSnapshot},
    money::{EngineError, decimal_from_minor, minor_from_decimal},
    ranking::{self, CodeValidation, RankedDiscount},
    uuids::{CustomerId, DiscountId, StoreId},
};
use tracing::{Span, debug};

use crate::{
    domain::discounts::{
        DiscountCatalog, DiscountsServiceError,
        data::{CartLine, Checkout, NewUsage},
        models::{
            CodeValidationReport, DiscountOffer, EligibilityReport, OfferValue, UsageRecord,
            UsageSummary,
        },
    },
    settings::StoreSettings,
};

#[derive(Clone)]
pub struct CatalogDiscountsService {
    catalog: Arc<dyn DiscountCatalog>,
    settings: StoreSettings,
}

impl CatalogDiscountsService {
    #[must_use]
    pub fn new(catalog: Arc<dyn DiscountCatalog>, settings: StoreSettings) -> Self {
        Self { catalog, settings }
    }

    fn cart(&self, lines: &[CartLine]) -> Result<Cart<'static>, DiscountsServiceError> {
        let currency = self.settings.currency;

        let items = lines
            .iter()
            .map(|line| -> Result<LineItem<'static>, EngineError> {
                let minor = minor_from_decimal(line.price, currency)?;

                let item = LineItem::new(Money::from_minor(minor, currency), line.quantity)
                    .with_collections(line.collections.iter().copied());

                Ok(match line.product {
                    Some(product) => item.with_product(product),
                    None => item,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(DiscountsServiceError::InvalidCart)?;

        Cart::new(currency, items).map_err(DiscountsServiceError::InvalidCart)
    }

    fn local_now(&self, point_in_time: Timestamp) -> DateTime {
        point_in_time
            .to_zoned(self.settings.time_zone.clone())
            .datetime()
    }

    async fn customer(
        &self,
        store: StoreId,
        customer: CustomerId,
    ) -> Result<Customer, DiscountsServiceError> {
        let segments = self.catalog.customer_segments(store, customer).await?;

        Ok(Customer::with_segments(customer, segments))
    }

    fn major(&self, minor: i64) -> Decimal {
        decimal_from_minor(minor, self.settings.currency)
    }

    fn stored_major(&self, minor: u64) -> Decimal {
        self.major(i64::try_from(minor).unwrap_or(i64::MAX))
    }

    fn offer(&self, ranked: &RankedDiscount<'_>) -> DiscountOffer {
        let discount = ranked.discount;

        let value = match &discount.kind {
            DiscountKind::AmountOffOrder(rules) => OfferValue::AmountOffOrder {
                value_type: rules.value.as_str(),
                percentage: match rules.value {
                    OrderValue::Percentage(percentage) => Some(percentage),
                    OrderValue::FixedAmount(_) => None,
                },
                fixed_amount: match rules.value {
                    OrderValue::FixedAmount(amount) => Some(self.stored_major(amount)),
                    OrderValue::Percentage(_) => None,
                },
            },
            DiscountKind::BuyXGetY(rules) => OfferValue::BuyXGetY {
                discounted_value: rules.gets_value.as_str(),
                discounted_amount: match rules.gets_value {
                    GetsValue::AmountOff(amount) => Some(self.stored_major(amount)),
                    GetsValue::Free | GetsValue::Percentage(_) => None,
                },
                discounted_percentage: match rules.gets_value {
                    GetsValue::Percentage(percentage) => Some(percentage),
                    GetsValue::Free | GetsValue::AmountOff(_) => None,
                },
                customer_gets_quantity: rules.gets_quantity,
                discounted_units: ranked.discounted_units(),
            },
        };

        DiscountOffer {
            id: discount.id,
            family: discount.family(),
            method: discount.method.as_str(),
            discount_code: discount.code().map(str::to_string),
            title: discount.title().map(str::to_string),
            value,
            discount_amount: self.major(ranked.amount),
            message: ranked.message(self.settings.currency),
            combines_with: discount.combinations,
        }
    }
}

#[async_trait]
impl DiscountsService for CatalogDiscountsService {
    #[tracing::instrument(
        name = "discounts.service.check_eligible",
        skip(self, checkout, point_in_time),
        fields(
            store_uuid = %checkout.store,
            customer_uuid = %checkout.customer,
            family = %family,
            evaluated = tracing::field::Empty,
            eligible = tracing::field::Empty
        ),
        err
    )]
    async fn check_eligible(
        &self,
        family: DiscountFamily,
        checkout: Checkout,
        point_in_time: Timestamp,
    ) -> Result<EligibilityReport, DiscountsServiceError> {
        let cart = self.cart(&checkout.lines)?;
        let customer = self.customer(checkout.store, checkout.customer).await?;

        let discounts = self
            .catalog
            .find_active_automatic(checkout.store, family)
            .await?;

        let context = EvaluationContext {
            cart: &cart,
            customer: &customer,
            now: self.local_now(point_in_time),
        };

        let ranking = ranking::check_eligible(&discounts, &context)?;

        let span = Span::current();

        span.record("evaluated", tracing::field::display(discounts.len()));
        span.record("eligible", tracing::field::display(ranking.discounts.len()));

        debug!(
            excluded = discounts.len() - ranking.discounts.len(),
            "ranked automatic discounts"
        );

        Ok(EligibilityReport {
            discounts: ranking
                .discounts
                .iter()
                .map(|ranked| self.offer(ranked))
                .collect(),
            cart_total: self.major(ranking.summary.total),
            total_quantity: ranking.summary.quantity,
        })
    }

    #[tracing::instrument(
        name = "discounts.service.validate_code",
        skip(self, checkout, code, point_in_time),
        fields(
            store_uuid = %checkout.store,
            customer_uuid = %checkout.customer,
            family = %family,
            discount_uuid = tracing::field::Empty,
            valid = tracing::field::Empty
        ),
        err
    )]
    async fn validate_code(
        &self,
        family: DiscountFamily,
        checkout: Checkout,
        code: String,
        point_in_time: Timestamp,
    ) -> Result<CodeValidationReport, DiscountsServiceError> {
        let cart = self.cart(&checkout.lines)?;
        let code = ranking::normalize_code(&code);

        let candidate = if code.is_empty() {
            None
        } else {
            self.catalog
                .find_active_by_code(checkout.store, family, code.to_string())
                .await?
        };

        let span = Span::current();

        let usage = match &candidate {
            Some(discount) => {
                span.record("discount_uuid", tracing::field::display(discount.id));

                self.catalog
                    .usage_snapshot(checkout.store, discount.id, checkout.customer)
                    .await?
            }
            None => UsageSnapshot::default(),
        };

        let customer = self.customer(checkout.store, checkout.customer).await?;

        let context = EvaluationContext {
            cart: &cart,
            customer: &customer,
            now: self.local_now(point_in_time),
        };

        let validation = ranking::validate_code(candidate.as_ref(), code, &context, &usage)?;

        span.record(
            "valid",
            tracing::field::display(matches!(validation, CodeValidation::Valid { .. })),
        );

        Ok(match validation {
            CodeValidation::Valid { discount, summary } => CodeValidationReport::Valid {
                discount: self.offer(&discount),
                cart_total: self.major(summary.total),
                total_quantity: summary.quantity,
            },
            CodeValidation::Invalid(rejection) => CodeValidationReport::Rejected {
                message: rejection.to_string(),
            },
        })
    }

    #[tracing::instrument(
        name = "discounts.service.record_usage",
        skip(self, usage),
        fields(
            store_uuid = %usage.store,
            discount_uuid = %usage.discount,
            customer_uuid = %usage.customer
        ),
        err
    )]
    async fn record_usage(&self, usage: NewUsage) -> Result<UsageRecord, DiscountsServiceError> {
        let amount = minor_from_decimal(usage.discount_amount, self.settings.currency)
            .map_err(|_precision| DiscountsServiceError::InvalidData)?;

        let amount = u64::try_from(amount).map_err(|_negative| DiscountsServiceError::InvalidData)?;

        self.catalog.reserve_usage(usage, amount).await
    }

    #[tracing::instrument(
        name = "discounts.service.usage_summary",
        skip(self),
        fields(store_uuid = %store, discount_uuid = %discount),
        err
    )]
    async fn usage_summary(
        &self,
        store: StoreId,
        discount: DiscountId,
    ) -> Result<UsageSummary, DiscountsServiceError> {
        self.catalog.usage_summary(store, discount).await
    }
}

#[automock]
#[async_trait]
pub trait DiscountsService: Send + Sync {
    /// Rank the automatic discounts of `family` the checkout qualifies for.
    async fn check_eligible(
        &self,
        family: DiscountFamily,
        checkout: Checkout,
        point_in_time: Timestamp,
    ) -> Result<EligibilityReport, DiscountsServiceError>;

    /// Validate a customer-entered code of `family` against the checkout.
    async fn validate_code(
        &self,
        family: DiscountFamily,
        checkout: Checkout,
        code: String,
        point_in_time: Timestamp,
    ) -> Result<CodeValidationReport, DiscountsServiceError>;

    /// Reserve and record one use of a discount for a completed order.
    async fn record_usage(&self, usage: NewUsage) -> Result<UsageRecord, DiscountsServiceError>;

    /// Usage totals of a discount.
    async fn usage_summary(
        &self,
        store: StoreId,
        discount: DiscountId,
    ) -> Result<UsageSummary, DiscountsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::{civil::date, tz::TimeZone};
    use rust_decimal::Decimal;
    use rusty_money::iso::USD;
    use tessera::{
        discounts::{
            ActiveWindow, AmountOffOrder, Combinations, CustomerEligibility, Discount, Method,
            MinimumPurchase, Status, UsageLimits,
        },
        uuids::{OrderId, SegmentId, UsageId},
    };
    use testresult::TestResult;

    use super::*;
    use crate::domain::discounts::MockDiscountCatalog;

    fn order_discount(method: Method, minimum: MinimumPurchase, value: OrderValue) -> Discount {
        Discount {
            id: DiscountId::new(),
            store: StoreId::new(),
            method,
            status: Status::Active,
            eligibility: CustomerEligibility::AllCustomers,
            window: ActiveWindow::unbounded(),
            combinations: Combinations::default(),
            kind: DiscountKind::AmountOffOrder(AmountOffOrder { minimum, value }),
        }
    }

    fn automatic(title: &str) -> Method {
        Method::Automatic {
            title: title.to_string(),
        }
    }

    fn code(code: &str, limits: UsageLimits) -> Method {
        Method::DiscountCode {
            code: code.to_string(),
            limits,
        }
    }

    fn checkout(lines: Vec<CartLine>) -> Checkout {
        Checkout {
            store: StoreId::new(),
            customer: CustomerId::new(),
            lines,
        }
    }

    fn line(price: Decimal, quantity: u32) -> CartLine {
        CartLine {
            product: None,
            collections: Vec::new(),
            price,
            quantity,
        }
    }

    fn catalog_with_automatic(discounts: Vec<Discount>) -> MockDiscountCatalog {
        let mut catalog = MockDiscountCatalog::new();

        catalog
            .expect_customer_segments()
            .returning(|_, _| Ok(Vec::new()));

        catalog
            .expect_find_active_automatic()
            .returning(move |_, _| Ok(discounts.clone()));

        catalog
    }

    fn catalog_with_code(discount: Option<Discount>, usage: UsageSnapshot) -> MockDiscountCatalog {
        let mut catalog = MockDiscountCatalog::new();

        catalog
            .expect_customer_segments()
            .returning(|_, _| Ok(Vec::new()));

        catalog
            .expect_find_active_by_code()
            .returning(move |_, _, _| Ok(discount.clone()));

        catalog
            .expect_usage_snapshot()
            .returning(move |_, _, _| Ok(usage));

        catalog
    }

    fn service(catalog: MockDiscountCatalog) -> CatalogDiscountsService {
        CatalogDiscountsService::new(Arc::new(catalog), StoreSettings::default())
    }

    #[tokio::test]
    async fn check_eligible_reports_amount_and_message() -> TestResult {
        let discount = order_discount(
            automatic("Ten percent"),
            MinimumPurchase::None,
            OrderValue::Percentage(Decimal::TEN),
        );

        let report = service(catalog_with_automatic(vec![discount.clone()]))
            .check_eligible(
                DiscountFamily::AmountOffOrder,
                checkout(vec![line(Decimal::new(1000, 0), 1)]),
                Timestamp::now(),
            )
            .await?;

        assert_eq!(report.cart_total, Decimal::new(1000, 0));
        assert_eq!(report.total_quantity, 1);
        assert_eq!(report.discounts.len(), 1);

        let offer = report.discounts.first().ok_or("expected an offer")?;

        assert_eq!(offer.id, discount.id);
        assert_eq!(offer.method, "automatic");
        assert_eq!(offer.title.as_deref(), Some("Ten percent"));
        assert_eq!(offer.discount_amount, Decimal::new(100, 0));
        assert_eq!(offer.message, "You are eligible for 10% off!");
        assert_eq!(
            offer.value,
            OfferValue::AmountOffOrder {
                value_type: "percentage",
                percentage: Some(Decimal::TEN),
                fixed_amount: None,
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn check_eligible_ranks_highest_amount_first() -> TestResult {
        let thirty = order_discount(
            automatic("Thirty off"),
            MinimumPurchase::None,
            OrderValue::FixedAmount(3000),
        );
        let fifty = order_discount(
            automatic("Fifty off"),
            MinimumPurchase::None,
            OrderValue::FixedAmount(5000),
        );

        let report = service(catalog_with_automatic(vec![thirty.clone(), fifty.clone()]))
            .check_eligible(
                DiscountFamily::AmountOffOrder,
                checkout(vec![line(Decimal::new(200, 0), 1)]),
                Timestamp::now(),
            )
            .await?;

        let ids: Vec<_> = report.discounts.iter().map(|offer| offer.id).collect();

        assert_eq!(ids, [fifty.id, thirty.id]);

        Ok(())
    }

    #[tokio::test]
    async fn check_eligible_excludes_discounts_below_minimum() -> TestResult {
        let discount = order_discount(
            automatic("Big spender"),
            MinimumPurchase::Amount(5000),
            OrderValue::Percentage(Decimal::TEN),
        );

        let report = service(catalog_with_automatic(vec![discount]))
            .check_eligible(
                DiscountFamily::AmountOffOrder,
                checkout(vec![line(Decimal::new(40, 0), 1)]),
                Timestamp::now(),
            )
            .await?;

        assert!(report.discounts.is_empty());
        assert_eq!(report.cart_total, Decimal::new(40, 0));

        Ok(())
    }

    #[tokio::test]
    async fn check_eligible_uses_customer_segments_from_catalog() -> TestResult {
        let vip = SegmentId::new();
        let mut discount = order_discount(
            automatic("VIP"),
            MinimumPurchase::None,
            OrderValue::FixedAmount(500),
        );
        discount.eligibility = CustomerEligibility::Segments([vip].into_iter().collect());

        let mut catalog = MockDiscountCatalog::new();

        catalog
            .expect_customer_segments()
            .times(1)
            .returning(move |_, _| Ok(vec![vip]));

        catalog
            .expect_find_active_automatic()
            .withf(|_, family| *family == DiscountFamily::AmountOffOrder)
            .returning(move |_, _| Ok(vec![discount.clone()]));

        let report = service(catalog)
            .check_eligible(
                DiscountFamily::AmountOffOrder,
                checkout(vec![line(Decimal::new(20, 0), 1)]),
                Timestamp::now(),
            )
            .await?;

        assert_eq!(report.discounts.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn check_eligible_rejects_prices_finer_than_the_currency() {
        let result = service(catalog_with_automatic(Vec::new()))
            .check_eligible(
                DiscountFamily::AmountOffOrder,
                checkout(vec![line(Decimal::new(10_005, 3), 1)]),
                Timestamp::now(),
            )
            .await;

        assert!(matches!(
            result,
            Err(DiscountsServiceError::InvalidCart(_))
        ));
    }

    #[tokio::test]
    async fn check_eligible_rejects_carts_whose_total_overflows() {
        let result = service(catalog_with_automatic(Vec::new()))
            .check_eligible(
                DiscountFamily::AmountOffOrder,
                checkout(vec![line(Decimal::from(90_000_000_000_000_000_i64), 2)]),
                Timestamp::now(),
            )
            .await;

        assert!(matches!(
            result,
            Err(DiscountsServiceError::InvalidCart(EngineError::Overflow))
        ));
    }

    #[tokio::test]
    async fn validate_code_unknown_code_is_invalid() -> TestResult {
        let mut catalog = MockDiscountCatalog::new();

        catalog
            .expect_customer_segments()
            .returning(|_, _| Ok(Vec::new()));

        catalog
            .expect_find_active_by_code()
            .returning(|_, _, _| Ok(None));

        catalog.expect_usage_snapshot().never();

        let report = service(catalog)
            .validate_code(
                DiscountFamily::AmountOffOrder,
                checkout(vec![line(Decimal::new(15, 0), 1)]),
                "NOPE".to_string(),
                Timestamp::now(),
            )
            .await?;

        assert_eq!(
            report,
            CodeValidationReport::Rejected {
                message: "Invalid discount code".to_string()
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn validate_code_looks_up_trimmed_code_and_caps_amount() -> TestResult {
        let discount = order_discount(
            code("SAVE20", UsageLimits::default()),
            MinimumPurchase::None,
            OrderValue::FixedAmount(2000),
        );

        let mut catalog = MockDiscountCatalog::new();

        catalog
            .expect_customer_segments()
            .returning(|_, _| Ok(Vec::new()));

        catalog
            .expect_find_active_by_code()
            .withf(|_, _, code| code == "SAVE20")
            .returning(move |_, _, _| Ok(Some(discount.clone())));

        catalog
            .expect_usage_snapshot()
            .returning(|_, _, _| Ok(UsageSnapshot::default()));

        let report = service(catalog)
            .validate_code(
                DiscountFamily::AmountOffOrder,
                checkout(vec![line(Decimal::new(15, 0), 1)]),
                " SAVE20 ".to_string(),
                Timestamp::now(),
            )
            .await?;

        let CodeValidationReport::Valid {
            discount,
            cart_total,
            total_quantity,
        } = report
        else {
            return Err("expected SAVE20 to be valid".into());
        };

        assert_eq!(discount.discount_amount, Decimal::new(15, 0));
        assert_eq!(discount.discount_code.as_deref(), Some("SAVE20"));
        assert_eq!(discount.method, "discount-code");
        assert_eq!(cart_total, Decimal::new(15, 0));
        assert_eq!(total_quantity, 1);

        Ok(())
    }

    #[tokio::test]
    async fn validate_code_reports_prior_use() -> TestResult {
        let discount = order_discount(
            code(
                "ONEUSE",
                UsageLimits {
                    total_uses: None,
                    once_per_customer: true,
                },
            ),
            MinimumPurchase::None,
            OrderValue::FixedAmount(500),
        );

        let report = service(catalog_with_code(
            Some(discount),
            UsageSnapshot {
                total_uses: 1,
                used_by_customer: true,
            },
        ))
        .validate_code(
            DiscountFamily::AmountOffOrder,
            checkout(vec![line(Decimal::new(15, 0), 1)]),
            "ONEUSE".to_string(),
            Timestamp::now(),
        )
        .await?;

        assert_eq!(
            report,
            CodeValidationReport::Rejected {
                message: "You have already used this discount code".to_string()
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn validate_code_reports_exhausted_limit() -> TestResult {
        let discount = order_discount(
            code(
                "LIMITED",
                UsageLimits {
                    total_uses: Some(1),
                    once_per_customer: false,
                },
            ),
            MinimumPurchase::None,
            OrderValue::FixedAmount(500),
        );

        let report = service(catalog_with_code(
            Some(discount),
            UsageSnapshot {
                total_uses: 1,
                used_by_customer: false,
            },
        ))
        .validate_code(
            DiscountFamily::AmountOffOrder,
            checkout(vec![line(Decimal::new(15, 0), 1)]),
            "LIMITED".to_string(),
            Timestamp::now(),
        )
        .await?;

        assert_eq!(
            report,
            CodeValidationReport::Rejected {
                message: "This discount code has reached its usage limit".to_string()
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn windows_are_read_in_the_store_time_zone() -> TestResult {
        let mut discount = order_discount(
            code("MIDNIGHT", UsageLimits::default()),
            MinimumPurchase::None,
            OrderValue::FixedAmount(500),
        );
        discount.window = ActiveWindow::from_parts(Some(date(2026, 6, 15)), None, None);

        // 01:30 in Paris, still the 14th in UTC
        let point_in_time: Timestamp = "2026-06-14T23:30:00Z".parse()?;

        let utc = service(catalog_with_code(
            Some(discount.clone()),
            UsageSnapshot::default(),
        ))
        .validate_code(
            DiscountFamily::AmountOffOrder,
            checkout(vec![line(Decimal::new(15, 0), 1)]),
            "MIDNIGHT".to_string(),
            point_in_time,
        )
        .await?;

        let paris = CatalogDiscountsService::new(
            Arc::new(catalog_with_code(Some(discount), UsageSnapshot::default())),
            StoreSettings {
                currency: USD,
                time_zone: TimeZone::get("Europe/Paris")?,
            },
        )
        .validate_code(
            DiscountFamily::AmountOffOrder,
            checkout(vec![line(Decimal::new(15, 0), 1)]),
            "MIDNIGHT".to_string(),
            point_in_time,
        )
        .await?;

        assert_eq!(
            utc,
            CodeValidationReport::Rejected {
                message: "This discount is not yet active".to_string()
            }
        );
        assert!(matches!(paris, CodeValidationReport::Valid { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn record_usage_reserves_minor_units() -> TestResult {
        let usage = NewUsage {
            uuid: UsageId::new(),
            store: StoreId::new(),
            discount: DiscountId::new(),
            customer: CustomerId::new(),
            order: Some(OrderId::new()),
            discount_amount: Decimal::new(1250, 2),
        };

        let expected = UsageRecord {
            uuid: usage.uuid,
            store: usage.store,
            discount: usage.discount,
            customer: usage.customer,
            order: usage.order,
            discount_amount: 1250,
            created_at: Timestamp::now(),
        };

        let mut catalog = MockDiscountCatalog::new();
        let returned = expected.clone();

        catalog
            .expect_reserve_usage()
            .withf(|_, amount| *amount == 1250)
            .times(1)
            .returning(move |_, _| Ok(returned.clone()));

        let record = service(catalog).record_usage(usage).await?;

        assert_eq!(record, expected);

        Ok(())
    }

    #[tokio::test]
    async fn record_usage_rejects_negative_amounts() {
        let mut catalog = MockDiscountCatalog::new();

        catalog.expect_reserve_usage().never();

        let result = service(catalog)
            .record_usage(NewUsage {
                uuid: UsageId::new(),
                store: StoreId::new(),
                discount: DiscountId::new(),
                customer: CustomerId::new(),
                order: None,
                discount_amount: Decimal::new(-1, 0),
            })
            .await;

        assert!(matches!(result, Err(DiscountsServiceError::InvalidData)));
    }

    #[tokio::test]
    async fn record_usage_passes_through_limit_errors() {
        let mut catalog = MockDiscountCatalog::new();

        catalog
            .expect_reserve_usage()
            .returning(|_, _| Err(DiscountsServiceError::UsageLimitReached));

        let result = service(catalog)
            .record_usage(NewUsage {
                uuid: UsageId::new(),
                store: StoreId::new(),
                discount: DiscountId::new(),
                customer: CustomerId::new(),
                order: None,
                discount_amount: Decimal::ONE,
            })
            .await;

        assert!(matches!(
            result,
            Err(DiscountsServiceError::UsageLimitReached)
        ));
    }
}

//! Discounts Records
//!
//! Rows as stored, and their assembly into engine discounts.

use jiff_sqlx::{Date as SqlxDate, Time as SqlxTime};
use rust_decimal::Decimal;
use rustc_hash::{FxHashMap, FxHashSet};
use sqlx::{FromRow, Row, postgres::PgRow};
use tessera::{
    discounts::{
        ActiveWindow, AmountOffOrder, BuyXGetY, BuysRequirement, Combinations,
        CustomerEligibility, Discount, DiscountKind, GetsValue, ItemScope, ItemTargets, Method,
        MinimumPurchase, OrderValue, Status, UsageLimits,
    },
    uuids::{CollectionId, CustomerId, DiscountId, ProductId, SegmentId, StoreId},
};
use uuid::Uuid;

use crate::domain::discounts::DiscountsServiceError;

/// A `discounts` row joined with its family detail row.
#[derive(Debug, Clone)]
pub(crate) struct DiscountRow {
    pub uuid: Uuid,
    pub store_uuid: Uuid,
    pub kind: String,
    pub method: String,
    pub discount_code: Option<String>,
    pub title: Option<String>,
    pub eligibility: String,
    pub limit_total_uses: bool,
    pub total_uses_limit: Option<i32>,
    pub limit_one_use_per_customer: bool,
    pub start_date: Option<SqlxDate>,
    pub start_time: Option<SqlxTime>,
    pub set_end_date: bool,
    pub end_date: Option<SqlxDate>,
    pub end_time: Option<SqlxTime>,
    pub status: String,
    pub combines_with_product_discounts: bool,
    pub combines_with_order_discounts: bool,
    pub combines_with_shipping_discounts: bool,
    pub amount_off_order: Option<AmountOffOrderRow>,
    pub buy_x_get_y: Option<BuyXGetYRow>,
}

#[derive(Debug, Clone)]
pub(crate) struct AmountOffOrderRow {
    pub minimum_purchase: String,
    pub minimum_amount: Option<i64>,
    pub minimum_quantity: Option<i32>,
    pub value_type: String,
    pub percentage: Option<Decimal>,
    pub fixed_amount: Option<i64>,
}

#[derive(Debug, Clone)]
pub(crate) struct BuyXGetYRow {
    pub customer_buys: String,
    pub buys_quantity: Option<i32>,
    pub buys_amount: Option<i64>,
    pub buys_items_from: String,
    pub gets_quantity: i32,
    pub gets_items_from: String,
    pub discounted_value: String,
    pub discounted_amount: Option<i64>,
    pub discounted_percentage: Option<Decimal>,
    pub set_max_uses_per_order: bool,
    pub max_uses_per_order: Option<i32>,
}

impl<'r> FromRow<'r, PgRow> for DiscountRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let amount_off_order = match row.try_get::<Option<String>, _>("minimum_purchase")? {
            Some(minimum_purchase) => Some(AmountOffOrderRow {
                minimum_purchase,
                minimum_amount: row.try_get("minimum_amount")?,
                minimum_quantity: row.try_get("minimum_quantity")?,
                value_type: row.try_get("value_type")?,
                percentage: row.try_get("percentage")?,
                fixed_amount: row.try_get("fixed_amount")?,
            }),
            None => None,
        };

        let buy_x_get_y = match row.try_get::<Option<String>, _>("customer_buys")? {
            Some(customer_buys) => Some(BuyXGetYRow {
                customer_buys,
                buys_quantity: row.try_get("buys_quantity")?,
                buys_amount: row.try_get("buys_amount")?,
                buys_items_from: row.try_get("buys_items_from")?,
                gets_quantity: row.try_get("gets_quantity")?,
                gets_items_from: row.try_get("gets_items_from")?,
                discounted_value: row.try_get("discounted_value")?,
                discounted_amount: row.try_get("discounted_amount")?,
                discounted_percentage: row.try_get("discounted_percentage")?,
                set_max_uses_per_order: row.try_get("set_max_uses_per_order")?,
                max_uses_per_order: row.try_get("max_uses_per_order")?,
            }),
            None => None,
        };

        Ok(Self {
            uuid: row.try_get("uuid")?,
            store_uuid: row.try_get("store_uuid")?,
            kind: row.try_get("kind")?,
            method: row.try_get("method")?,
            discount_code: row.try_get("discount_code")?,
            title: row.try_get("title")?,
            eligibility: row.try_get("eligibility")?,
            limit_total_uses: row.try_get("limit_total_uses")?,
            total_uses_limit: row.try_get("total_uses_limit")?,
            limit_one_use_per_customer: row.try_get("limit_one_use_per_customer")?,
            start_date: row.try_get("start_date")?,
            start_time: row.try_get("start_time")?,
            set_end_date: row.try_get("set_end_date")?,
            end_date: row.try_get("end_date")?,
            end_time: row.try_get("end_time")?,
            status: row.try_get("status")?,
            combines_with_product_discounts: row.try_get("combines_with_product_discounts")?,
            combines_with_order_discounts: row.try_get("combines_with_order_discounts")?,
            combines_with_shipping_discounts: row.try_get("combines_with_shipping_discounts")?,
            amount_off_order,
            buy_x_get_y,
        })
    }
}

/// A `discount_eligibility_entries` row.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct EligibilityEntryRow {
    pub discount_uuid: Uuid,
    pub customer_segment_uuid: Option<Uuid>,
    pub customer_uuid: Option<Uuid>,
}

/// A `discount_item_entries` row.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct ItemEntryRow {
    pub discount_uuid: Uuid,
    pub side: String,
    pub product_uuid: Option<Uuid>,
    pub collection_uuid: Option<Uuid>,
}

#[derive(Debug, Default)]
struct TargetSets {
    products: FxHashSet<ProductId>,
    collections: FxHashSet<CollectionId>,
}

#[derive(Debug, Default)]
struct DiscountTargets {
    segments: FxHashSet<SegmentId>,
    customers: FxHashSet<CustomerId>,
    buys: TargetSets,
    gets: TargetSets,
}

/// Entry rows grouped by discount.
#[derive(Debug, Default)]
pub(crate) struct DiscountEntries {
    by_discount: FxHashMap<Uuid, DiscountTargets>,
}

impl DiscountEntries {
    pub(crate) fn new(
        eligibility: Vec<EligibilityEntryRow>,
        items: Vec<ItemEntryRow>,
    ) -> Result<Self, DiscountsServiceError> {
        let mut by_discount: FxHashMap<Uuid, DiscountTargets> = FxHashMap::default();

        for entry in eligibility {
            let targets = by_discount.entry(entry.discount_uuid).or_default();

            if let Some(segment) = entry.customer_segment_uuid {
                targets.segments.insert(SegmentId::from_uuid(segment));
            }

            if let Some(customer) = entry.customer_uuid {
                targets.customers.insert(CustomerId::from_uuid(customer));
            }
        }

        for entry in items {
            let targets = by_discount.entry(entry.discount_uuid).or_default();

            let sets = match entry.side.as_str() {
                "buys" => &mut targets.buys,
                "gets" => &mut targets.gets,
                _ => return Err(DiscountsServiceError::CorruptCatalog),
            };

            if let Some(product) = entry.product_uuid {
                sets.products.insert(ProductId::from_uuid(product));
            }

            if let Some(collection) = entry.collection_uuid {
                sets.collections.insert(CollectionId::from_uuid(collection));
            }
        }

        Ok(Self { by_discount })
    }

    fn take(&mut self, discount: Uuid) -> DiscountTargets {
        self.by_discount.remove(&discount).unwrap_or_default()
    }
}

impl DiscountRow {
    /// Assemble an engine discount, taking this discount's entries out of `entries`.
    pub(crate) fn into_discount(
        self,
        entries: &mut DiscountEntries,
    ) -> Result<Discount, DiscountsServiceError> {
        let targets = entries.take(self.uuid);

        let method = match self.method.as_str() {
            "discount-code" => Method::DiscountCode {
                code: self
                    .discount_code
                    .ok_or(DiscountsServiceError::CorruptCatalog)?,
                limits: UsageLimits {
                    total_uses: if self.limit_total_uses {
                        Some(non_negative(
                            self.total_uses_limit
                                .ok_or(DiscountsServiceError::CorruptCatalog)?,
                        )?)
                    } else {
                        None
                    },
                    once_per_customer: self.limit_one_use_per_customer,
                },
            },
            "automatic" => Method::Automatic {
                title: self
                    .title
                    .ok_or(DiscountsServiceError::CorruptCatalog)?,
            },
            _ => return Err(DiscountsServiceError::CorruptCatalog),
        };

        let eligibility = match self.eligibility.as_str() {
            "all-customers" => CustomerEligibility::AllCustomers,
            "specific-customer-segments" => CustomerEligibility::Segments(targets.segments),
            "specific-customers" => CustomerEligibility::Customers(targets.customers),
            _ => return Err(DiscountsServiceError::CorruptCatalog),
        };

        let status = match self.status.as_str() {
            "active" => Status::Active,
            "draft" => Status::Draft,
            _ => return Err(DiscountsServiceError::CorruptCatalog),
        };

        let end = if self.set_end_date {
            let end_date = self
                .end_date
                .ok_or(DiscountsServiceError::CorruptCatalog)?;

            Some((end_date.to_jiff(), self.end_time.map(SqlxTime::to_jiff)))
        } else {
            None
        };

        let window = ActiveWindow::from_parts(
            self.start_date.map(SqlxDate::to_jiff),
            self.start_time.map(SqlxTime::to_jiff),
            end,
        );

        let kind = match (self.kind.as_str(), self.amount_off_order, self.buy_x_get_y) {
            ("amount-off-order", Some(row), _) => DiscountKind::AmountOffOrder(row.try_into()?),
            ("buy-x-get-y", _, Some(row)) => {
                DiscountKind::BuyXGetY(row.into_rules(targets.buys, targets.gets)?)
            }
            _ => return Err(DiscountsServiceError::CorruptCatalog),
        };

        Ok(Discount {
            id: DiscountId::from_uuid(self.uuid),
            store: StoreId::from_uuid(self.store_uuid),
            method,
            status,
            eligibility,
            window,
            combinations: Combinations {
                product_discounts: self.combines_with_product_discounts,
                order_discounts: self.combines_with_order_discounts,
                shipping_discounts: self.combines_with_shipping_discounts,
            },
            kind,
        })
    }
}

impl TryFrom<AmountOffOrderRow> for AmountOffOrder {
    type Error = DiscountsServiceError;

    fn try_from(row: AmountOffOrderRow) -> Result<Self, Self::Error> {
        let minimum = match row.minimum_purchase.as_str() {
            "none" => MinimumPurchase::None,
            "minimum-amount" => MinimumPurchase::Amount(stored_amount(row.minimum_amount)?),
            "minimum-quantity" => MinimumPurchase::Quantity(non_negative(
                row.minimum_quantity
                    .ok_or(DiscountsServiceError::CorruptCatalog)?,
            )?),
            _ => return Err(DiscountsServiceError::CorruptCatalog),
        };

        let value = match row.value_type.as_str() {
            "percentage" => OrderValue::Percentage(
                row.percentage
                    .ok_or(DiscountsServiceError::CorruptCatalog)?,
            ),
            "fixed-amount" => OrderValue::FixedAmount(stored_amount(row.fixed_amount)?),
            _ => return Err(DiscountsServiceError::CorruptCatalog),
        };

        Ok(Self { minimum, value })
    }
}

impl BuyXGetYRow {
    fn into_rules(self, buys: TargetSets, gets: TargetSets) -> Result<BuyXGetY, DiscountsServiceError> {
        let buys_requirement = match self.customer_buys.as_str() {
            "minimum-quantity" => BuysRequirement::MinimumQuantity(non_negative(
                self.buys_quantity
                    .ok_or(DiscountsServiceError::CorruptCatalog)?,
            )?),
            "minimum-amount" => BuysRequirement::MinimumAmount(stored_amount(self.buys_amount)?),
            _ => return Err(DiscountsServiceError::CorruptCatalog),
        };

        let gets_value = match self.discounted_value.as_str() {
            "free" => GetsValue::Free,
            "amount" => GetsValue::AmountOff(stored_amount(self.discounted_amount)?),
            "percentage" => GetsValue::Percentage(
                self.discounted_percentage
                    .ok_or(DiscountsServiceError::CorruptCatalog)?,
            ),
            _ => return Err(DiscountsServiceError::CorruptCatalog),
        };

        let max_uses_per_order = if self.set_max_uses_per_order {
            Some(non_negative(
                self.max_uses_per_order
                    .ok_or(DiscountsServiceError::CorruptCatalog)?,
            )?)
        } else {
            None
        };

        Ok(BuyXGetY {
            buys: buys_requirement,
            buys_items: targets(&self.buys_items_from, buys)?,
            gets_quantity: non_negative(self.gets_quantity)?,
            gets_items: targets(&self.gets_items_from, gets)?,
            gets_value,
            max_uses_per_order,
        })
    }
}

fn targets(scope: &str, sets: TargetSets) -> Result<ItemTargets, DiscountsServiceError> {
    let scope = match scope {
        "specific-products" => ItemScope::SpecificProducts,
        "specific-collections" => ItemScope::SpecificCollections,
        _ => return Err(DiscountsServiceError::CorruptCatalog),
    };

    Ok(ItemTargets {
        scope,
        products: sets.products,
        collections: sets.collections,
    })
}

fn stored_amount(amount: Option<i64>) -> Result<u64, DiscountsServiceError> {
    let amount = amount.ok_or(DiscountsServiceError::CorruptCatalog)?;

    u64::try_from(amount).map_err(|_negative| DiscountsServiceError::CorruptCatalog)
}

fn non_negative(value: i32) -> Result<u32, DiscountsServiceError> {
    u32::try_from(value).map_err(|_negative| DiscountsServiceError::CorruptCatalog)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn row(method: &str, eligibility: &str) -> DiscountRow {
        DiscountRow {
            uuid: Uuid::now_v7(),
            store_uuid: Uuid::now_v7(),
            kind: "amount-off-order".to_string(),
            method: method.to_string(),
            discount_code: (method == "discount-code").then(|| "SAVE10".to_string()),
            title: (method == "automatic").then(|| "Sale".to_string()),
            eligibility: eligibility.to_string(),
            limit_total_uses: true,
            total_uses_limit: Some(5),
            limit_one_use_per_customer: true,
            start_date: None,
            start_time: None,
            set_end_date: false,
            end_date: None,
            end_time: None,
            status: "active".to_string(),
            combines_with_product_discounts: true,
            combines_with_order_discounts: false,
            combines_with_shipping_discounts: true,
            amount_off_order: Some(AmountOffOrderRow {
                minimum_purchase: "minimum-amount".to_string(),
                minimum_amount: Some(5000),
                minimum_quantity: None,
                value_type: "percentage".to_string(),
                percentage: Some(Decimal::TEN),
                fixed_amount: None,
            }),
            buy_x_get_y: None,
        }
    }

    #[test]
    fn assembles_code_discount_with_limits() -> TestResult {
        let discount = row("discount-code", "all-customers")
            .into_discount(&mut DiscountEntries::default())?;

        assert_eq!(
            discount.method,
            Method::DiscountCode {
                code: "SAVE10".to_string(),
                limits: UsageLimits {
                    total_uses: Some(5),
                    once_per_customer: true,
                },
            }
        );
        assert!(discount.combinations.product_discounts);
        assert!(!discount.combinations.order_discounts);

        let DiscountKind::AmountOffOrder(rules) = discount.kind else {
            return Err("expected an amount off order discount".into());
        };

        assert_eq!(rules.minimum, MinimumPurchase::Amount(5000));
        assert_eq!(rules.value, OrderValue::Percentage(Decimal::TEN));

        Ok(())
    }

    #[test]
    fn segment_eligibility_without_entries_is_empty() -> TestResult {
        let discount = row("automatic", "specific-customer-segments")
            .into_discount(&mut DiscountEntries::default())?;

        assert_eq!(
            discount.eligibility,
            CustomerEligibility::Segments(FxHashSet::default())
        );

        Ok(())
    }

    #[test]
    fn entries_are_grouped_by_discount() -> TestResult {
        let base = row("automatic", "specific-customers");
        let customer = Uuid::now_v7();

        let mut entries = DiscountEntries::new(
            vec![
                EligibilityEntryRow {
                    discount_uuid: base.uuid,
                    customer_segment_uuid: None,
                    customer_uuid: Some(customer),
                },
                EligibilityEntryRow {
                    discount_uuid: Uuid::now_v7(),
                    customer_segment_uuid: None,
                    customer_uuid: Some(Uuid::now_v7()),
                },
            ],
            Vec::new(),
        )?;

        let discount = base.into_discount(&mut entries)?;

        assert_eq!(
            discount.eligibility,
            CustomerEligibility::Customers([CustomerId::from_uuid(customer)].into_iter().collect())
        );

        Ok(())
    }

    #[test]
    fn unknown_item_side_is_corrupt() {
        let result = DiscountEntries::new(
            Vec::new(),
            vec![ItemEntryRow {
                discount_uuid: Uuid::now_v7(),
                side: "sideways".to_string(),
                product_uuid: Some(Uuid::now_v7()),
                collection_uuid: None,
            }],
        );

        assert!(matches!(result, Err(DiscountsServiceError::CorruptCatalog)));
    }

    #[test]
    fn unknown_method_is_corrupt() {
        let result = row("carrier-pigeon", "all-customers")
            .into_discount(&mut DiscountEntries::default());

        assert!(matches!(result, Err(DiscountsServiceError::CorruptCatalog)));
    }

    #[test]
    fn amount_off_order_without_detail_row_is_corrupt() {
        let mut row = row("automatic", "all-customers");
        row.amount_off_order = None;

        let result = row.into_discount(&mut DiscountEntries::default());

        assert!(matches!(result, Err(DiscountsServiceError::CorruptCatalog)));
    }
}

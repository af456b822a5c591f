//! Discount fixtures written straight to the database.

use jiff::civil::Date;
use jiff_sqlx::Date as SqlxDate;
use rust_decimal::Decimal;
use sqlx::{PgPool, query};
use tessera::uuids::{DiscountId, StoreId};

#[derive(Debug, Clone, Copy)]
pub(crate) enum ItemSide {
    Buys,
    Gets,
}

impl ItemSide {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemSide::Buys => "buys",
            ItemSide::Gets => "gets",
        }
    }
}

#[derive(Debug, Clone)]
enum Family {
    AmountOffOrder {
        minimum_amount: Option<i64>,
        percentage: Option<Decimal>,
        fixed_amount: Option<i64>,
    },
    BuyXGetY {
        buys_quantity: i32,
        gets_quantity: i32,
        max_uses_per_order: Option<i32>,
    },
}

/// A discount row plus its family detail row.
#[derive(Debug, Clone)]
pub(crate) struct DiscountFixture {
    id: DiscountId,
    code: Option<String>,
    title: Option<String>,
    eligibility: &'static str,
    total_uses_limit: Option<i32>,
    once_per_customer: bool,
    status: &'static str,
    start_date: Option<Date>,
    end_date: Option<Date>,
    family: Family,
}

impl DiscountFixture {
    fn new(code: Option<&str>, title: Option<&str>, family: Family) -> Self {
        Self {
            id: DiscountId::new(),
            code: code.map(str::to_string),
            title: title.map(str::to_string),
            eligibility: "all-customers",
            total_uses_limit: None,
            once_per_customer: false,
            status: "active",
            start_date: None,
            end_date: None,
            family,
        }
    }

    pub fn automatic_percentage(title: &str, percentage: Decimal) -> Self {
        Self::new(
            None,
            Some(title),
            Family::AmountOffOrder {
                minimum_amount: None,
                percentage: Some(percentage),
                fixed_amount: None,
            },
        )
    }

    pub fn automatic_fixed(title: &str, amount: i64) -> Self {
        Self::new(
            None,
            Some(title),
            Family::AmountOffOrder {
                minimum_amount: None,
                percentage: None,
                fixed_amount: Some(amount),
            },
        )
    }

    pub fn code_fixed(code: &str, amount: i64) -> Self {
        Self::new(
            Some(code),
            None,
            Family::AmountOffOrder {
                minimum_amount: None,
                percentage: None,
                fixed_amount: Some(amount),
            },
        )
    }

    pub fn automatic_buy_x_get_y_free(title: &str, buys_quantity: i32, gets_quantity: i32) -> Self {
        Self::new(
            None,
            Some(title),
            Family::BuyXGetY {
                buys_quantity,
                gets_quantity,
                max_uses_per_order: None,
            },
        )
    }

    pub fn id(&self) -> DiscountId {
        self.id
    }

    pub fn eligibility(mut self, eligibility: &'static str) -> Self {
        self.eligibility = eligibility;
        self
    }

    pub fn total_uses_limit(mut self, limit: i32) -> Self {
        self.total_uses_limit = Some(limit);
        self
    }

    pub fn once_per_customer(mut self) -> Self {
        self.once_per_customer = true;
        self
    }

    pub fn draft(mut self) -> Self {
        self.status = "draft";
        self
    }

    pub fn active_between(mut self, start: Option<Date>, end: Option<Date>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn minimum_amount(mut self, amount: i64) -> Self {
        if let Family::AmountOffOrder { minimum_amount, .. } = &mut self.family {
            *minimum_amount = Some(amount);
        }
        self
    }

    pub fn max_uses_per_order(mut self, max: i32) -> Self {
        if let Family::BuyXGetY {
            max_uses_per_order, ..
        } = &mut self.family
        {
            *max_uses_per_order = Some(max);
        }
        self
    }

    pub async fn insert(self, pool: &PgPool, store: StoreId) -> DiscountId {
        let kind = match self.family {
            Family::AmountOffOrder { .. } => "amount-off-order",
            Family::BuyXGetY { .. } => "buy-x-get-y",
        };

        let method = if self.code.is_some() {
            "discount-code"
        } else {
            "automatic"
        };

        query(
            "INSERT INTO discounts ( \
                uuid, store_uuid, kind, method, discount_code, title, eligibility, \
                limit_total_uses, total_uses_limit, limit_one_use_per_customer, \
                start_date, set_end_date, end_date, status \
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(self.id.into_uuid())
        .bind(store.into_uuid())
        .bind(kind)
        .bind(method)
        .bind(&self.code)
        .bind(&self.title)
        .bind(self.eligibility)
        .bind(self.total_uses_limit.is_some())
        .bind(self.total_uses_limit)
        .bind(self.once_per_customer)
        .bind(self.start_date.map(SqlxDate::from))
        .bind(self.end_date.is_some())
        .bind(self.end_date.map(SqlxDate::from))
        .bind(self.status)
        .execute(pool)
        .await
        .expect("Failed to insert discount");

        match self.family {
            Family::AmountOffOrder {
                minimum_amount,
                percentage,
                fixed_amount,
            } => {
                query(
                    "INSERT INTO amount_off_order_discounts ( \
                        discount_uuid, store_uuid, minimum_purchase, minimum_amount, \
                        value_type, percentage, fixed_amount \
                     ) VALUES ($1, $2, $3, $4, $5, $6, $7)",
                )
                .bind(self.id.into_uuid())
                .bind(store.into_uuid())
                .bind(if minimum_amount.is_some() {
                    "minimum-amount"
                } else {
                    "none"
                })
                .bind(minimum_amount)
                .bind(if percentage.is_some() {
                    "percentage"
                } else {
                    "fixed-amount"
                })
                .bind(percentage)
                .bind(fixed_amount)
                .execute(pool)
                .await
                .expect("Failed to insert amount off order discount");
            }
            Family::BuyXGetY {
                buys_quantity,
                gets_quantity,
                max_uses_per_order,
            } => {
                query(
                    "INSERT INTO buy_x_get_y_discounts ( \
                        discount_uuid, store_uuid, customer_buys, buys_quantity, \
                        buys_items_from, gets_quantity, gets_items_from, discounted_value, \
                        set_max_uses_per_order, max_uses_per_order \
                     ) VALUES ($1, $2, 'minimum-quantity', $3, 'specific-products', $4, \
                               'specific-products', 'free', $5, $6)",
                )
                .bind(self.id.into_uuid())
                .bind(store.into_uuid())
                .bind(buys_quantity)
                .bind(gets_quantity)
                .bind(max_uses_per_order.is_some())
                .bind(max_uses_per_order)
                .execute(pool)
                .await
                .expect("Failed to insert buy x get y discount");
            }
        }

        self.id
    }
}

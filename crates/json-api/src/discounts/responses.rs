//! Discount Responses

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::Serialize;
use tessera::discounts::Combinations;
use tessera_app::domain::discounts::models::{DiscountOffer, EligibilityReport, OfferValue};
use uuid::Uuid;

/// Stacking flags of a discount
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CombinesWithResponse {
    pub product_discounts: bool,
    pub order_discounts: bool,
    pub shipping_discounts: bool,
}

impl From<Combinations> for CombinesWithResponse {
    fn from(combinations: Combinations) -> Self {
        Self {
            product_discounts: combinations.product_discounts,
            order_discounts: combinations.order_discounts,
            shipping_discounts: combinations.shipping_discounts,
        }
    }
}

/// An applicable discount and what it is worth for the cart
///
/// Amount-off-order discounts carry `valueType`; buy-x-get-y discounts carry `discountedValue`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DiscountResponse {
    pub id: Uuid,

    /// `automatic` or `discount-code`
    pub method: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    #[salvo(schema(value_type = Option<f64>))]
    pub percentage: Option<Decimal>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    #[salvo(schema(value_type = Option<f64>))]
    pub fixed_amount: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discounted_value: Option<String>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    #[salvo(schema(value_type = Option<f64>))]
    pub discounted_amount: Option<Decimal>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    #[salvo(schema(value_type = Option<f64>))]
    pub discounted_percentage: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_gets_quantity: Option<u32>,

    /// Units the discount applies to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discounted_units: Option<u64>,

    /// Amount taken off the order
    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub discount_amount: Decimal,

    pub message: String,

    pub combines_with: CombinesWithResponse,
}

impl From<DiscountOffer> for DiscountResponse {
    fn from(offer: DiscountOffer) -> Self {
        let mut response = Self {
            id: offer.id.into_uuid(),
            method: offer.method.to_string(),
            discount_code: offer.discount_code,
            title: offer.title,
            value_type: None,
            percentage: None,
            fixed_amount: None,
            discounted_value: None,
            discounted_amount: None,
            discounted_percentage: None,
            customer_gets_quantity: None,
            discounted_units: None,
            discount_amount: offer.discount_amount,
            message: offer.message,
            combines_with: offer.combines_with.into(),
        };

        match offer.value {
            OfferValue::AmountOffOrder {
                value_type,
                percentage,
                fixed_amount,
            } => {
                response.value_type = Some(value_type.to_string());
                response.percentage = percentage;
                response.fixed_amount = fixed_amount;
            }
            OfferValue::BuyXGetY {
                discounted_value,
                discounted_amount,
                discounted_percentage,
                customer_gets_quantity,
                discounted_units,
            } => {
                response.discounted_value = Some(discounted_value.to_string());
                response.discounted_amount = discounted_amount;
                response.discounted_percentage = discounted_percentage;
                response.customer_gets_quantity = Some(customer_gets_quantity);
                response.discounted_units = Some(discounted_units);
            }
        }

        response
    }
}

/// Ranked automatic discounts with cart totals
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EligibilityData {
    pub eligible_discounts: Vec<DiscountResponse>,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub cart_total: Decimal,

    pub total_quantity: u64,
}

/// Check Discounts Response
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CheckDiscountsResponse {
    pub success: bool,
    pub data: EligibilityData,
    pub message: String,
}

impl From<EligibilityReport> for CheckDiscountsResponse {
    fn from(report: EligibilityReport) -> Self {
        let message = match report.discounts.len() {
            0 => "No eligible discounts found".to_string(),
            1 => "Found 1 eligible discount".to_string(),
            count => format!("Found {count} eligible discounts"),
        };

        Self {
            success: true,
            data: EligibilityData {
                eligible_discounts: report.discounts.into_iter().map(Into::into).collect(),
                cart_total: report.cart_total,
                total_quantity: report.total_quantity,
            },
            message,
        }
    }
}

/// A valid code with cart totals
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValidatedCodeData {
    pub discount: DiscountResponse,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub cart_total: Decimal,

    pub total_quantity: u64,
}

/// Validate Code Response
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ValidateCodeResponse {
    pub success: bool,
    pub data: ValidatedCodeData,
    pub message: String,
}

/// Recorded usage id
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct RecordedUsage {
    pub id: Uuid,
}

/// Usage Recorded Response
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UsageRecordedResponse {
    pub success: bool,
    pub data: RecordedUsage,
}

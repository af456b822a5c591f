//! Discount Requests
//!
//! Bodies are deserialised loosely and validated field by field so each problem gets its own
//! message, in the order storefront integrators are used to.

mod fields;

use salvo::Request;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tessera::uuids::{CollectionId, UsageId};
use tessera_app::domain::discounts::data::{CartLine, Checkout, NewUsage};

use crate::{errors::ApiError, extensions::*};

use self::fields::{non_negative_amount, optional_id, positive_quantity, required_id};

pub(crate) const INVALID_JSON: &str = "Request body must be valid JSON";
pub(crate) const INVALID_STORE: &str = "Valid storeId is required";
pub(crate) const INVALID_CUSTOMER: &str = "Valid customerId is required";
pub(crate) const INVALID_CART: &str = "cartItems must be a non-empty array";
pub(crate) const INVALID_CART_ITEM: &str =
    "Each cart item requires a non-negative price and a positive quantity";
pub(crate) const INVALID_PRODUCT: &str = "Cart item productId must be a valid id";
pub(crate) const INVALID_COLLECTIONS: &str = "Cart item collectionIds must be an array of valid ids";
pub(crate) const MISSING_CODE: &str = "discountCode is required";
pub(crate) const INVALID_DISCOUNT: &str = "Valid discountId is required";
pub(crate) const INVALID_ORDER: &str = "orderId must be a valid id";
pub(crate) const INVALID_AMOUNT: &str = "discountAmount must be a non-negative number";

/// Read the body as JSON into `T`.
pub(crate) async fn parse_body<T: DeserializeOwned>(req: &mut Request) -> Result<T, ApiError> {
    req.parse_json::<T>().await.or_400(INVALID_JSON)
}

/// Body of the eligibility check endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckDiscountsRequest {
    store_id: Option<Value>,
    customer_id: Option<Value>,
    cart_items: Option<Value>,
}

impl TryFrom<CheckDiscountsRequest> for Checkout {
    type Error = ApiError;

    fn try_from(request: CheckDiscountsRequest) -> Result<Self, Self::Error> {
        let store = required_id(request.store_id.as_ref(), INVALID_STORE)?;
        let customer = required_id(request.customer_id.as_ref(), INVALID_CUSTOMER)?;

        let items = match request.cart_items {
            Some(Value::Array(items)) if !items.is_empty() => items,
            _ => return Err(ApiError::bad_request(INVALID_CART)),
        };

        let lines = items
            .iter()
            .map(cart_line)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Checkout {
            store,
            customer,
            lines,
        })
    }
}

fn cart_line(item: &Value) -> Result<CartLine, ApiError> {
    let Value::Object(item) = item else {
        return Err(ApiError::bad_request(INVALID_CART_ITEM));
    };

    let price = non_negative_amount(item.get("price"));
    let quantity = positive_quantity(item.get("quantity"));

    let (Some(price), Some(quantity)) = (price, quantity) else {
        return Err(ApiError::bad_request(INVALID_CART_ITEM));
    };

    let product = optional_id(item.get("productId"), INVALID_PRODUCT)?;

    let collections = match item.get("collectionIds") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(ids)) => ids
            .iter()
            .map(|id| required_id::<_>(Some(id), INVALID_COLLECTIONS))
            .collect::<Result<Vec<CollectionId>, _>>()?,
        Some(_) => return Err(ApiError::bad_request(INVALID_COLLECTIONS)),
    };

    Ok(CartLine {
        product,
        collections,
        price,
        quantity,
    })
}

/// Body of the code validation endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValidateCodeRequest {
    #[serde(flatten)]
    checkout: CheckDiscountsRequest,

    discount_code: Option<Value>,
}

impl ValidateCodeRequest {
    /// Split into the checkout and the code as entered.
    pub(crate) fn into_parts(self) -> Result<(Checkout, String), ApiError> {
        let checkout = Checkout::try_from(self.checkout)?;

        match self.discount_code {
            Some(Value::String(code)) if !code.is_empty() => Ok((checkout, code)),
            _ => Err(ApiError::bad_request(MISSING_CODE)),
        }
    }
}

/// Body of the usage recording endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecordUsageRequest {
    store_id: Option<Value>,
    customer_id: Option<Value>,
    discount_id: Option<Value>,
    order_id: Option<Value>,
    discount_amount: Option<Value>,
}

impl TryFrom<RecordUsageRequest> for NewUsage {
    type Error = ApiError;

    fn try_from(request: RecordUsageRequest) -> Result<Self, Self::Error> {
        Ok(NewUsage {
            uuid: UsageId::new(),
            store: required_id(request.store_id.as_ref(), INVALID_STORE)?,
            customer: required_id(request.customer_id.as_ref(), INVALID_CUSTOMER)?,
            discount: required_id(request.discount_id.as_ref(), INVALID_DISCOUNT)?,
            order: optional_id(request.order_id.as_ref(), INVALID_ORDER)?,
            discount_amount: non_negative_amount(request.discount_amount.as_ref())
                .ok_or_else(|| ApiError::bad_request(INVALID_AMOUNT))?,
        })
    }
}

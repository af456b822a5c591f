//! Field validation for loosely typed request bodies.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;
use tessera::uuids::TypedUuid;
use uuid::Uuid;

use crate::errors::ApiError;

/// A required id sent as a UUID string.
pub(super) fn required_id<T>(
    value: Option<&Value>,
    error: &'static str,
) -> Result<TypedUuid<T>, ApiError> {
    optional_id(value, error)?.ok_or_else(|| ApiError::bad_request(error))
}

/// An optional id; `null` counts as absent.
pub(super) fn optional_id<T>(
    value: Option<&Value>,
    error: &'static str,
) -> Result<Option<TypedUuid<T>>, ApiError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => Uuid::parse_str(raw.trim())
            .map(|uuid| Some(TypedUuid::from_uuid(uuid)))
            .map_err(|_invalid| ApiError::bad_request(error)),
        Some(_) => Err(ApiError::bad_request(error)),
    }
}

/// A non-negative JSON number, kept exact.
pub(super) fn non_negative_amount(value: Option<&Value>) -> Option<Decimal> {
    let Some(Value::Number(number)) = value else {
        return None;
    };

    let text = number.to_string();

    let amount = Decimal::from_str(&text)
        .or_else(|_plain| Decimal::from_scientific(&text))
        .ok()?;

    (!amount.is_sign_negative() || amount.is_zero()).then_some(amount.normalize())
}

/// A positive whole JSON number that fits a line quantity.
pub(super) fn positive_quantity(value: Option<&Value>) -> Option<u32> {
    value
        .and_then(Value::as_u64)
        .and_then(|quantity| u32::try_from(quantity).ok())
        .filter(|quantity| *quantity > 0)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tessera::uuids::StoreId;

    use super::*;

    #[test]
    fn ids_must_be_uuid_strings() {
        let uuid = Uuid::now_v7();

        let parsed: Result<StoreId, _> = required_id(Some(&json!(uuid.to_string())), "bad");

        assert_eq!(parsed.ok().map(StoreId::into_uuid), Some(uuid));
        assert!(required_id::<()>(Some(&json!(42)), "bad").is_err());
        assert!(required_id::<()>(Some(&json!("store-1")), "bad").is_err());
        assert!(required_id::<()>(None, "bad").is_err());
        assert!(matches!(optional_id::<()>(Some(&Value::Null), "bad"), Ok(None)));
    }

    #[test]
    fn amounts_stay_exact() {
        assert_eq!(
            non_negative_amount(Some(&json!(19.99))),
            Some(Decimal::new(1999, 2))
        );
        assert_eq!(non_negative_amount(Some(&json!(0))), Some(Decimal::ZERO));
        assert_eq!(non_negative_amount(Some(&json!(-1))), None);
        assert_eq!(non_negative_amount(Some(&json!("10"))), None);
    }

    #[test]
    fn quantities_are_positive_integers() {
        assert_eq!(positive_quantity(Some(&json!(3))), Some(3));
        assert_eq!(positive_quantity(Some(&json!(0))), None);
        assert_eq!(positive_quantity(Some(&json!(1.5))), None);
        assert_eq!(positive_quantity(Some(&json!(-2))), None);
    }
}

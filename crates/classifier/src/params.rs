//! Positional lookups of transfer parameters in decoded call data.

use alloy::primitives::Address;
use serde_json::Value;

use crate::types::DataDecoded;

pub const TRANSFER_METHOD: &str = "transfer";
pub const TRANSFER_FROM_METHOD: &str = "transferFrom";
pub const SAFE_TRANSFER_FROM_METHOD: &str = "safeTransferFrom";

/// Sender of a transfer, when the call names one explicitly.
pub fn from_param(decoded: &DataDecoded) -> Option<Address> {
    match decoded.method.as_str() {
        TRANSFER_FROM_METHOD | SAFE_TRANSFER_FROM_METHOD => address_at(decoded, 0),
        _ => None,
    }
}

/// Recipient of a transfer.
pub fn to_param(decoded: &DataDecoded) -> Option<Address> {
    match decoded.method.as_str() {
        TRANSFER_METHOD => address_at(decoded, 0),
        TRANSFER_FROM_METHOD | SAFE_TRANSFER_FROM_METHOD => address_at(decoded, 1),
        _ => None,
    }
}

/// Amount (ERC-20) or token id (ERC-721) of a transfer.
pub fn value_param(decoded: &DataDecoded) -> Option<String> {
    match decoded.method.as_str() {
        TRANSFER_METHOD => scalar_at(decoded, 1),
        TRANSFER_FROM_METHOD | SAFE_TRANSFER_FROM_METHOD => scalar_at(decoded, 2),
        _ => None,
    }
}

pub fn address_at(decoded: &DataDecoded, index: usize) -> Option<Address> {
    decoded.parameter(index)?.value.as_str()?.parse().ok()
}

pub fn scalar_at(decoded: &DataDecoded, index: usize) -> Option<String> {
    match &decoded.parameter(index)?.value {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

pub fn u64_at(decoded: &DataDecoded, index: usize) -> Option<u64> {
    scalar_at(decoded, index)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FROM: &str = "0x1111111111111111111111111111111111111111";
    const TO: &str = "0x2222222222222222222222222222222222222222";

    fn decoded(method: &str, values: &[Value]) -> DataDecoded {
        let parameters = values
            .iter()
            .enumerate()
            .map(|(i, value)| json!({"name": format!("p{}", i), "type": "address", "value": value}))
            .collect::<Vec<_>>();
        serde_json::from_value(json!({"method": method, "parameters": parameters})).unwrap()
    }

    #[test]
    fn test_transfer_params() {
        let decoded = decoded(TRANSFER_METHOD, &[json!(TO), json!("1000")]);
        assert_eq!(from_param(&decoded), None);
        assert_eq!(to_param(&decoded), TO.parse().ok());
        assert_eq!(value_param(&decoded).as_deref(), Some("1000"));
    }

    #[test]
    fn test_transfer_from_params() {
        for method in [TRANSFER_FROM_METHOD, SAFE_TRANSFER_FROM_METHOD] {
            let decoded = decoded(method, &[json!(FROM), json!(TO), json!(42)]);
            assert_eq!(from_param(&decoded), FROM.parse().ok());
            assert_eq!(to_param(&decoded), TO.parse().ok());
            assert_eq!(value_param(&decoded).as_deref(), Some("42"));
        }
    }

    #[test]
    fn test_other_methods_and_bad_values() {
        let approve = decoded("approve", &[json!(TO), json!("1")]);
        assert_eq!(to_param(&approve), None);
        assert_eq!(value_param(&approve), None);

        let garbled = decoded(TRANSFER_FROM_METHOD, &[json!("0xnope"), json!(7)]);
        assert_eq!(from_param(&garbled), None);
        assert_eq!(to_param(&garbled), None);
        assert_eq!(value_param(&garbled), None);
    }
}

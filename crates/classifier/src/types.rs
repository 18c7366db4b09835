//! Transaction records and token metadata consumed by the classifier.

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// How a Safe transaction executes its call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OperationRepr", into = "u8")]
pub enum Operation {
    /// Executes in the callee's own context.
    Call,
    /// Executes the callee's code against the Safe's storage.
    DelegateCall,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OperationRepr {
    Code(u8),
    Name(String),
}

impl TryFrom<OperationRepr> for Operation {
    type Error = String;

    fn try_from(repr: OperationRepr) -> Result<Self, Self::Error> {
        match repr {
            OperationRepr::Code(0) => Ok(Operation::Call),
            OperationRepr::Code(1) => Ok(Operation::DelegateCall),
            OperationRepr::Code(code) => Err(format!("unknown operation code {}", code)),
            OperationRepr::Name(name) => match name.to_ascii_uppercase().as_str() {
                "CALL" => Ok(Operation::Call),
                "DELEGATECALL" | "DELEGATE_CALL" => Ok(Operation::DelegateCall),
                _ => Err(format!("unknown operation {}", name)),
            },
        }
    }
}

impl From<Operation> for u8 {
    fn from(operation: Operation) -> Self {
        match operation {
            Operation::Call => 0,
            Operation::DelegateCall => 1,
        }
    }
}

/// A single decoded call parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataDecodedParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_decoded: Option<Value>,
}

/// Method name and parameters recovered from call data upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataDecoded {
    pub method: String,
    #[serde(default)]
    pub parameters: Option<Vec<DataDecodedParameter>>,
}

impl DataDecoded {
    /// Parameter at `index`, if the decoder produced one.
    pub fn parameter(&self, index: usize) -> Option<&DataDecodedParameter> {
        self.parameters.as_ref()?.get(index)
    }

    /// First parameter called `name`.
    pub fn parameter_named(&self, name: &str) -> Option<&DataDecodedParameter> {
        self.parameters.as_ref()?.iter().find(|p| p.name == name)
    }
}

/// An owner's approval of a multisig transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub owner: Address,
    #[serde(default)]
    pub submission_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub signature: Option<String>,
}

/// A multisig or module transaction as returned by the transaction service.
///
/// Module transactions carry no `confirmations`; multisig transactions do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Safe the transaction executes on behalf of.
    pub safe: Address,
    /// Call target.
    pub to: Address,
    /// Native value in wei. Transaction services send it as a string.
    #[serde(default, deserialize_with = "deserialize_value")]
    pub value: Option<String>,
    /// `0x`-prefixed call data.
    #[serde(default)]
    pub data: Option<String>,
    pub operation: Operation,
    #[serde(default)]
    pub data_decoded: Option<DataDecoded>,
    #[serde(default)]
    pub confirmations: Option<Vec<Confirmation>>,
    #[serde(default)]
    pub confirmations_required: Option<u64>,
    #[serde(default)]
    pub execution_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub transaction_hash: Option<String>,
}

impl TransactionRecord {
    /// Call data, treating an empty string as absent.
    pub fn call_data(&self) -> Option<&str> {
        self.data.as_deref().filter(|data| !data.is_empty())
    }

    /// Whether enough owners have confirmed. Module transactions never are.
    pub fn is_confirmed(&self) -> bool {
        match (&self.confirmations, self.confirmations_required) {
            (Some(confirmations), Some(required)) => confirmations.len() as u64 >= required,
            _ => false,
        }
    }
}

fn deserialize_value<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(value)) => Some(value),
        // Integers past u64 arrive as f64; render them without an exponent.
        Some(Value::Number(value)) => Some(match (value.as_u64(), value.as_f64()) {
            (Some(integer), _) => integer.to_string(),
            (None, Some(float)) if float.is_finite() && float.fract() == 0.0 => format!("{:.0}", float),
            _ => value.to_string(),
        }),
        _ => None,
    })
}

/// Kind of contract behind a token address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenType {
    #[serde(rename = "ERC20")]
    Erc20,
    #[serde(rename = "ERC721")]
    Erc721,
    #[serde(rename = "NATIVE_TOKEN")]
    NativeToken,
    #[serde(rename = "UNKNOWN", other)]
    Unknown,
}

/// Token metadata as served by the token repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub address: Address,
    #[serde(default)]
    pub decimals: Option<u8>,
    #[serde(default)]
    pub logo_uri: Option<String>,
    pub name: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(extra: Value) -> TransactionRecord {
        let mut base = json!({
            "safe": "0x1111111111111111111111111111111111111111",
            "to": "0x2222222222222222222222222222222222222222",
            "operation": 0,
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        serde_json::from_value(base).unwrap()
    }

    #[test]
    fn test_value_accepts_strings_and_numbers() {
        assert_eq!(record(json!({"value": "100"})).value.as_deref(), Some("100"));
        assert_eq!(record(json!({"value": 7})).value.as_deref(), Some("7"));
        assert_eq!(
            record(json!({"value": 32000000000000000000u128 as f64})).value.as_deref(),
            Some("32000000000000000000")
        );
        assert_eq!(record(json!({"value": 1.5})).value.as_deref(), Some("1.5"));
        assert_eq!(record(json!({"value": null})).value, None);
        assert_eq!(record(json!({})).value, None);
    }

    #[test]
    fn test_operation_codes_and_names() {
        assert_eq!(record(json!({"operation": 1})).operation, Operation::DelegateCall);
        assert_eq!(record(json!({"operation": "CALL"})).operation, Operation::Call);
        let invalid = serde_json::from_value::<Operation>(json!(2));
        assert!(invalid.is_err());
    }

    #[test]
    fn test_is_confirmed_requires_confirmations() {
        let owner = json!({"owner": "0x3333333333333333333333333333333333333333"});
        assert!(!record(json!({"confirmationsRequired": 1})).is_confirmed());
        assert!(!record(json!({"confirmations": [owner], "confirmationsRequired": 2})).is_confirmed());
        assert!(record(json!({"confirmations": [owner, owner], "confirmationsRequired": 2})).is_confirmed());
        assert!(record(json!({"confirmations": [], "confirmationsRequired": 0})).is_confirmed());
    }

    #[test]
    fn test_unknown_token_type() {
        let token: Token = serde_json::from_value(json!({
            "address": "0x4444444444444444444444444444444444444444",
            "name": "Odd",
            "symbol": "ODD",
            "type": "ERC1155",
        }))
        .unwrap();
        assert_eq!(token.token_type, TokenType::Unknown);
    }
}

//! Builders for the category payloads.

use alloy::primitives::Address;

use crate::info::{
    CustomTransaction, Erc20Transfer, Erc721Transfer, NativeCoinTransfer, SettingsChangeTransaction,
    SettingsInfo, TransferDirection,
};
use crate::params::{self, address_at, u64_at};
use crate::size::ClassificationInputs;
use crate::types::{DataDecoded, Operation, Token, TransactionRecord};

const MULTI_SEND_METHOD: &str = "multiSend";
const MULTI_SEND_TRANSACTIONS_PARAM: &str = "transactions";

pub fn custom_transaction(
    transaction: &TransactionRecord,
    inputs: &ClassificationInputs,
) -> CustomTransaction {
    let decoded = transaction.data_decoded.as_ref();
    CustomTransaction {
        to: transaction.to,
        data_size: inputs.data_size,
        value: inputs.value.to_string(),
        method_name: decoded.map(|decoded| decoded.method.clone()),
        action_count: decoded.and_then(action_count),
        is_cancellation: transaction.to == transaction.safe
            && !inputs.has_data()
            && !inputs.has_value()
            && transaction.operation == Operation::Call,
    }
}

fn action_count(decoded: &DataDecoded) -> Option<usize> {
    if decoded.method != MULTI_SEND_METHOD {
        return None;
    }
    decoded
        .parameter_named(MULTI_SEND_TRANSACTIONS_PARAM)?
        .value_decoded
        .as_ref()?
        .as_array()
        .map(Vec::len)
}

pub fn native_coin_transfer(
    transaction: &TransactionRecord,
    inputs: &ClassificationInputs,
) -> NativeCoinTransfer {
    NativeCoinTransfer {
        sender: transaction.safe,
        recipient: transaction.to,
        direction: TransferDirection::Outgoing,
        value: inputs.value.to_string(),
    }
}

pub fn settings_change(decoded: &DataDecoded) -> SettingsChangeTransaction {
    SettingsChangeTransaction {
        data_decoded: decoded.clone(),
        settings_info: settings_info(decoded),
    }
}

fn settings_info(decoded: &DataDecoded) -> Option<SettingsInfo> {
    let info = match decoded.method.as_str() {
        "setFallbackHandler" => SettingsInfo::SetFallbackHandler {
            handler: address_at(decoded, 0)?,
        },
        "addOwnerWithThreshold" => SettingsInfo::AddOwner {
            owner: address_at(decoded, 0)?,
            threshold: u64_at(decoded, 1)?,
        },
        "removeOwner" => SettingsInfo::RemoveOwner {
            owner: address_at(decoded, 1)?,
            threshold: u64_at(decoded, 2)?,
        },
        "swapOwner" => SettingsInfo::SwapOwner {
            old_owner: address_at(decoded, 1)?,
            new_owner: address_at(decoded, 2)?,
        },
        "changeThreshold" => SettingsInfo::ChangeThreshold {
            threshold: u64_at(decoded, 0)?,
        },
        "changeMasterCopy" => SettingsInfo::ChangeImplementation {
            implementation: address_at(decoded, 0)?,
        },
        "enableModule" => SettingsInfo::EnableModule {
            module: address_at(decoded, 0)?,
        },
        "disableModule" => SettingsInfo::DisableModule {
            module: address_at(decoded, 1)?,
        },
        "setGuard" => match address_at(decoded, 0)? {
            guard if guard.is_zero() => SettingsInfo::DeleteGuard,
            guard => SettingsInfo::SetGuard { guard },
        },
        _ => return None,
    };
    Some(info)
}

struct TransferParties {
    sender: Address,
    recipient: Address,
    direction: TransferDirection,
}

fn transfer_parties(transaction: &TransactionRecord, decoded: &DataDecoded) -> TransferParties {
    let sender = params::from_param(decoded).unwrap_or(transaction.safe);
    let recipient = params::to_param(decoded).unwrap_or(transaction.safe);
    TransferParties {
        sender,
        recipient,
        direction: TransferDirection::relative_to(transaction.safe, sender, recipient),
    }
}

pub fn erc20_transfer(transaction: &TransactionRecord, decoded: &DataDecoded, token: Token) -> Erc20Transfer {
    let parties = transfer_parties(transaction, decoded);
    Erc20Transfer {
        sender: parties.sender,
        recipient: parties.recipient,
        direction: parties.direction,
        token_address: token.address,
        token_name: token.name,
        token_symbol: token.symbol,
        logo_uri: token.logo_uri,
        decimals: token.decimals,
        value: params::value_param(decoded).unwrap_or_else(|| "0".to_string()),
    }
}

pub fn erc721_transfer(transaction: &TransactionRecord, decoded: &DataDecoded, token: Token) -> Erc721Transfer {
    let parties = transfer_parties(transaction, decoded);
    Erc721Transfer {
        sender: parties.sender,
        recipient: parties.recipient,
        direction: parties.direction,
        token_address: token.address,
        token_name: token.name,
        token_symbol: token.symbol,
        logo_uri: token.logo_uri,
        token_id: params::value_param(decoded).unwrap_or_else(|| "0".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    const SAFE: &str = "0x1111111111111111111111111111111111111111";
    const OWNER: &str = "0x2222222222222222222222222222222222222222";
    const SENTINEL: &str = "0x0000000000000000000000000000000000000001";

    fn decoded(method: &str, values: &[Value]) -> DataDecoded {
        let parameters: Vec<Value> = values
            .iter()
            .map(|value| json!({"name": "p", "type": "address", "value": value}))
            .collect();
        serde_json::from_value(json!({"method": method, "parameters": parameters})).unwrap()
    }

    fn record(value: &str, data: &str, decoded: Option<DataDecoded>) -> TransactionRecord {
        let mut record: TransactionRecord = serde_json::from_value(json!({
            "safe": SAFE,
            "to": SAFE,
            "operation": 0,
            "value": value,
            "data": data,
        }))
        .unwrap();
        record.data_decoded = decoded;
        record
    }

    #[test]
    fn test_settings_info() {
        let owner: Address = OWNER.parse().unwrap();
        assert_eq!(
            settings_info(&decoded("addOwnerWithThreshold", &[json!(OWNER), json!("2")])),
            Some(SettingsInfo::AddOwner { owner, threshold: 2 })
        );
        assert_eq!(
            settings_info(&decoded("removeOwner", &[json!(SENTINEL), json!(OWNER), json!(1)])),
            Some(SettingsInfo::RemoveOwner { owner, threshold: 1 })
        );
        assert_eq!(
            settings_info(&decoded("setGuard", &[json!(Address::ZERO.to_string())])),
            Some(SettingsInfo::DeleteGuard)
        );
        assert_eq!(settings_info(&decoded("changeThreshold", &[json!("many")])), None);
        assert_eq!(settings_info(&decoded("execTransaction", &[])), None);
    }

    #[test]
    fn test_cancellation() {
        let cancellation = record("0", "0x", None);
        let inputs = ClassificationInputs::compute(&cancellation);
        assert!(custom_transaction(&cancellation, &inputs).is_cancellation);

        let with_value = record("1", "0x", None);
        let inputs = ClassificationInputs::compute(&with_value);
        assert!(!custom_transaction(&with_value, &inputs).is_cancellation);
    }

    #[test]
    fn test_multi_send_action_count() {
        let multi_send: DataDecoded = serde_json::from_value(json!({
            "method": "multiSend",
            "parameters": [{
                "name": "transactions",
                "type": "bytes",
                "value": "0x00",
                "valueDecoded": [{}, {}, {}],
            }],
        }))
        .unwrap();
        let transaction = record("0", "0x8d80ff0a00", Some(multi_send));
        let inputs = ClassificationInputs::compute(&transaction);
        let custom = custom_transaction(&transaction, &inputs);
        assert_eq!(custom.action_count, Some(3));
        assert_eq!(custom.method_name.as_deref(), Some("multiSend"));
        assert_eq!(custom.data_size, 5);
    }
}

//! Typed descriptions produced by the classifier.

use alloy::primitives::Address;
use serde::Serialize;

use crate::description::RichDecodedInfo;
use crate::orders::{NativeStakingDepositInfo, SwapOrderInfo, TwapOrderInfo};
use crate::types::DataDecoded;

/// Classification result: exactly one category plus the shared
/// human-readable description.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInfo {
    #[serde(flatten)]
    pub details: TransactionDetails,
    pub human_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rich_decoded_info: Option<RichDecodedInfo>,
}

impl TransactionInfo {
    pub fn kind(&self) -> TransactionKind {
        self.details.kind()
    }
}

/// Category-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TransactionDetails {
    Custom(CustomTransaction),
    NativeCoinTransfer(NativeCoinTransfer),
    SettingsChange(SettingsChangeTransaction),
    Erc20Transfer(Erc20Transfer),
    Erc721Transfer(Erc721Transfer),
    SwapOrder(SwapOrderInfo),
    TwapOrder(TwapOrderInfo),
    NativeStakingDeposit(NativeStakingDepositInfo),
}

impl TransactionDetails {
    pub fn kind(&self) -> TransactionKind {
        match self {
            TransactionDetails::Custom(_) => TransactionKind::Custom,
            TransactionDetails::NativeCoinTransfer(_) => TransactionKind::NativeCoinTransfer,
            TransactionDetails::SettingsChange(_) => TransactionKind::SettingsChange,
            TransactionDetails::Erc20Transfer(_) => TransactionKind::Erc20Transfer,
            TransactionDetails::Erc721Transfer(_) => TransactionKind::Erc721Transfer,
            TransactionDetails::SwapOrder(_) => TransactionKind::SwapOrder,
            TransactionDetails::TwapOrder(_) => TransactionKind::TwapOrder,
            TransactionDetails::NativeStakingDeposit(_) => TransactionKind::NativeStakingDeposit,
        }
    }
}

/// Category tag, used for logging and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Custom,
    NativeCoinTransfer,
    SettingsChange,
    Erc20Transfer,
    Erc721Transfer,
    SwapOrder,
    TwapOrder,
    NativeStakingDeposit,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Custom => "custom",
            TransactionKind::NativeCoinTransfer => "native_coin_transfer",
            TransactionKind::SettingsChange => "settings_change",
            TransactionKind::Erc20Transfer => "erc20_transfer",
            TransactionKind::Erc721Transfer => "erc721_transfer",
            TransactionKind::SwapOrder => "swap_order",
            TransactionKind::TwapOrder => "twap_order",
            TransactionKind::NativeStakingDeposit => "native_staking_deposit",
        }
    }
}

/// Direction of a transfer relative to the Safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferDirection {
    Incoming,
    Outgoing,
    Unknown,
}

impl TransferDirection {
    pub fn relative_to(safe: Address, sender: Address, recipient: Address) -> Self {
        if sender == safe {
            TransferDirection::Outgoing
        } else if recipient == safe {
            TransferDirection::Incoming
        } else {
            TransferDirection::Unknown
        }
    }
}

/// Any call the classifier can't describe more precisely.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTransaction {
    pub to: Address,
    pub data_size: usize,
    pub value: String,
    pub method_name: Option<String>,
    /// Number of batched calls for `multiSend`.
    pub action_count: Option<usize>,
    pub is_cancellation: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeCoinTransfer {
    pub sender: Address,
    pub recipient: Address,
    pub direction: TransferDirection,
    pub value: String,
}

/// A call by the Safe to itself changing its own configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsChangeTransaction {
    pub data_decoded: DataDecoded,
    pub settings_info: Option<SettingsInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettingsInfo {
    SetFallbackHandler { handler: Address },
    #[serde(rename_all = "camelCase")]
    AddOwner { owner: Address, threshold: u64 },
    #[serde(rename_all = "camelCase")]
    RemoveOwner { owner: Address, threshold: u64 },
    #[serde(rename_all = "camelCase")]
    SwapOwner { old_owner: Address, new_owner: Address },
    ChangeThreshold { threshold: u64 },
    ChangeImplementation { implementation: Address },
    EnableModule { module: Address },
    DisableModule { module: Address },
    SetGuard { guard: Address },
    DeleteGuard,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc20Transfer {
    pub sender: Address,
    pub recipient: Address,
    pub direction: TransferDirection,
    pub token_address: Address,
    pub token_name: String,
    pub token_symbol: String,
    pub logo_uri: Option<String>,
    pub decimals: Option<u8>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc721Transfer {
    pub sender: Address,
    pub recipient: Address,
    pub direction: TransferDirection,
    pub token_address: Address,
    pub token_name: String,
    pub token_symbol: String,
    pub logo_uri: Option<String>,
    pub token_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_direction() {
        let safe = Address::from([1; 20]);
        let other = Address::from([2; 20]);
        assert_eq!(TransferDirection::relative_to(safe, safe, other), TransferDirection::Outgoing);
        assert_eq!(TransferDirection::relative_to(safe, other, safe), TransferDirection::Incoming);
        assert_eq!(TransferDirection::relative_to(safe, other, other), TransferDirection::Unknown);
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let info = TransactionInfo {
            details: TransactionDetails::Custom(CustomTransaction {
                to: Address::ZERO,
                data_size: 4,
                value: "0".to_string(),
                method_name: Some("approve".to_string()),
                action_count: None,
                is_cancellation: false,
            }),
            human_description: None,
            rich_decoded_info: None,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"], "Custom");
        assert_eq!(json["dataSize"], 4);
        assert_eq!(json["methodName"], "approve");
        assert!(json.get("richDecodedInfo").is_none());
        assert!(json["humanDescription"].is_null());
    }
}

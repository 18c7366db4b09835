//! Human-readable transaction descriptions.

use alloy::primitives::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::TransactionRecord;

/// Piece of a rich description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RichFragment {
    Text {
        value: String,
    },
    #[serde(rename_all = "camelCase")]
    TokenValue {
        value: String,
        symbol: Option<String>,
        logo_uri: Option<String>,
    },
    Address {
        value: Address,
    },
}

impl RichFragment {
    fn plain_text(&self) -> String {
        match self {
            RichFragment::Text { value } => value.clone(),
            RichFragment::TokenValue { value, symbol: Some(symbol), .. } => format!("{} {}", value, symbol),
            RichFragment::TokenValue { value, symbol: None, .. } => value.clone(),
            RichFragment::Address { value } => value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichDecodedInfo {
    pub fragments: Vec<RichFragment>,
}

/// Builds human-readable descriptions of transactions.
#[async_trait]
pub trait HumanDescriptionMapper: Send + Sync {
    /// Derive rich fragments for a transaction. Implementations absorb their
    /// own failures and return `None`.
    async fn map_rich_decoded_info(
        &self,
        transaction: &TransactionRecord,
        chain_id: &str,
    ) -> Option<RichDecodedInfo>;

    /// Flatten fragments into a single sentence.
    fn map_human_description(&self, info: &RichDecodedInfo) -> Option<String> {
        if info.fragments.is_empty() {
            return None;
        }
        let words: Vec<String> = info.fragments.iter().map(RichFragment::plain_text).collect();
        Some(words.join(" "))
    }
}

/// Mapper that never describes anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHumanDescription;

#[async_trait]
impl HumanDescriptionMapper for NoHumanDescription {
    async fn map_rich_decoded_info(
        &self,
        _transaction: &TransactionRecord,
        _chain_id: &str,
    ) -> Option<RichDecodedInfo> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_fragments() {
        let info = RichDecodedInfo {
            fragments: vec![
                RichFragment::Text { value: "Send".to_string() },
                RichFragment::TokenValue {
                    value: "10".to_string(),
                    symbol: Some("USDC".to_string()),
                    logo_uri: None,
                },
                RichFragment::Text { value: "to".to_string() },
                RichFragment::Address { value: Address::ZERO },
            ],
        };
        assert_eq!(
            NoHumanDescription.map_human_description(&info).as_deref(),
            Some("Send 10 USDC to 0x0000000000000000000000000000000000000000")
        );
    }

    #[test]
    fn test_empty_fragments_have_no_description() {
        let info = RichDecodedInfo { fragments: vec![] };
        assert_eq!(NoHumanDescription.map_human_description(&info), None);
    }
}

//! Numeric inputs derived once per classification.

use std::str::FromStr;

use alloy::primitives::U256;
use rust_decimal::Decimal;

use crate::types::TransactionRecord;

/// Native value and call-data size of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationInputs {
    /// Native value in wei; zero when absent or unparsable.
    pub value: U256,
    /// Call-data bytes, excluding the `0x` prefix.
    pub data_size: usize,
}

impl ClassificationInputs {
    pub fn compute(transaction: &TransactionRecord) -> Self {
        Self {
            value: parse_value(transaction.value.as_deref()),
            data_size: data_size(transaction.data.as_deref()),
        }
    }

    pub fn has_value(&self) -> bool {
        !self.value.is_zero()
    }

    pub fn has_data(&self) -> bool {
        self.data_size > 0
    }
}

/// Parse a decimal or `0x` hex value, falling back to zero.
///
/// Fractional and exponent forms (`"1.5"`, `"1e18"`) are truncated to whole
/// wei; any positive amount stays at least 1 so it still counts as value.
pub fn parse_value(raw: Option<&str>) -> U256 {
    let Some(raw) = raw.map(str::trim) else {
        return U256::ZERO;
    };
    if let Ok(value) = raw.parse::<U256>() {
        return value;
    }

    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
        .filter(|value| value.is_sign_positive() && !value.is_zero())
        .map(|value| {
            value
                .trunc()
                .normalize()
                .to_string()
                .parse::<U256>()
                .unwrap_or(U256::MAX)
                .max(U256::from(1))
        })
        .unwrap_or(U256::ZERO)
}

/// Byte length of hex call data. A dangling odd nibble is not counted.
pub fn data_size(data: Option<&str>) -> usize {
    data.map_or(0, |data| data.len().saturating_sub(2) / 2)
}

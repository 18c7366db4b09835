//! Order and staking detectors.
//!
//! Each detector pairs a cheap probe over call data with a decoder that may
//! need external lookups. Probes for swap and TWAP orders are pure pattern
//! matches implemented in this crate; decoding is left to implementors.

pub mod multisend;
pub mod staking;
pub mod swap;
pub mod twap;

use alloy::primitives::Address;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use staking::{DepositCandidate, StakingDeployments};

/// Error type for order and deposit decoding.
#[derive(Debug, thiserror::Error)]
pub enum OrderDecodeError {
    #[error("Order decoding not available")]
    NotAvailable,
    #[error("Malformed order data: {0}")]
    Malformed(String),
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Upstream error: {0}")]
    Upstream(#[from] anyhow::Error),
}

/// Result type for order and deposit decoding.
pub type OrderDecodeResult<T> = Result<T, OrderDecodeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
    #[serde(rename = "presignaturePending")]
    PreSignaturePending,
    Open,
    Fulfilled,
    Cancelled,
    Expired,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Buy,
    Sell,
}

/// Decoded swap order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapOrderInfo {
    pub uid: String,
    pub status: OrderStatus,
    pub kind: OrderKind,
    pub sell_token: Address,
    pub buy_token: Address,
    pub sell_amount: String,
    pub buy_amount: String,
    pub executed_sell_amount: String,
    pub executed_buy_amount: String,
    pub valid_until: u64,
    pub owner: Address,
    pub receiver: Option<Address>,
    pub explorer_url: Option<String>,
}

/// When the first part of a TWAP order becomes valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "startType")]
pub enum TwapStartTime {
    AtMiningTime,
    AtEpoch { epoch: u64 },
}

/// Decoded TWAP order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwapOrderInfo {
    pub status: OrderStatus,
    pub kind: OrderKind,
    pub sell_token: Address,
    pub buy_token: Address,
    pub sell_amount: String,
    pub buy_amount: String,
    pub owner: Address,
    pub receiver: Option<Address>,
    pub number_of_parts: u64,
    pub part_sell_amount: String,
    pub min_part_limit: String,
    pub time_between_parts: u64,
    pub start_time: TwapStartTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StakingStatus {
    NotStaked,
    Activating,
    DepositInProgress,
    Active,
}

/// Decoded native staking deposit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeStakingDepositInfo {
    pub status: StakingStatus,
    pub contract: Address,
    pub value: String,
    pub num_validators: u64,
    pub fee: Decimal,
    pub annual_nrr: Decimal,
    pub monthly_nrr: Decimal,
    pub expected_annual_reward: Decimal,
    pub expected_monthly_reward: Decimal,
    pub estimated_entry_time: u64,
    pub estimated_exit_time: u64,
    pub estimated_withdrawal_time: u64,
}

/// Inputs for decoding a TWAP order.
#[derive(Debug, Clone)]
pub struct TwapOrderRequest {
    pub data: String,
    pub execution_date: Option<DateTime<Utc>>,
}

/// Inputs for decoding a staking deposit.
#[derive(Debug, Clone)]
pub struct DepositRequest {
    pub chain_id: String,
    pub to: Address,
    pub is_confirmed: bool,
    pub deposit_execution_date: Option<DateTime<Utc>>,
}

/// Detector for pre-signed swap orders.
#[async_trait]
pub trait SwapOrderDetector: Send + Sync {
    /// Find the settlement call carrying the order, if any.
    fn find_swap_order(&self, data: &str) -> Option<String> {
        swap::find_swap_order(data)
    }

    /// Decode the order found by [`SwapOrderDetector::find_swap_order`].
    async fn map_swap_order(&self, chain_id: &str, order_data: &str)
        -> OrderDecodeResult<SwapOrderInfo>;
}

/// Detector for TWAP orders created through ComposableCoW.
#[async_trait]
pub trait TwapOrderDetector: Send + Sync {
    fn find_twap_order(&self, to: Address, data: &str) -> Option<String> {
        twap::find_twap_order(to, data)
    }

    async fn map_twap_order(
        &self,
        chain_id: &str,
        safe: Address,
        request: TwapOrderRequest,
    ) -> OrderDecodeResult<TwapOrderInfo>;
}

/// Detector for deposits into official native staking deployments.
#[async_trait]
pub trait NativeStakingDetector: Send + Sync {
    /// Find a deposit call to an official deployment.
    async fn find_deposit(&self, chain_id: &str, to: Address, data: &str)
        -> Option<DepositCandidate>;

    async fn map_deposit_info(
        &self,
        request: DepositRequest,
    ) -> OrderDecodeResult<NativeStakingDepositInfo>;
}

/// Detector whose decoders always fail with `NotAvailable`.
///
/// Probes still run, so recognised orders are reported as decode failures
/// and classification falls through to the standard classifiers. Use it when
/// no order or staking backend is configured.
#[derive(Debug, Clone, Default)]
pub struct UnavailableDecoder {
    deployments: StakingDeployments,
}

impl UnavailableDecoder {
    pub fn new(deployments: StakingDeployments) -> Self {
        Self { deployments }
    }
}

#[async_trait]
impl SwapOrderDetector for UnavailableDecoder {
    async fn map_swap_order(&self, _chain_id: &str, _order_data: &str) -> OrderDecodeResult<SwapOrderInfo> {
        Err(OrderDecodeError::NotAvailable)
    }
}

#[async_trait]
impl TwapOrderDetector for UnavailableDecoder {
    async fn map_twap_order(
        &self,
        _chain_id: &str,
        _safe: Address,
        _request: TwapOrderRequest,
    ) -> OrderDecodeResult<TwapOrderInfo> {
        Err(OrderDecodeError::NotAvailable)
    }
}

#[async_trait]
impl NativeStakingDetector for UnavailableDecoder {
    async fn find_deposit(&self, chain_id: &str, to: Address, data: &str) -> Option<DepositCandidate> {
        self.deployments.find_deposit(chain_id, to, data)
    }

    async fn map_deposit_info(&self, _request: DepositRequest) -> OrderDecodeResult<NativeStakingDepositInfo> {
        Err(OrderDecodeError::NotAvailable)
    }
}

/// Decode `0x`-prefixed hex call data.
pub(crate) fn decode_call_data(data: &str) -> Option<Vec<u8>> {
    hex::decode(data.strip_prefix("0x").unwrap_or(data)).ok()
}

/// Encode call data as `0x`-prefixed hex.
pub(crate) fn encode_call_data(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

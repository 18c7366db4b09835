//! Transaction classification entry point.

use std::sync::Arc;

use safe_txinfo_telemetry::Metrics;
use tracing::{debug, warn};

use crate::classifiers;
use crate::config::FeatureFlags;
use crate::description::HumanDescriptionMapper;
use crate::info::{TransactionDetails, TransactionInfo};
use crate::mappers;
use crate::orders::{
    DepositRequest, NativeStakingDepositInfo, NativeStakingDetector, SwapOrderDetector, SwapOrderInfo,
    TwapOrderDetector, TwapOrderInfo, TwapOrderRequest,
};
use crate::size::ClassificationInputs;
use crate::tokens::TokenRepository;
use crate::types::{TokenType, TransactionRecord};

const SWAP_ORDER_DETECTOR: &str = "swap_order";
const TWAP_ORDER_DETECTOR: &str = "twap_order";
const NATIVE_STAKING_DETECTOR: &str = "native_staking";

/// Error type for classification.
///
/// Collaborator failures never surface here; they degrade to the next
/// classification step.
#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("Data decoded is null. txHash={tx_hash}")]
    MissingDataDecoded { tx_hash: String },
}

/// External collaborators used during classification.
#[derive(Clone)]
pub struct Collaborators {
    pub swap_orders: Arc<dyn SwapOrderDetector>,
    pub twap_orders: Arc<dyn TwapOrderDetector>,
    pub native_staking: Arc<dyn NativeStakingDetector>,
    pub tokens: Arc<dyn TokenRepository>,
    pub human_description: Arc<dyn HumanDescriptionMapper>,
}

/// Classifies multisig and module transactions.
///
/// Order detectors run first (swap, TWAP, native staking), each behind its
/// feature flag. Then the standard predicates from [`classifiers`] apply,
/// and anything left is described as a custom transaction.
pub struct TransactionClassifier {
    flags: FeatureFlags,
    collaborators: Collaborators,
    metrics: Metrics,
}

impl TransactionClassifier {
    /// Create a new classifier.
    ///
    /// # Arguments
    /// * `flags` - Feature flags, validated at startup
    /// * `collaborators` - Detectors, token repository and description mapper
    /// * `metrics` - Metrics collector
    pub fn new(flags: FeatureFlags, collaborators: Collaborators, metrics: Metrics) -> Self {
        Self {
            flags,
            collaborators,
            metrics,
        }
    }

    pub fn flags(&self) -> &FeatureFlags {
        &self.flags
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Classify a transaction.
    ///
    /// # Arguments
    /// * `chain_id` - Chain the transaction belongs to
    /// * `transaction` - The transaction to classify
    ///
    /// # Returns
    /// Exactly one [`TransactionInfo`]. Fails only if the record claims a
    /// settings change without decoded data.
    pub async fn classify(
        &self,
        chain_id: &str,
        transaction: &TransactionRecord,
    ) -> Result<TransactionInfo, ClassificationError> {
        let inputs = ClassificationInputs::compute(transaction);

        let describer = &self.collaborators.human_description;
        let rich_decoded_info = describer.map_rich_decoded_info(transaction, chain_id).await;
        let human_description = rich_decoded_info
            .as_ref()
            .and_then(|info| describer.map_human_description(info));
        let rich_decoded_info = if self.flags.rich_fragments {
            rich_decoded_info
        } else {
            None
        };

        let details = self.classify_details(chain_id, transaction, &inputs).await?;
        let kind = details.kind();
        debug!(
            chain_id,
            to = %transaction.to,
            value = %inputs.value,
            data_size = inputs.data_size,
            kind = kind.as_str(),
            "Classified transaction"
        );
        self.metrics.inc_classification(kind.as_str());

        Ok(TransactionInfo {
            details,
            human_description,
            rich_decoded_info,
        })
    }

    async fn classify_details(
        &self,
        chain_id: &str,
        transaction: &TransactionRecord,
        inputs: &ClassificationInputs,
    ) -> Result<TransactionDetails, ClassificationError> {
        if self.flags.swaps_decoding {
            if let Some(order) = self.map_swap_order(chain_id, transaction).await {
                return Ok(TransactionDetails::SwapOrder(order));
            }
        }

        if self.flags.twaps_decoding {
            if let Some(order) = self.map_twap_order(chain_id, transaction).await {
                return Ok(TransactionDetails::TwapOrder(order));
            }
        }

        if self.flags.native_staking_decoding {
            if let Some(deposit) = self.map_native_staking_deposit(chain_id, transaction).await {
                return Ok(TransactionDetails::NativeStakingDeposit(deposit));
            }
        }

        if !classifiers::is_custom_transaction(inputs, transaction.operation) {
            if classifiers::is_native_coin_transfer(inputs) {
                return Ok(TransactionDetails::NativeCoinTransfer(
                    mappers::native_coin_transfer(transaction, inputs),
                ));
            }

            if classifiers::is_settings_change(transaction, inputs) {
                let Some(decoded) = transaction.data_decoded.as_ref() else {
                    return Err(ClassificationError::MissingDataDecoded {
                        tx_hash: transaction.transaction_hash.clone().unwrap_or_default(),
                    });
                };
                return Ok(TransactionDetails::SettingsChange(mappers::settings_change(decoded)));
            }

            if classifiers::is_valid_token_transfer(transaction) {
                if let Some(transfer) = self.map_token_transfer(chain_id, transaction).await {
                    return Ok(transfer);
                }
            }
        }

        Ok(TransactionDetails::Custom(mappers::custom_transaction(transaction, inputs)))
    }

    async fn map_swap_order(&self, chain_id: &str, transaction: &TransactionRecord) -> Option<SwapOrderInfo> {
        let data = transaction.call_data()?;
        let detector = &self.collaborators.swap_orders;
        let order_data = detector.find_swap_order(data)?;

        match detector.map_swap_order(chain_id, &order_data).await {
            Ok(order) => Some(order),
            Err(error) => {
                // Found a swap order but couldn't decode it
                warn!(%error, chain_id, detector = SWAP_ORDER_DETECTOR, "Failed to decode order");
                self.metrics.inc_order_decode_failures(SWAP_ORDER_DETECTOR);
                None
            }
        }
    }

    async fn map_twap_order(&self, chain_id: &str, transaction: &TransactionRecord) -> Option<TwapOrderInfo> {
        let data = transaction.call_data()?;
        let detector = &self.collaborators.twap_orders;
        let order_data = detector.find_twap_order(transaction.to, data)?;

        let request = TwapOrderRequest {
            data: order_data,
            execution_date: transaction.execution_date,
        };
        match detector.map_twap_order(chain_id, transaction.safe, request).await {
            Ok(order) => Some(order),
            Err(error) => {
                warn!(%error, chain_id, detector = TWAP_ORDER_DETECTOR, "Failed to decode order");
                self.metrics.inc_order_decode_failures(TWAP_ORDER_DETECTOR);
                None
            }
        }
    }

    async fn map_native_staking_deposit(
        &self,
        chain_id: &str,
        transaction: &TransactionRecord,
    ) -> Option<NativeStakingDepositInfo> {
        let data = transaction.call_data()?;
        let detector = &self.collaborators.native_staking;
        let deposit = detector.find_deposit(chain_id, transaction.to, data).await?;

        let request = DepositRequest {
            chain_id: chain_id.to_string(),
            to: deposit.to,
            is_confirmed: transaction.is_confirmed(),
            deposit_execution_date: transaction.execution_date,
        };
        match detector.map_deposit_info(request).await {
            Ok(info) => Some(info),
            Err(error) => {
                warn!(%error, chain_id, detector = NATIVE_STAKING_DETECTOR, "Failed to decode deposit");
                self.metrics.inc_order_decode_failures(NATIVE_STAKING_DETECTOR);
                None
            }
        }
    }

    async fn map_token_transfer(
        &self,
        chain_id: &str,
        transaction: &TransactionRecord,
    ) -> Option<TransactionDetails> {
        let decoded = transaction.data_decoded.as_ref()?;
        let token = match self.collaborators.tokens.get_token(chain_id, transaction.to).await {
            Ok(token) => token,
            Err(error) => {
                debug!(%error, chain_id, "Token lookup failed");
                self.metrics.inc_token_lookup_failures();
                return None;
            }
        };

        match token.token_type {
            TokenType::Erc20 => Some(TransactionDetails::Erc20Transfer(mappers::erc20_transfer(
                transaction,
                decoded,
                token,
            ))),
            TokenType::Erc721 => Some(TransactionDetails::Erc721Transfer(mappers::erc721_transfer(
                transaction,
                decoded,
                token,
            ))),
            TokenType::NativeToken | TokenType::Unknown => None,
        }
    }
}

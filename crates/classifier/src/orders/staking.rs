//! Native staking deposit probe.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use alloy::primitives::Address;
use alloy::sol;
use alloy::sol_types::SolCall;
use serde::Deserialize;
use tracing::debug;

use super::{decode_call_data, multisend};
use crate::config::ConfigError;

sol! {
    function deposit();
}

/// Deposit call found in a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositCandidate {
    /// Staking deployment receiving the deposit.
    pub to: Address,
}

/// Official staking deployments, keyed by chain id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct StakingDeployments {
    deployments: HashMap<String, HashSet<Address>>,
}

impl StakingDeployments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load deployments from a JSON object mapping chain ids to addresses.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let deployments: Self = serde_json::from_str(&raw)?;
        debug!(
            "Loaded staking deployments for {} chains from {:?}",
            deployments.deployments.len(),
            path.as_ref()
        );
        Ok(deployments)
    }

    pub fn insert(&mut self, chain_id: impl Into<String>, address: Address) {
        self.deployments.entry(chain_id.into()).or_default().insert(address);
    }

    pub fn is_deployment(&self, chain_id: &str, address: Address) -> bool {
        self.deployments
            .get(chain_id)
            .is_some_and(|addresses| addresses.contains(&address))
    }

    fn is_deposit(&self, chain_id: &str, to: Address, data: &[u8]) -> bool {
        self.is_deployment(chain_id, to) && data.starts_with(&depositCall::SELECTOR)
    }

    /// Find a `deposit()` call to an official deployment, directly or inside
    /// a MultiSend batch.
    pub fn find_deposit(&self, chain_id: &str, to: Address, data: &str) -> Option<DepositCandidate> {
        let bytes = decode_call_data(data)?;
        if self.is_deposit(chain_id, to, &bytes) {
            return Some(DepositCandidate { to });
        }

        multisend::unpack(&bytes)?
            .into_iter()
            .find(|call| self.is_deposit(chain_id, call.to, &call.data))
            .map(|call| DepositCandidate { to: call.to })
    }
}

/// `deposit()` call data.
pub fn deposit_call_data() -> Vec<u8> {
    depositCall {}.abi_encode()
}

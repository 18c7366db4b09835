//! Token metadata lookup.

use std::collections::HashMap;
use std::path::Path;

use alloy::primitives::Address;
use async_trait::async_trait;
use tracing::debug;

use crate::config::ConfigError;
use crate::types::Token;

/// Error type for token lookups.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token {address} not found on chain {chain_id}")]
    NotFound { chain_id: String, address: Address },
    #[error("Token lookup failed: {0}")]
    Upstream(#[from] anyhow::Error),
}

/// Source of token metadata.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn get_token(&self, chain_id: &str, address: Address) -> Result<Token, TokenError>;
}

/// Token repository backed by a fixed list.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenRepository {
    tokens: HashMap<(String, Address), Token>,
}

impl InMemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(chain_id: &str, tokens: impl IntoIterator<Item = Token>) -> Self {
        let mut repository = Self::new();
        for token in tokens {
            repository.insert(chain_id, token);
        }
        repository
    }

    /// Load a JSON array of tokens for `chain_id`.
    pub fn from_json_file<P: AsRef<Path>>(chain_id: &str, path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let tokens: Vec<Token> = serde_json::from_str(&raw)?;
        debug!("Loaded {} tokens for chain {}", tokens.len(), chain_id);
        Ok(Self::with_tokens(chain_id, tokens))
    }

    pub fn insert(&mut self, chain_id: &str, token: Token) {
        self.tokens.insert((chain_id.to_string(), token.address), token);
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn get_token(&self, chain_id: &str, address: Address) -> Result<Token, TokenError> {
        self.tokens
            .get(&(chain_id.to_string(), address))
            .cloned()
            .ok_or_else(|| TokenError::NotFound {
                chain_id: chain_id.to_string(),
                address,
            })
    }
}

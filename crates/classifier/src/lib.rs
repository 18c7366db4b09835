//! Classification of Safe multisig and module transactions.
//!
//! Given a transaction record, [`TransactionClassifier`] decides whether it
//! is a swap order, a TWAP order, a native staking deposit, a native coin
//! transfer, a settings change, an ERC-20/ERC-721 transfer, or a custom
//! call, and builds a typed description of it.

pub mod classifier;
pub mod classifiers;
pub mod config;
pub mod description;
pub mod info;
pub mod mappers;
pub mod orders;
pub mod params;
pub mod size;
pub mod tokens;
pub mod types;

pub use classifier::{ClassificationError, Collaborators, TransactionClassifier};
pub use config::{ConfigError, FeatureFlags};
pub use description::{HumanDescriptionMapper, NoHumanDescription, RichDecodedInfo, RichFragment};
pub use info::{TransactionDetails, TransactionInfo, TransactionKind};
pub use orders::{
    NativeStakingDetector, OrderDecodeError, StakingDeployments, SwapOrderDetector, TwapOrderDetector,
    UnavailableDecoder,
};
pub use size::ClassificationInputs;
pub use tokens::{InMemoryTokenRepository, TokenError, TokenRepository};
pub use types::{Operation, Token, TokenType, TransactionRecord};

//! Predicates applied once every enabled order detector has declined.
//!
//! They are evaluated in declaration order: custom, native coin transfer,
//! settings change, token transfer. The custom check comes first so that
//! delegate calls and calls mixing value with data are never guessed at.

use crate::params::{self, SAFE_TRANSFER_FROM_METHOD, TRANSFER_FROM_METHOD, TRANSFER_METHOD};
use crate::size::ClassificationInputs;
use crate::types::{Operation, TransactionRecord};

/// Safe methods that change the Safe's own configuration.
pub const SETTINGS_CHANGE_METHODS: [&str; 9] = [
    "setFallbackHandler",
    "addOwnerWithThreshold",
    "removeOwner",
    "swapOwner",
    "changeThreshold",
    "changeMasterCopy",
    "enableModule",
    "disableModule",
    "setGuard",
];

pub const ERC20_TRANSFER_METHODS: [&str; 2] = [TRANSFER_METHOD, TRANSFER_FROM_METHOD];

pub const ERC721_TRANSFER_METHODS: [&str; 3] =
    [TRANSFER_METHOD, TRANSFER_FROM_METHOD, SAFE_TRANSFER_FROM_METHOD];

pub fn is_custom_transaction(inputs: &ClassificationInputs, operation: Operation) -> bool {
    (inputs.has_value() && inputs.has_data()) || operation != Operation::Call
}

pub fn is_native_coin_transfer(inputs: &ClassificationInputs) -> bool {
    inputs.has_value() && !inputs.has_data()
}

pub fn is_settings_change(transaction: &TransactionRecord, inputs: &ClassificationInputs) -> bool {
    let is_settings_method = transaction
        .data_decoded
        .as_ref()
        .is_some_and(|decoded| SETTINGS_CHANGE_METHODS.contains(&decoded.method.as_str()));

    !inputs.has_value()
        && inputs.has_data()
        && transaction.safe == transaction.to
        && is_settings_method
}

/// Whether the call looks like an ERC-20/ERC-721 transfer involving the Safe.
///
/// Which standard applies is decided later from the token type.
pub fn is_valid_token_transfer(transaction: &TransactionRecord) -> bool {
    (is_erc20_transfer(transaction) || is_erc721_transfer(transaction))
        && is_safe_sender_or_receiver(transaction)
}

fn is_erc20_transfer(transaction: &TransactionRecord) -> bool {
    decoded_method(transaction).is_some_and(|method| ERC20_TRANSFER_METHODS.contains(&method))
}

fn is_erc721_transfer(transaction: &TransactionRecord) -> bool {
    decoded_method(transaction).is_some_and(|method| ERC721_TRANSFER_METHODS.contains(&method))
}

fn is_safe_sender_or_receiver(transaction: &TransactionRecord) -> bool {
    let Some(decoded) = transaction.data_decoded.as_ref() else {
        return false;
    };
    decoded.method == TRANSFER_METHOD
        || params::from_param(decoded) == Some(transaction.safe)
        || params::to_param(decoded) == Some(transaction.safe)
}

fn decoded_method(transaction: &TransactionRecord) -> Option<&str> {
    transaction.data_decoded.as_ref().map(|decoded| decoded.method.as_str())
}

//! Pre-signed swap order probe.

use alloy::sol;
use alloy::sol_types::SolCall;

use super::{decode_call_data, encode_call_data, multisend};

sol! {
    function setPreSignature(bytes orderUid, bool signed);
}

pub fn is_set_pre_signature(data: &[u8]) -> bool {
    data.starts_with(&setPreSignatureCall::SELECTOR)
}

/// Find the `setPreSignature` call carrying a swap order.
///
/// Looks at the call itself first, then at the calls of a MultiSend batch.
pub fn find_swap_order(data: &str) -> Option<String> {
    let bytes = decode_call_data(data)?;
    if is_set_pre_signature(&bytes) {
        return Some(data.to_string());
    }

    multisend::unpack(&bytes)?
        .into_iter()
        .find(|call| is_set_pre_signature(&call.data))
        .map(|call| encode_call_data(&call.data))
}

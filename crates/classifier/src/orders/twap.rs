//! TWAP order probe for ComposableCoW conditional orders.

use alloy::primitives::{address, Address};
use alloy::sol;
use alloy::sol_types::SolCall;

use super::{decode_call_data, encode_call_data, multisend};

/// ComposableCoW, deployed at the same address on every supported chain.
pub const COMPOSABLE_COW_ADDRESS: Address = address!("fdafc9d1902f4e0b84f65f49f244b32b31013b74");

/// Handler contract for TWAP conditional orders.
pub const TWAP_HANDLER_ADDRESS: Address = address!("6cf1e9ca41f7611def408122793c358a3d11e5a5");

sol! {
    struct ConditionalOrderParams {
        address handler;
        bytes32 salt;
        bytes staticInput;
    }

    function createWithContext(
        ConditionalOrderParams params,
        address factory,
        bytes data,
        bool dispatch
    );
}

/// Whether `data` creates a TWAP conditional order on ComposableCoW.
pub fn is_twap_order(to: Address, data: &[u8]) -> bool {
    if to != COMPOSABLE_COW_ADDRESS || !data.starts_with(&createWithContextCall::SELECTOR) {
        return false;
    }
    createWithContextCall::abi_decode(data, true)
        .map(|call| call.params.handler == TWAP_HANDLER_ADDRESS)
        .unwrap_or(false)
}

/// Find the `createWithContext` call carrying a TWAP order, directly or
/// inside a MultiSend batch.
pub fn find_twap_order(to: Address, data: &str) -> Option<String> {
    let bytes = decode_call_data(data)?;
    if is_twap_order(to, &bytes) {
        return Some(data.to_string());
    }

    multisend::unpack(&bytes)?
        .into_iter()
        .find(|call| is_twap_order(call.to, &call.data))
        .map(|call| encode_call_data(&call.data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::multisend::{pack, BatchedCall};
    use alloy::primitives::{Bytes, B256, U256};

    fn create_with_context(handler: Address) -> Vec<u8> {
        createWithContextCall {
            params: ConditionalOrderParams {
                handler,
                salt: B256::repeat_byte(0x11),
                staticInput: Bytes::from(vec![0u8; 320]),
            },
            factory: Address::ZERO,
            data: Bytes::new(),
            dispatch: true,
        }
        .abi_encode()
    }

    #[test]
    fn test_finds_direct_twap() {
        let data = encode_call_data(&create_with_context(TWAP_HANDLER_ADDRESS));
        assert_eq!(find_twap_order(COMPOSABLE_COW_ADDRESS, &data), Some(data.clone()));
    }

    #[test]
    fn test_requires_composable_cow_target() {
        let data = encode_call_data(&create_with_context(TWAP_HANDLER_ADDRESS));
        assert_eq!(find_twap_order(Address::from([9; 20]), &data), None);
    }

    #[test]
    fn test_requires_twap_handler() {
        let data = encode_call_data(&create_with_context(Address::from([5; 20])));
        assert_eq!(find_twap_order(COMPOSABLE_COW_ADDRESS, &data), None);
    }

    #[test]
    fn test_finds_twap_in_batch() {
        let order = create_with_context(TWAP_HANDLER_ADDRESS);
        let batch = pack(&[BatchedCall {
            operation: 0,
            to: COMPOSABLE_COW_ADDRESS,
            value: U256::ZERO,
            data: Bytes::from(order.clone()),
        }]);
        let found = find_twap_order(Address::from([4; 20]), &encode_call_data(&batch));
        assert_eq!(found, Some(encode_call_data(&order)));
    }
}

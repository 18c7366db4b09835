//! Unpacking of MultiSend batches.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

sol! {
    function multiSend(bytes transactions);
}

// operation (1) + to (20) + value (32) + data length (32)
const HEADER_LEN: usize = 85;

/// One call inside a MultiSend batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchedCall {
    pub operation: u8,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

pub fn is_multi_send(data: &[u8]) -> bool {
    data.starts_with(&multiSendCall::SELECTOR)
}

/// Split `multiSend(bytes)` call data into its packed calls.
///
/// Returns `None` if the data is not a MultiSend call or the packed
/// encoding is truncated.
pub fn unpack(data: &[u8]) -> Option<Vec<BatchedCall>> {
    if !is_multi_send(data) {
        return None;
    }

    let call = multiSendCall::abi_decode(data, true).ok()?;
    let packed = call.transactions.as_ref();

    let mut calls = Vec::new();
    let mut cursor = 0;
    while cursor < packed.len() {
        let header = packed.get(cursor..cursor + HEADER_LEN)?;
        let (high, low) = header[53..HEADER_LEN].split_at(24);
        if high.iter().any(|byte| *byte != 0) {
            return None;
        }
        let data_len = usize::try_from(u64::from_be_bytes(low.try_into().ok()?)).ok()?;

        let start = cursor + HEADER_LEN;
        let end = start.checked_add(data_len)?;
        let call_data = packed.get(start..end)?;

        calls.push(BatchedCall {
            operation: header[0],
            to: Address::from_slice(&header[1..21]),
            value: U256::from_be_slice(&header[21..53]),
            data: Bytes::copy_from_slice(call_data),
        });
        cursor = end;
    }

    Some(calls)
}

/// Pack calls the way the MultiSend contract expects.
pub fn pack(calls: &[BatchedCall]) -> Vec<u8> {
    let mut packed = Vec::new();
    for call in calls {
        packed.push(call.operation);
        packed.extend_from_slice(call.to.as_slice());
        packed.extend_from_slice(&call.value.to_be_bytes::<32>());
        packed.extend_from_slice(&U256::from(call.data.len()).to_be_bytes::<32>());
        packed.extend_from_slice(&call.data);
    }
    multiSendCall {
        transactions: packed.into(),
    }
    .abi_encode()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(to: u8, data: &[u8]) -> BatchedCall {
        BatchedCall {
            operation: 0,
            to: Address::from([to; 20]),
            value: U256::from(to),
            data: Bytes::copy_from_slice(data),
        }
    }

    #[test]
    fn test_unpack_batch() {
        let calls = vec![call(1, &[0xde, 0xad]), call(2, &[]), call(3, &[0xbe, 0xef, 0x01])];
        let unpacked = unpack(&pack(&calls)).unwrap();
        assert_eq!(unpacked, calls);
    }

    #[test]
    fn test_rejects_other_calls() {
        assert!(unpack(&[0xa9, 0x05, 0x9c, 0xbb]).is_none());
        assert!(unpack(&[]).is_none());
    }

    #[test]
    fn test_rejects_truncated_batch() {
        let mut packed = Vec::new();
        packed.push(0u8);
        packed.extend_from_slice(&[1u8; 20]);
        packed.extend_from_slice(&[0u8; 32]);
        packed.extend_from_slice(&U256::from(10).to_be_bytes::<32>());
        packed.extend_from_slice(&[0xaa; 4]);
        let data = multiSendCall {
            transactions: packed.into(),
        }
        .abi_encode();
        assert!(unpack(&data).is_none());
    }
}

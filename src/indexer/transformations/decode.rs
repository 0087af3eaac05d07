use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::{SolEvent, sol};

use crate::models::datasets::logs::RawLog;
use crate::models::datasets::transfers::{DecodedTransfer, TransferLog};

sol! {
    /// ERC-721 transfer. ERC-20 shares the signature but carries a value, not a token id.
    #[derive(Debug)]
    event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);
}

/// keccak256("Transfer(address,address,uint256)")
pub const TRANSFER_EVENT_SIGNATURE: B256 = Transfer::SIGNATURE_HASH;

const WORD_SIZE: usize = 32;

/// Classifies a raw log as an indexed transfer, a non-indexed transfer or neither.
///
/// Only the shape is checked: the signature topic, the topic count and, for the
/// non-indexed form, a data payload of exactly one word. Address topics are read from
/// their low 20 bytes.
pub fn decode_transfer(log: &RawLog) -> DecodedTransfer {
    let Some(signature) = log.topics.first() else {
        return DecodedTransfer::NotTransfer;
    };
    if *signature != TRANSFER_EVENT_SIGNATURE {
        return DecodedTransfer::NotTransfer;
    }

    match log.topics.as_slice() {
        [_, from, to, token_id] => DecodedTransfer::Indexed(TransferLog {
            from: Address::from_word(*from),
            to: Address::from_word(*to),
            token_id: U256::from_be_bytes(token_id.0),
        }),
        [_, from, to] if log.data.len() == WORD_SIZE => DecodedTransfer::NonIndexed(TransferLog {
            from: Address::from_word(*from),
            to: Address::from_word(*to),
            token_id: U256::from_be_slice(&log.data),
        }),
        _ => DecodedTransfer::NotTransfer,
    }
}

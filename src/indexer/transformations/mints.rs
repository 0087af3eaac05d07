use alloy_primitives::{Address, U256};

use crate::indexer::transformations::decode::decode_transfer;
use crate::models::datasets::logs::RawLog;
use crate::models::datasets::transfers::{MintMatch, MintMatchKind, TransferLog};

/// Finds the token minted by `contract` in one receipt's logs.
///
/// Mints to `minter` take priority. Contracts that mint through an intermediary send the
/// token elsewhere, so the first mint of the receipt is used when none went to `minter`.
/// Undecodable logs and logs from other contracts are ignored.
pub fn find_mint(logs: &[RawLog], contract: Address, minter: Address) -> Option<MintMatch> {
    let mints: Vec<TransferLog> = logs
        .iter()
        .filter(|log| log.address == contract)
        .filter_map(|log| decode_transfer(log).into_transfer())
        .filter(TransferLog::is_mint)
        .collect();

    if let Some(exact) = mints.iter().find(|mint| mint.to == minter) {
        return Some(MintMatch {
            token_id: exact.token_id,
            recipient: exact.to,
            kind: MintMatchKind::Exact,
        });
    }

    mints.first().map(|mint| MintMatch {
        token_id: mint.token_id,
        recipient: mint.to,
        kind: MintMatchKind::Fallback,
    })
}

pub fn extract_minted_token_id(logs: &[RawLog], contract: Address, minter: Address) -> Option<U256> {
    find_mint(logs, contract, minter).map(|mint| mint.token_id)
}

use alloy_primitives::{Address, U256};

/////////////////////////////////// Decoded Data ///////////////////////////////////////
/// One decoded `Transfer(address,address,uint256)` occurrence with its chain position.
///
/// `to`, `block_number` and `log_index` are optional because upstream indexers do not
/// always populate them. Records without `to` are skipped during reconstruction and
/// missing ordering keys sort as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEvent {
    pub contract_address: Address,
    pub from: Address,
    pub to: Option<Address>,
    pub token_id: U256,
    pub block_number: Option<u64>,
    pub log_index: Option<u64>,
}

impl TransferEvent {
    pub fn is_mint(&self) -> bool {
        self.from == Address::ZERO
    }

    // (block_number, log_index) with the zero fallback applied
    pub fn ordering_key(&self) -> (u64, u64) {
        (
            self.block_number.unwrap_or_default(),
            self.log_index.unwrap_or_default(),
        )
    }

    pub fn has_ordering_key(&self) -> bool {
        self.block_number.is_some() && self.log_index.is_some()
    }
}

// Sender, recipient and token id pulled out of a transfer log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferLog {
    pub from: Address,
    pub to: Address,
    pub token_id: U256,
}

impl TransferLog {
    pub fn is_mint(&self) -> bool {
        self.from == Address::ZERO
    }
}

/// Outcome of decoding a single raw log against the `Transfer` signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedTransfer {
    /// Four topics: signature, from, to, tokenId.
    Indexed(TransferLog),
    /// Three topics plus a single 32-byte data word holding the tokenId.
    NonIndexed(TransferLog),
    NotTransfer,
}

impl DecodedTransfer {
    pub fn transfer(&self) -> Option<&TransferLog> {
        match self {
            DecodedTransfer::Indexed(t) | DecodedTransfer::NonIndexed(t) => Some(t),
            DecodedTransfer::NotTransfer => None,
        }
    }

    pub fn into_transfer(self) -> Option<TransferLog> {
        match self {
            DecodedTransfer::Indexed(t) | DecodedTransfer::NonIndexed(t) => Some(t),
            DecodedTransfer::NotTransfer => None,
        }
    }
}

/////////////////////////////////// Mint Results ///////////////////////////////////////
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintMatchKind {
    // Mint sent to the expected minter
    Exact,
    // First mint in the receipt, recipient ignored
    Fallback,
}

impl MintMatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MintMatchKind::Exact => "exact",
            MintMatchKind::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintMatch {
    pub token_id: U256,
    pub recipient: Address,
    pub kind: MintMatchKind,
}

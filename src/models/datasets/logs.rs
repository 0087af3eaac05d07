use alloy_primitives::{Address, Bytes, FixedBytes};

////////////////////////////////////// RPC Data ////////////////////////////////////////
// Undecoded receipt log: emitting address, topic words and data payload.
// No length checks are applied here, decoding decides what is usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLog {
    pub address: Address,
    pub topics: Vec<FixedBytes<32>>,
    pub data: Bytes,
}

impl RawLog {
    pub fn new(address: Address, topics: Vec<FixedBytes<32>>, data: Bytes) -> Self {
        Self {
            address,
            topics,
            data,
        }
    }
}

// Raw log with the block position it was observed at, as returned by eth_getLogs
#[derive(Debug, Clone)]
pub struct PositionedRawLog {
    pub log: RawLog,
    pub block_number: Option<u64>,
    pub log_index: Option<u64>,
    pub removed: bool,
}

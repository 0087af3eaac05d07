use alloy_network::ReceiptResponse;
use alloy_primitives::Address;
use alloy_rpc_types_eth::TransactionReceipt;

use crate::indexer::rpc::logs::LogParser;
use crate::models::datasets::logs::RawLog;

pub trait ReceiptParser {
    /// Receipt logs in emission order.
    fn parse_log_receipts(&self) -> Vec<RawLog>;
    /// Account that sent the transaction, the default expected minter.
    fn sender(&self) -> Address;
    fn succeeded(&self) -> bool;
}

impl ReceiptParser for TransactionReceipt {
    fn parse_log_receipts(&self) -> Vec<RawLog> {
        self.inner.logs().parse_raw_logs()
    }

    fn sender(&self) -> Address {
        ReceiptResponse::from(self)
    }

    fn succeeded(&self) -> bool {
        ReceiptResponse::status(self)
    }
}

use alloy_rpc_types_eth::Log;

use crate::indexer::transformations::decode::decode_transfer;
use crate::models::datasets::logs::{PositionedRawLog, RawLog};
use crate::models::datasets::transfers::TransferEvent;

impl From<&Log> for RawLog {
    fn from(log: &Log) -> Self {
        RawLog {
            address: log.inner.address,
            topics: log.inner.data.topics().to_vec(),
            data: log.inner.data.data.clone(),
        }
    }
}

impl From<&Log> for PositionedRawLog {
    fn from(log: &Log) -> Self {
        PositionedRawLog {
            log: RawLog::from(log),
            block_number: log.block_number,
            log_index: log.log_index,
            removed: log.removed,
        }
    }
}

impl PositionedRawLog {
    /// Decodes into a transfer event. Removed (reorged) logs and non-transfers yield `None`.
    pub fn to_transfer_event(&self) -> Option<TransferEvent> {
        if self.removed {
            return None;
        }
        let transfer = decode_transfer(&self.log).into_transfer()?;

        Some(TransferEvent {
            contract_address: self.log.address,
            from: transfer.from,
            to: Some(transfer.to),
            token_id: transfer.token_id,
            block_number: self.block_number,
            log_index: self.log_index,
        })
    }
}

pub trait LogParser {
    fn parse_raw_logs(&self) -> Vec<RawLog>;
    fn parse_transfer_events(&self) -> Vec<TransferEvent>;
}

impl LogParser for [Log] {
    fn parse_raw_logs(&self) -> Vec<RawLog> {
        self.iter().map(RawLog::from).collect()
    }

    fn parse_transfer_events(&self) -> Vec<TransferEvent> {
        self.iter()
            .filter_map(|log| PositionedRawLog::from(log).to_transfer_event())
            .collect()
    }
}

impl LogParser for Vec<Log> {
    fn parse_raw_logs(&self) -> Vec<RawLog> {
        self.as_slice().parse_raw_logs()
    }

    fn parse_transfer_events(&self) -> Vec<TransferEvent> {
        self.as_slice().parse_transfer_events()
    }
}

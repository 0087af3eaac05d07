use alloy_primitives::{Address, U256};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::models::datasets::transfers::TransferEvent;

/// Current owner of every token of one contract, rebuilt by replaying its full
/// `Transfer` history.
///
/// This works without the enumerable extension: it costs one pass over every transfer
/// ever emitted, so callers pass in the complete history from block 0. The table is
/// never persisted and is rebuilt from scratch on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipTable {
    owners: BTreeMap<U256, Address>,
    missing_ordering_keys: usize,
    skipped: usize,
}

impl OwnershipTable {
    pub fn reconstruct<I>(events: I) -> Self
    where
        I: IntoIterator<Item = TransferEvent>,
    {
        let mut events: Vec<TransferEvent> = events.into_iter().collect();

        // Ties on the ordering key fall back to the event contents so input order never matters
        events.sort_by(|a, b| {
            a.ordering_key()
                .cmp(&b.ordering_key())
                .then_with(|| a.token_id.cmp(&b.token_id))
                .then_with(|| a.from.cmp(&b.from))
                .then_with(|| a.to.cmp(&b.to))
        });

        let mut table = Self::default();
        for event in events {
            if !event.has_ordering_key() {
                table.missing_ordering_keys += 1;
            }
            let Some(to) = event.to else {
                table.skipped += 1;
                continue;
            };
            table.owners.insert(event.token_id, to);
        }

        if table.missing_ordering_keys > 0 {
            warn!(
                "{} transfer event(s) had no block number or log index; ordered as zero",
                table.missing_ordering_keys
            );
        }
        debug!(
            "Reconstructed owners for {} token(s), skipped {} malformed event(s)",
            table.owners.len(),
            table.skipped
        );

        table
    }

    pub fn owner_of(&self, token_id: U256) -> Option<Address> {
        self.owners.get(&token_id).copied()
    }

    /// Token ids currently held by `account`, ascending.
    pub fn tokens_owned_by(&self, account: Address) -> Vec<U256> {
        // BTreeMap iteration is already in numeric order
        self.owners
            .iter()
            .filter(|(_, owner)| **owner == account)
            .map(|(token_id, _)| *token_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Events that lacked a block number or log index and were ordered as zero.
    pub fn missing_ordering_keys(&self) -> usize {
        self.missing_ordering_keys
    }

    /// Events dropped because they had no recipient.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

pub fn owned_token_ids<I>(events: I, account: Address) -> Vec<U256>
where
    I: IntoIterator<Item = TransferEvent>,
{
    OwnershipTable::reconstruct(events).tokens_owned_by(account)
}

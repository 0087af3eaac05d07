pub mod indexer;
pub mod metrics;
pub mod models;
pub mod utils;

pub use indexer::transformations::decode::{TRANSFER_EVENT_SIGNATURE, decode_transfer};
pub use indexer::transformations::mints::{extract_minted_token_id, find_mint};
pub use indexer::transformations::ownership::{OwnershipTable, owned_token_ids};
pub use models::datasets::logs::RawLog;
pub use models::datasets::transfers::{
    DecodedTransfer, MintMatch, MintMatchKind, TransferEvent, TransferLog,
};

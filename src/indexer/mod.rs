pub mod rpc;
pub mod transformations;

use alloy_eips::BlockNumberOrTag;
use alloy_primitives::{Address, B256, U256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::{Filter, Log, TransactionReceipt};
use anyhow::{Result, anyhow};
use std::time::Instant;
use tracing::{info, warn};

use crate::indexer::rpc::{logs::LogParser, receipts::ReceiptParser};
use crate::indexer::transformations::decode::TRANSFER_EVENT_SIGNATURE;
use crate::indexer::transformations::mints::find_mint;
use crate::indexer::transformations::ownership::OwnershipTable;
use crate::metrics::Metrics;
use crate::models::datasets::transfers::MintMatch;
use crate::models::errors::ReceiptError;
use crate::utils::retry::{RetryConfig, retry};
use crate::utils::short_hex;

pub async fn get_chain_id<P>(
    provider: &P,
    retry_config: &RetryConfig,
    metrics: Option<&Metrics>,
) -> Result<u64>
where
    P: Provider,
{
    retry(
        || async {
            let start = Instant::now();
            if let Some(metrics) = metrics {
                metrics.record_rpc_request("get_chain_id");
            }

            let result = provider.get_chain_id().await;

            if let Some(metrics) = metrics {
                metrics.record_rpc_result("get_chain_id", start, result.is_err());
            }

            result.map_err(|e| {
                warn!("Failed to get chain ID. Error details:\n{:#?}", e);
                anyhow!("RPC error: {}", e)
            })
        },
        retry_config,
        "get_chain_id",
    )
    .await
}

pub async fn get_latest_block_number<P>(
    provider: &P,
    retry_config: &RetryConfig,
    metrics: Option<&Metrics>,
) -> Result<u64>
where
    P: Provider,
{
    retry(
        || async {
            let start = Instant::now();
            if let Some(metrics) = metrics {
                metrics.record_rpc_request("get_latest_block_number");
            }

            let result = provider.get_block_number().await;

            if let Some(metrics) = metrics {
                metrics.record_rpc_result("get_latest_block_number", start, result.is_err());
            }

            result.map_err(|e| {
                warn!("Failed to get latest block number. Error details:\n{:#?}", e);
                anyhow!("RPC error: {}", e)
            })
        },
        retry_config,
        "get_latest_block_number",
    )
    .await
}

/// Every `Transfer` log emitted by `contract` from genesis up to `to_block`.
pub async fn get_transfer_logs<P>(
    provider: &P,
    contract: Address,
    to_block: BlockNumberOrTag,
    retry_config: &RetryConfig,
    metrics: Option<&Metrics>,
) -> Result<Vec<Log>>
where
    P: Provider,
{
    let filter = Filter::new()
        .address(contract)
        .event_signature(TRANSFER_EVENT_SIGNATURE)
        .from_block(0u64)
        .to_block(to_block);

    retry(
        || async {
            let start = Instant::now();
            if let Some(metrics) = metrics {
                metrics.record_rpc_request("get_logs");
            }

            let result = provider.get_logs(&filter).await;

            if let Some(metrics) = metrics {
                metrics.record_rpc_result("get_logs", start, result.is_err());
            }

            result.map_err(|e| {
                warn!(
                    "Failed to get Transfer logs for {} up to {}. Error details:\n{:#?}",
                    contract, to_block, e
                );
                anyhow!("RPC error: {}", e)
            })
        },
        retry_config,
        "get_transfer_logs",
    )
    .await
}

pub async fn get_transaction_receipt<P>(
    provider: &P,
    tx_hash: B256,
    retry_config: &RetryConfig,
    metrics: Option<&Metrics>,
) -> Result<Option<TransactionReceipt>>
where
    P: Provider,
{
    retry(
        || async {
            let start = Instant::now();
            if let Some(metrics) = metrics {
                metrics.record_rpc_request("get_transaction_receipt");
            }

            let result = provider.get_transaction_receipt(tx_hash).await;

            if let Some(metrics) = metrics {
                metrics.record_rpc_result("get_transaction_receipt", start, result.is_err());
            }

            result.map_err(|e| {
                warn!(
                    "Failed to get receipt for transaction {}. Error details:\n{:#?}",
                    tx_hash, e
                );
                anyhow!("RPC error: {}", e)
            })
        },
        retry_config,
        "get_transaction_receipt",
    )
    .await
}

/// Token ids of `contract` held by `account` as of `block_number`.
pub async fn owned_tokens<P>(
    provider: &P,
    contract: Address,
    account: Address,
    block_number: u64,
    retry_config: &RetryConfig,
    metrics: Option<&Metrics>,
) -> Result<Vec<U256>>
where
    P: Provider,
{
    let start = Instant::now();

    let logs = get_transfer_logs(
        provider,
        contract,
        BlockNumberOrTag::Number(block_number),
        retry_config,
        metrics,
    )
    .await?;
    let events = logs.parse_transfer_events();
    let table = OwnershipTable::reconstruct(events);
    let token_ids = table.tokens_owned_by(account);

    if let Some(metrics) = metrics {
        metrics.record_scan(
            block_number,
            logs.len(),
            token_ids.len(),
            start.elapsed().as_secs_f64(),
        );
    }

    info!(
        "Replayed {} Transfer log(s) of {} up to block {}: {} token(s) tracked, {} held by {}",
        logs.len(),
        short_hex(contract.to_string()),
        block_number,
        table.len(),
        token_ids.len(),
        short_hex(account.to_string())
    );

    Ok(token_ids)
}

/// Resolves the token minted by `contract` in transaction `tx_hash`.
///
/// Without an explicit `minter` the transaction sender is expected to receive the mint.
pub async fn minted_token<P>(
    provider: &P,
    contract: Address,
    tx_hash: B256,
    minter: Option<Address>,
    retry_config: &RetryConfig,
    metrics: Option<&Metrics>,
) -> Result<Option<MintMatch>>
where
    P: Provider,
{
    let receipt = get_transaction_receipt(provider, tx_hash, retry_config, metrics)
        .await?
        .ok_or_else(|| ReceiptError::NotFound {
            tx_hash: tx_hash.to_string(),
        })?;

    if !receipt.succeeded() {
        warn!(
            "Transaction {} reverted; no mint expected",
            short_hex(tx_hash.to_string())
        );
    }

    let minter = minter.unwrap_or_else(|| receipt.sender());
    let mint = find_mint(&receipt.parse_log_receipts(), contract, minter);

    if let Some(metrics) = metrics {
        metrics.record_mint(mint.map(|m| m.kind));
    }

    Ok(mint)
}

use alloy_primitives::U256;
use alloy_provider::{Provider, ProviderBuilder};
use anyhow::Result;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{self, EnvFilter};
use url::Url;

use nft_ownership_indexer::indexer;
use nft_ownership_indexer::metrics::Metrics;
use nft_ownership_indexer::models::common::{Config, ContractAddresses};
use nft_ownership_indexer::models::errors::ChainError;
use nft_ownership_indexer::utils::{load_config, short_hex};

const CONFIG_ENV_VAR: &str = "NFT_INDEXER_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "config.yml";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    println!();
    info!("=========================== INITIALIZING ===========================");

    // Load config
    let config_file = std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    let config = match load_config(&config_file) {
        Ok(config) => {
            info!("Config loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load config: {:#}", e);
            return Err(e);
        }
    };

    // Initialize optional metrics
    let metrics = if config.metrics.enabled {
        Some(Metrics::new(config.chain_name.clone())?)
    } else {
        info!("Metrics are disabled");
        None
    };

    if let Some(metrics_instance) = &metrics {
        metrics_instance
            .start_metrics_server(&config.metrics.address, config.metrics.port)
            .await?;
    }

    // Create RPC provider
    let rpc_url: Url = config.rpc_url.parse()?;
    info!("RPC URL: {}", rpc_url);
    let provider = ProviderBuilder::new().connect_http(rpc_url);

    // Resolve contract addresses for the chain the node is actually on
    let chain_id = indexer::get_chain_id(&provider, &config.retry, metrics.as_ref()).await?;
    info!("Chain ID: {}", chain_id);
    let contracts = *config
        .networks
        .contracts_for(chain_id)
        .ok_or(ChainError::UnsupportedChainId { chain_id })?;
    info!(
        "Token: {} | NFT: {} | Account: {}",
        short_hex(contracts.token_address.to_string()),
        short_hex(contracts.nft_address.to_string()),
        short_hex(config.account.to_string())
    );

    resolve_mint_receipts(&provider, &config, &contracts, metrics.as_ref()).await;

    println!();
    info!("========================= WATCHING OWNERSHIP =========================");

    let poll_interval = Duration::from_millis(config.poll_interval_ms);
    let mut last_scanned_block: Option<u64> = None;
    let mut last_owned: Option<Vec<U256>> = None;
    let mut first_poll = true;

    let shutdown = signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        // First scan runs immediately, later ones wait for the poll interval
        if !first_poll {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Received Ctrl+C signal, shutting down...");
                    break Ok(());
                }
                _ = tokio::time::sleep(poll_interval) => {}
            }
        }
        first_poll = false;

        let latest_block =
            indexer::get_latest_block_number(&provider, &config.retry, metrics.as_ref()).await?;

        // Only rebuild when a new block landed
        if last_scanned_block.is_some_and(|scanned| latest_block <= scanned) {
            continue;
        }

        match indexer::owned_tokens(
            &provider,
            contracts.nft_address,
            config.account,
            latest_block,
            &config.retry,
            metrics.as_ref(),
        )
        .await
        {
            Ok(token_ids) => {
                if last_owned.as_ref() != Some(&token_ids) {
                    info!(
                        "Block {}: {} owns {} NFT(s): {:?}",
                        latest_block,
                        short_hex(config.account.to_string()),
                        token_ids.len(),
                        token_ids.iter().map(|id| id.to_string()).collect::<Vec<_>>()
                    );
                }
                last_owned = Some(token_ids);
                last_scanned_block = Some(latest_block);
            }
            Err(e) => {
                // Keep the previous result and try again on the next block
                error!("Failed to rebuild ownership at block {}: {:#}", latest_block, e);
            }
        }
    }
}

async fn resolve_mint_receipts<P: Provider>(
    provider: &P,
    config: &Config,
    contracts: &ContractAddresses,
    metrics: Option<&Metrics>,
) {
    for tx_hash in &config.mint_receipts {
        let result = indexer::minted_token(
            provider,
            contracts.nft_address,
            *tx_hash,
            None,
            &config.retry,
            metrics,
        )
        .await;

        match result {
            Ok(Some(mint)) => info!(
                "Transaction {} minted token #{} to {} ({} match)",
                short_hex(tx_hash.to_string()),
                mint.token_id,
                short_hex(mint.recipient.to_string()),
                mint.kind.as_str()
            ),
            Ok(None) => warn!(
                "Transaction {} did not mint a token on {}",
                short_hex(tx_hash.to_string()),
                short_hex(contracts.nft_address.to_string())
            ),
            Err(e) => error!(
                "Failed to resolve mint for transaction {}: {:#}",
                short_hex(tx_hash.to_string()),
                e
            ),
        }
    }
}

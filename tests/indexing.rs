use alloy_primitives::{Address, B256, Bytes, LogData, U256};
use alloy_rpc_types_eth::Log;
use anyhow::Result;

use nft_ownership_indexer::indexer::rpc::logs::LogParser;
use nft_ownership_indexer::models::common::HARDHAT_CHAIN_ID;
use nft_ownership_indexer::utils::load_config;
use nft_ownership_indexer::{OwnershipTable, TRANSFER_EVENT_SIGNATURE, TransferEvent};

const NFT: &str = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512";
const ALICE: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
const BOB: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

// (block_number, log_index, from, to, token_id, removed)
const HISTORY: [(u64, u64, &str, &str, u64, bool); 5] = [
    (3, 0, "0x0000000000000000000000000000000000000000", ALICE, 1, false),
    (3, 1, "0x0000000000000000000000000000000000000000", ALICE, 2, false),
    (5, 2, ALICE, BOB, 2, false),
    (6, 0, BOB, ALICE, 2, true), // Reorged out, must be ignored
    (8, 4, "0x0000000000000000000000000000000000000000", BOB, 3, false),
];

fn addr(s: &str) -> Address {
    s.parse().expect("valid address")
}

fn rpc_log(block: u64, log_index: u64, from: &str, to: &str, token_id: u64, removed: bool) -> Log {
    let topics = vec![
        TRANSFER_EVENT_SIGNATURE,
        addr(from).into_word(),
        addr(to).into_word(),
        B256::from(U256::from(token_id).to_be_bytes::<32>()),
    ];

    Log {
        inner: alloy_primitives::Log {
            address: addr(NFT),
            data: LogData::new_unchecked(topics, Bytes::new()),
        },
        block_number: Some(block),
        log_index: Some(log_index),
        removed,
        ..Default::default()
    }
}

// Older contracts leave tokenId unindexed: three topics and the id as the only data word
fn non_indexed_rpc_log(block: u64, log_index: u64, from: &str, to: &str, token_id: u64) -> Log {
    let topics = vec![
        TRANSFER_EVENT_SIGNATURE,
        addr(from).into_word(),
        addr(to).into_word(),
    ];
    let data = Bytes::from(U256::from(token_id).to_be_bytes::<32>().to_vec());

    Log {
        inner: alloy_primitives::Log {
            address: addr(NFT),
            data: LogData::new_unchecked(topics, data),
        },
        block_number: Some(block),
        log_index: Some(log_index),
        ..Default::default()
    }
}

fn history_logs() -> Vec<Log> {
    HISTORY
        .iter()
        .map(|(block, index, from, to, token_id, removed)| {
            rpc_log(*block, *index, from, to, *token_id, *removed)
        })
        .collect()
}

#[test]
fn test_parse_transfer_events_from_rpc_logs() -> Result<()> {
    let mut logs = history_logs();
    // A log with an unrelated signature from the same contract
    logs.push(Log {
        inner: alloy_primitives::Log {
            address: addr(NFT),
            data: LogData::new_unchecked(vec![B256::repeat_byte(0x42)], Bytes::new()),
        },
        block_number: Some(9),
        log_index: Some(0),
        ..Default::default()
    });

    let events = logs.parse_transfer_events();

    assert_eq!(events.len(), 4, "removed and foreign logs are dropped");
    assert_eq!(
        events[2],
        TransferEvent {
            contract_address: addr(NFT),
            from: addr(ALICE),
            to: Some(addr(BOB)),
            token_id: U256::from(2),
            block_number: Some(5),
            log_index: Some(2),
        }
    );
    Ok(())
}

#[test]
fn test_parse_raw_logs_keeps_every_log() -> Result<()> {
    let logs = history_logs();
    let raw = logs.parse_raw_logs();

    assert_eq!(raw.len(), HISTORY.len());
    assert!(raw.iter().all(|log| log.address == addr(NFT)));
    assert_eq!(raw[0].topics.len(), 4);
    Ok(())
}

#[test]
fn test_rpc_history_to_owned_tokens() -> Result<()> {
    let table = OwnershipTable::reconstruct(history_logs().parse_transfer_events());

    assert_eq!(table.tokens_owned_by(addr(ALICE)), vec![U256::from(1)]);
    assert_eq!(
        table.tokens_owned_by(addr(BOB)),
        vec![U256::from(2), U256::from(3)]
    );
    Ok(())
}

#[test]
fn test_non_indexed_rpc_logs_to_owned_tokens() -> Result<()> {
    let mut logs = history_logs();
    logs.push(non_indexed_rpc_log(9, 0, BOB, ALICE, 3));
    logs.push(non_indexed_rpc_log(
        9,
        1,
        "0x0000000000000000000000000000000000000000",
        ALICE,
        77,
    ));

    let events = logs.parse_transfer_events();
    assert_eq!(events.len(), 6);
    assert_eq!(events[5].token_id, U256::from(77));
    assert!(events[5].is_mint());

    let table = OwnershipTable::reconstruct(events);
    assert_eq!(
        table.tokens_owned_by(addr(ALICE)),
        vec![U256::from(1), U256::from(3), U256::from(77)]
    );
    assert_eq!(table.tokens_owned_by(addr(BOB)), vec![U256::from(2)]);
    Ok(())
}

#[test]
fn test_load_config_with_deployments_file() -> Result<()> {
    let dir = std::env::temp_dir().join(format!("nft-indexer-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;

    let deployments = r#"{
        "MuraroToken": "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0",
        "MuraroNFT": "0xCf7Ed3AccA5a467e9e704C703E8D87F634fB0Fc9"
    }"#;
    std::fs::write(dir.join("localhost.json"), deployments)?;

    let config_yaml = format!(
        r#"
chain_name: "local-hardhat"
rpc_url: "http://127.0.0.1:8545"
account: "{ALICE}"
networks:
  - chain_id: 31337
    token_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3"
    nft_address: "{NFT}"
  - chain_id: 1
    token_address: "0x0000000000000000000000000000000000000001"
    nft_address: "0x0000000000000000000000000000000000000002"
deployments_file: "localhost.json"
"#
    );
    let config_path = dir.join("config.yml");
    std::fs::write(&config_path, config_yaml)?;

    let config = load_config(&config_path)?;

    assert_eq!(config.chain_name, "local_hardhat");
    assert_eq!(config.account, addr(ALICE));
    assert_eq!(config.poll_interval_ms, 1000);
    assert_eq!(config.retry.max_attempts, 8);
    assert!(!config.metrics.enabled);
    assert!(config.mint_receipts.is_empty());

    // The deployments file replaces the configured Hardhat entry
    assert_eq!(config.networks.len(), 2);
    let local = config
        .networks
        .contracts_for(HARDHAT_CHAIN_ID)
        .expect("hardhat entry");
    assert_eq!(
        local.nft_address,
        addr("0xCf7Ed3AccA5a467e9e704C703E8D87F634fB0Fc9")
    );
    assert!(config.networks.contracts_for(5).is_none());

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

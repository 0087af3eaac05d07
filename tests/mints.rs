use alloy_primitives::{Address, B256, Bytes, U256, keccak256};
use anyhow::Result;

use nft_ownership_indexer::{
    MintMatchKind, RawLog, TRANSFER_EVENT_SIGNATURE, extract_minted_token_id, find_mint,
};

const NFT: &str = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512";
const TOKEN: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
const MINTER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
const SOMEONE_ELSE: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

fn addr(s: &str) -> Address {
    s.parse().expect("valid address")
}

fn word(value: u64) -> B256 {
    B256::from(U256::from(value).to_be_bytes::<32>())
}

fn indexed_transfer(contract: Address, from: Address, to: Address, token_id: u64) -> RawLog {
    RawLog::new(
        contract,
        vec![
            TRANSFER_EVENT_SIGNATURE,
            from.into_word(),
            to.into_word(),
            word(token_id),
        ],
        Bytes::new(),
    )
}

fn non_indexed_transfer(contract: Address, from: Address, to: Address, value: u64) -> RawLog {
    RawLog::new(
        contract,
        vec![TRANSFER_EVENT_SIGNATURE, from.into_word(), to.into_word()],
        Bytes::from(word(value).to_vec()),
    )
}

// What a "pay with ERC-20, then mint" receipt looks like: an Approval-style log, the
// payment transfer on the token contract, then the NFT mint
fn purchase_receipt(minted_to: Address, token_id: u64) -> Vec<RawLog> {
    vec![
        RawLog::new(
            addr(TOKEN),
            vec![
                keccak256("Approval(address,address,uint256)"),
                addr(MINTER).into_word(),
                addr(NFT).into_word(),
            ],
            Bytes::from(word(0).to_vec()),
        ),
        non_indexed_transfer(addr(TOKEN), addr(MINTER), addr(NFT), 100),
        indexed_transfer(addr(NFT), Address::ZERO, minted_to, token_id),
    ]
}

#[test]
fn test_mint_exact_match() -> Result<()> {
    let logs = purchase_receipt(addr(MINTER), 7);

    let mint = find_mint(&logs, addr(NFT), addr(MINTER)).expect("mint found");
    assert_eq!(mint.token_id, U256::from(7));
    assert_eq!(mint.kind, MintMatchKind::Exact);
    assert_eq!(mint.recipient, addr(MINTER));
    Ok(())
}

#[test]
fn test_mint_fallback_match() -> Result<()> {
    let logs = purchase_receipt(addr(SOMEONE_ELSE), 9);

    let mint = find_mint(&logs, addr(NFT), addr(MINTER)).expect("mint found");
    assert_eq!(mint.token_id, U256::from(9));
    assert_eq!(mint.kind, MintMatchKind::Fallback);
    assert_eq!(mint.recipient, addr(SOMEONE_ELSE));
    Ok(())
}

#[test]
fn test_mint_none_without_zero_sender() -> Result<()> {
    let logs = vec![
        indexed_transfer(addr(NFT), addr(MINTER), addr(SOMEONE_ELSE), 1),
        indexed_transfer(addr(NFT), addr(SOMEONE_ELSE), addr(MINTER), 2),
    ];

    assert_eq!(extract_minted_token_id(&logs, addr(NFT), addr(MINTER)), None);
    Ok(())
}

#[test]
fn test_mint_from_non_indexed_token_id() -> Result<()> {
    let logs = vec![non_indexed_transfer(addr(NFT), Address::ZERO, addr(MINTER), 42)];

    assert_eq!(
        extract_minted_token_id(&logs, addr(NFT), addr(MINTER)),
        Some(U256::from(42))
    );
    Ok(())
}

#[test]
fn test_mint_addresses_compare_case_insensitively() -> Result<()> {
    let logs = purchase_receipt(addr(MINTER), 5);
    let lower_nft = addr(&NFT.to_lowercase());
    let upper_minter = addr(&format!("0x{}", MINTER[2..].to_uppercase()));

    let mint = find_mint(&logs, lower_nft, upper_minter).expect("mint found");
    assert_eq!(mint.kind, MintMatchKind::Exact);
    assert_eq!(mint.token_id, U256::from(5));
    Ok(())
}

#[test]
fn test_mint_skips_malformed_logs() -> Result<()> {
    let logs = vec![
        // Signature only
        RawLog::new(addr(NFT), vec![TRANSFER_EVENT_SIGNATURE], Bytes::new()),
        // Three topics but a two-word payload
        RawLog::new(
            addr(NFT),
            vec![
                TRANSFER_EVENT_SIGNATURE,
                Address::ZERO.into_word(),
                addr(MINTER).into_word(),
            ],
            Bytes::from(vec![0u8; 64]),
        ),
        indexed_transfer(addr(NFT), Address::ZERO, addr(MINTER), 3),
    ];

    assert_eq!(
        extract_minted_token_id(&logs, addr(NFT), addr(MINTER)),
        Some(U256::from(3))
    );
    Ok(())
}

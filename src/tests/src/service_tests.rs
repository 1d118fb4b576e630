//! End-to-end tests for the wallet operations against the mock node.

use crate::init_logging;
use crate::mock_node::{MockNode, MockOptions};
use std::fs;
use tempfile::{tempdir, TempDir};
use wallet_cli::{Cluster, KeyStore, RpcClient, RpcConfig, WalletError, WalletService};
use wallet_core::{Keypair, Pubkey, Signer, LAMPORTS_PER_SIGNATURE, LAMPORTS_PER_SOL};

fn rpc_config(node: &MockNode) -> RpcConfig {
    let mut config = RpcConfig::for_url(node.url());
    config.cluster = Cluster::Localnet;
    config.poll_interval_ms = 10;
    config.confirm_timeout_ms = 2_000;
    config
}

fn service_with(config: RpcConfig, dir: &TempDir) -> WalletService {
    WalletService::new(
        KeyStore::new(dir.path().join("wallet.json")),
        RpcClient::new(config).unwrap(),
    )
}

fn service(node: &MockNode, dir: &TempDir) -> WalletService {
    service_with(rpc_config(node), dir)
}

#[tokio::test]
async fn test_create_airdrop_transfer_balance() {
    init_logging();
    let node = MockNode::start().await;
    let dir = tempdir().unwrap();
    let wallet = service(&node, &dir);

    let address = wallet.create().await.unwrap();
    assert_eq!(wallet.balance().await.unwrap(), 0);

    let airdrop = wallet.airdrop(Some("2")).await.unwrap();
    assert!(node.has_signature(&airdrop));
    assert_eq!(wallet.balance().await.unwrap(), 2 * LAMPORTS_PER_SOL);

    let destination = Keypair::new().pubkey();
    let signature = wallet.transfer(&destination.to_string(), "0.5").await.unwrap();
    assert!(node.has_signature(&signature));

    assert_eq!(
        wallet.balance().await.unwrap(),
        2 * LAMPORTS_PER_SOL - LAMPORTS_PER_SOL / 2 - LAMPORTS_PER_SIGNATURE
    );
    assert_eq!(node.balance(&destination), LAMPORTS_PER_SOL / 2);
    assert_eq!(node.balance(&address), wallet.balance().await.unwrap());
}

#[tokio::test]
async fn test_airdrop_defaults_to_one_coin() {
    let node = MockNode::start().await;
    let dir = tempdir().unwrap();
    let wallet = service(&node, &dir);

    let address = wallet.create().await.unwrap();
    wallet.airdrop(None).await.unwrap();
    assert_eq!(node.balance(&address), LAMPORTS_PER_SOL);
}

#[tokio::test]
async fn test_airdrop_unsupported_by_endpoint() {
    let options = MockOptions { airdrop_enabled: false, ..MockOptions::default() };
    let node = MockNode::start_with(options).await;
    let dir = tempdir().unwrap();
    let wallet = service(&node, &dir);
    wallet.create().await.unwrap();

    let result = wallet.airdrop(Some("1")).await;
    assert!(matches!(result, Err(WalletError::Unsupported(_))), "{:?}", result);
}

#[tokio::test]
async fn test_airdrop_on_mainnet_never_reaches_the_node() {
    let node = MockNode::start().await;
    let dir = tempdir().unwrap();
    let mut config = rpc_config(&node);
    config.cluster = Cluster::MainnetBeta;
    let wallet = service_with(config, &dir);
    wallet.create().await.unwrap();

    let result = wallet.airdrop(Some("1")).await;
    assert!(matches!(result, Err(WalletError::Unsupported(_))));
    assert_eq!(node.calls("requestAirdrop"), 0);
}

#[tokio::test]
async fn test_operations_without_wallet_fail_before_network() {
    let node = MockNode::start().await;
    let dir = tempdir().unwrap();
    let wallet = service(&node, &dir);

    assert!(matches!(wallet.balance().await, Err(WalletError::CorruptWallet(_))));
    assert!(matches!(wallet.airdrop(None).await, Err(WalletError::CorruptWallet(_))));
    let destination = Pubkey::new_from_array([4u8; 32]).to_string();
    assert!(matches!(
        wallet.transfer(&destination, "1").await,
        Err(WalletError::CorruptWallet(_))
    ));

    assert_eq!(node.calls("getBalance"), 0);
    assert_eq!(node.calls("requestAirdrop"), 0);
    assert_eq!(node.calls("getLatestBlockhash"), 0);
}

#[tokio::test]
async fn test_corrupt_wallet_file_is_reported() {
    let node = MockNode::start().await;
    let dir = tempdir().unwrap();
    let wallet = service(&node, &dir);
    wallet.create().await.unwrap();

    let path = wallet.keystore().path().to_path_buf();
    let text = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let secret = value["secretKey"].as_str().unwrap();
    let truncated = secret.rsplitn(2, ',').nth(1).unwrap();
    let corrupted = serde_json::json!({ "publicKey": value["publicKey"], "secretKey": truncated });
    fs::write(&path, serde_json::to_string_pretty(&corrupted).unwrap()).unwrap();

    assert!(matches!(wallet.balance().await, Err(WalletError::CorruptWallet(_))));
}

#[tokio::test]
async fn test_invalid_transfer_input_fails_fast() {
    let node = MockNode::start().await;
    let dir = tempdir().unwrap();
    let wallet = service(&node, &dir);
    wallet.create().await.unwrap();

    let result = wallet.transfer("not-a-valid-address", "1").await;
    assert!(matches!(result, Err(WalletError::InvalidAddress(_))));

    let destination = Keypair::new().pubkey().to_string();
    let result = wallet.transfer(&destination, "-1").await;
    assert!(matches!(result, Err(WalletError::InvalidAmount(_))));
    let result = wallet.transfer(&destination, "0.0000000001").await;
    assert!(matches!(result, Err(WalletError::InvalidAmount(_))));

    assert_eq!(node.calls("getLatestBlockhash"), 0);
    assert_eq!(node.calls("sendTransaction"), 0);
}

#[tokio::test]
async fn test_zero_transfer_only_costs_the_fee() {
    let node = MockNode::start().await;
    let dir = tempdir().unwrap();
    let wallet = service(&node, &dir);
    let address = wallet.create().await.unwrap();
    node.credit(&address, LAMPORTS_PER_SOL);

    let destination = Keypair::new().pubkey();
    wallet.transfer(&destination.to_string(), "0").await.unwrap();

    assert_eq!(node.balance(&address), LAMPORTS_PER_SOL - LAMPORTS_PER_SIGNATURE);
    assert_eq!(node.balance(&destination), 0);
}

#[tokio::test]
async fn test_transfer_beyond_balance_fails_on_chain() {
    let node = MockNode::start().await;
    let dir = tempdir().unwrap();
    let wallet = service(&node, &dir);
    let address = wallet.create().await.unwrap();
    node.credit(&address, LAMPORTS_PER_SOL);

    let destination = Keypair::new().pubkey();
    let result = wallet.transfer(&destination.to_string(), "5").await;
    match result {
        Err(WalletError::TransactionFailed { signature, reason }) => {
            assert!(node.has_signature(&signature));
            assert!(reason.contains("InstructionError"));
        }
        other => panic!("unexpected result {:?}", other),
    }
    // Only the fee is taken
    assert_eq!(node.balance(&address), LAMPORTS_PER_SOL - LAMPORTS_PER_SIGNATURE);
    assert_eq!(node.balance(&destination), 0);
}

#[tokio::test]
async fn test_transfer_without_fee_funds_is_rejected_by_node() {
    let node = MockNode::start().await;
    let dir = tempdir().unwrap();
    let wallet = service(&node, &dir);
    wallet.create().await.unwrap();

    let destination = Keypair::new().pubkey();
    let result = wallet.transfer(&destination.to_string(), "0").await;
    assert!(matches!(result, Err(WalletError::Rpc { code: -32002, .. })), "{:?}", result);
}

#[tokio::test]
async fn test_transfer_waits_for_confirmation() {
    let options = MockOptions { confirm_after_polls: 4, ..MockOptions::default() };
    let node = MockNode::start_with(options).await;
    let dir = tempdir().unwrap();
    let wallet = service(&node, &dir);
    let address = wallet.create().await.unwrap();
    node.credit(&address, LAMPORTS_PER_SOL);

    let destination = Keypair::new().pubkey();
    wallet.transfer(&destination.to_string(), "0.25").await.unwrap();

    assert!(node.calls("getSignatureStatuses") >= 4);
    assert_eq!(node.balance(&destination), LAMPORTS_PER_SOL / 4);
}

#[tokio::test]
async fn test_unlanded_transfer_times_out() {
    let node = MockNode::start_with(MockOptions {
        drop_transactions: true,
        blocks_per_query: 0,
        ..MockOptions::default()
    })
    .await;
    let dir = tempdir().unwrap();
    let mut config = rpc_config(&node);
    config.confirm_timeout_ms = 200;
    let wallet = service_with(config, &dir);
    let address = wallet.create().await.unwrap();
    node.credit(&address, LAMPORTS_PER_SOL);

    let destination = Keypair::new().pubkey();
    let result = wallet.transfer(&destination.to_string(), "0.1").await;
    assert!(
        matches!(result, Err(WalletError::ConfirmationTimeout { .. })),
        "{:?}",
        result
    );
}

#[tokio::test]
async fn test_expired_blockhash_is_reported_as_failure() {
    let node = MockNode::start_with(MockOptions {
        drop_transactions: true,
        blocks_per_query: 200,
        ..MockOptions::default()
    })
    .await;
    let dir = tempdir().unwrap();
    let wallet = service(&node, &dir);
    let address = wallet.create().await.unwrap();
    node.credit(&address, LAMPORTS_PER_SOL);

    let destination = Keypair::new().pubkey();
    match wallet.transfer(&destination.to_string(), "0.1").await {
        Err(WalletError::TransactionFailed { reason, .. }) => assert!(reason.contains("expired")),
        other => panic!("unexpected result {:?}", other),
    }
}

#[tokio::test]
async fn test_each_operation_rereads_the_wallet() {
    let node = MockNode::start().await;
    let dir = tempdir().unwrap();
    let wallet = service(&node, &dir);
    wallet.create().await.unwrap();

    // Replace the wallet behind the service's back.
    let other = KeyStore::new(wallet.keystore().path()).create().unwrap();
    let other_address: Pubkey = other.public_key.parse().unwrap();
    node.credit(&other_address, 7);

    assert_eq!(wallet.balance().await.unwrap(), 7);
}

//! Tests for the RPC client against the mock node.

use crate::mock_node::{MockNode, MockOptions};
use wallet_cli::{Cluster, RpcClient, RpcConfig, TransactionStatus, WalletError};
use wallet_core::{Keypair, Signature, Signer, TransferBuilder, LAMPORTS_PER_SOL};
use warp::Filter;

fn client(node: &MockNode) -> RpcClient {
    let mut config = RpcConfig::for_url(node.url());
    config.cluster = Cluster::Localnet;
    config.poll_interval_ms = 10;
    config.confirm_timeout_ms = 1_000;
    RpcClient::new(config).unwrap()
}

#[tokio::test]
async fn test_balance_and_airdrop() {
    let node = MockNode::start().await;
    let rpc = client(&node);
    let address = Keypair::new().pubkey();

    assert_eq!(rpc.get_balance(&address).await.unwrap(), 0);

    let signature = rpc.request_airdrop(&address, 3 * LAMPORTS_PER_SOL).await.unwrap();
    assert_eq!(rpc.confirm_transaction(&signature).await.unwrap(), TransactionStatus::Confirmed);
    assert_eq!(rpc.get_balance(&address).await.unwrap(), 3 * LAMPORTS_PER_SOL);
}

#[tokio::test]
async fn test_latest_blockhash_bounds_validity() {
    let node = MockNode::start().await;
    let rpc = client(&node);

    let anchor = rpc.get_latest_blockhash().await.unwrap();
    let height = rpc.get_block_height().await.unwrap();
    assert!(anchor.last_valid_block_height >= height);

    let next = rpc.get_latest_blockhash().await.unwrap();
    assert_ne!(anchor.blockhash, next.blockhash);
}

#[tokio::test]
async fn test_submit_returns_settled_status() {
    let options = MockOptions { confirm_after_polls: 3, ..MockOptions::default() };
    let node = MockNode::start_with(options).await;
    let rpc = client(&node);
    let source = Keypair::new();
    node.credit(&source.pubkey(), LAMPORTS_PER_SOL);

    let destination = Keypair::new().pubkey();
    let anchor = rpc.get_latest_blockhash().await.unwrap();
    let tx = TransferBuilder::build(&source, &destination.to_string(), "0.1", anchor.blockhash)
        .unwrap();

    let submitted = rpc.submit_transaction(&tx, anchor.last_valid_block_height).await.unwrap();
    assert_eq!(Some(&submitted.signature), tx.signatures.first());
    assert_eq!(submitted.status, TransactionStatus::Confirmed);
    assert_eq!(node.calls("getSignatureStatuses"), 3);
}

#[tokio::test]
async fn test_send_rejects_bad_signature() {
    let node = MockNode::start().await;
    let rpc = client(&node);
    let source = Keypair::new();
    node.credit(&source.pubkey(), LAMPORTS_PER_SOL);

    let anchor = rpc.get_latest_blockhash().await.unwrap();
    let destination = Keypair::new().pubkey().to_string();
    let mut tx = TransferBuilder::build(&source, &destination, "0.1", anchor.blockhash).unwrap();
    tx.signatures[0] = Signature::from([1u8; 64]);

    let result = rpc.send_transaction(&tx).await;
    assert!(matches!(result, Err(WalletError::Rpc { code: -32003, .. })), "{:?}", result);
}

#[tokio::test]
async fn test_confirming_unknown_signature_times_out() {
    let node = MockNode::start().await;
    let mut config = RpcConfig::for_url(node.url());
    config.poll_interval_ms = 20;
    config.confirm_timeout_ms = 150;
    let rpc = RpcClient::new(config).unwrap();

    let result = rpc.confirm_transaction(&Signature::from([9u8; 64])).await;
    match result {
        Err(WalletError::ConfirmationTimeout { signature, .. }) => {
            assert_eq!(signature, Signature::from([9u8; 64]))
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert!(node.calls("getSignatureStatuses") >= 2);
}

#[tokio::test]
async fn test_unknown_method_maps_to_unsupported_airdrop() {
    let options = MockOptions { airdrop_enabled: false, ..MockOptions::default() };
    let node = MockNode::start_with(options).await;
    let rpc = client(&node);

    let result = rpc.request_airdrop(&Keypair::new().pubkey(), 1).await;
    assert!(matches!(result, Err(WalletError::Unsupported(_))));
}

#[tokio::test]
async fn test_http_failure_is_network_error() {
    let route = warp::any()
        .map(|| warp::reply::with_status("upstream down", warp::http::StatusCode::BAD_GATEWAY));
    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);

    let rpc = RpcClient::new(RpcConfig::for_url(format!("http://{}", addr))).unwrap();
    let result = rpc.get_balance(&Keypair::new().pubkey()).await;
    match result {
        Err(WalletError::Network(message)) => assert!(message.contains("502")),
        other => panic!("unexpected result {:?}", other),
    }
}

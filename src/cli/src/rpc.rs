//! JSON-RPC client for the wallet's four network verbs.
//!
//! Every call is a single HTTP POST; nothing is retried. Confirmation is
//! observed by polling `getSignatureStatuses` until the configured commitment
//! is reached, the transaction's blockhash expires, or the wait budget runs out.

use crate::config::{Commitment, RpcConfig};
use crate::errors::WalletError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use wallet_core::{
    encode_transaction, parse_blockhash, Hash, Lamports, Pubkey, Signature, Transaction,
};

/// JSON-RPC code for an unknown method.
const METHOD_NOT_FOUND: i64 = -32601;

/// JSON-RPC 2.0 request.
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

/// JSON-RPC error object.
#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Results that the node wraps with the slot they were read at.
#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockhashInfo {
    blockhash: String,
    last_valid_block_height: u64,
}

/// One entry of a `getSignatureStatuses` result.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatusInfo {
    /// Slot the transaction was processed in
    pub slot: u64,
    /// Confirmations so far; `None` once rooted
    #[serde(default)]
    pub confirmations: Option<u64>,
    /// Execution error, if the transaction failed
    #[serde(default)]
    pub err: Option<Value>,
    /// Commitment level reached
    #[serde(default)]
    pub confirmation_status: Option<Commitment>,
}

impl SignatureStatusInfo {
    /// The commitment level this status has reached.
    pub fn commitment(&self) -> Commitment {
        match (self.confirmation_status, self.confirmations) {
            (Some(level), _) => level,
            (None, None) => Commitment::Finalized,
            (None, Some(_)) => Commitment::Processed,
        }
    }
}

/// Fate of a submitted transaction as far as the client knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Not yet seen at the required commitment
    Pending,
    /// Reached the required commitment and executed successfully
    Confirmed,
    /// Executed with an error, or can no longer land
    Failed(String),
}

impl TransactionStatus {
    /// Maps a status entry to a client-side status at `commitment`.
    pub fn from_info(info: Option<&SignatureStatusInfo>, commitment: Commitment) -> Self {
        match info {
            Some(info) if info.commitment() >= commitment => match &info.err {
                Some(err) => TransactionStatus::Failed(err.to_string()),
                None => TransactionStatus::Confirmed,
            },
            _ => TransactionStatus::Pending,
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Pending => f.write_str("pending"),
            TransactionStatus::Confirmed => f.write_str("confirmed"),
            TransactionStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// A transaction whose outcome has been observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTransaction {
    /// The transaction id
    pub signature: Signature,
    /// Confirmed or Failed; never Pending
    pub status: TransactionStatus,
}

/// A recent blockhash plus the last block height at which transactions
/// anchored to it are accepted.
#[derive(Debug, Clone, Copy)]
pub struct ValidityAnchor {
    /// The blockhash to embed in the message
    pub blockhash: Hash,
    /// Transactions using the blockhash expire after this height
    pub last_valid_block_height: u64,
    /// When the client fetched it
    pub fetched_at: Instant,
}

impl ValidityAnchor {
    /// Whether the anchor was fetched less than `max_age` ago.
    pub fn is_fresh(&self, max_age: Duration) -> bool {
        self.fetched_at.elapsed() < max_age
    }
}

/// Client for a single JSON-RPC endpoint.
#[derive(Debug)]
pub struct RpcClient {
    client: reqwest::Client,
    config: RpcConfig,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Creates a client for the endpoint described by `config`.
    pub fn new(config: RpcConfig) -> Result<Self, WalletError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            config,
            next_id: AtomicU64::new(1),
        })
    }

    /// The settings this client was built with.
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, WalletError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        debug!("-> {} {}", method, request.params);

        let response = self
            .client
            .post(&self.config.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| WalletError::Network(format!("{} request failed: {}", method, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| {
                WalletError::Network(format!("Failed to read {} response: {}", method, e))
            })?;
        debug!("<- {} {} {}", method, status, body);

        let parsed: Result<JsonRpcResponse<T>, _> = serde_json::from_str(&body);
        match parsed {
            Ok(JsonRpcResponse { error: Some(error), .. }) => {
                if let Some(data) = &error.data {
                    debug!("{} error data: {}", method, data);
                }
                Err(WalletError::Rpc {
                    code: error.code,
                    message: error.message,
                })
            }
            Ok(JsonRpcResponse { result: Some(result), .. }) if status.is_success() => Ok(result),
            _ if !status.is_success() => Err(WalletError::Network(format!(
                "{} returned HTTP {}: {}",
                method, status, body
            ))),
            Ok(_) => Err(WalletError::Network(format!("No result in {} response", method))),
            Err(e) => Err(WalletError::Network(format!(
                "Failed to parse {} response: {}",
                method, e
            ))),
        }
    }

    fn commitment_param(&self) -> Value {
        json!({ "commitment": self.config.commitment.as_str() })
    }

    /// Queries the balance of `address` in lamports.
    pub async fn get_balance(&self, address: &Pubkey) -> Result<Lamports, WalletError> {
        let balance: WithContext<Lamports> = self
            .call("getBalance", json!([address.to_string(), self.commitment_param()]))
            .await?;
        Ok(balance.value)
    }

    /// Asks the faucet to credit `address`. Only test clusters run one.
    pub async fn request_airdrop(
        &self,
        address: &Pubkey,
        lamports: Lamports,
    ) -> Result<Signature, WalletError> {
        if !self.config.cluster.supports_airdrop() {
            return Err(WalletError::Unsupported(format!(
                "airdrops are not available on {}",
                self.config.cluster
            )));
        }

        let signature: String = self
            .call("requestAirdrop", json!([address.to_string(), lamports]))
            .await
            .map_err(|e| match e {
                WalletError::Rpc { code, message } if code == METHOD_NOT_FOUND => {
                    let reason = format!("endpoint does not support airdrops: {}", message);
                    WalletError::Unsupported(reason)
                }
                other => other,
            })?;
        parse_signature(&signature)
    }

    /// Fetches a fresh validity anchor.
    pub async fn get_latest_blockhash(&self) -> Result<ValidityAnchor, WalletError> {
        let info: WithContext<BlockhashInfo> = self
            .call("getLatestBlockhash", json!([self.commitment_param()]))
            .await?;
        Ok(ValidityAnchor {
            blockhash: parse_blockhash(&info.value.blockhash)?,
            last_valid_block_height: info.value.last_valid_block_height,
            fetched_at: Instant::now(),
        })
    }

    /// Current block height.
    pub async fn get_block_height(&self) -> Result<u64, WalletError> {
        self.call("getBlockHeight", json!([self.commitment_param()])).await
    }

    /// Reads the current status of one transaction.
    pub async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<TransactionStatus, WalletError> {
        let statuses: WithContext<Vec<Option<SignatureStatusInfo>>> = self
            .call(
                "getSignatureStatuses",
                json!([[signature.to_string()], { "searchTransactionHistory": true }]),
            )
            .await?;
        let info = statuses.value.first().and_then(Option::as_ref);
        Ok(TransactionStatus::from_info(info, self.config.commitment))
    }

    /// Waits until `signature` is confirmed or failed.
    pub async fn confirm_transaction(
        &self,
        signature: &Signature,
    ) -> Result<TransactionStatus, WalletError> {
        self.wait_for(signature, None).await
    }

    /// Sends a signed transaction without waiting for it.
    pub async fn send_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Signature, WalletError> {
        let encoded = encode_transaction(transaction)?;
        let returned: String = self
            .call(
                "sendTransaction",
                json!([encoded, {
                    "encoding": "base64",
                    "preflightCommitment": self.config.commitment.as_str(),
                }]),
            )
            .await?;
        let returned = parse_signature(&returned)?;

        match transaction.signatures.first() {
            Some(local) if *local != returned => {
                warn!("Node reported signature {} for transaction {}", returned, local);
                Ok(*local)
            }
            Some(local) => Ok(*local),
            None => Ok(returned),
        }
    }

    /// Sends a signed transaction and waits for its outcome.
    ///
    /// Returns only once the transaction is Confirmed or Failed. If the node
    /// has not seen it by the time the chain passes `last_valid_block_height`
    /// it can never land and is reported as Failed.
    pub async fn submit_transaction(
        &self,
        transaction: &Transaction,
        last_valid_block_height: u64,
    ) -> Result<SubmittedTransaction, WalletError> {
        let signature = self.send_transaction(transaction).await?;
        info!("Submitted transaction {}", signature);

        let status = self.wait_for(&signature, Some(last_valid_block_height)).await?;
        Ok(SubmittedTransaction { signature, status })
    }

    async fn wait_for(
        &self,
        signature: &Signature,
        last_valid_block_height: Option<u64>,
    ) -> Result<TransactionStatus, WalletError> {
        let budget = self.config.confirm_timeout();
        let started = Instant::now();

        let settled = self.poll_until_settled(signature, last_valid_block_height);
        match tokio::time::timeout(budget, settled).await {
            Ok(result) => {
                if let Ok(status) = &result {
                    info!("Transaction {} {} after {:?}", signature, status, started.elapsed());
                }
                result
            }
            Err(_) => Err(WalletError::ConfirmationTimeout {
                signature: *signature,
                waited: budget,
            }),
        }
    }

    async fn poll_until_settled(
        &self,
        signature: &Signature,
        last_valid_block_height: Option<u64>,
    ) -> Result<TransactionStatus, WalletError> {
        let interval = self.config.poll_interval();
        loop {
            let status = self.get_signature_status(signature).await?;
            if status != TransactionStatus::Pending {
                return Ok(status);
            }

            if let Some(last_valid) = last_valid_block_height {
                let height = self.get_block_height().await?;
                if height > last_valid {
                    // The status may have landed between the two calls.
                    let status = self.get_signature_status(signature).await?;
                    if status != TransactionStatus::Pending {
                        return Ok(status);
                    }
                    return Ok(TransactionStatus::Failed(format!(
                        "blockhash expired at block height {} (last valid {})",
                        height, last_valid
                    )));
                }
            }

            debug!("Transaction {} pending, next poll in {:?}", signature, interval);
            tokio::time::sleep(interval).await;
        }
    }
}

fn parse_signature(text: &str) -> Result<Signature, WalletError> {
    wallet_core::parse_signature(text)
        .map_err(|e| WalletError::Network(format!("Node returned a malformed signature: {}", e)))
}

//!
//! JSON-RPC client for the credential ledger.
//!
//! Submits mint transactions for non-transferable credential tokens and polls
//! for their confirmation receipts. The `CredentialLedger` trait is the seam
//! consumed by the provisioning orchestrator; `JsonRpcLedger` is the default
//! implementation talking to a ledger node over HTTP JSON-RPC.

use super::types::{LedgerError, MintReceipt, MintRequest, PendingMint};
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};

/// Contract consumed by the provisioning orchestrator.
///
/// `mint` submits the transaction and returns once the ledger has acknowledged
/// it; confirmation is awaited separately through the returned `PendingMint`.
#[async_trait::async_trait]
pub trait CredentialLedger: Send + Sync {
    /// Submit a mint transaction for the caller's account.
    async fn mint(&self, request: &MintRequest) -> Result<PendingMint, LedgerError>;
}

/// Configuration for the JSON-RPC ledger client
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Interval between receipt polls.
    pub poll_interval: Duration,
    /// Timeout for individual RPC requests.
    pub request_timeout: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Credential ledger client over HTTP JSON-RPC
#[derive(Clone)]
pub struct JsonRpcLedger {
    http_client: Client,
    rpc_url: String,
    config: LedgerConfig,
}

impl JsonRpcLedger {
    /// Create a new ledger client for the given RPC endpoint.
    pub fn new(rpc_url: String, config: LedgerConfig) -> Self {
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            rpc_url,
            config,
        }
    }

    /// Execute a JSON-RPC request and return the `result` member.
    async fn execute_rpc(
        http_client: &Client,
        rpc_url: &str,
        method: &str,
        params: Value,
    ) -> Result<Value, LedgerError> {
        let request_body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        debug!("Ledger RPC {}: {}", method, request_body);

        let response = http_client
            .post(rpc_url)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LedgerError::Rpc(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let response_json: Value = response.json().await?;

        if let Some(error) = response_json.get("error") {
            return Err(LedgerError::Rpc(format!("RPC error: {}", error)));
        }

        response_json
            .get("result")
            .cloned()
            .ok_or(LedgerError::NoData)
    }

    /// Poll the ledger until the receipt for `transaction_id` is available.
    ///
    /// The base design enforces no deadline here; the caller bounds the wait if
    /// it wants one.
    async fn await_receipt(
        http_client: Client,
        rpc_url: String,
        transaction_id: String,
        poll_interval: Duration,
    ) -> Result<MintReceipt, LedgerError> {
        loop {
            let result = Self::execute_rpc(
                &http_client,
                &rpc_url,
                "credential_getMintReceipt",
                json!([transaction_id]),
            )
            .await?;

            if !result.is_null() {
                let receipt: MintReceipt = serde_json::from_value(result)?;
                info!(
                    "Mint {} confirmed with transaction hash {}",
                    transaction_id, receipt.transaction_hash
                );
                return Ok(receipt);
            }

            debug!("Mint {} not yet confirmed, polling again", transaction_id);
            tokio::time::sleep(poll_interval).await;
        }
    }
}

#[async_trait::async_trait]
impl CredentialLedger for JsonRpcLedger {
    async fn mint(&self, request: &MintRequest) -> Result<PendingMint, LedgerError> {
        let result = Self::execute_rpc(
            &self.http_client,
            &self.rpc_url,
            "credential_mint",
            json!([
                request.owner,
                request.display_name,
                request.metadata_uri,
                request.record_id,
                { "from": request.owner },
            ]),
        )
        .await?;

        let transaction_id = result
            .as_str()
            .ok_or(LedgerError::NoData)?
            .to_string();

        info!(
            "Submitted mint for record {} as transaction {}",
            request.record_id, transaction_id
        );

        let receipt = Box::pin(Self::await_receipt(
            self.http_client.clone(),
            self.rpc_url.clone(),
            transaction_id.clone(),
            self.config.poll_interval,
        ));

        Ok(PendingMint::new(transaction_id, receipt))
    }
}

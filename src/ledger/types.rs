//! Types for the credential ledger client

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Parameters for minting one non-transferable credential token.
///
/// The token is bound to exactly one identity record: `metadata_uri` is derived
/// deterministically from `record_id`, and the ledger keeps the link between
/// token and record authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintRequest {
	/// Ledger account that will own the token (also the `from` account).
	pub owner: String,
	/// Display name embedded in the token.
	pub display_name: String,
	/// Metadata URI derived from the record id.
	pub metadata_uri: String,
	/// Id of the identity record this token references.
	pub record_id: String,
}

/// Confirmation emitted by the ledger once a submitted mint lands on chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintReceipt {
	/// Hash of the minting transaction.
	#[serde(rename = "transactionHash")]
	pub transaction_hash: String,
}

/// Error types for ledger operations
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
	#[error("RPC error: {0}")]
	Rpc(String),

	#[error("no data returned")]
	NoData,

	#[error("timed out after {0:?} waiting for mint receipt")]
	ReceiptTimeout(Duration),

	#[error("HTTP error: {0}")]
	HttpError(#[from] reqwest::Error),

	#[error("JSON parse error: {0}")]
	JsonError(#[from] serde_json::Error),
}

type ReceiptFuture = Pin<Box<dyn Future<Output = Result<MintReceipt, LedgerError>> + Send>>;

/// A submitted mint whose confirmation is still outstanding.
///
/// The receipt is modeled as a single awaited future keyed by the submitted
/// transaction id: it resolves exactly once, when the ledger confirms this
/// specific mint. Dropping the value abandons the wait without cancelling the
/// on-chain transaction.
pub struct PendingMint {
	transaction_id: String,
	receipt: ReceiptFuture,
}

impl PendingMint {
	/// Wrap a submitted transaction id and the future that resolves its receipt.
	pub fn new(transaction_id: String, receipt: ReceiptFuture) -> Self {
		Self {
			transaction_id,
			receipt,
		}
	}

	/// Id assigned by the ledger at submission time.
	pub fn transaction_id(&self) -> &str {
		&self.transaction_id
	}

	/// Suspend until the ledger emits the confirmation for this mint.
	pub async fn receipt(self) -> Result<MintReceipt, LedgerError> {
		self.receipt.await
	}
}

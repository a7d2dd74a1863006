//! Types for the collection-oriented record store API

use serde::{Deserialize, Serialize};

/// Handle returned by the store after creating a record.
///
/// The store assigns the authoritative record id; callers must use this id for
/// all subsequent record method calls, not the id they proposed in the field
/// array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedRecord {
	/// The id under which the record was stored.
	pub id: String,
}

/// Error types for record store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	#[error("store rejected request: {0}")]
	Rejected(String),

	#[error("no data returned")]
	NoData,

	#[error("HTTP error: {0}")]
	HttpError(#[from] reqwest::Error),

	#[error("JSON parse error: {0}")]
	JsonError(#[from] serde_json::Error),
}

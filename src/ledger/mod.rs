//! Credential ledger integration
//!
//! Client for the blockchain ledger that mints non-transferable credential
//! tokens and confirms them with receipts.

pub mod client;
pub mod types;

pub use client::{CredentialLedger, JsonRpcLedger, LedgerConfig};
pub use types::*;

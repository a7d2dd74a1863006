//! Record store integration
//!
//! Collection/record API client for the remote document database that holds
//! identity records.

pub mod client;
pub mod types;

pub use client::{HttpRecordStore, RecordStore};
pub use types::*;

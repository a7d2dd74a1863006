//!
//! HTTP client for the collection-oriented record store.
//!
//! This module provides the `RecordStore` trait consumed by the provisioning
//! orchestrator and the preference synchronizer, together with `HttpRecordStore`,
//! an async JSON-over-HTTP implementation. Records are created with an ordered
//! field array and mutated through named record methods, mirroring the store's
//! collection API. All methods are async and designed for use with Tokio.

use super::types::{CreatedRecord, StoreError};
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};

/// Contract consumed by the core components.
///
/// `create` inserts a new record built from an ordered field array and returns
/// the handle carrying the store-assigned id. `call` invokes a named mutation
/// method on an existing record with ordered arguments.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Create a record in the given collection from an ordered field array.
    async fn create(
        &self,
        collection: &str,
        fields: Vec<Value>,
    ) -> Result<CreatedRecord, StoreError>;

    /// Invoke a mutation method on the record identified by `record_id`.
    async fn call(
        &self,
        collection: &str,
        record_id: &str,
        method: &str,
        args: Vec<Value>,
    ) -> Result<(), StoreError>;
}

/// Record store client over HTTP JSON
#[derive(Clone)]
pub struct HttpRecordStore {
    /// The underlying HTTP client.
    http_client: Client,
    /// The base URL for the store's collection API.
    base_url: String,
}

impl HttpRecordStore {
    /// Create a new record store client for the given base URL.
    pub fn new(base_url: String) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            base_url,
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/collections/{}/records", self.base_url, collection)
    }

    fn method_url(&self, collection: &str, record_id: &str, method: &str) -> String {
        format!(
            "{}/collections/{}/records/{}/call/{}",
            self.base_url, collection, record_id, method
        )
    }

    /// Execute a store request and return the parsed response envelope.
    async fn execute(&self, url: &str, args: Vec<Value>) -> Result<Value, StoreError> {
        let request_body = json!({ "args": args });
        debug!("Store request to {}: {}", url, request_body);

        let response = self
            .http_client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::Rejected(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let response_json: Value = response.json().await?;

        if let Some(error) = response_json.get("error") {
            return Err(StoreError::Rejected(format!("store error: {}", error)));
        }

        Ok(response_json)
    }
}

#[async_trait::async_trait]
impl RecordStore for HttpRecordStore {
    async fn create(
        &self,
        collection: &str,
        fields: Vec<Value>,
    ) -> Result<CreatedRecord, StoreError> {
        let url = self.collection_url(collection);
        let response = self.execute(&url, fields).await?;

        let id = response
            .get("data")
            .and_then(|data| data.get("id"))
            .and_then(|id| id.as_str())
            .ok_or(StoreError::NoData)?
            .to_string();

        info!("Created record {} in collection {}", id, collection);
        Ok(CreatedRecord { id })
    }

    async fn call(
        &self,
        collection: &str,
        record_id: &str,
        method: &str,
        args: Vec<Value>,
    ) -> Result<(), StoreError> {
        let url = self.method_url(collection, record_id, method);
        self.execute(&url, args).await?;

        debug!(
            "Called {} on record {} in collection {}",
            method, record_id, collection
        );
        Ok(())
    }
}

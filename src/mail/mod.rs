//!
//! Confirmation mail delivery.
//!
//! The `NotificationSender` trait is the seam consumed by the provisioning
//! orchestrator; `HttpMailer` posts to a mail-service endpoint. Delivery is a
//! single best-effort call with no retry.

use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::info;

/// Error types for mail delivery
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail service rejected request: {0}")]
    Rejected(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// Contract consumed by the provisioning orchestrator.
#[async_trait::async_trait]
pub trait NotificationSender: Send + Sync {
    /// Send the signup confirmation mail.
    async fn send(&self, display_name: &str, email: &str) -> Result<(), MailError>;
}

/// Mail sender over HTTP JSON
#[derive(Clone)]
pub struct HttpMailer {
    http_client: Client,
    service_url: String,
}

impl HttpMailer {
    /// Create a new mailer for the given mail-service endpoint.
    pub fn new(service_url: String) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            service_url,
        }
    }
}

#[async_trait::async_trait]
impl NotificationSender for HttpMailer {
    async fn send(&self, display_name: &str, email: &str) -> Result<(), MailError> {
        let body = json!({
            "name": display_name,
            "email": email,
        });

        let response = self
            .http_client
            .post(&self.service_url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MailError::Rejected(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        info!("Sent confirmation mail to {}", email);
        Ok(())
    }
}

//! Event system for the provisioning workflow.
//!
//! Every transition of the provisioning state machine emits a step marker
//! through the dispatcher defined here. The markers decouple the workflow from
//! observers (logging, audit, a future compensating-action extension) without
//! letting an observer failure disturb the workflow itself: handler errors are
//! logged and swallowed, and the sequence of markers records exactly which
//! remote effects have been applied when a run fails partway.

use crate::identity::provision::orchestrator::ProvisionStage;
use crate::identity::types::ProvisionError;

/// Step markers emitted while provisioning one signup
#[derive(Debug, Clone)]
pub enum ProvisionEvent {
    /// The identity record exists in the store.
    RecordCreated { record_id: String },
    /// The mint transaction was acknowledged by the ledger.
    MintSubmitted {
        record_id: String,
        transaction_id: String,
    },
    /// The ledger confirmed the mint.
    ReceiptConfirmed {
        record_id: String,
        transaction_hash: String,
    },
    /// The confirmation mail was delivered.
    NotificationSent { record_id: String },
    /// The transaction hash was written back onto the record.
    HashReconciled {
        record_id: String,
        transaction_hash: String,
    },
    /// The workflow failed at the given stage.
    ProvisionFailed {
        stage: ProvisionStage,
        error: String,
    },
}

/// Trait for observing provisioning step markers.
#[async_trait::async_trait]
pub trait ProvisionEventHandler: Send + Sync {
    /// Handle a step marker.
    ///
    /// Called for every event emitted by the orchestrator, in emission order.
    async fn handle(&mut self, event: &ProvisionEvent) -> Result<(), ProvisionError>;

    /// Get the name of this handler for logging and diagnostics.
    fn name(&self) -> &'static str;
}

/// Event dispatcher that manages multiple event handlers.
///
/// Handlers are called in registration order for each event. Errors from
/// handlers are logged but do not stop other handlers, and never fail the
/// workflow.
pub struct EventDispatcher {
    handlers: Vec<Box<dyn ProvisionEventHandler>>,
}

impl EventDispatcher {
    /// Create a new, empty event dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register a new event handler.
    pub fn register_handler(&mut self, handler: Box<dyn ProvisionEventHandler>) {
        self.handlers.push(handler);
    }

    /// Dispatch an event to all registered handlers.
    pub async fn dispatch(&mut self, event: &ProvisionEvent) {
        for handler in &mut self.handlers {
            if let Err(e) = handler.handle(event).await {
                tracing::error!("Handler {} failed to process event: {}", handler.name(), e);
                // Continue processing with other handlers
            }
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

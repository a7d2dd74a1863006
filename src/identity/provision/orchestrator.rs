//! Provisioning orchestrator for one signup.
//!
//! This module defines the `ProvisioningOrchestrator`, which drives the ordered
//! sequence of remote effects that turns a validated signup form into a fully
//! provisioned identity: create the record in the store, mint the credential
//! token on the ledger, wait for the on-chain confirmation, send the
//! confirmation mail, and write the transaction hash back onto the record.
//!
//! The orchestrator is responsible for:
//! - Validating the form locally before any remote call is issued
//! - Enforcing strict step order: a step never begins before its predecessor's
//!   remote effect is acknowledged
//! - Emitting a step marker per transition so observers can tell exactly which
//!   effects were applied when a run fails partway
//! - Surfacing one tagged outcome per submission
//!
//! The workflow is a forward-only saga: failures after record creation leave
//! durable partial state (a record without a hash, possibly a minted token)
//! that is not rolled back. Re-submission while a run is in flight is not
//! guarded here; the caller must disable its submit path.

use crate::identity::provision::events::{EventDispatcher, ProvisionEvent, ProvisionEventHandler};
use crate::identity::provision::metadata::{generate_record_id, metadata_uri};
use crate::identity::types::{IdentityRecord, ProvisionError, SignupForm};
use crate::ledger::{CredentialLedger, LedgerError, MintRequest};
use crate::mail::NotificationSender;
use crate::store::RecordStore;

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// States of the provisioning workflow, in forward order.
///
/// `Failed` is reachable from any non-terminal state; `Complete` is the only
/// successful terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStage {
    Idle,
    CreatingRecord,
    RecordCreated,
    Minting,
    AwaitingReceipt,
    Notifying,
    Reconciling,
    Complete,
    Failed,
}

impl ProvisionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProvisionStage::Idle => "idle",
            ProvisionStage::CreatingRecord => "creating record",
            ProvisionStage::RecordCreated => "record created",
            ProvisionStage::Minting => "minting",
            ProvisionStage::AwaitingReceipt => "awaiting receipt",
            ProvisionStage::Notifying => "notifying",
            ProvisionStage::Reconciling => "reconciling",
            ProvisionStage::Complete => "complete",
            ProvisionStage::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ProvisionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the provisioning workflow
#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    /// Store collection that holds identity records.
    pub collection: String,
    /// Optional bound on the receipt wait. The base behavior is unbounded: an
    /// unconfirmed mint suspends the run indefinitely.
    pub receipt_timeout: Option<Duration>,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            collection: "UserSBT".to_string(),
            receipt_timeout: None,
        }
    }
}

/// Successful result of one provisioning run.
///
/// Reaching `Complete` also signals the caller to advance to the next screen
/// and to discard any cached application state, so the next screen re-reads
/// fresh identity state.
#[derive(Debug, Clone)]
pub struct ProvisionOutcome {
    /// Store-assigned id of the created record.
    pub record_id: String,
    /// Hash of the confirmed mint transaction, as reconciled onto the record.
    pub transaction_hash: String,
}

/// Drives the create → mint → confirm → notify → reconcile sequence.
///
/// The orchestrator owns its collaborators and an event dispatcher; context
/// (the caller's ledger address) is passed in at construction, never read from
/// ambient state.
pub struct ProvisioningOrchestrator {
    store: Arc<dyn RecordStore>,
    ledger: Arc<dyn CredentialLedger>,
    mailer: Arc<dyn NotificationSender>,
    config: ProvisionConfig,
    owner_address: String,
    dispatcher: EventDispatcher,
    stage: ProvisionStage,
}

impl ProvisioningOrchestrator {
    /// Create a new orchestrator for the given caller address.
    pub fn new(
        store: Arc<dyn RecordStore>,
        ledger: Arc<dyn CredentialLedger>,
        mailer: Arc<dyn NotificationSender>,
        config: ProvisionConfig,
        owner_address: String,
    ) -> Self {
        Self {
            store,
            ledger,
            mailer,
            config,
            owner_address,
            dispatcher: EventDispatcher::new(),
            stage: ProvisionStage::Idle,
        }
    }

    /// Register an observer for the workflow's step markers.
    pub fn register_handler(&mut self, handler: Box<dyn ProvisionEventHandler>) {
        self.dispatcher.register_handler(handler);
    }

    /// Current state of the workflow.
    pub fn stage(&self) -> ProvisionStage {
        self.stage
    }

    /// Execute the signup sequence exactly once for this submission.
    ///
    /// Steps run strictly in order; step n+1 never begins before step n's
    /// remote effect is acknowledged. A validation failure leaves the machine
    /// `Idle` with no remote call issued; any later failure transitions to
    /// `Failed` with the error naming the step.
    pub async fn submit(&mut self, form: &SignupForm) -> Result<ProvisionOutcome, ProvisionError> {
        // A validation failure must leave the machine Idle with nothing issued.
        self.stage = ProvisionStage::Idle;
        form.validate()?;

        let display_name = form.display_name();

        // Step 1: create the identity record
        self.stage = ProvisionStage::CreatingRecord;
        info!("Creating identity record for {}", display_name);

        let record = IdentityRecord::new(
            generate_record_id(),
            display_name.clone(),
            self.owner_address.clone(),
            form.email.clone(),
        );
        let created = match self
            .store
            .create(&self.config.collection, record.to_field_values())
            .await
        {
            Ok(created) => created,
            Err(e) => return Err(self.fail(ProvisionError::RecordCreation(e)).await),
        };

        // The store-assigned id is authoritative from here on.
        let record_id = created.id;
        self.stage = ProvisionStage::RecordCreated;
        self.dispatcher
            .dispatch(&ProvisionEvent::RecordCreated {
                record_id: record_id.clone(),
            })
            .await;

        // Step 2: mint the credential token referencing the record
        self.stage = ProvisionStage::Minting;
        let request = MintRequest {
            owner: self.owner_address.clone(),
            display_name: display_name.clone(),
            metadata_uri: metadata_uri(&record_id),
            record_id: record_id.clone(),
        };
        info!("Submitting credential mint for record {}", record_id);

        let pending = match self.ledger.mint(&request).await {
            Ok(pending) => pending,
            Err(e) => return Err(self.fail(ProvisionError::MintSubmission(e)).await),
        };
        let transaction_id = pending.transaction_id().to_string();
        self.dispatcher
            .dispatch(&ProvisionEvent::MintSubmitted {
                record_id: record_id.clone(),
                transaction_id: transaction_id.clone(),
            })
            .await;

        // Step 3: suspend until the ledger confirms this mint
        self.stage = ProvisionStage::AwaitingReceipt;
        info!("Awaiting receipt for transaction {}", transaction_id);

        let receipt = match self.config.receipt_timeout {
            Some(limit) => match tokio::time::timeout(limit, pending.receipt()).await {
                Ok(result) => result,
                Err(_) => Err(LedgerError::ReceiptTimeout(limit)),
            },
            None => pending.receipt().await,
        };
        let receipt = match receipt {
            Ok(receipt) => receipt,
            Err(e) => return Err(self.fail(ProvisionError::ReceiptWait(e)).await),
        };
        self.dispatcher
            .dispatch(&ProvisionEvent::ReceiptConfirmed {
                record_id: record_id.clone(),
                transaction_hash: receipt.transaction_hash.clone(),
            })
            .await;

        // Step 4: confirmation mail. A failure here leaves the mint and the
        // record standing; the run is not restarted from step 1.
        self.stage = ProvisionStage::Notifying;
        if let Err(e) = self.mailer.send(&display_name, &form.email).await {
            return Err(self.fail(ProvisionError::Notification(e)).await);
        }
        self.dispatcher
            .dispatch(&ProvisionEvent::NotificationSent {
                record_id: record_id.clone(),
            })
            .await;

        // Step 5: write the hash back onto the record
        self.stage = ProvisionStage::Reconciling;
        if let Err(e) = self
            .store
            .call(
                &self.config.collection,
                &record_id,
                "updateTxnHash",
                vec![json!(receipt.transaction_hash)],
            )
            .await
        {
            return Err(self.fail(ProvisionError::Reconciliation(e)).await);
        }
        self.dispatcher
            .dispatch(&ProvisionEvent::HashReconciled {
                record_id: record_id.clone(),
                transaction_hash: receipt.transaction_hash.clone(),
            })
            .await;

        self.stage = ProvisionStage::Complete;
        info!(
            "Provisioning complete for record {} (transaction {})",
            record_id, receipt.transaction_hash
        );

        Ok(ProvisionOutcome {
            record_id,
            transaction_hash: receipt.transaction_hash,
        })
    }

    /// Record a failure: mark the stage it occurred at, move to `Failed`.
    async fn fail(&mut self, error: ProvisionError) -> ProvisionError {
        let stage = self.stage;
        self.stage = ProvisionStage::Failed;
        self.dispatcher
            .dispatch(&ProvisionEvent::ProvisionFailed {
                stage,
                error: error.to_string(),
            })
            .await;
        error
    }
}

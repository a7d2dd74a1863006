mod identity;
mod ledger;
mod mail;
mod store;

use std::sync::Arc;
use tracing::{error, info};

use crate::identity::provision::ProvisionConfig;
use crate::identity::provision::events::{ProvisionEvent, ProvisionEventHandler};
use crate::identity::{
	Frequency, INTEREST_TOPICS, PreferenceEdit, PreferenceSynchronizer, ProvisionError,
	ProvisioningOrchestrator, SignupForm,
};
use crate::ledger::{JsonRpcLedger, LedgerConfig};
use crate::mail::HttpMailer;
use crate::store::HttpRecordStore;

fn env_or(key: &str, default: &str) -> String {
	std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Logs every step marker of a provisioning run.
struct AuditLogHandler;

#[async_trait::async_trait]
impl ProvisionEventHandler for AuditLogHandler {
	async fn handle(&mut self, event: &ProvisionEvent) -> Result<(), ProvisionError> {
		info!("Provisioning step: {:?}", event);
		Ok(())
	}

	fn name(&self) -> &'static str {
		"AuditLogHandler"
	}
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::from_default_env()
				.add_directive(tracing::Level::INFO.into()),
		)
		.with_target(false)
		.with_thread_ids(false)
		.with_thread_names(false)
		.with_file(false)
		.with_line_number(false)
		.with_timer(tracing_subscriber::fmt::time::time())
		.init();

	info!("Starting identity provisioning service");
	info!(
		"{} interest topics, {} mail frequencies available",
		INTEREST_TOPICS.len(),
		Frequency::ALL.len()
	);

	let store_url = env_or("RECORD_STORE_URL", "https://testnet.polybase.xyz/v0");
	let ledger_url = env_or("LEDGER_RPC_URL", "http://localhost:8545");
	let mail_url = env_or("MAIL_SERVICE_URL", "http://localhost:4100/send");
	let owner_address = env_or("OWNER_ADDRESS", "0x54945746bcbd3b5d82e5f39f96a704e0cd20a095");

	let record_store = Arc::new(HttpRecordStore::new(store_url));
	let ledger = Arc::new(JsonRpcLedger::new(ledger_url, LedgerConfig::default()));
	let mailer = Arc::new(HttpMailer::new(mail_url));

	info!("Created record store, ledger, and mail clients");

	let mut orchestrator = ProvisioningOrchestrator::new(
		record_store.clone(),
		ledger,
		mailer,
		ProvisionConfig::default(),
		owner_address,
	);
	orchestrator.register_handler(Box::new(AuditLogHandler));

	let form = SignupForm {
		email: env_or("SIGNUP_EMAIL", "ada@example.com"),
		password: "correct horse battery staple".to_string(),
		conf_password: "correct horse battery staple".to_string(),
		first_name: env_or("SIGNUP_FIRST_NAME", "Ada"),
		last_name: env_or("SIGNUP_LAST_NAME", "Lovelace"),
	};

	// Workflow boundary: one tagged outcome per submission, no automatic retry.
	let outcome = match orchestrator.submit(&form).await {
		Ok(outcome) => outcome,
		Err(e) => {
			error!(
				"Provisioning failed at {} stage: {}",
				orchestrator.stage(),
				e
			);
			return;
		}
	};

	info!(
		"Provisioned record {} with transaction {}",
		outcome.record_id, outcome.transaction_hash
	);

	// The profile screen owns a synchronizer for the record's lifetime and
	// feeds it one edit per interaction.
	let mut preferences = PreferenceSynchronizer::new(
		record_store,
		"UserSBT".to_string(),
		outcome.record_id,
		Vec::new(),
		Frequency::default(),
	);

	for topic in ["Blockchain", "Machine Learning"] {
		preferences
			.apply(PreferenceEdit::Interest {
				topic: topic.to_string(),
				active: true,
			})
			.await;
	}
	preferences
		.apply(PreferenceEdit::Frequency(Frequency::Weekly))
		.await;

	info!(
		"Preferences set: {:?} at {} frequency",
		preferences.interests(),
		preferences.frequency()
	);
}

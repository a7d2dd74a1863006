use crate::ledger::LedgerError;
use crate::mail::MailError;
use crate::store::StoreError;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Topics a user can mark as interests on the profile screen
pub const INTEREST_TOPICS: [&str; 13] = [
	"Data Science",
	"Innovation",
	"Future of Technology",
	"Blockchain",
	"VR",
	"Big Data",
	"Machine Learning",
	"IoT",
	"AR",
	"Fintech",
	"Healthcare",
	"User Experience",
	"Productivity",
];

/// Mail frequency vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Frequency {
	#[default]
	Daily,
	Weekly,
	Monthly,
	MonWedFri,
	Weekends,
}

impl Frequency {
	/// All selectable frequencies, in display order.
	pub const ALL: [Frequency; 5] = [
		Frequency::Daily,
		Frequency::Weekly,
		Frequency::Monthly,
		Frequency::MonWedFri,
		Frequency::Weekends,
	];

	/// The string stored on the remote record.
	pub fn as_str(&self) -> &'static str {
		match self {
			Frequency::Daily => "Daily",
			Frequency::Weekly => "Weekly",
			Frequency::Monthly => "Monthly",
			Frequency::MonWedFri => "Monday | Wednesday | Friday",
			Frequency::Weekends => "Weekends",
		}
	}
}

impl std::fmt::Display for Frequency {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Form fields collected by the signup screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupForm {
	pub email: String,
	pub password: String,
	pub conf_password: String,
	pub first_name: String,
	pub last_name: String,
}

impl SignupForm {
	/// Validate the form locally, before any remote call is issued.
	pub fn validate(&self) -> Result<(), ProvisionError> {
		let required = [
			("email", &self.email),
			("password", &self.password),
			("confirm password", &self.conf_password),
			("first name", &self.first_name),
			("last name", &self.last_name),
		];
		for (name, value) in required {
			if value.is_empty() {
				return Err(ProvisionError::Validation(format!("{} is required", name)));
			}
		}

		if self.password != self.conf_password {
			return Err(ProvisionError::Validation(
				"passwords do not match".to_string(),
			));
		}

		Ok(())
	}

	/// Concatenated display name used on both the record and the token.
	pub fn display_name(&self) -> String {
		format!("{} {}", self.first_name, self.last_name)
	}
}

/// An identity record as held in the remote record store.
///
/// `transaction_hash` stays empty until the ledger confirms a mint referencing
/// this record's id; once set it is never cleared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityRecord {
	pub id: String,
	pub display_name: String,
	pub owner_address: String,
	pub created_at: i64,
	pub updated_at: i64,
	pub profile_image_url: String,
	pub interests: Vec<String>,
	pub transaction_hash: String,
	pub frequency: Frequency,
	pub email: String,
}

impl IdentityRecord {
	/// Build a fresh record for a signup, with current timestamps and the
	/// field defaults used at creation time.
	pub fn new(id: String, display_name: String, owner_address: String, email: String) -> Self {
		let now = chrono::Utc::now().timestamp_millis();
		Self {
			id,
			display_name,
			owner_address,
			created_at: now,
			updated_at: now,
			profile_image_url: String::new(),
			interests: Vec::new(),
			transaction_hash: String::new(),
			frequency: Frequency::default(),
			email,
		}
	}

	/// Encode as the ordered field array the store's create call expects.
	///
	/// The order is part of the store contract: `[id, displayName,
	/// ownerAddress, createdAt, updatedAt, profileImageUrl, interests[],
	/// transactionHash, frequency, email]`.
	pub fn to_field_values(&self) -> Vec<Value> {
		vec![
			json!(self.id),
			json!(self.display_name),
			json!(self.owner_address),
			json!(self.created_at),
			json!(self.updated_at),
			json!(self.profile_image_url),
			json!(self.interests),
			json!(self.transaction_hash),
			json!(self.frequency.as_str()),
			json!(self.email),
		]
	}
}

/// A single preference edit produced by UI interaction.
///
/// Transient: consumed immediately by the synchronizer, never persisted.
#[derive(Debug, Clone)]
pub enum PreferenceEdit {
	Interest { topic: String, active: bool },
	Frequency(Frequency),
}

/// Error taxonomy for the provisioning workflow.
///
/// Each variant names the step at which the workflow failed and wraps the
/// failing remote call. `Validation` is the only variant raised before any
/// remote effect.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
	#[error("validation failed: {0}")]
	Validation(String),

	#[error("record creation failed: {0}")]
	RecordCreation(#[source] StoreError),

	#[error("mint submission failed: {0}")]
	MintSubmission(#[source] LedgerError),

	#[error("waiting for mint receipt failed: {0}")]
	ReceiptWait(#[source] LedgerError),

	#[error("confirmation mail failed: {0}")]
	Notification(#[source] MailError),

	#[error("transaction hash reconciliation failed: {0}")]
	Reconciliation(#[source] StoreError),
}

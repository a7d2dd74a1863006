pub mod preferences;
pub mod provision;
pub mod types;

pub use preferences::PreferenceSynchronizer;
pub use provision::ProvisioningOrchestrator;
pub use types::*;

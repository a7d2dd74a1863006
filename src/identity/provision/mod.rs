//! Identity Provisioning Workflow
//!
//! This module provides the core logic for provisioning one signup: creating
//! the identity record, minting its credential token, waiting for the on-chain
//! confirmation, sending the confirmation mail, and reconciling the
//! transaction hash back onto the record. It is composed of three submodules:
//!
//! - `orchestrator`: The state machine that drives the five remote effects in
//!   strict order and surfaces one outcome per submission.
//! - `events`: Step markers emitted per transition, with the handler trait and
//!   dispatcher used to observe a run.
//! - `metadata`: Pure derivation of record ids and token metadata URIs.

/// Step markers and their dispatcher
pub mod events;
/// Record id and metadata URI derivation
pub mod metadata;
/// The signup state machine
pub mod orchestrator;

pub use orchestrator::*;

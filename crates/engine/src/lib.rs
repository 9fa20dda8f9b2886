//! `stocksync-engine` — inventory sync coordination.
//!
//! Every component here is a pure function over explicit inputs: no IO, no
//! shared state, no clocks read behind the caller's back. Dispatching batches,
//! retries and timeouts belong to the orchestrator that calls into this crate.

pub mod batch;
pub mod conflict;
pub mod pipeline;
pub mod priority;
pub mod scheduler;
pub mod validator;

pub use batch::{SyncBatch, plan};
pub use conflict::{ConflictResolutionResult, ResolvedFrom, resolve, resolve_with_config};
pub use pipeline::{InventoryLookup, NoInventory, SyncPlan, prepare, schedule_peers};
pub use priority::{calculate, calculate_with_config};
pub use scheduler::{ScheduledSync, SyncWindow, schedule};
pub use validator::{
    FieldError, InvalidRecord, SyncValidationResult, ValidationSummary, ValidationWarning, validate,
};

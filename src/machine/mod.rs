//! The LLFSM execution engine.
//!
//! # Key Concepts
//!
//! - **Step**: one tick. The first guard that holds moves the machine
//!   (exit, then entry); otherwise the current state's internal action runs
//!   and the state time advances.
//! - **Suspend/resume**: an engine-level override that parks the machine in
//!   its suspend state and later restores it, running only the dedicated
//!   suspend and resume callbacks.
//! - **Validation**: a structural check run once before the first step.

mod engine;
mod error;
mod validate;

pub use engine::{EngineStatus, Machine, StepOutcome};
pub use error::MachineError;
pub use validate::ValidationIssue;

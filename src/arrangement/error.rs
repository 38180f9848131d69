//! Arrangement error types.

use crate::arrangement::MachineId;
use crate::machine::{MachineError, ValidationIssue};
use thiserror::Error;

/// Errors from admitting or driving machines in an arrangement.
#[derive(Debug, Error)]
pub enum ArrangementError {
    /// The machine failed validation and was not admitted.
    #[error("Machine '{name}' failed validation with {} issue(s)", .issues.len())]
    InvalidMachine {
        name: String,
        issues: Vec<ValidationIssue>,
    },

    #[error("No machine with id {0}")]
    UnknownMachine(MachineId),

    #[error(transparent)]
    Machine(#[from] MachineError),
}

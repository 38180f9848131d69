//! Build errors for machine and state builders.

use thiserror::Error;

/// Ways a machine definition can be malformed.
///
/// Every variant rejects the whole machine; nothing is partially built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Machine '{machine}' has no states. Add at least one with .state(..)")]
    EmptyStateTable { machine: String },

    #[error("Suspend state index {index} is out of range for {len} states")]
    SuspendStateOutOfRange { index: usize, len: usize },

    #[error("Suspend state '{name}' is not a state of this machine")]
    UnknownSuspendState { name: String },

    /// The machine would start suspended with nothing to resume to.
    #[error("Suspend state '{name}' cannot be the initial state")]
    SuspendStateIsInitial { name: String },

    #[error("Transition from '{state}' targets index {target}, but the machine has {len} states")]
    TransitionTargetOutOfRange {
        state: String,
        target: usize,
        len: usize,
    },

    #[error("Transition from '{state}' targets unknown state '{target}'")]
    UnknownTargetState { state: String, target: String },

    #[error("State name '{name}' is used more than once")]
    DuplicateStateName { name: String },
}

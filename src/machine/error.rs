//! Errors raised by machine operations.

use thiserror::Error;

/// Errors from `suspend()` and `resume()`.
///
/// Neither error changes the machine; the call can be retried or ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    /// `suspend()` on a machine built without a suspend state.
    #[error("Machine '{machine}' has no suspend state and cannot be suspended")]
    UnsupportedOperation { machine: String },

    /// `resume()` on a machine that is not suspended.
    #[error("Machine '{machine}' is not suspended and cannot be resumed")]
    InvalidState { machine: String },
}

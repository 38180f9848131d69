//! Checkpoint error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("could not encode checkpoint: {0}")]
    SerializationFailed(String),

    #[error("could not decode checkpoint: {0}")]
    DeserializationFailed(String),

    /// Written by a newer or older runtime than this one understands.
    #[error("checkpoint format v{found} is not readable (expected v{supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Taken from a machine with another name or state table size.
    #[error("checkpoint of '{found}' cannot be restored onto '{expected}'")]
    MachineMismatch { expected: String, found: String },

    /// The recorded position does not fit the target machine.
    #[error("checkpoint position is invalid: {0}")]
    InvalidPosition(String),
}

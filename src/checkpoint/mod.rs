//! Checkpoint and restore of a machine's runtime position.
//!
//! A checkpoint captures where a machine is (current, previous and resume
//! state, state time) together with its variables, so a suspended controller
//! can be persisted and picked up later, possibly by another process. The
//! state table itself is code and is not serialized; a checkpoint can only
//! be restored onto a machine built from the same definition.

use crate::core::StateId;
use crate::machine::Machine;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a machine's position and variables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "C: Serialize",
    deserialize = "C: DeserializeOwned"
))]
pub struct Checkpoint<C> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: Uuid,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Name of the checkpointed machine
    pub machine: String,

    /// Size of the machine's state table
    pub state_count: usize,

    pub current: StateId,
    pub previous: Option<StateId>,
    pub resume_state: Option<StateId>,
    pub state_time: u64,

    /// When the current state was entered
    pub entered_at: DateTime<Utc>,

    /// Machine variables
    pub vars: C,
}

impl<C: Serialize + DeserializeOwned> Checkpoint<C> {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }
}

impl<C> Checkpoint<C> {
    fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }

    pub fn is_suspended(&self) -> bool {
        self.resume_state.is_some()
    }
}

impl<C> Machine<C> {
    /// Capture the machine's position and a copy of its variables.
    pub fn checkpoint(&self) -> Checkpoint<C>
    where
        C: Clone,
    {
        Checkpoint {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            machine: self.name.clone(),
            state_count: self.states.len(),
            current: self.current,
            previous: self.previous,
            resume_state: self.resume_state,
            state_time: self.state_time,
            entered_at: self.entered_at,
            vars: self.vars.clone(),
        }
    }

    /// Move the machine to the position recorded in `checkpoint`.
    ///
    /// No callbacks run and the transition log starts over empty. The
    /// checkpoint must come from a machine with the same name and table
    /// size, and its indices must be valid here; on error the machine is
    /// left untouched.
    pub fn restore(&mut self, checkpoint: Checkpoint<C>) -> Result<(), CheckpointError> {
        checkpoint.check_version()?;

        if checkpoint.machine != self.name || checkpoint.state_count != self.states.len() {
            return Err(CheckpointError::MachineMismatch {
                expected: format!("{} ({} states)", self.name, self.states.len()),
                found: format!("{} ({} states)", checkpoint.machine, checkpoint.state_count),
            });
        }

        let len = self.states.len();
        let positions = [
            Some(checkpoint.current),
            checkpoint.previous,
            checkpoint.resume_state,
        ];
        if let Some(bad) = positions.into_iter().flatten().find(|id| id.index() >= len) {
            return Err(CheckpointError::InvalidPosition(format!(
                "state {bad} is outside the {len}-state table"
            )));
        }

        if checkpoint.resume_state.is_some() && self.suspend_state != Some(checkpoint.current) {
            return Err(CheckpointError::InvalidPosition(format!(
                "suspended checkpoint at {} does not sit in this machine's suspend state",
                checkpoint.current
            )));
        }

        if checkpoint.resume_state.is_none() && self.suspend_state == Some(checkpoint.current) {
            return Err(CheckpointError::InvalidPosition(format!(
                "checkpoint sits in suspend state {} with no state to resume",
                checkpoint.current
            )));
        }

        self.current = checkpoint.current;
        self.previous = checkpoint.previous;
        self.resume_state = checkpoint.resume_state;
        self.state_time = checkpoint.state_time;
        self.entered_at = checkpoint.entered_at;
        self.vars = checkpoint.vars;
        self.history.clear();

        debug!(
            machine = %self.name,
            checkpoint = %checkpoint.id,
            state = %self.current,
            suspended = self.is_suspended(),
            "restored from checkpoint"
        );
        Ok(())
    }
}

//! Runtime configuration for machines and arrangements.
//!
//! Both structs deserialize with every field optional, so a partial JSON
//! document (or `{}`) yields the defaults for whatever is missing.

use serde::{Deserialize, Serialize};

/// Per-machine settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Number of records kept in the transition log; 0 disables it.
    pub history_capacity: usize,

    /// Emit a `trace` event for every tick that stays in its state.
    pub log_internal_ticks: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            history_capacity: 64,
            log_internal_ticks: false,
        }
    }
}

impl MachineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Settings for an [`Arrangement`](crate::arrangement::Arrangement).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrangementConfig {
    /// Upper bound on the ticks `run` will execute over the arrangement's
    /// lifetime. `None` means unbounded.
    pub max_ticks: Option<u64>,
}

impl ArrangementConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

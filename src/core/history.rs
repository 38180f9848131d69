//! Transition log.
//!
//! A bounded record of the state changes a machine has made: guarded
//! transitions as well as suspend, resume and restart. Once the log is full the
//! oldest record is dropped.

use super::state::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// What caused a change of the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// A guard fired during `step()`.
    Transition,
    /// The machine was suspended.
    Suspend,
    /// The machine was resumed.
    Resume,
    /// The machine was sent back to its initial state.
    Restart,
}

/// Record of a single change of the current state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub kind: TransitionKind,
    /// The state being left
    pub from: StateId,
    /// The state being entered
    pub to: StateId,
    /// Ticks spent in `from` before leaving it
    pub ticks_in_source: u64,
    /// When the change happened
    pub timestamp: DateTime<Utc>,
}

/// Bounded, ordered log of [`TransitionRecord`]s.
///
/// # Example
///
/// ```rust
/// use llfsm::core::{StateId, TransitionKind, TransitionLog, TransitionRecord};
/// use chrono::Utc;
///
/// let mut log = TransitionLog::with_capacity(2);
/// for to in 1..=3 {
///     log.record(TransitionRecord {
///         kind: TransitionKind::Transition,
///         from: StateId::new(to - 1),
///         to: StateId::new(to),
///         ticks_in_source: 0,
///         timestamp: Utc::now(),
///     });
/// }
///
/// assert_eq!(log.len(), 2);
/// assert_eq!(log.path(), vec![StateId::new(1), StateId::new(2), StateId::new(3)]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionLog {
    capacity: usize,
    records: VecDeque<TransitionRecord>,
}

impl Default for TransitionLog {
    fn default() -> Self {
        Self::with_capacity(64)
    }
}

impl TransitionLog {
    /// Create an empty log keeping at most `capacity` records.
    ///
    /// A capacity of zero disables recording.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a record, evicting the oldest one if the log is full.
    pub fn record(&mut self, record: TransitionRecord) {
        if self.capacity == 0 {
            return;
        }
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// States visited, oldest first: the `from` of the first retained
    /// record followed by the `to` of every record.
    pub fn path(&self) -> Vec<StateId> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(first.from);
        }
        path.extend(self.records.iter().map(|r| r.to));
        path
    }

    /// Time between the first and last retained record.
    ///
    /// Returns `None` if the log is empty.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

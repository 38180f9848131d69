//! Structural self-check of a machine's state table.
//!
//! The builder already makes most of these problems impossible, but a
//! state's behaviour can still be bound to the wrong state and a restored
//! checkpoint can carry stale indices. Validation collects every problem it
//! finds instead of stopping at the first one.

use crate::core::StateId;
use crate::machine::engine::Machine;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;
use tracing::{debug, warn};

/// A single structural problem found by [`Machine::validation_report`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("current state {current} is outside the {len}-state table")]
    CurrentOutOfRange { current: StateId, len: usize },

    #[error("state '{state}' sits at index {position} but is numbered {id}")]
    IndexMismatch {
        state: String,
        position: usize,
        id: StateId,
    },

    #[error("state '{state}' dispatches to callbacks bound to '{bound_to}'")]
    BindingMismatch { state: String, bound_to: String },

    #[error("state '{state}' has a transition to {target} outside the {len}-state table")]
    TargetOutOfRange {
        state: String,
        target: StateId,
        len: usize,
    },

    #[error("{role} state {id} is outside the {len}-state table")]
    ReferenceOutOfRange {
        role: &'static str,
        id: StateId,
        len: usize,
    },

    #[error("machine is suspended but current state {current} is not the suspend state")]
    SuspensionInconsistent { current: StateId },

    #[error("machine sits in suspend state {current} with no state to resume")]
    MissingResumeState { current: StateId },
}

type Check = Validation<(), NonEmptyVec<ValidationIssue>>;

fn check(ok: bool, issue: impl FnOnce() -> ValidationIssue) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(issue())
    }
}

impl<C> Machine<C> {
    /// Check the state table and runtime position, accumulating every issue.
    pub fn validation_report(&self) -> Validation<(), NonEmptyVec<ValidationIssue>> {
        let len = self.states.len();
        let in_range = |id: StateId| id.index() < len;
        let mut checks: Vec<Check> = Vec::new();

        checks.push(check(in_range(self.current), || {
            ValidationIssue::CurrentOutOfRange {
                current: self.current,
                len,
            }
        }));

        for (position, state) in self.states.iter().enumerate() {
            checks.push(check(state.id().index() == position, || {
                ValidationIssue::IndexMismatch {
                    state: state.name().to_string(),
                    position,
                    id: state.id(),
                }
            }));

            let bound_to = state.behaviour().binding();
            checks.push(check(bound_to == state.name(), || {
                ValidationIssue::BindingMismatch {
                    state: state.name().to_string(),
                    bound_to: bound_to.to_string(),
                }
            }));

            for transition in state.transitions() {
                checks.push(check(in_range(transition.target()), || {
                    ValidationIssue::TargetOutOfRange {
                        state: state.name().to_string(),
                        target: transition.target(),
                        len,
                    }
                }));
            }
        }

        let references = [
            ("previous", self.previous),
            ("suspend", self.suspend_state),
            ("resume", self.resume_state),
        ];
        for (role, id) in references {
            if let Some(id) = id {
                checks.push(check(in_range(id), || ValidationIssue::ReferenceOutOfRange {
                    role,
                    id,
                    len,
                }));
            }
        }

        if self.resume_state.is_some() {
            checks.push(check(self.suspend_state == Some(self.current), || {
                ValidationIssue::SuspensionInconsistent {
                    current: self.current,
                }
            }));
        } else {
            checks.push(check(self.suspend_state != Some(self.current), || {
                ValidationIssue::MissingResumeState {
                    current: self.current,
                }
            }));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Every issue found by [`validation_report`](Self::validation_report),
    /// empty for a sound machine.
    pub fn validation_issues(&self) -> Vec<ValidationIssue> {
        match self.validation_report() {
            Validation::Success(()) => Vec::new(),
            Validation::Failure(issues) => issues.iter().cloned().collect(),
        }
    }

    /// Check that the machine is structurally sound before it runs.
    ///
    /// Never fails; returns `false` and logs each issue when the table is
    /// corrupt. A sound, not yet validated machine moves from
    /// [`EngineStatus::Uninitialized`](crate::machine::EngineStatus) to
    /// `Running`.
    pub fn validate(&mut self) -> bool {
        let issues = self.validation_issues();
        if issues.is_empty() {
            self.validated = true;
            debug!(machine = %self.name, states = self.states.len(), "machine validated");
            return true;
        }

        for issue in &issues {
            warn!(machine = %self.name, %issue, "validation failed");
        }
        false
    }
}

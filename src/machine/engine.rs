//! The execution engine: one machine, its state table and its position.

use crate::config::MachineConfig;
use crate::core::{
    Context, GuardContext, Hook, State, StateId, TransitionKind, TransitionLog, TransitionRecord,
};
use crate::machine::error::MachineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Lifecycle of the engine itself, layered over the machine's own states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineStatus {
    /// Built but not yet validated.
    Uninitialized,
    /// Validated and stepping normally.
    Running,
    /// Frozen in the suspend state until `resume()`.
    Suspended,
}

/// What a single `step()` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// A guard fired and the machine moved from `from` to `to`.
    Transitioned { from: StateId, to: StateId },

    /// No transition fired; the internal action of `state` ran.
    Stayed { state: StateId },

    /// The machine is suspended; nothing ran.
    Suspended { state: StateId },
}

/// A single LLFSM instance.
///
/// Owns a fixed table of [`State`]s, the machine-local variables `C` its
/// callbacks work on, and its runtime position: current and previous state,
/// logical state time, and the suspend/resume pair.
///
/// Machines are created by [`MachineBuilder`](crate::builder::MachineBuilder)
/// and start in state 0.
pub struct Machine<C> {
    pub(crate) name: String,
    pub(crate) states: Vec<State<C>>,
    pub(crate) current: StateId,
    pub(crate) previous: Option<StateId>,
    pub(crate) suspend_state: Option<StateId>,
    pub(crate) resume_state: Option<StateId>,
    pub(crate) state_time: u64,
    pub(crate) entered_at: DateTime<Utc>,
    pub(crate) validated: bool,
    pub(crate) vars: C,
    pub(crate) history: TransitionLog,
    pub(crate) config: MachineConfig,
}

impl<C> Machine<C> {
    pub(crate) fn from_parts(
        name: String,
        states: Vec<State<C>>,
        suspend_state: Option<StateId>,
        vars: C,
        config: MachineConfig,
    ) -> Self {
        Self {
            name,
            states,
            current: StateId::INITIAL,
            previous: None,
            suspend_state,
            resume_state: None,
            state_time: 0,
            entered_at: Utc::now(),
            validated: false,
            vars,
            history: TransitionLog::with_capacity(config.history_capacity),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The state table, indexed by [`StateId`].
    pub fn states(&self) -> &[State<C>] {
        &self.states
    }

    pub fn state(&self, id: StateId) -> Option<&State<C>> {
        self.states.get(id.index())
    }

    /// Look a state up by name.
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states.iter().find(|s| s.name() == name).map(|s| s.id())
    }

    pub fn current_state(&self) -> StateId {
        self.current
    }

    pub fn current_state_name(&self) -> &str {
        self.states
            .get(self.current.index())
            .map(|s| s.name())
            .unwrap_or("<invalid>")
    }

    /// The state active before the last guarded transition.
    ///
    /// `None` until the first transition fires. Suspend and resume do not
    /// change it.
    pub fn previous_state(&self) -> Option<StateId> {
        self.previous
    }

    pub fn suspend_state(&self) -> Option<StateId> {
        self.suspend_state
    }

    /// The state `resume()` will restore; `Some` only while suspended.
    pub fn resume_state(&self) -> Option<StateId> {
        self.resume_state
    }

    /// Logical ticks since the current state was entered.
    pub fn state_time(&self) -> u64 {
        self.state_time
    }

    /// Wall-clock instant at which the current state was entered.
    pub fn entered_at(&self) -> DateTime<Utc> {
        self.entered_at
    }

    /// Wall-clock time since the current state was entered.
    pub fn time_in_state(&self) -> Duration {
        Utc::now()
            .signed_duration_since(self.entered_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    pub fn is_suspended(&self) -> bool {
        self.resume_state.is_some()
    }

    /// Whether the machine was built with a suspend state.
    pub fn is_suspensible(&self) -> bool {
        self.suspend_state.is_some()
    }

    pub fn status(&self) -> EngineStatus {
        if self.is_suspended() {
            EngineStatus::Suspended
        } else if self.validated {
            EngineStatus::Running
        } else {
            EngineStatus::Uninitialized
        }
    }

    pub fn vars(&self) -> &C {
        &self.vars
    }

    /// Mutable access to the machine variables between ticks, e.g. to feed
    /// inputs in from the host.
    pub fn vars_mut(&mut self) -> &mut C {
        &mut self.vars
    }

    pub fn history(&self) -> &TransitionLog {
        &self.history
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Advance the machine by one tick.
    ///
    /// The current state's guards are evaluated in order. If one fires and
    /// targets another state, the current state's `on_exit` runs, the
    /// machine moves, and the new state's `on_entry` runs. Otherwise the
    /// current state's `internal` runs and the state time is incremented.
    /// A suspended machine does nothing.
    ///
    /// Panics raised by guards or callbacks propagate to the caller.
    pub fn step(&mut self) -> StepOutcome {
        if self.is_suspended() {
            trace!(machine = %self.name, state = %self.current, "step skipped while suspended");
            return StepOutcome::Suspended {
                state: self.current,
            };
        }

        let target = self.states[self.current.index()].check_transitions(&self.guard_context());

        match target {
            Some(to) if to != self.current => {
                let from = self.current;
                self.invoke(Hook::Exit);
                self.previous = Some(from);
                self.enter(to, TransitionKind::Transition);
                self.invoke(Hook::Entry);

                if self.suspend_state == Some(to) {
                    self.resume_state = Some(from);
                    debug!(machine = %self.name, resume_state = %from, "suspended by transition");
                }

                debug!(
                    machine = %self.name,
                    from = %from,
                    to = %to,
                    state = self.current_state_name(),
                    "transition"
                );
                StepOutcome::Transitioned { from, to }
            }
            _ => {
                self.invoke(Hook::Internal);
                self.state_time = self.state_time.saturating_add(1);

                if self.config.log_internal_ticks {
                    trace!(
                        machine = %self.name,
                        state = %self.current,
                        state_time = self.state_time,
                        "internal"
                    );
                }
                StepOutcome::Stayed {
                    state: self.current,
                }
            }
        }
    }

    /// Freeze the machine in its suspend state.
    ///
    /// Runs `on_suspend` of the state being left, remembers it as the resume
    /// state and jumps to the suspend state without evaluating any guard or
    /// running `on_exit`/`on_entry`. Suspending an already suspended machine
    /// does nothing.
    ///
    /// A guarded transition into the suspend state suspends the machine too,
    /// with the state it came from as the resume state.
    pub fn suspend(&mut self) -> Result<(), MachineError> {
        let Some(suspend_state) = self.suspend_state else {
            warn!(machine = %self.name, "suspend rejected: no suspend state");
            return Err(MachineError::UnsupportedOperation {
                machine: self.name.clone(),
            });
        };

        if self.is_suspended() {
            trace!(machine = %self.name, "suspend ignored: already suspended");
            return Ok(());
        }

        let from = self.current;
        self.invoke(Hook::Suspend);
        self.resume_state = Some(from);
        self.enter(suspend_state, TransitionKind::Suspend);

        debug!(machine = %self.name, resume_state = %from, "suspended");
        Ok(())
    }

    /// Leave the suspend state and return to the state active before
    /// `suspend()`, then run its `on_resume`.
    ///
    /// The state time restarts at 0. `on_exit`/`on_entry` are not run.
    pub fn resume(&mut self) -> Result<(), MachineError> {
        let Some(resume_state) = self.resume_state.take() else {
            warn!(machine = %self.name, "resume rejected: not suspended");
            return Err(MachineError::InvalidState {
                machine: self.name.clone(),
            });
        };

        self.enter(resume_state, TransitionKind::Resume);
        self.invoke(Hook::Resume);

        debug!(machine = %self.name, state = %resume_state, "resumed");
        Ok(())
    }

    /// Jump back to the initial state.
    ///
    /// The state being left becomes the previous state, the state time
    /// restarts at 0 and any pending resume is discarded. No callbacks run
    /// and no guard is evaluated.
    pub fn restart(&mut self) {
        let from = self.current;
        self.previous = Some(from);
        self.resume_state = None;
        self.enter(StateId::INITIAL, TransitionKind::Restart);

        debug!(machine = %self.name, from = %from, "restarted");
    }

    fn guard_context(&self) -> GuardContext<'_, C> {
        let state = &self.states[self.current.index()];
        GuardContext {
            machine: &self.name,
            state: self.current,
            state_name: state.name(),
            state_time: self.state_time,
            previous: self.previous,
            vars: &self.vars,
        }
    }

    /// Run `hook` of the current state.
    fn invoke(&mut self, hook: Hook) {
        let state = &self.states[self.current.index()];
        let mut ctx = Context {
            machine: &self.name,
            state: self.current,
            state_name: state.name(),
            state_time: self.state_time,
            previous: self.previous,
            vars: &mut self.vars,
        };
        trace!(machine = %ctx.machine, state = %ctx.state, hook = hook.name(), "hook");
        state.behaviour().dispatch(hook, &mut ctx);
    }

    /// Make `to` current and restart the state clocks.
    fn enter(&mut self, to: StateId, kind: TransitionKind) {
        let now = Utc::now();
        self.history.record(TransitionRecord {
            kind,
            from: self.current,
            to,
            ticks_in_source: self.state_time,
            timestamp: now,
        });
        self.current = to;
        self.state_time = 0;
        self.entered_at = now;
    }
}

impl<C: fmt::Debug> fmt::Debug for Machine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("name", &self.name)
            .field("states", &self.states)
            .field("current", &self.current)
            .field("previous", &self.previous)
            .field("suspend_state", &self.suspend_state)
            .field("resume_state", &self.resume_state)
            .field("state_time", &self.state_time)
            .field("status", &self.status())
            .field("vars", &self.vars)
            .finish()
    }
}

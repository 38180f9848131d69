//! Arrangements: owners of machines that drive them tick by tick.
//!
//! An [`Arrangement`] validates every machine once when it is admitted and
//! then, on each [`tick`](Arrangement::tick), calls `step()` exactly once
//! on every machine in the order they were added. Machines share nothing;
//! each keeps its own variables. Suspend and resume are forwarded to a
//! single machine by id, as is restart.

use crate::config::ArrangementConfig;
use crate::core::StateId;
use crate::machine::{EngineStatus, Machine, MachineError, StepOutcome, ValidationIssue};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

pub mod error;

pub use error::ArrangementError;

/// Position of a machine within its arrangement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachineId(usize);

impl MachineId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// Object-safe view of a machine, letting machines with different variable
/// types share one arrangement.
pub trait Runnable: Send {
    fn name(&self) -> &str;
    fn validate(&mut self) -> bool;
    fn validation_issues(&self) -> Vec<ValidationIssue>;
    fn step(&mut self) -> StepOutcome;
    fn suspend(&mut self) -> Result<(), MachineError>;
    fn resume(&mut self) -> Result<(), MachineError>;
    fn restart(&mut self);
    fn status(&self) -> EngineStatus;
    fn current_state(&self) -> StateId;
    fn current_state_name(&self) -> &str;
    fn state_time(&self) -> u64;
    fn is_suspended(&self) -> bool;
}

impl<C: Send + 'static> Runnable for Machine<C> {
    fn name(&self) -> &str {
        Machine::name(self)
    }

    fn validate(&mut self) -> bool {
        Machine::validate(self)
    }

    fn validation_issues(&self) -> Vec<ValidationIssue> {
        Machine::validation_issues(self)
    }

    fn step(&mut self) -> StepOutcome {
        Machine::step(self)
    }

    fn suspend(&mut self) -> Result<(), MachineError> {
        Machine::suspend(self)
    }

    fn resume(&mut self) -> Result<(), MachineError> {
        Machine::resume(self)
    }

    fn restart(&mut self) {
        Machine::restart(self)
    }

    fn status(&self) -> EngineStatus {
        Machine::status(self)
    }

    fn current_state(&self) -> StateId {
        Machine::current_state(self)
    }

    fn current_state_name(&self) -> &str {
        Machine::current_state_name(self)
    }

    fn state_time(&self) -> u64 {
        Machine::state_time(self)
    }

    fn is_suspended(&self) -> bool {
        Machine::is_suspended(self)
    }
}

/// A set of independent machines driven in lockstep.
///
/// # Example
///
/// ```rust
/// use llfsm::arrangement::Arrangement;
/// use llfsm::builder::{MachineBuilder, StateBuilder};
/// use llfsm::config::ArrangementConfig;
///
/// let blinker = MachineBuilder::<()>::new("Blinker")
///     .state(StateBuilder::new("Off").always(1))
///     .state(StateBuilder::new("On").always(0))
///     .build()
///     .unwrap();
///
/// let mut arrangement = Arrangement::new(ArrangementConfig::default());
/// let id = arrangement.add(blinker).unwrap();
///
/// arrangement.run(3);
/// assert_eq!(arrangement.machine(id).unwrap().current_state_name(), "On");
/// ```
pub struct Arrangement {
    config: ArrangementConfig,
    machines: Vec<Box<dyn Runnable>>,
    ticks: u64,
}

impl Default for Arrangement {
    fn default() -> Self {
        Self::new(ArrangementConfig::default())
    }
}

impl Arrangement {
    pub fn new(config: ArrangementConfig) -> Self {
        Self {
            config,
            machines: Vec::new(),
            ticks: 0,
        }
    }

    /// Validate `machine` and take ownership of it.
    ///
    /// A machine that fails validation is dropped and reported with every
    /// issue found.
    pub fn add<M>(&mut self, mut machine: M) -> Result<MachineId, ArrangementError>
    where
        M: Runnable + 'static,
    {
        if !machine.validate() {
            let issues = machine.validation_issues();
            warn!(machine = machine.name(), issues = issues.len(), "machine rejected");
            return Err(ArrangementError::InvalidMachine {
                name: machine.name().to_string(),
                issues,
            });
        }

        let id = MachineId(self.machines.len());
        debug!(machine = machine.name(), id = %id, "machine added");
        self.machines.push(Box::new(machine));
        Ok(id)
    }

    /// Step every machine once, in insertion order.
    pub fn tick(&mut self) -> Vec<(MachineId, StepOutcome)> {
        self.ticks += 1;
        self.machines
            .iter_mut()
            .enumerate()
            .map(|(index, machine)| (MachineId(index), machine.step()))
            .collect()
    }

    /// Run up to `ticks` ticks, stopping early at the configured
    /// `max_ticks` budget. Returns the number of ticks executed.
    pub fn run(&mut self, ticks: u64) -> u64 {
        let allowed = match self.config.max_ticks {
            Some(max) => ticks.min(max.saturating_sub(self.ticks)),
            None => ticks,
        };

        for _ in 0..allowed {
            self.tick();
        }

        if allowed < ticks {
            info!(
                executed = allowed,
                requested = ticks,
                total = self.ticks,
                "tick budget exhausted"
            );
        }
        allowed
    }

    pub fn suspend(&mut self, id: MachineId) -> Result<(), ArrangementError> {
        self.machine_mut(id)?.suspend()?;
        Ok(())
    }

    pub fn resume(&mut self, id: MachineId) -> Result<(), ArrangementError> {
        self.machine_mut(id)?.resume()?;
        Ok(())
    }

    /// Send one machine back to its initial state.
    pub fn restart(&mut self, id: MachineId) -> Result<(), ArrangementError> {
        self.machine_mut(id)?.restart();
        Ok(())
    }

    pub fn machine(&self, id: MachineId) -> Option<&dyn Runnable> {
        self.machines.get(id.0).map(|m| m.as_ref())
    }

    /// Find a machine by name.
    pub fn find(&self, name: &str) -> Option<MachineId> {
        self.machines
            .iter()
            .position(|m| m.name() == name)
            .map(MachineId)
    }

    pub fn ids(&self) -> impl Iterator<Item = MachineId> {
        (0..self.machines.len()).map(MachineId)
    }

    /// Ticks executed so far.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    fn machine_mut(&mut self, id: MachineId) -> Result<&mut Box<dyn Runnable>, ArrangementError> {
        self.machines
            .get_mut(id.0)
            .ok_or(ArrangementError::UnknownMachine(id))
    }
}

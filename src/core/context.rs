//! Views of a machine handed to guards and lifecycle callbacks.
//!
//! Callbacks never receive the machine itself. They get a [`Context`]
//! carrying the machine's position and a mutable borrow of its variables,
//! which keeps `step`, `suspend` and `resume` out of reach from inside a
//! callback. Guards get the read-only [`GuardContext`].

use super::state::StateId;

/// Mutable view passed to lifecycle callbacks.
pub struct Context<'a, C> {
    pub(crate) machine: &'a str,
    pub(crate) state: StateId,
    pub(crate) state_name: &'a str,
    pub(crate) state_time: u64,
    pub(crate) previous: Option<StateId>,
    pub(crate) vars: &'a mut C,
}

impl<'a, C> Context<'a, C> {
    /// Name of the machine running the callback.
    pub fn machine(&self) -> &str {
        self.machine
    }

    /// The state whose callback is running.
    pub fn state(&self) -> StateId {
        self.state
    }

    pub fn state_name(&self) -> &str {
        self.state_name
    }

    /// Ticks spent in the state so far.
    ///
    /// Inside `internal` this is the value before the tick is counted, so
    /// the first internal run of a state sees 0.
    pub fn state_time(&self) -> u64 {
        self.state_time
    }

    pub fn previous(&self) -> Option<StateId> {
        self.previous
    }

    pub fn vars(&self) -> &C {
        &*self.vars
    }

    pub fn vars_mut(&mut self) -> &mut C {
        &mut *self.vars
    }
}

/// Read-only view passed to transition guards.
///
/// # Example
///
/// ```rust
/// use llfsm::core::Guard;
///
/// struct Counter {
///     count: u32,
/// }
///
/// // Fires once the state has been active for three ticks and the count is high enough.
/// let guard = Guard::<Counter>::new(|ctx| ctx.state_time() >= 3 && ctx.vars().count > 10);
/// ```
pub struct GuardContext<'a, C> {
    pub(crate) machine: &'a str,
    pub(crate) state: StateId,
    pub(crate) state_name: &'a str,
    pub(crate) state_time: u64,
    pub(crate) previous: Option<StateId>,
    pub(crate) vars: &'a C,
}

impl<'a, C> GuardContext<'a, C> {
    pub fn machine(&self) -> &str {
        self.machine
    }

    /// The source state of the transition being evaluated.
    pub fn state(&self) -> StateId {
        self.state
    }

    pub fn state_name(&self) -> &str {
        self.state_name
    }

    pub fn state_time(&self) -> u64 {
        self.state_time
    }

    pub fn previous(&self) -> Option<StateId> {
        self.previous
    }

    pub fn vars(&self) -> &C {
        self.vars
    }
}

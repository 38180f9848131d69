//! States of a machine's fixed state table.
//!
//! A [`State`] couples an identity (its index and name) with the
//! [`Behaviour`] that implements its five lifecycle callbacks and the ordered
//! list of transitions leaving it. States are built once by the
//! [`MachineBuilder`](crate::builder::MachineBuilder) and never change after.

use super::behaviour::Behaviour;
use super::context::GuardContext;
use super::transition::Transition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a state within its machine's state table.
///
/// Index 0 is always the initial state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(usize);

impl StateId {
    /// The initial state of every machine.
    pub const INITIAL: StateId = StateId(0);

    pub const fn new(index: usize) -> Self {
        StateId(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for StateId {
    fn from(index: usize) -> Self {
        StateId(index)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The lifecycle hooks a state exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hook {
    Entry,
    Exit,
    Internal,
    Suspend,
    Resume,
}

impl Hook {
    /// Name of the matching [`Behaviour`] method.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Entry => "on_entry",
            Self::Exit => "on_exit",
            Self::Internal => "internal",
            Self::Suspend => "on_suspend",
            Self::Resume => "on_resume",
        }
    }
}

/// One entry of a machine's state table.
pub struct State<C> {
    id: StateId,
    name: String,
    behaviour: Box<dyn Behaviour<C>>,
    transitions: Vec<Transition<C>>,
}

impl<C> State<C> {
    pub(crate) fn new(
        id: StateId,
        name: String,
        behaviour: Box<dyn Behaviour<C>>,
        transitions: Vec<Transition<C>>,
    ) -> Self {
        Self {
            id,
            name,
            behaviour,
            transitions,
        }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn behaviour(&self) -> &dyn Behaviour<C> {
        self.behaviour.as_ref()
    }

    /// Outgoing transitions in evaluation order.
    pub fn transitions(&self) -> &[Transition<C>] {
        &self.transitions
    }

    /// A sink state has no outgoing transitions and keeps running its
    /// internal action forever once entered.
    pub fn is_sink(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Evaluate the guards in order and return the target of the first one
    /// that holds.
    ///
    /// At most one transition is selected per call; later guards are not
    /// evaluated once one fires.
    pub fn check_transitions(&self, ctx: &GuardContext<'_, C>) -> Option<StateId> {
        self.transitions
            .iter()
            .find(|t| t.guard().check(ctx))
            .map(|t| t.target())
    }
}

impl<C> fmt::Debug for State<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("binding", &self.behaviour.binding())
            .field("transitions", &self.transitions)
            .finish()
    }
}

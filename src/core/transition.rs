//! Guarded transitions between states.

use super::guard::Guard;
use super::state::StateId;
use std::fmt;

/// A guard plus the state it leads to.
///
/// Transitions live in their source state's ordered list. Self-loops are
/// allowed; when one fires the machine stays put and runs the internal
/// action, exactly as if no guard had held.
pub struct Transition<C> {
    target: StateId,
    guard: Guard<C>,
}

impl<C> Transition<C> {
    pub fn new(target: StateId, guard: Guard<C>) -> Self {
        Self { target, guard }
    }

    pub fn target(&self) -> StateId {
        self.target
    }

    pub fn guard(&self) -> &Guard<C> {
        &self.guard
    }
}

impl<C> fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

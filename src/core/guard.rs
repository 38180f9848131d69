//! Guard predicates for controlling state transitions.
//!
//! Guards are boolean functions over a read-only view of the machine. They
//! are evaluated every tick their source state is current, so they must be
//! cheap and free of side effects.

use super::context::GuardContext;
use std::fmt;

type Predicate<C> = Box<dyn Fn(&GuardContext<'_, C>) -> bool + Send + Sync>;

/// Predicate that decides whether a transition fires.
///
/// # Example
///
/// ```rust
/// use llfsm::core::Guard;
///
/// #[derive(Default)]
/// struct Vars {
///     count: u32,
/// }
///
/// let after_ten = Guard::<Vars>::new(|ctx| ctx.vars().count >= 10);
/// let unconditional = Guard::<Vars>::always();
/// ```
pub struct Guard<C> {
    predicate: Predicate<C>,
}

impl<C> Guard<C> {
    /// Create a guard from a predicate.
    ///
    /// The predicate must be deterministic and side-effect free. It receives
    /// the machine's position and a shared borrow of its variables.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&GuardContext<'_, C>) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// A guard that always holds.
    pub fn always() -> Self
    where
        C: 'static,
    {
        Self::new(|_| true)
    }

    /// A guard that never holds.
    pub fn never() -> Self
    where
        C: 'static,
    {
        Self::new(|_| false)
    }

    /// Fires once the source state has been active for at least `ticks` ticks.
    pub fn after_ticks(ticks: u64) -> Self
    where
        C: 'static,
    {
        Self::new(move |ctx| ctx.state_time() >= ticks)
    }

    /// Evaluate the guard.
    pub fn check(&self, ctx: &GuardContext<'_, C>) -> bool {
        (self.predicate)(ctx)
    }
}

impl<C> fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateId;

    fn view(vars: &i32, state_time: u64) -> GuardContext<'_, i32> {
        GuardContext {
            machine: "Test",
            state: StateId::new(1),
            state_name: "Working",
            state_time,
            previous: Some(StateId::INITIAL),
            vars,
        }
    }

    #[test]
    fn guard_allows_matching_vars() {
        let guard = Guard::<i32>::new(|ctx| *ctx.vars() > 0);

        assert!(guard.check(&view(&1, 0)));
        assert!(!guard.check(&view(&0, 0)));
    }

    #[test]
    fn constant_guards() {
        assert!(Guard::<i32>::always().check(&view(&0, 0)));
        assert!(!Guard::<i32>::never().check(&view(&0, 0)));
    }

    #[test]
    fn after_ticks_counts_state_time() {
        let guard = Guard::<i32>::after_ticks(3);

        assert!(!guard.check(&view(&0, 2)));
        assert!(guard.check(&view(&0, 3)));
        assert!(guard.check(&view(&0, 4)));
    }

    #[test]
    fn guard_is_deterministic() {
        let guard = Guard::<i32>::new(|ctx| ctx.state_time() % 2 == 0);
        let ctx = view(&0, 4);

        assert_eq!(guard.check(&ctx), guard.check(&ctx));
    }

    #[test]
    fn guard_can_inspect_position() {
        let guard = Guard::<i32>::new(|ctx| {
            ctx.previous() == Some(StateId::INITIAL) && ctx.state_name() == "Working"
        });

        assert!(guard.check(&view(&0, 0)));
    }
}

//! Builder for a single state of a machine.

use crate::core::{Behaviour, Callbacks, Context, Guard, GuardContext};

/// Where a transition leads, before names are resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Target {
    Index(usize),
    Name(String),
}

pub(crate) struct PendingTransition<C> {
    pub(crate) target: Target,
    pub(crate) guard: Guard<C>,
}

/// Builder for one state: its lifecycle callbacks and ordered transitions.
///
/// Transitions are evaluated in the order they are added.
///
/// # Example
///
/// ```rust
/// use llfsm::builder::StateBuilder;
///
/// #[derive(Default)]
/// struct Vars {
///     count: u32,
/// }
///
/// let count_up = StateBuilder::<Vars>::new("CountUp")
///     .on_entry(|ctx| ctx.vars_mut().count = 0)
///     .internal(|ctx| ctx.vars_mut().count += 1)
///     .transition_to("Print", |ctx| ctx.vars().count >= 10);
/// ```
pub struct StateBuilder<C> {
    pub(crate) name: String,
    pub(crate) callbacks: Callbacks<C>,
    pub(crate) behaviour: Option<Box<dyn Behaviour<C>>>,
    pub(crate) transitions: Vec<PendingTransition<C>>,
}

impl<C: 'static> StateBuilder<C> {
    /// Start a state called `name` with no callbacks and no transitions.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            callbacks: Callbacks::for_state(name.clone()),
            name,
            behaviour: None,
            transitions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn on_entry<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Context<'_, C>) + Send + Sync + 'static,
    {
        self.callbacks = self.callbacks.on_entry(f);
        self
    }

    pub fn on_exit<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Context<'_, C>) + Send + Sync + 'static,
    {
        self.callbacks = self.callbacks.on_exit(f);
        self
    }

    pub fn internal<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Context<'_, C>) + Send + Sync + 'static,
    {
        self.callbacks = self.callbacks.internal(f);
        self
    }

    pub fn on_suspend<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Context<'_, C>) + Send + Sync + 'static,
    {
        self.callbacks = self.callbacks.on_suspend(f);
        self
    }

    pub fn on_resume<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Context<'_, C>) + Send + Sync + 'static,
    {
        self.callbacks = self.callbacks.on_resume(f);
        self
    }

    /// Use a custom [`Behaviour`] for this state.
    ///
    /// Replaces any closures set with `on_entry`, `internal` and friends.
    /// The behaviour's [`binding`](Behaviour::binding) should name this
    /// state; a machine where it does not fails validation.
    pub fn behaviour<B>(mut self, behaviour: B) -> Self
    where
        B: Behaviour<C> + 'static,
    {
        self.behaviour = Some(Box::new(behaviour));
        self
    }

    /// Add a transition to the state at `target` guarded by `guard`.
    pub fn transition<F>(self, target: usize, guard: F) -> Self
    where
        F: Fn(&GuardContext<'_, C>) -> bool + Send + Sync + 'static,
    {
        self.push(Target::Index(target), Guard::new(guard))
    }

    /// Add a transition to the state named `target`, resolved at build time.
    pub fn transition_to<F>(self, target: impl Into<String>, guard: F) -> Self
    where
        F: Fn(&GuardContext<'_, C>) -> bool + Send + Sync + 'static,
    {
        self.push(Target::Name(target.into()), Guard::new(guard))
    }

    /// Add a transition with a prebuilt [`Guard`].
    pub fn guarded(self, target: usize, guard: Guard<C>) -> Self {
        self.push(Target::Index(target), guard)
    }

    /// Add an unconditional transition to the state at `target`.
    pub fn always(self, target: usize) -> Self {
        self.push(Target::Index(target), Guard::always())
    }

    /// Add an unconditional transition to the state named `target`.
    pub fn always_to(self, target: impl Into<String>) -> Self {
        self.push(Target::Name(target.into()), Guard::always())
    }

    fn push(mut self, target: Target, guard: Guard<C>) -> Self {
        self.transitions.push(PendingTransition { target, guard });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_keep_insertion_order() {
        let state = StateBuilder::<()>::new("A")
            .always(2)
            .transition_to("B", |_| false)
            .always(0);

        let targets: Vec<_> = state.transitions.iter().map(|t| t.target.clone()).collect();
        assert_eq!(
            targets,
            vec![
                Target::Index(2),
                Target::Name("B".to_string()),
                Target::Index(0)
            ]
        );
    }

    #[test]
    fn callbacks_are_bound_to_the_state() {
        let state = StateBuilder::<()>::new("CountUp").internal(|_| {});
        assert_eq!(state.callbacks.binding(), "CountUp");
        assert_eq!(state.name(), "CountUp");
    }

    #[test]
    fn custom_behaviour_replaces_callbacks() {
        struct Print;

        impl Behaviour<()> for Print {
            fn binding(&self) -> &str {
                "Print"
            }
        }

        let state = StateBuilder::<()>::new("Print").behaviour(Print);
        assert_eq!(state.behaviour.as_ref().map(|b| b.binding()), Some("Print"));
    }
}

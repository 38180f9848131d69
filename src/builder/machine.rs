//! Builder for constructing machines.

use crate::builder::error::BuildError;
use crate::builder::state::{StateBuilder, Target};
use crate::config::MachineConfig;
use crate::core::{Behaviour, State, StateId, Transition};
use crate::machine::Machine;
use std::collections::HashMap;
use tracing::debug;

/// Builder for a [`Machine`] with a fluent API.
///
/// The first state added is the initial state. Transition targets and the
/// suspend state may be given by index or by name; both are checked when
/// [`build`](MachineBuilder::build) runs.
pub struct MachineBuilder<C> {
    name: String,
    states: Vec<StateBuilder<C>>,
    suspend: Option<Target>,
    vars: C,
    config: MachineConfig,
}

impl<C: Default + 'static> MachineBuilder<C> {
    /// Create a builder whose machine starts with `C::default()` variables.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_vars(name, C::default())
    }
}

impl<C: 'static> MachineBuilder<C> {
    /// Create a builder whose machine starts with `vars`.
    pub fn with_vars(name: impl Into<String>, vars: C) -> Self {
        Self {
            name: name.into(),
            states: Vec::new(),
            suspend: None,
            vars,
            config: MachineConfig::default(),
        }
    }

    /// Append a state to the table.
    pub fn state(mut self, state: StateBuilder<C>) -> Self {
        self.states.push(state);
        self
    }

    /// Append several states at once.
    pub fn states(mut self, states: impl IntoIterator<Item = StateBuilder<C>>) -> Self {
        self.states.extend(states);
        self
    }

    /// Designate the state at `index` as the suspend state.
    pub fn suspend_state(mut self, index: usize) -> Self {
        self.suspend = Some(Target::Index(index));
        self
    }

    /// Designate the state called `name` as the suspend state.
    pub fn suspend_state_named(mut self, name: impl Into<String>) -> Self {
        self.suspend = Some(Target::Name(name.into()));
        self
    }

    /// Replace the initial machine variables.
    pub fn vars(mut self, vars: C) -> Self {
        self.vars = vars;
        self
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the machine.
    ///
    /// Fails if the table is empty, a state name repeats, the suspend state
    /// is the initial state, or the suspend state or any transition target
    /// does not resolve to a state.
    pub fn build(self) -> Result<Machine<C>, BuildError> {
        if self.states.is_empty() {
            return Err(BuildError::EmptyStateTable { machine: self.name });
        }

        let len = self.states.len();
        let mut index_of: HashMap<String, StateId> = HashMap::with_capacity(len);
        for (index, state) in self.states.iter().enumerate() {
            if index_of
                .insert(state.name.clone(), StateId::new(index))
                .is_some()
            {
                return Err(BuildError::DuplicateStateName {
                    name: state.name.clone(),
                });
            }
        }

        let suspend_state = match self.suspend {
            None => None,
            Some(Target::Index(index)) if index < len => Some(StateId::new(index)),
            Some(Target::Index(index)) => {
                return Err(BuildError::SuspendStateOutOfRange { index, len });
            }
            Some(Target::Name(name)) => match index_of.get(&name) {
                Some(id) => Some(*id),
                None => return Err(BuildError::UnknownSuspendState { name }),
            },
        };

        if suspend_state == Some(StateId::INITIAL) {
            return Err(BuildError::SuspendStateIsInitial {
                name: self.states[0].name.clone(),
            });
        }

        let mut states = Vec::with_capacity(len);
        for (index, builder) in self.states.into_iter().enumerate() {
            let mut transitions = Vec::with_capacity(builder.transitions.len());
            for pending in builder.transitions {
                let target = match pending.target {
                    Target::Index(target) if target < len => StateId::new(target),
                    Target::Index(target) => {
                        return Err(BuildError::TransitionTargetOutOfRange {
                            state: builder.name,
                            target,
                            len,
                        });
                    }
                    Target::Name(target) => match index_of.get(&target) {
                        Some(id) => *id,
                        None => {
                            return Err(BuildError::UnknownTargetState {
                                state: builder.name,
                                target,
                            });
                        }
                    },
                };
                transitions.push(Transition::new(target, pending.guard));
            }

            let behaviour: Box<dyn Behaviour<C>> = match builder.behaviour {
                Some(behaviour) => behaviour,
                None => Box::new(builder.callbacks),
            };
            states.push(State::new(
                StateId::new(index),
                builder.name,
                behaviour,
                transitions,
            ));
        }

        debug!(
            machine = %self.name,
            states = len,
            suspensible = suspend_state.is_some(),
            "machine built"
        );
        Ok(Machine::from_parts(
            self.name,
            states,
            suspend_state,
            self.vars,
            self.config,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Callbacks;

    #[test]
    fn builder_rejects_empty_table() {
        let result = MachineBuilder::<()>::new("Empty").build();

        assert!(matches!(result, Err(BuildError::EmptyStateTable { .. })));
    }

    #[test]
    fn builder_rejects_out_of_range_suspend_index() {
        let result = MachineBuilder::<()>::new("M")
            .state(StateBuilder::new("A"))
            .suspend_state(1)
            .build();

        assert!(matches!(
            result,
            Err(BuildError::SuspendStateOutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn builder_rejects_unknown_suspend_name() {
        let result = MachineBuilder::<()>::new("M")
            .state(StateBuilder::new("A"))
            .suspend_state_named("SUSPENDED")
            .build();

        assert!(matches!(
            result,
            Err(BuildError::UnknownSuspendState { .. })
        ));
    }

    #[test]
    fn builder_rejects_initial_suspend_state() {
        let result = MachineBuilder::<()>::new("M")
            .state(StateBuilder::new("SUSPENDED"))
            .state(StateBuilder::new("A"))
            .suspend_state(0)
            .build();

        assert_eq!(
            result.err(),
            Some(BuildError::SuspendStateIsInitial {
                name: "SUSPENDED".to_string()
            })
        );
    }

    #[test]
    fn builder_rejects_out_of_range_target() {
        let result = MachineBuilder::<()>::new("M")
            .state(StateBuilder::new("A").always(0))
            .state(StateBuilder::new("B").always(5))
            .build();

        match result {
            Err(BuildError::TransitionTargetOutOfRange { state, target, len }) => {
                assert_eq!(state, "B");
                assert_eq!(target, 5);
                assert_eq!(len, 2);
            }
            other => panic!("Expected TransitionTargetOutOfRange, got {:?}", other.err()),
        }
    }

    #[test]
    fn builder_rejects_unknown_target_name() {
        let result = MachineBuilder::<()>::new("M")
            .state(StateBuilder::new("A").always_to("Nowhere"))
            .build();

        assert!(matches!(result, Err(BuildError::UnknownTargetState { .. })));
    }

    #[test]
    fn builder_rejects_duplicate_names() {
        let result = MachineBuilder::<()>::new("M")
            .state(StateBuilder::new("A"))
            .state(StateBuilder::new("A"))
            .build();

        assert!(matches!(result, Err(BuildError::DuplicateStateName { .. })));
    }

    #[test]
    fn names_resolve_to_indices() {
        let machine = MachineBuilder::<()>::new("M")
            .state(StateBuilder::new("A").always_to("C"))
            .state(StateBuilder::new("B"))
            .state(StateBuilder::new("C"))
            .suspend_state_named("B")
            .build()
            .unwrap();

        assert_eq!(machine.states()[0].transitions()[0].target(), StateId::new(2));
        assert_eq!(machine.suspend_state(), Some(StateId::new(1)));
    }

    #[test]
    fn states_are_numbered_in_order() {
        let machine = MachineBuilder::<()>::new("M")
            .states(["A", "B", "C"].map(StateBuilder::new))
            .build()
            .unwrap();

        for (index, state) in machine.states().iter().enumerate() {
            assert_eq!(state.id(), StateId::new(index));
        }
        assert_eq!(machine.current_state(), StateId::INITIAL);
    }

    #[test]
    fn config_sets_history_capacity() {
        let machine = MachineBuilder::<()>::new("M")
            .state(StateBuilder::new("A"))
            .config(MachineConfig {
                history_capacity: 3,
                ..MachineConfig::default()
            })
            .build()
            .unwrap();

        assert_eq!(machine.history().capacity(), 3);
    }

    #[test]
    fn custom_behaviour_is_installed() {
        let machine = MachineBuilder::<()>::new("M")
            .state(StateBuilder::new("A").behaviour(Callbacks::for_state("Other")))
            .build()
            .unwrap();

        assert_eq!(machine.states()[0].behaviour().binding(), "Other");
    }

    #[test]
    fn with_vars_sets_initial_vars() {
        let machine = MachineBuilder::with_vars("M", 41u32)
            .state(StateBuilder::new("A"))
            .build()
            .unwrap();

        assert_eq!(*machine.vars(), 41);
    }
}

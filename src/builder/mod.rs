//! Builder API for ergonomic machine construction.
//!
//! [`StateBuilder`] describes one state; [`MachineBuilder`] collects them
//! into a table, resolves transition targets and produces a [`Machine`].

pub mod error;
pub mod machine;
pub mod state;

pub use error::BuildError;
pub use machine::MachineBuilder;
pub use state::StateBuilder;

use crate::machine::Machine;

/// Build a machine from an ordered list of states.
///
/// `states[0]` is the initial state. `suspend_index`, when given, names the
/// suspend state and makes the machine suspensible.
///
/// # Example
///
/// ```
/// use llfsm::builder::{new_machine, StateBuilder};
///
/// let machine = new_machine(
///     "Blinker",
///     vec![
///         StateBuilder::new("Off").always(1),
///         StateBuilder::new("On").always(0),
///         StateBuilder::new("SUSPENDED"),
///     ],
///     Some(2),
///     (),
/// )
/// .unwrap();
///
/// assert!(machine.is_suspensible());
/// ```
pub fn new_machine<C: 'static>(
    name: impl Into<String>,
    states: Vec<StateBuilder<C>>,
    suspend_index: Option<usize>,
    vars: C,
) -> Result<Machine<C>, BuildError> {
    let builder = MachineBuilder::with_vars(name, vars).states(states);
    match suspend_index {
        Some(index) => builder.suspend_state(index).build(),
        None => builder.build(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_machine_without_suspend_state() {
        let machine = new_machine("M", vec![StateBuilder::new("A")], None, ()).unwrap();

        assert!(!machine.is_suspensible());
        assert_eq!(machine.name(), "M");
    }

    #[test]
    fn new_machine_rejects_empty_states() {
        let result = new_machine::<()>("M", Vec::new(), None, ());

        assert!(matches!(result, Err(BuildError::EmptyStateTable { .. })));
    }

    #[test]
    fn new_machine_rejects_bad_suspend_index() {
        let result = new_machine("M", vec![StateBuilder::new("A")], Some(3), ());

        assert!(matches!(
            result,
            Err(BuildError::SuspendStateOutOfRange { index: 3, len: 1 })
        ));
    }
}

//! llfsm: a runtime for Low-Level Finite State Machines
//!
//! An LLFSM is a single-threaded, run-to-completion state machine for
//! reactive control logic. Each machine is a fixed table of states; each
//! state has five lifecycle callbacks (entry, exit, internal, suspend,
//! resume) and an ordered list of guarded transitions. A machine can be
//! suspended mid-operation and later resumed exactly where it left off.
//!
//! # Core Concepts
//!
//! - **State**: a table entry dispatching its hooks through a `Behaviour`
//! - **Guards**: side-effect-free predicates; the first one that holds wins
//! - **Machine**: the engine; `step()`, `suspend()`, `resume()`, `restart()`,
//!   `validate()`
//! - **Arrangement**: owns machines and steps each one once per tick
//!
//! # Example
//!
//! ```rust
//! use llfsm::builder::{MachineBuilder, StateBuilder};
//! use llfsm::machine::StepOutcome;
//!
//! #[derive(Default)]
//! struct Vars {
//!     count: u32,
//! }
//!
//! let mut machine = MachineBuilder::<Vars>::new("Counter")
//!     .state(StateBuilder::new("Initial").always(1))
//!     .state(
//!         StateBuilder::<Vars>::new("CountUp")
//!             .internal(|ctx| ctx.vars_mut().count += 1)
//!             .transition_to("Done", |ctx| ctx.vars().count == 3),
//!     )
//!     .state(StateBuilder::new("Done"))
//!     .build()
//!     .unwrap();
//!
//! assert!(machine.validate());
//! while !matches!(machine.step(), StepOutcome::Transitioned { to, .. } if to.index() == 2) {}
//!
//! assert_eq!(machine.current_state_name(), "Done");
//! assert_eq!(machine.vars().count, 3);
//! ```

pub mod arrangement;
pub mod builder;
pub mod checkpoint;
pub mod config;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use arrangement::{Arrangement, MachineId, Runnable};
pub use builder::{new_machine, BuildError, MachineBuilder, StateBuilder};
pub use config::{ArrangementConfig, MachineConfig};
pub use crate::core::{Behaviour, Callbacks, Context, Guard, GuardContext, Hook, StateId};
pub use machine::{EngineStatus, Machine, MachineError, StepOutcome};

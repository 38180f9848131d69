//! Building blocks of a state table.
//!
//! This module contains the pieces a machine is made of:
//! - State identity and the per-state table entry
//! - The `Behaviour` trait dispatching the five lifecycle hooks
//! - Guard predicates and guarded transitions
//! - The contexts handed to guards and callbacks
//! - The bounded transition log

mod behaviour;
mod context;
mod guard;
mod history;
mod state;
mod transition;

pub use behaviour::{Behaviour, Callbacks};
pub use context::{Context, GuardContext};
pub use guard::Guard;
pub use history::{TransitionKind, TransitionLog, TransitionRecord};
pub use state::{Hook, State, StateId};
pub use transition::Transition;

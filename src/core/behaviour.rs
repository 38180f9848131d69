//! Lifecycle behaviour of a state.
//!
//! Every state dispatches its five lifecycle hooks through a single
//! [`Behaviour`] trait object. A behaviour also reports the state it was
//! written for ([`Behaviour::binding`]); the machine validator compares that
//! binding against the state that owns the behaviour to catch a dispatch
//! table wired to the wrong state.

use super::context::Context;
use super::state::Hook;
use std::fmt;

/// Lifecycle callbacks of one state.
///
/// All hooks default to doing nothing, so pseudo-states only implement
/// [`binding`](Behaviour::binding).
///
/// # Example
///
/// ```rust
/// use llfsm::core::{Behaviour, Context};
///
/// struct CountUp;
///
/// impl Behaviour<u32> for CountUp {
///     fn binding(&self) -> &str {
///         "CountUp"
///     }
///
///     fn internal(&self, ctx: &mut Context<'_, u32>) {
///         *ctx.vars_mut() += 1;
///     }
/// }
/// ```
pub trait Behaviour<C>: Send + Sync {
    /// Name of the state this behaviour implements.
    fn binding(&self) -> &str;

    fn on_entry(&self, _ctx: &mut Context<'_, C>) {}

    fn on_exit(&self, _ctx: &mut Context<'_, C>) {}

    /// Runs on every tick in which no transition leaves the state.
    fn internal(&self, _ctx: &mut Context<'_, C>) {}

    /// Runs on the state being left when the machine is suspended.
    fn on_suspend(&self, _ctx: &mut Context<'_, C>) {}

    /// Runs on the restored state when the machine is resumed.
    fn on_resume(&self, _ctx: &mut Context<'_, C>) {}

    /// Route `hook` to the matching callback.
    fn dispatch(&self, hook: Hook, ctx: &mut Context<'_, C>) {
        match hook {
            Hook::Entry => self.on_entry(ctx),
            Hook::Exit => self.on_exit(ctx),
            Hook::Internal => self.internal(ctx),
            Hook::Suspend => self.on_suspend(ctx),
            Hook::Resume => self.on_resume(ctx),
        }
    }
}

type Callback<C> = Box<dyn Fn(&mut Context<'_, C>) + Send + Sync>;

/// Closure-backed [`Behaviour`].
///
/// Unset hooks do nothing. [`StateBuilder`](crate::builder::StateBuilder)
/// creates one bound to the state it is building, so its callbacks cannot
/// end up registered under another state's name.
pub struct Callbacks<C> {
    binding: String,
    on_entry: Option<Callback<C>>,
    on_exit: Option<Callback<C>>,
    internal: Option<Callback<C>>,
    on_suspend: Option<Callback<C>>,
    on_resume: Option<Callback<C>>,
}

impl<C> Callbacks<C> {
    /// Empty callbacks bound to the state called `name`.
    pub fn for_state(name: impl Into<String>) -> Self {
        Self {
            binding: name.into(),
            on_entry: None,
            on_exit: None,
            internal: None,
            on_suspend: None,
            on_resume: None,
        }
    }

    pub fn on_entry<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Context<'_, C>) + Send + Sync + 'static,
    {
        self.on_entry = Some(Box::new(f));
        self
    }

    pub fn on_exit<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Context<'_, C>) + Send + Sync + 'static,
    {
        self.on_exit = Some(Box::new(f));
        self
    }

    pub fn internal<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Context<'_, C>) + Send + Sync + 'static,
    {
        self.internal = Some(Box::new(f));
        self
    }

    pub fn on_suspend<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Context<'_, C>) + Send + Sync + 'static,
    {
        self.on_suspend = Some(Box::new(f));
        self
    }

    pub fn on_resume<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Context<'_, C>) + Send + Sync + 'static,
    {
        self.on_resume = Some(Box::new(f));
        self
    }

    fn run(callback: &Option<Callback<C>>, ctx: &mut Context<'_, C>) {
        if let Some(f) = callback {
            f(ctx);
        }
    }
}

impl<C> Behaviour<C> for Callbacks<C> {
    fn binding(&self) -> &str {
        &self.binding
    }

    fn on_entry(&self, ctx: &mut Context<'_, C>) {
        Self::run(&self.on_entry, ctx);
    }

    fn on_exit(&self, ctx: &mut Context<'_, C>) {
        Self::run(&self.on_exit, ctx);
    }

    fn internal(&self, ctx: &mut Context<'_, C>) {
        Self::run(&self.internal, ctx);
    }

    fn on_suspend(&self, ctx: &mut Context<'_, C>) {
        Self::run(&self.on_suspend, ctx);
    }

    fn on_resume(&self, ctx: &mut Context<'_, C>) {
        Self::run(&self.on_resume, ctx);
    }
}

impl<C> fmt::Debug for Callbacks<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("binding", &self.binding)
            .field("on_entry", &self.on_entry.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .field("internal", &self.internal.is_some())
            .field("on_suspend", &self.on_suspend.is_some())
            .field("on_resume", &self.on_resume.is_some())
            .finish()
    }
}

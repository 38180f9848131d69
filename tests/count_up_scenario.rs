//! End-to-end scenarios on the classic five-state counting machine:
//! `Initial -> InitialPseudoState -> CountUp <-> Print`, plus `SUSPENDED`.

use llfsm::arrangement::Arrangement;
use llfsm::builder::{MachineBuilder, StateBuilder};
use llfsm::core::{Callbacks, Context, GuardContext, StateId, TransitionKind};
use llfsm::machine::{EngineStatus, Machine, MachineError, StepOutcome};

const INITIAL: StateId = StateId::new(0);
const PSEUDO: StateId = StateId::new(1);
const COUNT_UP: StateId = StateId::new(2);
const PRINT: StateId = StateId::new(3);
const SUSPENDED: StateId = StateId::new(4);

#[derive(Debug, Default)]
struct Counter {
    count: u32,
    print_requested: bool,
    printed: Vec<u32>,
    hooks: Vec<String>,
}

fn log(ctx: &mut Context<'_, Counter>, hook: &str) {
    let entry = format!("{}.{}", ctx.state_name(), hook);
    ctx.vars_mut().hooks.push(entry);
}

fn count_up_state() -> StateBuilder<Counter> {
    StateBuilder::new("CountUp")
        .on_entry(|ctx: &mut Context<'_, Counter>| log(ctx, "entry"))
        .on_exit(|ctx: &mut Context<'_, Counter>| log(ctx, "exit"))
        .internal(|ctx: &mut Context<'_, Counter>| {
            ctx.vars_mut().count += 1;
            log(ctx, "internal");
        })
        .on_suspend(|ctx: &mut Context<'_, Counter>| log(ctx, "suspend"))
        .on_resume(|ctx: &mut Context<'_, Counter>| log(ctx, "resume"))
        .transition(3, |ctx: &GuardContext<'_, Counter>| ctx.vars().print_requested)
}

fn counter_machine_with(count_up: StateBuilder<Counter>) -> Machine<Counter> {
    MachineBuilder::new("Counter")
        .state(
            StateBuilder::new("Initial")
                .on_entry(|ctx: &mut Context<'_, Counter>| log(ctx, "entry"))
                .on_exit(|ctx: &mut Context<'_, Counter>| log(ctx, "exit"))
                .always(1),
        )
        .state(StateBuilder::new("InitialPseudoState").always(2))
        .state(count_up)
        .state(
            StateBuilder::new("Print")
                .on_entry(|ctx: &mut Context<'_, Counter>| {
                    let count = ctx.vars().count;
                    ctx.vars_mut().printed.push(count);
                    ctx.vars_mut().print_requested = false;
                })
                .always(2),
        )
        .state(StateBuilder::new("SUSPENDED"))
        .suspend_state_named("SUSPENDED")
        .build()
        .unwrap()
}

fn counter_machine() -> Machine<Counter> {
    counter_machine_with(count_up_state())
}

#[test]
fn reaches_count_up_after_two_steps() {
    let mut machine = counter_machine();
    assert!(machine.validate());

    assert_eq!(
        machine.step(),
        StepOutcome::Transitioned {
            from: INITIAL,
            to: PSEUDO
        }
    );
    assert_eq!(
        machine.step(),
        StepOutcome::Transitioned {
            from: PSEUDO,
            to: COUNT_UP
        }
    );

    assert_eq!(machine.current_state(), COUNT_UP);
    assert_eq!(machine.current_state_name(), "CountUp");
    assert_eq!(machine.previous_state(), Some(PSEUDO));
    assert_eq!(machine.state_time(), 0);
    assert_eq!(
        machine.vars().hooks,
        vec!["Initial.exit", "CountUp.entry"]
    );
}

#[test]
fn count_up_runs_internal_once_per_tick() {
    let mut machine = counter_machine();
    machine.step();
    machine.step();

    for tick in 1..=5u64 {
        assert_eq!(machine.step(), StepOutcome::Stayed { state: COUNT_UP });
        assert_eq!(machine.state_time(), tick);
        assert_eq!(u64::from(machine.vars().count), tick);
    }

    let internal_runs = machine
        .vars()
        .hooks
        .iter()
        .filter(|h| h.as_str() == "CountUp.internal")
        .count();
    assert_eq!(internal_runs, 5);
}

#[test]
fn print_round_trip_resets_state_time() {
    let mut machine = counter_machine();
    for _ in 0..5 {
        machine.step();
    }
    assert_eq!(machine.vars().count, 3);

    machine.vars_mut().print_requested = true;
    assert_eq!(
        machine.step(),
        StepOutcome::Transitioned {
            from: COUNT_UP,
            to: PRINT
        }
    );
    assert_eq!(machine.vars().printed, vec![3]);

    assert_eq!(
        machine.step(),
        StepOutcome::Transitioned {
            from: PRINT,
            to: COUNT_UP
        }
    );
    assert_eq!(machine.state_time(), 0);

    machine.step();
    assert_eq!(machine.state_time(), 1);
    assert_eq!(machine.vars().count, 4);
}

#[test]
fn suspend_in_count_up_and_resume() {
    let mut machine = counter_machine();
    for _ in 0..4 {
        machine.step();
    }
    assert_eq!(machine.state_time(), 2);

    machine.suspend().unwrap();
    assert_eq!(machine.current_state(), SUSPENDED);
    assert_eq!(machine.resume_state(), Some(COUNT_UP));
    assert_eq!(machine.status(), EngineStatus::Suspended);
    assert_eq!(machine.state_time(), 0);

    assert_eq!(machine.step(), StepOutcome::Suspended { state: SUSPENDED });
    assert_eq!(machine.vars().count, 2);

    machine.resume().unwrap();
    assert_eq!(machine.current_state(), COUNT_UP);
    assert_eq!(machine.state_time(), 0);
    assert_eq!(machine.resume_state(), None);

    let tail: Vec<&str> = machine
        .vars()
        .hooks
        .iter()
        .rev()
        .take(2)
        .rev()
        .map(String::as_str)
        .collect();
    assert_eq!(tail, vec!["CountUp.suspend", "CountUp.resume"]);

    let kinds: Vec<TransitionKind> = machine.history().records().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TransitionKind::Transition,
            TransitionKind::Transition,
            TransitionKind::Suspend,
            TransitionKind::Resume,
        ]
    );
}

#[test]
fn resume_without_suspend_is_rejected() {
    let mut machine = counter_machine();
    machine.step();
    machine.step();
    machine.step();

    let result = machine.resume();

    assert!(matches!(result, Err(MachineError::InvalidState { .. })));
    assert_eq!(machine.current_state(), COUNT_UP);
    assert_eq!(machine.state_time(), 1);
}

#[test]
fn validation_detects_mismatched_callbacks() {
    let mut sound = counter_machine();
    assert!(sound.validate());

    let mut mismatched =
        counter_machine_with(StateBuilder::new("CountUp").behaviour(Callbacks::for_state("Print")));
    assert!(!mismatched.validate());
    assert_eq!(mismatched.status(), EngineStatus::Uninitialized);
}

#[test]
fn arrangement_drives_counter() {
    let mut arrangement = Arrangement::default();
    let id = arrangement.add(counter_machine()).unwrap();

    arrangement.run(6);
    arrangement.suspend(id).unwrap();
    arrangement.run(10);

    let machine = arrangement.machine(id).unwrap();
    assert!(machine.is_suspended());
    assert_eq!(machine.current_state_name(), "SUSPENDED");

    arrangement.resume(id).unwrap();
    assert_eq!(arrangement.machine(id).unwrap().current_state_name(), "CountUp");
}

#[test]
fn guarded_transition_into_suspended_suspends() {
    let mut machine = counter_machine_with(
        count_up_state().transition(4, |ctx: &GuardContext<'_, Counter>| ctx.vars().count >= 3),
    );
    assert!(machine.validate());
    for _ in 0..5 {
        machine.step();
    }
    assert_eq!(machine.vars().count, 3);

    assert_eq!(
        machine.step(),
        StepOutcome::Transitioned {
            from: COUNT_UP,
            to: SUSPENDED
        }
    );
    assert!(machine.is_suspended());
    assert_eq!(machine.status(), EngineStatus::Suspended);
    assert_eq!(machine.resume_state(), Some(COUNT_UP));
    assert_eq!(machine.previous_state(), Some(COUNT_UP));

    assert_eq!(machine.step(), StepOutcome::Suspended { state: SUSPENDED });
    machine.suspend().unwrap();
    assert_eq!(machine.resume_state(), Some(COUNT_UP));
    assert!(machine.validate());

    machine.resume().unwrap();
    assert_eq!(machine.current_state(), COUNT_UP);
    assert_eq!(machine.state_time(), 0);
    assert_eq!(machine.vars().hooks.last().map(String::as_str), Some("CountUp.resume"));
}

#[test]
fn restart_returns_to_initial_and_replays_the_pseudo_states() {
    let mut machine = counter_machine();
    for _ in 0..4 {
        machine.step();
    }
    machine.suspend().unwrap();
    let hooks_before = machine.vars().hooks.len();

    machine.restart();

    assert_eq!(machine.current_state(), INITIAL);
    assert_eq!(machine.previous_state(), Some(SUSPENDED));
    assert_eq!(machine.state_time(), 0);
    assert_eq!(machine.status(), EngineStatus::Uninitialized);
    assert!(!machine.is_suspended());
    assert_eq!(machine.vars().hooks.len(), hooks_before);
    assert_eq!(
        machine.history().last().map(|r| r.kind),
        Some(TransitionKind::Restart)
    );

    machine.step();
    machine.step();
    assert_eq!(machine.current_state(), COUNT_UP);
    assert_eq!(machine.vars().count, 2);
}

#[test]
fn arrangement_restarts_counter() {
    let mut arrangement = Arrangement::default();
    let id = arrangement.add(counter_machine()).unwrap();

    arrangement.run(5);
    arrangement.restart(id).unwrap();

    let machine = arrangement.machine(id).unwrap();
    assert_eq!(machine.current_state_name(), "Initial");
    assert_eq!(machine.status(), EngineStatus::Running);
}

//! Count Up
//!
//! The classic five-state LLFSM: after two pseudo states the machine counts
//! up one per tick, prints every fifth value, and is suspended half way
//! through, checkpointed, and resumed.
//!
//! Run with: RUST_LOG=llfsm=debug cargo run --example count_up

use llfsm::arrangement::Arrangement;
use llfsm::builder::{MachineBuilder, StateBuilder};
use llfsm::checkpoint::Checkpoint;
use llfsm::config::{ArrangementConfig, MachineConfig};
use llfsm::core::{Context, GuardContext};
use llfsm::machine::Machine;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct Counter {
    count: u32,
}

fn counter() -> Machine<Counter> {
    MachineBuilder::new("CountUp")
        .config(MachineConfig {
            log_internal_ticks: true,
            ..MachineConfig::default()
        })
        .state(
            StateBuilder::new("Initial")
                .on_entry(|_: &mut Context<'_, Counter>| println!("  [Initial] starting"))
                .always(1),
        )
        .state(StateBuilder::new("InitialPseudoState").always(2))
        .state(
            StateBuilder::new("CountUp")
                .internal(|ctx: &mut Context<'_, Counter>| ctx.vars_mut().count += 1)
                .on_suspend(|ctx: &mut Context<'_, Counter>| {
                    println!("  [CountUp] suspended at {}", ctx.vars().count)
                })
                .on_resume(|ctx: &mut Context<'_, Counter>| {
                    println!("  [CountUp] resumed at {}", ctx.vars().count)
                })
                .transition(3, |ctx: &GuardContext<'_, Counter>| {
                    ctx.vars().count > 0 && ctx.vars().count % 5 == 0 && ctx.state_time() > 0
                }),
        )
        .state(
            StateBuilder::new("Print")
                .on_entry(|ctx: &mut Context<'_, Counter>| {
                    println!("  [Print] count = {}", ctx.vars().count)
                })
                .always(2),
        )
        .state(StateBuilder::new("SUSPENDED"))
        .suspend_state_named("SUSPENDED")
        .build()
        .expect("count up machine definition is valid")
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Count Up ===\n");

    let mut machine = counter();
    if !machine.validate() {
        eprintln!("machine failed validation: {:?}", machine.validation_issues());
        return;
    }

    for _ in 0..9 {
        machine.step();
    }

    machine.suspend().expect("machine has a suspend state");
    let checkpoint = machine.checkpoint();
    let json = checkpoint.to_json().expect("checkpoint serializes");
    println!("\n  checkpoint: {json}\n");

    let mut restored = counter();
    restored
        .restore(Checkpoint::from_json(&json).expect("checkpoint parses"))
        .expect("checkpoint matches machine");
    restored.resume().expect("restored machine is suspended");

    let mut arrangement = Arrangement::new(ArrangementConfig {
        max_ticks: Some(12),
    });
    let id = arrangement.add(restored).expect("restored machine validates");
    let executed = arrangement.run(100);

    let machine = arrangement.machine(id).expect("machine was added");
    info!(
        executed,
        state = machine.current_state_name(),
        state_time = machine.state_time(),
        "arrangement finished"
    );
    println!(
        "\n  ran {executed} more ticks, now in {} for {} ticks",
        machine.current_state_name(),
        machine.state_time()
    );
}

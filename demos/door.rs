//! Door Statechart
//!
//! This example demonstrates a nested statechart driven step by step.
//!
//! Key concepts:
//! - Nested cluster states with relative and absolute targets
//! - Event payloads read by handlers
//! - Shallow history on a composite state
//! - Unhandled events as a normal outcome
//!
//! Run with: cargo run --example door

use harel::core::{HistoryMode, State, Statechart};
use harel::effects::EventOutput;
use harel::{event_enum, NodeOptions};

event_enum! {
    enum Door {
        Open,
        Close,
        Lock { code: u32 },
        Unlock { code: u32 },
    }
}

fn show(label: &str, state: &State<Option<u32>, Door>) {
    println!("  {:<22} -> {:?}", label, state.paths());
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Door Statechart ===\n");

    let chart: Statechart<Option<u32>, Door> = Statechart::new(None, |s| {
        s.state_with("closed", NodeOptions::new().history(HistoryMode::Shallow), |s| {
            s.state("unlocked", |s| {
                s.on_goto("Open", "/opened");
                s.on("Lock", |_, event| match event {
                    Door::Lock { code } => EventOutput::new().context(Some(*code)).goto("../locked"),
                    _ => EventOutput::new(),
                });
            });
            s.state("locked", |s| {
                s.on("Unlock", |stored, event| match event {
                    Door::Unlock { code } if Some(*code) == *stored => {
                        EventOutput::new().context(None).goto("../unlocked")
                    }
                    _ => EventOutput::new(),
                });
            });
        });
        s.state("opened", |s| {
            s.on_goto("Close", "/closed");
        });
    })
    .unwrap();

    println!("Definition:\n{}", chart.inspect(None));

    let mut state = chart.initial_state().unwrap();
    show("initial", &state);

    let events = [
        Door::Open,
        Door::Close,
        Door::Lock { code: 1234 },
        Door::Open,
        Door::Unlock { code: 9 },
        Door::Unlock { code: 1234 },
        Door::Open,
    ];
    for event in &events {
        state = chart.send(&state, event).unwrap();
        show(&format!("{:?}", event), &state);
    }

    println!("\nFinal configuration:\n{}", chart.inspect(Some(&state)));
    println!("Key points:");
    println!("- Open is ignored while locked: no handler, no error");
    println!("- Unlock only succeeds with the stored code");
    println!("- Closing returns to the last child of 'closed' via history");

    println!("\n=== Example Complete ===");
}

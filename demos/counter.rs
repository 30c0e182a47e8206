//! Counter With Concurrent Regions
//!
//! This example demonstrates orthogonal regions and deep history.
//!
//! Key concepts:
//! - A concurrent state whose regions change independently
//! - One event handled in two regions within a single step
//! - Deep history restoring every region level after leaving
//! - Pre and post enter hooks
//!
//! Run with: cargo run --example counter

use harel::core::{HistoryMode, Statechart};
use harel::effects::{EnterOutput, EventOutput};
use harel::NodeOptions;

#[derive(Clone, Debug, Default)]
struct Counter {
    value: i64,
    entries: u32,
}

fn increment(counter: &Counter) -> EventOutput<Counter, &'static str> {
    EventOutput::new().context(Counter {
        value: counter.value + 1,
        ..counter.clone()
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Counter With Concurrent Regions ===\n");

    let chart: Statechart<Counter, &'static str> = Statechart::new(Counter::default(), |s| {
        s.state_with("app", NodeOptions::new().history(HistoryMode::Deep), |s| {
            s.pre_enter(|_, _| {
                println!("  (entering app)");
                EnterOutput::new()
            });
            s.post_enter(|counter, _| {
                EnterOutput::new().context(Counter {
                    entries: counter.entries + 1,
                    ..counter.clone()
                })
            });
            s.state("main", |s| {
                s.concurrent();
                s.state("count", |s| {
                    s.state("even", |s| {
                        s.on("inc", |counter, _| increment(counter).goto("../odd"));
                    });
                    s.state("odd", |s| {
                        s.on("inc", |counter, _| increment(counter).goto("../even"));
                    });
                });
                s.state("theme", |s| {
                    s.state("light", |s| {
                        s.on_goto("toggle", "../dark");
                        s.on_goto("inc", "../dark");
                    });
                    s.state("dark", |s| {
                        s.on_goto("toggle", "../light");
                    });
                });
            });
            s.on_goto("settings", "/settings");
        });
        s.state("settings", |s| {
            s.on_goto("back", "/app");
        });
    })
    .unwrap();

    let mut state = chart.initial_state().unwrap();
    println!("Initial: {:?}\n", state.paths());

    for event in ["inc", "toggle", "inc", "settings", "back"] {
        state = chart.send(&state, &event).unwrap();
        println!(
            "  {:<9} -> {:?} value={} entries={}",
            event,
            state.paths(),
            state.context().value,
            state.context().entries
        );
    }

    println!("\nHistory: {:?}", state.history());
    println!("\n{}", chart.inspect(Some(&state)));

    println!("Key points:");
    println!("- 'inc' moves both the count and theme regions in one step");
    println!("- Pre and post enter hooks run around entering app");
    println!("- Returning from settings restores every region via deep history");

    println!("\n=== Example Complete ===");
}

//! Stopwatch Machine
//!
//! This example demonstrates running a statechart with the bundled machine.
//!
//! Key concepts:
//! - Activities started on entry and stopped on exit
//! - Activities posting events back into the machine
//! - Effects run against an environment
//! - The step journal
//!
//! Run with: cargo run --example stopwatch

use harel::core::Statechart;
use harel::effects::{Activity, Effect, EnterOutput, EventOutput, SendFn};
use harel::event_enum;
use harel::runner::Machine;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

event_enum! {
    enum Watch {
        Start,
        Stop,
        Reset,
        Tick,
        Saved(u64),
    }
}

/// Posts `Tick` on a fixed interval while running.
struct Clock {
    period: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Activity<Watch> for Clock {
    fn start(&self, send: SendFn<Watch>) {
        let period = self.period;
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;
            loop {
                interval.tick().await;
                send(Watch::Tick);
            }
        });
        *self.task.lock().unwrap() = Some(handle);
    }

    fn stop(&self) {
        if let Some(handle) = self.task.lock().unwrap().take() {
            handle.abort();
        }
    }

    fn name(&self) -> &str {
        "clock"
    }
}

/// Where laps are saved.
#[derive(Clone, Default)]
struct Env {
    laps: Arc<Mutex<Vec<u64>>>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Stopwatch Machine ===\n");

    let clock = Arc::new(Clock {
        period: Duration::from_millis(50),
        task: Mutex::new(None),
    });

    let chart: Statechart<u64, Watch, Env> = Statechart::new(0, move |s| {
        s.state("stopped", |s| {
            s.on_goto("Start", "../running");
            s.on("Reset", |_, _| EventOutput::new().context(0));
        });
        s.state("running", move |s| {
            let clock = Arc::clone(&clock);
            s.enter(move |_, _| EnterOutput::new().activity_handle(clock.clone()));
            s.on("Tick", |ticks, _| EventOutput::new().context(ticks + 1));
            s.on("Stop", |ticks, _| {
                let ticks = *ticks;
                EventOutput::new().goto("../stopped").effect(Effect::from_fn(
                    "save lap",
                    move |env: &Env| {
                        env.laps.lock().unwrap().push(ticks);
                        Ok(Some(Watch::Saved(ticks)))
                    },
                ))
            });
        });
        s.on("Saved", |_, event| {
            if let Watch::Saved(lap) = event {
                println!("  Lap saved at {} ticks", lap);
            }
            EventOutput::new()
        });
    })
    .unwrap();

    let env = Env::default();
    let mut machine = Machine::new(chart, env.clone())
        .unwrap()
        .with_trace(true)
        .with_observer(|state| println!("  now {:?} ({} ticks)", state.paths(), state.context()));

    machine.start().await.unwrap();
    machine.send(Watch::Start).await.unwrap();

    tokio::time::sleep(Duration::from_millis(275)).await;
    machine.run_pending().await.unwrap();

    machine.send(Watch::Stop).await.unwrap();
    println!("\nElapsed ticks: {}", machine.context());
    println!("Laps: {:?}", env.laps.lock().unwrap());

    machine.send(Watch::Reset).await.unwrap();
    machine.stop().await.unwrap();

    println!("\nJournal:");
    for step in machine.journal().steps() {
        println!("  {:<10} {:?} -> {:?}", step.event, step.from, step.to);
    }

    println!("\n=== Example Complete ===");
}

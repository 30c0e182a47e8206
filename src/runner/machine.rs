//! Reference run loop.
//!
//! The core never runs effects or activities. [`Machine`] is the imperative
//! shell that does: it holds the current [`State`], feeds events through
//! [`Statechart::send`], stops and starts the activities each step reports,
//! runs each queued effect against an environment and feeds any event an
//! effect yields back in.

use super::journal::{Journal, StepRecord};
use crate::core::{Event, State, Statechart, StatechartError};
use crate::effects::{EffectError, SendFn};
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use stillwater::effect::Effect as _;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while running a machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    #[error(transparent)]
    Statechart(#[from] StatechartError),

    #[error(transparent)]
    Effect(#[from] EffectError),
}

type Observer<C, E, Env> = Box<dyn Fn(&State<C, E, Env>) + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Stopped,
}

/// Drives a [`Statechart`] against an environment.
///
/// # Example
///
/// ```rust
/// use harel::core::Statechart;
/// use harel::effects::{Effect, EnterOutput};
/// use harel::runner::Machine;
///
/// # #[tokio::main]
/// # async fn main() {
/// let chart: Statechart<(), &'static str> = Statechart::new((), |s| {
///     s.state("loading", |s| {
///         s.enter(|_, _| EnterOutput::new().effect(Effect::send("loaded")));
///         s.on_goto("loaded", "../ready");
///     });
///     s.state("ready", |_| {});
/// })
/// .unwrap();
///
/// let mut machine = Machine::new(chart, ()).unwrap();
/// machine.start().await.unwrap();
///
/// assert_eq!(machine.paths(), vec!["/ready"]);
/// # }
/// ```
pub struct Machine<C, E, Env = ()> {
    statechart: Statechart<C, E, Env>,
    state: State<C, E, Env>,
    env: Env,
    mailbox: Arc<Mutex<VecDeque<E>>>,
    observer: Option<Observer<C, E, Env>>,
    journal: Journal,
    trace: bool,
    phase: Phase,
}

impl<C, E, Env> Machine<C, E, Env>
where
    C: Clone,
    E: Event,
    Env: Clone + Send + Sync + 'static,
{
    /// Compute the initial state. Nothing runs until [`start`](Self::start).
    pub fn new(statechart: Statechart<C, E, Env>, env: Env) -> Result<Self, MachineError> {
        let state = statechart.initial_state()?;
        Ok(Self {
            statechart,
            state,
            env,
            mailbox: Arc::new(Mutex::new(VecDeque::new())),
            observer: None,
            journal: Journal::new(),
            trace: false,
            phase: Phase::Idle,
        })
    }

    /// Call `observer` with every new state.
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&State<C, E, Env>) + Send + Sync + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Log steps at `info` rather than `debug`.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Run the initial step's activities and effects.
    ///
    /// Does nothing if already started.
    pub async fn start(&mut self) -> Result<(), MachineError> {
        if self.phase != Phase::Idle {
            return Ok(());
        }
        self.phase = Phase::Running;

        let initial = self.state.clone();
        self.commit("__start__", Vec::new(), initial);
        self.execute().await?;
        self.drain().await
    }

    /// Send an event and process everything it leads to.
    ///
    /// Starts the machine first if needed.
    pub async fn send(&mut self, event: E) -> Result<(), MachineError> {
        self.start().await?;
        self.enqueue(event);
        self.drain().await
    }

    /// Force a transition, then process everything it leads to.
    pub async fn goto<P: AsRef<str>>(&mut self, paths: &[P]) -> Result<(), MachineError> {
        self.start().await?;
        let next = self.statechart.goto(&self.state, paths)?;
        let from = self.current_paths();
        self.commit("__goto__", from, next);
        self.execute().await?;
        self.drain().await
    }

    /// Process events posted by activities or other senders since the last
    /// call.
    pub async fn run_pending(&mut self) -> Result<(), MachineError> {
        self.drain().await
    }

    /// Exit everything and stop all activities.
    ///
    /// Events arriving afterwards are discarded.
    pub async fn stop(&mut self) -> Result<(), MachineError> {
        if self.phase == Phase::Stopped {
            return Ok(());
        }
        let next = self.statechart.stop(&self.state);
        let from = self.current_paths();
        self.commit("__stop__", from, next);
        self.phase = Phase::Stopped;
        self.execute().await?;
        self.drain().await
    }

    /// Callback that posts events into this machine's mailbox.
    ///
    /// Posted events are processed on the next [`send`](Self::send) or
    /// [`run_pending`](Self::run_pending).
    pub fn sender(&self) -> SendFn<E> {
        let mailbox = Arc::clone(&self.mailbox);
        Arc::new(move |event| {
            mailbox
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_back(event);
        })
    }

    pub fn state(&self) -> &State<C, E, Env> {
        &self.state
    }

    pub fn context(&self) -> &C {
        self.state.context()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.state.paths()
    }

    /// Whether the state at `path` is active.
    pub fn matches(&self, path: &str) -> Result<bool, MachineError> {
        Ok(self.state.matches(path)?)
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    fn enqueue(&self, event: E) {
        self.mailbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(event);
    }

    fn dequeue(&self) -> Option<E> {
        self.mailbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    fn current_paths(&self) -> Vec<String> {
        self.state.paths().into_iter().map(String::from).collect()
    }

    async fn drain(&mut self) -> Result<(), MachineError> {
        while let Some(event) = self.dequeue() {
            if self.phase == Phase::Stopped {
                warn!(event = event.name(), "Discarding event received after stop");
                continue;
            }
            let next = self.statechart.send(&self.state, &event)?;
            let from = self.current_paths();
            self.commit(event.name(), from, next);
            self.execute().await?;
        }
        Ok(())
    }

    fn commit(&mut self, trigger: &str, from: Vec<String>, next: State<C, E, Env>) {
        let to: Vec<String> = next.paths().into_iter().map(String::from).collect();
        let from_json = serde_json::to_string(&from).unwrap_or_default();
        let to_json = serde_json::to_string(&to).unwrap_or_default();
        if self.trace {
            info!(trigger, from = %from_json, to = %to_json, "Machine step");
        } else {
            debug!(trigger, from = %from_json, to = %to_json, "Machine step");
        }

        self.journal = self.journal.record(StepRecord {
            event: trigger.to_string(),
            from,
            to,
            timestamp: Utc::now(),
        });
        if let Some(observer) = &self.observer {
            observer(&next);
        }
        self.state = next;
    }

    /// Stop, then start, the step's activities and run its effects.
    async fn execute(&self) -> Result<(), MachineError> {
        let activities = self.state.activities();
        for activity in activities.stop() {
            debug!(activity = activity.name(), "Stopping activity");
            activity.stop();
        }

        let send = self.sender();
        for activity in activities.start() {
            debug!(activity = activity.name(), "Starting activity");
            activity.start(Arc::clone(&send));
        }

        for effect in self.state.effects() {
            debug!(effect = effect.name(), "Running effect");
            if let Some(event) = effect.action().run(&self.env).await? {
                self.enqueue(event);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{Activity, Effect, EnterOutput, EventOutput};
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Chart = Statechart<u32, &'static str>;

    #[derive(Default)]
    struct Ticker {
        started: AtomicUsize,
        stopped: AtomicUsize,
    }

    impl Activity<&'static str> for Arc<Ticker> {
        fn start(&self, send: SendFn<&'static str>) {
            self.started.fetch_add(1, Ordering::SeqCst);
            send("tick");
        }

        fn stop(&self) {
            self.stopped.fetch_add(1, Ordering::SeqCst);
        }

        fn name(&self) -> &str {
            "ticker"
        }
    }

    fn chart(ticker: Arc<Ticker>) -> Chart {
        Statechart::new(0, move |s| {
            s.state("loading", |s| {
                s.enter(|_, _| EnterOutput::new().effect(Effect::send("loaded")));
                s.on_goto("loaded", "../running");
            });
            s.state("running", move |s| {
                let ticker = Arc::clone(&ticker);
                s.enter(move |_, _| EnterOutput::new().activity(Arc::clone(&ticker)));
                s.on("tick", |count, _| EventOutput::new().context(count + 1));
                s.on_goto("pause", "../paused");
            });
            s.state("paused", |s| {
                s.on_goto("resume", "../running");
                s.on("fail", |_, _| {
                    EventOutput::new().effect(Effect::from_fn("save", |_: &()| {
                        Err(EffectError::failed("save", "disk full"))
                    }))
                });
            });
        })
        .unwrap()
    }

    #[tokio::test]
    async fn start_runs_initial_effects() {
        let ticker = Arc::new(Ticker::default());
        let mut machine = Machine::new(chart(Arc::clone(&ticker)), ()).unwrap();

        assert_eq!(machine.paths(), vec!["/loading"]);
        machine.start().await.unwrap();

        assert_eq!(machine.paths(), vec!["/running"]);
        assert_eq!(ticker.started.load(Ordering::SeqCst), 1);
        assert!(machine.is_running());
    }

    #[tokio::test]
    async fn activity_events_are_processed() {
        let ticker = Arc::new(Ticker::default());
        let mut machine = Machine::new(chart(Arc::clone(&ticker)), ()).unwrap();
        machine.start().await.unwrap();
        assert_eq!(*machine.context(), 1);

        let send = machine.sender();
        send("tick");
        send("tick");
        machine.run_pending().await.unwrap();

        assert_eq!(*machine.context(), 3);
    }

    #[tokio::test]
    async fn leaving_a_state_stops_its_activity() {
        let ticker = Arc::new(Ticker::default());
        let mut machine = Machine::new(chart(Arc::clone(&ticker)), ()).unwrap();
        machine.start().await.unwrap();

        machine.send("pause").await.unwrap();

        assert_eq!(machine.paths(), vec!["/paused"]);
        assert_eq!(ticker.stopped.load(Ordering::SeqCst), 1);
        assert!(machine.state().activities().current().is_empty());
    }

    #[tokio::test]
    async fn effect_failures_surface() {
        let ticker = Arc::new(Ticker::default());
        let mut machine = Machine::new(chart(ticker), ()).unwrap();
        machine.start().await.unwrap();
        machine.send("pause").await.unwrap();

        let result = machine.send("fail").await;

        assert_eq!(
            result,
            Err(MachineError::Effect(EffectError::failed("save", "disk full")))
        );
    }

    #[tokio::test]
    async fn events_after_stop_are_discarded() {
        let ticker = Arc::new(Ticker::default());
        let mut machine = Machine::new(chart(Arc::clone(&ticker)), ()).unwrap();
        machine.start().await.unwrap();

        machine.stop().await.unwrap();
        machine.send("resume").await.unwrap();

        assert!(machine.paths().is_empty());
        assert!(!machine.is_running());
        assert_eq!(ticker.stopped.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn journal_and_observer_see_every_step() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let mut machine = Machine::new(chart(Arc::new(Ticker::default())), ())
            .unwrap()
            .with_observer(move |state| {
                log.lock().unwrap().push(state.paths().join(","));
            });

        machine.start().await.unwrap();
        machine.goto(&["/paused"]).await.unwrap();

        let events: Vec<_> = machine
            .journal()
            .steps()
            .iter()
            .map(|step| step.event.as_str())
            .collect();
        assert_eq!(events, vec!["__start__", "loaded", "tick", "__goto__"]);
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["/loading", "/running", "/running", "/paused"]
        );
    }
}

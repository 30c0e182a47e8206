//! Property-based tests for the transition engine.
//!
//! These tests use proptest to check that engine properties hold across
//! many randomly generated charts and event sequences.

use harel::builder::NodeOptions;
use harel::core::{HistoryMode, State, Statechart};
use harel::effects::EventOutput;
use proptest::prelude::*;

type Chart = Statechart<u32, &'static str>;

const EVENTS: [&str; 5] = ["next", "prev", "toggle", "count", "noise"];

/// Cluster with history on one side, two concurrent regions on the other.
fn sample_chart() -> Chart {
    Statechart::new(0, |s| {
        s.on("count", |n, _| EventOutput::new().context(n + 1));
        s.state_with("a", NodeOptions::new().history(HistoryMode::Shallow), |s| {
            s.state("a1", |s| {
                s.on_goto("next", "../a2");
            });
            s.state("a2", |s| {
                s.on_goto("next", "../a3");
                s.on_goto("prev", "../a1");
            });
            s.state("a3", |s| {
                s.on_goto("prev", "../a2");
            });
            s.on_goto("toggle", "/b");
        });
        s.state_with("b", NodeOptions::new().concurrent(), |s| {
            s.state("x", |s| {
                s.state("x1", |s| {
                    s.on_goto("next", "../x2");
                });
                s.state("x2", |s| {
                    s.on_goto("next", "../x1");
                });
            });
            s.state("y", |s| {
                s.state("y1", |s| {
                    s.on_goto("next", "../y2");
                });
                s.state("y2", |s| {
                    s.on_goto("prev", "../y1");
                });
            });
            s.on_goto("toggle", "/a");
        });
    })
    .unwrap()
}

fn run(chart: &Chart, events: &[&'static str]) -> Vec<State<u32, &'static str>> {
    let mut state = chart.initial_state().unwrap();
    let mut states = vec![state.clone()];
    for event in events {
        state = chart.send(&state, event).unwrap();
        states.push(state.clone());
    }
    states
}

fn event_sequence() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(EVENTS.to_vec()), 0..30)
}

/// `regions` concurrent regions under `/p`, each with `children` leaves.
fn regions_chart(regions: usize, children: usize) -> Chart {
    Statechart::new(0, move |s| {
        s.state_with("p", NodeOptions::new().concurrent(), |s| {
            for r in 0..regions {
                s.state(format!("r{r}"), |s| {
                    for c in 0..children {
                        s.state(format!("c{c}"), |_| {});
                    }
                });
            }
        });
    })
    .unwrap()
}

/// `/h` with the given history, `width` children each holding `width`
/// leaves, and an `/out` state to leave to.
fn history_chart(mode: HistoryMode, width: usize) -> Chart {
    Statechart::new(0, move |s| {
        s.state("out", |s| {
            s.on_goto("back", "/h");
        });
        s.state_with("h", NodeOptions::new().history(mode), |s| {
            for i in 0..width {
                s.state(format!("c{i}"), |s| {
                    for j in 0..width {
                        s.state(format!("g{j}"), |_| {});
                    }
                });
            }
            s.on_goto("leave", "/out");
        });
    })
    .unwrap()
}

proptest! {
    #[test]
    fn send_is_deterministic(events in event_sequence()) {
        let chart = sample_chart();

        let first = run(&chart, &events);
        let second = run(&chart, &events);

        for (a, b) in first.iter().zip(&second) {
            prop_assert_eq!(a.paths(), b.paths());
            prop_assert_eq!(a.context(), b.context());
            prop_assert_eq!(a.history(), b.history());
        }
    }

    #[test]
    fn unhandled_events_change_nothing(events in event_sequence()) {
        let chart = sample_chart();
        let states = run(&chart, &events);
        let before = states.last().unwrap();

        let after = chart.send(before, &"unknown").unwrap();

        prop_assert_eq!(after.paths(), before.paths());
        prop_assert_eq!(after.context(), before.context());
        prop_assert_eq!(after.history(), before.history());
        prop_assert!(after.effects().is_empty());
        prop_assert!(after.activities().start().is_empty());
        prop_assert!(after.activities().stop().is_empty());
    }

    #[test]
    fn concurrent_leaves_stay_one_per_region(events in event_sequence()) {
        let chart = sample_chart();

        for state in run(&chart, &events) {
            if state.matches("/b").unwrap() {
                prop_assert_eq!(state.paths().len(), 2);
                prop_assert!(state.paths()[0].starts_with("/b/x/"));
                prop_assert!(state.paths()[1].starts_with("/b/y/"));
            } else {
                prop_assert_eq!(state.paths().len(), 1);
            }
        }
    }

    #[test]
    fn concurrent_entry_yields_one_leaf_per_region(
        regions in 1usize..8,
        children in 1usize..4,
    ) {
        let chart = regions_chart(regions, children);

        let state = chart.initial_state().unwrap();

        let expected: Vec<String> = (0..regions).map(|r| format!("/p/r{r}/c0")).collect();
        prop_assert_eq!(state.paths(), expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn one_transition_can_retarget_many_regions(
        (regions, children, picks) in (1usize..8, 1usize..4).prop_flat_map(|(regions, children)| {
            let pick = prop::option::of(0..children);
            (Just(regions), Just(children), prop::collection::vec(pick, regions))
        })
    ) {
        let chart = regions_chart(regions, children);
        let state = chart.initial_state().unwrap();
        let targets: Vec<String> = picks
            .iter()
            .enumerate()
            .filter_map(|(r, pick)| pick.map(|c| format!("/p/r{r}/c{c}")))
            .collect();

        let next = chart.goto(&state, &targets).unwrap();

        prop_assert_eq!(next.paths().len(), regions);
        for (r, pick) in picks.iter().enumerate() {
            let leaf = format!("/p/r{r}/c{}", pick.unwrap_or(0));
            prop_assert!(next.matches(&leaf).unwrap(), "{} not active", leaf);
        }
    }

    #[test]
    fn shallow_history_restores_one_level(
        (width, child, grandchild) in (1usize..5).prop_flat_map(|w| (Just(w), 0..w, 0..w))
    ) {
        let chart = history_chart(HistoryMode::Shallow, width);
        let state = chart.initial_state().unwrap();
        let target = format!("/h/c{child}/g{grandchild}");
        let state = chart.goto(&state, &[target]).unwrap();

        let state = chart.send(&state, &"leave").unwrap();
        prop_assert_eq!(state.paths(), vec!["/out"]);
        let state = chart.send(&state, &"back").unwrap();

        let expected = format!("/h/c{child}/g0");
        prop_assert_eq!(state.paths(), vec![expected.as_str()]);
    }

    #[test]
    fn deep_history_restores_every_level(
        (width, child, grandchild) in (1usize..5).prop_flat_map(|w| (Just(w), 0..w, 0..w))
    ) {
        let chart = history_chart(HistoryMode::Deep, width);
        let state = chart.initial_state().unwrap();
        let target = format!("/h/c{child}/g{grandchild}");
        let state = chart.goto(&state, &[target.clone()]).unwrap();

        let state = chart.send(&state, &"leave").unwrap();
        let state = chart.send(&state, &"back").unwrap();

        prop_assert_eq!(state.paths(), vec![target.as_str()]);
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The number of simultaneously running actions never exceeds the budget.

#![allow(missing_docs)]
#![allow(clippy::expect_used)]
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use echo_tessel::{ExecutorConfig, Region, SpatialExecutor, Strategy};

const BUDGETS: &[usize] = &[1, 2, 3, 4, 8];

/// Guarded live-count that records its high-water mark.
#[derive(Default)]
struct LiveCounter {
    live: Mutex<usize>,
    peak: AtomicUsize,
}

impl LiveCounter {
    fn enter(&self, budget: usize) {
        let mut live = self.live.lock().expect("live count");
        *live += 1;
        assert!(*live <= budget, "{} actions in flight, budget {budget}", *live);
        self.peak.fetch_max(*live, Ordering::SeqCst);
    }

    fn leave(&self) {
        *self.live.lock().expect("live count") -= 1;
    }
}

fn instrumented_run(strategy: Strategy, width: usize, height: usize, budget: usize) -> usize {
    let counter = LiveCounter::default();
    let report = SpatialExecutor::default()
        .execute(width, height, strategy, budget, &|_r: Region| {
            counter.enter(budget);
            std::thread::sleep(Duration::from_micros(200));
            counter.leave();
        })
        .expect("valid inputs");

    let peak = counter.peak.load(Ordering::SeqCst);
    assert!(report.peak_in_flight <= budget);
    assert!(report.workers <= budget);
    assert_eq!(*counter.live.lock().expect("live count"), 0);
    peak
}

#[test]
fn window_scan_respects_budget() {
    for &budget in BUDGETS {
        instrumented_run(Strategy::Window { window: 10 }, 100, 100, budget);
    }
}

#[test]
fn grid_respects_budget() {
    for &budget in BUDGETS {
        instrumented_run(Strategy::Grid { size: 7 }, 60, 45, budget);
    }
}

#[test]
fn per_cell_scan_respects_budget() {
    for &budget in BUDGETS {
        instrumented_run(Strategy::PerCell, 20, 20, budget);
    }
}

#[test]
fn bands_respect_budget() {
    for &budget in BUDGETS {
        instrumented_run(Strategy::Horizontal, 64, 8, budget);
        instrumented_run(Strategy::Vertical, 8, 64, budget);
    }
}

#[test]
fn budget_of_one_serializes_actions() {
    assert_eq!(instrumented_run(Strategy::PerCell, 6, 6, 1), 1);
}

#[test]
fn thread_cap_does_not_change_coverage() {
    let exec = SpatialExecutor::new(ExecutorConfig {
        max_threads: Some(2),
    });
    let visited = AtomicUsize::new(0);
    let report = exec
        .execute(50, 50, Strategy::Grid { size: 5 }, 8, &|r: Region| {
            visited.fetch_add(r.area(), Ordering::SeqCst);
        })
        .expect("valid inputs");
    assert_eq!(report.workers, 2);
    assert!(report.peak_in_flight <= 2);
    assert_eq!(visited.into_inner(), 2500);
}

#[test]
fn panicking_action_does_not_wedge_the_gate() {
    let ran = AtomicUsize::new(0);
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        SpatialExecutor::default().execute(10, 10, Strategy::Grid { size: 2 }, 2, &|r: Region| {
            ran.fetch_add(1, Ordering::SeqCst);
            assert!(r.min_x != 4, "injected failure");
        })
    }));
    assert!(result.is_err());
    assert_eq!(ran.into_inner(), 25);
}

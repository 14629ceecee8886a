// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bounded fan-out/join over a [`PartitionPlan`].
//!
//! # Execution model
//!
//! 1. The plan is computed synchronously before any thread starts.
//! 2. `min(parallel, regions, max_threads)` scoped workers claim regions
//!    through an atomic cursor, so each region is submitted exactly once.
//! 3. Each unit takes a slot from the [`AdmissionGate`], runs the action,
//!    and returns the slot. The gate is what bounds in-flight actions; the
//!    worker count only avoids spawning threads that would sit blocked.
//! 4. The caller blocks until every worker has drained the cursor.
//!
//! Execution order between regions is unspecified.
//!
//! # Panics in actions
//!
//! A panic inside one action does not stop the others. The unit is caught,
//! its slot is released, the remaining regions still run, and after the join
//! the first captured payload is resumed on the calling thread.

use std::any::Any;
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, instrument, trace, warn};

use crate::error::PartitionError;
use crate::gate::AdmissionGate;
use crate::plan::{PartitionPlan, Strategy};
use crate::region::Region;

/// Per-region work supplied by the caller.
///
/// Any `Fn(Region) + Sync` closure qualifies. The action runs concurrently
/// with other invocations and must synchronize anything it shares beyond
/// its own region.
pub trait Action: Fn(Region) + Sync {}

impl<F> Action for F where F: Fn(Region) + Sync + ?Sized {}

/// Executor tuning that does not change plan semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ExecutorConfig {
    /// Upper bound on OS worker threads per call. `None` lets the
    /// concurrency budget decide.
    pub max_threads: Option<usize>,
}

/// Summary of one completed fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanOutReport {
    /// Regions submitted (equals the plan length).
    pub regions: usize,
    /// Worker threads spawned.
    pub workers: usize,
    /// Highest number of actions observed running at once.
    pub peak_in_flight: usize,
}

/// Runs partition plans with bounded parallelism.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpatialExecutor {
    config: ExecutorConfig,
}

impl SpatialExecutor {
    /// Creates an executor with the given tuning.
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    /// The executor's tuning.
    pub fn config(&self) -> ExecutorConfig {
        self.config
    }

    /// Builds a plan and runs it.
    pub fn execute<A>(
        &self,
        width: usize,
        height: usize,
        strategy: Strategy,
        parallel: usize,
        action: &A,
    ) -> Result<FanOutReport, PartitionError>
    where
        A: Action + ?Sized,
    {
        let plan = PartitionPlan::new(width, height, strategy, parallel)?;
        Ok(self.run(&plan, action))
    }

    /// Invokes `action` once per region of `plan` and blocks until all
    /// invocations have returned.
    ///
    /// At most `plan.parallel()` invocations are in flight at any instant.
    ///
    /// # Panics
    ///
    /// Resumes the first panic raised by `action`, after every other region
    /// has been processed.
    #[instrument(
        level = "debug",
        skip_all,
        fields(
            strategy = plan.strategy().name(),
            width = plan.width(),
            height = plan.height(),
            regions = plan.len(),
            parallel = plan.parallel()
        )
    )]
    pub fn run<A>(&self, plan: &PartitionPlan, action: &A) -> FanOutReport
    where
        A: Action + ?Sized,
    {
        let regions = plan.regions();
        if regions.is_empty() {
            debug!("empty plan, nothing to submit");
            return FanOutReport {
                regions: 0,
                workers: 0,
                peak_in_flight: 0,
            };
        }

        let workers = self.worker_count(plan.parallel(), regions.len());
        fan_out(plan, workers, action)
    }

    fn worker_count(&self, parallel: usize, regions: usize) -> usize {
        let cap = self.config.max_threads.unwrap_or(usize::MAX);
        parallel.min(regions).min(cap).max(1)
    }
}

/// Spawns `workers` scoped threads over `plan` and joins them. The gate
/// bounds in-flight actions to `plan.parallel()` whatever `workers` is.
fn fan_out<A>(plan: &PartitionPlan, workers: usize, action: &A) -> FanOutReport
where
    A: Action + ?Sized,
{
    let regions = plan.regions();
    let gate = AdmissionGate::new(plan.parallel());
    let cursor = AtomicUsize::new(0);
    let first_panic: Mutex<Option<Box<dyn Any + Send>>> = Mutex::new(None);

    debug!(workers, "fan-out start");

    std::thread::scope(|s| {
        for _ in 0..workers {
            s.spawn(|| {
                // Work-stealing loop: claim regions until none remain
                loop {
                    let idx = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(&region) = regions.get(idx) else {
                        break;
                    };

                    let permit = gate.acquire();
                    trace!(%region, "unit admitted");
                    let outcome = catch_unwind(AssertUnwindSafe(|| action(region)));
                    drop(permit);

                    if let Err(payload) = outcome {
                        warn!(%region, "action panicked; draining remaining regions");
                        let mut slot =
                            first_panic.lock().unwrap_or_else(PoisonError::into_inner);
                        if slot.is_none() {
                            *slot = Some(payload);
                        }
                    }
                }
            });
        }
    });

    let report = FanOutReport {
        regions: regions.len(),
        workers,
        peak_in_flight: gate.peak_in_flight(),
    };
    debug!(peak_in_flight = report.peak_in_flight, "fan-out joined");

    if let Some(payload) = first_panic
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
    {
        resume_unwind(payload);
    }

    report
}

fn run_strategy<A>(
    width: usize,
    height: usize,
    strategy: Strategy,
    parallel: usize,
    action: &A,
) -> Result<(), PartitionError>
where
    A: Action + ?Sized,
{
    SpatialExecutor::default()
        .execute(width, height, strategy, parallel, action)
        .map(|_| ())
}

/// Splits the width into `parallel` column bands and runs `action` on each.
///
/// The last band absorbs `width % parallel`. Bands cover `[0, width)`
/// exactly and each spans the full height.
pub fn split_horizontal<F>(
    width: usize,
    height: usize,
    parallel: usize,
    action: F,
) -> Result<(), PartitionError>
where
    F: Fn(Region) + Sync,
{
    run_strategy(width, height, Strategy::Horizontal, parallel, &action)
}

/// Splits the height into `parallel` row bands and runs `action` on each.
pub fn split_vertical<F>(
    width: usize,
    height: usize,
    parallel: usize,
    action: F,
) -> Result<(), PartitionError>
where
    F: Fn(Region) + Sync,
{
    run_strategy(width, height, Strategy::Vertical, parallel, &action)
}

/// Runs `action` on every non-overlapping `window × window` tile.
///
/// Tiles start at the origin and are kept only while they fit entirely
/// inside the domain, so a trailing strip of `width % window` columns (and
/// `height % window` rows) is never visited.
pub fn scan_windows<F>(
    width: usize,
    height: usize,
    window: usize,
    parallel: usize,
    action: F,
) -> Result<(), PartitionError>
where
    F: Fn(Region) + Sync,
{
    run_strategy(width, height, Strategy::Window { window }, parallel, &action)
}

/// Runs `action` on each cell of a `size × size` grid covering the domain.
pub fn partition_grid<F>(
    width: usize,
    height: usize,
    size: usize,
    parallel: usize,
    action: F,
) -> Result<(), PartitionError>
where
    F: Fn(Region) + Sync,
{
    run_strategy(width, height, Strategy::Grid { size }, parallel, &action)
}

/// Runs `action` on every cell `(x, y, x + 1, y + 1)` of the domain.
pub fn scan_cells<F>(
    width: usize,
    height: usize,
    parallel: usize,
    action: F,
) -> Result<(), PartitionError>
where
    F: Fn(Region) + Sync,
{
    run_strategy(width, height, Strategy::PerCell, parallel, &action)
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! echo-tessel: spatial partitioning with bounded fan-out/join.
//!
//! A rectangular `width × height` domain is cut into [`Region`]s by one of
//! five [`Strategy`] variants. Each region is handed to a caller-supplied
//! action on a worker thread, with at most `parallel` actions running at any
//! instant, and the call returns only once every action has finished.
//!
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let visited = AtomicUsize::new(0);
//! echo_tessel::partition_grid(130, 130, 50, 4, |r| {
//!     visited.fetch_add(r.area(), Ordering::Relaxed);
//! })?;
//! assert_eq!(visited.into_inner(), 130 * 130);
//! # Ok::<(), echo_tessel::PartitionError>(())
//! ```
//!
//! The library does not own output storage, aggregate results, or offer
//! cancellation. Actions write into structures the caller owns and are
//! responsible for their own synchronization beyond region disjointness.
#![forbid(unsafe_code)]

mod error;
mod exec;
mod gate;
mod plan;
mod region;

pub use error::PartitionError;
pub use exec::{
    partition_grid, scan_cells, scan_windows, split_horizontal, split_vertical, Action,
    ExecutorConfig, FanOutReport, SpatialExecutor,
};
pub use gate::{AdmissionGate, Permit};
pub use plan::{axis_bands, grid_boundaries, PartitionPlan, Strategy};
pub use region::{Cells, Region};

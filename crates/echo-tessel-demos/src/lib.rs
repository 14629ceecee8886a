// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Demonstration consumers of `echo-tessel`.
//!
//! Each demo comes as a pair: a parallel version driven by one partitioning
//! strategy, and a plain sequential twin used as the reference result.
//!
//! | Demo | Strategy | Output |
//! |---|---|---|
//! | [`gray::to_gray_parallel`] | horizontal bands | `GrayImage` |
//! | [`occupancy::count_windows_parallel`] | sliding windows | tile count |
//! | [`spectrum::sum_spectrum_parallel`] | grid | per-cell block sums |
//! | [`around::sum_around_parallel`] | per cell | neighborhood sums |
//!
//! The demos own their output buffers. Parallel writers go through the
//! atomic stores in [`grid`], which never alias because the regions don't.
#![forbid(unsafe_code)]

pub mod around;
pub mod gray;
pub mod grid;
pub mod occupancy;
pub mod spectrum;

mod error;

pub use error::DemoError;
pub use grid::{random_bool_grid, random_f64_grid, Grid, SharedF64Grid};

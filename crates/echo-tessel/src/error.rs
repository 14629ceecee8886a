// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use thiserror::Error;

/// Precondition failures rejected before any region is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PartitionError {
    /// The concurrency budget was zero; no action could ever be admitted.
    #[error("parallel must be at least 1")]
    ZeroParallelism,

    /// A sliding window of size zero would never advance.
    #[error("window size must be at least 1")]
    ZeroWindow,

    /// A grid cell of size zero would produce infinitely many cells.
    #[error("grid cell size must be at least 1")]
    ZeroCellSize,
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use echo_tessel::PartitionError;
use thiserror::Error;

/// Errors raised while preparing or running a demo.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DemoError {
    /// The partitioner rejected its inputs.
    #[error(transparent)]
    Partition(#[from] PartitionError),

    /// Rows passed to [`Grid::from_rows`](crate::Grid::from_rows) differ in length.
    #[error("ragged rows: row {row} has {len} cells, expected {expected}")]
    RaggedRows {
        /// Index of the offending row.
        row: usize,
        /// Its length.
        len: usize,
        /// Length of row 0.
        expected: usize,
    },

    /// The produced pixel buffer did not match the image dimensions.
    #[error("image buffer does not match {width}x{height}")]
    ImageBuffer {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Block sum spectrum: every cell of a `size × size` block receives the sum
//! of that block. Blocks in the last row and column are truncated to fit.

use echo_tessel::{partition_grid, PartitionError, Region};
use tracing::instrument;

use crate::{DemoError, Grid, SharedF64Grid};

fn block_sum(grid: &Grid<f64>, block: Region) -> f64 {
    block.cells().map(|(x, y)| *grid.get(x, y)).sum()
}

/// Block sums computed with a bounded-parallel grid partition.
#[instrument(level = "debug", skip(grid), fields(width = grid.width(), height = grid.height()))]
pub fn sum_spectrum_parallel(
    grid: &Grid<f64>,
    size: usize,
    parallel: usize,
) -> Result<Grid<f64>, DemoError> {
    let out = SharedF64Grid::zeros(grid.width(), grid.height());
    partition_grid(grid.width(), grid.height(), size, parallel, |block| {
        let total = block_sum(grid, block);
        for (x, y) in block.cells() {
            out.set(x, y, total);
        }
    })?;
    Ok(out.into_grid())
}

/// Sequential reference for [`sum_spectrum_parallel`].
pub fn sum_spectrum(grid: &Grid<f64>, size: usize) -> Result<Grid<f64>, DemoError> {
    if size == 0 {
        return Err(PartitionError::ZeroCellSize.into());
    }
    let (width, height) = (grid.width(), grid.height());
    let out = SharedF64Grid::zeros(width, height);
    for min_y in (0..height).step_by(size) {
        for min_x in (0..width).step_by(size) {
            let block = Region::new(
                min_x,
                min_y,
                (min_x + size).min(width),
                (min_y + size).min(height),
            );
            let total = block_sum(grid, block);
            for (x, y) in block.cells() {
                out.set(x, y, total);
            }
        }
    }
    Ok(out.into_grid())
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Neighborhood sums: cell `(x, y)` receives the sum of the box
//! `[x - r, x + r) × [y - r, y + r)` clipped to the grid.

use echo_tessel::{scan_cells, Region};
use tracing::instrument;

use crate::{DemoError, Grid, SharedF64Grid};

fn neighborhood(grid: &Grid<f64>, x: usize, y: usize, radius: usize) -> Region {
    Region::new(
        x.saturating_sub(radius),
        y.saturating_sub(radius),
        (x + radius).min(grid.width()),
        (y + radius).min(grid.height()),
    )
}

fn neighborhood_sum(grid: &Grid<f64>, x: usize, y: usize, radius: usize) -> f64 {
    neighborhood(grid, x, y, radius)
        .cells()
        .map(|(nx, ny)| *grid.get(nx, ny))
        .sum()
}

/// Neighborhood sums computed with a bounded-parallel per-cell scan.
///
/// Each action reads a window of the shared input and writes only its own
/// output cell.
#[instrument(level = "debug", skip(grid), fields(width = grid.width(), height = grid.height()))]
pub fn sum_around_parallel(
    grid: &Grid<f64>,
    radius: usize,
    parallel: usize,
) -> Result<Grid<f64>, DemoError> {
    let out = SharedF64Grid::zeros(grid.width(), grid.height());
    scan_cells(grid.width(), grid.height(), parallel, |cell| {
        let (x, y) = (cell.min_x, cell.min_y);
        out.set(x, y, neighborhood_sum(grid, x, y, radius));
    })?;
    Ok(out.into_grid())
}

/// Sequential reference for [`sum_around_parallel`].
pub fn sum_around(grid: &Grid<f64>, radius: usize) -> Grid<f64> {
    Grid::from_fn(grid.width(), grid.height(), |x, y| {
        neighborhood_sum(grid, x, y, radius)
    })
}

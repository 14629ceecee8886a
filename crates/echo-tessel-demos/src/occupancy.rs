// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Window occupancy: how many `window × window` tiles hold at least one `true`.
//!
//! Only tiles that fit entirely inside the grid are counted; the trailing
//! `width % window` columns and `height % window` rows are ignored. Each tile
//! stops scanning at its first occupied cell.

use std::sync::atomic::{AtomicUsize, Ordering};

use echo_tessel::{scan_windows, Region};
use tracing::instrument;

use crate::{DemoError, Grid};

fn tile_occupied(grid: &Grid<bool>, tile: Region) -> bool {
    tile.cells().any(|(x, y)| *grid.get(x, y))
}

/// Counts occupied tiles with a bounded-parallel window scan.
#[instrument(level = "debug", skip(grid), fields(width = grid.width(), height = grid.height()))]
pub fn count_windows_parallel(
    grid: &Grid<bool>,
    window: usize,
    parallel: usize,
) -> Result<usize, DemoError> {
    let count = AtomicUsize::new(0);
    scan_windows(grid.width(), grid.height(), window, parallel, |tile| {
        if tile_occupied(grid, tile) {
            count.fetch_add(1, Ordering::Relaxed);
        }
    })?;
    Ok(count.into_inner())
}

/// Sequential reference for [`count_windows_parallel`].
pub fn count_windows(grid: &Grid<bool>, window: usize) -> Result<usize, DemoError> {
    if window == 0 {
        return Err(echo_tessel::PartitionError::ZeroWindow.into());
    }
    let mut count = 0;
    let mut min_y = 0;
    while grid.height() - min_y >= window {
        let mut min_x = 0;
        while grid.width() - min_x >= window {
            let tile = Region::new(min_x, min_y, min_x + window, min_y + window);
            if tile_occupied(grid, tile) {
                count += 1;
            }
            min_x += window;
        }
        min_y += window;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::random_bool_grid;

    #[test]
    fn counts_only_full_tiles() {
        // A hit in the trailing strip must not count.
        let grid = Grid::from_fn(25, 20, |x, y| (x, y) == (3, 3) || (x, y) == (22, 5));
        assert_eq!(count_windows(&grid, 10).expect("window"), 1);
        assert_eq!(count_windows_parallel(&grid, 10, 3).expect("window"), 1);
    }

    #[test]
    fn empty_and_full_grids() {
        let empty = Grid::from_fn(40, 40, |_, _| false);
        let full = Grid::from_fn(40, 40, |_, _| true);
        assert_eq!(count_windows_parallel(&empty, 10, 4).expect("window"), 0);
        assert_eq!(count_windows_parallel(&full, 10, 4).expect("window"), 16);
    }

    #[test]
    fn parallel_matches_sequential_on_random_fill() {
        for seed in 0..8 {
            let grid = random_bool_grid(100, 100, 0.01, seed);
            assert_eq!(
                count_windows_parallel(&grid, 10, 10).expect("window"),
                count_windows(&grid, 10).expect("window"),
                "seed {seed}"
            );
        }
    }

    #[test]
    fn huge_window_counts_nothing() {
        let grid = Grid::from_fn(4, 4, |_, _| true);
        assert_eq!(count_windows(&grid, usize::MAX).expect("window"), 0);
        assert_eq!(count_windows_parallel(&grid, usize::MAX, 2).expect("window"), 0);
    }

    #[test]
    fn zero_window_is_rejected() {
        let grid = Grid::from_fn(4, 4, |_, _| true);
        assert!(count_windows(&grid, 0).is_err());
        assert!(count_windows_parallel(&grid, 0, 2).is_err());
    }
}

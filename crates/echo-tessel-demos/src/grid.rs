// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Row-major 2D stores: a read-only input grid and atomic output buffers.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::DemoError;

/// Immutable row-major 2D array indexed by `(x, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Builds a grid from equally long rows. Row `y` holds cells `(0..width, y)`.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, DemoError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(width * height);
        for (row, cols) in rows.into_iter().enumerate() {
            if cols.len() != width {
                return Err(DemoError::RaggedRows {
                    row,
                    len: cols.len(),
                    expected: width,
                });
            }
            cells.extend(cols);
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Builds a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The cell at `(x, y)`.
    ///
    /// # Panics
    /// Panics if `(x, y)` is outside the grid.
    pub fn get(&self, x: usize, y: usize) -> &T {
        assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        &self.cells[y * self.width + x]
    }

    /// Row `y` as a slice.
    pub fn row(&self, y: usize) -> &[T] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    /// Iterates the rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.height).map(move |y| self.row(y))
    }

    /// All cells in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }
}

/// `f64` output grid that many threads may write concurrently.
///
/// Values are stored as raw bits in `AtomicU64`; writers touching disjoint
/// cells never contend.
#[derive(Debug)]
pub struct SharedF64Grid {
    width: usize,
    height: usize,
    bits: Vec<AtomicU64>,
}

impl SharedF64Grid {
    /// A zero-filled grid.
    pub fn zeros(width: usize, height: usize) -> Self {
        let zero = 0.0f64.to_bits();
        Self {
            width,
            height,
            bits: (0..width * height).map(|_| AtomicU64::new(zero)).collect(),
        }
    }

    /// Stores `value` at `(x, y)`.
    pub fn set(&self, x: usize, y: usize, value: f64) {
        self.bits[y * self.width + x].store(value.to_bits(), Ordering::Relaxed);
    }

    /// Reads the value at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        f64::from_bits(self.bits[y * self.width + x].load(Ordering::Relaxed))
    }

    /// Freezes the buffer into a plain grid.
    pub fn into_grid(self) -> Grid<f64> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self
                .bits
                .into_iter()
                .map(|b| f64::from_bits(b.into_inner()))
                .collect(),
        }
    }
}

/// Byte buffer with concurrent, per-element writes.
#[derive(Debug)]
pub struct SharedU8Buffer {
    bytes: Vec<AtomicU8>,
}

impl SharedU8Buffer {
    /// A zero-filled buffer of `len` bytes.
    pub fn zeros(len: usize) -> Self {
        Self {
            bytes: (0..len).map(|_| AtomicU8::new(0)).collect(),
        }
    }

    /// Stores `value` at `idx`.
    pub fn set(&self, idx: usize, value: u8) {
        self.bytes[idx].store(value, Ordering::Relaxed);
    }

    /// Freezes the buffer into owned bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes.into_iter().map(AtomicU8::into_inner).collect()
    }
}

/// Seeded random occupancy grid; each cell is `true` with probability `density`.
pub fn random_bool_grid(width: usize, height: usize, density: f64, seed: u64) -> Grid<bool> {
    let mut rng = StdRng::seed_from_u64(seed);
    let p = density.clamp(0.0, 1.0);
    Grid::from_fn(width, height, |_, _| rng.gen_bool(p))
}

/// Seeded random grid of values in `[0, 1)`.
pub fn random_f64_grid(width: usize, height: usize, seed: u64) -> Grid<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Grid::from_fn(width, height, |_, _| rng.gen_range(0.0..1.0))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn from_rows_is_row_major() {
        let g = Grid::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).expect("rectangular");
        assert_eq!(g.width(), 3);
        assert_eq!(g.height(), 2);
        assert_eq!(*g.get(2, 0), 3);
        assert_eq!(*g.get(0, 1), 4);
        assert_eq!(g.row(1), &[4, 5, 6]);
        assert_eq!(g.rows().count(), 2);
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Grid::from_rows(vec![vec![1, 2], vec![3]]).expect_err("ragged");
        assert_eq!(
            err,
            DemoError::RaggedRows {
                row: 1,
                len: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn shared_grid_round_trips_values() {
        let g = SharedF64Grid::zeros(2, 2);
        g.set(1, 0, 2.5);
        g.set(0, 1, -1.0);
        assert!((g.get(1, 0) - 2.5).abs() < f64::EPSILON);
        let frozen = g.into_grid();
        assert_eq!(frozen.as_slice(), &[0.0, 2.5, -1.0, 0.0]);
    }

    #[test]
    fn random_grids_are_seeded() {
        assert_eq!(random_bool_grid(8, 8, 0.3, 7), random_bool_grid(8, 8, 0.3, 7));
        assert_eq!(random_f64_grid(4, 4, 1), random_f64_grid(4, 4, 1));
        assert!(random_bool_grid(5, 5, 0.0, 3).as_slice().iter().all(|c| !c));
    }
}

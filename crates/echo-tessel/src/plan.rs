// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Partition plans: the ordered, immutable list of regions one call submits.
//!
//! # Coverage rules
//!
//! | Strategy | Regions | Coverage |
//! |---|---|---|
//! | `Horizontal` | `parallel` column bands, last band absorbs the remainder | exact |
//! | `Vertical` | `parallel` row bands, last band absorbs the remainder | exact |
//! | `Window` | `window × window` tiles with `origin + window <= dim` | trailing `dim % window` strip skipped |
//! | `Grid` | `size × size` cells, last row/column truncated | exact |
//! | `PerCell` | one unit region per cell | exact |
//!
//! Plans are deterministic: the same `(width, height, strategy, parallel)`
//! always yields the same regions in the same order.

use crate::error::PartitionError;
use crate::region::Region;

/// How a domain is cut into regions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum Strategy {
    /// `parallel` contiguous column bands spanning the full height.
    Horizontal,
    /// `parallel` contiguous row bands spanning the full width.
    Vertical,
    /// Non-overlapping `window × window` tiles from the origin.
    Window {
        /// Tile edge length.
        window: usize,
    },
    /// A `size × size` grid whose last row and column are truncated to fit.
    Grid {
        /// Cell edge length.
        size: usize,
    },
    /// Every cell is its own unit region.
    PerCell,
}

impl Strategy {
    /// Short stable name, used in logs and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::Window { .. } => "window",
            Self::Grid { .. } => "grid",
            Self::PerCell => "per_cell",
        }
    }

    fn validate(&self, parallel: usize) -> Result<(), PartitionError> {
        if parallel == 0 {
            return Err(PartitionError::ZeroParallelism);
        }
        match self {
            Self::Window { window: 0 } => Err(PartitionError::ZeroWindow),
            Self::Grid { size: 0 } => Err(PartitionError::ZeroCellSize),
            _ => Ok(()),
        }
    }
}

/// The complete, precomputed set of regions for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionPlan {
    width: usize,
    height: usize,
    strategy: Strategy,
    parallel: usize,
    regions: Vec<Region>,
}

impl PartitionPlan {
    /// Validates the inputs and computes the region list.
    ///
    /// For `Horizontal` and `Vertical`, a `parallel` larger than the split
    /// dimension is accepted: the plan still holds exactly `parallel` bands,
    /// the leading ones empty and the last one spanning the whole axis.
    pub fn new(
        width: usize,
        height: usize,
        strategy: Strategy,
        parallel: usize,
    ) -> Result<Self, PartitionError> {
        strategy.validate(parallel)?;

        let regions = match strategy {
            Strategy::Horizontal => axis_bands(width, parallel)
                .into_iter()
                .map(|(lo, hi)| Region::new(lo, 0, hi, height))
                .collect(),
            Strategy::Vertical => axis_bands(height, parallel)
                .into_iter()
                .map(|(lo, hi)| Region::new(0, lo, width, hi))
                .collect(),
            Strategy::Window { window } => window_tiles(width, height, window),
            Strategy::Grid { size } => grid_cells(width, height, size),
            Strategy::PerCell => unit_cells(width, height),
        };

        Ok(Self {
            width,
            height,
            strategy,
            parallel,
            regions,
        })
    }

    /// Domain width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Domain height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Strategy the plan was built with.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Concurrency budget the plan was validated against.
    pub fn parallel(&self) -> usize {
        self.parallel
    }

    /// Regions in submission order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns `true` if the plan submits nothing.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Iterates the regions in submission order.
    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    /// Returns `true` if some region of the plan contains `(x, y)`.
    pub fn covers(&self, x: usize, y: usize) -> bool {
        self.regions.iter().any(|r| r.contains(x, y))
    }

    /// Total number of cells visited by the plan. Saturates at `usize::MAX`.
    pub fn covered_cells(&self) -> usize {
        self.regions
            .iter()
            .map(Region::area)
            .fold(0, usize::saturating_add)
    }
}

impl<'a> IntoIterator for &'a PartitionPlan {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

/// Splits `[0, dim)` into `parts` contiguous bands.
///
/// Every band but the last is `dim / parts` long; the last ends at `dim`.
/// Returns an empty list when `parts == 0`.
pub fn axis_bands(dim: usize, parts: usize) -> Vec<(usize, usize)> {
    let Some(step) = dim.checked_div(parts) else {
        return Vec::new();
    };
    (0..parts)
        .map(|i| {
            let hi = if i + 1 == parts { dim } else { (i + 1) * step };
            (i * step, hi)
        })
        .collect()
}

/// Cell boundaries along one axis for a grid of edge `size`.
///
/// Uniform boundaries at multiples of `size` followed by `dim` itself, so
/// adjacent pairs tile `[0, dim)` exactly. A `dim` shorter than `size`
/// yields the single cell `[0, dim)`; `dim == 0` (or `size == 0`) yields no
/// cells.
pub fn grid_boundaries(dim: usize, size: usize) -> Vec<usize> {
    if dim == 0 || size == 0 {
        return vec![0];
    }
    let uniform = (dim / size).max(1);
    let mut bounds: Vec<usize> = (0..uniform).map(|i| i * size).collect();
    if bounds.last() != Some(&dim) {
        bounds.push(dim);
    }
    bounds
}

fn window_tiles(width: usize, height: usize, window: usize) -> Vec<Region> {
    let origins = |dim: usize| {
        (0..dim)
            .step_by(window)
            .take_while(move |&o| dim - o >= window)
    };
    origins(height)
        .flat_map(|y| origins(width).map(move |x| Region::new(x, y, x + window, y + window)))
        .collect()
}

fn grid_cells(width: usize, height: usize, size: usize) -> Vec<Region> {
    let xs = grid_boundaries(width, size);
    let ys = grid_boundaries(height, size);
    ys.windows(2)
        .flat_map(|row| {
            xs.windows(2)
                .map(move |col| Region::new(col[0], row[0], col[1], row[1]))
        })
        .collect()
}

fn unit_cells(width: usize, height: usize) -> Vec<Region> {
    Region::new(0, 0, width, height)
        .cells()
        .map(|(x, y)| Region::cell(x, y))
        .collect()
}

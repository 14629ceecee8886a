// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use std::fmt;

/// Half-open rectangle `[min_x, max_x) × [min_y, max_y)` inside a domain.
///
/// Invariants:
/// - `min_x <= max_x` and `min_y <= max_y`.
/// - Regions produced by one [`PartitionPlan`](crate::PartitionPlan) never overlap.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    /// Inclusive lower bound on the x axis.
    pub min_x: usize,
    /// Inclusive lower bound on the y axis.
    pub min_y: usize,
    /// Exclusive upper bound on the x axis.
    pub max_x: usize,
    /// Exclusive upper bound on the y axis.
    pub max_y: usize,
}

impl Region {
    /// Constructs a region from its low and high corners.
    ///
    /// Callers outside this crate are expected to respect the ordering
    /// invariant; it is checked in debug builds only.
    #[must_use]
    pub fn new(min_x: usize, min_y: usize, max_x: usize, max_y: usize) -> Self {
        debug_assert!(min_x <= max_x && min_y <= max_y, "invalid region: min > max");
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// The unit region covering the single cell `(x, y)`.
    #[must_use]
    pub fn cell(x: usize, y: usize) -> Self {
        Self::new(x, y, x + 1, y + 1)
    }

    /// Extent along the x axis.
    #[must_use]
    pub fn width(&self) -> usize {
        self.max_x - self.min_x
    }

    /// Extent along the y axis.
    #[must_use]
    pub fn height(&self) -> usize {
        self.max_y - self.min_y
    }

    /// Number of cells inside the region. Saturates at `usize::MAX`.
    #[must_use]
    pub fn area(&self) -> usize {
        self.width().saturating_mul(self.height())
    }

    /// Returns `true` when the region contains no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_x == self.max_x || self.min_y == self.max_y
    }

    /// Returns `true` if `(x, y)` lies inside the region.
    #[must_use]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        (self.min_x..self.max_x).contains(&x) && (self.min_y..self.max_y).contains(&y)
    }

    /// Returns `true` if the two regions share at least one cell.
    ///
    /// Touching edges do not count; both regions are half-open.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }

    /// Iterates every `(x, y)` inside the region in row-major order.
    #[must_use]
    pub fn cells(&self) -> Cells {
        Cells {
            region: *self,
            x: self.min_x,
            y: self.min_y,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}) x [{}, {})",
            self.min_x, self.max_x, self.min_y, self.max_y
        )
    }
}

/// Row-major iterator over the cells of a [`Region`].
#[derive(Debug, Clone)]
pub struct Cells {
    region: Region,
    x: usize,
    y: usize,
}

impl Iterator for Cells {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.region.is_empty() || self.y >= self.region.max_y {
            return None;
        }
        let cell = (self.x, self.y);
        self.x += 1;
        if self.x >= self.region.max_x {
            self.x = self.region.min_x;
            self.y += 1;
        }
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.region.is_empty() || self.y >= self.region.max_y {
            0
        } else {
            let full_rows = self.region.max_y - self.y - 1;
            full_rows
                .saturating_mul(self.region.width())
                .saturating_add(self.region.max_x - self.x)
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Cells {}

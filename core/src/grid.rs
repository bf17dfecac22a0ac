use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Neighbor list of a single cell, never longer than 8.
pub type Neighbors = SmallVec<[CellIndex; 8]>;

/// Rectangular grid addressed either by `(x, y)` or by the flat index `y * width + x`.
///
/// The index conversions assume a non-empty grid and an in-range argument; use
/// [`Grid::index_of`] when the coordinates come from outside.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    width: Coord,
    height: Coord,
}

impl Grid {
    pub const fn new(width: Coord, height: Coord) -> Self {
        Self { width, height }
    }

    pub const fn width(&self) -> Coord {
        self.width
    }

    pub const fn height(&self) -> Coord {
        self.height
    }

    /// Number of cells, 0 for a degenerate grid.
    pub const fn total_cells(&self) -> CellIndex {
        if self.width <= 0 || self.height <= 0 {
            0
        } else {
            (self.width as CellIndex).saturating_mul(self.height as CellIndex)
        }
    }

    /// Number of cells, `None` when it does not fit in [`CellCount`] on any target.
    pub const fn checked_total_cells(&self) -> Option<CellIndex> {
        if self.width <= 0 || self.height <= 0 {
            return Some(0);
        }
        let total = (self.width as u64) * (self.height as u64);
        if total > CellCount::MAX as u64 {
            None
        } else {
            Some(total as CellIndex)
        }
    }

    pub const fn in_bounds(&self, x: Coord, y: Coord) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    pub const fn xy_to_index(&self, x: Coord, y: Coord) -> CellIndex {
        (y as CellIndex) * (self.width as CellIndex) + (x as CellIndex)
    }

    pub const fn index_to_x(&self, index: CellIndex) -> Coord {
        (index % self.width as CellIndex) as Coord
    }

    pub const fn index_to_y(&self, index: CellIndex) -> Coord {
        (index / self.width as CellIndex) as Coord
    }

    pub const fn index_to_xy(&self, index: CellIndex) -> Coord2 {
        (self.index_to_x(index), self.index_to_y(index))
    }

    /// Bounds-checked variant of [`Grid::xy_to_index`].
    pub const fn index_of(&self, x: Coord, y: Coord) -> Option<CellIndex> {
        if self.in_bounds(x, y) {
            Some(self.xy_to_index(x, y))
        } else {
            None
        }
    }

    pub fn validate_index(&self, index: CellIndex) -> Result<CellIndex> {
        let total = self.total_cells();
        if index < total {
            Ok(index)
        } else {
            Err(ArgumentError::IndexOutOfRange { index, total }.into())
        }
    }

    /// Cells at Chebyshev distance 1 from `index`, clipped to the grid, in row-major order.
    pub fn iter_neighbors(&self, index: CellIndex) -> NeighborIter {
        NeighborIter::new(*self, self.index_to_xy(index))
    }

    pub fn neighbors(&self, index: CellIndex) -> Neighbors {
        self.iter_neighbors(index).collect()
    }

    /// Borrows a flat per-cell buffer as a `(height, width)` array, indexable as `[[y, x]]`.
    pub fn view<'a>(&self, cells: &'a [u8]) -> Result<ArrayView2<'a, u8>> {
        let shape = (self.height.max(0) as usize, self.width.max(0) as usize);
        ArrayView2::from_shape(shape, cells).map_err(|_| ArgumentError::BufferShape.into())
    }
}

const DISPLACEMENTS: [Coord2; 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[derive(Debug)]
pub struct NeighborIter {
    grid: Grid,
    center: Coord2,
    index: u8,
}

impl NeighborIter {
    fn new(grid: Grid, center: Coord2) -> Self {
        Self {
            grid,
            center,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = CellIndex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&(dx, dy)) = DISPLACEMENTS.get(usize::from(self.index)) {
            self.index += 1;
            let (x, y) = (self.center.0 + dx, self.center.1 + dy);
            if self.grid.in_bounds(x, y) {
                return Some(self.grid.xy_to_index(x, y));
            }
        }
        None
    }
}

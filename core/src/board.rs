use alloc::{vec, vec::Vec};
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Board dimensions and mine count.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSpec {
    pub width: Coord,
    pub height: Coord,
    pub mine_count: CellCount,
}

impl BoardSpec {
    pub const fn new(width: Coord, height: Coord, mine_count: CellCount) -> Self {
        Self {
            width,
            height,
            mine_count,
        }
    }

    pub const fn grid(&self) -> Grid {
        Grid::new(self.width, self.height)
    }

    pub const fn total_cells(&self) -> CellIndex {
        self.grid().total_cells()
    }

    pub const fn safe_cell_count(&self) -> CellIndex {
        self.total_cells().saturating_sub(self.mine_count as CellIndex)
    }

    /// Checks `width > 0`, `height > 0`, a cell count that fits [`CellCount`] and
    /// `1 <= mine_count < width * height`.
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 {
            return Err(SpecError::Width(self.width).into());
        }
        if self.height <= 0 {
            return Err(SpecError::Height(self.height).into());
        }

        let Some(total) = self.grid().checked_total_cells() else {
            return Err(SpecError::TooLarge {
                width: self.width,
                height: self.height,
            }
            .into());
        };
        if self.mine_count < 1 || self.mine_count as CellIndex >= total {
            return Err(SpecError::MineCount {
                mine_count: self.mine_count,
                max: (total - 1) as CellCount,
            }
            .into());
        }

        Ok(())
    }

    pub fn validated(self) -> Result<Self> {
        self.validate().map(|()| self)
    }
}

/// Immutable minefield: one byte per cell for the mine flag and one for the neighbor count.
///
/// Both buffers are laid out row-major, so cell `(x, y)` lives at `y * width + x`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "BoardRecord")]
pub struct Board {
    spec: BoardSpec,
    mines: Vec<u8>,
    adjacent_mine_counts: Vec<u8>,
}

impl Board {
    /// All-clear stand-in used until the real board is generated.
    pub(crate) fn placeholder(spec: BoardSpec) -> Self {
        let total = spec.total_cells();
        Self {
            spec,
            mines: vec![0; total],
            adjacent_mine_counts: vec![0; total],
        }
    }

    /// Builds a board from a row-major mask where any non-zero byte is a mine.
    pub fn from_mine_mask(spec: BoardSpec, mut mask: Vec<u8>) -> Result<Self> {
        spec.validate()?;
        let grid = spec.grid();
        if mask.len() != grid.total_cells() {
            return Err(ArgumentError::BufferShape.into());
        }

        let mut actual = 0;
        for cell in mask.iter_mut() {
            *cell = u8::from(*cell != 0);
            actual += CellCount::from(*cell);
        }
        if actual != spec.mine_count {
            return Err(ArgumentError::MineCountMismatch {
                expected: spec.mine_count,
                actual,
            }
            .into());
        }

        let adjacent_mine_counts = compute_adjacent_mine_counts(grid, &mask)?;
        Ok(Self {
            spec,
            mines: mask,
            adjacent_mine_counts,
        })
    }

    /// Places mines at exactly `mine_indices`; duplicates collapse into one mine.
    pub fn from_mine_indices(spec: BoardSpec, mine_indices: &[CellIndex]) -> Result<Self> {
        spec.validate()?;
        let grid = spec.grid();
        let mut mask = vec![0; grid.total_cells()];
        for &index in mine_indices {
            mask[grid.validate_index(index)?] = 1;
        }
        Self::from_mine_mask(spec, mask)
    }

    pub const fn spec(&self) -> &BoardSpec {
        &self.spec
    }

    pub const fn grid(&self) -> Grid {
        self.spec.grid()
    }

    pub const fn mine_count(&self) -> CellCount {
        self.spec.mine_count
    }

    pub fn mines(&self) -> &[u8] {
        &self.mines
    }

    pub fn adjacent_mine_counts(&self) -> &[u8] {
        &self.adjacent_mine_counts
    }

    pub fn is_mine(&self, index: CellIndex) -> bool {
        self.mines[index] == 1
    }

    /// Neighbor mine count, meaningless on mine cells.
    pub fn adjacent_count(&self, index: CellIndex) -> u8 {
        self.adjacent_mine_counts[index]
    }

    pub fn mine_indices(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.mines
            .iter()
            .enumerate()
            .filter(|&(_, &mine)| mine == 1)
            .map(|(index, _)| index)
    }

    pub fn mine_grid(&self) -> Result<ArrayView2<'_, u8>> {
        self.grid().view(&self.mines)
    }

    pub fn count_grid(&self) -> Result<ArrayView2<'_, u8>> {
        self.grid().view(&self.adjacent_mine_counts)
    }
}

/// Serialized form of [`Board`], checked before it becomes one.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BoardRecord {
    pub(crate) spec: BoardSpec,
    mines: Vec<u8>,
    adjacent_mine_counts: Vec<u8>,
}

impl BoardRecord {
    /// The all-zero board of an ungenerated game.
    pub(crate) fn into_placeholder(self) -> Result<Board> {
        let board = Board::placeholder(self.spec);
        if self.mines != board.mines || self.adjacent_mine_counts != board.adjacent_mine_counts {
            return Err(ArgumentError::CorruptRecord("ungenerated board holds mines").into());
        }
        Ok(board)
    }
}

impl TryFrom<BoardRecord> for Board {
    type Error = GameError;

    fn try_from(record: BoardRecord) -> Result<Self> {
        let board = Self::from_mine_mask(record.spec, record.mines)?;
        if board.adjacent_mine_counts != record.adjacent_mine_counts {
            return Err(ArgumentError::CorruptRecord("adjacent counts do not match mines").into());
        }
        Ok(board)
    }
}

/// Neighbor mine counts for every non-mine cell; mine cells get 0.
pub fn compute_adjacent_mine_counts(grid: Grid, mines: &[u8]) -> Result<Vec<u8>> {
    if mines.len() != grid.total_cells() {
        return Err(ArgumentError::BufferShape.into());
    }

    Ok(mines
        .iter()
        .enumerate()
        .map(|(index, &mine)| {
            if mine == 1 {
                0
            } else {
                grid.iter_neighbors(index).map(|n| mines[n]).sum::<u8>()
            }
        })
        .collect())
}

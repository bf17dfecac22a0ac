use core::fmt;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;
pub use seeded::*;

mod seeded;

/// Cells kept free of mines around the first click, at most 9.
pub type SafeZone = SmallVec<[CellIndex; 9]>;

pub trait BoardGenerator {
    fn generate(&self, spec: &BoardSpec, safe_index: CellIndex) -> Result<GeneratedBoard>;
}

/// How much of the first click's surroundings is guaranteed mine-free.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyMode {
    /// The clicked cell and all of its neighbors.
    Neighbors,
    /// Only the clicked cell, used when the board is too dense for the full zone.
    Cell,
}

impl SafetyMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Neighbors => "neighbors",
            Self::Cell => "cell",
        }
    }

    /// Strongest mode that still leaves room for every mine.
    pub fn choose(spec: &BoardSpec, safe_index: CellIndex) -> Self {
        let grid = spec.grid();
        let zone_size = 1 + grid.iter_neighbors(safe_index).count();
        if spec.mine_count as CellIndex <= grid.total_cells().saturating_sub(zone_size) {
            Self::Neighbors
        } else {
            Self::Cell
        }
    }
}

impl fmt::Display for SafetyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedBoard {
    pub board: Board,
    pub safety_mode: SafetyMode,
}

/// Exact set of cells excluded from mine placement, `safe_index` first.
pub fn safe_zone_indices(
    grid: Grid,
    safe_index: CellIndex,
    mode: SafetyMode,
) -> Result<SafeZone> {
    let safe_index = grid.validate_index(safe_index)?;
    let mut zone = SafeZone::new();
    zone.push(safe_index);
    if mode == SafetyMode::Neighbors {
        zone.extend(grid.iter_neighbors(safe_index));
    }
    Ok(zone)
}

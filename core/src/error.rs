use thiserror::Error;

use crate::{CellCount, CellIndex, Coord};

/// Malformed board specification.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("Invalid width: {0}")]
    Width(Coord),
    #[error("Invalid height: {0}")]
    Height(Coord),
    #[error("Invalid mine count: {mine_count} (must be in [1, {max}])")]
    MineCount { mine_count: CellCount, max: CellCount },
    #[error("Board {width}x{height} has too many cells")]
    TooLarge { width: Coord, height: Coord },
    #[error("Width must be an integer in [{min}, {max}]")]
    WidthOutOfRange { min: Coord, max: Coord },
    #[error("Height must be an integer in [{min}, {max}]")]
    HeightOutOfRange { min: Coord, max: Coord },
}

/// Argument outside the accepted domain of an operation.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("Invalid cell index {index}, board has {total} cells")]
    IndexOutOfRange { index: CellIndex, total: CellIndex },
    #[error("Mine count mismatch: spec={expected}, actual={actual}")]
    MineCountMismatch { expected: CellCount, actual: CellCount },
    #[error("Upper bound must be a positive integer: {0}")]
    NonPositiveBound(usize),
    #[error("Buffer does not match board shape")]
    BufferShape,
    #[error("Corrupt saved record: {0}")]
    CorruptRecord(&'static str),
}

/// Internal consistency checks of board generation.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Invariant {
    #[error("safe index is a mine")]
    SafeCellMined,
    #[error("neighbor safety requested but a neighbor is a mine")]
    SafeZoneMined,
    #[error("not enough candidate cells: mines={mines} candidates={candidates}")]
    NotEnoughCandidates { mines: CellIndex, candidates: CellIndex },
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid board spec: {0}")]
    InvalidSpec(#[from] SpecError),
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentError),
    #[error("Invariant violated: {0}")]
    InvariantViolated(#[from] Invariant),
}

impl GameError {
    /// Caller supplied bad input, nothing was mutated.
    pub const fn is_contract_violation(&self) -> bool {
        matches!(self, Self::InvalidSpec(_) | Self::InvalidArgument(_))
    }

    /// The engine itself is broken.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::InvariantViolated(_))
    }
}

pub type Result<T> = core::result::Result<T, GameError>;

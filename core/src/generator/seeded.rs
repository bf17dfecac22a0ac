use alloc::{format, string::String, vec, vec::Vec};
use hashbrown::HashSet;

use super::*;

/// Reproducible generator: the same seed, spec and first click always give the same board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededGenerator {
    seed: String,
}

impl SeededGenerator {
    pub fn new(seed: impl Into<String>) -> Self {
        Self { seed: seed.into() }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl BoardGenerator for SeededGenerator {
    fn generate(&self, spec: &BoardSpec, safe_index: CellIndex) -> Result<GeneratedBoard> {
        generate_board(spec, &self.seed, safe_index)
    }
}

/// Key for the placement shuffle. Mixing in the first click and the safety mode makes one seed
/// give different boards for different openings.
pub fn shuffle_key(
    spec: &BoardSpec,
    seed: &str,
    safe_index: CellIndex,
    mode: SafetyMode,
) -> String {
    format!(
        "{seed}|{}x{}|{}|{safe_index}|{mode}",
        spec.width, spec.height, spec.mine_count
    )
}

/// Places `spec.mine_count` mines outside the first-click safe zone.
pub fn generate_board(
    spec: &BoardSpec,
    seed: &str,
    safe_index: CellIndex,
) -> Result<GeneratedBoard> {
    spec.validate()?;
    let grid = spec.grid();
    let safe_index = grid.validate_index(safe_index)?;

    let safety_mode = SafetyMode::choose(spec, safe_index);
    if safety_mode == SafetyMode::Cell {
        log::warn!(
            "Cannot keep neighbors of cell {} clear with {} mines, fallback to cell safety",
            safe_index,
            spec.mine_count
        );
    }

    let excluded: HashSet<CellIndex> = safe_zone_indices(grid, safe_index, safety_mode)?
        .into_iter()
        .collect();
    let mut candidates: Vec<CellIndex> = (0..grid.total_cells())
        .filter(|index| !excluded.contains(index))
        .collect();

    let mine_count = spec.mine_count as CellIndex;
    if mine_count > candidates.len() {
        return Err(Invariant::NotEnoughCandidates {
            mines: mine_count,
            candidates: candidates.len(),
        }
        .into());
    }

    SeededRng::new(&shuffle_key(spec, seed, safe_index, safety_mode)).shuffle(&mut candidates);

    let mut mines = vec![0; grid.total_cells()];
    for &index in candidates.iter().take(mine_count) {
        mines[index] = 1;
    }
    check_safe_zone(grid, &mines, safe_index, safety_mode)?;

    let board = Board::from_mine_mask(*spec, mines)?;
    log::debug!(
        "Generated {}x{} board with {} mines, safe index {}, safety {}",
        spec.width,
        spec.height,
        spec.mine_count,
        safe_index,
        safety_mode
    );
    Ok(GeneratedBoard { board, safety_mode })
}

fn check_safe_zone(
    grid: Grid,
    mines: &[u8],
    safe_index: CellIndex,
    mode: SafetyMode,
) -> Result<()> {
    if mines[safe_index] == 1 {
        return Err(Invariant::SafeCellMined.into());
    }
    if mode == SafetyMode::Neighbors && grid.iter_neighbors(safe_index).any(|n| mines[n] == 1) {
        return Err(Invariant::SafeZoneMined.into());
    }
    Ok(())
}

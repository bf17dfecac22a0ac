use alloc::{string::String, vec, vec::Vec};
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::*;

/// A reproducible challenge: board shape plus the seed that mines it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub spec: BoardSpec,
    pub seed: String,
}

impl GameConfig {
    pub fn new(spec: BoardSpec, seed: impl Into<String>) -> Self {
        Self {
            spec,
            seed: seed.into(),
        }
    }

    pub fn from_preset(difficulty: Difficulty, seed: impl Into<String>) -> Self {
        Self::new(difficulty.spec(), seed)
    }
}

/// Valid transitions:
/// - Playing -> Won
/// - Playing -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RevealOutcome {
    #[default]
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RevealResult {
    pub outcome: RevealOutcome,
    /// Set only by the reveal that generated the board.
    pub safety_mode_used: Option<SafetyMode>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// What a renderer should draw for one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed(u8),
    Mine,
}

/// One game from the first click to a win or a loss.
///
/// The board is generated lazily by the first reveal, so the opening cell can be kept safe.
/// Operations that do not apply right now (game over, off-board, wrong cell state) leave the
/// state untouched instead of failing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "GameStateRecord")]
pub struct GameState {
    config: GameConfig,
    status: GameStatus,
    generated: bool,
    first_click_index: Option<CellIndex>,
    board: Board,
    revealed: Vec<u8>,
    flagged: Vec<u8>,
    /// Revealed non-mine cells.
    revealed_count: CellIndex,
    flags_count: CellIndex,
    start_ms: Option<Millis>,
    end_ms: Option<Millis>,
    scoring: ScoreTracker,
}

/// Saved [`GameState`] as read back, before the cross-field checks.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameStateRecord {
    config: GameConfig,
    status: GameStatus,
    generated: bool,
    first_click_index: Option<CellIndex>,
    board: BoardRecord,
    revealed: Vec<u8>,
    flagged: Vec<u8>,
    revealed_count: CellIndex,
    flags_count: CellIndex,
    start_ms: Option<Millis>,
    end_ms: Option<Millis>,
    scoring: ScoreTracker,
}

impl TryFrom<GameStateRecord> for GameState {
    type Error = GameError;

    fn try_from(record: GameStateRecord) -> Result<Self> {
        let spec = record.config.spec;
        spec.validate()?;
        let total = spec.total_cells();
        if record.board.spec != spec
            || record.revealed.len() != total
            || record.flagged.len() != total
        {
            return Err(ArgumentError::BufferShape.into());
        }
        let board = if record.generated {
            Board::try_from(record.board)?
        } else {
            record.board.into_placeholder()?
        };
        if let Some(index) = record.first_click_index {
            spec.grid().validate_index(index)?;
        }

        let mut revealed_count = 0;
        let mut flags_count = 0;
        for (index, (&revealed, &flagged)) in
            record.revealed.iter().zip(&record.flagged).enumerate()
        {
            if revealed > 1 || flagged > 1 {
                return Err(ArgumentError::CorruptRecord("cell marks must be 0 or 1").into());
            }
            if revealed == 1 && flagged == 1 {
                return Err(ArgumentError::CorruptRecord("cell both revealed and flagged").into());
            }
            if revealed == 1 && !board.is_mine(index) {
                revealed_count += 1;
            }
            flags_count += usize::from(flagged);
        }
        if revealed_count != record.revealed_count || flags_count != record.flags_count {
            return Err(ArgumentError::CorruptRecord("counters do not match cells").into());
        }
        if !record.generated && (revealed_count > 0 || record.status.is_finished()) {
            return Err(ArgumentError::CorruptRecord("ungenerated game has progress").into());
        }

        Ok(Self {
            config: record.config,
            status: record.status,
            generated: record.generated,
            first_click_index: record.first_click_index,
            board,
            revealed: record.revealed,
            flagged: record.flagged,
            revealed_count,
            flags_count,
            start_ms: record.start_ms,
            end_ms: record.end_ms,
            scoring: record.scoring,
        })
    }
}

impl GameState {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.spec.validate()?;
        let board = Board::placeholder(config.spec);
        Ok(Self::with_board(config, board, false))
    }

    /// Game on a board that already exists, e.g. one built with [`Board::from_mine_indices`].
    pub fn from_board(board: Board, seed: impl Into<String>) -> Self {
        let config = GameConfig::new(*board.spec(), seed);
        Self::with_board(config, board, true)
    }

    fn with_board(config: GameConfig, board: Board, generated: bool) -> Self {
        let total = config.spec.total_cells();
        Self {
            config,
            status: GameStatus::Playing,
            generated,
            first_click_index: None,
            board,
            revealed: vec![0; total],
            flagged: vec![0; total],
            revealed_count: 0,
            flags_count: 0,
            start_ms: None,
            end_ms: None,
            scoring: ScoreTracker::default(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn first_click_index(&self) -> Option<CellIndex> {
        self.first_click_index
    }

    /// All-clear placeholder until the first reveal.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn grid(&self) -> Grid {
        self.config.spec.grid()
    }

    pub fn revealed(&self) -> &[u8] {
        &self.revealed
    }

    pub fn flagged(&self) -> &[u8] {
        &self.flagged
    }

    pub fn revealed_grid(&self) -> Result<ArrayView2<'_, u8>> {
        self.grid().view(&self.revealed)
    }

    pub fn flagged_grid(&self) -> Result<ArrayView2<'_, u8>> {
        self.grid().view(&self.flagged)
    }

    pub fn revealed_count(&self) -> CellIndex {
        self.revealed_count
    }

    pub fn flags_count(&self) -> CellIndex {
        self.flags_count
    }

    pub fn start_ms(&self) -> Option<Millis> {
        self.start_ms
    }

    pub fn end_ms(&self) -> Option<Millis> {
        self.end_ms
    }

    pub fn score(&self) -> Score {
        self.scoring.score()
    }

    pub fn correct_streak(&self) -> u32 {
        self.scoring.correct_streak()
    }

    /// How many mines have not been flagged yet, negative when over-flagged.
    pub fn mines_left(&self) -> i64 {
        i64::from(self.config.spec.mine_count) - self.flags_count as i64
    }

    /// Whole seconds since the first action, frozen once the game ends, 0 before it starts.
    pub fn elapsed_secs(&self, now_ms: Millis) -> u64 {
        match self.start_ms {
            Some(start_ms) => self.end_ms.unwrap_or(now_ms).saturating_sub(start_ms) / 1000,
            None => 0,
        }
    }

    pub fn cell_at(&self, x: Coord, y: Coord) -> Option<CellView> {
        let index = self.grid().index_of(x, y)?;
        Some(if self.revealed[index] == 1 {
            if self.board.is_mine(index) {
                CellView::Mine
            } else {
                CellView::Revealed(self.board.adjacent_count(index))
            }
        } else if self.flagged[index] == 1 {
            CellView::Flagged
        } else {
            CellView::Hidden
        })
    }

    /// Reveals `(x, y)`, generating the board from the configured seed on the first call.
    pub fn reveal(&mut self, x: Coord, y: Coord, now_ms: Option<Millis>) -> Result<RevealResult> {
        let generator = SeededGenerator::new(self.config.seed.as_str());
        self.reveal_with(&generator, x, y, now_ms)
    }

    /// Like [`GameState::reveal`], with a caller-chosen generator for the first click.
    ///
    /// Errors come only from generation and leave the state as it was.
    pub fn reveal_with<G: BoardGenerator + ?Sized>(
        &mut self,
        generator: &G,
        x: Coord,
        y: Coord,
        now_ms: Option<Millis>,
    ) -> Result<RevealResult> {
        let Some(index) = self.interactive_index(x, y) else {
            return Ok(RevealResult::default());
        };
        if self.flagged[index] == 1 || self.revealed[index] == 1 {
            return Ok(RevealResult::default());
        }

        let mut safety_mode_used = None;
        if !self.generated {
            let GeneratedBoard { board, safety_mode } =
                generator.generate(&self.config.spec, index)?;
            if board.spec() != &self.config.spec {
                return Err(ArgumentError::BufferShape.into());
            }
            self.board = board;
            self.generated = true;
            self.first_click_index = Some(index);
            safety_mode_used = Some(safety_mode);
        }

        self.mark_started(now_ms);
        let outcome = self.reveal_cells([index], now_ms);
        Ok(RevealResult {
            outcome,
            safety_mode_used,
        })
    }

    pub fn toggle_flag(&mut self, x: Coord, y: Coord, now_ms: Option<Millis>) -> MarkOutcome {
        let Some(index) = self.interactive_index(x, y) else {
            return MarkOutcome::NoChange;
        };
        if self.revealed[index] == 1 {
            return MarkOutcome::NoChange;
        }

        self.mark_started(now_ms);
        if self.flagged[index] == 1 {
            self.flagged[index] = 0;
            self.flags_count -= 1;
        } else {
            self.flagged[index] = 1;
            self.flags_count += 1;
        }
        MarkOutcome::Changed
    }

    /// Reveals the hidden neighbors of a revealed number once it has exactly that many flags
    /// around it. Flags are trusted, so a misplaced one makes this hit a mine.
    pub fn chord(&mut self, x: Coord, y: Coord, now_ms: Option<Millis>) -> RevealOutcome {
        if !self.generated {
            return RevealOutcome::NoChange;
        }
        let Some(index) = self.interactive_index(x, y) else {
            return RevealOutcome::NoChange;
        };
        if self.revealed[index] == 0 {
            return RevealOutcome::NoChange;
        }

        let grid = self.grid();
        let required = usize::from(self.board.adjacent_count(index));
        let flags = grid
            .iter_neighbors(index)
            .filter(|&n| self.flagged[n] == 1)
            .count();
        if flags != required {
            return RevealOutcome::NoChange;
        }

        let targets: Neighbors = grid
            .iter_neighbors(index)
            .filter(|&n| self.flagged[n] == 0 && self.revealed[n] == 0)
            .collect();
        self.mark_started(now_ms);
        self.reveal_cells(targets, now_ms)
    }

    /// Index of an on-board cell while the game is still accepting moves.
    fn interactive_index(&self, x: Coord, y: Coord) -> Option<CellIndex> {
        if self.status.is_playing() {
            self.grid().index_of(x, y)
        } else {
            None
        }
    }

    /// Flood reveal shared by reveal and chord, driven by an explicit work list.
    fn reveal_cells(
        &mut self,
        starts: impl IntoIterator<Item = CellIndex>,
        now_ms: Option<Millis>,
    ) -> RevealOutcome {
        if !self.status.is_playing() {
            return RevealOutcome::NoChange;
        }

        let grid = self.grid();
        let total = grid.total_cells();
        let revealed_before = self.revealed_count;
        let mut to_visit: Vec<CellIndex> = starts.into_iter().collect();

        while let Some(index) = to_visit.pop() {
            if index >= total || self.revealed[index] == 1 || self.flagged[index] == 1 {
                continue;
            }

            self.revealed[index] = 1;
            if self.board.is_mine(index) {
                log::debug!("Hit mine at {:?}", grid.index_to_xy(index));
                self.lose(now_ms);
                return RevealOutcome::HitMine;
            }
            self.revealed_count += 1;

            if self.board.adjacent_count(index) == 0 {
                let queued = to_visit.len();
                to_visit.extend(grid.iter_neighbors(index).filter(|&n| {
                    self.revealed[n] == 0 && self.flagged[n] == 0 && !self.board.is_mine(n)
                }));
                log::trace!(
                    "Flood from {:?} queued {} cells",
                    grid.index_to_xy(index),
                    to_visit.len() - queued
                );
            }
        }

        let changed = self.revealed_count != revealed_before;
        if changed {
            self.scoring.record_correct();
        }

        if self.revealed_count == self.config.spec.safe_cell_count() {
            self.end_game(GameStatus::Won, now_ms);
            RevealOutcome::Won
        } else if changed {
            RevealOutcome::Revealed
        } else {
            RevealOutcome::NoChange
        }
    }

    fn lose(&mut self, now_ms: Option<Millis>) {
        self.scoring.record_mine_hit();
        self.end_game(GameStatus::Lost, now_ms);
        for (revealed, &mine) in self.revealed.iter_mut().zip(self.board.mines()) {
            if mine == 1 {
                *revealed = 1;
            }
        }
    }

    fn mark_started(&mut self, now_ms: Option<Millis>) {
        if self.start_ms.is_none() {
            if let Some(now_ms) = now_ms {
                log::debug!("Game started at {}ms", now_ms);
                self.start_ms = Some(now_ms);
            }
        }
    }

    fn end_game(&mut self, status: GameStatus, now_ms: Option<Millis>) {
        if self.status.is_finished() {
            return;
        }

        self.status = status;
        if self.end_ms.is_none() {
            self.end_ms = now_ms;
        }
        log::debug!(
            "Game ended {:?} at {:?}ms with score {}",
            status,
            self.end_ms,
            self.scoring.score()
        );
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    use super::*;

    fn game(spec: BoardSpec, mines: &[CellIndex]) -> GameState {
        GameState::from_board(Board::from_mine_indices(spec, mines).unwrap(), "ignored")
    }

    fn reveal(state: &mut GameState, x: Coord, y: Coord, now_ms: Millis) -> RevealOutcome {
        state.reveal(x, y, Some(now_ms)).unwrap().outcome
    }

    struct FailingGenerator;

    impl BoardGenerator for FailingGenerator {
        fn generate(&self, _: &BoardSpec, _: CellIndex) -> Result<GeneratedBoard> {
            Err(Invariant::SafeCellMined.into())
        }
    }

    #[test]
    fn new_game_starts_empty() {
        let state = GameState::new(GameConfig::new(BoardSpec::new(9, 9, 10), "seed")).unwrap();

        assert_eq!(state.status(), GameStatus::Playing);
        assert!(!state.is_generated());
        assert_eq!(state.first_click_index(), None);
        assert_eq!(state.revealed().len(), 81);
        assert!(state.board().mines().iter().all(|&m| m == 0));
        assert_eq!(state.start_ms(), None);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn new_game_rejects_invalid_spec() {
        let err = GameState::new(GameConfig::new(BoardSpec::new(3, 3, 9), "seed")).unwrap_err();
        assert!(matches!(err, GameError::InvalidSpec(SpecError::MineCount { .. })));
    }

    #[test]
    fn first_reveal_generates_deterministically() {
        let config = GameConfig::new(BoardSpec::new(9, 9, 10), "seed:det");
        let mut a = GameState::new(config.clone()).unwrap();
        let mut b = GameState::new(config).unwrap();

        let result = a.reveal(3, 4, Some(100)).unwrap();
        b.reveal(3, 4, Some(200)).unwrap();

        assert_eq!(result.safety_mode_used, Some(SafetyMode::Neighbors));
        assert!(a.is_generated());
        assert_eq!(a.first_click_index(), Some(39));
        assert_eq!(a.start_ms(), Some(100));
        assert_eq!(a.board(), b.board());
        assert_eq!(a.board(), &generate_board(&a.config().spec, "seed:det", 39).unwrap().board);
        // a zero opening always cascades past the clicked cell
        assert!(a.revealed_count() > 1);
    }

    #[test]
    fn later_reveals_do_not_regenerate() {
        let mut state = GameState::new(GameConfig::new(BoardSpec::new(9, 9, 10), "seed")).unwrap();
        state.reveal(0, 0, None).unwrap();
        let board = state.board().clone();

        let hidden = state.revealed().iter().position(|&r| r == 0).unwrap();
        let (x, y) = state.grid().index_to_xy(hidden);
        let result = state.reveal(x, y, None).unwrap();

        assert_eq!(result.safety_mode_used, None);
        assert_eq!(state.board(), &board);
        assert_eq!(state.first_click_index(), Some(0));
    }

    #[test]
    fn flood_fill_opens_zero_region_and_wins() {
        let mut state = game(BoardSpec::new(3, 3, 1), &[8]);

        assert_eq!(reveal(&mut state, 0, 0, 123), RevealOutcome::Won);
        assert_eq!(state.status(), GameStatus::Won);
        assert_eq!(state.revealed_count(), 8);
        assert_eq!(state.score(), 10);
        assert_eq!(state.correct_streak(), 1);
        assert_eq!(state.revealed()[8], 0);
        assert_eq!(state.end_ms(), Some(123));
        assert_eq!(state.cell_at(2, 2), Some(CellView::Hidden));
        assert_eq!(state.cell_at(1, 1), Some(CellView::Revealed(1)));
    }

    #[test]
    fn flood_fill_stops_at_flags() {
        let mut state = game(BoardSpec::new(3, 3, 1), &[8]);
        state.toggle_flag(2, 0, None);

        assert_eq!(reveal(&mut state, 0, 0, 1), RevealOutcome::Revealed);
        assert_eq!(state.revealed()[2], 0);
        assert_eq!(state.revealed_count(), 7);
        assert_eq!(state.status(), GameStatus::Playing);
    }

    #[test]
    fn flood_fill_handles_large_open_boards() {
        let spec = BoardSpec::new(200, 200, 1);
        let mut state = game(spec, &[spec.total_cells() - 1]);

        assert_eq!(reveal(&mut state, 0, 0, 1), RevealOutcome::Won);
        assert_eq!(state.revealed_count(), spec.safe_cell_count());
    }

    #[test]
    fn chord_reveals_neighbors_when_flags_match() {
        let mut state = game(BoardSpec::new(3, 3, 1), &[0]);

        reveal(&mut state, 1, 1, 10);
        assert_eq!(state.revealed_count(), 1);

        assert_eq!(state.toggle_flag(0, 0, Some(20)), MarkOutcome::Changed);
        assert_eq!(state.flags_count(), 1);

        assert_eq!(state.chord(1, 1, Some(30)), RevealOutcome::Won);
        assert_eq!(state.status(), GameStatus::Won);
        assert_eq!(state.revealed_count(), 8);
        assert_eq!(state.score(), 30);
        assert_eq!(state.correct_streak(), 2);
    }

    #[test]
    fn chord_with_misplaced_flag_loses() {
        let mut state = game(BoardSpec::new(3, 3, 1), &[0]);

        reveal(&mut state, 1, 1, 10);
        state.toggle_flag(0, 1, Some(20));

        assert_eq!(state.chord(1, 1, Some(30)), RevealOutcome::HitMine);
        assert_eq!(state.status(), GameStatus::Lost);
        assert_eq!(state.revealed()[0], 1);
        assert_eq!(state.end_ms(), Some(30));
        assert_eq!(state.cell_at(0, 0), Some(CellView::Mine));
    }

    #[test]
    fn chord_needs_matching_flag_count() {
        let mut state = game(BoardSpec::new(3, 3, 1), &[0]);
        reveal(&mut state, 1, 1, 10);
        let before = state.clone();

        assert_eq!(state.chord(1, 1, Some(20)), RevealOutcome::NoChange);
        assert_eq!(state, before);

        state.toggle_flag(0, 0, None);
        state.toggle_flag(2, 2, None);
        let before = state.clone();
        assert_eq!(state.chord(1, 1, Some(30)), RevealOutcome::NoChange);
        assert_eq!(state, before);
    }

    #[test]
    fn chord_ignores_hidden_cells_and_ungenerated_boards() {
        let mut fresh = GameState::new(GameConfig::new(BoardSpec::new(3, 3, 1), "x")).unwrap();
        let before = fresh.clone();
        assert_eq!(fresh.chord(1, 1, Some(5)), RevealOutcome::NoChange);
        assert_eq!(fresh, before);

        let mut state = game(BoardSpec::new(3, 3, 1), &[0]);
        let before = state.clone();
        assert_eq!(state.chord(1, 1, Some(5)), RevealOutcome::NoChange);
        assert_eq!(state, before);
    }

    #[test]
    fn mine_hit_reveals_every_mine() {
        let spec = BoardSpec::new(4, 4, 3);
        let mut state = game(spec, &[0, 5, 15]);

        assert_eq!(reveal(&mut state, 0, 0, 1), RevealOutcome::HitMine);
        assert_eq!(state.status(), GameStatus::Lost);
        for index in 0..spec.total_cells() {
            let mine = state.board().is_mine(index);
            assert_eq!(state.revealed()[index] == 1, mine, "cell {index}");
        }
        assert_eq!(state.revealed_count(), 0);
    }

    #[test]
    fn streak_rewards_accumulate() {
        let mut state = game(BoardSpec::new(3, 3, 4), &[0, 2, 6, 8]);

        let steps = [(1, 1, 10), (1, 0, 30), (0, 1, 50), (2, 1, 70), (1, 2, 100)];
        for (x, y, score) in steps {
            assert!(reveal(&mut state, x, y, 10).has_update());
            assert_eq!(state.score(), score);
        }

        assert_eq!(state.correct_streak(), 5);
        assert_eq!(state.status(), GameStatus::Won);
    }

    #[test]
    fn mine_hit_deducts_and_resets_streak() {
        let mut state = game(BoardSpec::new(3, 3, 4), &[0, 2, 6, 8]);
        for (x, y) in [(1, 1), (1, 0), (0, 1), (2, 1)] {
            reveal(&mut state, x, y, 10);
        }
        assert_eq!((state.score(), state.correct_streak()), (70, 4));

        assert_eq!(reveal(&mut state, 0, 0, 20), RevealOutcome::HitMine);
        assert_eq!(state.status(), GameStatus::Lost);
        assert_eq!(state.score(), 50);
        assert_eq!(state.correct_streak(), 0);
    }

    #[test]
    fn finished_games_ignore_input() {
        let mut state = game(BoardSpec::new(2, 2, 1), &[0]);
        reveal(&mut state, 0, 0, 1);
        let before = state.clone();

        assert_eq!(state.reveal(1, 1, Some(2)).unwrap(), RevealResult::default());
        assert_eq!(state.toggle_flag(1, 1, Some(2)), MarkOutcome::NoChange);
        assert_eq!(state.chord(0, 0, Some(2)), RevealOutcome::NoChange);
        assert_eq!(state, before);
    }

    #[test]
    fn off_board_input_is_ignored() {
        let mut state = GameState::new(GameConfig::new(BoardSpec::new(3, 3, 1), "x")).unwrap();
        let before = state.clone();

        for (x, y) in [(-1, 0), (0, -1), (3, 0), (0, 3)] {
            assert_eq!(state.reveal(x, y, Some(1)).unwrap(), RevealResult::default());
            assert_eq!(state.toggle_flag(x, y, Some(1)), MarkOutcome::NoChange);
            assert_eq!(state.chord(x, y, Some(1)), RevealOutcome::NoChange);
        }
        assert_eq!(state, before);
        assert_eq!(state.cell_at(3, 3), None);
    }

    #[test]
    fn flags_block_reveal_and_toggle_back() {
        let mut state = game(BoardSpec::new(3, 3, 1), &[0]);

        assert_eq!(state.toggle_flag(2, 2, Some(5)), MarkOutcome::Changed);
        assert_eq!(state.cell_at(2, 2), Some(CellView::Flagged));
        assert_eq!(state.mines_left(), 0);
        assert_eq!(state.reveal(2, 2, Some(6)).unwrap().outcome, RevealOutcome::NoChange);

        state.toggle_flag(1, 1, None);
        assert_eq!(state.mines_left(), -1);
        assert_eq!(state.flags_count(), 2);

        state.toggle_flag(2, 2, None);
        assert_eq!(state.flags_count(), 1);
        assert_eq!(state.flagged()[8], 0);
        assert_eq!(state.flagged_grid().unwrap()[[1, 1]], 1);
    }

    #[test]
    fn revealed_cells_cannot_be_flagged() {
        let mut state = game(BoardSpec::new(3, 3, 1), &[0]);
        reveal(&mut state, 1, 1, 1);
        let before = state.clone();

        assert_eq!(state.toggle_flag(1, 1, Some(2)), MarkOutcome::NoChange);
        assert_eq!(state, before);
    }

    #[test]
    fn timestamps_are_set_once() {
        let mut state = game(BoardSpec::new(3, 3, 1), &[0]);

        state.toggle_flag(2, 2, None);
        assert_eq!(state.start_ms(), None);
        state.toggle_flag(2, 2, Some(1_000));
        reveal(&mut state, 1, 1, 2_000);
        assert_eq!(state.start_ms(), Some(1_000));
        assert_eq!(state.elapsed_secs(4_500), 3);

        reveal(&mut state, 0, 0, 9_000);
        assert_eq!(state.end_ms(), Some(9_000));
        assert_eq!(state.elapsed_secs(60_000), 8);
    }

    #[test]
    fn elapsed_is_zero_before_start() {
        let state = GameState::new(GameConfig::from_preset(Difficulty::Beginner, "x")).unwrap();
        assert_eq!(state.elapsed_secs(10_000), 0);
    }

    #[test]
    fn failed_generation_leaves_state_untouched() {
        let mut state = GameState::new(GameConfig::new(BoardSpec::new(3, 3, 1), "x")).unwrap();
        let before = state.clone();

        let err = state.reveal_with(&FailingGenerator, 1, 1, Some(5)).unwrap_err();

        assert!(err.is_internal());
        assert_eq!(state, before);
    }

    #[test]
    fn dense_board_reports_cell_safety() {
        let config = GameConfig::new(BoardSpec::new(5, 5, 24), "seed:cell");
        let mut state = GameState::new(config).unwrap();

        let result = state.reveal(2, 2, Some(1)).unwrap();

        assert_eq!(result.safety_mode_used, Some(SafetyMode::Cell));
        assert_eq!(result.outcome, RevealOutcome::Won);
        assert_eq!(state.cell_at(2, 2), Some(CellView::Revealed(8)));
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let state = GameState::new(GameConfig::new(BoardSpec::new(2, 2, 1), "x")).unwrap();

        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["status"], "playing");
        assert_eq!(json["config"]["spec"]["mineCount"], 1);
        assert_eq!(json["revealedCount"], 0);
        assert_eq!(json["firstClickIndex"], serde_json::Value::Null);
        assert_eq!(json["scoring"]["correctStreak"], 0);

        let back: GameState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }

    fn played_json() -> (GameState, serde_json::Value) {
        let mut state = game(BoardSpec::new(3, 3, 1), &[4]);
        state.toggle_flag(1, 1, Some(0));
        assert_eq!(reveal(&mut state, 0, 0, 5), RevealOutcome::Revealed);
        let json = serde_json::to_value(&state).unwrap();
        (state, json)
    }

    #[test]
    fn restores_played_game() {
        let (state, json) = played_json();

        let back: GameState = serde_json::from_value(json).unwrap();

        assert_eq!(back, state);
        assert_eq!(back.revealed_count(), 1);
        assert_eq!(back.flags_count(), 1);
    }

    #[test]
    fn rejects_corrupt_saved_games() {
        let (_, json) = played_json();
        let corruptions: [fn(&mut serde_json::Value); 6] = [
            |json| json["revealed"] = serde_json::json!([]),
            |json| json["board"]["mines"] = serde_json::json!([1, 1]),
            |json| json["board"]["adjacentMineCounts"][0] = serde_json::json!(2),
            |json| json["board"]["spec"]["width"] = serde_json::json!(4),
            |json| json["revealedCount"] = serde_json::json!(9),
            |json| json["firstClickIndex"] = serde_json::json!(42),
        ];

        for corrupt in corruptions {
            let mut tampered = json.clone();
            corrupt(&mut tampered);
            assert!(serde_json::from_value::<GameState>(tampered).is_err());
        }
    }

    #[test]
    fn rejects_flagged_revealed_cell() {
        let (_, mut json) = played_json();
        json["flagged"][0] = serde_json::json!(1);
        json["flagsCount"] = serde_json::json!(2);

        assert!(serde_json::from_value::<GameState>(json).is_err());
    }

    #[test]
    fn rejects_mines_on_ungenerated_game() {
        let state = GameState::new(GameConfig::new(BoardSpec::new(2, 2, 1), "x")).unwrap();
        let mut json = serde_json::to_value(&state).unwrap();
        json["board"]["mines"] = serde_json::json!([1, 0, 0, 0]);
        json["board"]["adjacentMineCounts"] = serde_json::json!([0, 1, 1, 1]);

        assert!(serde_json::from_value::<GameState>(json).is_err());
    }

    #[quickcheck]
    fn generated_mine_hit_reveals_all_mines(
        w: u8,
        h: u8,
        density: u16,
        click: u16,
    ) -> TestResult {
        let width = Coord::from(w % 16) + 2;
        let height = Coord::from(h % 16) + 1;
        let total = (width * height) as u32;
        let spec = BoardSpec::new(width, height, 1 + u32::from(density) % (total - 1));
        let safe_index = usize::from(click) % spec.total_cells();
        let Ok(generated) = generate_board(&spec, "mine-hit", safe_index) else {
            return TestResult::failed();
        };
        let mut state = GameState::from_board(generated.board, "mine-hit");
        let Some(mine) = state.board().mine_indices().next() else {
            return TestResult::failed();
        };

        let (x, y) = state.grid().index_to_xy(mine);
        state.reveal(x, y, Some(0)).unwrap();

        let board = state.board();
        TestResult::from_bool(
            state.status() == GameStatus::Lost
                && (0..spec.total_cells())
                    .filter(|&i| board.is_mine(i))
                    .all(|i| state.revealed()[i] == 1),
        )
    }
}

//! Module for the tile puzzle board and its slide-and-merge rules.
use log::warn;
use rand::{seq::SliceRandom, Rng, RngCore};

// These are all defined as usize since they are used a lot with indexing stuff.

/// Max board size.
pub const MAX_BOARD_SIZE: usize = 16;
/// Min board size.
pub const MIN_BOARD_SIZE: usize = 2;

/// Chance that a freshly spawned tile is a 4 instead of a 2.
pub const FOUR_TILE_CHANCE: f64 = 0.1;

type Result<T> = std::result::Result<T, PuzzleError>;

#[derive(Debug, Clone)]
pub enum PuzzleError {
    InvalidBoardSize,
    NotSquare,
    InvalidTileValue,
}

/// Direction a [`TileBoard`] can be slid in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PuzzleAction {
    Up,
    Down,
    Left,
    Right,
}

impl PuzzleAction {
    pub const VARIANTS: &'static [PuzzleAction] =
        &[Self::Up, Self::Down, Self::Left, Self::Right];
}

/// Result of sliding a board in one direction.
///
/// `changed` is true iff any cell differs from the board the slide started
/// from. `score_delta` is the sum of the values created by merges.
#[derive(Clone, Debug)]
pub struct SlideOutcome {
    pub board: TileBoard,
    pub changed: bool,
    pub score_delta: u32,
}

/// Square grid of tiles. 0 is an empty cell, everything else is a power of
/// two put there by a spawn or a merge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileBoard {
    rows: Vec<Vec<u32>>,
}

impl TileBoard {
    /// Creates an empty board.
    ///
    /// # Errors
    ///
    /// Returns a [`PuzzleError`] if `size` is outside
    /// [`MIN_BOARD_SIZE`]..=[`MAX_BOARD_SIZE`].
    pub fn new(size: usize) -> Result<Self> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(PuzzleError::InvalidBoardSize);
        }
        Ok(Self {
            rows: vec![vec![0; size]; size],
        })
    }

    /// Builds a board from raw rows.
    ///
    /// # Errors
    ///
    /// Returns a [`PuzzleError`] if the grid is not square, its size is out
    /// of range, or a non-empty cell is not a power of two of at least 2.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self> {
        let size = rows.len();
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(PuzzleError::InvalidBoardSize);
        }
        if rows.iter().any(|row| row.len() != size) {
            return Err(PuzzleError::NotSquare);
        }
        if rows
            .iter()
            .flatten()
            .any(|value| *value != 0 && (*value < 2 || !value.is_power_of_two()))
        {
            return Err(PuzzleError::InvalidTileValue);
        }
        Ok(Self { rows })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn get_rows(&self) -> &Vec<Vec<u32>> {
        &self.rows
    }

    #[must_use]
    pub fn max_value(&self) -> u32 {
        self.rows.iter().flatten().copied().max().unwrap_or(0)
    }

    #[must_use]
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut empty = Vec::new();
        for (r, row) in self.rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if *value == 0 {
                    empty.push((r, c));
                }
            }
        }
        empty
    }

    /// Slides every tile toward `action` and merges equal neighbors.
    ///
    /// The board itself is untouched; the caller decides what to do with the
    /// outcome. Each direction is handled by reorienting the grid so the
    /// slide is always a merge to the left, then undoing the reorientation.
    /// A tile created by a merge never merges again in the same slide.
    #[must_use]
    pub fn apply_move(&self, action: &PuzzleAction) -> SlideOutcome {
        let mut canonical = self.canonicalized(action);
        let mut changed = false;
        let mut score_delta = 0;
        for row in &mut canonical {
            let (slid, delta) = Self::slide_row_left(row);
            if slid != *row {
                changed = true;
            }
            score_delta += delta;
            *row = slid;
        }
        SlideOutcome {
            board: Self {
                rows: Self::decanonicalized(canonical, action),
            },
            changed,
            score_delta,
        }
    }

    /// Puts a 2 (or occasionally a 4) on a random empty cell.
    ///
    /// Returns the cell used, or `None` when the board is full.
    pub fn spawn_random_tile(&mut self, rng: &mut dyn RngCore) -> Option<(usize, usize)> {
        let empty = self.empty_cells();
        let Some(&(row, col)) = empty.choose(rng) else {
            warn!("No where left to spawn a tile");
            return None;
        };
        self.rows[row][col] = if rng.gen_bool(FOUR_TILE_CHANCE) { 4 } else { 2 };
        Some((row, col))
    }

    /// True when no slide can change the board: no empty cell and no equal
    /// neighbors anywhere.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        let n = self.size();
        for r in 0..n {
            for c in 0..n {
                if self.rows[r][c] == 0 {
                    return false;
                }
                if c + 1 < n && self.rows[r][c] == self.rows[r][c + 1] {
                    return false;
                }
                if r + 1 < n && self.rows[r][c] == self.rows[r + 1][c] {
                    return false;
                }
            }
        }
        true
    }

    // single left-to-right pass: compact, merge each pair at most once, pad
    fn slide_row_left(row: &[u32]) -> (Vec<u32>, u32) {
        let packed: Vec<u32> = row.iter().copied().filter(|value| *value != 0).collect();
        let mut slid = Vec::with_capacity(row.len());
        let mut delta = 0;
        let mut i = 0;
        while i < packed.len() {
            if i + 1 < packed.len() && packed[i] == packed[i + 1] {
                let merged = packed[i] * 2;
                slid.push(merged);
                delta += merged;
                i += 2;
            } else {
                slid.push(packed[i]);
                i += 1;
            }
        }
        slid.resize(row.len(), 0);
        (slid, delta)
    }

    fn canonicalized(&self, action: &PuzzleAction) -> Vec<Vec<u32>> {
        match action {
            PuzzleAction::Left => self.rows.clone(),
            PuzzleAction::Right => Self::reversed_rows(self.rows.clone()),
            PuzzleAction::Up => Self::transposed(&self.rows),
            PuzzleAction::Down => Self::reversed_rows(Self::transposed(&self.rows)),
        }
    }

    fn decanonicalized(rows: Vec<Vec<u32>>, action: &PuzzleAction) -> Vec<Vec<u32>> {
        match action {
            PuzzleAction::Left => rows,
            PuzzleAction::Right => Self::reversed_rows(rows),
            PuzzleAction::Up => Self::transposed(&rows),
            PuzzleAction::Down => Self::transposed(&Self::reversed_rows(rows)),
        }
    }

    fn transposed(rows: &[Vec<u32>]) -> Vec<Vec<u32>> {
        (0..rows.len())
            .map(|c| rows.iter().map(|row| row[c]).collect())
            .collect()
    }

    fn reversed_rows(mut rows: Vec<Vec<u32>>) -> Vec<Vec<u32>> {
        for row in &mut rows {
            row.reverse();
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn tile_sum(board: &TileBoard) -> u32 {
        board.get_rows().iter().flatten().sum()
    }

    #[test]
    fn unchanged_slide_returns_identical_board() {
        let board = TileBoard::from_rows(vec![
            vec![2, 0, 0, 0],
            vec![4, 0, 0, 0],
            vec![8, 0, 0, 0],
            vec![0, 0, 0, 0],
        ])
        .unwrap();
        let outcome = board.apply_move(&PuzzleAction::Left);
        assert!(!outcome.changed);
        assert_eq!(outcome.board, board);
        assert_eq!(outcome.score_delta, 0);
    }

    #[test]
    fn triple_merges_only_the_first_pair() {
        let board = TileBoard::from_rows(vec![
            vec![2, 2, 2, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ])
        .unwrap();
        let outcome = board.apply_move(&PuzzleAction::Left);
        assert!(outcome.changed);
        assert_eq!(outcome.board.get_rows()[0], vec![4, 2, 0, 0]);
        assert_eq!(outcome.score_delta, 4);
    }

    #[test]
    fn merged_tile_does_not_merge_again_in_same_slide() {
        let board = TileBoard::from_rows(vec![
            vec![2, 2, 4, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ])
        .unwrap();
        let outcome = board.apply_move(&PuzzleAction::Left);
        // the freshly made 4 stays next to the old 4
        assert_eq!(outcome.board.get_rows()[0], vec![4, 4, 0, 0]);
        assert_eq!(outcome.score_delta, 4);
    }

    #[test]
    fn sliding_conserves_tile_sum_and_delta_is_even() {
        let board = TileBoard::from_rows(vec![
            vec![2, 2, 4, 8],
            vec![0, 4, 4, 0],
            vec![16, 0, 16, 2],
            vec![2, 0, 0, 2],
        ])
        .unwrap();
        for action in PuzzleAction::VARIANTS {
            let outcome = board.apply_move(action);
            assert_eq!(tile_sum(&outcome.board), tile_sum(&board));
            assert_eq!(outcome.score_delta % 2, 0);
        }
    }

    #[test]
    fn every_direction_reorients_correctly() {
        let board = TileBoard::from_rows(vec![
            vec![2, 0, 0, 2],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![2, 0, 0, 2],
        ])
        .unwrap();
        let right = board.apply_move(&PuzzleAction::Right);
        assert_eq!(right.board.get_rows()[0], vec![0, 0, 0, 4]);
        assert_eq!(right.board.get_rows()[3], vec![0, 0, 0, 4]);
        let down = board.apply_move(&PuzzleAction::Down);
        assert_eq!(down.board.get_rows()[3], vec![4, 0, 0, 4]);
        let up = board.apply_move(&PuzzleAction::Up);
        assert_eq!(up.board.get_rows()[0], vec![4, 0, 0, 4]);
    }

    #[test]
    fn game_over_needs_full_board_and_no_equal_neighbors() {
        let stuck = TileBoard::from_rows(vec![
            vec![2, 4, 2, 4],
            vec![4, 2, 4, 2],
            vec![2, 4, 2, 4],
            vec![4, 2, 4, 2],
        ])
        .unwrap();
        assert!(stuck.is_game_over());
        let mergeable = TileBoard::from_rows(vec![
            vec![2, 2, 2, 4],
            vec![4, 2, 4, 2],
            vec![2, 4, 2, 4],
            vec![4, 2, 4, 2],
        ])
        .unwrap();
        assert!(!mergeable.is_game_over());
        let open = TileBoard::new(4).unwrap();
        assert!(!open.is_game_over());
    }

    #[test]
    fn invalid_boards_are_rejected() {
        assert!(matches!(
            TileBoard::from_rows(vec![vec![2]]),
            Err(PuzzleError::InvalidBoardSize)
        ));
        assert!(matches!(
            TileBoard::from_rows(vec![vec![2, 2], vec![2, 2, 2]]),
            Err(PuzzleError::NotSquare)
        ));
        assert!(matches!(
            TileBoard::from_rows(vec![vec![3, 0], vec![0, 0]]),
            Err(PuzzleError::InvalidTileValue)
        ));
        assert!(matches!(
            TileBoard::from_rows(vec![vec![1, 0], vec![0, 0]]),
            Err(PuzzleError::InvalidTileValue)
        ));
    }

    #[test]
    fn spawned_tiles_land_on_empty_cells() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut board = TileBoard::from_rows(vec![
            vec![2, 4, 2, 4],
            vec![4, 2, 4, 2],
            vec![2, 4, 2, 0],
            vec![4, 2, 4, 2],
        ])
        .unwrap();
        let spawned = board.spawn_random_tile(&mut rng).unwrap();
        assert_eq!(spawned, (2, 3));
        let value = board.get_rows()[2][3];
        assert!(value == 2 || value == 4);
        assert!(board.spawn_random_tile(&mut rng).is_none());
    }
}

//! Module for the authoritative tile puzzle state.
use log::{debug, info};
use rand::RngCore;

use super::puzzle_board::{PuzzleAction, PuzzleError, TileBoard};

/// Amount of time between autoplay moves.
pub const AUTOPLAY_DELAY_MILLIS: u64 = 200;

/// Number of tiles a fresh game starts with.
pub const STARTING_TILES: usize = 2;

type Result<T> = std::result::Result<T, PuzzleError>;

/// The live tile puzzle: the board everyone else only ever sees copies of.
///
/// Planners simulate on clones; this is the one place a chosen move actually
/// lands, a tile spawns, and the score moves.
#[derive(Clone, Debug)]
pub struct TilePuzzleGame {
    board: TileBoard,
    score: u32,
    over: bool,
}

impl TilePuzzleGame {
    /// Creates a new game with two spawned tiles.
    ///
    /// # Errors
    ///
    /// Returns a [`PuzzleError`] if the board size is invalid.
    pub fn new(size: usize, rng: &mut dyn RngCore) -> Result<Self> {
        let mut game = Self {
            board: TileBoard::new(size)?,
            score: 0,
            over: false,
        };
        for _ in 0..STARTING_TILES {
            game.board.spawn_random_tile(rng);
        }
        Ok(game)
    }

    /// Starts a game from an existing board with a zero score. Mostly useful
    /// for setting up known positions.
    #[must_use]
    pub fn from_board(board: TileBoard) -> Self {
        let over = board.is_game_over();
        Self {
            board,
            score: 0,
            over,
        }
    }

    /// Applies a move to the live board.
    ///
    /// Returns true if the move changed anything. On a change a new tile is
    /// spawned, the score grows by the merged values, and the game-over
    /// state is refreshed.
    pub fn handle_move(&mut self, action: &PuzzleAction, rng: &mut dyn RngCore) -> bool {
        if self.over {
            debug!("Tried to move {action:?} after the game ended");
            return false;
        }
        let outcome = self.board.apply_move(action);
        if !outcome.changed {
            return false;
        }
        self.score += outcome.score_delta;
        self.board = outcome.board;
        self.board.spawn_random_tile(rng);
        if self.board.is_game_over() {
            info!("No slides left. Final score: {}", self.score);
            self.over = true;
        }
        true
    }

    #[must_use]
    pub fn get_board(&self) -> &TileBoard {
        &self.board
    }

    #[must_use]
    pub fn get_score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.over
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn new_game_starts_with_two_small_tiles() {
        let mut rng = StdRng::seed_from_u64(3);
        let game = TilePuzzleGame::new(4, &mut rng).unwrap();
        let tiles: Vec<u32> = game
            .get_board()
            .get_rows()
            .iter()
            .flatten()
            .copied()
            .filter(|value| *value != 0)
            .collect();
        assert_eq!(tiles.len(), STARTING_TILES);
        assert!(tiles.iter().all(|value| *value == 2 || *value == 4));
        assert!(!game.is_over());
        assert_eq!(game.get_score(), 0);
    }

    #[test]
    fn rejected_move_leaves_the_game_alone() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut game = TilePuzzleGame::from_board(
            TileBoard::from_rows(vec![
                vec![2, 0, 0, 0],
                vec![4, 0, 0, 0],
                vec![8, 0, 0, 0],
                vec![16, 0, 0, 0],
            ])
            .unwrap(),
        );
        let before = game.get_board().clone();
        assert!(!game.handle_move(&PuzzleAction::Left, &mut rng));
        assert_eq!(*game.get_board(), before);
        assert_eq!(game.get_score(), 0);
    }

    #[test]
    fn merge_scores_and_spawns_one_tile() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut game = TilePuzzleGame::from_board(
            TileBoard::from_rows(vec![
                vec![2, 2, 0, 0],
                vec![0, 0, 0, 0],
                vec![0, 0, 0, 0],
                vec![0, 0, 0, 0],
            ])
            .unwrap(),
        );
        assert!(game.handle_move(&PuzzleAction::Left, &mut rng));
        assert_eq!(game.get_score(), 4);
        let tiles = game
            .get_board()
            .get_rows()
            .iter()
            .flatten()
            .filter(|value| **value != 0)
            .count();
        // the merged 4 plus the spawn
        assert_eq!(tiles, 2);
        assert!(!game.is_over());
    }

    #[test]
    fn game_over_is_detected_after_a_filling_move() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut game = TilePuzzleGame::from_board(
            TileBoard::from_rows(vec![
                vec![0, 4, 2, 4],
                vec![4, 2, 4, 2],
                vec![2, 4, 2, 4],
                vec![4, 2, 4, 2],
            ])
            .unwrap(),
        );
        // the only open cell is (0, 0); sliding the top row left fills the
        // board again with the spawn landing in the freed gap
        assert!(game.handle_move(&PuzzleAction::Left, &mut rng));
        assert!(game.get_board().empty_cells().is_empty());
    }
}

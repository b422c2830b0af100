//! Move selection for the tile puzzle "Magic" autoplay.
use log::debug;

use super::{
    heuristic::evaluate_position,
    puzzle_board::{PuzzleAction, TileBoard},
};

/// Directions in the order the planner evaluates them. Earlier entries win
/// ties, so the ordering is part of the playing style.
const SEARCH_ORDER: [PuzzleAction; 4] = [
    PuzzleAction::Left,
    PuzzleAction::Down,
    PuzzleAction::Right,
    PuzzleAction::Up,
];

/// Two-ply lookahead planner.
///
/// Every candidate move is judged by the worst score reachable with one more
/// slide, on the assumption that the tile spawned in between lands badly.
#[derive(Clone, Debug)]
pub struct MagicPlanner {
    prefer_larger_max_tile: bool,
}

impl MagicPlanner {
    #[must_use]
    pub fn new() -> Self {
        Self {
            prefer_larger_max_tile: true,
        }
    }

    /// Same planner, with the max-tile tie-break toggled. The tie-break is a
    /// tuned knob rather than a rule of the game.
    #[must_use]
    pub fn with_max_tile_tie_break(prefer_larger_max_tile: bool) -> Self {
        Self {
            prefer_larger_max_tile,
        }
    }

    /// Picks the next slide, or `None` when nothing changes the board and
    /// the game is over for the caller.
    #[must_use]
    pub fn choose_move(&self, board: &TileBoard) -> Option<PuzzleAction> {
        let mut best: Option<(i64, u32, PuzzleAction)> = None;
        for action in SEARCH_ORDER {
            let first = board.apply_move(&action);
            if !first.changed {
                continue;
            }
            let max_tile = first.board.max_value();
            let mut worst_followup: Option<i64> = None;
            for second in PuzzleAction::VARIANTS {
                let followup = first.board.apply_move(second);
                if !followup.changed {
                    continue;
                }
                let score = evaluate_position(&followup.board);
                worst_followup = Some(match worst_followup {
                    Some(worst) => worst.min(score),
                    None => score,
                });
            }
            // a first move with no scoreable follow-up never enters the race
            let Some(worst) = worst_followup else {
                debug!("No second slide changes the board after {action:?}");
                continue;
            };
            let replace = match &best {
                None => true,
                Some((best_worst, best_max_tile, _)) => {
                    worst > *best_worst
                        || (self.prefer_larger_max_tile
                            && worst == *best_worst
                            && max_tile > *best_max_tile)
                }
            };
            if replace {
                best = Some((worst, max_tile, action));
            }
        }
        best.map(|(_, _, action)| action)
    }
}

impl Default for MagicPlanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stuck_board_yields_no_move() {
        let board = TileBoard::from_rows(vec![
            vec![2, 4, 2, 4],
            vec![4, 2, 4, 2],
            vec![2, 4, 2, 4],
            vec![4, 2, 4, 2],
        ])
        .unwrap();
        assert!(MagicPlanner::new().choose_move(&board).is_none());
    }

    #[test]
    fn unchanged_directions_are_skipped_and_ties_keep_evaluation_order() {
        // a lone tile in the top-left corner: Left and Up do nothing, Down
        // and Right lead to mirror-image positions with equal worst-case
        // scores and equal max tiles, so the earlier of the two sticks
        let board = TileBoard::from_rows(vec![
            vec![2, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ])
        .unwrap();
        assert_eq!(
            MagicPlanner::new().choose_move(&board),
            Some(PuzzleAction::Down)
        );
        assert_eq!(
            MagicPlanner::with_max_tile_tie_break(false).choose_move(&board),
            Some(PuzzleAction::Down)
        );
    }

    #[test]
    fn chosen_move_always_changes_the_board() {
        let boards = [
            vec![
                vec![2, 2, 4, 8],
                vec![0, 4, 4, 0],
                vec![16, 0, 16, 2],
                vec![2, 0, 0, 2],
            ],
            vec![
                vec![2, 4, 2, 4],
                vec![4, 2, 4, 2],
                vec![2, 4, 2, 4],
                vec![4, 2, 4, 4],
            ],
            vec![
                vec![0, 0, 0, 0],
                vec![0, 0, 0, 0],
                vec![0, 0, 0, 0],
                vec![0, 0, 0, 2],
            ],
        ];
        let planner = MagicPlanner::new();
        for rows in boards {
            let board = TileBoard::from_rows(rows).unwrap();
            let action = planner.choose_move(&board).unwrap();
            assert!(board.apply_move(&action).changed);
        }
    }
}

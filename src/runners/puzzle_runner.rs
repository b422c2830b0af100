use std::{sync::mpsc::Receiver, time::Duration};

use log::{debug, info, warn};
use rand::rngs::StdRng;

use crate::{
    autoplay::AutoplayController,
    models::tile_puzzle::{magic_planner::MagicPlanner, puzzle_game::TilePuzzleGame},
};

use super::{RunnerMessage, SessionConfig, SessionSummary};

/// Drives one tile puzzle autoplay session until the board locks up, the
/// move cap is reached, or a [`RunnerMessage::Stop`] arrives.
pub async fn run_puzzle_session(
    mut game: TilePuzzleGame,
    planner: MagicPlanner,
    control: Receiver<RunnerMessage>,
    config: SessionConfig,
    mut rng: StdRng,
) -> SessionSummary {
    let mut controller = AutoplayController::new();
    let mut moves = 0;
    let mut finished = false;
    while controller.is_active() {
        if matches!(control.try_recv(), Ok(RunnerMessage::Stop)) {
            debug!("Puzzle session told to stop after {moves} moves");
            controller.stop();
            break;
        }
        if moves >= config.max_moves {
            info!("Puzzle session hit the cap of {} moves", config.max_moves);
            break;
        }
        let Some(action) = planner.choose_move(game.get_board()) else {
            info!(
                "No slide changes the board after {moves} moves, final score {}",
                game.get_score()
            );
            finished = true;
            controller.stop();
            break;
        };
        debug!("Puzzle session move {moves}: {action:?}");
        if game.handle_move(&action, &mut rng) {
            moves += 1;
        } else {
            // the planner only returns moves it saw change the board
            warn!("Planner picked {action:?} but the board did not change");
            controller.stop();
            break;
        }
        if game.is_over() {
            info!(
                "Puzzle session over after {moves} moves with score {}",
                game.get_score()
            );
            finished = true;
            controller.stop();
            break;
        }
        if config.tick_millis > 0 {
            tokio::time::sleep(Duration::from_millis(config.tick_millis)).await;
        }
    }
    SessionSummary {
        moves,
        score: game.get_score(),
        finished,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[tokio::test]
    async fn session_plays_a_whole_game() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut rng = StdRng::seed_from_u64(42);
        let game = TilePuzzleGame::new(4, &mut rng).unwrap();
        let (_stop, control) = mpsc::channel();
        let summary = run_puzzle_session(
            game,
            MagicPlanner::new(),
            control,
            SessionConfig {
                tick_millis: 0,
                max_moves: 100_000,
            },
            rng,
        )
        .await;
        // filling a 4x4 board from two starting tiles takes at least 14
        // spawns, so a finished game cannot be shorter than that
        assert!(summary.moves >= 14 || !summary.finished);
        assert!(summary.finished || summary.moves == 100_000);
    }

    #[tokio::test]
    async fn move_cap_is_honored() {
        let mut rng = StdRng::seed_from_u64(42);
        let game = TilePuzzleGame::new(4, &mut rng).unwrap();
        let (_stop, control) = mpsc::channel();
        let summary = run_puzzle_session(
            game,
            MagicPlanner::new(),
            control,
            SessionConfig {
                tick_millis: 0,
                max_moves: 5,
            },
            rng,
        )
        .await;
        assert_eq!(summary.moves, 5);
        assert!(!summary.finished);
    }
}

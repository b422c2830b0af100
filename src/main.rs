use std::{sync::mpsc, time::Duration};

use log::{debug, error, info};
use rand::{rngs::StdRng, SeedableRng};
use rustgridbots::{
    models::{
        snake::{
            snake_bot::SnakeBotType,
            snake_game::{SnakeGame, MILLIS_BETWEEN_FRAMES},
        },
        tile_puzzle::{
            magic_planner::MagicPlanner,
            puzzle_game::{TilePuzzleGame, AUTOPLAY_DELAY_MILLIS},
        },
    },
    runners::{
        puzzle_runner::run_puzzle_session, snake_runner::run_snake_session, RunnerMessage,
        SessionConfig,
    },
};

#[tokio::main]
async fn main() {
    std::env::set_var("RUST_LOG", "rustgridbots=debug");
    env_logger::init();
    debug!("Debug on");

    let mut rng = StdRng::from_entropy();
    let puzzle_game = match TilePuzzleGame::new(4, &mut rng) {
        Ok(game) => game,
        Err(e) => {
            error!("Could not set up the tile puzzle: {:#?}", e);
            return;
        }
    };
    let snake_game = match SnakeGame::new(20, 20, &mut rng) {
        Ok(game) => game,
        Err(e) => {
            error!("Could not set up the snake game: {:#?}", e);
            return;
        }
    };

    let (puzzle_stop, puzzle_control) = mpsc::channel();
    let (snake_stop, snake_control) = mpsc::channel();

    let puzzle_handle = tokio::spawn(run_puzzle_session(
        puzzle_game,
        MagicPlanner::new(),
        puzzle_control,
        SessionConfig {
            tick_millis: AUTOPLAY_DELAY_MILLIS / 20,
            max_moves: 5000,
        },
        StdRng::from_entropy(),
    ));
    let snake_handle = tokio::spawn(run_snake_session(
        snake_game,
        SnakeBotType::MagicBot,
        snake_control,
        SessionConfig {
            tick_millis: MILLIS_BETWEEN_FRAMES / 20,
            max_moves: 2000,
        },
        StdRng::from_entropy(),
    ));

    // both sessions end on their own; the watchdog shows how an owner would
    // cancel them early through the control channels
    let watchdog = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(120)).await;
        let _ = puzzle_stop.send(RunnerMessage::Stop);
        let _ = snake_stop.send(RunnerMessage::Stop);
    });

    match puzzle_handle.await {
        Ok(summary) => info!("Puzzle session done: {:#?}", summary),
        Err(e) => error!("Puzzle session task failed: {:#?}", e),
    }
    match snake_handle.await {
        Ok(summary) => info!("Snake session done: {:#?}", summary),
        Err(e) => error!("Snake session task failed: {:#?}", e),
    }
    watchdog.abort();
}

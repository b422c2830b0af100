use std::{sync::mpsc::Receiver, time::Duration};

use log::{debug, info};
use rand::rngs::StdRng;

use crate::{
    autoplay::AutoplayController,
    models::snake::{snake_bot::SnakeBotType, snake_game::SnakeGame},
};

use super::{RunnerMessage, SessionConfig, SessionSummary};

/// Drives one snake autoplay session until the snake dies, the bot gives
/// up, the move cap is reached, or a [`RunnerMessage::Stop`] arrives.
///
/// One iteration is plan, apply, log, sleep, with the controller and the
/// control channel checked before each of them.
pub async fn run_snake_session(
    mut game: SnakeGame,
    bot_type: SnakeBotType,
    control: Receiver<RunnerMessage>,
    config: SessionConfig,
    mut rng: StdRng,
) -> SessionSummary {
    debug!("New snake session using {bot_type}");
    let bot = bot_type.make_new_bot();
    let mut controller = AutoplayController::new();
    let mut moves = 0;
    let mut finished = false;
    while controller.is_active() {
        if matches!(control.try_recv(), Ok(RunnerMessage::Stop)) {
            debug!("Snake session told to stop after {moves} moves");
            controller.stop();
            break;
        }
        if moves >= config.max_moves {
            info!("Snake session hit the cap of {} moves", config.max_moves);
            break;
        }
        let Some(action) = bot.make_move(&game, &mut rng) else {
            info!("No direction left for the snake after {moves} moves");
            finished = true;
            controller.stop();
            break;
        };
        debug!("Snake session move {moves}: {action:?}");
        if game.tick(Some(action), &mut rng) {
            moves += 1;
        } else {
            info!(
                "Snake session over after {moves} moves with score {}",
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
    async fn session_runs_until_something_ends_it() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut rng = StdRng::seed_from_u64(7);
        let game = SnakeGame::new(12, 12, &mut rng).unwrap();
        let (_stop, control) = mpsc::channel();
        let summary = run_snake_session(
            game,
            SnakeBotType::MagicBot,
            control,
            SessionConfig {
                tick_millis: 0,
                max_moves: 300,
            },
            rng,
        )
        .await;
        assert!(summary.moves >= 1);
        assert!(summary.moves <= 300);
    }

    #[tokio::test]
    async fn stop_message_ends_the_session_before_any_move() {
        let mut rng = StdRng::seed_from_u64(7);
        let game = SnakeGame::new(12, 12, &mut rng).unwrap();
        let (stop, control) = mpsc::channel();
        stop.send(RunnerMessage::Stop).unwrap();
        let summary = run_snake_session(
            game,
            SnakeBotType::RandomMoveBot,
            control,
            SessionConfig {
                tick_millis: 0,
                max_moves: 300,
            },
            rng,
        )
        .await;
        assert_eq!(summary.moves, 0);
        assert!(!summary.finished);
    }
}

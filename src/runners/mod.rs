//! Headless loops that drive the autoplay bots against live game state.
pub mod puzzle_runner;
pub mod snake_runner;

/// Control messages an outside owner can send into a running session.
#[derive(Clone, Debug)]
pub enum RunnerMessage {
    Stop,
}

/// How a session should pace itself and when to give up.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub tick_millis: u64,
    pub max_moves: usize,
}

/// What a finished session looked like. `finished` is true when the game
/// itself ended, false when the session was stopped or hit the move cap.
#[derive(Clone, Debug)]
pub struct SessionSummary {
    pub moves: usize,
    pub score: u32,
    pub finished: bool,
}

use rand::{seq::SliceRandom, RngCore};

use crate::models::snake::{
    snake_bot::SnakeBot,
    snake_game::{SnakeAction, SnakeGame},
};

/// Wanders into any neighbor that does not kill it on the spot.
#[derive(Debug)]
pub struct RandomBot;

impl RandomBot {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for RandomBot {
    fn default() -> Self {
        Self::new()
    }
}

impl SnakeBot for RandomBot {
    fn make_move(&self, game: &SnakeGame, rng: &mut dyn RngCore) -> Option<SnakeAction> {
        let mut candidates = self.open_neighbors(game);
        candidates.shuffle(rng);
        candidates.into_iter().next().map(|(action, _)| action)
    }
}

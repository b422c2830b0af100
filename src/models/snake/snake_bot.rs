use rand::RngCore;

use super::{
    bots::{magic_snake_bot::MagicBot, random_snake_bot::RandomBot},
    snake_game::{SnakeAction, SnakeGame},
};

pub trait SnakeBot {
    /// Picks the next direction, or `None` when every reachable neighbor of
    /// the head is lethal and the snake cannot avoid dying next frame.
    fn make_move(&self, game: &SnakeGame, rng: &mut dyn RngCore) -> Option<SnakeAction>;

    /// The neighbors of the head the snake could enter this frame, paired
    /// with the direction that reaches them.
    fn open_neighbors(&self, game: &SnakeGame) -> Vec<(SnakeAction, (usize, usize))> {
        let Some(head) = game.get_head() else {
            return Vec::new();
        };
        let mut neighbors = Vec::with_capacity(SnakeAction::VARIANTS.len());
        for action in SnakeAction::VARIANTS {
            if let Some(cell) = game.step_from(head, action) {
                if !game.cell_blocks_movement(cell) {
                    neighbors.push((action.clone(), cell));
                }
            }
        }
        neighbors
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnakeBotType {
    RandomMoveBot,
    MagicBot,
}

// this solution doesn't scale well but the number of bot types will be small so it works
impl SnakeBotType {
    pub const VALUES: [Self; 2] = [Self::RandomMoveBot, Self::MagicBot];

    #[must_use]
    pub fn make_new_bot(&self) -> Box<dyn SnakeBot + Send> {
        match self {
            SnakeBotType::RandomMoveBot => Box::new(RandomBot::new()),
            SnakeBotType::MagicBot => Box::new(MagicBot::new()),
        }
    }
}

impl std::fmt::Display for SnakeBotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnakeBotType::RandomMoveBot => write!(f, "Randomly Moving Bot"),
            SnakeBotType::MagicBot => write!(f, "Magic Autoplay Bot"),
        }
    }
}

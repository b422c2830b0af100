//! Module for the snake game state and its movement rules.
use std::collections::{HashSet, VecDeque};

use log::{debug, info, warn};
use rand::{seq::SliceRandom, RngCore};

/// Amount of time before the snake is forced to move.
pub const MILLIS_BETWEEN_FRAMES: u64 = 300;

// These are all defined as usize since they are used a lot with indexing stuff.

/// Max board dimension.
pub const MAX_BOARD_SIZE: usize = 40;
/// Min board dimension.
pub const MIN_BOARD_SIZE: usize = 10;

/// Points for eating one piece of food.
pub const FOOD_SCORE: u32 = 10;

type Result<T> = std::result::Result<T, SnakeError>;

#[derive(Debug, Clone)]
pub enum SnakeError {
    InvalidBoardSize,
    EmptyBody,
    OutOfBoundsCell,
    DuplicateBodyCell,
    DisconnectedBody,
    FoodOnBody,
}

/// Direction the snake can move in, as (row, col) deltas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnakeAction {
    Up,
    Down,
    Left,
    Right,
}

impl SnakeAction {
    pub const VARIANTS: &'static [SnakeAction] = &[Self::Up, Self::Down, Self::Left, Self::Right];

    #[must_use]
    pub fn value(&self) -> (i8, i8) {
        match self {
            SnakeAction::Up => (-1, 0),
            SnakeAction::Down => (1, 0),
            SnakeAction::Left => (0, -1),
            SnakeAction::Right => (0, 1),
        }
    }

    #[must_use]
    pub fn get_opposite(&self) -> SnakeAction {
        match self {
            SnakeAction::Up => SnakeAction::Down,
            SnakeAction::Down => SnakeAction::Up,
            SnakeAction::Left => SnakeAction::Right,
            SnakeAction::Right => SnakeAction::Left,
        }
    }

    #[must_use]
    pub fn get_random_action(rng: &mut dyn RngCore) -> SnakeAction {
        SnakeAction::VARIANTS
            .choose(rng)
            .cloned()
            .unwrap_or(SnakeAction::Right)
    }
}

/// Model of the snake game: one snake, one piece of food, walls all around.
#[derive(Clone, Debug)]
pub struct SnakeGame {
    body: VecDeque<(usize, usize)>,
    food: (usize, usize),
    width: usize,
    height: usize,
    direction: SnakeAction,
    growing: bool,
    score: u32,
    alive: bool,
}

impl SnakeGame {
    /// Creates a new game with a one-segment snake in the middle of the
    /// board and food placed somewhere else.
    ///
    /// # Errors
    ///
    /// Returns a [`SnakeError`] if either dimension is outside
    /// [`MIN_BOARD_SIZE`]..=[`MAX_BOARD_SIZE`].
    pub fn new(width: usize, height: usize, rng: &mut dyn RngCore) -> Result<Self> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&width)
            || !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&height)
        {
            return Err(SnakeError::InvalidBoardSize);
        }
        let mut body = VecDeque::new();
        body.push_front((height / 2, width / 2));
        let mut game = Self {
            body,
            food: (0, 0),
            width,
            height,
            direction: SnakeAction::Right,
            growing: false,
            score: 0,
            alive: true,
        };
        game.place_food(rng);
        Ok(game)
    }

    /// Builds a game from an explicit body and food cell, head first.
    ///
    /// # Errors
    ///
    /// Returns a [`SnakeError`] if the dimensions are out of range, the body
    /// is empty, leaves the board, repeats a cell, or has consecutive cells
    /// that are not grid neighbors, or if the food sits on the body.
    pub fn from_parts(
        body: Vec<(usize, usize)>,
        food: (usize, usize),
        width: usize,
        height: usize,
        growing: bool,
    ) -> Result<Self> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&width)
            || !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&height)
        {
            return Err(SnakeError::InvalidBoardSize);
        }
        if body.is_empty() {
            return Err(SnakeError::EmptyBody);
        }
        if body
            .iter()
            .chain(std::iter::once(&food))
            .any(|&(r, c)| r >= height || c >= width)
        {
            return Err(SnakeError::OutOfBoundsCell);
        }
        let unique: HashSet<&(usize, usize)> = body.iter().collect();
        if unique.len() != body.len() {
            return Err(SnakeError::DuplicateBodyCell);
        }
        if body
            .windows(2)
            .any(|pair| pair[0].0.abs_diff(pair[1].0) + pair[0].1.abs_diff(pair[1].1) != 1)
        {
            return Err(SnakeError::DisconnectedBody);
        }
        if body.contains(&food) {
            return Err(SnakeError::FoodOnBody);
        }
        let direction = Self::derive_direction(&body);
        Ok(Self {
            body: body.into(),
            food,
            width,
            height,
            direction,
            growing,
            score: 0,
            alive: true,
        })
    }

    // the head moved away from the second segment, so that gap is the
    // current heading; a one-segment snake defaults to Right
    fn derive_direction(body: &[(usize, usize)]) -> SnakeAction {
        if body.len() < 2 {
            return SnakeAction::Right;
        }
        let (head, neck) = (body[0], body[1]);
        if head.0 + 1 == neck.0 {
            SnakeAction::Up
        } else if neck.0 + 1 == head.0 {
            SnakeAction::Down
        } else if head.1 + 1 == neck.1 {
            SnakeAction::Left
        } else {
            SnakeAction::Right
        }
    }

    /// Advances the game one frame.
    ///
    /// `requested` switches the heading before the step; `None` keeps the
    /// current one. Returns true if the snake survived the frame.
    pub fn tick(&mut self, requested: Option<SnakeAction>, rng: &mut dyn RngCore) -> bool {
        if !self.alive {
            debug!("Tried to move a dead snake");
            return false;
        }
        if let Some(action) = requested {
            self.direction = action;
        }
        let Some(head) = self.get_head() else {
            warn!("Snake was alive with an empty body");
            self.alive = false;
            return false;
        };
        let Some(new_head) = self.step_from(head, &self.direction) else {
            info!("Snake hit the wall. Final score: {}", self.score);
            self.alive = false;
            return false;
        };
        self.body.push_front(new_head);
        if self.growing {
            self.growing = false;
        } else {
            self.body.pop_back();
        }
        if new_head == self.food {
            self.growing = true;
            self.score += FOOD_SCORE;
            self.place_food(rng);
        }
        if self.body.iter().skip(1).any(|cell| *cell == new_head) {
            info!("Snake ran into itself. Final score: {}", self.score);
            self.alive = false;
            return false;
        }
        true
    }

    /// The in-bounds neighbor of `cell` one step toward `action`, if any.
    #[must_use]
    pub fn step_from(&self, cell: (usize, usize), action: &SnakeAction) -> Option<(usize, usize)> {
        let (dr, dc) = action.value();
        let row = cell.0.checked_add_signed(isize::from(dr))?;
        let col = cell.1.checked_add_signed(isize::from(dc))?;
        (row < self.height && col < self.width).then_some((row, col))
    }

    /// Whether entering `cell` next frame would hit the body. The tail is
    /// not counted while the snake is not growing, since it vacates on the
    /// same frame the head arrives.
    #[must_use]
    pub fn cell_blocks_movement(&self, cell: (usize, usize)) -> bool {
        let last = self.body.len().saturating_sub(1);
        self.body
            .iter()
            .enumerate()
            .any(|(i, segment)| *segment == cell && (self.growing || i != last))
    }

    /// Whether `cell` is currently covered by any body segment.
    #[must_use]
    pub fn cell_on_body(&self, cell: (usize, usize)) -> bool {
        self.body.contains(&cell)
    }

    fn place_food(&mut self, rng: &mut dyn RngCore) {
        let mut open = Vec::new();
        for r in 0..self.height {
            for c in 0..self.width {
                if !self.cell_on_body((r, c)) {
                    open.push((r, c));
                }
            }
        }
        match open.choose(rng) {
            Some(cell) => self.food = *cell,
            None => warn!("No where left to place food"),
        }
    }

    #[must_use]
    pub fn get_head(&self) -> Option<(usize, usize)> {
        self.body.front().copied()
    }

    #[must_use]
    pub fn get_body(&self) -> &VecDeque<(usize, usize)> {
        &self.body
    }

    #[must_use]
    pub fn get_food(&self) -> (usize, usize) {
        self.food
    }

    #[must_use]
    pub fn get_width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn get_height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn get_score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn get_direction(&self) -> SnakeAction {
        self.direction.clone()
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[must_use]
    pub fn is_growing(&self) -> bool {
        self.growing
    }
}

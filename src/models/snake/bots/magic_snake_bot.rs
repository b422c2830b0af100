use std::{
    cmp::Reverse,
    collections::{BinaryHeap, VecDeque},
};

use log::debug;
use rand::{Rng, RngCore};

use crate::models::snake::{
    snake_bot::SnakeBot,
    snake_game::{SnakeAction, SnakeGame},
};

/// Hard ceiling on nodes the shortest-path search may expand in one call.
/// Running out is not an error, the bot just falls back to heuristics.
pub const SEARCH_NODE_BUDGET: usize = 200;

/// Default chance that a direct step toward the food is taken without
/// bothering to search. A tuned knob, not a rule of the game.
pub const DEFAULT_GREEDY_ACCEPT_CHANCE: f64 = 0.8;

const SPACE_WEIGHT: i64 = 2;
const DANGER_WEIGHT: i64 = 3;

/// Autoplay bot combining pathfinding with space keeping.
///
/// Each frame it tries, in order: grabbing food one step away, stepping
/// straight toward the food, a bounded shortest-path search, and finally
/// whichever neighbor keeps the most reachable room at the least danger.
#[derive(Clone, Debug)]
pub struct MagicBot {
    greedy_accept_chance: f64,
}

impl MagicBot {
    #[must_use]
    pub fn new() -> Self {
        Self {
            greedy_accept_chance: DEFAULT_GREEDY_ACCEPT_CHANCE,
        }
    }

    /// Same bot with a different greedy acceptance chance, clamped into
    /// 0.0..=1.0 so it stays a valid probability.
    #[must_use]
    pub fn with_greedy_accept_chance(chance: f64) -> Self {
        Self {
            greedy_accept_chance: chance.clamp(0.0, 1.0),
        }
    }

    fn plan(&self, game: &SnakeGame, rng: &mut dyn RngCore) -> Option<SnakeAction> {
        let head = game.get_head()?;
        let candidates = self.open_neighbors(game);
        if candidates.is_empty() {
            debug!("Boxed in, every neighbor of the head is lethal");
            return None;
        }
        let food = game.get_food();

        // 1) grab the food when it is one step away
        if let Some((action, _)) = candidates.iter().find(|(_, cell)| *cell == food) {
            return Some(action.clone());
        }

        // 2) step straight along an axis that still needs closing
        if let Some((action, _)) = candidates
            .iter()
            .find(|(action, _)| points_toward(action, head, food))
        {
            if rng.gen_bool(self.greedy_accept_chance) {
                return Some(action.clone());
            }
        }

        // 3) search for an actual route to the food
        if let Some(step) = Self::bounded_search(game).0 {
            if let Some((action, _)) = candidates.iter().find(|(_, cell)| *cell == step) {
                return Some(action.clone());
            }
        }

        // 4) keep as much room as possible while staying off walls and body
        let mut best: Option<(i64, &SnakeAction)> = None;
        for (action, cell) in &candidates {
            let space = i64::try_from(Self::reachable_space(game, *cell)).unwrap_or(0);
            let rank = SPACE_WEIGHT * space - DANGER_WEIGHT * Self::danger_score(game, *cell);
            let replace = match best {
                Some((best_rank, _)) => rank > best_rank,
                None => true,
            };
            if replace {
                best = Some((rank, action));
            }
        }
        best.map(|(_, action)| action.clone())
    }

    /// Best-first search from the head to the food, expanding by path cost
    /// plus Manhattan distance and giving up after [`SEARCH_NODE_BUDGET`]
    /// expansions. Returns the first step of the path, if one was found,
    /// and how many nodes were expanded.
    ///
    /// Searches far out of reach are skipped up front: when the food is more
    /// than half the board away the route is rarely worth the work.
    fn bounded_search(game: &SnakeGame) -> (Option<(usize, usize)>, usize) {
        let width = game.get_width();
        let cell_count = width * game.get_height();
        let Some(head) = game.get_head() else {
            return (None, 0);
        };
        let food = game.get_food();
        if manhattan(head, food) > cell_count / 2 {
            return (None, 0);
        }

        // open/closed bookkeeping is keyed by row * width + col
        let index = |cell: (usize, usize)| cell.0 * width + cell.1;
        let mut g_scores = vec![usize::MAX; cell_count];
        let mut came_from: Vec<Option<(usize, usize)>> = vec![None; cell_count];
        let mut closed = vec![false; cell_count];
        let mut open = BinaryHeap::new();
        g_scores[index(head)] = 0;
        open.push(Reverse((manhattan(head, food), head)));

        let mut expanded = 0;
        while let Some(Reverse((_, cell))) = open.pop() {
            let cell_index = index(cell);
            if closed[cell_index] {
                continue;
            }
            if expanded >= SEARCH_NODE_BUDGET {
                debug!("Path search budget spent before reaching the food");
                return (None, expanded);
            }
            closed[cell_index] = true;
            expanded += 1;

            if cell == food {
                let mut step = cell;
                while let Some(previous) = came_from[index(step)] {
                    if previous == head {
                        return (Some(step), expanded);
                    }
                    step = previous;
                }
                return (None, expanded);
            }

            for action in SnakeAction::VARIANTS {
                let Some(next) = game.step_from(cell, action) else {
                    continue;
                };
                let next_index = index(next);
                if closed[next_index] || game.cell_blocks_movement(next) {
                    continue;
                }
                let tentative = g_scores[cell_index] + 1;
                if tentative < g_scores[next_index] {
                    g_scores[next_index] = tentative;
                    came_from[next_index] = Some(cell);
                    open.push(Reverse((tentative + manhattan(next, food), next)));
                }
            }
        }
        (None, expanded)
    }

    /// Flood fill counting the free cells reachable from `start`, fenced by
    /// the walls and the whole body.
    fn reachable_space(game: &SnakeGame, start: (usize, usize)) -> usize {
        let width = game.get_width();
        let mut visited = vec![false; width * game.get_height()];
        let mut queue = VecDeque::from([start]);
        let mut space = 0;
        while let Some(cell) = queue.pop_front() {
            let cell_index = cell.0 * width + cell.1;
            if visited[cell_index] || game.cell_on_body(cell) {
                continue;
            }
            visited[cell_index] = true;
            space += 1;
            for action in SnakeAction::VARIANTS {
                if let Some(next) = game.step_from(cell, action) {
                    if !visited[next.0 * width + next.1] {
                        queue.push_back(next);
                    }
                }
            }
        }
        space
    }

    /// How uncomfortable standing on `cell` would be: near walls, near the
    /// body, and worst of all wedged toward a corner.
    fn danger_score(game: &SnakeGame, cell: (usize, usize)) -> i64 {
        let (row, col) = cell;
        let near_wall_rows = row <= 1 || row + 2 >= game.get_height();
        let near_wall_cols = col <= 1 || col + 2 >= game.get_width();
        let mut score = 0;
        if near_wall_rows {
            score += 2;
        }
        if near_wall_cols {
            score += 2;
        }
        for segment in game.get_body() {
            if manhattan(*segment, cell) < 2 {
                score += 1;
            }
        }
        if near_wall_rows && near_wall_cols {
            score += 3;
        }
        score
    }
}

impl Default for MagicBot {
    fn default() -> Self {
        Self::new()
    }
}

impl SnakeBot for MagicBot {
    fn make_move(&self, game: &SnakeGame, rng: &mut dyn RngCore) -> Option<SnakeAction> {
        self.plan(game, rng)
    }
}

fn points_toward(action: &SnakeAction, head: (usize, usize), food: (usize, usize)) -> bool {
    match action {
        SnakeAction::Up => food.0 < head.0,
        SnakeAction::Down => food.0 > head.0,
        SnakeAction::Left => food.1 < head.1,
        SnakeAction::Right => food.1 > head.1,
    }
}

fn manhattan(a: (usize, usize), b: (usize, usize)) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

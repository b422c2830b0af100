pub mod heuristic;
pub mod magic_planner;
pub mod puzzle_board;
pub mod puzzle_game;

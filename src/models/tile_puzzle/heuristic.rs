//! Position scoring for the tile puzzle autoplay.
use super::puzzle_board::TileBoard;

/// Scores a board, higher is better.
///
/// Five signals, added in order: keeping the biggest tile in a corner,
/// monotonic runs along rows and columns, equal neighbors that could merge,
/// empty cells, and a penalty for small tiles scattered around a big one.
///
/// # Panics
///
/// Panics if casting the empty cell count to i64 fails. This is never
/// expected to happen.
#[must_use]
pub fn evaluate_position(board: &TileBoard) -> i64 {
    let rows = board.get_rows();
    let n = board.size();
    let max_value = i64::from(board.max_value());
    let mut score = 0;

    // 1) biggest tile parked in a corner
    let corners = [(0, 0), (0, n - 1), (n - 1, 0), (n - 1, n - 1)];
    let max_corner_value = corners
        .iter()
        .map(|&(r, c)| i64::from(rows[r][c]))
        .max()
        .unwrap_or(0);
    if max_corner_value == max_value {
        score += max_value * 10;
    }

    // 2) monotonic runs, best direction per row and per column
    for row in rows {
        let mut left_to_right = 0;
        let mut right_to_left = 0;
        for c in 0..n - 1 {
            if row[c] >= row[c + 1] {
                left_to_right += i64::from(row[c]);
            }
            if row[n - 1 - c] >= row[n - 2 - c] {
                right_to_left += i64::from(row[n - 1 - c]);
            }
        }
        score += left_to_right.max(right_to_left) * 2;
    }
    for c in 0..n {
        let mut top_to_bottom = 0;
        let mut bottom_to_top = 0;
        for r in 0..n - 1 {
            if rows[r][c] >= rows[r + 1][c] {
                top_to_bottom += i64::from(rows[r][c]);
            }
            if rows[n - 1 - r][c] >= rows[n - 2 - r][c] {
                bottom_to_top += i64::from(rows[n - 1 - r][c]);
            }
        }
        score += top_to_bottom.max(bottom_to_top) * 2;
    }

    // 3) equal neighbors are a merge waiting to happen
    for row in rows {
        for c in 0..n - 1 {
            if row[c] != 0 && row[c] == row[c + 1] {
                score += i64::from(row[c]) * 4;
            }
        }
    }
    for c in 0..n {
        for r in 0..n - 1 {
            if rows[r][c] != 0 && rows[r][c] == rows[r + 1][c] {
                score += i64::from(rows[r][c]) * 4;
            }
        }
    }

    // 4) room to maneuver, scaled by how far the game has come
    let empty = rows.iter().flatten().filter(|value| **value == 0).count();
    score += i64::try_from(empty).unwrap() * max_value;

    // 5) stray small tiles clog the board
    let threshold = max_value / 8;
    let mut penalty = 0;
    for value in rows.iter().flatten() {
        let value = i64::from(*value);
        if value != 0 && value < threshold {
            penalty += threshold - value;
        }
    }
    score - penalty
}

use crate::error::{PuzzleError, Result};
use crate::node::coordinates;
use std::fmt;
use std::str::FromStr;

/// The distance estimators available to the search.
///
/// Every estimator ignores the blank tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Heuristic {
    /// Sum over all tiles of the horizontal plus vertical distance to the tile's goal cell.
    #[default]
    Manhattan,
    /// Number of tiles not on their goal cell (Hamming distance).
    Misplaced,
    /// Manhattan distance plus two moves for every pair of tiles that sit in their
    /// goal row (or column) but in reversed order.
    LinearConflict,
}

impl Heuristic {
    pub const ALL: [Heuristic; 3] = [
        Heuristic::Manhattan,
        Heuristic::Misplaced,
        Heuristic::LinearConflict,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Heuristic::Manhattan => "manhattan",
            Heuristic::Misplaced => "misplaced",
            Heuristic::LinearConflict => "linear_conflict",
        }
    }
}

impl FromStr for Heuristic {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manhattan" => Ok(Heuristic::Manhattan),
            "misplaced" | "hamming" => Ok(Heuristic::Misplaced),
            "linear_conflict" | "linear" => Ok(Heuristic::LinearConflict),
            _ => Err(PuzzleError::UnknownHeuristic(s.to_string())),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Estimates how far `grid` is from `goal` on a `grid_size` x `grid_size` board.
///
/// The result depends only on the arguments, so a node may cache it for its lifetime.
///
/// # Examples
/// ```
/// use npuzzle_solver::heuristics::{evaluate, Heuristic};
///
/// let goal = [1, 2, 3, 4, 5, 6, 7, 8, 0];
/// let grid = [1, 2, 3, 4, 5, 6, 0, 7, 8];
/// assert_eq!(evaluate(&grid, &goal, 3, Heuristic::Manhattan), 2);
/// assert_eq!(evaluate(&grid, &goal, 3, Heuristic::Misplaced), 2);
/// assert_eq!(evaluate(&goal, &goal, 3, Heuristic::LinearConflict), 0);
/// ```
pub fn evaluate(grid: &[usize], goal: &[usize], grid_size: usize, heuristic: Heuristic) -> u32 {
    match heuristic {
        Heuristic::Manhattan => manhattan_distance(grid, goal, grid_size),
        Heuristic::Misplaced => misplaced_tiles(grid, goal),
        Heuristic::LinearConflict => {
            let conflicts = linear_conflicts(grid, goal, grid_size);
            manhattan_distance(grid, goal, grid_size).saturating_add(conflicts.saturating_mul(2))
        }
    }
}

/// Counts the non-blank tiles that are not on their goal cell.
pub fn misplaced_tiles(grid: &[usize], goal: &[usize]) -> u32 {
    let misplaced = grid
        .iter()
        .zip(goal)
        .filter(|&(&tile, &target)| tile != 0 && tile != target)
        .count();
    to_cost(misplaced)
}

/// Sums the Manhattan distance of every non-blank tile to its goal cell.
pub fn manhattan_distance(grid: &[usize], goal: &[usize], grid_size: usize) -> u32 {
    let positions = goal_positions(goal);
    let mut total = 0;
    for (index, &tile) in grid.iter().enumerate() {
        if tile == 0 {
            continue;
        }
        if let Some(&target) = positions.get(tile) {
            let (x, y) = coordinates(index, grid_size);
            let (goal_x, goal_y) = coordinates(target, grid_size);
            total += x.abs_diff(goal_x) + y.abs_diff(goal_y);
        }
    }
    to_cost(total)
}

/// Counts pairs of tiles that share their goal row (or column), are in it, and are
/// in reversed order relative to each other.
pub fn linear_conflicts(grid: &[usize], goal: &[usize], grid_size: usize) -> u32 {
    let positions = goal_positions(goal);
    let mut conflicts = 0;

    for line in 0..grid_size {
        // Goal column of each tile in row `line` that belongs to that row, left to right.
        let mut row_targets = Vec::with_capacity(grid_size);
        // Goal row of each tile in column `line` that belongs to that column, top to bottom.
        let mut column_targets = Vec::with_capacity(grid_size);

        for offset in 0..grid_size {
            let row_tile = grid.get(line * grid_size + offset).copied().unwrap_or(0);
            if let Some((goal_x, goal_y)) = goal_coordinates(&positions, row_tile, grid_size) {
                if goal_y == line {
                    row_targets.push(goal_x);
                }
            }

            let column_tile = grid.get(offset * grid_size + line).copied().unwrap_or(0);
            if let Some((goal_x, goal_y)) = goal_coordinates(&positions, column_tile, grid_size) {
                if goal_x == line {
                    column_targets.push(goal_y);
                }
            }
        }

        conflicts += inversions(&row_targets) + inversions(&column_targets);
    }
    to_cost(conflicts)
}

/// Maps each tile value to its index in `goal`.
fn goal_positions(goal: &[usize]) -> Vec<usize> {
    let mut positions = vec![0; goal.len()];
    for (index, &tile) in goal.iter().enumerate() {
        if let Some(slot) = positions.get_mut(tile) {
            *slot = index;
        }
    }
    positions
}

fn goal_coordinates(positions: &[usize], tile: usize, grid_size: usize) -> Option<(usize, usize)> {
    if tile == 0 {
        return None;
    }
    positions
        .get(tile)
        .map(|&target| coordinates(target, grid_size))
}

fn inversions(targets: &[usize]) -> usize {
    let mut count = 0;
    for (i, &a) in targets.iter().enumerate() {
        count += targets[i + 1..].iter().filter(|&&b| b < a).count();
    }
    count
}

/// Clamps a count to the cost type; costs past `u32::MAX` saturate.
fn to_cost(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOAL: [usize; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 0];

    #[test]
    fn test_goal_scores_zero() {
        for heuristic in Heuristic::ALL {
            assert_eq!(evaluate(&GOAL, &GOAL, 3, heuristic), 0, "{}", heuristic);
        }
    }

    #[test]
    fn test_one_move_away() {
        let grid = [1, 2, 3, 4, 5, 0, 7, 8, 6];
        assert_eq!(evaluate(&grid, &GOAL, 3, Heuristic::Manhattan), 1);
        assert_eq!(evaluate(&grid, &GOAL, 3, Heuristic::Misplaced), 1);
        assert_eq!(evaluate(&grid, &GOAL, 3, Heuristic::LinearConflict), 1);
    }

    #[test]
    fn test_blank_is_ignored() {
        // Only the blank and 8 are swapped; 8 is one cell away, the blank does not count.
        let grid = [1, 2, 3, 4, 5, 6, 7, 0, 8];
        assert_eq!(misplaced_tiles(&grid, &GOAL), 1);
        assert_eq!(manhattan_distance(&grid, &GOAL, 3), 1);
    }

    #[test]
    fn test_manhattan_far_tiles() {
        // 8 and 1 swapped across the board: each is 3 away.
        let grid = [8, 2, 3, 4, 5, 6, 7, 1, 0];
        assert_eq!(manhattan_distance(&grid, &GOAL, 3), 6);
        assert_eq!(misplaced_tiles(&grid, &GOAL), 2);
    }

    #[test]
    fn test_linear_conflict_in_row() {
        let grid = [2, 1, 3, 4, 5, 6, 7, 8, 0];
        assert_eq!(linear_conflicts(&grid, &GOAL, 3), 1);
        assert_eq!(evaluate(&grid, &GOAL, 3, Heuristic::LinearConflict), 4);
    }

    #[test]
    fn test_linear_conflict_in_column() {
        let grid = [4, 2, 3, 1, 5, 6, 7, 8, 0];
        assert_eq!(linear_conflicts(&grid, &GOAL, 3), 1);
        assert_eq!(evaluate(&grid, &GOAL, 3, Heuristic::LinearConflict), 4);
    }

    #[test]
    fn test_linear_conflict_full_reversal() {
        // 3 2 1 in the top row: three inverted pairs.
        let grid = [3, 2, 1, 4, 5, 6, 7, 8, 0];
        assert_eq!(linear_conflicts(&grid, &GOAL, 3), 3);
    }

    #[test]
    fn test_linear_conflict_dominates_manhattan() {
        let grid = [8, 1, 3, 4, 0, 2, 7, 6, 5];
        let manhattan = evaluate(&grid, &GOAL, 3, Heuristic::Manhattan);
        let linear = evaluate(&grid, &GOAL, 3, Heuristic::LinearConflict);
        assert!(linear >= manhattan);
    }

    #[test]
    fn test_costs_saturate_instead_of_wrapping() {
        assert_eq!(to_cost(7), 7);
        assert_eq!(to_cost(u32::MAX as usize), u32::MAX);
        if let Some(past_max) = (u32::MAX as usize).checked_add(5) {
            assert_eq!(to_cost(past_max), u32::MAX);
        }
        assert_eq!(inversions(&[2, 1, 0]), 3);
    }

    #[test]
    fn test_heuristic_names() {
        for heuristic in Heuristic::ALL {
            assert_eq!(heuristic.name().parse::<Heuristic>().unwrap(), heuristic);
        }
        assert_eq!("Hamming".parse::<Heuristic>().unwrap(), Heuristic::Misplaced);
        assert!(matches!(
            "euclid".parse::<Heuristic>(),
            Err(PuzzleError::UnknownHeuristic(_))
        ));
    }

    #[test]
    fn test_against_a_snail_goal() {
        let snail = [1, 2, 3, 8, 0, 4, 7, 6, 5];
        let grid = [1, 2, 3, 8, 4, 0, 7, 6, 5];
        assert_eq!(evaluate(&grid, &snail, 3, Heuristic::Manhattan), 1);
    }
}

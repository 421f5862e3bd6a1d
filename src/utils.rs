use crate::error::{PuzzleError, Result};
use crate::node::Direction;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::str::FromStr;

/// The arrangement a puzzle is solved towards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GoalLayout {
    /// Tiles in reading order with the blank in the bottom-right corner.
    #[default]
    Classic,
    /// Tiles spiralling clockwise from the top-left corner, blank at the end of the spiral.
    Snail,
}

impl FromStr for GoalLayout {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(GoalLayout::Classic),
            "snail" | "spiral" => Ok(GoalLayout::Snail),
            _ => Err(PuzzleError::UnknownGoalLayout(s.to_string())),
        }
    }
}

/// Builds the goal grid for a `grid_size` x `grid_size` puzzle.
///
/// # Examples
/// ```
/// use npuzzle_solver::utils::{goal_grid, GoalLayout};
///
/// assert_eq!(goal_grid(3, GoalLayout::Classic), vec![1, 2, 3, 4, 5, 6, 7, 8, 0]);
/// assert_eq!(goal_grid(3, GoalLayout::Snail), vec![1, 2, 3, 8, 0, 4, 7, 6, 5]);
/// ```
pub fn goal_grid(grid_size: usize, layout: GoalLayout) -> Vec<usize> {
    let cells = grid_size * grid_size;
    match layout {
        GoalLayout::Classic => (1..cells).chain(std::iter::once(0)).collect(),
        GoalLayout::Snail => snail_grid(grid_size),
    }
}

fn snail_grid(grid_size: usize) -> Vec<usize> {
    const TURNS: [(isize, isize); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

    let size = grid_size as isize;
    let mut grid = vec![0; grid_size * grid_size];
    let (mut x, mut y) = (0isize, 0isize);
    let mut heading = 0;

    // The last cell of the spiral keeps the blank.
    for value in 1..grid.len() {
        grid[(y * size + x) as usize] = value;
        let (dx, dy) = TURNS[heading];
        let (nx, ny) = (x + dx, y + dy);
        let blocked = nx < 0
            || ny < 0
            || nx >= size
            || ny >= size
            || grid[(ny * size + nx) as usize] != 0;
        if blocked {
            heading = (heading + 1) % TURNS.len();
        }
        let (dx, dy) = TURNS[heading];
        x += dx;
        y += dy;
    }
    grid
}

/// Checks that `grid` holds every value of `0..grid_size * grid_size` exactly once.
pub fn validate_grid(grid: &[usize], grid_size: usize) -> Result<()> {
    if grid_size == 0 {
        return Err(PuzzleError::InvalidGrid("grid size must be positive".to_string()));
    }
    let cells = grid_size * grid_size;
    if grid.len() != cells {
        return Err(PuzzleError::InvalidGrid(format!(
            "expected {} cells for a {}x{} puzzle, found {}",
            cells,
            grid_size,
            grid_size,
            grid.len()
        )));
    }

    let mut seen = vec![false; cells];
    for &tile in grid {
        match seen.get_mut(tile) {
            None => {
                return Err(PuzzleError::InvalidGrid(format!(
                    "tile {} is out of range 0..{}",
                    tile,
                    cells - 1
                )))
            }
            Some(true) => {
                return Err(PuzzleError::InvalidGrid(format!("tile {} appears twice", tile)))
            }
            Some(slot) => *slot = true,
        }
    }
    Ok(())
}

/// Parses a puzzle description into `(grid_size, grid)`.
///
/// Everything after a `#` is a comment. The first value is the grid size and
/// must stand alone on its line; it is followed by `grid_size` rows of
/// `grid_size` whitespace-separated integers. The resulting grid is validated.
///
/// # Examples
/// ```
/// use npuzzle_solver::utils::parse_puzzle;
///
/// let input = "# This puzzle is solvable\n3\n1 2 3\n4 5 6 # middle row\n7 0 8\n";
/// let (size, grid) = parse_puzzle(input).unwrap();
/// assert_eq!(size, 3);
/// assert_eq!(grid, vec![1, 2, 3, 4, 5, 6, 7, 0, 8]);
///
/// assert!(parse_puzzle("3\n1 2 3\n4 5 6\n").is_err()); // missing a row
/// ```
pub fn parse_puzzle(input: &str) -> Result<(usize, Vec<usize>)> {
    let mut grid_size: Option<usize> = None;
    let mut grid = Vec::new();
    let mut last_line = 0;

    for (line_idx, raw_line) in input.lines().enumerate() {
        let line_no = line_idx + 1;
        last_line = line_no;
        let content = raw_line.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let values = content
            .split_whitespace()
            .map(|token| {
                token.parse::<usize>().map_err(|_| PuzzleError::Parse {
                    line: line_no,
                    message: format!("'{}' is not a non-negative integer", token),
                })
            })
            .collect::<Result<Vec<usize>>>()?;

        match grid_size {
            None => {
                if values.len() != 1 {
                    return Err(PuzzleError::Parse {
                        line: line_no,
                        message: format!(
                            "expected the puzzle size alone on its line, found {} values",
                            values.len()
                        ),
                    });
                }
                if values[0] < 2 {
                    return Err(PuzzleError::Parse {
                        line: line_no,
                        message: format!("puzzle size must be at least 2, found {}", values[0]),
                    });
                }
                grid_size = Some(values[0]);
            }
            Some(size) => {
                if values.len() != size {
                    return Err(PuzzleError::Parse {
                        line: line_no,
                        message: format!("expected {} values in row, found {}", size, values.len()),
                    });
                }
                if grid.len() >= size * size {
                    return Err(PuzzleError::Parse {
                        line: line_no,
                        message: format!("too many rows, expected {}", size),
                    });
                }
                grid.extend(values);
            }
        }
    }

    let size = grid_size.ok_or_else(|| PuzzleError::Parse {
        line: last_line,
        message: "missing puzzle size".to_string(),
    })?;
    if grid.len() != size * size {
        return Err(PuzzleError::Parse {
            line: last_line,
            message: format!("expected {} rows, found {}", size, grid.len() / size),
        });
    }
    validate_grid(&grid, size)?;
    Ok((size, grid))
}

/// Slides the blank one cell in `direction`, returning the new grid, or `None`
/// if the move would leave the board or the grid has no blank.
///
/// # Examples
/// ```
/// use npuzzle_solver::node::Direction;
/// use npuzzle_solver::utils::apply_move;
///
/// let grid = [1, 2, 3, 4, 5, 6, 7, 8, 0];
/// assert_eq!(apply_move(&grid, 3, Direction::Up), Some(vec![1, 2, 3, 4, 5, 0, 7, 8, 6]));
/// assert_eq!(apply_move(&grid, 3, Direction::Right), None);
/// ```
pub fn apply_move(grid: &[usize], grid_size: usize, direction: Direction) -> Option<Vec<usize>> {
    let blank = grid.iter().position(|&tile| tile == 0)?;
    let target = direction.target(blank, grid_size)?;
    let mut next = grid.to_vec();
    next.swap(blank, target);
    Some(next)
}

/// Scrambles `goal` with `moves` random blank slides, seeded for reproducibility.
///
/// Each slide avoids undoing the previous one. Because the result is reached by
/// legal moves from the goal, it is always solvable.
pub fn scramble(goal: &[usize], grid_size: usize, moves: usize, seed: u64) -> Vec<usize> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut grid = goal.to_vec();
    let mut previous: Option<Direction> = None;

    for _ in 0..moves {
        let Some(blank) = grid.iter().position(|&tile| tile == 0) else {
            break;
        };
        let candidates: Vec<(Direction, usize)> = Direction::ALL
            .into_iter()
            .filter(|&direction| previous.map_or(true, |p| !is_reverse(p, direction)))
            .filter_map(|direction| direction.target(blank, grid_size).map(|t| (direction, t)))
            .collect();
        let Some(&(direction, target)) = candidates.choose(&mut rng) else {
            break;
        };
        grid.swap(blank, target);
        previous = Some(direction);
    }
    grid
}

fn is_reverse(a: Direction, b: Direction) -> bool {
    matches!(
        (a, b),
        (Direction::Right, Direction::Left)
            | (Direction::Left, Direction::Right)
            | (Direction::Down, Direction::Up)
            | (Direction::Up, Direction::Down)
    )
}

//! Search-tree nodes for the N-Puzzle.
//!
//! This module defines the pieces a best-first search loop works with:
//! - `SearchStrategy`: How a node's total cost is derived from its depth and heuristic cost.
//! - `Node`: An immutable grid snapshot with its parent link, depth and cached costs.
//! - `Children`: The lazy sequence of states reachable by one blank move.
//! - `Direction`: The four ways the blank can slide.
use crate::error::{PuzzleError, Result};
use crate::heuristics::{self, Heuristic};
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Selects the formula used to turn `(level, heuristic_cost)` into a node's total cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SearchStrategy {
    /// Weighted A*: `level + heuristic_cost * 2`.
    #[default]
    AStar,
    /// Uniform-cost search: `level` only.
    Uniform,
    /// Greedy best-first search: `heuristic_cost` only.
    Greedy,
}

impl SearchStrategy {
    /// Every strategy, in declaration order.
    pub const ALL: [SearchStrategy; 3] = [
        SearchStrategy::AStar,
        SearchStrategy::Uniform,
        SearchStrategy::Greedy,
    ];

    /// Computes the total cost for a node at depth `level` with heuristic `heuristic_cost`.
    ///
    /// The A* variant doubles the heuristic, trading guaranteed optimality for faster convergence.
    ///
    /// # Examples
    /// ```
    /// use npuzzle_solver::node::SearchStrategy;
    /// assert_eq!(SearchStrategy::AStar.total_cost(3, 4), 11);
    /// assert_eq!(SearchStrategy::Uniform.total_cost(3, 4), 3);
    /// assert_eq!(SearchStrategy::Greedy.total_cost(3, 4), 4);
    /// ```
    pub fn total_cost(&self, level: u32, heuristic_cost: u32) -> u32 {
        match self {
            SearchStrategy::AStar => level.saturating_add(heuristic_cost.saturating_mul(2)),
            SearchStrategy::Uniform => level,
            SearchStrategy::Greedy => heuristic_cost,
        }
    }

    /// The canonical command-line name of the strategy.
    pub fn name(&self) -> &'static str {
        match self {
            SearchStrategy::AStar => "a_star",
            SearchStrategy::Uniform => "uniform",
            SearchStrategy::Greedy => "greedy",
        }
    }
}

impl FromStr for SearchStrategy {
    type Err = PuzzleError;

    /// Parses a strategy name, case-insensitively.
    ///
    /// Accepts `a_star` (also `astar`, `a*`), `uniform` and `greedy`.
    /// Anything else fails with `PuzzleError::InvalidStrategy`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a_star" | "astar" | "a*" => Ok(SearchStrategy::AStar),
            "uniform" => Ok(SearchStrategy::Uniform),
            "greedy" => Ok(SearchStrategy::Greedy),
            _ => Err(PuzzleError::InvalidStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A direction the blank (`0`) tile slides in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Left,
    Down,
    Up,
}

impl Direction {
    /// All directions in expansion order.
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];

    /// Returns the index the blank at `index` would move to, or `None` if the move
    /// would leave a `grid_size` x `grid_size` board.
    pub fn target(&self, index: usize, grid_size: usize) -> Option<usize> {
        let (x, y) = coordinates(index, grid_size);
        match self {
            Direction::Right => (x + 1 < grid_size).then(|| index + 1),
            Direction::Left => (x > 0).then(|| index - 1),
            Direction::Down => (y + 1 < grid_size).then(|| index + grid_size),
            Direction::Up => (y > 0).then(|| index - grid_size),
        }
    }

    /// Finds the direction that moves the blank from index `from` to index `to`.
    ///
    /// # Examples
    /// ```
    /// use npuzzle_solver::node::Direction;
    /// assert_eq!(Direction::between(4, 7, 3), Some(Direction::Down));
    /// assert_eq!(Direction::between(2, 3, 3), None); // not adjacent on the board
    /// ```
    pub fn between(from: usize, to: usize, grid_size: usize) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| direction.target(from, grid_size) == Some(to))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Right => "Right",
            Direction::Left => "Left",
            Direction::Down => "Down",
            Direction::Up => "Up",
        };
        f.write_str(name)
    }
}

/// Maps a flat grid index to its `(x, y)` coordinate: `x` is the column, `y` the row.
///
/// # Examples
/// ```
/// use npuzzle_solver::node::coordinates;
/// assert_eq!(coordinates(5, 3), (2, 1));
/// assert_eq!(coordinates(0, 4), (0, 0));
/// ```
pub fn coordinates(index: usize, grid_size: usize) -> (usize, usize) {
    (index % grid_size, index / grid_size)
}

/// Renders a grid row-major, each value right-justified to `digits(size * size) + 1` columns.
pub fn render_grid(grid: &[usize], grid_size: usize) -> String {
    let width = (grid_size * grid_size).to_string().len() + 1;
    let mut out = String::with_capacity(grid.len() * width + grid_size);
    for (i, tile) in grid.iter().enumerate() {
        out.push_str(&format!("{:>width$}", tile, width = width));
        if (i + 1) % grid_size.max(1) == 0 {
            out.push('\n');
        }
    }
    out
}

/// One state in the search tree.
///
/// A node is created once and never mutated. Children hold a shared
/// reference to their parent so a solution path can be walked back to the
/// root for as long as any node on it is alive.
///
/// Nodes compare by `total_cost` only; two nodes with different grids but
/// the same cost are equal under `Ord`.
#[derive(Debug)]
pub struct Node {
    parent: Option<Rc<Node>>,
    grid: Vec<usize>,
    grid_size: usize,
    heuristic: Heuristic,
    strategy: SearchStrategy,
    level: u32,
    heuristic_cost: u32,
    total_cost: u32,
}

impl Node {
    /// Builds a node, evaluating the heuristic once and caching the resulting costs.
    ///
    /// `level` is `0` without a parent and `parent.level + 1` otherwise.
    /// The grid is not validated here.
    pub fn new(
        parent: Option<Rc<Node>>,
        grid: Vec<usize>,
        goal: &[usize],
        grid_size: usize,
        heuristic: Heuristic,
        strategy: SearchStrategy,
    ) -> Rc<Node> {
        let level = parent.as_ref().map_or(0, |p| p.level + 1);
        let heuristic_cost = heuristics::evaluate(&grid, goal, grid_size, heuristic);
        let total_cost = strategy.total_cost(level, heuristic_cost);
        Rc::new(Node {
            parent,
            grid,
            grid_size,
            heuristic,
            strategy,
            level,
            heuristic_cost,
            total_cost,
        })
    }

    /// Builds a root node from textual heuristic and strategy names.
    ///
    /// The strategy is checked first, so an unknown strategy always fails with
    /// `PuzzleError::InvalidStrategy` regardless of the other inputs.
    ///
    /// # Examples
    /// ```
    /// use npuzzle_solver::node::Node;
    /// use npuzzle_solver::error::PuzzleError;
    ///
    /// let goal = vec![1, 2, 3, 4, 5, 6, 7, 8, 0];
    /// let root = Node::root_from_names(goal.clone(), &goal, 3, "manhattan", "greedy").unwrap();
    /// assert_eq!(root.total_cost(), 0);
    ///
    /// let err = Node::root_from_names(goal.clone(), &goal, 3, "manhattan", "dijkstra");
    /// assert!(matches!(err, Err(PuzzleError::InvalidStrategy(_))));
    /// ```
    pub fn root_from_names(
        grid: Vec<usize>,
        goal: &[usize],
        grid_size: usize,
        heuristic_name: &str,
        strategy_name: &str,
    ) -> Result<Rc<Node>> {
        let strategy: SearchStrategy = strategy_name.parse()?;
        let heuristic: Heuristic = heuristic_name.parse()?;
        Ok(Node::new(None, grid, goal, grid_size, heuristic, strategy))
    }

    /// Returns `true` if this node is strictly cheaper than `other`.
    pub fn is_cheaper_than(&self, other: &Node) -> bool {
        self.total_cost < other.total_cost
    }

    /// Returns the states reachable by sliding the blank once, in the order
    /// Right, Left, Down, Up.
    ///
    /// Children are built lazily as the iterator is consumed. Calling `expand`
    /// again produces an equivalent, fresh sequence. Already-visited states are
    /// not filtered out. A grid without a blank yields no children.
    pub fn expand<'g>(self: &Rc<Self>, goal: &'g [usize], grid_size: usize) -> Children<'g> {
        Children {
            blank: self.blank_index(),
            node: Rc::clone(self),
            goal,
            grid_size,
            next_direction: 0,
        }
    }

    /// Returns `true` if this node's grid equals `goal`.
    pub fn is_goal(&self, goal: &[usize]) -> bool {
        self.grid == goal
    }

    /// Index of the blank tile, if the grid has one.
    pub fn blank_index(&self) -> Option<usize> {
        self.grid.iter().position(|&tile| tile == 0)
    }

    pub fn parent(&self) -> Option<&Rc<Node>> {
        self.parent.as_ref()
    }

    pub fn grid(&self) -> &[usize] {
        &self.grid
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn heuristic_cost(&self) -> u32 {
        self.heuristic_cost
    }

    pub fn total_cost(&self) -> u32 {
        self.total_cost
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    /// Renders the grid for terminal display. See [`render_grid`].
    pub fn render(&self) -> String {
        render_grid(&self.grid, self.grid_size)
    }
}

impl Drop for Node {
    // Unlinks the ancestor chain iteratively so dropping a deep path cannot overflow the stack.
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(node) = next {
            match Rc::try_unwrap(node) {
                Ok(mut inner) => next = inner.parent.take(),
                Err(_) => break,
            }
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.total_cost == other.total_cost
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total_cost.cmp(&other.total_cost)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Lazy iterator over the children of a node. Created by [`Node::expand`].
#[derive(Debug)]
pub struct Children<'g> {
    node: Rc<Node>,
    goal: &'g [usize],
    grid_size: usize,
    blank: Option<usize>,
    next_direction: usize,
}

impl Iterator for Children<'_> {
    type Item = Rc<Node>;

    fn next(&mut self) -> Option<Rc<Node>> {
        let blank = self.blank?;
        while let Some(direction) = Direction::ALL.get(self.next_direction) {
            self.next_direction += 1;
            if let Some(target) = direction.target(blank, self.grid_size) {
                let mut grid = self.node.grid.clone();
                grid.swap(blank, target);
                return Some(Node::new(
                    Some(Rc::clone(&self.node)),
                    grid,
                    self.goal,
                    self.grid_size,
                    self.node.heuristic,
                    self.node.strategy,
                ));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.blank.is_none() {
            return (0, Some(0));
        }
        (0, Some(Direction::ALL.len() - self.next_direction.min(Direction::ALL.len())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOAL: [usize; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 0];

    fn root(grid: Vec<usize>, strategy: SearchStrategy) -> Rc<Node> {
        Node::new(None, grid, &GOAL, 3, Heuristic::Manhattan, strategy)
    }

    fn blank_at(grid: &[usize]) -> usize {
        grid.iter().position(|&t| t == 0).unwrap()
    }

    #[test]
    fn test_total_cost_formulas() {
        for level in 0..6 {
            for h in 0..6 {
                assert_eq!(SearchStrategy::AStar.total_cost(level, h), level + 2 * h);
                assert_eq!(SearchStrategy::Uniform.total_cost(level, h), level);
                assert_eq!(SearchStrategy::Greedy.total_cost(level, h), h);
            }
        }
        assert_eq!(SearchStrategy::AStar.total_cost(3, 4), 11);
        assert_eq!(SearchStrategy::AStar.total_cost(3, u32::MAX), u32::MAX);
    }

    #[test]
    fn test_node_costs_follow_strategy() {
        // Manhattan distance of this grid to GOAL is 1.
        let grid = vec![1, 2, 3, 4, 5, 0, 7, 8, 6];
        let a_star = root(grid.clone(), SearchStrategy::AStar);
        let uniform = root(grid.clone(), SearchStrategy::Uniform);
        let greedy = root(grid, SearchStrategy::Greedy);

        assert_eq!(a_star.heuristic_cost(), 1);
        assert_eq!(a_star.total_cost(), 2);
        assert_eq!(uniform.total_cost(), 0);
        assert_eq!(greedy.total_cost(), 1);
        assert_eq!(a_star.level(), 0);
        assert!(a_star.parent().is_none());
    }

    #[test]
    fn test_invalid_strategy_is_rejected() {
        let result = Node::root_from_names(GOAL.to_vec(), &GOAL, 3, "manhattan", "dijkstra");
        assert!(matches!(result, Err(PuzzleError::InvalidStrategy(ref s)) if s == "dijkstra"));

        // Strategy is checked before the heuristic name.
        let result = Node::root_from_names(vec![0], &[0], 1, "no_such_heuristic", "dijkstra");
        assert!(matches!(result, Err(PuzzleError::InvalidStrategy(_))));

        assert!(matches!(
            "DFS".parse::<SearchStrategy>(),
            Err(PuzzleError::InvalidStrategy(_))
        ));
    }

    #[test]
    fn test_strategy_names_round_trip() {
        for strategy in SearchStrategy::ALL {
            assert_eq!(strategy.name().parse::<SearchStrategy>().unwrap(), strategy);
        }
        assert_eq!("A*".parse::<SearchStrategy>().unwrap(), SearchStrategy::AStar);
        assert_eq!(" Greedy ".parse::<SearchStrategy>().unwrap(), SearchStrategy::Greedy);
        assert_eq!(SearchStrategy::default(), SearchStrategy::AStar);
    }

    #[test]
    fn test_expand_corner_yields_right_then_down() {
        let parent = root(vec![0, 1, 2, 3, 4, 5, 6, 7, 8], SearchStrategy::AStar);
        let children: Vec<_> = parent.expand(&GOAL, 3).collect();

        assert_eq!(children.len(), 2);
        assert_eq!(children[0].grid(), &[1, 0, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(children[1].grid(), &[3, 1, 2, 0, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_expand_center_yields_four_in_order() {
        let parent = root(vec![1, 2, 3, 4, 0, 5, 6, 7, 8], SearchStrategy::AStar);
        let blank = parent.blank_index().unwrap();
        let children: Vec<_> = parent.expand(&GOAL, 3).collect();

        assert_eq!(children.len(), 4);
        let moves: Vec<_> = children
            .iter()
            .map(|c| Direction::between(blank, blank_at(c.grid()), 3).unwrap())
            .collect();
        assert_eq!(
            moves,
            vec![Direction::Right, Direction::Left, Direction::Down, Direction::Up]
        );
    }

    #[test]
    fn test_expand_edges() {
        // Blank in the bottom-right corner: only Left and Up.
        let parent = root(GOAL.to_vec(), SearchStrategy::Uniform);
        let children: Vec<_> = parent.expand(&GOAL, 3).collect();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].grid(), &[1, 2, 3, 4, 5, 6, 7, 0, 8]);
        assert_eq!(children[1].grid(), &[1, 2, 3, 4, 5, 0, 7, 8, 6]);

        // Blank in the middle of the top edge: Right, Left, Down.
        let parent = root(vec![1, 0, 2, 3, 4, 5, 6, 7, 8], SearchStrategy::Uniform);
        assert_eq!(parent.expand(&GOAL, 3).count(), 3);
    }

    #[test]
    fn test_children_differ_in_exactly_two_cells() {
        let parent = root(vec![8, 1, 3, 4, 0, 2, 7, 6, 5], SearchStrategy::AStar);
        let old_blank = parent.blank_index().unwrap();
        for child in parent.expand(&GOAL, 3) {
            let new_blank = child.blank_index().unwrap();
            let diffs: Vec<usize> = (0..9)
                .filter(|&i| child.grid()[i] != parent.grid()[i])
                .collect();
            assert_eq!(diffs.len(), 2);
            assert!(diffs.contains(&old_blank));
            assert!(diffs.contains(&new_blank));
            assert_eq!(child.grid()[old_blank], parent.grid()[new_blank]);
        }
    }

    #[test]
    fn test_children_inherit_settings_and_level() {
        let parent = Node::new(
            None,
            vec![1, 2, 3, 4, 0, 5, 6, 7, 8],
            &GOAL,
            3,
            Heuristic::Misplaced,
            SearchStrategy::Greedy,
        );
        let grandchild = parent
            .expand(&GOAL, 3)
            .next()
            .unwrap()
            .expand(&GOAL, 3)
            .next()
            .unwrap();
        assert_eq!(grandchild.level(), 2);

        for child in parent.expand(&GOAL, 3) {
            assert_eq!(child.level(), parent.level() + 1);
            assert_eq!(child.heuristic(), Heuristic::Misplaced);
            assert_eq!(child.strategy(), SearchStrategy::Greedy);
            assert_eq!(child.grid_size(), 3);
            assert!(Rc::ptr_eq(child.parent().unwrap(), &parent));
        }
    }

    #[test]
    fn test_expand_is_repeatable() {
        let parent = root(vec![1, 2, 3, 4, 0, 5, 6, 7, 8], SearchStrategy::AStar);
        let first: Vec<Vec<usize>> = parent.expand(&GOAL, 3).map(|c| c.grid().to_vec()).collect();
        let second: Vec<Vec<usize>> = parent.expand(&GOAL, 3).map(|c| c.grid().to_vec()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_expand_is_lazy() {
        let parent = root(vec![1, 2, 3, 4, 0, 5, 6, 7, 8], SearchStrategy::AStar);
        let mut children = parent.expand(&GOAL, 3);
        assert_eq!(children.size_hint(), (0, Some(4)));
        assert!(children.next().is_some());
        assert_eq!(children.size_hint(), (0, Some(3)));
        assert_eq!(children.count(), 3);
    }

    #[test]
    fn test_expand_without_blank_yields_nothing() {
        let parent = root(vec![1, 2, 3, 4, 5, 6, 7, 8, 9], SearchStrategy::Uniform);
        assert_eq!(parent.expand(&GOAL, 3).count(), 0);
    }

    #[test]
    fn test_ordering_uses_total_cost_only() {
        let cheap = root(vec![1, 2, 3, 4, 5, 0, 7, 8, 6], SearchStrategy::Greedy);
        let dear = root(vec![8, 1, 3, 4, 0, 2, 7, 6, 5], SearchStrategy::Greedy);
        let solved = root(GOAL.to_vec(), SearchStrategy::Greedy);

        assert!(solved.is_cheaper_than(&cheap));
        assert!(cheap.is_cheaper_than(&dear));
        assert!(solved.is_cheaper_than(&dear));
        assert!(!cheap.is_cheaper_than(&cheap));
        assert!(solved < cheap && cheap < dear && solved < dear);

        // Different grids, same cost: equal under the ordering.
        let other_cheap = root(vec![1, 2, 3, 4, 5, 6, 7, 0, 8], SearchStrategy::Greedy);
        assert_eq!(cheap.cmp(&other_cheap), Ordering::Equal);
        assert!(!cheap.is_cheaper_than(&other_cheap) && !other_cheap.is_cheaper_than(&cheap));
    }

    #[test]
    fn test_construction_is_deterministic() {
        let parent = root(vec![1, 2, 3, 4, 0, 5, 6, 7, 8], SearchStrategy::AStar);
        let grid = vec![1, 2, 3, 4, 5, 0, 6, 7, 8];
        let build = |grid: Vec<usize>| {
            Node::new(
                Some(Rc::clone(&parent)),
                grid,
                &GOAL,
                3,
                Heuristic::LinearConflict,
                SearchStrategy::AStar,
            )
        };
        let a = build(grid.clone());
        let b = build(grid);
        assert_eq!(a.heuristic_cost(), b.heuristic_cost());
        assert_eq!(a.total_cost(), b.total_cost());
    }

    #[test]
    fn test_one_move_from_goal_with_uniform() {
        let start = root(vec![1, 2, 3, 4, 5, 0, 7, 8, 6], SearchStrategy::Uniform);
        let solved = start
            .expand(&GOAL, 3)
            .find(|child| child.is_goal(&GOAL))
            .expect("a child should reach the goal");
        assert_eq!(solved.total_cost(), 1);
        assert_eq!(solved.level(), 1);
    }

    #[test]
    fn test_direction_targets_respect_borders() {
        assert_eq!(Direction::Right.target(2, 3), None);
        assert_eq!(Direction::Left.target(3, 3), None);
        assert_eq!(Direction::Down.target(7, 3), None);
        assert_eq!(Direction::Up.target(1, 3), None);
        assert_eq!(Direction::Right.target(4, 3), Some(5));
        assert_eq!(Direction::Left.target(4, 3), Some(3));
        assert_eq!(Direction::Down.target(4, 3), Some(7));
        assert_eq!(Direction::Up.target(4, 3), Some(1));
    }

    #[test]
    fn test_render_grid() {
        let node = root(vec![1, 2, 3, 4, 5, 6, 7, 8, 0], SearchStrategy::AStar);
        assert_eq!(node.render(), " 1 2 3\n 4 5 6\n 7 8 0\n");
        assert_eq!(node.to_string(), node.render());

        // 4x4 needs two digits for 16, so every cell is three wide.
        let grid: Vec<usize> = (0..16).collect();
        let rendered = render_grid(&grid, 4);
        assert_eq!(rendered.lines().next(), Some("  0  1  2  3"));
        assert_eq!(rendered.lines().count(), 4);
    }

    #[test]
    fn test_dropping_a_deep_chain() {
        let goal = [1, 2, 3, 0];
        let (heuristic, strategy) = (Heuristic::Misplaced, SearchStrategy::Uniform);
        let mut node = Node::new(None, vec![0, 1, 2, 3], &goal, 2, heuristic, strategy);
        for _ in 0..100_000 {
            // Bounce the blank between the two top cells.
            let next_grid = if node.grid()[0] == 0 { vec![1, 0, 2, 3] } else { vec![0, 1, 2, 3] };
            node = Node::new(Some(node), next_grid, &goal, 2, heuristic, strategy);
        }
        assert_eq!(node.level(), 100_000);
        drop(node);
    }
}

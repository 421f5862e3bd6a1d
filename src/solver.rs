use crate::error::Result;
use crate::heuristics::Heuristic;
use crate::node::{Direction, Node, SearchStrategy};
use crate::utils::validate_grid;
use log::{debug, info, trace};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};
use std::rc::Rc;

/// Settings for one search run.
#[derive(Clone, Debug, Default)]
pub struct SolverConfig {
    pub heuristic: Heuristic,
    pub strategy: SearchStrategy,
    /// Stop after this many states have been selected for expansion. `None` means no limit.
    pub max_expansions: Option<usize>,
}

/// Counters describing the cost of a search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Number of states popped from the frontier and examined (time complexity).
    pub states_selected: usize,
    /// Largest number of states held in the frontier and closed set at once (space complexity).
    pub max_states_in_memory: usize,
}

/// A solution found by the solver.
#[derive(Clone, Debug)]
pub struct Solution {
    /// Every state from the start to the goal, inclusive.
    pub path: Vec<Rc<Node>>,
    /// The blank moves leading from one state of `path` to the next.
    pub moves: Vec<Direction>,
    pub stats: SearchStats,
}

impl Solution {
    /// Walks the parent links from `goal_node` back to the root.
    fn from_goal_node(goal_node: Rc<Node>, stats: SearchStats) -> Self {
        let grid_size = goal_node.grid_size();
        let mut path = Vec::with_capacity(goal_node.level() as usize + 1);
        let mut current = Some(goal_node);
        while let Some(node) = current {
            current = node.parent().cloned();
            path.push(node);
        }
        path.reverse();

        let moves = path
            .windows(2)
            .filter_map(|pair| {
                Direction::between(pair[0].blank_index()?, pair[1].blank_index()?, grid_size)
            })
            .collect();

        Solution { path, moves, stats }
    }

    /// Number of moves in the solution.
    pub fn move_count(&self) -> usize {
        self.moves.len()
    }
}

/// How a search ended.
#[derive(Clone, Debug)]
pub enum SearchOutcome {
    Solved(Solution),
    /// Every reachable state was examined without meeting the goal.
    Exhausted(SearchStats),
    /// The expansion limit was hit first.
    LimitReached(SearchStats),
}

impl SearchOutcome {
    pub fn stats(&self) -> SearchStats {
        match self {
            SearchOutcome::Solved(solution) => solution.stats,
            SearchOutcome::Exhausted(stats) | SearchOutcome::LimitReached(stats) => *stats,
        }
    }

    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SearchOutcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }
}

/// A frontier entry: lowest total cost first, then first in, first out.
#[derive(Debug)]
struct FrontierEntry {
    key: Reverse<(u32, u64)>,
    node: Rc<Node>,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Priority queue of nodes awaiting expansion.
///
/// Nodes come out cheapest first. Among nodes of equal total cost, the one
/// pushed earliest comes out first, so search traces are reproducible.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    next_seq: u64,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: Rc<Node>) {
        let key = Reverse((node.total_cost(), self.next_seq));
        self.next_seq += 1;
        self.heap.push(FrontierEntry { key, node });
    }

    /// Removes and returns the cheapest node.
    pub fn pop(&mut self) -> Option<Rc<Node>> {
        self.heap.pop().map(|entry| entry.node)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Validates both grids, builds the root and runs a best-first search from `start` to `goal`.
///
/// # Examples
/// ```
/// use npuzzle_solver::solver::{solve, SearchOutcome, SolverConfig};
///
/// let goal = [1, 2, 3, 4, 5, 6, 7, 8, 0];
/// let start = [1, 2, 3, 4, 5, 6, 0, 7, 8];
/// match solve(&start, &goal, 3, &SolverConfig::default()).unwrap() {
///     SearchOutcome::Solved(solution) => assert_eq!(solution.move_count(), 2),
///     other => panic!("unexpected outcome: {:?}", other),
/// }
/// ```
pub fn solve(
    start: &[usize],
    goal: &[usize],
    grid_size: usize,
    config: &SolverConfig,
) -> Result<SearchOutcome> {
    validate_grid(start, grid_size)?;
    validate_grid(goal, grid_size)?;
    let root = Node::new(
        None,
        start.to_vec(),
        goal,
        grid_size,
        config.heuristic,
        config.strategy,
    );
    Ok(search(root, goal, grid_size, config.max_expansions))
}

/// Runs a best-first search from an existing root node.
///
/// The goal test happens when a node is popped. A grid is expanded at most
/// once; later frontier entries for it are skipped. No solvability check is
/// made, so an unsolvable start exhausts its reachable states (or the limit).
pub fn search(
    root: Rc<Node>,
    goal: &[usize],
    grid_size: usize,
    max_expansions: Option<usize>,
) -> SearchOutcome {
    info!(
        "Searching with strategy {} and heuristic {} (root h = {})",
        root.strategy(),
        root.heuristic(),
        root.heuristic_cost()
    );

    let mut frontier = Frontier::new();
    let mut closed: HashSet<Vec<usize>> = HashSet::new();
    let mut stats = SearchStats {
        states_selected: 0,
        max_states_in_memory: 1,
    };
    frontier.push(root);

    while let Some(node) = frontier.pop() {
        if closed.contains(node.grid()) {
            continue;
        }
        if max_expansions.is_some_and(|limit| stats.states_selected >= limit) {
            info!("Expansion limit reached after {} states", stats.states_selected);
            return SearchOutcome::LimitReached(stats);
        }
        stats.states_selected += 1;
        trace!(
            "Selected state at level {} with cost {}:\n{}",
            node.level(),
            node.total_cost(),
            node
        );

        if node.is_goal(goal) {
            info!(
                "Goal reached at depth {} after selecting {} states",
                node.level(),
                stats.states_selected
            );
            return SearchOutcome::Solved(Solution::from_goal_node(node, stats));
        }

        closed.insert(node.grid().to_vec());
        let mut pushed = 0;
        for child in node.expand(goal, grid_size) {
            if !closed.contains(child.grid()) {
                frontier.push(child);
                pushed += 1;
            }
        }
        stats.max_states_in_memory = stats
            .max_states_in_memory
            .max(frontier.len() + closed.len());

        if stats.states_selected % 10_000 == 0 {
            debug!(
                "{} states selected, frontier holds {}, last batch pushed {}",
                stats.states_selected,
                frontier.len(),
                pushed
            );
        }
    }

    info!(
        "Search space exhausted after {} states without reaching the goal",
        stats.states_selected
    );
    SearchOutcome::Exhausted(stats)
}

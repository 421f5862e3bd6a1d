use npuzzle_solver::error::PuzzleError;
use npuzzle_solver::heuristics::Heuristic;
use npuzzle_solver::node::SearchStrategy;
use npuzzle_solver::solver::{solve, SearchOutcome, SolverConfig};
use npuzzle_solver::utils::{goal_grid, scramble, GoalLayout};

const NUM_RANDOM_PUZZLES_FOR_EVALUATION: usize = 10;
const START_SEED: u64 = 0;
const GRID_SIZE: usize = 3;
const SCRAMBLE_MOVES: usize = 60;
const MAX_EXPANSIONS: usize = 200_000;

#[derive(Default)]
struct Tally {
    solved: usize,
    total_moves: usize,
    total_selected: usize,
}

fn main() -> Result<(), PuzzleError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Uniform-cost search ignores h, so one heuristic is enough for it.
    let mut configs: Vec<SolverConfig> = vec![SolverConfig {
        heuristic: Heuristic::Manhattan,
        strategy: SearchStrategy::Uniform,
        max_expansions: Some(MAX_EXPANSIONS),
    }];
    for strategy in [SearchStrategy::AStar, SearchStrategy::Greedy] {
        for heuristic in Heuristic::ALL {
            configs.push(SolverConfig {
                heuristic,
                strategy,
                max_expansions: Some(MAX_EXPANSIONS),
            });
        }
    }

    let goal = goal_grid(GRID_SIZE, GoalLayout::Classic);
    let mut tallies: Vec<Tally> = configs.iter().map(|_| Tally::default()).collect();

    println!(
        "Starting strategy evaluation for {} puzzles...",
        NUM_RANDOM_PUZZLES_FOR_EVALUATION
    );

    for puzzle_idx in 0..NUM_RANDOM_PUZZLES_FOR_EVALUATION {
        let seed = START_SEED + puzzle_idx as u64;
        let start = scramble(&goal, GRID_SIZE, SCRAMBLE_MOVES, seed);
        println!("\nEvaluating Puzzle {} (Seed: {})", puzzle_idx, seed);

        for (config, tally) in configs.iter().zip(tallies.iter_mut()) {
            let label = format!("{}/{}", config.strategy, config.heuristic);
            match solve(&start, &goal, GRID_SIZE, config)? {
                SearchOutcome::Solved(solution) => {
                    tally.solved += 1;
                    tally.total_moves += solution.move_count();
                    tally.total_selected += solution.stats.states_selected;
                    println!(
                        "  {:<26} Moves: {:<4} Selected: {}",
                        label,
                        solution.move_count(),
                        solution.stats.states_selected
                    );
                }
                outcome => {
                    println!(
                        "  {:<26} Unsolved after {} states",
                        label,
                        outcome.stats().states_selected
                    );
                }
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Puzzles evaluated: {}", NUM_RANDOM_PUZZLES_FOR_EVALUATION);
    println!("\n--- Averages over solved puzzles ---");

    let mut rows: Vec<(String, f64, f64, usize)> = configs
        .iter()
        .zip(&tallies)
        .filter(|(_, tally)| tally.solved > 0)
        .map(|(config, tally)| {
            (
                format!("{}/{}", config.strategy, config.heuristic),
                tally.total_moves as f64 / tally.solved as f64,
                tally.total_selected as f64 / tally.solved as f64,
                tally.solved,
            )
        })
        .collect();

    // Fewest states selected first.
    rows.sort_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal));

    for (label, avg_moves, avg_selected, solved) in rows {
        println!(
            "{:<26}: Moves = {:>7.2}, Selected = {:>10.1}, Solved = {}",
            label, avg_moves, avg_selected, solved
        );
    }
    Ok(())
}

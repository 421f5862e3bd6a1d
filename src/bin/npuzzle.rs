use clap::builder::RangedU64ValueParser;
use clap::Parser;
use log::info;
use npuzzle_solver::error::PuzzleError;
use npuzzle_solver::node::{render_grid, Node};
use npuzzle_solver::solver::{search, SearchOutcome};
use npuzzle_solver::utils::{goal_grid, parse_puzzle, scramble, validate_grid, GoalLayout};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the puzzle file (size, then one row per line; '#' starts a comment)
    #[clap(required_unless_present = "random")]
    puzzle_file: Option<PathBuf>,

    /// Generate a random solvable puzzle of this size instead of reading a file
    #[clap(
        short,
        long,
        conflicts_with = "puzzle_file",
        value_parser = RangedU64ValueParser::<usize>::new().range(2..)
    )]
    random: Option<usize>,

    /// Number of random blank moves used to scramble a generated puzzle
    #[clap(long, default_value_t = 100)]
    scramble_moves: usize,

    /// Seed for puzzle generation
    #[clap(long, default_value_t = 514514)]
    seed: u64,

    /// Heuristic: manhattan, misplaced or linear_conflict
    #[clap(long, default_value = "manhattan")]
    heuristic: String,

    /// Search strategy: a_star, uniform or greedy
    #[clap(short, long, default_value = "a_star")]
    strategy: String,

    /// Goal layout: classic or snail
    #[clap(short, long, default_value = "classic")]
    goal: String,

    /// Give up after selecting this many states
    #[clap(long)]
    max_expansions: Option<usize>,

    /// Print every state along the solution path
    #[clap(short, long)]
    verbose: bool,
}

fn read_puzzle(args: &Args) -> Result<(usize, Vec<usize>, Vec<usize>), PuzzleError> {
    let layout: GoalLayout = args.goal.parse()?;

    match (&args.puzzle_file, args.random) {
        (Some(path), None) => {
            let content = fs::read_to_string(path)?;
            let (size, grid) = parse_puzzle(&content)?;
            info!("Loaded {}x{} puzzle from {}", size, size, path.display());
            Ok((size, grid, goal_grid(size, layout)))
        }
        (None, Some(size)) => {
            let goal = goal_grid(size, layout);
            let grid = scramble(&goal, size, args.scramble_moves, args.seed);
            info!(
                "Generated {}x{} puzzle with {} scramble moves (seed {})",
                size, size, args.scramble_moves, args.seed
            );
            Ok((size, grid, goal))
        }
        _ => unreachable!("clap requires exactly one of a puzzle file or --random"),
    }
}

fn main() -> Result<(), PuzzleError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let (size, grid, goal) = read_puzzle(&args)?;
    validate_grid(&grid, size)?;

    println!("Initial state:\n{}", render_grid(&grid, size));
    println!("Goal state:\n{}", render_grid(&goal, size));

    let root = Node::root_from_names(grid, &goal, size, &args.heuristic, &args.strategy)?;

    match search(root, &goal, size, args.max_expansions) {
        SearchOutcome::Solved(solution) => {
            println!("Solution found:\n");
            println!("Complexity in time: {}", solution.stats.states_selected);
            println!("Complexity in size: {}", solution.stats.max_states_in_memory);
            println!("Number of moves: {}", solution.move_count());
            if solution.moves.is_empty() {
                println!("  Already solved.");
            } else {
                let moves: Vec<String> = solution.moves.iter().map(|m| m.to_string()).collect();
                println!("Moves: {}", moves.join(" "));
            }
            if args.verbose {
                for (i, node) in solution.path.iter().enumerate() {
                    println!("\nStep {} (cost {}):\n{}", i, node.total_cost(), node);
                }
            }
        }
        SearchOutcome::Exhausted(stats) => {
            println!(
                "No solution: all {} reachable states were examined. The puzzle is unsolvable.",
                stats.states_selected
            );
        }
        SearchOutcome::LimitReached(stats) => {
            println!(
                "No solution within the limit of {} states (peak memory {} states).",
                stats.states_selected, stats.max_states_in_memory
            );
        }
    }
    Ok(())
}

use clap::builder::RangedU64ValueParser;
use clap::Parser;
use npuzzle_solver::node::{render_grid, Direction};
use npuzzle_solver::utils::{apply_move, goal_grid, scramble, GoalLayout};
use std::io::{self, Write};

const SCRAMBLE_MOVES: usize = 40;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Side length of the puzzle
    #[clap(default_value_t = 3, value_parser = RangedU64ValueParser::<usize>::new().range(2..))]
    size: usize,

    /// Seed for the starting scramble
    #[clap(long, default_value_t = 514514)]
    seed: u64,
}

fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "d" => Some(Direction::Right),
        "a" => Some(Direction::Left),
        "s" => Some(Direction::Down),
        "w" => Some(Direction::Up),
        _ => None,
    }
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let size = args.size;

    let goal = goal_grid(size, GoalLayout::Classic);
    let mut grid = scramble(&goal, size, SCRAMBLE_MOVES, args.seed);
    let mut history: Vec<Vec<usize>> = Vec::new();
    println!("Welcome to the {}-puzzle!", size * size - 1);

    loop {
        println!("---------------------");
        println!("Steps: {}", history.len());
        println!("{}", render_grid(&grid, size));

        if grid == goal {
            println!("---------------------");
            println!("🎉 SOLVED! 🎉");
            println!("Total Steps: {}", history.len());
            println!("---------------------");
            break;
        }

        print!("Slide the blank with w/a/s/d, 'u' to undo, 'q' to quit: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let trimmed_input = input.trim();

        if trimmed_input == "q" {
            println!("Thanks for playing!");
            break;
        }

        if trimmed_input == "u" {
            match history.pop() {
                Some(previous) => {
                    grid = previous;
                    println!("Move undone.");
                }
                None => println!("Cannot undo further (already at initial state)."),
            }
            continue;
        }

        match direction_for_key(trimmed_input) {
            Some(direction) => match apply_move(&grid, size, direction) {
                Some(next) => history.push(std::mem::replace(&mut grid, next)),
                None => println!("Invalid move: the blank cannot slide {}.", direction),
            },
            None => println!("Invalid input format. Use w, a, s, d, 'u' or 'q'."),
        }
    }
    Ok(())
}

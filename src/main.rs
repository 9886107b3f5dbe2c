use std::io::{BufRead, Write};

use clap::Parser;
use cut_planner::render;
use cut_planner::solver::{DEFAULT_TRIALS, Solver};
use cut_planner::types::Outcome;

#[derive(Parser)]
#[command(
    name = "cut_planner",
    about = "1D cutting stock planner minimizing physical cuts"
)]
struct Cli {
    /// Available bar lengths, e.g. {90,51,55}
    #[arg(long)]
    bars: Option<String>,

    /// Required piece lengths, e.g. {5,9,33}
    #[arg(long)]
    wanted: Option<String>,

    /// Number of randomized search trials
    #[arg(long, default_value_t = DEFAULT_TRIALS)]
    trials: usize,

    /// Fixed random seed for reproducible plans
    #[arg(long)]
    seed: Option<u64>,

    /// Print every cut and assignment of the winning plan
    #[arg(short, long)]
    verbose: bool,
}

/// Parses the `{int,int,...,int}` grammar into positive lengths. `{}` is
/// the empty list.
fn parse_lengths(s: &str) -> Result<Vec<u64>, String> {
    let trimmed = s.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(|| format!("invalid list '{trimmed}', expected {{int,int,...,int}}"))?;

    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    inner
        .split(',')
        .map(|part| {
            let length = part
                .trim()
                .parse::<u64>()
                .map_err(|_| format!("invalid length '{}'", part.trim()))?;
            if length == 0 {
                return Err(format!("lengths must be positive in '{trimmed}'"));
            }
            Ok(length)
        })
        .collect()
}

fn run(bars: Vec<u64>, wanted: Vec<u64>, cli: &Cli) {
    let mut solver = Solver::new(bars, wanted);
    solver.set_trials(cli.trials).set_verbose(cli.verbose);
    if let Some(seed) = cli.seed {
        solver.set_random_seed(seed);
    }

    match solver.solve() {
        Outcome::Infeasible => {
            println!("No solution available: not enough material to satisfy requested lengths.");
        }
        Outcome::Solved(plan) => {
            if cli.verbose {
                print!("{}", render::render_plan(&plan));
            }
            println!("Solved with {} cuts made", plan.cuts);
        }
    }
}

fn prompt(message: &str) -> Option<String> {
    print!("{message}");
    std::io::stdout().flush().ok()?;
    let mut line = String::new();
    let read = std::io::stdin().lock().read_line(&mut line).ok()?;
    if read == 0 {
        return None;
    }
    Some(line)
}

fn prompt_lengths(message: &str) -> Option<Vec<u64>> {
    loop {
        let line = prompt(message)?;
        match parse_lengths(&line) {
            Ok(lengths) => return Some(lengths),
            Err(e) => println!("Input error: {e}"),
        }
    }
}

fn interactive_loop(cli: &Cli) {
    loop {
        let Some(bars) = prompt_lengths("Enter the bar lengths as {length1,length2,lengthN}: ")
        else {
            break;
        };
        let Some(wanted) = prompt_lengths("Enter the desired lengths as {amount1,amount2,amountN}: ")
        else {
            break;
        };

        println!("Processing...");
        run(bars, wanted, cli);
        println!();
    }
}

fn main() {
    let cli = Cli::parse();

    match (&cli.bars, &cli.wanted) {
        (Some(bars), Some(wanted)) => {
            let bars = parse_lengths(bars).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(1);
            });
            let wanted = parse_lengths(wanted).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(1);
            });
            run(bars, wanted, &cli);
        }
        _ => interactive_loop(&cli),
    }
}

use nqueens::parallel::{solve_parallel, ParallelConfig, PhaseTimings};
use nqueens::search::{solve, SearchOutcome};
use nqueens::validate::validate_outcome;
use std::time::Instant;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        usage_and_exit();
    }

    match args.as_slice() {
        [n] => run_sequential(parse_or_usage(n)),
        [n, p] => run_parallel(parse_or_usage(n), parse_or_usage(p)),
        _ => usage_and_exit(),
    }
}

fn run_sequential(n: usize) {
    log::info!("sequential search: n={n}");
    let start = Instant::now();
    let outcome = solve(n);
    let elapsed = start.elapsed();

    check(&outcome);
    println!("Elapsed: {:.6} seconds\n", elapsed.as_secs_f64());
    print_outcome(&outcome);
}

fn run_parallel(n: usize, workers: usize) {
    let cfg = ParallelConfig::default().with_workers(workers);
    let run = match solve_parallel(n, &cfg) {
        Ok(run) => run,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let finish_start = Instant::now();
    check(&run.outcome);
    print_outcome(&run.outcome);
    print_timings(&run.timings);
    println!(
        "Finish time: {:.6} seconds\n",
        (run.timings.teardown + finish_start.elapsed()).as_secs_f64()
    );
}

fn check(outcome: &SearchOutcome) {
    if let Err(e) = validate_outcome(outcome) {
        log::warn!("outcome failed validation: {e}");
    }
}

fn print_outcome(outcome: &SearchOutcome) {
    println!(
        "There are {} solutions and the solution with the highest profit is: \n",
        outcome.solutions
    );
    match outcome.board() {
        Some(board) => println!("{board}"),
        None => println!("(no placement)\n"),
    }
    println!("Profit: {}", outcome.profit());
}

fn print_timings(timings: &PhaseTimings) {
    println!("Setup time: {:.6} seconds", timings.setup.as_secs_f64());
    println!("Execution time: {:.6} seconds", timings.execution.as_secs_f64());
}

fn parse_or_usage(arg: &str) -> usize {
    arg.parse().unwrap_or_else(|_| usage_and_exit())
}

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage:\n  nqueens N        sequential search on an N x N board\n  nqueens N P      parallel search with P workers\n\nSet RUST_LOG=info or RUST_LOG=debug for progress logging.\nAborting..."
    );
    std::process::exit(0)
}

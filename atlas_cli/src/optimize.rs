use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use atlas_optimizer::{
    json::{solution::JsonProblemWithSolution, types::JsonVehicleRoutingProblem},
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    selector::solution_comparator::best_of,
    solver::{algorithm::create_algorithm, solver_params::SolverParams},
};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::{
    file_utils::{read_json, write_json},
    solution_printer::{Print, print_solution},
    solver_args::SolverArgs,
};

#[derive(Args)]
pub struct OptimizeArgs {
    /// The problem document to optimize
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Where the problem-with-solution document is written
    #[arg(short = 'o', long, default_value = "output/problem-with-solution.json")]
    out: PathBuf,

    /// Prints routes and unassigned jobs
    #[arg(short, long)]
    verbose: bool,

    #[command(flatten)]
    solver: SolverArgs,
}

/// Searches solutions, writes the best one with its problem to `out` and
/// prints its report.
pub fn solve(
    problem: VehicleRoutingProblem,
    params: SolverParams,
    out: &Path,
    print: Print,
) -> Result<(), anyhow::Error> {
    let mut algorithm = create_algorithm(problem, params);

    let bar = ProgressBar::new_spinner();
    bar.enable_steady_tick(Duration::from_millis(200));
    bar.set_style(ProgressStyle::default_spinner().template("{spinner} [{elapsed}] {msg}")?);
    bar.set_message("searching...");

    let callback_bar = bar.clone();
    algorithm.on_best_solution(move |best_solution| {
        callback_bar.set_message(format!(
            "vehicles = {}, costs = {:.2}, unassigned = {}",
            best_solution.vehicles_used(),
            best_solution.total_cost(),
            best_solution.unassigned_count(),
        ));
    });

    let solutions = algorithm.search_solutions();
    bar.finish_and_clear();

    let best_solution = best_of(&solutions)?;
    info!(
        "Finished: vehicles = {}, costs = {:.2}, unassigned = {}",
        best_solution.vehicles_used(),
        best_solution.total_cost(),
        best_solution.unassigned_count(),
    );

    let document = JsonProblemWithSolution::new(best_solution);
    write_json(out, &document)?;
    info!("Solution written to {}", out.display());

    print_solution(&document, print);

    Ok(())
}

pub fn run(args: OptimizeArgs) -> Result<(), anyhow::Error> {
    info!("Optimizing {}", args.input.display());

    let document: JsonVehicleRoutingProblem = read_json(&args.input)?;
    let problem = document.build_problem()?;

    solve(
        problem,
        args.solver.solver_params(),
        &args.out,
        if args.verbose {
            Print::Verbose
        } else {
            Print::Concise
        },
    )
}

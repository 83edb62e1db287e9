use std::path::PathBuf;

use atlas_optimizer::json::solution::JsonProblemWithSolution;
use clap::Args;

use crate::{
    file_utils::read_json,
    solution_printer::{Print, print_solution},
};

#[derive(Args)]
pub struct ReportArgs {
    /// A problem-with-solution document written by `optimize`
    #[arg(short = 'i', long, default_value = "output/problem-with-solution.json")]
    input: PathBuf,

    /// Only prints the problem and solution summaries
    #[arg(short, long)]
    concise: bool,
}

pub fn run(args: ReportArgs) -> Result<(), anyhow::Error> {
    let document: JsonProblemWithSolution = read_json(&args.input)?;

    print_solution(
        &document,
        if args.concise {
            Print::Concise
        } else {
            Print::Verbose
        },
    );

    Ok(())
}

use clap::{Parser, Subcommand};

#[cfg(not(feature = "dhat-heap"))]
use mimalloc::MiMalloc;

use crate::{
    generate::GenerateSubcommands, optimize::OptimizeArgs, report::ReportArgs,
    simple_example::SimpleExampleArgs,
};

mod file_utils;
mod generate;
mod optimize;
mod parsers;
mod report;
mod simple_example;
mod solution_printer;
mod solver_args;

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

#[cfg(not(feature = "dhat-heap"))]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Solves the built-in example: one vehicle with capacity 8 at (10,10)
    /// serving eight unit services
    SimpleExample {
        #[command(flatten)]
        args: SimpleExampleArgs,
    },
    /// Solves a JSON problem document
    Optimize {
        #[command(flatten)]
        args: OptimizeArgs,
    },
    /// Prints the report of a problem-with-solution document
    Report {
        #[command(flatten)]
        args: ReportArgs,
    },
    #[command(visible_alias = "g")]
    Generate {
        #[command(subcommand)]
        commands: GenerateSubcommands,
    },
}

fn main() -> Result<(), anyhow::Error> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Some(Commands::SimpleExample { args }) => simple_example::run(args)?,
        Some(Commands::Optimize { args }) => optimize::run(args)?,
        Some(Commands::Report { args }) => report::run(args)?,
        Some(Commands::Generate { commands }) => generate::run(commands)?,
        None => {
            tracing::warn!("No command given, see --help");
        }
    }

    Ok(())
}

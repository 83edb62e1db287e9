use atlas_optimizer::solver::{
    recreate::{
        best_insertion::BestInsertionSortStrategy, recreate_params::RecreateParams,
        recreate_strategy::RecreateStrategy,
    },
    ruin::{ruin_params::RuinParams, ruin_strategy::RuinStrategy},
    solver_params::{SolverAcceptorStrategy, SolverParams, Termination, Threads},
};
use clap::{Args, ValueEnum};

use crate::parsers;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RuinArg {
    Random,
    Cluster,
    Radial,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RecreateArg {
    Cheapest,
    BestRandom,
    BestDemand,
    BestFar,
    BestClose,
    BestTimeWindow,
}

#[derive(Args, Debug)]
pub struct SolverArgs {
    /// Wall-clock budget of the search (e.g., "30s", "5m", "PT1H30M")
    #[arg(short, long, value_parser = parsers::parse_duration)]
    timeout: Option<jiff::SignedDuration>,

    /// Iteration budget of every restart
    #[arg(short = 'n', long)]
    iterations: Option<usize>,

    /// Stops a restart after this many iterations without a new best solution
    #[arg(long)]
    max_iterations_without_improvement: Option<usize>,

    /// Number of threads running restarts, 0 uses every available core
    #[arg(long, default_value_t = 1)]
    threads: usize,

    #[arg(long, default_value_t = 1)]
    restarts: usize,

    #[arg(long)]
    seed: Option<u64>,

    /// Ruin strategies, drawn with equal weights
    #[arg(long, value_enum, value_delimiter = ',')]
    ruin: Vec<RuinArg>,

    /// Recreate strategies, drawn uniformly
    #[arg(long, value_enum, value_delimiter = ',')]
    recreate: Vec<RecreateArg>,

    /// Greedy threshold acceptance with this tolerance instead of the
    /// Schrimpf schedule, 1.0 only accepts improvements
    #[arg(long)]
    threshold: Option<f64>,

    /// Penalty per unassigned job
    #[arg(long)]
    unassigned_cost: Option<f64>,
}

impl SolverArgs {
    pub fn solver_params(&self) -> SolverParams {
        let defaults = SolverParams::default();

        let mut terminations = Vec::new();
        if let Some(timeout) = self.timeout {
            terminations.push(Termination::Duration(timeout));
        }
        if let Some(iterations) = self.iterations {
            terminations.push(Termination::Iterations(iterations));
        }
        if let Some(iterations) = self.max_iterations_without_improvement {
            terminations.push(Termination::IterationsWithoutImprovement(iterations));
        }
        if terminations.is_empty() {
            terminations = defaults.terminations.clone();
        }

        let ruin = if self.ruin.is_empty() {
            defaults.ruin.clone()
        } else {
            RuinParams {
                ruin_strategies: self
                    .ruin
                    .iter()
                    .map(|ruin| {
                        let strategy = match ruin {
                            RuinArg::Random => RuinStrategy::Random,
                            RuinArg::Cluster => RuinStrategy::Cluster,
                            RuinArg::Radial => RuinStrategy::Radial,
                        };
                        (strategy, 1.0)
                    })
                    .collect(),
                ..defaults.ruin.clone()
            }
        };

        let recreate = if self.recreate.is_empty() {
            defaults.recreate.clone()
        } else {
            RecreateParams {
                recreate_strategies: self
                    .recreate
                    .iter()
                    .map(|recreate| match recreate {
                        RecreateArg::Cheapest => RecreateStrategy::CheapestInsertion,
                        RecreateArg::BestRandom => {
                            RecreateStrategy::BestInsertion(BestInsertionSortStrategy::Random)
                        }
                        RecreateArg::BestDemand => {
                            RecreateStrategy::BestInsertion(BestInsertionSortStrategy::Demand)
                        }
                        RecreateArg::BestFar => {
                            RecreateStrategy::BestInsertion(BestInsertionSortStrategy::Far)
                        }
                        RecreateArg::BestClose => {
                            RecreateStrategy::BestInsertion(BestInsertionSortStrategy::Close)
                        }
                        RecreateArg::BestTimeWindow => {
                            RecreateStrategy::BestInsertion(BestInsertionSortStrategy::TimeWindow)
                        }
                    })
                    .collect(),
            }
        };

        SolverParams {
            terminations,
            solver_acceptor: match self.threshold {
                Some(tolerance) => SolverAcceptorStrategy::Threshold { tolerance },
                None => defaults.solver_acceptor.clone(),
            },
            ruin,
            recreate,
            search_threads: match self.threads {
                0 => Threads::Auto,
                1 => Threads::Single,
                threads => Threads::Multi(threads),
            },
            restarts: self.restarts.max(1),
            seed: self.seed.unwrap_or(defaults.seed),
            unassigned_job_cost: self.unassigned_cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        solver: SolverArgs,
    }

    #[test]
    fn test_recreate_strategies() {
        let cli = TestCli::try_parse_from(["atlas", "--recreate", "cheapest,best-time-window"])
            .unwrap();

        assert_eq!(
            cli.solver.solver_params().recreate.recreate_strategies,
            vec![
                RecreateStrategy::CheapestInsertion,
                RecreateStrategy::BestInsertion(BestInsertionSortStrategy::TimeWindow),
            ]
        );
    }

    #[test]
    fn test_threshold_and_budgets() {
        let cli = TestCli::try_parse_from(["atlas", "-n", "50", "--timeout", "5s", "--threshold", "1.0"])
            .unwrap();
        let params = cli.solver.solver_params();

        assert_eq!(
            params.terminations,
            vec![
                Termination::Duration(jiff::SignedDuration::from_secs(5)),
                Termination::Iterations(50),
            ]
        );
        assert_eq!(
            params.solver_acceptor,
            SolverAcceptorStrategy::Threshold { tolerance: 1.0 }
        );
    }
}

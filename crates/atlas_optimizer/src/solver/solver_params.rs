use jiff::SignedDuration;

use crate::problem::travel_cost_matrix::Cost;

use super::{recreate::recreate_params::RecreateParams, ruin::ruin_params::RuinParams};

#[derive(Clone, Debug)]
pub struct SolverParams {
    /// The search of a restart stops at the first termination met.
    pub terminations: Vec<Termination>,
    pub solver_acceptor: SolverAcceptorStrategy,

    pub ruin: RuinParams,
    pub recreate: RecreateParams,

    pub search_threads: Threads,
    /// Independent searches started from the construction solution.
    pub restarts: usize,
    pub seed: u64,

    /// Penalty per unassigned job, defaults to a value above the route cost
    /// of any solution of the problem.
    pub unassigned_job_cost: Option<Cost>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Termination {
    Duration(SignedDuration),
    Iterations(usize),
    IterationsWithoutImprovement(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Threads {
    Single,
    Auto,
    Multi(usize),
}

impl Threads {
    pub fn number_of_threads(&self) -> usize {
        match self {
            Threads::Single => 1,
            Threads::Multi(num) => (*num).max(1),
            Threads::Auto => std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SolverAcceptorStrategy {
    /// Accepts candidates costing at most `tolerance` times the current one.
    Threshold { tolerance: f64 },
    /// Starts from `initial_threshold_ratio` times the construction cost and
    /// halves the threshold every `alpha` share of the budget.
    Schrimpf {
        initial_threshold_ratio: f64,
        alpha: f64,
    },
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            terminations: vec![
                Termination::IterationsWithoutImprovement(2000),
                Termination::Iterations(10000),
                Termination::Duration(SignedDuration::from_mins(2)),
            ],
            solver_acceptor: SolverAcceptorStrategy::Schrimpf {
                initial_threshold_ratio: 0.05,
                alpha: 0.1,
            },
            ruin: RuinParams::default(),
            recreate: RecreateParams::default(),
            search_threads: Threads::Single,
            restarts: 1,
            seed: 2427121,
            unassigned_job_cost: None,
        }
    }
}

impl SolverParams {
    pub fn max_iterations(&self) -> Option<usize> {
        self.terminations
            .iter()
            .filter_map(|termination| match termination {
                Termination::Iterations(max_iterations) => Some(*max_iterations),
                _ => None,
            })
            .min()
    }

    pub fn max_duration(&self) -> Option<SignedDuration> {
        self.terminations
            .iter()
            .filter_map(|termination| match termination {
                Termination::Duration(max_duration) => Some(*max_duration),
                _ => None,
            })
            .min()
    }
}

use crate::{problem::travel_cost_matrix::Cost, solver::accepted_solution::AcceptedSolution};

use super::accept_solution::{AcceptSolution, AcceptSolutionContext};

/// Threshold accepting as described by Schrimpf et al. (2000): a candidate
/// is accepted when it costs less than the current solution plus a threshold
/// that halves every `alpha` share of the search budget.
#[derive(Clone, Debug)]
pub struct SchrimpfAcceptor {
    initial_threshold: Cost,
    alpha: f64,
}

impl SchrimpfAcceptor {
    pub fn new(initial_threshold: Cost, alpha: f64) -> Self {
        SchrimpfAcceptor {
            initial_threshold,
            alpha,
        }
    }

    pub fn threshold(&self, progress: f64) -> Cost {
        if self.alpha <= 0.0 {
            return 0.0;
        }

        self.initial_threshold * (-std::f64::consts::LN_2 * progress / self.alpha).exp()
    }
}

impl AcceptSolution for SchrimpfAcceptor {
    fn accept(
        &self,
        current_solution: &AcceptedSolution,
        candidate: &AcceptedSolution,
        context: AcceptSolutionContext,
    ) -> bool {
        candidate.is_feasible()
            && candidate.total_cost()
                < current_solution.total_cost() + self.threshold(context.progress)
    }
}

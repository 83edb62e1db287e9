use crate::solver::accepted_solution::AcceptedSolution;

use super::accept_solution::{AcceptSolution, AcceptSolutionContext};

/// Accepts candidates costing at most `tolerance` times the current cost.
/// A tolerance of 1.0 is a greedy acceptor.
#[derive(Clone, Debug)]
pub struct ThresholdAcceptor {
    tolerance: f64,
}

impl ThresholdAcceptor {
    pub fn new(tolerance: f64) -> Self {
        ThresholdAcceptor { tolerance }
    }
}

impl AcceptSolution for ThresholdAcceptor {
    fn accept(
        &self,
        current_solution: &AcceptedSolution,
        candidate: &AcceptedSolution,
        _context: AcceptSolutionContext,
    ) -> bool {
        candidate.is_feasible()
            && candidate.total_cost() <= current_solution.total_cost() * self.tolerance
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        solver::{
            score::{Score, ScoreAnalysis},
            solution::working_solution::WorkingSolution,
        },
        test_utils,
    };

    fn solution_with_score(score: Score) -> AcceptedSolution {
        let problem = test_utils::create_test_problem(
            test_utils::create_location_grid(1, 2),
            test_utils::create_basic_services(vec![1]),
            test_utils::create_basic_vehicles(vec![0]),
        );

        AcceptedSolution {
            solution: WorkingSolution::new(Arc::new(problem)),
            score,
            score_analysis: ScoreAnalysis::default(),
        }
    }

    fn context() -> AcceptSolutionContext {
        AcceptSolutionContext {
            iteration: 0,
            progress: 0.0,
        }
    }

    #[test]
    fn test_greedy_accepts_equal_cost() {
        let acceptor = ThresholdAcceptor::new(1.0);
        let current = solution_with_score(Score::soft(100.0));

        assert!(acceptor.accept(&current, &solution_with_score(Score::soft(100.0)), context()));
        assert!(acceptor.accept(&current, &solution_with_score(Score::soft(99.0)), context()));
        assert!(!acceptor.accept(&current, &solution_with_score(Score::soft(100.5)), context()));
    }

    #[test]
    fn test_accepts_within_tolerance() {
        let acceptor = ThresholdAcceptor::new(1.1);
        let current = solution_with_score(Score::soft(100.0));

        assert!(acceptor.accept(&current, &solution_with_score(Score::soft(108.0)), context()));
        assert!(!acceptor.accept(&current, &solution_with_score(Score::soft(112.0)), context()));
    }

    #[test]
    fn test_rejects_infeasible_candidates() {
        let acceptor = ThresholdAcceptor::new(1.5);
        let current = solution_with_score(Score::soft(100.0));
        let candidate = solution_with_score(Score::new(1.0, 50.0));

        assert!(!acceptor.accept(&current, &candidate, context()));
    }
}

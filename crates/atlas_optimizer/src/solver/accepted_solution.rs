use crate::problem::travel_cost_matrix::Cost;

use super::{
    constraints::constraint::Constraint,
    score::{Score, ScoreAnalysis},
    solution::working_solution::WorkingSolution,
};

/// A solution together with its score, as retained by the search.
#[derive(Clone, Debug)]
pub struct AcceptedSolution {
    pub solution: WorkingSolution,
    pub score: Score,
    pub score_analysis: ScoreAnalysis,
}

impl AcceptedSolution {
    pub fn new(solution: WorkingSolution, constraints: &[Constraint]) -> Self {
        let (score, score_analysis) = solution.compute_solution_score(constraints);
        AcceptedSolution {
            solution,
            score,
            score_analysis,
        }
    }

    pub fn is_feasible(&self) -> bool {
        !self.score.is_failure()
    }

    /// Fixed and transport costs of the used vehicles plus the unassigned
    /// job penalties.
    pub fn total_cost(&self) -> Cost {
        self.score.soft_score
    }

    pub fn unassigned_count(&self) -> usize {
        self.solution.unassigned_jobs().len()
    }

    pub fn vehicles_used(&self) -> usize {
        self.solution.non_empty_routes_count()
    }
}

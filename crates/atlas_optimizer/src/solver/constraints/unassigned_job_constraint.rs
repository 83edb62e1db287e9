use crate::{
    problem::travel_cost_matrix::Cost,
    solver::{
        insertion_context::InsertionContext, score::Score, score_level::ScoreLevel,
        solution::working_solution::WorkingSolution,
    },
};

use super::global_constraint::GlobalConstraint;

/// Flat penalty per job left out of every route.
#[derive(Clone, Debug)]
pub struct UnassignedJobConstraint {
    cost_per_job: Cost,
}

impl UnassignedJobConstraint {
    pub fn new(cost_per_job: Cost) -> Self {
        UnassignedJobConstraint { cost_per_job }
    }
}

const SCORE_LEVEL: ScoreLevel = ScoreLevel::Soft;

impl GlobalConstraint for UnassignedJobConstraint {
    fn score_level(&self) -> ScoreLevel {
        SCORE_LEVEL
    }

    fn compute_score(&self, solution: &WorkingSolution) -> Score {
        Score::of(
            self.score_level(),
            solution.unassigned_jobs().len() as f64 * self.cost_per_job,
        )
    }

    fn compute_insertion_score(&self, _context: &InsertionContext) -> Score {
        Score::zero()
    }
}

use crate::solver::{
    insertion_context::InsertionContext, score::Score, score_level::ScoreLevel,
    solution::working_solution::WorkingSolution,
};

use super::global_constraint::GlobalConstraint;

#[derive(Clone, Debug)]
pub struct TransportCostConstraint;

const SCORE_LEVEL: ScoreLevel = ScoreLevel::Soft;

impl GlobalConstraint for TransportCostConstraint {
    fn score_level(&self) -> ScoreLevel {
        SCORE_LEVEL
    }

    fn compute_score(&self, solution: &WorkingSolution) -> Score {
        Score::of(self.score_level(), solution.transport_cost())
    }

    fn compute_insertion_score(&self, context: &InsertionContext) -> Score {
        Score::of(
            self.score_level(),
            context
                .route()
                .transport_cost_delta(context.problem(), context.insertion),
        )
    }
}

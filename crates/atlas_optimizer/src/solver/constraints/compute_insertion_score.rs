use crate::{
    problem::travel_cost_matrix::Cost,
    solver::{insertion_context::InsertionContext, score::Score, score_level::ScoreLevel},
};

use super::constraint::Constraint;

/// Feasibility and marginal cost of one candidate insertion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsertionEvaluation {
    pub feasible: bool,
    pub delta_cost: Cost,
}

/// Sums the insertion scores of all constraints, hard ones first. Stops at
/// the first hard failure, soft constraints are then not evaluated.
pub fn compute_insertion_score(constraints: &[Constraint], context: &InsertionContext) -> Score {
    let mut score = Score::zero();

    for constraint in constraints
        .iter()
        .filter(|c| c.score_level() == ScoreLevel::Hard)
    {
        score += constraint.compute_insertion_score(context);

        if score.is_failure() {
            return score;
        }
    }

    for constraint in constraints
        .iter()
        .filter(|c| c.score_level() == ScoreLevel::Soft)
    {
        score += constraint.compute_insertion_score(context);
    }

    score
}

pub fn evaluate_insertion(
    constraints: &[Constraint],
    context: &InsertionContext,
) -> InsertionEvaluation {
    let score = compute_insertion_score(constraints, context);
    InsertionEvaluation {
        feasible: !score.is_failure(),
        delta_cost: score.soft_score,
    }
}

use crate::{
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        insertion_context::InsertionContext, score::Score, score_level::ScoreLevel,
        solution::route::WorkingSolutionRoute,
    },
};

use super::route_constraint::RouteConstraint;

const SCORE_LEVEL: ScoreLevel = ScoreLevel::Hard;

#[derive(Clone, Debug)]
pub struct ShiftConstraint;

impl RouteConstraint for ShiftConstraint {
    fn score_level(&self) -> ScoreLevel {
        SCORE_LEVEL
    }

    fn compute_score(
        &self,
        problem: &VehicleRoutingProblem,
        route: &WorkingSolutionRoute,
    ) -> Score {
        Score::of(self.score_level(), route.shift_overtime(problem))
    }

    // The shift end is part of the schedule check of the time window constraint.
    fn compute_insertion_score(&self, _context: &InsertionContext) -> Score {
        Score::zero()
    }
}

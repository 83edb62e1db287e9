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
pub struct CapacityConstraint;

impl RouteConstraint for CapacityConstraint {
    fn score_level(&self) -> ScoreLevel {
        SCORE_LEVEL
    }

    fn compute_score(
        &self,
        problem: &VehicleRoutingProblem,
        route: &WorkingSolutionRoute,
    ) -> Score {
        Score::of(self.score_level(), route.over_capacity(problem))
    }

    fn compute_insertion_score(&self, context: &InsertionContext) -> Score {
        if context
            .route()
            .can_carry(context.problem(), context.insertion)
        {
            Score::zero()
        } else {
            Score::of(self.score_level(), 1.0)
        }
    }
}

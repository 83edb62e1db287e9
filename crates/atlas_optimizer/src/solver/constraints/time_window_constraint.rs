use crate::{
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        insertion_context::InsertionContext, score::Score, score_level::ScoreLevel,
        solution::route::WorkingSolutionRoute,
    },
};

use super::route_constraint::RouteConstraint;

const SCORE_LEVEL: ScoreLevel = ScoreLevel::Hard;

/// Rejects insertions that close a time window of the inserted activities or
/// of any activity after them, or push the route past the vehicle shift.
#[derive(Clone, Debug)]
pub struct TimeWindowConstraint;

impl RouteConstraint for TimeWindowConstraint {
    fn score_level(&self) -> ScoreLevel {
        SCORE_LEVEL
    }

    fn compute_score(
        &self,
        problem: &VehicleRoutingProblem,
        route: &WorkingSolutionRoute,
    ) -> Score {
        Score::of(
            self.score_level(),
            route.time_window_violations(problem) as f64,
        )
    }

    fn compute_insertion_score(&self, context: &InsertionContext) -> Score {
        if context
            .route()
            .is_schedule_feasible(context.problem(), context.insertion)
        {
            Score::zero()
        } else {
            Score::of(self.score_level(), 1.0)
        }
    }
}

use crate::{
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        insertion_context::InsertionContext, score::Score, score_level::ScoreLevel,
        solution::route::WorkingSolutionRoute,
    },
};

use super::route_constraint::RouteConstraint;

const SCORE_LEVEL: ScoreLevel = ScoreLevel::Soft;

/// Fixed cost of every vehicle that leaves the depot.
#[derive(Clone, Debug)]
pub struct VehicleCostConstraint;

impl RouteConstraint for VehicleCostConstraint {
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
            problem.fixed_vehicle_cost(route.vehicle(problem)),
        )
    }

    fn compute_insertion_score(&self, context: &InsertionContext) -> Score {
        let route = context.route();
        if route.is_empty() {
            let problem = context.problem();
            Score::of(
                self.score_level(),
                problem.fixed_vehicle_cost(route.vehicle(problem)),
            )
        } else {
            Score::zero()
        }
    }
}

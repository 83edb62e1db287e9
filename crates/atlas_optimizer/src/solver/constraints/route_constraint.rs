use crate::{
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        insertion_context::InsertionContext, score::Score, score_level::ScoreLevel,
        solution::route::WorkingSolutionRoute,
    },
};

use super::{
    capacity_constraint::CapacityConstraint, shift_constraint::ShiftConstraint,
    time_window_constraint::TimeWindowConstraint, vehicle_cost_constraint::VehicleCostConstraint,
};

pub trait RouteConstraint {
    fn score_level(&self) -> ScoreLevel;

    fn compute_score(&self, problem: &VehicleRoutingProblem, route: &WorkingSolutionRoute)
    -> Score;
    fn compute_insertion_score(&self, context: &InsertionContext) -> Score;
}

#[derive(Clone, Debug)]
pub enum RouteConstraintType {
    Capacity(CapacityConstraint),
    TimeWindow(TimeWindowConstraint),
    Shift(ShiftConstraint),
    VehicleCost(VehicleCostConstraint),
}

impl RouteConstraintType {
    pub fn constraint_name(&self) -> &'static str {
        match self {
            RouteConstraintType::Capacity(_) => "capacity",
            RouteConstraintType::TimeWindow(_) => "time_window",
            RouteConstraintType::Shift(_) => "shift",
            RouteConstraintType::VehicleCost(_) => "vehicle_cost",
        }
    }
}

impl RouteConstraint for RouteConstraintType {
    fn score_level(&self) -> ScoreLevel {
        match self {
            RouteConstraintType::Capacity(c) => c.score_level(),
            RouteConstraintType::TimeWindow(c) => c.score_level(),
            RouteConstraintType::Shift(c) => c.score_level(),
            RouteConstraintType::VehicleCost(c) => c.score_level(),
        }
    }

    fn compute_insertion_score(&self, context: &InsertionContext) -> Score {
        match self {
            RouteConstraintType::Capacity(c) => c.compute_insertion_score(context),
            RouteConstraintType::TimeWindow(c) => c.compute_insertion_score(context),
            RouteConstraintType::Shift(c) => c.compute_insertion_score(context),
            RouteConstraintType::VehicleCost(c) => c.compute_insertion_score(context),
        }
    }

    fn compute_score(
        &self,
        problem: &VehicleRoutingProblem,
        route: &WorkingSolutionRoute,
    ) -> Score {
        match self {
            RouteConstraintType::Capacity(c) => c.compute_score(problem, route),
            RouteConstraintType::TimeWindow(c) => c.compute_score(problem, route),
            RouteConstraintType::Shift(c) => c.compute_score(problem, route),
            RouteConstraintType::VehicleCost(c) => c.compute_score(problem, route),
        }
    }
}

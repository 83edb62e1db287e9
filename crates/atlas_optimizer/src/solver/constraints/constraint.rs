use crate::{
    problem::{travel_cost_matrix::Cost, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        insertion_context::InsertionContext, score::Score, score_level::ScoreLevel,
        solution::working_solution::WorkingSolution,
    },
};

use super::{
    capacity_constraint::CapacityConstraint,
    global_constraint::{GlobalConstraint, GlobalConstraintType},
    route_constraint::{RouteConstraint, RouteConstraintType},
    shift_constraint::ShiftConstraint,
    time_window_constraint::TimeWindowConstraint,
    transport_cost_constraint::TransportCostConstraint,
    unassigned_job_constraint::UnassignedJobConstraint,
    vehicle_cost_constraint::VehicleCostConstraint,
};

#[derive(Clone, Debug)]
pub enum Constraint {
    Global(GlobalConstraintType),
    Route(RouteConstraintType),
}

impl Constraint {
    pub fn score_level(&self) -> ScoreLevel {
        match self {
            Constraint::Global(constraint) => constraint.score_level(),
            Constraint::Route(constraint) => constraint.score_level(),
        }
    }

    pub fn compute_insertion_score(&self, context: &InsertionContext) -> Score {
        match self {
            Constraint::Global(constraint) => constraint.compute_insertion_score(context),
            Constraint::Route(constraint) => constraint.compute_insertion_score(context),
        }
    }

    pub fn compute_score(
        &self,
        problem: &VehicleRoutingProblem,
        solution: &WorkingSolution,
    ) -> Score {
        match self {
            Constraint::Global(constraint) => constraint.compute_score(solution),
            Constraint::Route(constraint) => solution
                .non_empty_routes_iter()
                .fold(Score::zero(), |acc, route| {
                    acc + constraint.compute_score(problem, route)
                }),
        }
    }

    pub fn constraint_name(&self) -> &'static str {
        match self {
            Constraint::Global(c) => c.constraint_name(),
            Constraint::Route(c) => c.constraint_name(),
        }
    }
}

/// Constraints every solver run scores with. Time constraints are only
/// added when the problem carries time windows or shifts.
pub fn default_constraints(
    problem: &VehicleRoutingProblem,
    unassigned_job_cost: Cost,
) -> Vec<Constraint> {
    let mut constraints = vec![
        Constraint::Route(RouteConstraintType::Capacity(CapacityConstraint)),
        Constraint::Global(GlobalConstraintType::TransportCost(TransportCostConstraint)),
        Constraint::Route(RouteConstraintType::VehicleCost(VehicleCostConstraint)),
        Constraint::Global(GlobalConstraintType::UnassignedJobCost(
            UnassignedJobConstraint::new(unassigned_job_cost),
        )),
    ];

    if problem.has_time_windows() {
        constraints.push(Constraint::Route(RouteConstraintType::TimeWindow(
            TimeWindowConstraint,
        )));
        constraints.push(Constraint::Route(RouteConstraintType::Shift(ShiftConstraint)));
    }

    constraints
}

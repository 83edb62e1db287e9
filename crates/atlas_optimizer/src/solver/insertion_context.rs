use crate::{
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::solution::route::WorkingSolutionRoute,
};

use super::{insertion::Insertion, solution::working_solution::WorkingSolution};

/// What a constraint sees when scoring a candidate insertion.
pub struct InsertionContext<'a> {
    pub problem: &'a VehicleRoutingProblem,
    pub solution: &'a WorkingSolution,
    pub insertion: &'a Insertion,
}

impl<'a> InsertionContext<'a> {
    pub fn new(
        problem: &'a VehicleRoutingProblem,
        solution: &'a WorkingSolution,
        insertion: &'a Insertion,
    ) -> Self {
        InsertionContext {
            problem,
            solution,
            insertion,
        }
    }

    pub fn problem(&self) -> &VehicleRoutingProblem {
        self.problem
    }

    pub fn route(&self) -> &WorkingSolutionRoute {
        self.solution.route(self.insertion.route_id())
    }
}

use rand::rngs::SmallRng;

use crate::{
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::constraints::constraint::Constraint,
};

pub struct RecreateContext<'a> {
    pub rng: &'a mut SmallRng,
    pub constraints: &'a [Constraint],
    pub problem: &'a VehicleRoutingProblem,
}

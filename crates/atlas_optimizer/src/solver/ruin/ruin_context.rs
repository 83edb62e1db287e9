use rand::Rng;

use crate::problem::vehicle_routing_problem::VehicleRoutingProblem;

pub struct RuinContext<'a, R>
where
    R: Rng,
{
    pub problem: &'a VehicleRoutingProblem,
    pub rng: &'a mut R,
    pub num_jobs_to_remove: usize,
}

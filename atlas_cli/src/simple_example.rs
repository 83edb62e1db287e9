use std::path::PathBuf;

use atlas_optimizer::{
    error::VrpError,
    problem::{
        capacity::Capacity,
        location::Location,
        service::ServiceBuilder,
        vehicle::VehicleBuilder,
        vehicle_routing_problem::{VehicleRoutingProblem, VehicleRoutingProblemBuilder},
        vehicle_type::VehicleTypeBuilder,
    },
};
use clap::Args;

use crate::{optimize, solution_printer::Print, solver_args::SolverArgs};

const WEIGHT_INDEX: usize = 0;

const SERVICE_LOCATIONS: [(f64, f64); 8] = [
    (5.0, 7.0),
    (7.0, 15.0),
    (15.0, 7.0),
    (15.0, 13.0),
    (20.0, 7.0),
    (21.0, 10.0),
    (15.0, 8.0),
    (19.0, 2.0),
];

#[derive(Args)]
pub struct SimpleExampleArgs {
    #[arg(short = 'o', long, default_value = "output/problem-with-solution.json")]
    out: PathBuf,

    #[command(flatten)]
    solver: SolverArgs,
}

/// One vehicle of capacity 8 starting at (10,10) and eight services with a
/// demand of 1.
pub fn simple_problem() -> Result<VehicleRoutingProblem, VrpError> {
    let mut builder = VehicleRoutingProblemBuilder::default();

    let mut vehicle_type = VehicleTypeBuilder::default();
    vehicle_type
        .set_type_id("vehicleType")
        .add_capacity_dimension(WEIGHT_INDEX, 8.0);
    builder.add_vehicle_type(vehicle_type.build());

    let depot = builder.add_location(Location::from_cartesian(10.0, 10.0));
    let mut vehicle = VehicleBuilder::default();
    vehicle
        .set_vehicle_id("vehicle")
        .set_vehicle_type_id(0)
        .set_start_location_id(depot.get());
    builder.add_vehicle(vehicle.build()?);

    for (index, &(x, y)) in SERVICE_LOCATIONS.iter().enumerate() {
        let location_id = builder.add_location(Location::from_cartesian(x, y));

        let mut service = ServiceBuilder::default();
        service
            .set_external_id((index + 1).to_string())
            .set_location_id(location_id.get())
            .set_demand(Capacity::from_vec(vec![1.0]));
        builder.add_service(service.build()?);
    }

    builder.build()
}

pub fn run(args: SimpleExampleArgs) -> Result<(), anyhow::Error> {
    let problem = simple_problem()?;

    optimize::solve(problem, args.solver.solver_params(), &args.out, Print::Verbose)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_problem() {
        let problem = simple_problem().unwrap();

        assert_eq!(problem.jobs().len(), 8);
        assert_eq!(problem.vehicles().len(), 1);
        assert_eq!(problem.locations().len(), 9);
        assert_eq!(problem.vehicle_types()[0].capacity().get(WEIGHT_INDEX), 8.0);
    }
}

use std::sync::Arc;

use rand::RngCore;

use crate::{
    problem::{
        capacity::Capacity,
        location::Location,
        service::{Service, ServiceBuilder},
        vehicle::{Vehicle, VehicleBuilder},
        vehicle_routing_problem::{VehicleRoutingProblem, VehicleRoutingProblemBuilder},
        vehicle_type::{VehicleType, VehicleTypeBuilder},
    },
    solver::{
        insertion::{Insertion, ServiceInsertion},
        solution::{route_id::RouteIdx, working_solution::WorkingSolution},
    },
};

/// Locations on a unit grid, row by row: location `y * cols + x` is `(x, y)`.
pub fn create_location_grid(rows: usize, cols: usize) -> Vec<Location> {
    let mut locations = Vec::new();

    for y in 0..rows {
        for x in 0..cols {
            let location = Location::from_cartesian(x as f64, y as f64);
            locations.push(location);
        }
    }

    locations
}

pub fn create_locations(locations: Vec<(f64, f64)>) -> Vec<Location> {
    locations
        .iter()
        .map(|&(x, y)| Location::from_cartesian(x, y))
        .collect()
}

pub fn create_basic_services(location_ids: Vec<usize>) -> Vec<Service> {
    location_ids
        .iter()
        .enumerate()
        .map(|(index, &location_id)| {
            let mut builder = ServiceBuilder::default();

            builder.set_location_id(location_id);
            builder.set_external_id(index.to_string());
            builder.build().unwrap()
        })
        .collect()
}

pub fn create_demand_services(location_ids: Vec<usize>, demand: f64) -> Vec<Service> {
    location_ids
        .iter()
        .enumerate()
        .map(|(index, &location_id)| {
            let mut builder = ServiceBuilder::default();

            builder.set_location_id(location_id);
            builder.set_external_id(index.to_string());
            builder.set_demand(Capacity::from_vec(vec![demand]));
            builder.build().unwrap()
        })
        .collect()
}

pub fn create_basic_vehicles(location_ids: Vec<usize>) -> Vec<Vehicle> {
    location_ids
        .iter()
        .enumerate()
        .map(|(index, &location_id)| {
            let mut builder = VehicleBuilder::default();
            builder.set_start_location_id(location_id);
            builder.set_vehicle_id(index.to_string());
            builder.set_vehicle_type_id(0);
            builder.build().unwrap()
        })
        .collect()
}

pub fn create_vehicle_type(capacity: f64) -> VehicleType {
    let mut builder = VehicleTypeBuilder::default();
    builder.set_type_id("test_type");
    builder.set_capacity(Capacity::from_vec(vec![capacity]));
    builder.build()
}

/// Problem with a single uncapacitated vehicle type.
pub fn create_test_problem(
    locations: Vec<Location>,
    services: Vec<Service>,
    vehicles: Vec<Vehicle>,
) -> VehicleRoutingProblem {
    let mut builder = VehicleRoutingProblemBuilder::default();

    builder.set_locations(locations);
    builder.add_vehicle_type(VehicleTypeBuilder::default().build());
    builder.set_vehicles(vehicles);
    builder.set_services(services);

    builder.build().unwrap()
}

pub fn capacitated_problem_builder(
    locations: Vec<Location>,
    vehicle_location_ids: Vec<usize>,
    capacity: f64,
) -> VehicleRoutingProblemBuilder {
    let mut builder = VehicleRoutingProblemBuilder::default();

    builder.set_locations(locations);
    builder.add_vehicle_type(create_vehicle_type(capacity));
    builder.set_vehicles(create_basic_vehicles(vehicle_location_ids));

    builder
}

pub fn create_capacitated_problem(
    locations: Vec<Location>,
    services: Vec<Service>,
    vehicle_location_ids: Vec<usize>,
    capacity: f64,
) -> VehicleRoutingProblem {
    let mut builder = capacitated_problem_builder(locations, vehicle_location_ids, capacity);
    builder.set_services(services);
    builder.build().unwrap()
}

pub struct TestRoute {
    pub vehicle_id: usize,
    pub service_ids: Vec<usize>,
}

/// Inserts the services of each test route in order, in the route of its
/// vehicle.
pub fn create_test_working_solution(
    problem: Arc<VehicleRoutingProblem>,
    routes: Vec<TestRoute>,
) -> WorkingSolution {
    let mut solution = WorkingSolution::new(problem);

    for route in routes.iter() {
        for (index, &service_id) in route.service_ids.iter().enumerate() {
            solution.insert(&Insertion::Service(ServiceInsertion {
                route_id: RouteIdx::new(route.vehicle_id),
                job_index: service_id.into(),
                position: index,
            }));
        }
    }

    solution
}

pub struct MockRng {
    data: Vec<u64>,
    index: usize,
}

impl MockRng {
    pub fn new(data: Vec<u64>) -> Self {
        MockRng { data, index: 0 }
    }
}

impl RngCore for MockRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        let value = self.data[self.index % self.data.len()];
        self.index = (self.index + 1) % self.data.len();
        value
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for byte in dst.iter_mut() {
            *byte = 0;
        }
    }
}

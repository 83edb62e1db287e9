use fxhash::FxHashSet;
use jiff::SignedDuration;
use tracing::warn;

use crate::{
    error::{ProblemViolation, VrpError},
    problem::{
        fleet::{Fleet, FleetSize},
        job::{ActivityId, Job, JobActivity, JobIdx},
        service::Service,
        shipment::Shipment,
        vehicle_type::{VehicleType, VehicleTypeIdx},
    },
    utils::enumerate_idx::EnumerateIdx,
};

use super::{
    distance_method::DistanceMethod,
    job_location_index::JobLocationIndex,
    location::{Location, LocationIdx},
    travel_cost_matrix::{Cost, Distance, TravelMatrices},
    vehicle::{Vehicle, VehicleIdx},
};

/// Immutable, validated description of a routing problem. Built with
/// [`VehicleRoutingProblemBuilder`].
#[derive(Debug, Clone)]
pub struct VehicleRoutingProblem {
    locations: Vec<Location>,
    fleet: Fleet,
    vehicle_types: Vec<VehicleType>,
    jobs: Vec<Job>,
    travel_matrices: TravelMatrices,
    job_location_index: JobLocationIndex,
    distance_method: DistanceMethod,

    has_time_windows: bool,
    capacity_dimensions: usize,
    max_arc_cost: Cost,
}

impl VehicleRoutingProblem {
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn job(&self, job_id: JobIdx) -> &Job {
        &self.jobs[job_id]
    }

    pub fn services_iter(&self) -> impl Iterator<Item = &Service> {
        self.jobs.iter().filter_map(|job| match job {
            Job::Service(service) => Some(service),
            Job::Shipment(_) => None,
        })
    }

    pub fn shipments_iter(&self) -> impl Iterator<Item = &Shipment> {
        self.jobs.iter().filter_map(|job| match job {
            Job::Shipment(shipment) => Some(shipment),
            Job::Service(_) => None,
        })
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        self.fleet.vehicles()
    }

    pub fn vehicle(&self, vehicle_id: VehicleIdx) -> &Vehicle {
        self.fleet.vehicle(vehicle_id)
    }

    pub fn vehicle_types(&self) -> &[VehicleType] {
        &self.vehicle_types
    }

    pub fn vehicle_type(&self, vehicle_type_id: VehicleTypeIdx) -> &VehicleType {
        &self.vehicle_types[vehicle_type_id]
    }

    pub fn vehicle_type_of(&self, vehicle: &Vehicle) -> &VehicleType {
        &self.vehicle_types[vehicle.vehicle_type_id()]
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn location(&self, location_id: LocationIdx) -> &Location {
        &self.locations[location_id]
    }

    pub fn distance_method(&self) -> DistanceMethod {
        self.distance_method
    }

    pub fn travel_matrices(&self) -> &TravelMatrices {
        &self.travel_matrices
    }

    pub fn activity(&self, activity_id: ActivityId) -> JobActivity<'_> {
        match (activity_id, &self.jobs[activity_id.job_id()]) {
            (_, Job::Service(service)) => JobActivity::Service(service),
            (ActivityId::ShipmentDelivery(_), Job::Shipment(shipment)) => {
                JobActivity::ShipmentDelivery(shipment)
            }
            (_, Job::Shipment(shipment)) => JobActivity::ShipmentPickup(shipment),
        }
    }

    /// Checked travel cost between two locations.
    pub fn cost(&self, from: LocationIdx, to: LocationIdx) -> Result<Cost, VrpError> {
        self.travel_matrices.cost(from, to)
    }

    pub fn travel_distance(&self, from: LocationIdx, to: LocationIdx) -> Distance {
        self.travel_matrices.travel_distance(from, to)
    }

    pub fn travel_time(&self, from: LocationIdx, to: LocationIdx) -> SignedDuration {
        self.travel_matrices.travel_time(from, to)
    }

    /// Transport cost of an arc driven by `vehicle`, weighted by its type.
    pub fn travel_cost(&self, vehicle: &Vehicle, from: LocationIdx, to: LocationIdx) -> Cost {
        if from == to {
            return 0.0;
        }

        let vehicle_type = self.vehicle_type_of(vehicle);
        vehicle_type.cost_per_distance() * self.travel_distance(from, to)
            + vehicle_type.cost_per_time() * self.travel_matrices.travel_time_secs(from, to)
    }

    pub fn travel_cost_or_zero(
        &self,
        vehicle: &Vehicle,
        from: Option<LocationIdx>,
        to: Option<LocationIdx>,
    ) -> Cost {
        if let (Some(from), Some(to)) = (from, to) {
            self.travel_cost(vehicle, from, to)
        } else {
            0.0
        }
    }

    pub fn fixed_vehicle_cost(&self, vehicle: &Vehicle) -> Cost {
        self.vehicle_type_of(vehicle).fixed_cost()
    }

    /// Penalty per unassigned job. Larger than the route cost of any
    /// solution, so fewer unassigned jobs always means a lower total cost.
    ///
    /// Every used route serves at least one job and drives at most one arc
    /// per activity plus the way back.
    pub fn default_unassigned_job_cost(&self) -> Cost {
        let max_fixed_cost = self
            .vehicle_types
            .iter()
            .map(VehicleType::fixed_cost)
            .fold(0.0, f64::max);

        let num_jobs = self.jobs.len() as f64;
        let num_activities = self
            .jobs
            .iter()
            .map(|job| if matches!(job, Job::Shipment(_)) { 2.0 } else { 1.0 })
            .sum::<f64>();

        num_jobs * max_fixed_cost + (num_activities + num_jobs) * self.max_arc_cost + 1.0
    }

    pub fn nearest_jobs_of_location(
        &self,
        location_id: LocationIdx,
    ) -> impl Iterator<Item = ActivityId> + '_ {
        self.job_location_index
            .nearest_activities(&self.locations[location_id])
    }

    pub fn nearest_jobs(&self, activity_id: ActivityId) -> impl Iterator<Item = ActivityId> + '_ {
        let location_id = self.activity(activity_id).location_id();
        self.nearest_jobs_of_location(location_id)
    }

    pub fn has_time_windows(&self) -> bool {
        self.has_time_windows
    }

    pub fn capacity_dimensions(&self) -> usize {
        self.capacity_dimensions
    }
}

#[derive(Default)]
pub struct VehicleRoutingProblemBuilder {
    locations: Vec<Location>,
    vehicle_types: Vec<VehicleType>,
    vehicles: Vec<Vehicle>,
    jobs: Vec<Job>,
    fleet_size: FleetSize,
    distance_method: DistanceMethod,
    travel_matrices: Option<TravelMatrices>,
}

impl VehicleRoutingProblemBuilder {
    pub fn set_locations(&mut self, locations: Vec<Location>) -> &mut VehicleRoutingProblemBuilder {
        self.locations = locations;
        self
    }

    pub fn add_location(&mut self, location: Location) -> LocationIdx {
        self.locations.push(location);
        LocationIdx::new(self.locations.len() - 1)
    }

    pub fn set_vehicle_types(
        &mut self,
        vehicle_types: Vec<VehicleType>,
    ) -> &mut VehicleRoutingProblemBuilder {
        self.vehicle_types = vehicle_types;
        self
    }

    pub fn add_vehicle_type(&mut self, vehicle_type: VehicleType) -> VehicleTypeIdx {
        self.vehicle_types.push(vehicle_type);
        VehicleTypeIdx::new(self.vehicle_types.len() - 1)
    }

    pub fn set_vehicles(&mut self, vehicles: Vec<Vehicle>) -> &mut VehicleRoutingProblemBuilder {
        self.vehicles = vehicles;
        self
    }

    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> VehicleIdx {
        self.vehicles.push(vehicle);
        VehicleIdx::new(self.vehicles.len() - 1)
    }

    pub fn set_services(&mut self, services: Vec<Service>) -> &mut VehicleRoutingProblemBuilder {
        self.jobs = services.into_iter().map(Job::Service).collect();
        self
    }

    pub fn set_jobs(&mut self, jobs: Vec<Job>) -> &mut VehicleRoutingProblemBuilder {
        self.jobs = jobs;
        self
    }

    pub fn add_service(&mut self, service: Service) -> JobIdx {
        self.jobs.push(Job::Service(service));
        JobIdx::new(self.jobs.len() - 1)
    }

    pub fn add_shipment(&mut self, shipment: Shipment) -> JobIdx {
        self.jobs.push(Job::Shipment(shipment));
        JobIdx::new(self.jobs.len() - 1)
    }

    pub fn set_fleet_size(&mut self, fleet_size: FleetSize) -> &mut VehicleRoutingProblemBuilder {
        self.fleet_size = fleet_size;
        self
    }

    pub fn set_distance_method(
        &mut self,
        distance_method: DistanceMethod,
    ) -> &mut VehicleRoutingProblemBuilder {
        self.distance_method = distance_method;
        self
    }

    /// Explicit matrices replace the ones derived from coordinates.
    pub fn set_travel_matrices(
        &mut self,
        travel_matrices: TravelMatrices,
    ) -> &mut VehicleRoutingProblemBuilder {
        self.travel_matrices = Some(travel_matrices);
        self
    }

    pub fn build(self) -> Result<VehicleRoutingProblem, VrpError> {
        self.validate()?;
        self.warn_on_uncovered_dimensions();

        let travel_matrices = match self.travel_matrices {
            Some(matrices) => matrices,
            None => TravelMatrices::from_distance_method(&self.locations, self.distance_method),
        };

        let job_location_index =
            JobLocationIndex::new(&self.locations, &self.jobs, self.distance_method);

        let capacity_dimensions = self
            .jobs
            .iter()
            .map(|job| job.demand().len())
            .chain(
                self.vehicle_types
                    .iter()
                    .map(|vehicle_type| vehicle_type.capacity().len()),
            )
            .max()
            .unwrap_or(0);

        let max_arc_cost = self
            .vehicle_types
            .iter()
            .map(|vehicle_type| {
                vehicle_type.cost_per_distance() * travel_matrices.max_distance()
                    + vehicle_type.cost_per_time() * travel_matrices.max_time()
            })
            .fold(0.0, f64::max);

        Ok(VehicleRoutingProblem {
            has_time_windows: self.jobs.iter().any(Job::has_time_windows)
                || self.vehicles.iter().any(|vehicle| vehicle.shift().is_some()),
            capacity_dimensions,
            max_arc_cost,
            locations: self.locations,
            fleet: Fleet::new(self.vehicles, self.fleet_size),
            vehicle_types: self.vehicle_types,
            jobs: self.jobs,
            travel_matrices,
            job_location_index,
            distance_method: self.distance_method,
        })
    }

    fn validate(&self) -> Result<(), ProblemViolation> {
        let num_locations = self.locations.len();

        if let Some((location_id, _)) = self
            .locations
            .iter()
            .enumerate_idx::<LocationIdx>()
            .find(|(_, location)| !location.is_finite())
        {
            return Err(ProblemViolation::InvalidCoordinates { location_id });
        }

        if let Some(matrices) = &self.travel_matrices
            && matrices.num_locations() != num_locations
        {
            return Err(ProblemViolation::MatrixDimensionMismatch {
                expected: num_locations,
                actual: matrices.num_locations(),
            });
        }

        if !self.vehicles.is_empty() && self.vehicle_types.is_empty() {
            return Err(ProblemViolation::MissingVehicleTypes);
        }

        for vehicle_type in &self.vehicle_types {
            if !vehicle_type.capacity().is_valid() {
                return Err(ProblemViolation::InvalidCapacity {
                    vehicle_type_id: vehicle_type.external_id().to_owned(),
                });
            }

            if !vehicle_type.has_valid_costs() {
                return Err(ProblemViolation::InvalidCosts {
                    vehicle_type_id: vehicle_type.external_id().to_owned(),
                });
            }
        }

        let mut vehicle_ids = FxHashSet::default();
        for vehicle in &self.vehicles {
            let vehicle_id = vehicle.external_id();

            if !vehicle_ids.insert(vehicle_id) {
                return Err(ProblemViolation::DuplicateVehicleId(vehicle_id.to_owned()));
            }

            if vehicle.vehicle_type_id().get() >= self.vehicle_types.len() {
                return Err(ProblemViolation::UnknownVehicleType {
                    vehicle_id: vehicle_id.to_owned(),
                    vehicle_type_id: vehicle.vehicle_type_id(),
                });
            }

            if let Some(location_id) = std::iter::once(vehicle.start_location_id())
                .chain(vehicle.end_location_id())
                .find(|location_id| location_id.get() >= num_locations)
            {
                return Err(ProblemViolation::UnknownVehicleLocation {
                    vehicle_id: vehicle_id.to_owned(),
                    location_id,
                });
            }

            if vehicle.shift().is_some_and(|shift| !shift.is_valid()) {
                return Err(ProblemViolation::InvalidTimeWindow {
                    owner: vehicle_id.to_owned(),
                });
            }
        }

        let mut job_ids = FxHashSet::default();
        for job in &self.jobs {
            let job_id = job.external_id();

            if !job_ids.insert(job_id) {
                return Err(ProblemViolation::DuplicateJobId(job_id.to_owned()));
            }

            if let Some(location_id) = job
                .location_ids()
                .find(|location_id| location_id.get() >= num_locations)
            {
                return Err(ProblemViolation::UnknownJobLocation {
                    job_id: job_id.to_owned(),
                    location_id,
                });
            }

            if !job.demand().is_valid() {
                return Err(ProblemViolation::InvalidDemand {
                    job_id: job_id.to_owned(),
                });
            }

            if job.time_windows().any(|time_windows| !time_windows.is_valid()) {
                return Err(ProblemViolation::InvalidTimeWindow {
                    owner: job_id.to_owned(),
                });
            }
        }

        Ok(())
    }

    /// Jobs with more demand dimensions than any vehicle type can carry stay
    /// in the problem but can never be assigned.
    fn warn_on_uncovered_dimensions(&self) {
        let max_capacity_dimensions = self
            .vehicle_types
            .iter()
            .map(|vehicle_type| vehicle_type.capacity().len())
            .max()
            .unwrap_or(0);

        for job in &self.jobs {
            let demand = job.demand();
            let uncovered = (max_capacity_dimensions..demand.len()).any(|dim| demand.get(dim) > 0.0);

            if uncovered {
                warn!(
                    job_id = job.external_id(),
                    dimensions = demand.len(),
                    max_capacity_dimensions,
                    "Job demand has dimensions no vehicle type provides, it will stay unassigned"
                );
            }
        }
    }
}

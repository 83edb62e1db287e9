use jiff::{SignedDuration, Timestamp};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    error::{ProblemViolation, VrpError},
    problem::{
        capacity::Capacity,
        distance_method::DistanceMethod,
        fleet::FleetSize,
        job::Job,
        location::Location,
        service::{Service, ServiceBuilder, ServiceType},
        shipment::{Shipment, ShipmentBuilder, ShipmentLocation},
        time_window::{TimeWindow, TimeWindows},
        travel_cost_matrix::TravelMatrices,
        vehicle::{Vehicle, VehicleBuilder, VehicleShift, VehicleShiftBuilder},
        vehicle_routing_problem::{VehicleRoutingProblem, VehicleRoutingProblemBuilder},
        vehicle_type::{VehicleType, VehicleTypeBuilder},
    },
};

pub trait FromProblem<T> {
    fn from_problem(value: T, problem: &VehicleRoutingProblem) -> Self;
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "VehicleRoutingProblem")]
pub struct JsonVehicleRoutingProblem {
    pub id: Option<String>,
    pub distance_method: Option<DistanceMethod>,
    pub fleet_size: Option<FleetSize>,
    pub locations: Vec<JsonLocation>,
    pub vehicle_types: Vec<JsonVehicleType>,
    pub vehicles: Vec<JsonVehicle>,
    #[serde(default)]
    pub services: Vec<JsonService>,
    #[serde(default)]
    pub shipments: Vec<JsonShipment>,

    /// Replaces the matrices derived from the coordinates.
    pub matrices: Option<JsonTravelMatrices>,
}

/// `[x, y]`, or `[lon, lat]` with the haversine distance method.
#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Location")]
pub struct JsonLocation {
    pub coordinates: [f64; 2],
}

impl JsonLocation {
    fn to_location(&self, distance_method: DistanceMethod) -> Location {
        match distance_method {
            DistanceMethod::Euclidean => {
                Location::from_cartesian(self.coordinates[0], self.coordinates[1])
            }
            DistanceMethod::Haversine => {
                Location::from_lat_lon(self.coordinates[1], self.coordinates[0])
            }
        }
    }
}

impl FromProblem<&Location> for JsonLocation {
    fn from_problem(value: &Location, _problem: &VehicleRoutingProblem) -> Self {
        JsonLocation {
            coordinates: [value.x(), value.y()],
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "VehicleType")]
pub struct JsonVehicleType {
    pub id: String,
    pub capacity: Option<Vec<f64>>,
    pub fixed_cost: Option<f64>,
    pub cost_per_distance: Option<f64>,
    pub cost_per_time: Option<f64>,
}

impl From<JsonVehicleType> for VehicleType {
    fn from(value: JsonVehicleType) -> Self {
        let mut builder = VehicleTypeBuilder::default();

        builder.set_type_id(value.id);

        if let Some(capacity) = value.capacity {
            builder.set_capacity(Capacity::from_vec(capacity));
        }

        if let Some(fixed_cost) = value.fixed_cost {
            builder.set_fixed_cost(fixed_cost);
        }

        if let Some(cost_per_distance) = value.cost_per_distance {
            builder.set_cost_per_distance(cost_per_distance);
        }

        if let Some(cost_per_time) = value.cost_per_time {
            builder.set_cost_per_time(cost_per_time);
        }

        builder.build()
    }
}

impl FromProblem<&VehicleType> for JsonVehicleType {
    fn from_problem(value: &VehicleType, _problem: &VehicleRoutingProblem) -> Self {
        JsonVehicleType {
            id: value.external_id().to_owned(),
            capacity: Some(value.capacity().iter().collect()),
            fixed_cost: Some(value.fixed_cost()),
            cost_per_distance: Some(value.cost_per_distance()),
            cost_per_time: Some(value.cost_per_time()),
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Vehicle")]
pub struct JsonVehicle {
    pub id: String,
    pub vehicle_type: String,
    pub start_location_id: usize,
    pub end_location_id: Option<usize>,
    pub should_return_to_depot: Option<bool>,
    pub shift: Option<JsonVehicleShift>,
}

impl FromProblem<&Vehicle> for JsonVehicle {
    fn from_problem(value: &Vehicle, problem: &VehicleRoutingProblem) -> Self {
        JsonVehicle {
            id: value.external_id().to_owned(),
            vehicle_type: problem.vehicle_type_of(value).external_id().to_owned(),
            start_location_id: value.start_location_id().get(),
            end_location_id: value.end_location_id().map(|location_id| location_id.get()),
            should_return_to_depot: Some(value.should_return_to_depot()),
            shift: value.shift().map(JsonVehicleShift::from),
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "VehicleShift")]
pub struct JsonVehicleShift {
    pub earliest_start: Option<Timestamp>,
    pub latest_end: Option<Timestamp>,
}

impl From<&VehicleShift> for JsonVehicleShift {
    fn from(value: &VehicleShift) -> Self {
        JsonVehicleShift {
            earliest_start: value.earliest_start(),
            latest_end: value.latest_end(),
        }
    }
}

impl From<JsonVehicleShift> for VehicleShift {
    fn from(value: JsonVehicleShift) -> Self {
        let mut builder = VehicleShiftBuilder::default();

        if let Some(earliest_start) = value.earliest_start {
            builder.set_earliest_start(earliest_start);
        }

        if let Some(latest_end) = value.latest_end {
            builder.set_latest_end(latest_end);
        }

        builder.build()
    }
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Service")]
pub struct JsonService {
    pub id: String,
    pub location_id: usize,
    pub duration: Option<SignedDuration>,
    pub demand: Option<Vec<f64>>,
    pub time_windows: Option<Vec<TimeWindow>>,

    #[serde(rename = "type")]
    pub service_type: Option<ServiceType>,
}

impl TryFrom<JsonService> for Service {
    type Error = VrpError;

    fn try_from(value: JsonService) -> Result<Self, Self::Error> {
        let mut builder = ServiceBuilder::default();

        builder.set_location_id(value.location_id);
        builder.set_external_id(value.id);

        if let Some(service_type) = value.service_type {
            builder.set_service_type(service_type);
        }

        if let Some(demand) = value.demand {
            builder.set_demand(Capacity::from_vec(demand));
        }

        if let Some(duration) = value.duration {
            builder.set_duration(duration);
        }

        if let Some(time_windows) = value.time_windows {
            builder.set_time_windows(time_windows);
        }

        builder.build()
    }
}

impl FromProblem<&Service> for JsonService {
    fn from_problem(value: &Service, _problem: &VehicleRoutingProblem) -> Self {
        JsonService {
            id: value.external_id().to_owned(),
            location_id: value.location_id().get(),
            duration: Some(value.duration()),
            demand: Some(value.demand().iter().collect()),
            time_windows: Some(time_windows_to_vec(value.time_windows())),
            service_type: Some(value.service_type()),
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Shipment")]
pub struct JsonShipment {
    pub id: String,
    pub demand: Option<Vec<f64>>,
    pub pickup: JsonShipmentLocation,
    pub delivery: JsonShipmentLocation,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "ShipmentLocation")]
pub struct JsonShipmentLocation {
    pub location_id: usize,
    pub duration: Option<SignedDuration>,
    pub time_windows: Option<Vec<TimeWindow>>,
}

impl From<JsonShipmentLocation> for ShipmentLocation {
    fn from(value: JsonShipmentLocation) -> Self {
        ShipmentLocation::new(
            value.location_id.into(),
            value.duration.unwrap_or(SignedDuration::ZERO),
            value.time_windows.unwrap_or_default(),
        )
    }
}

impl From<&ShipmentLocation> for JsonShipmentLocation {
    fn from(value: &ShipmentLocation) -> Self {
        JsonShipmentLocation {
            location_id: value.location_id().get(),
            duration: Some(value.duration()),
            time_windows: Some(time_windows_to_vec(value.time_windows())),
        }
    }
}

impl TryFrom<JsonShipment> for Shipment {
    type Error = VrpError;

    fn try_from(value: JsonShipment) -> Result<Self, Self::Error> {
        let mut builder = ShipmentBuilder::default();

        builder.set_external_id(value.id);
        builder.set_pickup(value.pickup.into());
        builder.set_delivery(value.delivery.into());

        if let Some(demand) = value.demand {
            builder.set_demand(Capacity::from_vec(demand));
        }

        builder.build()
    }
}

impl FromProblem<&Shipment> for JsonShipment {
    fn from_problem(value: &Shipment, _problem: &VehicleRoutingProblem) -> Self {
        JsonShipment {
            id: value.external_id().to_owned(),
            demand: Some(value.demand().iter().collect()),
            pickup: value.pickup().into(),
            delivery: value.delivery().into(),
        }
    }
}

/// Square matrices indexed by location. Times are in seconds and default to
/// the distances.
#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "TravelMatrices")]
pub struct JsonTravelMatrices {
    pub distances: Vec<Vec<f64>>,
    pub times: Option<Vec<Vec<f64>>>,
}

fn time_windows_to_vec(time_windows: &TimeWindows) -> Vec<TimeWindow> {
    time_windows.iter().copied().collect()
}

impl FromProblem<&VehicleRoutingProblem> for JsonVehicleRoutingProblem {
    fn from_problem(value: &VehicleRoutingProblem, problem: &VehicleRoutingProblem) -> Self {
        let mut services = Vec::new();
        let mut shipments = Vec::new();

        for job in value.jobs() {
            match job {
                Job::Service(service) => services.push(JsonService::from_problem(service, problem)),
                Job::Shipment(shipment) => {
                    shipments.push(JsonShipment::from_problem(shipment, problem))
                }
            }
        }

        JsonVehicleRoutingProblem {
            id: None,
            distance_method: Some(value.distance_method()),
            fleet_size: Some(if value.fleet().is_infinite() {
                FleetSize::Infinite
            } else {
                FleetSize::Finite
            }),
            locations: value
                .locations()
                .iter()
                .map(|location| JsonLocation::from_problem(location, problem))
                .collect(),
            vehicle_types: value
                .vehicle_types()
                .iter()
                .map(|vehicle_type| JsonVehicleType::from_problem(vehicle_type, problem))
                .collect(),
            vehicles: value
                .vehicles()
                .iter()
                .map(|vehicle| JsonVehicle::from_problem(vehicle, problem))
                .collect(),
            services,
            shipments,
            matrices: None,
        }
    }
}

impl JsonVehicleRoutingProblem {
    #[instrument(skip_all, level = "debug")]
    pub fn build_problem(self) -> Result<VehicleRoutingProblem, VrpError> {
        let mut builder = VehicleRoutingProblemBuilder::default();
        let distance_method = self.distance_method.unwrap_or_default();

        builder.set_distance_method(distance_method);

        if let Some(fleet_size) = self.fleet_size {
            builder.set_fleet_size(fleet_size);
        }

        let locations = self
            .locations
            .iter()
            .map(|location| location.to_location(distance_method))
            .collect::<Vec<_>>();

        if let Some(matrices) = self.matrices {
            let times = matrices
                .times
                .unwrap_or_else(|| matrices.distances.clone());
            builder.set_travel_matrices(TravelMatrices::from_rows(
                locations.len(),
                matrices.distances,
                times,
            )?);
        }

        builder.set_locations(locations);

        let vehicles = self
            .vehicles
            .into_iter()
            .map(|vehicle| {
                let vehicle_type_id = self
                    .vehicle_types
                    .iter()
                    .position(|vehicle_type| vehicle_type.id == vehicle.vehicle_type)
                    .ok_or_else(|| ProblemViolation::UnknownVehicleTypeReference {
                        vehicle_id: vehicle.id.clone(),
                        vehicle_type: vehicle.vehicle_type.clone(),
                    })?;

                let mut builder = VehicleBuilder::default();

                builder.set_vehicle_id(vehicle.id);
                builder.set_vehicle_type_id(vehicle_type_id);
                builder.set_start_location_id(vehicle.start_location_id);

                if let Some(end_location_id) = vehicle.end_location_id {
                    builder.set_end_location_id(end_location_id);
                }

                if let Some(should_return) = vehicle.should_return_to_depot {
                    builder.set_return_to_depot(should_return);
                }

                if let Some(shift) = vehicle.shift {
                    builder.set_shift(shift.into());
                }

                builder.build()
            })
            .collect::<Result<Vec<_>, VrpError>>()?;

        builder.set_vehicles(vehicles);
        builder.set_vehicle_types(
            self.vehicle_types
                .into_iter()
                .map(VehicleType::from)
                .collect(),
        );

        let mut jobs = self
            .services
            .into_iter()
            .map(|service| Service::try_from(service).map(Job::Service))
            .collect::<Result<Vec<_>, VrpError>>()?;

        for shipment in self.shipments {
            jobs.push(Job::Shipment(Shipment::try_from(shipment)?));
        }

        builder.set_jobs(jobs);

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::location::LocationIdx;

    const PROBLEM: &str = r#"{
        "locations": [
            { "coordinates": [0.0, 0.0] },
            { "coordinates": [3.0, 4.0] },
            { "coordinates": [6.0, 8.0] }
        ],
        "vehicle_types": [{ "id": "van", "capacity": [8.0], "fixed_cost": 10.0 }],
        "vehicles": [{ "id": "v1", "vehicle_type": "van", "start_location_id": 0 }],
        "services": [
            { "id": "s1", "location_id": 1, "demand": [2.0] },
            { "id": "s2", "location_id": 2, "demand": [3.0], "type": "pickup" }
        ],
        "shipments": [
            {
                "id": "p1",
                "demand": [1.0],
                "pickup": { "location_id": 1 },
                "delivery": { "location_id": 2, "duration": "PT5M" }
            }
        ]
    }"#;

    #[test]
    fn test_build_problem() {
        let json: JsonVehicleRoutingProblem = serde_json::from_str(PROBLEM).unwrap();
        let problem = json.build_problem().unwrap();

        assert_eq!(problem.locations().len(), 3);
        assert_eq!(problem.jobs().len(), 3);
        assert!(problem.jobs()[2].is_shipment());
        assert_eq!(problem.vehicle_types()[0].fixed_cost(), 10.0);
        assert_eq!(problem.vehicle_types()[0].cost_per_distance(), 1.0);
        assert_eq!(
            problem.cost(LocationIdx::new(0), LocationIdx::new(2)),
            Ok(10.0)
        );
    }

    #[test]
    fn test_unknown_vehicle_type_reference() {
        let mut json: JsonVehicleRoutingProblem = serde_json::from_str(PROBLEM).unwrap();
        json.vehicles[0].vehicle_type = String::from("truck");

        assert_eq!(
            json.build_problem().unwrap_err(),
            VrpError::InvalidProblem(ProblemViolation::UnknownVehicleTypeReference {
                vehicle_id: String::from("v1"),
                vehicle_type: String::from("truck"),
            })
        );
    }

    #[test]
    fn test_explicit_matrices_must_match_locations() {
        let mut json: JsonVehicleRoutingProblem = serde_json::from_str(PROBLEM).unwrap();
        json.matrices = Some(JsonTravelMatrices {
            distances: vec![vec![0.0, 1.0], vec![1.0, 0.0]],
            times: None,
        });

        assert!(matches!(
            json.build_problem(),
            Err(VrpError::InvalidProblem(
                ProblemViolation::MatrixDimensionMismatch { .. }
            ))
        ));
    }

    #[test]
    fn test_problem_document_round_trip() {
        let json: JsonVehicleRoutingProblem = serde_json::from_str(PROBLEM).unwrap();
        let problem = json.build_problem().unwrap();

        let document = JsonVehicleRoutingProblem::from_problem(&problem, &problem);
        let rebuilt = document.build_problem().unwrap();

        assert_eq!(rebuilt.jobs().len(), problem.jobs().len());
        assert_eq!(rebuilt.vehicles()[0].external_id(), "v1");
        assert_eq!(
            rebuilt.jobs()[2].demand().iter().collect::<Vec<_>>(),
            vec![1.0]
        );
    }
}

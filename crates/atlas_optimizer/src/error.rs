use thiserror::Error;

use crate::problem::{location::LocationIdx, vehicle_type::VehicleTypeIdx};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VrpError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(#[from] ProblemViolation),

    #[error("Unknown location {0}")]
    UnknownLocation(LocationIdx),

    #[error("Cannot select the best solution of an empty solution set")]
    EmptySolutionSet,
}

/// First violation found while validating a problem.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemViolation {
    #[error("vehicle '{vehicle_id}' has no start location")]
    MissingStartLocation { vehicle_id: String },

    #[error("vehicle '{vehicle_id}' has no vehicle type")]
    MissingVehicleType { vehicle_id: String },

    #[error("vehicle '{vehicle_id}' references unknown location {location_id}")]
    UnknownVehicleLocation {
        vehicle_id: String,
        location_id: LocationIdx,
    },

    #[error("vehicle '{vehicle_id}' references unknown vehicle type {vehicle_type_id}")]
    UnknownVehicleType {
        vehicle_id: String,
        vehicle_type_id: VehicleTypeIdx,
    },

    #[error("vehicle '{vehicle_id}' references unknown vehicle type '{vehicle_type}'")]
    UnknownVehicleTypeReference {
        vehicle_id: String,
        vehicle_type: String,
    },

    #[error("job '{job_id}' has no location")]
    MissingJobLocation { job_id: String },

    #[error("job '{job_id}' references unknown location {location_id}")]
    UnknownJobLocation {
        job_id: String,
        location_id: LocationIdx,
    },

    #[error("a {kind} is missing its id")]
    MissingId { kind: &'static str },

    #[error("duplicate vehicle id '{0}'")]
    DuplicateVehicleId(String),

    #[error("duplicate job id '{0}'")]
    DuplicateJobId(String),

    #[error("job '{job_id}' has a negative or non-finite demand")]
    InvalidDemand { job_id: String },

    #[error("vehicle type '{vehicle_type_id}' has a negative or non-finite capacity")]
    InvalidCapacity { vehicle_type_id: String },

    #[error("vehicle type '{vehicle_type_id}' has negative or non-finite costs")]
    InvalidCosts { vehicle_type_id: String },

    #[error("'{owner}' has a time window ending before it starts")]
    InvalidTimeWindow { owner: String },

    #[error("location {location_id} has non-finite coordinates")]
    InvalidCoordinates { location_id: LocationIdx },

    #[error("travel matrix must cover {expected} locations, found a side of {actual}")]
    MatrixDimensionMismatch { expected: usize, actual: usize },

    #[error("travel matrix contains a negative or non-finite value")]
    InvalidMatrixValue,

    #[error("vehicles are defined but no vehicle type is")]
    MissingVehicleTypes,
}

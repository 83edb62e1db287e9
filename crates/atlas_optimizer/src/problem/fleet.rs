use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::problem::vehicle::{Vehicle, VehicleIdx};

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum FleetSize {
    #[default]
    Finite,
    Infinite,
}

/// With an infinite fleet, every vehicle stands for an unlimited number of
/// identical copies.
#[derive(Debug, Clone)]
pub enum Fleet {
    Finite(Vec<Vehicle>),
    Infinite(Vec<Vehicle>),
}

impl Fleet {
    pub fn new(vehicles: Vec<Vehicle>, fleet_size: FleetSize) -> Self {
        match fleet_size {
            FleetSize::Finite => Fleet::Finite(vehicles),
            FleetSize::Infinite => Fleet::Infinite(vehicles),
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Fleet::Infinite(_))
    }

    #[inline]
    pub fn vehicles(&self) -> &[Vehicle] {
        match self {
            Fleet::Finite(vehicles) | Fleet::Infinite(vehicles) => vehicles,
        }
    }

    #[inline]
    pub fn vehicle(&self, vehicle_id: VehicleIdx) -> &Vehicle {
        &self.vehicles()[vehicle_id]
    }
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::location::Location;

/// Average speed used to derive travel times from haversine distances, in m/s.
const HAVERSINE_SPEED: f64 = 50.0 / 3.6;

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum DistanceMethod {
    Haversine,
    #[default]
    Euclidean,
}

impl DistanceMethod {
    pub fn distance(&self, from: &Location, to: &Location) -> f64 {
        match self {
            DistanceMethod::Haversine => from.haversine_distance(to),
            DistanceMethod::Euclidean => from.euclidean_distance(to),
        }
    }

    /// Travel time in seconds for the given distance. Cartesian units are
    /// traversed at one unit per second.
    pub fn time(&self, distance: f64) -> f64 {
        match self {
            DistanceMethod::Haversine => distance / HAVERSINE_SPEED,
            DistanceMethod::Euclidean => distance,
        }
    }
}

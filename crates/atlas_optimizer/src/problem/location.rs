use geo::{Distance, Euclidean, Haversine};
use serde::{Deserialize, Serialize};

use crate::define_index_newtype;

define_index_newtype!(LocationIdx, Location);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Location {
    point: geo::Point,
}

impl Location {
    pub fn from_cartesian(x: f64, y: f64) -> Self {
        Self {
            point: geo::Point::new(x, y),
        }
    }

    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Self {
            point: geo::Point::new(lon, lat),
        }
    }

    pub fn x(&self) -> f64 {
        self.point.x()
    }

    pub fn y(&self) -> f64 {
        self.point.y()
    }

    pub fn lon(&self) -> f64 {
        self.point.x()
    }

    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    pub fn is_finite(&self) -> bool {
        self.x().is_finite() && self.y().is_finite()
    }

    pub fn euclidean_distance(&self, to: &Location) -> f64 {
        Euclidean.distance(&self.point, &to.point)
    }

    /// Great-circle distance in meters.
    pub fn haversine_distance(&self, to: &Location) -> f64 {
        Haversine.distance(self.point, to.point)
    }
}

impl From<&Location> for geo::Point<f64> {
    fn from(location: &Location) -> Self {
        location.point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_distance() {
        let a = Location::from_cartesian(0.0, 0.0);
        let b = Location::from_cartesian(3.0, 4.0);
        assert_eq!(a.euclidean_distance(&b), 5.0);
        assert_eq!(a.euclidean_distance(&a), 0.0);
    }

    #[test]
    fn test_lat_lon_order() {
        let location = Location::from_lat_lon(50.85, 4.35);
        assert_eq!(location.lat(), 50.85);
        assert_eq!(location.lon(), 4.35);
        assert_eq!(location.x(), 4.35);
    }

    #[test]
    fn test_haversine_distance_is_symmetric() {
        let brussels = Location::from_lat_lon(50.8503, 4.3517);
        let antwerp = Location::from_lat_lon(51.2194, 4.4025);
        let distance = brussels.haversine_distance(&antwerp);

        assert!(distance > 40_000.0 && distance < 42_000.0);
        assert_eq!(distance, antwerp.haversine_distance(&brussels));
    }
}

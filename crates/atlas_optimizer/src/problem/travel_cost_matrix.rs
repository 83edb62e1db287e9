use std::sync::Arc;

use jiff::SignedDuration;

use crate::error::{ProblemViolation, VrpError};
use crate::problem::location::LocationIdx;

use super::distance_method::DistanceMethod;
use super::location::Location;

pub type Distance = f64;
pub type Time = f64;
pub type Cost = f64;

/// Flat storage of distances and times between locations, indexed with
/// `from * num_locations + to`.
#[derive(Debug, Clone)]
pub struct TravelMatrices {
    distances: Arc<Vec<Distance>>,
    times: Arc<Vec<Time>>,
    num_locations: usize,
    is_symmetric: bool,
}

fn is_flat_matrix_symmetric(matrix: &[f64], num_locations: usize) -> bool {
    (0..num_locations).all(|i| {
        (0..num_locations).all(|j| matrix[i * num_locations + j] == matrix[j * num_locations + i])
    })
}

fn flatten_square(rows: Vec<Vec<f64>>, num_locations: usize) -> Result<Vec<f64>, VrpError> {
    let mismatch = if rows.len() == num_locations {
        rows.iter().map(Vec::len).find(|&len| len != num_locations)
    } else {
        Some(rows.len())
    };
    if let Some(actual) = mismatch {
        return Err(ProblemViolation::MatrixDimensionMismatch {
            expected: num_locations,
            actual,
        }
        .into());
    }

    let flat = rows.into_iter().flatten().collect::<Vec<_>>();
    if flat.iter().any(|value| !value.is_finite() || *value < 0.0) {
        return Err(ProblemViolation::InvalidMatrixValue.into());
    }

    Ok(flat)
}

impl TravelMatrices {
    /// Builds matrices from explicit rows. Both matrices must be
    /// `num_locations x num_locations` with finite, non-negative values.
    pub fn from_rows(
        num_locations: usize,
        distances: Vec<Vec<Distance>>,
        times: Vec<Vec<Time>>,
    ) -> Result<Self, VrpError> {
        let distances = flatten_square(distances, num_locations)?;
        let times = flatten_square(times, num_locations)?;
        let is_symmetric = is_flat_matrix_symmetric(&distances, num_locations);

        Ok(Self {
            distances: Arc::new(distances),
            times: Arc::new(times),
            num_locations,
            is_symmetric,
        })
    }

    pub fn from_distance_method(locations: &[Location], method: DistanceMethod) -> Self {
        match method {
            DistanceMethod::Euclidean => Self::from_euclidean(locations, false),
            DistanceMethod::Haversine => Self::from_haversine(locations),
        }
    }

    pub fn from_haversine(locations: &[Location]) -> Self {
        let num_locations = locations.len();
        let mut distances: Vec<Distance> = vec![0.0; num_locations * num_locations];
        let mut times: Vec<Time> = vec![0.0; num_locations * num_locations];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                let distance = DistanceMethod::Haversine.distance(from, to);
                distances[i * num_locations + j] = distance;
                times[i * num_locations + j] = DistanceMethod::Haversine.time(distance);
            }
        }

        Self {
            distances: Arc::new(distances),
            times: Arc::new(times),
            num_locations,
            is_symmetric: true,
        }
    }

    pub fn from_euclidean(locations: &[Location], round: bool) -> Self {
        let num_locations = locations.len();
        let mut distances: Vec<Distance> = vec![0.0; num_locations * num_locations];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                let distance = from.euclidean_distance(to);
                distances[i * num_locations + j] = if round { distance.round() } else { distance };
            }
        }

        let distances = Arc::new(distances);
        let times = Arc::clone(&distances);

        Self {
            distances,
            times,
            num_locations,
            is_symmetric: true,
        }
    }

    #[cfg(test)]
    pub fn from_constant(num_locations: usize, time: f64, distance: f64) -> Self {
        Self {
            distances: Arc::new(vec![distance; num_locations * num_locations]),
            times: Arc::new(vec![time; num_locations * num_locations]),
            num_locations,
            is_symmetric: true,
        }
    }

    #[inline(always)]
    fn index(&self, from: LocationIdx, to: LocationIdx) -> usize {
        from.get() * self.num_locations + to.get()
    }

    fn check(&self, location_id: LocationIdx) -> Result<(), VrpError> {
        if location_id.get() < self.num_locations {
            Ok(())
        } else {
            Err(VrpError::UnknownLocation(location_id))
        }
    }

    /// Checked travel cost between two locations: the travel distance.
    /// Fails with `UnknownLocation` for an index outside the matrix.
    pub fn cost(&self, from: LocationIdx, to: LocationIdx) -> Result<Cost, VrpError> {
        self.check(from)?;
        self.check(to)?;
        Ok(self.travel_distance(from, to))
    }

    /// Unchecked lookups below are only used on validated problems.
    #[inline(always)]
    pub fn travel_distance(&self, from: LocationIdx, to: LocationIdx) -> Distance {
        if from == to {
            return 0.0;
        }

        self.distances[self.index(from, to)]
    }

    /// Travel time saturating at `SignedDuration::MAX`.
    #[inline(always)]
    pub fn travel_time(&self, from: LocationIdx, to: LocationIdx) -> SignedDuration {
        SignedDuration::try_from_secs_f64(self.travel_time_secs(from, to))
            .unwrap_or(SignedDuration::MAX)
    }

    #[inline(always)]
    pub fn travel_time_secs(&self, from: LocationIdx, to: LocationIdx) -> Time {
        if from == to {
            return 0.0;
        }

        self.times[self.index(from, to)]
    }

    pub fn max_distance(&self) -> Distance {
        self.distances.iter().copied().fold(0.0, f64::max)
    }

    pub fn max_time(&self) -> Time {
        self.times.iter().copied().fold(0.0, f64::max)
    }

    pub fn is_symmetric(&self) -> bool {
        self.is_symmetric
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_is_zero_for_identical_locations() {
        let locations = vec![
            Location::from_cartesian(0.0, 0.0),
            Location::from_cartesian(3.0, 4.0),
        ];
        let matrices = TravelMatrices::from_euclidean(&locations, false);

        assert_eq!(matrices.cost(LocationIdx::new(1), LocationIdx::new(1)), Ok(0.0));
        assert_eq!(matrices.cost(LocationIdx::new(0), LocationIdx::new(1)), Ok(5.0));
        assert_eq!(
            matrices.travel_time(LocationIdx::new(0), LocationIdx::new(1)),
            SignedDuration::from_secs(5)
        );
    }

    #[test]
    fn test_cost_unknown_location() {
        let locations = vec![Location::from_cartesian(0.0, 0.0)];
        let matrices = TravelMatrices::from_euclidean(&locations, false);

        assert_eq!(
            matrices.cost(LocationIdx::new(0), LocationIdx::new(4)),
            Err(VrpError::UnknownLocation(LocationIdx::new(4)))
        );
    }

    #[test]
    fn test_from_rows_rejects_dimension_mismatch() {
        let result = TravelMatrices::from_rows(
            3,
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
        );

        assert_eq!(
            result.unwrap_err(),
            VrpError::InvalidProblem(ProblemViolation::MatrixDimensionMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let result = TravelMatrices::from_rows(
            2,
            vec![vec![0.0, 1.0, 2.0], vec![1.0, 0.0]],
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
        );

        assert_eq!(
            result.unwrap_err(),
            VrpError::InvalidProblem(ProblemViolation::MatrixDimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_travel_time_saturates() {
        let matrices = TravelMatrices::from_constant(2, 1e30, 1.0);

        assert_eq!(
            matrices.travel_time(LocationIdx::new(0), LocationIdx::new(1)),
            SignedDuration::MAX
        );
        assert_eq!(
            matrices.travel_time_secs(LocationIdx::new(0), LocationIdx::new(1)),
            1e30
        );
    }

    #[test]
    fn test_from_rows_rejects_negative_values() {
        let result = TravelMatrices::from_rows(
            2,
            vec![vec![0.0, -1.0], vec![1.0, 0.0]],
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
        );

        assert_eq!(
            result.unwrap_err(),
            VrpError::InvalidProblem(ProblemViolation::InvalidMatrixValue)
        );
    }

    #[test]
    fn test_from_rows_detects_asymmetry() {
        let matrices = TravelMatrices::from_rows(
            2,
            vec![vec![0.0, 2.0], vec![3.0, 0.0]],
            vec![vec![0.0, 2.0], vec![3.0, 0.0]],
        )
        .unwrap();

        assert!(!matrices.is_symmetric());
        assert_eq!(
            matrices.travel_distance(LocationIdx::new(1), LocationIdx::new(0)),
            3.0
        );
    }
}

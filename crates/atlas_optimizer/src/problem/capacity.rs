use std::ops::{Add, AddAssign, Sub, SubAssign};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

type CapacityVector = SmallVec<[f64; 2]>;

/// Quantity vector over capacity dimensions. A dimension missing on one side
/// of an operation counts as zero.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default)]
#[serde(transparent)]
pub struct Capacity(CapacityVector);

impl Capacity {
    pub const EMPTY: Capacity = Capacity(SmallVec::new_const());

    pub fn empty() -> Self {
        Self::EMPTY
    }

    pub fn from_vec(values: Vec<f64>) -> Self {
        Capacity(CapacityVector::from_vec(values))
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        Capacity(SmallVec::from_elem(0.0, dimensions))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when every dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&value| value == 0.0)
    }

    #[inline]
    pub fn get(&self, dimension: usize) -> f64 {
        self.0.get(dimension).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    pub fn is_valid(&self) -> bool {
        self.0.iter().all(|value| value.is_finite() && *value >= 0.0)
    }

    pub fn reset(&mut self) {
        self.0.iter_mut().for_each(|value| *value = 0.0);
    }

    pub fn update(&mut self, other: &Capacity) {
        self.0.clone_from(&other.0);
    }

    /// Element-wise maximum with `other`.
    pub fn update_max(&mut self, other: &Capacity) {
        self.grow(other.len());
        for (value, other_value) in self.0.iter_mut().zip(other.iter()) {
            *value = value.max(other_value);
        }
    }

    /// Whether `self` fits into `capacity` on every dimension.
    pub fn fits(&self, capacity: &Capacity) -> bool {
        (0..self.len().max(capacity.len())).all(|index| self.get(index) <= capacity.get(index))
    }

    /// Whether `self + extra` fits into `capacity` on every dimension.
    pub fn fits_with(&self, extra: &Capacity, capacity: &Capacity) -> bool {
        let dimensions = self.len().max(extra.len()).max(capacity.len());
        (0..dimensions)
            .all(|index| self.get(index) + extra.get(index) <= capacity.get(index))
    }

    /// Total amount exceeding `capacity`, summed over dimensions.
    pub fn over_capacity(&self, capacity: &Capacity) -> f64 {
        (0..self.len())
            .map(|index| (self.get(index) - capacity.get(index)).max(0.0))
            .sum()
    }

    fn grow(&mut self, dimensions: usize) {
        if self.0.len() < dimensions {
            self.0.resize(dimensions, 0.0);
        }
    }
}

impl PartialEq for Capacity {
    fn eq(&self, other: &Self) -> bool {
        (0..self.len().max(other.len())).all(|index| self.get(index) == other.get(index))
    }
}

impl FromIterator<f64> for Capacity {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> Self {
        Capacity(iter.into_iter().collect())
    }
}

impl AddAssign<&Capacity> for Capacity {
    fn add_assign(&mut self, rhs: &Capacity) {
        self.grow(rhs.len());
        for (value, other) in self.0.iter_mut().zip(rhs.iter()) {
            *value += other;
        }
    }
}

impl SubAssign<&Capacity> for Capacity {
    fn sub_assign(&mut self, rhs: &Capacity) {
        self.grow(rhs.len());
        for (value, other) in self.0.iter_mut().zip(rhs.iter()) {
            *value -= other;
        }
    }
}

impl Add<&Capacity> for &Capacity {
    type Output = Capacity;

    fn add(self, rhs: &Capacity) -> Capacity {
        let mut result = self.clone();
        result += rhs;
        result
    }
}

impl Sub<&Capacity> for &Capacity {
    type Output = Capacity;

    fn sub(self, rhs: &Capacity) -> Capacity {
        let mut result = self.clone();
        result -= rhs;
        result
    }
}

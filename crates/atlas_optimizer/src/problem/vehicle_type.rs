use serde::Serialize;

use crate::{define_index_newtype, problem::capacity::Capacity};

define_index_newtype!(VehicleTypeIdx, VehicleType);

/// Capacity and cost coefficients shared by several vehicles.
#[derive(Serialize, Debug, Clone)]
pub struct VehicleType {
    external_id: String,
    capacity: Capacity,
    fixed_cost: f64,
    cost_per_distance: f64,
    cost_per_time: f64,
}

impl VehicleType {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn capacity(&self) -> &Capacity {
        &self.capacity
    }

    pub fn fixed_cost(&self) -> f64 {
        self.fixed_cost
    }

    pub fn cost_per_distance(&self) -> f64 {
        self.cost_per_distance
    }

    /// Cost per second of travel.
    pub fn cost_per_time(&self) -> f64 {
        self.cost_per_time
    }

    pub fn has_valid_costs(&self) -> bool {
        [self.fixed_cost, self.cost_per_distance, self.cost_per_time]
            .iter()
            .all(|value| value.is_finite() && *value >= 0.0)
    }
}

pub struct VehicleTypeBuilder {
    external_id: Option<String>,
    capacity: Vec<f64>,
    fixed_cost: f64,
    cost_per_distance: f64,
    cost_per_time: f64,
}

impl Default for VehicleTypeBuilder {
    fn default() -> Self {
        VehicleTypeBuilder {
            external_id: None,
            capacity: Vec::new(),
            fixed_cost: 0.0,
            cost_per_distance: 1.0,
            cost_per_time: 0.0,
        }
    }
}

impl VehicleTypeBuilder {
    pub fn set_type_id(&mut self, external_id: impl Into<String>) -> &mut VehicleTypeBuilder {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn set_capacity(&mut self, capacity: Capacity) -> &mut VehicleTypeBuilder {
        self.capacity = capacity.iter().collect();
        self
    }

    pub fn add_capacity_dimension(&mut self, dimension: usize, value: f64) -> &mut VehicleTypeBuilder {
        if self.capacity.len() <= dimension {
            self.capacity.resize(dimension + 1, 0.0);
        }
        self.capacity[dimension] = value;
        self
    }

    pub fn set_fixed_cost(&mut self, fixed_cost: f64) -> &mut VehicleTypeBuilder {
        self.fixed_cost = fixed_cost;
        self
    }

    pub fn set_cost_per_distance(&mut self, cost_per_distance: f64) -> &mut VehicleTypeBuilder {
        self.cost_per_distance = cost_per_distance;
        self
    }

    pub fn set_cost_per_time(&mut self, cost_per_time: f64) -> &mut VehicleTypeBuilder {
        self.cost_per_time = cost_per_time;
        self
    }

    pub fn build(self) -> VehicleType {
        VehicleType {
            external_id: self.external_id.unwrap_or_else(|| String::from("default")),
            capacity: Capacity::from_vec(self.capacity),
            fixed_cost: self.fixed_cost,
            cost_per_distance: self.cost_per_distance,
            cost_per_time: self.cost_per_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_capacity_dimension() {
        let mut builder = VehicleTypeBuilder::default();
        builder.set_type_id("truck").add_capacity_dimension(1, 4.0);
        let vehicle_type = builder.build();

        assert_eq!(vehicle_type.capacity().get(0), 0.0);
        assert_eq!(vehicle_type.capacity().get(1), 4.0);
        assert_eq!(vehicle_type.cost_per_distance(), 1.0);
        assert!(vehicle_type.has_valid_costs());
    }
}

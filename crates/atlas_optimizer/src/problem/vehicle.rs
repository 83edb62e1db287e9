use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    define_index_newtype,
    error::{ProblemViolation, VrpError},
    problem::vehicle_type::VehicleTypeIdx,
};

use super::location::LocationIdx;

define_index_newtype!(VehicleIdx, Vehicle);

#[derive(Serialize, Debug, Clone)]
pub struct Vehicle {
    external_id: String,
    vehicle_type_id: VehicleTypeIdx,
    start_location_id: LocationIdx,
    end_location_id: Option<LocationIdx>,
    should_return_to_depot: bool,
    shift: Option<VehicleShift>,
}

impl Vehicle {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn vehicle_type_id(&self) -> VehicleTypeIdx {
        self.vehicle_type_id
    }

    pub fn start_location_id(&self) -> LocationIdx {
        self.start_location_id
    }

    /// Where the route ends: the explicit end location, or the start location
    /// when the vehicle returns to its depot. `None` for open routes.
    pub fn end_location_id(&self) -> Option<LocationIdx> {
        match self.end_location_id {
            Some(end) => Some(end),
            None if self.should_return_to_depot => Some(self.start_location_id),
            None => None,
        }
    }

    pub fn should_return_to_depot(&self) -> bool {
        self.should_return_to_depot
    }

    pub fn shift(&self) -> Option<&VehicleShift> {
        self.shift.as_ref()
    }

    pub fn earliest_start_time(&self) -> Option<Timestamp> {
        self.shift.as_ref().and_then(|shift| shift.earliest_start)
    }

    pub fn latest_end_time(&self) -> Option<Timestamp> {
        self.shift.as_ref().and_then(|shift| shift.latest_end)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct VehicleShift {
    pub(crate) earliest_start: Option<Timestamp>,
    pub(crate) latest_end: Option<Timestamp>,
}

impl VehicleShift {
    pub fn earliest_start(&self) -> Option<Timestamp> {
        self.earliest_start
    }

    pub fn latest_end(&self) -> Option<Timestamp> {
        self.latest_end
    }

    pub fn is_valid(&self) -> bool {
        match (self.earliest_start, self.latest_end) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }
}

#[derive(Default)]
pub struct VehicleShiftBuilder {
    earliest_start: Option<Timestamp>,
    latest_end: Option<Timestamp>,
}

impl VehicleShiftBuilder {
    pub fn set_earliest_start(&mut self, earliest_start: Timestamp) -> &mut VehicleShiftBuilder {
        self.earliest_start = Some(earliest_start);
        self
    }

    pub fn set_latest_end(&mut self, latest_end: Timestamp) -> &mut VehicleShiftBuilder {
        self.latest_end = Some(latest_end);
        self
    }

    pub fn build(self) -> VehicleShift {
        VehicleShift {
            earliest_start: self.earliest_start,
            latest_end: self.latest_end,
        }
    }
}

#[derive(Default)]
pub struct VehicleBuilder {
    external_id: Option<String>,
    vehicle_type_id: Option<VehicleTypeIdx>,
    start_location_id: Option<LocationIdx>,
    end_location_id: Option<LocationIdx>,
    should_return_to_depot: Option<bool>,
    shift: Option<VehicleShift>,
}

impl VehicleBuilder {
    pub fn set_vehicle_id(&mut self, external_id: impl Into<String>) -> &mut VehicleBuilder {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn set_vehicle_type_id(&mut self, vehicle_type_id: usize) -> &mut VehicleBuilder {
        self.vehicle_type_id = Some(VehicleTypeIdx::new(vehicle_type_id));
        self
    }

    pub fn set_start_location_id(&mut self, location_id: usize) -> &mut VehicleBuilder {
        self.start_location_id = Some(LocationIdx::new(location_id));
        self
    }

    pub fn set_end_location_id(&mut self, location_id: usize) -> &mut VehicleBuilder {
        self.end_location_id = Some(LocationIdx::new(location_id));
        self
    }

    pub fn set_return_to_depot(&mut self, should_return_to_depot: bool) -> &mut VehicleBuilder {
        self.should_return_to_depot = Some(should_return_to_depot);
        self
    }

    pub fn set_shift(&mut self, shift: VehicleShift) -> &mut VehicleBuilder {
        self.shift = Some(shift);
        self
    }

    pub fn build(self) -> Result<Vehicle, VrpError> {
        let external_id = self
            .external_id
            .ok_or(ProblemViolation::MissingId { kind: "vehicle" })?;

        let Some(start_location_id) = self.start_location_id else {
            return Err(ProblemViolation::MissingStartLocation {
                vehicle_id: external_id,
            }
            .into());
        };

        let Some(vehicle_type_id) = self.vehicle_type_id else {
            return Err(ProblemViolation::MissingVehicleType {
                vehicle_id: external_id,
            }
            .into());
        };

        Ok(Vehicle {
            external_id,
            vehicle_type_id,
            start_location_id,
            end_location_id: self.end_location_id,
            should_return_to_depot: self.should_return_to_depot.unwrap_or(true),
            shift: self.shift,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_location_defaults_to_start() {
        let mut builder = VehicleBuilder::default();
        builder
            .set_vehicle_id("v1")
            .set_vehicle_type_id(0)
            .set_start_location_id(2);
        let vehicle = builder.build().unwrap();

        assert_eq!(vehicle.end_location_id(), Some(LocationIdx::new(2)));
    }

    #[test]
    fn test_open_route() {
        let mut builder = VehicleBuilder::default();
        builder
            .set_vehicle_id("v1")
            .set_vehicle_type_id(0)
            .set_start_location_id(2)
            .set_return_to_depot(false);
        let vehicle = builder.build().unwrap();

        assert_eq!(vehicle.end_location_id(), None);
    }

    #[test]
    fn test_explicit_end_location() {
        let mut builder = VehicleBuilder::default();
        builder
            .set_vehicle_id("v1")
            .set_vehicle_type_id(0)
            .set_start_location_id(2)
            .set_end_location_id(5)
            .set_return_to_depot(false);
        let vehicle = builder.build().unwrap();

        assert_eq!(vehicle.end_location_id(), Some(LocationIdx::new(5)));
    }

    #[test]
    fn test_missing_start_location() {
        let mut builder = VehicleBuilder::default();
        builder.set_vehicle_id("v1").set_vehicle_type_id(0);

        assert_eq!(
            builder.build().unwrap_err(),
            VrpError::InvalidProblem(ProblemViolation::MissingStartLocation {
                vehicle_id: String::from("v1")
            })
        );
    }
}

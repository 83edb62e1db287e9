use jiff::SignedDuration;
use serde::Serialize;

use crate::{
    error::{ProblemViolation, VrpError},
    problem::{
        capacity::Capacity,
        location::LocationIdx,
        time_window::{TimeWindow, TimeWindows},
    },
};

#[derive(Serialize, Debug, Clone)]
pub struct ShipmentLocation {
    duration: SignedDuration,
    location_id: LocationIdx,
    time_windows: TimeWindows,
}

impl ShipmentLocation {
    pub fn new(
        location_id: LocationIdx,
        duration: SignedDuration,
        time_windows: Vec<TimeWindow>,
    ) -> Self {
        ShipmentLocation {
            duration,
            location_id,
            time_windows: TimeWindows::from(time_windows),
        }
    }

    pub fn duration(&self) -> SignedDuration {
        self.duration
    }

    pub fn location_id(&self) -> LocationIdx {
        self.location_id
    }

    pub fn time_windows(&self) -> &TimeWindows {
        &self.time_windows
    }

    pub fn has_time_windows(&self) -> bool {
        !self.time_windows.is_empty()
    }
}

/// Goods picked up at one location and delivered at another by the same
/// vehicle, pickup first.
#[derive(Serialize, Debug, Clone)]
pub struct Shipment {
    external_id: String,
    demand: Capacity,
    pickup: ShipmentLocation,
    delivery: ShipmentLocation,
}

impl Shipment {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn demand(&self) -> &Capacity {
        &self.demand
    }

    pub fn pickup(&self) -> &ShipmentLocation {
        &self.pickup
    }

    pub fn delivery(&self) -> &ShipmentLocation {
        &self.delivery
    }

    pub fn has_time_windows(&self) -> bool {
        self.pickup.has_time_windows() || self.delivery.has_time_windows()
    }
}

#[derive(Default)]
pub struct ShipmentBuilder {
    external_id: Option<String>,
    demand: Option<Capacity>,
    pickup: Option<ShipmentLocation>,
    delivery: Option<ShipmentLocation>,
}

impl ShipmentBuilder {
    pub fn set_external_id(&mut self, external_id: impl Into<String>) -> &mut ShipmentBuilder {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn set_demand(&mut self, demand: Capacity) -> &mut ShipmentBuilder {
        self.demand = Some(demand);
        self
    }

    pub fn set_pickup(&mut self, pickup: ShipmentLocation) -> &mut ShipmentBuilder {
        self.pickup = Some(pickup);
        self
    }

    pub fn set_delivery(&mut self, delivery: ShipmentLocation) -> &mut ShipmentBuilder {
        self.delivery = Some(delivery);
        self
    }

    pub fn build(self) -> Result<Shipment, VrpError> {
        let external_id = self
            .external_id
            .ok_or(ProblemViolation::MissingId { kind: "shipment" })?;

        let (Some(pickup), Some(delivery)) = (self.pickup, self.delivery) else {
            return Err(ProblemViolation::MissingJobLocation {
                job_id: external_id,
            }
            .into());
        };

        Ok(Shipment {
            external_id,
            demand: self.demand.unwrap_or_default(),
            pickup,
            delivery,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_both_locations() {
        let mut builder = ShipmentBuilder::default();
        builder.set_external_id("sh1").set_pickup(ShipmentLocation::new(
            LocationIdx::new(0),
            SignedDuration::ZERO,
            vec![],
        ));

        assert!(matches!(
            builder.build(),
            Err(VrpError::InvalidProblem(
                ProblemViolation::MissingJobLocation { .. }
            ))
        ));
    }
}

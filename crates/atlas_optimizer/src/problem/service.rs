use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ProblemViolation, VrpError},
    problem::{
        capacity::Capacity,
        location::LocationIdx,
        time_window::{TimeWindow, TimeWindows},
    },
};

/// Deliveries are loaded at the start of the route, pickups are carried to
/// the end of it.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ServiceType {
    Pickup,
    #[default]
    Delivery,
}

#[derive(Serialize, Debug, Clone)]
pub struct Service {
    external_id: String,
    location_id: LocationIdx,
    demand: Capacity,
    duration: SignedDuration,
    time_windows: TimeWindows,
    service_type: ServiceType,
}

impl Service {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn location_id(&self) -> LocationIdx {
        self.location_id
    }

    pub fn demand(&self) -> &Capacity {
        &self.demand
    }

    pub fn duration(&self) -> SignedDuration {
        self.duration
    }

    pub fn time_windows(&self) -> &TimeWindows {
        &self.time_windows
    }

    pub fn has_time_windows(&self) -> bool {
        !self.time_windows.is_empty()
    }

    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }
}

#[derive(Default)]
pub struct ServiceBuilder {
    external_id: Option<String>,
    location_id: Option<LocationIdx>,
    demand: Option<Capacity>,
    duration: Option<SignedDuration>,
    time_windows: Vec<TimeWindow>,
    service_type: Option<ServiceType>,
}

impl ServiceBuilder {
    pub fn set_external_id(&mut self, external_id: impl Into<String>) -> &mut ServiceBuilder {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn set_location_id(&mut self, location_id: usize) -> &mut ServiceBuilder {
        self.location_id = Some(LocationIdx::new(location_id));
        self
    }

    pub fn set_demand(&mut self, demand: Capacity) -> &mut ServiceBuilder {
        self.demand = Some(demand);
        self
    }

    pub fn set_duration(&mut self, duration: SignedDuration) -> &mut ServiceBuilder {
        self.duration = Some(duration);
        self
    }

    pub fn add_time_window(&mut self, time_window: TimeWindow) -> &mut ServiceBuilder {
        self.time_windows.push(time_window);
        self
    }

    pub fn set_time_windows(&mut self, time_windows: Vec<TimeWindow>) -> &mut ServiceBuilder {
        self.time_windows = time_windows;
        self
    }

    pub fn set_service_type(&mut self, service_type: ServiceType) -> &mut ServiceBuilder {
        self.service_type = Some(service_type);
        self
    }

    pub fn build(self) -> Result<Service, VrpError> {
        let external_id = self
            .external_id
            .ok_or(ProblemViolation::MissingId { kind: "service" })?;
        let location_id = self
            .location_id
            .ok_or_else(|| ProblemViolation::MissingJobLocation {
                job_id: external_id.clone(),
            })?;

        Ok(Service {
            external_id,
            location_id,
            demand: self.demand.unwrap_or_default(),
            duration: self.duration.unwrap_or(SignedDuration::ZERO),
            time_windows: TimeWindows::from(self.time_windows),
            service_type: self.service_type.unwrap_or_default(),
        })
    }
}

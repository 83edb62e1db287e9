use std::fmt::Display;

use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use crate::{
    define_index_newtype,
    problem::{
        capacity::Capacity,
        location::LocationIdx,
        service::{Service, ServiceType},
        shipment::Shipment,
        time_window::TimeWindows,
    },
};

define_index_newtype!(JobIdx, Job);

/// One stop of a job in a route.
#[derive(Serialize, Deserialize, Hash, Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub enum ActivityId {
    Service(JobIdx),
    ShipmentPickup(JobIdx),
    ShipmentDelivery(JobIdx),
}

impl ActivityId {
    pub fn service(idx: impl Into<JobIdx>) -> Self {
        ActivityId::Service(idx.into())
    }

    pub fn shipment_pickup(idx: impl Into<JobIdx>) -> Self {
        ActivityId::ShipmentPickup(idx.into())
    }

    pub fn shipment_delivery(idx: impl Into<JobIdx>) -> Self {
        ActivityId::ShipmentDelivery(idx.into())
    }

    pub fn is_shipment(&self) -> bool {
        matches!(
            self,
            ActivityId::ShipmentPickup(_) | ActivityId::ShipmentDelivery(_)
        )
    }

    pub fn job_id(&self) -> JobIdx {
        match self {
            ActivityId::Service(id)
            | ActivityId::ShipmentPickup(id)
            | ActivityId::ShipmentDelivery(id) => *id,
        }
    }
}

impl Display for ActivityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityId::Service(id) => write!(f, "Service({id})"),
            ActivityId::ShipmentPickup(id) => write!(f, "ShipmentPickup({id})"),
            ActivityId::ShipmentDelivery(id) => write!(f, "ShipmentDelivery({id})"),
        }
    }
}

pub enum JobActivity<'a> {
    Service(&'a Service),
    ShipmentPickup(&'a Shipment),
    ShipmentDelivery(&'a Shipment),
}

impl JobActivity<'_> {
    pub fn time_windows(&self) -> &TimeWindows {
        match self {
            JobActivity::Service(service) => service.time_windows(),
            JobActivity::ShipmentPickup(shipment) => shipment.pickup().time_windows(),
            JobActivity::ShipmentDelivery(shipment) => shipment.delivery().time_windows(),
        }
    }

    pub fn location_id(&self) -> LocationIdx {
        match self {
            JobActivity::Service(service) => service.location_id(),
            JobActivity::ShipmentPickup(shipment) => shipment.pickup().location_id(),
            JobActivity::ShipmentDelivery(shipment) => shipment.delivery().location_id(),
        }
    }

    pub fn duration(&self) -> SignedDuration {
        match self {
            JobActivity::Service(service) => service.duration(),
            JobActivity::ShipmentPickup(shipment) => shipment.pickup().duration(),
            JobActivity::ShipmentDelivery(shipment) => shipment.delivery().duration(),
        }
    }

    pub fn demand(&self) -> &Capacity {
        match self {
            JobActivity::Service(service) => service.demand(),
            JobActivity::ShipmentPickup(shipment) | JobActivity::ShipmentDelivery(shipment) => {
                shipment.demand()
            }
        }
    }

    /// Demand on board when the vehicle leaves its start location.
    pub fn initial_load(&self) -> Option<&Capacity> {
        match self {
            JobActivity::Service(service) if service.service_type() == ServiceType::Delivery => {
                Some(service.demand())
            }
            _ => None,
        }
    }

    /// Whether serving this activity adds its demand to the load on board.
    pub fn is_loading(&self) -> bool {
        match self {
            JobActivity::Service(service) => service.service_type() == ServiceType::Pickup,
            JobActivity::ShipmentPickup(_) => true,
            JobActivity::ShipmentDelivery(_) => false,
        }
    }

    /// Updates `load` from before to after this activity.
    pub fn apply_load(&self, load: &mut Capacity) {
        if self.is_loading() {
            *load += self.demand();
        } else {
            *load -= self.demand();
        }
    }
}

#[derive(Debug, Clone)]
pub enum Job {
    Service(Service),
    Shipment(Shipment),
}

impl Job {
    pub fn external_id(&self) -> &str {
        match self {
            Job::Service(service) => service.external_id(),
            Job::Shipment(shipment) => shipment.external_id(),
        }
    }

    pub fn demand(&self) -> &Capacity {
        match self {
            Job::Service(service) => service.demand(),
            Job::Shipment(shipment) => shipment.demand(),
        }
    }

    pub fn has_time_windows(&self) -> bool {
        match self {
            Job::Service(service) => service.has_time_windows(),
            Job::Shipment(shipment) => shipment.has_time_windows(),
        }
    }

    pub fn is_shipment(&self) -> bool {
        matches!(self, Job::Shipment(_))
    }

    /// Locations visited by this job, pickup first for shipments.
    pub fn location_ids(&self) -> impl Iterator<Item = LocationIdx> {
        let (first, second) = match self {
            Job::Service(service) => (service.location_id(), None),
            Job::Shipment(shipment) => (
                shipment.pickup().location_id(),
                Some(shipment.delivery().location_id()),
            ),
        };

        std::iter::once(first).chain(second)
    }

    pub fn activity_ids(&self, job_id: JobIdx) -> impl Iterator<Item = ActivityId> {
        let (first, second) = match self {
            Job::Service(_) => (ActivityId::Service(job_id), None),
            Job::Shipment(_) => (
                ActivityId::ShipmentPickup(job_id),
                Some(ActivityId::ShipmentDelivery(job_id)),
            ),
        };

        std::iter::once(first).chain(second)
    }

    pub fn time_windows(&self) -> impl Iterator<Item = &TimeWindows> {
        let (first, second) = match self {
            Job::Service(service) => (service.time_windows(), None),
            Job::Shipment(shipment) => (
                shipment.pickup().time_windows(),
                Some(shipment.delivery().time_windows()),
            ),
        };

        std::iter::once(first).chain(second)
    }
}

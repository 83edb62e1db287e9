use serde::Serialize;

use crate::{
    problem::job::{Job, JobIdx},
    solver::solution::{route::WorkingSolutionRoute, route_id::RouteIdx},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceInsertion {
    pub route_id: RouteIdx,
    pub job_index: JobIdx,
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShipmentInsertion {
    pub route_id: RouteIdx,
    pub job_index: JobIdx,

    /// Position of the pickup.
    pub pickup_position: usize,

    /// Position of the delivery in the route before the pickup is inserted,
    /// never lower than `pickup_position`.
    pub delivery_position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Insertion {
    Service(ServiceInsertion),
    Shipment(ShipmentInsertion),
}

impl Insertion {
    pub fn job_index(&self) -> JobIdx {
        match self {
            Insertion::Service(insertion) => insertion.job_index,
            Insertion::Shipment(insertion) => insertion.job_index,
        }
    }

    pub fn route_id(&self) -> RouteIdx {
        match self {
            Insertion::Service(insertion) => insertion.route_id,
            Insertion::Shipment(insertion) => insertion.route_id,
        }
    }

    /// First position of the route affected by the insertion.
    pub fn position(&self) -> usize {
        match self {
            Insertion::Service(insertion) => insertion.position,
            Insertion::Shipment(insertion) => insertion.pickup_position,
        }
    }
}

/// Calls `f` with every insertion of `job` into `route`, in increasing
/// position order.
pub fn for_each_route_insertion(
    route: &WorkingSolutionRoute,
    route_id: RouteIdx,
    job_index: JobIdx,
    job: &Job,
    mut f: impl FnMut(Insertion),
) {
    match job {
        Job::Service(_) => {
            for position in 0..=route.len() {
                f(Insertion::Service(ServiceInsertion {
                    route_id,
                    job_index,
                    position,
                }));
            }
        }
        Job::Shipment(_) => {
            for pickup_position in 0..=route.len() {
                for delivery_position in pickup_position..=route.len() {
                    f(Insertion::Shipment(ShipmentInsertion {
                        route_id,
                        job_index,
                        pickup_position,
                        delivery_position,
                    }));
                }
            }
        }
    }
}

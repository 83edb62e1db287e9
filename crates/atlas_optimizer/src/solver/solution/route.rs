use jiff::{SignedDuration, Timestamp};

use crate::{
    problem::{
        capacity::Capacity,
        job::{ActivityId, JobIdx},
        location::LocationIdx,
        travel_cost_matrix::{Cost, Distance},
        vehicle::{Vehicle, VehicleIdx},
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::insertion::{Insertion, ServiceInsertion, ShipmentInsertion},
    utils::time::{saturating_add, saturating_sub},
};

/// Ordered activities of one vehicle, with load, schedule and cost
/// aggregates kept in sync on every mutation.
#[derive(Debug, Clone)]
pub struct WorkingSolutionRoute {
    vehicle_id: VehicleIdx,

    /// Bumped on every mutation.
    version: u64,

    activity_ids: Vec<ActivityId>,

    /// Load on board when leaving the start location.
    initial_load: Capacity,

    /// loads[i] is the load on board after serving activity i.
    loads: Vec<Capacity>,

    /// fwd_load_peaks[i] is the element-wise peak of the initial load and loads[..=i].
    fwd_load_peaks: Vec<Capacity>,

    /// bwd_load_peaks[i] is the element-wise peak of loads[i..].
    bwd_load_peaks: Vec<Capacity>,

    arrival_times: Vec<Timestamp>,
    waiting_durations: Vec<SignedDuration>,
    departure_times: Vec<Timestamp>,

    /// latest_arrivals[i] is the latest arrival at activity i keeping the rest
    /// of the route feasible. `Timestamp::MAX` when unbounded.
    latest_arrivals: Vec<Timestamp>,

    /// Distance and transport cost from the start up to the arrival at activity i.
    cumulative_distances: Vec<Distance>,
    cumulative_costs: Vec<Cost>,

    start_time: Timestamp,
    end_time: Timestamp,
    total_distance: Distance,
    transport_cost: Cost,
}

/// Activities an insertion places in a route, together with the existing
/// activities enclosed between them.
pub struct InsertionSegment<'a> {
    /// First position of the current route replaced by the segment.
    pub from: usize,

    /// Position of the current route served right after the segment.
    pub resume: usize,

    first: ActivityId,
    enclosed: &'a [ActivityId],
    last: Option<ActivityId>,
}

impl InsertionSegment<'_> {
    pub fn activities(&self) -> impl Iterator<Item = ActivityId> + '_ {
        std::iter::once(self.first)
            .chain(self.enclosed.iter().copied())
            .chain(self.last)
    }
}

impl WorkingSolutionRoute {
    pub fn empty(problem: &VehicleRoutingProblem, vehicle_id: VehicleIdx) -> Self {
        let start_time = problem
            .vehicle(vehicle_id)
            .earliest_start_time()
            .unwrap_or(Timestamp::UNIX_EPOCH);

        WorkingSolutionRoute {
            vehicle_id,
            version: 0,
            activity_ids: Vec::new(),
            initial_load: Capacity::EMPTY,
            loads: Vec::new(),
            fwd_load_peaks: Vec::new(),
            bwd_load_peaks: Vec::new(),
            arrival_times: Vec::new(),
            waiting_durations: Vec::new(),
            departure_times: Vec::new(),
            latest_arrivals: Vec::new(),
            cumulative_distances: Vec::new(),
            cumulative_costs: Vec::new(),
            start_time,
            end_time: start_time,
            total_distance: 0.0,
            transport_cost: 0.0,
        }
    }

    pub fn vehicle_id(&self) -> VehicleIdx {
        self.vehicle_id
    }

    pub fn vehicle<'a>(&self, problem: &'a VehicleRoutingProblem) -> &'a Vehicle {
        problem.vehicle(self.vehicle_id)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.activity_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activity_ids.is_empty()
    }

    pub fn activity_ids(&self) -> &[ActivityId] {
        &self.activity_ids
    }

    pub fn activity_id(&self, position: usize) -> ActivityId {
        self.activity_ids[position]
    }

    pub fn position_of(&self, activity_id: ActivityId) -> Option<usize> {
        self.activity_ids.iter().position(|&id| id == activity_id)
    }

    pub fn contains_job(&self, job_id: JobIdx) -> bool {
        self.activity_ids.iter().any(|id| id.job_id() == job_id)
    }

    /// Jobs of the route, each once, in visiting order of their first activity.
    pub fn job_ids_iter(&self) -> impl Iterator<Item = JobIdx> + '_ {
        self.activity_ids
            .iter()
            .filter(|id| !matches!(id, ActivityId::ShipmentDelivery(_)))
            .map(ActivityId::job_id)
    }

    pub fn location_id(&self, problem: &VehicleRoutingProblem, position: usize) -> LocationIdx {
        problem.activity(self.activity_ids[position]).location_id()
    }

    pub fn start_location_id(&self, problem: &VehicleRoutingProblem) -> LocationIdx {
        self.vehicle(problem).start_location_id()
    }

    pub fn end_location_id(&self, problem: &VehicleRoutingProblem) -> Option<LocationIdx> {
        self.vehicle(problem).end_location_id()
    }

    /// Location visited right before `position`: the previous activity or the
    /// start location.
    pub fn previous_location_id(
        &self,
        problem: &VehicleRoutingProblem,
        position: usize,
    ) -> LocationIdx {
        if position == 0 {
            self.start_location_id(problem)
        } else {
            self.location_id(problem, position - 1)
        }
    }

    /// Location visited at `position`: the activity or, past the last
    /// activity, the end location.
    pub fn next_location_id(
        &self,
        problem: &VehicleRoutingProblem,
        position: usize,
    ) -> Option<LocationIdx> {
        if position < self.len() {
            Some(self.location_id(problem, position))
        } else {
            self.end_location_id(problem)
        }
    }

    pub fn initial_load(&self) -> &Capacity {
        &self.initial_load
    }

    pub fn load_after(&self, position: usize) -> &Capacity {
        &self.loads[position]
    }

    pub fn load_before(&self, position: usize) -> &Capacity {
        if position == 0 {
            &self.initial_load
        } else {
            &self.loads[position - 1]
        }
    }

    /// Peak load between the start and the arrival at `position`.
    pub fn fwd_load_peak_before(&self, position: usize) -> &Capacity {
        if position == 0 {
            &self.initial_load
        } else {
            &self.fwd_load_peaks[position - 1]
        }
    }

    pub fn bwd_load_peak(&self, position: usize) -> Option<&Capacity> {
        self.bwd_load_peaks.get(position)
    }

    pub fn max_load(&self) -> &Capacity {
        self.fwd_load_peaks.last().unwrap_or(&self.initial_load)
    }

    pub fn arrival_time(&self, position: usize) -> Timestamp {
        self.arrival_times[position]
    }

    pub fn waiting_duration(&self, position: usize) -> SignedDuration {
        self.waiting_durations[position]
    }

    pub fn departure_time(&self, position: usize) -> Timestamp {
        self.departure_times[position]
    }

    pub fn latest_arrival(&self, position: usize) -> Timestamp {
        self.latest_arrivals[position]
    }

    /// Departure from the stop visited right before `position`.
    pub fn departure_before(&self, position: usize) -> Timestamp {
        if position == 0 {
            self.start_time
        } else {
            self.departure_times[position - 1]
        }
    }

    pub fn start_time(&self) -> Timestamp {
        self.start_time
    }

    /// Arrival at the end location, or departure from the last activity for
    /// open routes.
    pub fn end_time(&self) -> Timestamp {
        self.end_time
    }

    pub fn total_distance(&self) -> Distance {
        self.total_distance
    }

    pub fn transport_cost(&self) -> Cost {
        self.transport_cost
    }

    /// Transport cost from the start up to the stop at `position`, the route
    /// end past the last activity.
    pub fn cost_up_to(&self, position: usize) -> Cost {
        if position < self.len() {
            self.cumulative_costs[position]
        } else {
            self.transport_cost
        }
    }

    /// Transport cost from the start up to the stop right before `position`.
    pub fn cost_before(&self, position: usize) -> Cost {
        if position == 0 {
            0.0
        } else {
            self.cumulative_costs[position - 1]
        }
    }

    /// Fixed cost of the vehicle plus transport cost. Zero for unused vehicles.
    pub fn total_cost(&self, problem: &VehicleRoutingProblem) -> Cost {
        if self.is_empty() {
            0.0
        } else {
            problem.fixed_vehicle_cost(self.vehicle(problem)) + self.transport_cost
        }
    }

    pub fn segment(&self, insertion: &Insertion) -> InsertionSegment<'_> {
        match *insertion {
            Insertion::Service(ServiceInsertion {
                job_index,
                position,
                ..
            }) => {
                let position = position.min(self.len());
                InsertionSegment {
                    from: position,
                    resume: position,
                    first: ActivityId::Service(job_index),
                    enclosed: &[],
                    last: None,
                }
            }
            Insertion::Shipment(ShipmentInsertion {
                job_index,
                pickup_position,
                delivery_position,
                ..
            }) => {
                let from = pickup_position.min(self.len());
                let resume = delivery_position.clamp(from, self.len());
                InsertionSegment {
                    from,
                    resume,
                    first: ActivityId::ShipmentPickup(job_index),
                    enclosed: &self.activity_ids[from..resume],
                    last: Some(ActivityId::ShipmentDelivery(job_index)),
                }
            }
        }
    }

    /// Whether the load stays within the vehicle capacity on every dimension
    /// after `insertion`.
    pub fn can_carry(&self, problem: &VehicleRoutingProblem, insertion: &Insertion) -> bool {
        let demand = problem.job(insertion.job_index()).demand();
        if demand.is_empty() {
            return true;
        }

        let capacity = problem.vehicle_type_of(self.vehicle(problem)).capacity();

        match *insertion {
            Insertion::Service(ServiceInsertion {
                job_index,
                position,
                ..
            }) => {
                let position = position.min(self.len());

                if problem.activity(ActivityId::Service(job_index)).is_loading() {
                    let mut peak = self.load_before(position).clone();
                    if let Some(bwd_peak) = self.bwd_load_peak(position) {
                        peak.update_max(bwd_peak);
                    }
                    peak.fits_with(demand, capacity)
                } else {
                    self.fwd_load_peak_before(position)
                        .fits_with(demand, capacity)
                }
            }
            Insertion::Shipment(_) => {
                let segment = self.segment(insertion);
                let mut peak = self.load_before(segment.from).clone();
                for load in &self.loads[segment.from..segment.resume] {
                    peak.update_max(load);
                }
                peak.fits_with(demand, capacity)
            }
        }
    }

    /// Whether every time window and the vehicle shift stay satisfied after
    /// `insertion`.
    pub fn is_schedule_feasible(
        &self,
        problem: &VehicleRoutingProblem,
        insertion: &Insertion,
    ) -> bool {
        let segment = self.segment(insertion);
        let mut location_id = self.previous_location_id(problem, segment.from);
        let mut departure = self.departure_before(segment.from);

        for activity_id in segment.activities() {
            let activity = problem.activity(activity_id);
            let Ok(arrival) =
                departure.checked_add(problem.travel_time(location_id, activity.location_id()))
            else {
                return false;
            };

            let Some(service_start) = activity.time_windows().service_start(arrival) else {
                return false;
            };

            let Ok(next_departure) = service_start.checked_add(activity.duration()) else {
                return false;
            };
            departure = next_departure;
            location_id = activity.location_id();
        }

        self.can_reach(problem, location_id, departure, segment.resume)
    }

    fn can_reach(
        &self,
        problem: &VehicleRoutingProblem,
        from: LocationIdx,
        departure: Timestamp,
        position: usize,
    ) -> bool {
        if position < self.len() {
            return departure
                .checked_add(problem.travel_time(from, self.location_id(problem, position)))
                .is_ok_and(|arrival| arrival <= self.latest_arrivals[position]);
        }

        let vehicle = self.vehicle(problem);
        let end_time = match vehicle.end_location_id() {
            Some(end) => match departure.checked_add(problem.travel_time(from, end)) {
                Ok(end_time) => end_time,
                Err(_) => return false,
            },
            None => departure,
        };

        vehicle
            .latest_end_time()
            .is_none_or(|latest_end| end_time <= latest_end)
    }

    /// Transport cost change caused by `insertion`.
    pub fn transport_cost_delta(&self, problem: &VehicleRoutingProblem, insertion: &Insertion) -> Cost {
        let vehicle = self.vehicle(problem);
        let segment = self.segment(insertion);

        let mut location_id = self.previous_location_id(problem, segment.from);
        let mut new_cost = 0.0;

        for activity_id in segment.activities() {
            let next_location_id = problem.activity(activity_id).location_id();
            new_cost += problem.travel_cost(vehicle, location_id, next_location_id);
            location_id = next_location_id;
        }

        new_cost += problem.travel_cost_or_zero(
            vehicle,
            Some(location_id),
            self.next_location_id(problem, segment.resume),
        );

        new_cost - (self.cost_up_to(segment.resume) - self.cost_before(segment.from))
    }

    pub fn insert(&mut self, problem: &VehicleRoutingProblem, insertion: &Insertion) {
        let segment = self.segment(insertion);
        let (from, resume) = (segment.from, segment.resume);

        match *insertion {
            Insertion::Service(ServiceInsertion { job_index, .. }) => {
                self.insert_activity(from, ActivityId::Service(job_index));
                self.update(problem, from, from);
            }
            Insertion::Shipment(ShipmentInsertion { job_index, .. }) => {
                self.insert_activity(from, ActivityId::ShipmentPickup(job_index));
                self.insert_activity(resume + 1, ActivityId::ShipmentDelivery(job_index));
                self.update(problem, from, resume + 1);
            }
        }
    }

    /// Removes every activity of `job_id`. Returns false when the job is not
    /// part of this route.
    pub fn remove_job(&mut self, problem: &VehicleRoutingProblem, job_id: JobIdx) -> bool {
        let Some(first) = self.activity_ids.iter().position(|id| id.job_id() == job_id) else {
            return false;
        };
        let last = self
            .activity_ids
            .iter()
            .rposition(|id| id.job_id() == job_id)
            .unwrap_or(first);

        self.remove_activity(last);
        if last != first {
            self.remove_activity(first);
        }

        self.update(problem, first, last.saturating_sub(1));

        true
    }

    /// Recomputes every aggregate from scratch.
    #[cfg(test)]
    pub fn resync(&mut self, problem: &VehicleRoutingProblem) {
        self.update(problem, 0, self.len().saturating_sub(1));
    }

    fn insert_activity(&mut self, position: usize, activity_id: ActivityId) {
        self.activity_ids.insert(position, activity_id);
        self.loads.insert(position, Capacity::EMPTY);
        self.fwd_load_peaks.insert(position, Capacity::EMPTY);
        self.bwd_load_peaks.insert(position, Capacity::EMPTY);
        self.arrival_times.insert(position, self.start_time);
        self.waiting_durations.insert(position, SignedDuration::ZERO);
        self.departure_times.insert(position, self.start_time);
        self.latest_arrivals.insert(position, Timestamp::MAX);
        self.cumulative_distances.insert(position, 0.0);
        self.cumulative_costs.insert(position, 0.0);
    }

    fn remove_activity(&mut self, position: usize) {
        self.activity_ids.remove(position);
        self.loads.remove(position);
        self.fwd_load_peaks.remove(position);
        self.bwd_load_peaks.remove(position);
        self.arrival_times.remove(position);
        self.waiting_durations.remove(position);
        self.departure_times.remove(position);
        self.latest_arrivals.remove(position);
        self.cumulative_distances.remove(position);
        self.cumulative_costs.remove(position);
    }

    /// Schedule aggregates are recomputed forward from `first`, latest
    /// arrivals backward from `last`. Loads change on both sides of a
    /// mutation and are recomputed over the whole route.
    fn update(&mut self, problem: &VehicleRoutingProblem, first: usize, last: usize) {
        self.version += 1;
        self.update_loads(problem);
        self.update_schedule(problem, first);
        self.update_latest_arrivals(problem, last);
    }

    fn update_loads(&mut self, problem: &VehicleRoutingProblem) {
        let mut initial_load = Capacity::EMPTY;
        for &activity_id in &self.activity_ids {
            if let Some(demand) = problem.activity(activity_id).initial_load() {
                initial_load += demand;
            }
        }

        let mut load = initial_load.clone();
        let mut peak = initial_load.clone();
        for (position, &activity_id) in self.activity_ids.iter().enumerate() {
            problem.activity(activity_id).apply_load(&mut load);
            peak.update_max(&load);
            self.loads[position].update(&load);
            self.fwd_load_peaks[position].update(&peak);
        }

        let mut bwd_peak = Capacity::EMPTY;
        for position in (0..self.activity_ids.len()).rev() {
            bwd_peak.update_max(&self.loads[position]);
            self.bwd_load_peaks[position].update(&bwd_peak);
        }

        self.initial_load = initial_load;
    }

    fn update_schedule(&mut self, problem: &VehicleRoutingProblem, first: usize) {
        let vehicle = problem.vehicle(self.vehicle_id);

        let mut location_id = self.previous_location_id(problem, first);
        let mut departure = self.departure_before(first);
        let mut distance = if first == 0 {
            0.0
        } else {
            self.cumulative_distances[first - 1]
        };
        let mut cost = self.cost_before(first);

        for position in first..self.activity_ids.len() {
            let activity = problem.activity(self.activity_ids[position]);
            let next_location_id = activity.location_id();

            distance += problem.travel_distance(location_id, next_location_id);
            cost += problem.travel_cost(vehicle, location_id, next_location_id);

            let arrival =
                saturating_add(departure, problem.travel_time(location_id, next_location_id));
            let service_start = activity
                .time_windows()
                .service_start(arrival)
                .unwrap_or(arrival);

            self.arrival_times[position] = arrival;
            self.waiting_durations[position] = service_start.duration_since(arrival);
            departure = saturating_add(service_start, activity.duration());
            self.departure_times[position] = departure;
            self.cumulative_distances[position] = distance;
            self.cumulative_costs[position] = cost;

            location_id = next_location_id;
        }

        if self.activity_ids.is_empty() {
            self.end_time = self.start_time;
            self.total_distance = 0.0;
            self.transport_cost = 0.0;
            return;
        }

        if let Some(end_location_id) = vehicle.end_location_id() {
            distance += problem.travel_distance(location_id, end_location_id);
            cost += problem.travel_cost(vehicle, location_id, end_location_id);
            departure =
                saturating_add(departure, problem.travel_time(location_id, end_location_id));
        }

        self.end_time = departure;
        self.total_distance = distance;
        self.transport_cost = cost;
    }

    fn update_latest_arrivals(&mut self, problem: &VehicleRoutingProblem, last: usize) {
        if self.activity_ids.is_empty() {
            return;
        }

        let vehicle = problem.vehicle(self.vehicle_id);
        let latest_end = vehicle.latest_end_time().unwrap_or(Timestamp::MAX);
        let last = last.min(self.activity_ids.len() - 1);

        for position in (0..=last).rev() {
            let activity = problem.activity(self.activity_ids[position]);
            let location_id = activity.location_id();

            let latest_departure = if position + 1 < self.activity_ids.len() {
                let next_location_id = self.location_id(problem, position + 1);
                saturating_sub(
                    self.latest_arrivals[position + 1],
                    problem.travel_time(location_id, next_location_id),
                )
            } else {
                match vehicle.end_location_id() {
                    Some(end_location_id) => saturating_sub(
                        latest_end,
                        problem.travel_time(location_id, end_location_id),
                    ),
                    None => latest_end,
                }
            };

            self.latest_arrivals[position] = activity
                .time_windows()
                .latest_arrival(latest_departure, activity.duration());
        }
    }

    /// Sum over dimensions of the load exceeding the vehicle capacity.
    pub fn over_capacity(&self, problem: &VehicleRoutingProblem) -> f64 {
        let capacity = problem.vehicle_type_of(self.vehicle(problem)).capacity();
        self.max_load().over_capacity(capacity)
    }

    /// Number of activities whose time windows were all closed on arrival.
    pub fn time_window_violations(&self, problem: &VehicleRoutingProblem) -> usize {
        self.activity_ids
            .iter()
            .zip(&self.arrival_times)
            .filter(|&(&activity_id, &arrival)| {
                problem
                    .activity(activity_id)
                    .time_windows()
                    .service_start(arrival)
                    .is_none()
            })
            .count()
    }

    /// Seconds the route ends past the vehicle's latest end.
    pub fn shift_overtime(&self, problem: &VehicleRoutingProblem) -> f64 {
        match self.vehicle(problem).latest_end_time() {
            Some(latest_end) if !self.is_empty() && self.end_time > latest_end => {
                self.end_time.duration_since(latest_end).as_secs_f64()
            }
            _ => 0.0,
        }
    }
}

impl PartialEq for WorkingSolutionRoute {
    fn eq(&self, other: &Self) -> bool {
        self.vehicle_id == other.vehicle_id
            && self.activity_ids == other.activity_ids
            && self.initial_load == other.initial_load
            && self.loads == other.loads
            && self.fwd_load_peaks == other.fwd_load_peaks
            && self.bwd_load_peaks == other.bwd_load_peaks
            && self.arrival_times == other.arrival_times
            && self.waiting_durations == other.waiting_durations
            && self.departure_times == other.departure_times
            && self.latest_arrivals == other.latest_arrivals
            && self.cumulative_distances == other.cumulative_distances
            && self.cumulative_costs == other.cumulative_costs
            && self.start_time == other.start_time
            && self.end_time == other.end_time
            && self.total_distance == other.total_distance
            && self.transport_cost == other.transport_cost
    }
}

use jiff::{SignedDuration, Timestamp};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    problem::{capacity::Capacity, job::ActivityId, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        accepted_solution::AcceptedSolution,
        score::{Score, ScoreAnalysis},
        solution::route::WorkingSolutionRoute,
    },
};

use super::types::{FromProblem, JsonVehicleRoutingProblem};

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct JsonDepotActivity {
    pub location_id: usize,
    pub time: Timestamp,
    pub load: Capacity,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct JsonJobActivity {
    pub job_id: String,
    pub location_id: usize,
    pub arrival_time: Timestamp,
    pub departure_time: Timestamp,
    pub waiting_duration: SignedDuration,

    /// Load carried when leaving the activity.
    pub load: Capacity,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum JsonSolutionActivity {
    Start(JsonDepotActivity),
    Service(JsonJobActivity),
    Pickup(JsonJobActivity),
    Delivery(JsonJobActivity),
    End(JsonDepotActivity),
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct JsonSolutionRoute {
    pub vehicle_id: String,
    pub vehicle_type: String,
    pub distance: f64,
    pub transport_cost: f64,
    pub total_cost: f64,
    pub duration: SignedDuration,
    pub max_load: Capacity,
    pub capacity: Capacity,
    pub activities: Vec<JsonSolutionActivity>,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct JsonSolution {
    pub score: Score,
    pub score_analysis: ScoreAnalysis,
    pub total_cost: f64,
    pub transport_cost: f64,
    pub fixed_cost: f64,
    pub distance: f64,
    pub vehicles_used: usize,
    pub routes: Vec<JsonSolutionRoute>,
    pub unassigned_jobs: Vec<String>,
}

/// Problem and solution in one document, enough to report on a solution
/// without solving again.
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct JsonProblemWithSolution {
    pub problem: JsonVehicleRoutingProblem,
    pub solution: JsonSolution,
}

impl JsonProblemWithSolution {
    pub fn new(solution: &AcceptedSolution) -> Self {
        let problem = solution.solution.problem();

        JsonProblemWithSolution {
            problem: JsonVehicleRoutingProblem::from_problem(problem, problem),
            solution: JsonSolution::from(solution),
        }
    }
}

fn job_activity(
    problem: &VehicleRoutingProblem,
    route: &WorkingSolutionRoute,
    position: usize,
) -> JsonSolutionActivity {
    let activity_id = route.activity_id(position);
    let activity = JsonJobActivity {
        job_id: problem.job(activity_id.job_id()).external_id().to_owned(),
        location_id: route.location_id(problem, position).get(),
        arrival_time: route.arrival_time(position),
        departure_time: route.departure_time(position),
        waiting_duration: route.waiting_duration(position),
        load: route.load_after(position).clone(),
    };

    match activity_id {
        ActivityId::Service(_) => JsonSolutionActivity::Service(activity),
        ActivityId::ShipmentPickup(_) => JsonSolutionActivity::Pickup(activity),
        ActivityId::ShipmentDelivery(_) => JsonSolutionActivity::Delivery(activity),
    }
}

impl FromProblem<&WorkingSolutionRoute> for JsonSolutionRoute {
    fn from_problem(route: &WorkingSolutionRoute, problem: &VehicleRoutingProblem) -> Self {
        let vehicle = route.vehicle(problem);
        let vehicle_type = problem.vehicle_type_of(vehicle);

        let mut activities = Vec::with_capacity(route.len() + 2);
        activities.push(JsonSolutionActivity::Start(JsonDepotActivity {
            location_id: route.start_location_id(problem).get(),
            time: route.start_time(),
            load: route.initial_load().clone(),
        }));

        activities.extend((0..route.len()).map(|position| job_activity(problem, route, position)));

        if let Some(end_location_id) = route.end_location_id(problem) {
            activities.push(JsonSolutionActivity::End(JsonDepotActivity {
                location_id: end_location_id.get(),
                time: route.end_time(),
                load: route
                    .len()
                    .checked_sub(1)
                    .map_or_else(|| route.initial_load(), |last| route.load_after(last))
                    .clone(),
            }));
        }

        JsonSolutionRoute {
            vehicle_id: vehicle.external_id().to_owned(),
            vehicle_type: vehicle_type.external_id().to_owned(),
            distance: route.total_distance(),
            transport_cost: route.transport_cost(),
            total_cost: route.total_cost(problem),
            duration: route.end_time().duration_since(route.start_time()),
            max_load: route.max_load().clone(),
            capacity: vehicle_type.capacity().clone(),
            activities,
        }
    }
}

impl From<&AcceptedSolution> for JsonSolution {
    fn from(value: &AcceptedSolution) -> Self {
        let solution = &value.solution;
        let problem = solution.problem();

        JsonSolution {
            score: value.score,
            score_analysis: value.score_analysis.clone(),
            total_cost: value.total_cost(),
            transport_cost: solution.transport_cost(),
            fixed_cost: solution.fixed_cost(),
            distance: solution.total_distance(),
            vehicles_used: value.vehicles_used(),
            routes: solution
                .non_empty_routes_iter()
                .map(|route| JsonSolutionRoute::from_problem(route, problem))
                .collect(),
            unassigned_jobs: solution
                .sorted_unassigned_jobs()
                .into_iter()
                .map(|job_id| problem.job(job_id).external_id().to_owned())
                .collect(),
        }
    }
}

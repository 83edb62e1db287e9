use std::sync::Arc;

use tracing::{Level, debug, instrument};

use crate::{
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        constraints::constraint::Constraint,
        recreate::construction_best_insertion::ConstructionBestInsertion,
        solution::working_solution::WorkingSolution,
    },
};

/// Cheapest insertion from a solution with every job unassigned. Jobs without
/// any feasible insertion stay unassigned.
#[instrument(skip_all, level = Level::DEBUG)]
pub fn construct_solution(
    problem: &Arc<VehicleRoutingProblem>,
    constraints: &[Constraint],
) -> WorkingSolution {
    debug!("Start construction heuristic");
    let mut solution = WorkingSolution::new(Arc::clone(problem));

    ConstructionBestInsertion::insert_jobs(&mut solution, constraints);
    solution.prune_empty_routes();

    debug!(
        routes = solution.non_empty_routes_count(),
        unassigned = solution.unassigned_jobs().len(),
        "Construction done"
    );

    solution
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use jiff::Timestamp;

    use super::*;
    use crate::{
        problem::vehicle::{VehicleBuilder, VehicleShift, VehicleShiftBuilder},
        solver::{
            constraints::constraint::default_constraints, solution::route::WorkingSolutionRoute,
        },
        test_utils,
    };

    fn create_problem(num_jobs: usize) -> Arc<VehicleRoutingProblem> {
        let mut coordinates = vec![(10.0, 10.0)];
        coordinates.extend((0..num_jobs).map(|index| ((index % 4) as f64, (index / 4) as f64)));
        let locations = test_utils::create_locations(coordinates);
        let services = test_utils::create_demand_services((1..=num_jobs).collect(), 1.0);

        Arc::new(test_utils::create_capacitated_problem(
            locations,
            services,
            vec![0],
            8.0,
        ))
    }

    #[test]
    fn test_eight_unit_jobs_fit_capacity_eight() {
        let problem = create_problem(8);
        let constraints = default_constraints(&problem, problem.default_unassigned_job_cost());

        let solution = construct_solution(&problem, &constraints);

        assert!(solution.unassigned_jobs().is_empty());
        assert_eq!(solution.non_empty_routes_count(), 1);
    }

    #[test]
    fn test_ninth_job_stays_unassigned() {
        let problem = create_problem(9);
        let constraints = default_constraints(&problem, problem.default_unassigned_job_cost());

        let solution = construct_solution(&problem, &constraints);

        assert_eq!(solution.unassigned_jobs().len(), 1);
        assert!(
            solution
                .routes()
                .iter()
                .all(|route| route.over_capacity(&problem) == 0.0)
        );
        let (score, _) = solution.compute_solution_score(&constraints);
        assert!(!score.is_failure());
    }

    #[test]
    fn test_construction_is_deterministic() {
        let problem = create_problem(9);
        let constraints = default_constraints(&problem, problem.default_unassigned_job_cost());

        let first = construct_solution(&problem, &constraints);
        let second = construct_solution(&problem, &constraints);

        assert!(first.is_identical(&second));
        assert_eq!(
            first
                .routes()
                .iter()
                .map(WorkingSolutionRoute::transport_cost)
                .collect::<Vec<_>>(),
            second
                .routes()
                .iter()
                .map(WorkingSolutionRoute::transport_cost)
                .collect::<Vec<_>>()
        );
    }

    fn far_away_problem(shift: Option<VehicleShift>) -> Arc<VehicleRoutingProblem> {
        let locations = test_utils::create_locations(vec![(0.0, 0.0), (1e12, 0.0)]);
        let mut builder = test_utils::capacitated_problem_builder(locations, vec![], 8.0);

        let mut vehicle = VehicleBuilder::default();
        vehicle.set_vehicle_id("far");
        vehicle.set_vehicle_type_id(0);
        vehicle.set_start_location_id(0);
        if let Some(shift) = shift {
            vehicle.set_shift(shift);
        }
        builder.set_vehicles(vec![vehicle.build().unwrap()]);
        builder.set_services(test_utils::create_demand_services(vec![1], 1.0));

        Arc::new(builder.build().unwrap())
    }

    #[test]
    fn test_schedule_past_timestamp_range_saturates() {
        let problem = far_away_problem(None);
        let constraints = default_constraints(&problem, problem.default_unassigned_job_cost());

        let solution = construct_solution(&problem, &constraints);

        assert!(solution.unassigned_jobs().is_empty());
        let route = solution.non_empty_routes_iter().next().unwrap();
        assert_eq!(route.arrival_time(0), Timestamp::MAX);
        assert_eq!(route.end_time(), Timestamp::MAX);
        assert_eq!(route.total_distance(), 2e12);
    }

    #[test]
    fn test_arrival_past_timestamp_range_is_infeasible() {
        let mut shift = VehicleShiftBuilder::default();
        shift.set_latest_end(Timestamp::MAX);
        let problem = far_away_problem(Some(shift.build()));
        let constraints = default_constraints(&problem, problem.default_unassigned_job_cost());

        let solution = construct_solution(&problem, &constraints);

        assert_eq!(solution.unassigned_jobs().len(), 1);
        assert_eq!(solution.non_empty_routes_count(), 0);
    }
}

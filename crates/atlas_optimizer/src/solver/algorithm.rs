use std::sync::Arc;

use jiff::Timestamp;
use parking_lot::RwLock;
use serde::Serialize;

use crate::problem::vehicle_routing_problem::VehicleRoutingProblem;

use super::{accepted_solution::AcceptedSolution, search::Search, solver_params::SolverParams};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum SolverStatus {
    Pending,
    Running,
    Completed,
}

pub struct VehicleRoutingAlgorithm {
    search: Search,
    status: RwLock<SolverStatus>,
    created_at: Timestamp,
}

pub fn create_algorithm(
    problem: impl Into<Arc<VehicleRoutingProblem>>,
    params: SolverParams,
) -> VehicleRoutingAlgorithm {
    VehicleRoutingAlgorithm::new(problem.into(), params)
}

impl VehicleRoutingAlgorithm {
    pub fn new(problem: Arc<VehicleRoutingProblem>, params: SolverParams) -> Self {
        VehicleRoutingAlgorithm {
            search: Search::new(params, problem),
            status: RwLock::new(SolverStatus::Pending),
            created_at: Timestamp::now(),
        }
    }

    pub fn problem(&self) -> &VehicleRoutingProblem {
        self.search.problem()
    }

    pub fn on_best_solution<F>(&mut self, callback: F)
    where
        F: FnMut(&AcceptedSolution) + Send + 'static,
    {
        self.search.on_best_solution(callback);
    }

    /// Runs the search and returns the best solution of every restart.
    pub fn search_solutions(&self) -> Vec<AcceptedSolution> {
        *self.status.write() = SolverStatus::Running;
        let solutions = self.search.run();
        *self.status.write() = SolverStatus::Completed;
        solutions
    }

    /// Cancels a running search. Restarts stop at their next iteration.
    pub fn stop(&self) {
        self.search.stop();
    }

    pub fn status(&self) -> SolverStatus {
        *self.status.read()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn current_best_solution(&self) -> Option<AcceptedSolution> {
        self.search.best_solution()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use jiff::SignedDuration;

    use super::*;
    use crate::{
        problem::{job::JobIdx, vehicle_routing_problem::VehicleRoutingProblemBuilder},
        selector::solution_comparator::best_of,
        solver::{
            ruin::{ruin_params::RuinParams, ruin_strategy::RuinStrategy},
            solver_params::{SolverAcceptorStrategy, Termination, Threads},
        },
        test_utils,
    };

    fn create_problem() -> VehicleRoutingProblem {
        let locations = test_utils::create_location_grid(6, 6);
        let services = test_utils::create_demand_services((1..30).collect(), 1.0);
        test_utils::create_capacitated_problem(locations, services, vec![0, 0, 35, 35], 8.0)
    }

    fn params(iterations: usize) -> SolverParams {
        SolverParams {
            terminations: vec![Termination::Iterations(iterations)],
            ruin: RuinParams {
                ruin_strategies: vec![
                    (RuinStrategy::Random, 1.0),
                    (RuinStrategy::Cluster, 1.0),
                    (RuinStrategy::Radial, 1.0),
                ],
                ..RuinParams::default()
            },
            ..SolverParams::default()
        }
    }

    fn routes_of(solution: &AcceptedSolution) -> Vec<Vec<JobIdx>> {
        solution
            .solution
            .routes()
            .iter()
            .map(|route| route.job_ids_iter().collect())
            .collect()
    }

    #[test]
    fn test_search_keeps_capacity_and_assigns_all_fitting_jobs() {
        let algorithm = create_algorithm(create_problem(), params(200));

        let solutions = algorithm.search_solutions();
        let best = best_of(&solutions).unwrap();

        assert_eq!(algorithm.status(), SolverStatus::Completed);
        assert_eq!(best.unassigned_count(), 0);
        assert!(best.is_feasible());
        assert!(
            best.solution
                .routes()
                .iter()
                .all(|route| route.over_capacity(algorithm.problem()) == 0.0)
        );
    }

    #[test]
    fn test_search_is_reproducible_across_threads() {
        let mut single = params(100);
        single.restarts = 3;
        single.search_threads = Threads::Single;

        let mut multi = single.clone();
        multi.search_threads = Threads::Multi(3);

        let problem = Arc::new(create_problem());
        let first = create_algorithm(Arc::clone(&problem), single).search_solutions();
        let second = create_algorithm(problem, multi).search_solutions();

        assert_eq!(first.len(), 3);
        assert_eq!(
            first.iter().map(routes_of).collect::<Vec<_>>(),
            second.iter().map(routes_of).collect::<Vec<_>>()
        );
        assert_eq!(
            first
                .iter()
                .map(AcceptedSolution::total_cost)
                .collect::<Vec<_>>(),
            second
                .iter()
                .map(AcceptedSolution::total_cost)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_best_solution_never_regresses() {
        // 24 units of capacity for 29 jobs, the penalty is part of every cost.
        let locations = test_utils::create_location_grid(6, 6);
        let services = test_utils::create_demand_services((1..30).collect(), 1.0);
        let problem =
            test_utils::create_capacitated_problem(locations, services, vec![0, 0, 35, 35], 6.0);

        let costs = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let mut params = params(150);
        params.solver_acceptor = SolverAcceptorStrategy::Threshold { tolerance: 1.2 };

        let mut algorithm = create_algorithm(problem, params);
        let recorded_costs = Arc::clone(&costs);
        algorithm.on_best_solution(move |solution| {
            recorded_costs.lock().push(solution.total_cost());
        });

        let solutions = algorithm.search_solutions();
        let costs = costs.lock();

        assert!(!costs.is_empty());
        assert!(costs.windows(2).all(|pair| pair[1] <= pair[0]));
        let best = best_of(&solutions).unwrap();
        assert_eq!(best.unassigned_count(), 5);
        assert_eq!(costs.last().copied(), Some(best.total_cost()));
    }

    #[test]
    fn test_duration_budget_stops_the_search() {
        let mut params = params(usize::MAX);
        params
            .terminations
            .push(Termination::Duration(SignedDuration::from_millis(200)));

        let algorithm = create_algorithm(create_problem(), params);
        let started_at = Timestamp::now();
        let solutions = algorithm.search_solutions();
        let elapsed = Timestamp::now().duration_since(started_at);

        assert_eq!(solutions.len(), 1);
        assert!(elapsed >= SignedDuration::from_millis(200));
        assert!(elapsed < SignedDuration::from_millis(1200), "{elapsed}");
    }

    #[test]
    fn test_cancelled_search_returns_construction() {
        let algorithm = create_algorithm(create_problem(), params(1_000_000));
        algorithm.stop();

        let solutions = algorithm.search_solutions();

        assert_eq!(solutions.len(), 1);
        assert_eq!(
            algorithm.current_best_solution().map(|s| s.total_cost()),
            Some(solutions[0].total_cost())
        );
    }

    #[test]
    fn test_empty_problem() {
        let mut builder = VehicleRoutingProblemBuilder::default();
        builder.set_locations(test_utils::create_location_grid(1, 2));
        builder.add_vehicle_type(test_utils::create_vehicle_type(8.0));
        builder.set_vehicles(test_utils::create_basic_vehicles(vec![0]));
        let problem = builder.build().unwrap();

        let algorithm = create_algorithm(problem, params(10));
        let solutions = algorithm.search_solutions();
        let best = best_of(&solutions).unwrap();

        assert_eq!(best.total_cost(), 0.0);
        assert_eq!(best.vehicles_used(), 0);
    }
}

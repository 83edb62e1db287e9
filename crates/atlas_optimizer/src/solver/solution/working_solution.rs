use std::sync::Arc;

use fxhash::FxHashSet;
use rand::{Rng, seq::IndexedRandom};

use crate::{
    problem::{
        job::JobIdx, travel_cost_matrix::Cost, vehicle::VehicleIdx,
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        constraints::{
            compute_insertion_score::{InsertionEvaluation, evaluate_insertion},
            constraint::Constraint,
        },
        insertion::Insertion,
        insertion_context::InsertionContext,
        score::{Score, ScoreAnalysis},
        solution::{route::WorkingSolutionRoute, route_id::RouteIdx},
    },
    utils::enumerate_idx::EnumerateIdx,
};

/// Routes plus the jobs left out of them. Cloning is cheap enough to keep a
/// candidate per search iteration.
#[derive(Clone, Debug)]
pub struct WorkingSolution {
    problem: Arc<VehicleRoutingProblem>,
    routes: Vec<WorkingSolutionRoute>,
    job_routes: Vec<Option<RouteIdx>>,
    unassigned_jobs: FxHashSet<JobIdx>,
}

impl WorkingSolution {
    /// Every job unassigned, one empty route per vehicle.
    pub fn new(problem: Arc<VehicleRoutingProblem>) -> Self {
        let routes = VehicleIdx::range(problem.vehicles().len())
            .map(|vehicle_id| WorkingSolutionRoute::empty(&problem, vehicle_id))
            .collect();
        let unassigned_jobs = JobIdx::range(problem.jobs().len()).collect();

        WorkingSolution {
            job_routes: vec![None; problem.jobs().len()],
            problem,
            routes,
            unassigned_jobs,
        }
    }

    pub fn problem(&self) -> &VehicleRoutingProblem {
        &self.problem
    }

    pub fn problem_arc(&self) -> Arc<VehicleRoutingProblem> {
        Arc::clone(&self.problem)
    }

    pub fn routes(&self) -> &[WorkingSolutionRoute] {
        &self.routes
    }

    pub fn route(&self, route_id: RouteIdx) -> &WorkingSolutionRoute {
        &self.routes[route_id]
    }

    pub fn non_empty_routes_iter(&self) -> impl Iterator<Item = &WorkingSolutionRoute> {
        self.routes.iter().filter(|route| !route.is_empty())
    }

    pub fn non_empty_routes_count(&self) -> usize {
        self.non_empty_routes_iter().count()
    }

    pub fn unassigned_jobs(&self) -> &FxHashSet<JobIdx> {
        &self.unassigned_jobs
    }

    /// Unassigned jobs in ascending index order.
    pub fn sorted_unassigned_jobs(&self) -> Vec<JobIdx> {
        let mut jobs = self.unassigned_jobs.iter().copied().collect::<Vec<_>>();
        jobs.sort_unstable();
        jobs
    }

    /// Assigned jobs in ascending index order.
    pub fn assigned_jobs(&self) -> Vec<JobIdx> {
        self.job_routes
            .iter()
            .enumerate_idx::<JobIdx>()
            .filter(|(_, route_id)| route_id.is_some())
            .map(|(job_id, _)| job_id)
            .collect()
    }

    pub fn route_of_job(&self, job_id: JobIdx) -> Option<RouteIdx> {
        self.job_routes[job_id.get()]
    }

    pub fn is_assigned(&self, job_id: JobIdx) -> bool {
        self.job_routes[job_id.get()].is_some()
    }

    pub fn random_assigned_job<R: Rng>(&self, rng: &mut R) -> Option<JobIdx> {
        self.assigned_jobs().choose(rng).copied()
    }

    pub fn transport_cost(&self) -> Cost {
        self.routes.iter().map(WorkingSolutionRoute::transport_cost).sum()
    }

    pub fn fixed_cost(&self) -> Cost {
        self.non_empty_routes_iter()
            .map(|route| self.problem.fixed_vehicle_cost(route.vehicle(&self.problem)))
            .sum()
    }

    pub fn total_distance(&self) -> f64 {
        self.routes.iter().map(WorkingSolutionRoute::total_distance).sum()
    }

    /// Feasibility and marginal cost of `insertion`, without mutating anything.
    pub fn can_insert(&self, constraints: &[Constraint], insertion: &Insertion) -> InsertionEvaluation {
        let context = InsertionContext::new(&self.problem, self, insertion);
        evaluate_insertion(constraints, &context)
    }

    pub fn insert(&mut self, insertion: &Insertion) {
        let route_id = insertion.route_id();
        let job_id = insertion.job_index();
        let was_empty = self.routes[route_id].is_empty();

        self.routes[route_id.get()].insert(&self.problem, insertion);
        self.job_routes[job_id.get()] = Some(route_id);
        self.unassigned_jobs.remove(&job_id);

        if was_empty && self.problem.fleet().is_infinite() {
            let vehicle_id = self.routes[route_id].vehicle_id();
            self.routes
                .push(WorkingSolutionRoute::empty(&self.problem, vehicle_id));
        }
    }

    /// Moves `job_id` back to the unassigned set. Returns false when it was
    /// not assigned.
    pub fn remove_job(&mut self, job_id: JobIdx) -> bool {
        let Some(route_id) = self.job_routes[job_id.get()] else {
            return false;
        };

        let removed = self.routes[route_id.get()].remove_job(&self.problem, job_id);
        self.job_routes[job_id.get()] = None;
        self.unassigned_jobs.insert(job_id);

        removed
    }

    /// With an infinite fleet, keeps exactly one empty route per vehicle.
    pub fn prune_empty_routes(&mut self) {
        if !self.problem.fleet().is_infinite() {
            return;
        }

        let mut has_empty_route = FxHashSet::default();
        self.routes
            .retain(|route| !route.is_empty() || has_empty_route.insert(route.vehicle_id()));

        for vehicle_id in VehicleIdx::range(self.problem.vehicles().len()) {
            if !has_empty_route.contains(&vehicle_id) {
                self.routes
                    .push(WorkingSolutionRoute::empty(&self.problem, vehicle_id));
            }
        }

        self.job_routes.iter_mut().for_each(|route_id| *route_id = None);
        for (route_id, route) in self.routes.iter().enumerate_idx::<RouteIdx>() {
            for job_id in route.job_ids_iter() {
                self.job_routes[job_id.get()] = Some(route_id);
            }
        }
    }

    pub fn compute_solution_score(&self, constraints: &[Constraint]) -> (Score, ScoreAnalysis) {
        let mut score = Score::zero();
        let mut score_analysis = ScoreAnalysis::default();

        for constraint in constraints {
            let constraint_score = constraint.compute_score(&self.problem, self);
            score += constraint_score;
            *score_analysis
                .scores
                .entry(constraint.constraint_name().to_owned())
                .or_insert(Score::zero()) += constraint_score;
        }

        (score, score_analysis)
    }

    /// Same routes with the same activities, in the same order.
    pub fn is_identical(&self, other: &WorkingSolution) -> bool {
        let routes = |solution: &WorkingSolution| {
            let mut routes = solution
                .non_empty_routes_iter()
                .map(|route| (route.vehicle_id(), route.activity_ids().to_vec()))
                .collect::<Vec<_>>();
            routes.sort_unstable();
            routes
        };

        self.unassigned_jobs == other.unassigned_jobs && routes(self) == routes(other)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        problem::fleet::FleetSize,
        solver::{
            constraints::constraint::default_constraints,
            insertion::ServiceInsertion,
        },
        test_utils::{self, TestRoute},
    };

    fn insertion(route_id: usize, job_index: usize, position: usize) -> Insertion {
        Insertion::Service(ServiceInsertion {
            route_id: RouteIdx::new(route_id),
            job_index: JobIdx::new(job_index),
            position,
        })
    }

    #[test]
    fn test_insert_and_remove_job() {
        let locations = test_utils::create_location_grid(3, 3);
        let services = test_utils::create_demand_services(vec![1, 2, 3, 4], 1.0);
        let problem = Arc::new(test_utils::create_capacitated_problem(
            locations,
            services,
            vec![0, 0],
            8.0,
        ));

        let mut solution = WorkingSolution::new(problem);
        assert_eq!(solution.unassigned_jobs().len(), 4);
        assert_eq!(solution.routes().len(), 2);

        solution.insert(&insertion(1, 2, 0));
        assert_eq!(solution.route_of_job(JobIdx::new(2)), Some(RouteIdx::new(1)));
        assert_eq!(solution.non_empty_routes_count(), 1);
        assert_eq!(solution.sorted_unassigned_jobs(), vec![
            JobIdx::new(0),
            JobIdx::new(1),
            JobIdx::new(3)
        ]);

        assert!(solution.remove_job(JobIdx::new(2)));
        assert!(!solution.remove_job(JobIdx::new(2)));
        assert_eq!(solution.unassigned_jobs().len(), 4);
        assert_eq!(solution.non_empty_routes_count(), 0);
    }

    #[test]
    fn test_infinite_fleet_keeps_an_empty_route() {
        let locations = test_utils::create_location_grid(3, 3);
        let services = test_utils::create_demand_services(vec![1, 2, 3], 1.0);
        let mut builder = test_utils::capacitated_problem_builder(locations, vec![0], 1.0);
        builder.set_services(services);
        builder.set_fleet_size(FleetSize::Infinite);
        let problem = Arc::new(builder.build().unwrap());

        let mut solution = WorkingSolution::new(problem);
        solution.insert(&insertion(0, 0, 0));
        assert_eq!(solution.routes().len(), 2);
        solution.insert(&insertion(1, 1, 0));
        assert_eq!(solution.routes().len(), 3);

        solution.remove_job(JobIdx::new(0));
        solution.prune_empty_routes();

        assert_eq!(solution.routes().len(), 2);
        assert_eq!(solution.route_of_job(JobIdx::new(1)), Some(RouteIdx::new(0)));
        assert!(solution.routes()[1].is_empty());
    }

    #[test]
    fn test_solution_score() {
        let locations = test_utils::create_locations(vec![(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]);
        let services = test_utils::create_demand_services(vec![1, 2], 1.0);
        let problem = Arc::new(test_utils::create_capacitated_problem(
            locations,
            services,
            vec![0],
            8.0,
        ));
        let solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![0],
            }],
        );

        let constraints = default_constraints(&problem, 100.0);
        let (score, analysis) = solution.compute_solution_score(&constraints);

        assert_eq!(score, Score::soft(10.0 + 100.0));
        assert_eq!(analysis.score_of("transport_cost"), Score::soft(10.0));
        assert_eq!(analysis.score_of("unassigned_jobs"), Score::soft(100.0));
    }

    #[test]
    fn test_can_insert_does_not_mutate() {
        let locations = test_utils::create_locations(vec![(0.0, 0.0), (3.0, 4.0)]);
        let services = test_utils::create_demand_services(vec![1], 1.0);
        let problem = Arc::new(test_utils::create_capacitated_problem(
            locations,
            services,
            vec![0],
            8.0,
        ));
        let constraints = default_constraints(&problem, 100.0);
        let solution = WorkingSolution::new(problem);

        let evaluation = solution.can_insert(&constraints, &insertion(0, 0, 0));

        assert!(evaluation.feasible);
        assert_eq!(evaluation.delta_cost, 10.0);
        assert_eq!(solution.unassigned_jobs().len(), 1);
    }
}

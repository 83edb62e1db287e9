use fxhash::FxHashSet;

use crate::{
    solver::solution::{route_id::RouteIdx, working_solution::WorkingSolution},
    utils::kruskal::kruskal_cluster,
};

use super::{ruin_context::RuinContext, ruin_solution::RuinSolution};

/// Removes the cluster of a random job inside its route, then moves on to the
/// closest job of a route not ruined yet.
pub struct RuinCluster;

impl RuinSolution for RuinCluster {
    fn ruin_solution<R>(
        &self,
        solution: &mut WorkingSolution,
        RuinContext {
            rng,
            num_jobs_to_remove,
            problem,
        }: RuinContext<R>,
    ) where
        R: rand::Rng,
    {
        let mut ruined_routes: FxHashSet<RouteIdx> = FxHashSet::default();

        let Some(mut target_job_id) = solution.random_assigned_job(rng) else {
            return;
        };
        let mut remaining_to_remove = num_jobs_to_remove;

        while remaining_to_remove > 0 {
            let Some(route_id) = solution.route_of_job(target_job_id) else {
                break;
            };

            let job_ids = solution.route(route_id).job_ids_iter().collect::<Vec<_>>();
            let cluster = kruskal_cluster(problem, &job_ids)
                .into_iter()
                .find(|cluster| cluster.contains(&target_job_id))
                .unwrap_or_else(|| vec![target_job_id]);

            for job_id in cluster {
                if remaining_to_remove == 0 {
                    break;
                }

                if solution.remove_job(job_id) {
                    remaining_to_remove -= 1;
                }
            }

            ruined_routes.insert(route_id);

            let Some(location_id) = problem.job(target_job_id).location_ids().next() else {
                break;
            };

            if let Some(activity_id) =
                problem
                    .nearest_jobs_of_location(location_id)
                    .find(|activity_id| {
                        solution
                            .route_of_job(activity_id.job_id())
                            .is_some_and(|route_id| !ruined_routes.contains(&route_id))
                    })
            {
                target_job_id = activity_id.job_id();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        problem::job::JobIdx,
        test_utils::{self, TestRoute},
    };

    #[test]
    fn test_cluster_ruin_spreads_to_closest_route() {
        let locations = test_utils::create_locations(vec![
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (30.0, 0.0),
            (31.0, 0.0),
            (3.0, 0.0),
            (4.0, 0.0),
            (60.0, 0.0),
        ]);
        let services = test_utils::create_demand_services(vec![1, 2, 3, 4, 5, 6, 7], 1.0);
        let problem = Arc::new(test_utils::create_capacitated_problem(
            locations,
            services,
            vec![0, 0],
            8.0,
        ));
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![
                TestRoute {
                    vehicle_id: 0,
                    service_ids: vec![0, 1, 2, 3],
                },
                TestRoute {
                    vehicle_id: 1,
                    service_ids: vec![4, 5, 6],
                },
            ],
        );

        let mut rng = test_utils::MockRng::new(vec![0]);

        RuinCluster.ruin_solution(&mut solution, RuinContext {
            problem: &problem,
            rng: &mut rng,
            num_jobs_to_remove: 3,
        });

        assert_eq!(solution.sorted_unassigned_jobs(), vec![
            JobIdx::new(0),
            JobIdx::new(1),
            JobIdx::new(4),
        ]);
    }
}

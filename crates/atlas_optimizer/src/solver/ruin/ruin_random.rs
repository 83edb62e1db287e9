use rand::seq::IndexedRandom;

use crate::solver::solution::working_solution::WorkingSolution;

use super::{ruin_context::RuinContext, ruin_solution::RuinSolution};

/// Removes assigned jobs picked uniformly at random.
pub struct RuinRandom;

impl RuinSolution for RuinRandom {
    fn ruin_solution<R>(
        &self,
        solution: &mut WorkingSolution,
        RuinContext {
            rng,
            num_jobs_to_remove,
            ..
        }: RuinContext<R>,
    ) where
        R: rand::Rng,
    {
        let assigned_jobs = solution.assigned_jobs();

        for &job_id in assigned_jobs.choose_multiple(rng, num_jobs_to_remove) {
            solution.remove_job(job_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{SeedableRng, rngs::SmallRng};

    use super::*;
    use crate::test_utils::{self, TestRoute};

    #[test]
    fn test_random_ruin_removes_requested_count() {
        let locations = test_utils::create_location_grid(3, 3);
        let services = test_utils::create_demand_services(vec![1, 2, 3, 4, 5, 6], 1.0);
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
                    service_ids: vec![0, 1, 2],
                },
                TestRoute {
                    vehicle_id: 1,
                    service_ids: vec![3, 4, 5],
                },
            ],
        );
        let mut rng = SmallRng::seed_from_u64(1);

        RuinRandom.ruin_solution(&mut solution, RuinContext {
            problem: &problem,
            rng: &mut rng,
            num_jobs_to_remove: 4,
        });

        assert_eq!(solution.unassigned_jobs().len(), 4);
        assert_eq!(solution.assigned_jobs().len(), 2);
    }

    #[test]
    fn test_random_ruin_on_empty_solution() {
        let locations = test_utils::create_location_grid(2, 2);
        let services = test_utils::create_demand_services(vec![1, 2], 1.0);
        let problem = Arc::new(test_utils::create_capacitated_problem(
            locations,
            services,
            vec![0],
            8.0,
        ));
        let mut solution = WorkingSolution::new(Arc::clone(&problem));
        let mut rng = SmallRng::seed_from_u64(1);

        RuinRandom.ruin_solution(&mut solution, RuinContext {
            problem: &problem,
            rng: &mut rng,
            num_jobs_to_remove: 2,
        });

        assert_eq!(solution.unassigned_jobs().len(), 2);
    }
}

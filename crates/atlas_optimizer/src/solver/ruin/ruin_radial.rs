use crate::solver::solution::working_solution::WorkingSolution;

use super::{ruin_context::RuinContext, ruin_solution::RuinSolution};

/// Removes the jobs closest to a random assigned job, the job included.
pub struct RuinRadial;

impl RuinSolution for RuinRadial {
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
        let Some(seed_job_id) = solution.random_assigned_job(rng) else {
            return;
        };
        let Some(location_id) = problem.job(seed_job_id).location_ids().next() else {
            return;
        };

        let mut remaining_jobs_to_remove = num_jobs_to_remove;
        for activity_id in problem.nearest_jobs_of_location(location_id) {
            if remaining_jobs_to_remove == 0 {
                break;
            }

            if solution.remove_job(activity_id.job_id()) {
                remaining_jobs_to_remove -= 1;
            }
        }
    }
}

use crate::{
    problem::job::JobIdx,
    solver::{
        constraints::constraint::Constraint,
        insertion::for_each_route_insertion,
        insertion_cache::{InsertionCache, InsertionCacheEntry},
        solution::{route_id::RouteIdx, working_solution::WorkingSolution},
    },
};

use super::{recreate_context::RecreateContext, recreate_solution::RecreateSolution};

/// Global cheapest insertion: every round inserts the cheapest feasible
/// (job, route, position) triple over all unassigned jobs. Ties go to the
/// lowest job index, then the lowest route index, then the lowest position.
#[derive(Default)]
pub struct ConstructionBestInsertion;

impl ConstructionBestInsertion {
    pub fn insert_jobs(solution: &mut WorkingSolution, constraints: &[Constraint]) {
        // A route keeps its best insertion for a job until the route changes.
        let mut insertion_cache = InsertionCache::new();

        loop {
            let mut best_insertion: Option<InsertionCacheEntry> = None;

            for job_id in solution.sorted_unassigned_jobs() {
                for route_id in RouteIdx::range(solution.routes().len()) {
                    let version = solution.route(route_id).version();
                    let entry = match insertion_cache.get(route_id, version, job_id) {
                        Some(entry) => *entry,
                        None => {
                            let entry = best_route_insertion(solution, constraints, route_id, job_id);
                            insertion_cache.insert(route_id, version, job_id, entry);
                            entry
                        }
                    };

                    if let Some(entry) = entry
                        && best_insertion.is_none_or(|best| entry.delta_cost < best.delta_cost)
                    {
                        best_insertion = Some(entry);
                    }
                }
            }

            let Some(best_insertion) = best_insertion else {
                break;
            };

            let route_id = best_insertion.insertion.route_id();
            solution.insert(&best_insertion.insertion);
            insertion_cache.invalidate(route_id, solution.route(route_id).version());
        }
    }
}

/// Cheapest feasible position of `job_id` in one route, lowest position on ties.
pub fn best_route_insertion(
    solution: &WorkingSolution,
    constraints: &[Constraint],
    route_id: RouteIdx,
    job_id: JobIdx,
) -> Option<InsertionCacheEntry> {
    let mut best_insertion: Option<InsertionCacheEntry> = None;

    for_each_route_insertion(
        solution.route(route_id),
        route_id,
        job_id,
        solution.problem().job(job_id),
        |insertion| {
            let evaluation = solution.can_insert(constraints, &insertion);
            if evaluation.feasible
                && best_insertion.is_none_or(|best| evaluation.delta_cost < best.delta_cost)
            {
                best_insertion = Some(InsertionCacheEntry {
                    delta_cost: evaluation.delta_cost,
                    insertion,
                });
            }
        },
    );

    best_insertion
}

impl RecreateSolution for ConstructionBestInsertion {
    fn recreate_solution(&self, solution: &mut WorkingSolution, context: RecreateContext) {
        ConstructionBestInsertion::insert_jobs(solution, context.constraints);
    }
}

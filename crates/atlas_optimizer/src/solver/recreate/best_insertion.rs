use std::fmt::Display;

use jiff::Timestamp;
use rand::{Rng, rngs::SmallRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::{
    problem::{
        job::{Job, JobIdx},
        location::LocationIdx,
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        insertion::for_each_route_insertion,
        insertion_cache::InsertionCacheEntry,
        solution::{route_id::RouteIdx, working_solution::WorkingSolution},
    },
};

use super::{recreate_context::RecreateContext, recreate_solution::RecreateSolution};

/// Sequential insertion: jobs are taken one by one in the order of the sort
/// strategy, each one going to its cheapest feasible position.
#[derive(Default)]
pub struct BestInsertion {
    sort_method: BestInsertionSortStrategy,
    blink_rate: f64,
}

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BestInsertionSortStrategy {
    #[default]
    Random,
    Demand,
    Far,
    Close,
    TimeWindow,
}

impl Display for BestInsertionSortStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Random => write!(f, "Random"),
            Self::Demand => write!(f, "Demand"),
            Self::Far => write!(f, "Far"),
            Self::Close => write!(f, "Close"),
            Self::TimeWindow => write!(f, "TimeWindow"),
        }
    }
}

pub struct BestInsertionParams {
    pub sort_strategy: BestInsertionSortStrategy,
    pub blink_rate: f64,
}

/// Mean distance from the vehicle start locations.
fn distance_from_depots(problem: &VehicleRoutingProblem, location_id: LocationIdx) -> f64 {
    let vehicles = problem.vehicles();
    if vehicles.is_empty() {
        return 0.0;
    }

    vehicles
        .iter()
        .map(|vehicle| problem.travel_distance(vehicle.start_location_id(), location_id))
        .sum::<f64>()
        / vehicles.len() as f64
}

fn job_distance_from_depots(problem: &VehicleRoutingProblem, job: &Job) -> f64 {
    let (sum, count) = job
        .location_ids()
        .fold((0.0, 0), |(sum, count), location_id| {
            (sum + distance_from_depots(problem, location_id), count + 1)
        });
    sum / count as f64
}

fn sort_jobs_by(
    problem: &VehicleRoutingProblem,
    jobs: &mut [JobIdx],
    key: impl Fn(&Job) -> f64,
) {
    jobs.sort_by(|&a, &b| key(problem.job(a)).total_cmp(&key(problem.job(b))));
}

impl BestInsertion {
    pub fn new(
        BestInsertionParams {
            sort_strategy: sort_method,
            blink_rate,
        }: BestInsertionParams,
    ) -> Self {
        BestInsertion {
            sort_method,
            blink_rate,
        }
    }

    /// Sorting is stable, jobs with equal keys keep their incoming order.
    pub fn sort_unassigned_jobs(
        &self,
        problem: &VehicleRoutingProblem,
        unassigned_jobs: &mut [JobIdx],
        rng: &mut SmallRng,
    ) {
        match self.sort_method {
            BestInsertionSortStrategy::Random => unassigned_jobs.shuffle(rng),
            BestInsertionSortStrategy::Demand => sort_jobs_by(problem, unassigned_jobs, |job| {
                -job.demand().iter().sum::<f64>()
            }),
            BestInsertionSortStrategy::Far => sort_jobs_by(problem, unassigned_jobs, |job| {
                -job_distance_from_depots(problem, job)
            }),
            BestInsertionSortStrategy::Close => sort_jobs_by(problem, unassigned_jobs, |job| {
                job_distance_from_depots(problem, job)
            }),
            BestInsertionSortStrategy::TimeWindow => {
                unassigned_jobs.sort_by_key(|&job_id| {
                    problem
                        .job(job_id)
                        .time_windows()
                        .flat_map(|time_windows| time_windows.iter())
                        .filter_map(|time_window| time_window.end())
                        .min()
                        .unwrap_or(Timestamp::MAX)
                });
            }
        }
    }

    fn should_blink(&self, rng: &mut SmallRng) -> bool {
        self.blink_rate > 0.0 && rng.random_bool(self.blink_rate)
    }

    pub fn insert_jobs(
        &self,
        unassigned_jobs: &[JobIdx],
        solution: &mut WorkingSolution,
        context: RecreateContext,
    ) {
        let RecreateContext {
            rng,
            constraints,
            problem,
        } = context;

        for &job_id in unassigned_jobs {
            let mut best_insertion: Option<InsertionCacheEntry> = None;

            for route_id in RouteIdx::range(solution.routes().len()) {
                for_each_route_insertion(
                    solution.route(route_id),
                    route_id,
                    job_id,
                    problem.job(job_id),
                    |insertion| {
                        if self.should_blink(rng) {
                            return;
                        }

                        let evaluation = solution.can_insert(constraints, &insertion);
                        if evaluation.feasible
                            && best_insertion
                                .is_none_or(|best| evaluation.delta_cost < best.delta_cost)
                        {
                            best_insertion = Some(InsertionCacheEntry {
                                delta_cost: evaluation.delta_cost,
                                insertion,
                            });
                        }
                    },
                );
            }

            if let Some(best_insertion) = best_insertion {
                solution.insert(&best_insertion.insertion);
            }
        }
    }
}

impl RecreateSolution for BestInsertion {
    fn recreate_solution(&self, solution: &mut WorkingSolution, context: RecreateContext) {
        let mut unassigned_jobs = solution.sorted_unassigned_jobs();
        self.sort_unassigned_jobs(context.problem, &mut unassigned_jobs, context.rng);
        self.insert_jobs(&unassigned_jobs, solution, context);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;

    use super::*;
    use crate::{
        problem::{service::ServiceBuilder, time_window::TimeWindow},
        solver::constraints::constraint::default_constraints,
        test_utils,
    };

    #[test]
    fn test_sort_far_and_close() {
        let locations =
            test_utils::create_locations(vec![(0.0, 0.0), (5.0, 0.0), (1.0, 0.0), (9.0, 0.0)]);
        let services = test_utils::create_demand_services(vec![1, 2, 3], 1.0);
        let problem = test_utils::create_capacitated_problem(locations, services, vec![0], 8.0);
        let mut rng = SmallRng::seed_from_u64(0);

        let mut jobs = vec![JobIdx::new(0), JobIdx::new(1), JobIdx::new(2)];
        BestInsertion::new(BestInsertionParams {
            sort_strategy: BestInsertionSortStrategy::Far,
            blink_rate: 0.0,
        })
        .sort_unassigned_jobs(&problem, &mut jobs, &mut rng);
        assert_eq!(jobs, vec![JobIdx::new(2), JobIdx::new(0), JobIdx::new(1)]);

        BestInsertion::new(BestInsertionParams {
            sort_strategy: BestInsertionSortStrategy::Close,
            blink_rate: 0.0,
        })
        .sort_unassigned_jobs(&problem, &mut jobs, &mut rng);
        assert_eq!(jobs, vec![JobIdx::new(1), JobIdx::new(0), JobIdx::new(2)]);
    }

    #[test]
    fn test_sort_by_time_window_end() {
        let locations = test_utils::create_location_grid(1, 4);
        let ends = [Some(300), None, Some(100)];
        let services = ends
            .iter()
            .enumerate()
            .map(|(index, end)| {
                let mut builder = ServiceBuilder::default();
                builder
                    .set_external_id(index.to_string())
                    .set_location_id(index + 1);
                if let Some(end) = end {
                    builder.add_time_window(TimeWindow::new(
                        None,
                        Some(Timestamp::from_second(*end).unwrap()),
                    ));
                }
                builder.build().unwrap()
            })
            .collect();
        let problem = test_utils::create_capacitated_problem(locations, services, vec![0], 8.0);
        let mut rng = SmallRng::seed_from_u64(0);

        let mut jobs = vec![JobIdx::new(0), JobIdx::new(1), JobIdx::new(2)];
        BestInsertion::new(BestInsertionParams {
            sort_strategy: BestInsertionSortStrategy::TimeWindow,
            blink_rate: 0.0,
        })
        .sort_unassigned_jobs(&problem, &mut jobs, &mut rng);

        assert_eq!(jobs, vec![JobIdx::new(2), JobIdx::new(0), JobIdx::new(1)]);
    }

    #[test]
    fn test_inserts_every_job_that_fits() {
        let locations = test_utils::create_location_grid(4, 4);
        let services = test_utils::create_demand_services((1..10).collect(), 1.0);
        let problem = Arc::new(test_utils::create_capacitated_problem(
            locations,
            services,
            vec![0, 15],
            4.0,
        ));
        let constraints = default_constraints(&problem, problem.default_unassigned_job_cost());
        let mut rng = SmallRng::seed_from_u64(7);
        let mut solution = WorkingSolution::new(Arc::clone(&problem));

        BestInsertion::new(BestInsertionParams {
            sort_strategy: BestInsertionSortStrategy::Random,
            blink_rate: 0.0,
        })
        .recreate_solution(&mut solution, RecreateContext {
            rng: &mut rng,
            constraints: &constraints,
            problem: &problem,
        });

        assert_eq!(solution.unassigned_jobs().len(), 1);
        assert!(
            solution
                .routes()
                .iter()
                .all(|route| route.over_capacity(&problem) == 0.0)
        );
    }
}

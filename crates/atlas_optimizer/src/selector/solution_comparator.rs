use std::cmp::Ordering;

use crate::{error::VrpError, solver::accepted_solution::AcceptedSolution};

/// Total order over solutions: fewer unassigned jobs first, then lower total
/// cost, then fewer vehicles used.
pub fn compare_solutions(a: &AcceptedSolution, b: &AcceptedSolution) -> Ordering {
    a.unassigned_count()
        .cmp(&b.unassigned_count())
        .then_with(|| a.total_cost().total_cmp(&b.total_cost()))
        .then_with(|| a.vehicles_used().cmp(&b.vehicles_used()))
}

/// Smallest solution per [`compare_solutions`], the first one on ties.
pub fn best_of(solutions: &[AcceptedSolution]) -> Result<&AcceptedSolution, VrpError> {
    solutions
        .iter()
        .min_by(|a, b| compare_solutions(a, b))
        .ok_or(VrpError::EmptySolutionSet)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        solver::constraints::constraint::default_constraints,
        test_utils::{self, TestRoute},
    };

    fn accepted_solutions() -> Vec<AcceptedSolution> {
        let locations = test_utils::create_locations(vec![(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]);
        let services = test_utils::create_demand_services(vec![1, 2], 1.0);
        let problem = Arc::new(test_utils::create_capacitated_problem(
            locations,
            services,
            vec![0, 0],
            8.0,
        ));
        let constraints = default_constraints(&problem, 1000.0);

        let routes = [
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![0],
            }],
            vec![
                TestRoute {
                    vehicle_id: 0,
                    service_ids: vec![0],
                },
                TestRoute {
                    vehicle_id: 1,
                    service_ids: vec![1],
                },
            ],
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![0, 1],
            }],
        ];

        routes
            .into_iter()
            .map(|routes| {
                AcceptedSolution::new(
                    test_utils::create_test_working_solution(Arc::clone(&problem), routes),
                    &constraints,
                )
            })
            .collect()
    }

    #[test]
    fn test_compare_solutions() {
        let solutions = accepted_solutions();

        assert_eq!(
            compare_solutions(&solutions[1], &solutions[0]),
            Ordering::Less
        );
        assert_eq!(
            compare_solutions(&solutions[2], &solutions[1]),
            Ordering::Less
        );
        assert_eq!(
            compare_solutions(&solutions[2], &solutions[2]),
            Ordering::Equal
        );
    }

    #[test]
    fn test_best_of() {
        let solutions = accepted_solutions();

        let best = best_of(&solutions).unwrap();
        assert_eq!(best.vehicles_used(), 1);
        assert_eq!(best.unassigned_count(), 0);
        assert_eq!(best.total_cost(), 20.0);
    }

    #[test]
    fn test_fewer_unassigned_jobs_cost_less() {
        // Six unit-capacity vehicles at the depot. Jobs 0..5 sit at the
        // depot, jobs 5..11 on a circle of radius 100.
        let mut coordinates = vec![(0.0, 0.0)];
        coordinates.extend((0..6).map(|index| {
            let angle = index as f64 * std::f64::consts::PI / 3.0;
            (100.0 * angle.cos(), 100.0 * angle.sin())
        }));
        let locations = test_utils::create_locations(coordinates);
        let services = test_utils::create_demand_services(
            vec![0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6],
            1.0,
        );
        let problem = Arc::new(test_utils::create_capacitated_problem(
            locations,
            services,
            vec![0; 6],
            1.0,
        ));
        let constraints = default_constraints(&problem, problem.default_unassigned_job_cost());

        let solution = |service_ids: std::ops::Range<usize>| {
            let routes = service_ids
                .enumerate()
                .map(|(vehicle_id, service_id)| TestRoute {
                    vehicle_id,
                    service_ids: vec![service_id],
                })
                .collect();
            AcceptedSolution::new(
                test_utils::create_test_working_solution(Arc::clone(&problem), routes),
                &constraints,
            )
        };

        let depot_jobs = solution(0..5);
        let far_jobs = solution(5..11);

        assert_eq!(depot_jobs.unassigned_count(), 6);
        assert_eq!(far_jobs.unassigned_count(), 5);
        assert_eq!(compare_solutions(&far_jobs, &depot_jobs), Ordering::Less);
        assert!(far_jobs.total_cost() < depot_jobs.total_cost());
    }

    #[test]
    fn test_best_of_empty() {
        assert_eq!(best_of(&[]).unwrap_err(), VrpError::EmptySolutionSet);
    }
}

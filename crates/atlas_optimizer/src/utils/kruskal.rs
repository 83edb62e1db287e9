use std::{cmp::Ordering, collections::BinaryHeap};

use crate::problem::{job::JobIdx, vehicle_routing_problem::VehicleRoutingProblem};

struct KruskalEdge {
    from: usize,
    to: usize,
    weight: f64,
}

impl PartialEq for KruskalEdge {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for KruskalEdge {}

impl PartialOrd for KruskalEdge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed, the heap pops the lightest edge first.
impl Ord for KruskalEdge {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| (other.from, other.to).cmp(&(self.from, self.to)))
    }
}

// Disjoint set union
struct Dsu {
    parent: Vec<usize>,
    num_components: usize,
}

impl Dsu {
    fn new(size: usize) -> Self {
        Dsu {
            parent: (0..size).collect(),
            num_components: size,
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let parent = self.parent[i];
        if parent == i {
            i
        } else {
            let root = self.find(parent);
            self.parent[i] = root;
            root
        }
    }

    fn union(&mut self, i: usize, j: usize) {
        let root_i = self.find(i);
        let root_j = self.find(j);
        if root_i != root_j {
            self.parent[root_i] = root_j;
            self.num_components -= 1;
        }
    }
}

/// Shortest distance between any two locations of the jobs, averaged over
/// both directions.
fn job_distance(problem: &VehicleRoutingProblem, a: JobIdx, b: JobIdx) -> f64 {
    let (job_a, job_b) = (problem.job(a), problem.job(b));

    job_a
        .location_ids()
        .flat_map(|from| {
            job_b.location_ids().map(move |to| {
                (problem.travel_distance(from, to) + problem.travel_distance(to, from)) / 2.0
            })
        })
        .fold(f64::INFINITY, f64::min)
}

/// Splits `job_ids` in two clusters by single linkage, i.e. Kruskal's
/// algorithm stopped when two components remain. Clusters come in order of
/// their first job in `job_ids`.
pub fn kruskal_cluster(problem: &VehicleRoutingProblem, job_ids: &[JobIdx]) -> Vec<Vec<JobIdx>> {
    let n = job_ids.len();

    if n <= 2 {
        return job_ids.iter().map(|&id| vec![id]).collect();
    }

    let mut edges = BinaryHeap::with_capacity(n * (n - 1) / 2);
    for from in 0..n {
        for to in (from + 1)..n {
            edges.push(KruskalEdge {
                from,
                to,
                weight: job_distance(problem, job_ids[from], job_ids[to]),
            });
        }
    }

    let mut dsu = Dsu::new(n);
    while dsu.num_components > 2
        && let Some(edge) = edges.pop()
    {
        dsu.union(edge.from, edge.to);
    }

    let mut roots: Vec<usize> = Vec::with_capacity(2);
    let mut clusters: Vec<Vec<JobIdx>> = Vec::with_capacity(2);
    for (index, &job_id) in job_ids.iter().enumerate() {
        let root = dsu.find(index);
        match roots.iter().position(|&r| r == root) {
            Some(cluster) => clusters[cluster].push(job_id),
            None => {
                roots.push(root);
                clusters.push(vec![job_id]);
            }
        }
    }

    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[test]
    fn test_kruskal_cluster_splits_far_groups() {
        let locations = test_utils::create_locations(vec![
            (0.0, 0.0),
            (1.0, 0.0),
            (20.0, 0.0),
            (2.0, 0.0),
            (21.0, 0.0),
        ]);
        let services = test_utils::create_demand_services(vec![1, 2, 3, 4], 1.0);
        let problem = test_utils::create_capacitated_problem(locations, services, vec![0], 8.0);

        let job_ids = JobIdx::range(4).collect::<Vec<_>>();
        let clusters = kruskal_cluster(&problem, &job_ids);

        assert_eq!(clusters, vec![
            vec![JobIdx::new(0), JobIdx::new(2)],
            vec![JobIdx::new(1), JobIdx::new(3)],
        ]);
    }

    #[test]
    fn test_kruskal_cluster_small_input() {
        let locations = test_utils::create_location_grid(2, 2);
        let services = test_utils::create_demand_services(vec![1, 2], 1.0);
        let problem = test_utils::create_capacitated_problem(locations, services, vec![0], 8.0);

        let clusters = kruskal_cluster(&problem, &[JobIdx::new(1), JobIdx::new(0)]);

        assert_eq!(clusters, vec![vec![JobIdx::new(1)], vec![JobIdx::new(0)]]);
    }
}

use fxhash::FxHashMap;

use crate::{
    problem::{job::JobIdx, travel_cost_matrix::Cost},
    solver::{insertion::Insertion, solution::route_id::RouteIdx},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InsertionCacheEntry {
    pub delta_cost: Cost,
    pub insertion: Insertion,
}

/// Best insertion of a job into a route, valid as long as the route version
/// does not change. `None` entries record that no feasible position exists.
#[derive(Default)]
pub struct InsertionCache {
    cache: FxHashMap<(RouteIdx, u64, JobIdx), Option<InsertionCacheEntry>>,
}

impl InsertionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &self,
        route_idx: RouteIdx,
        version: u64,
        job_idx: JobIdx,
    ) -> Option<&Option<InsertionCacheEntry>> {
        self.cache.get(&(route_idx, version, job_idx))
    }

    pub fn insert(
        &mut self,
        route_idx: RouteIdx,
        version: u64,
        job_idx: JobIdx,
        entry: Option<InsertionCacheEntry>,
    ) {
        self.cache.insert((route_idx, version, job_idx), entry);
    }

    /// Drops every entry of `route_idx` older than `version`.
    pub fn invalidate(&mut self, route_idx: RouteIdx, version: u64) {
        self.cache
            .retain(|&(cached_route, cached_version, _), _| {
                cached_route != route_idx || cached_version >= version
            });
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::insertion::ServiceInsertion;

    #[test]
    fn test_invalidate_keeps_other_routes() {
        let mut cache = InsertionCache::new();
        let entry = |route_id: usize| {
            Some(InsertionCacheEntry {
                delta_cost: 1.0,
                insertion: Insertion::Service(ServiceInsertion {
                    route_id: RouteIdx::new(route_id),
                    job_index: JobIdx::new(0),
                    position: 0,
                }),
            })
        };

        cache.insert(RouteIdx::new(0), 0, JobIdx::new(0), entry(0));
        cache.insert(RouteIdx::new(1), 0, JobIdx::new(0), entry(1));
        cache.insert(RouteIdx::new(1), 1, JobIdx::new(1), None);

        cache.invalidate(RouteIdx::new(1), 1);

        assert_eq!(cache.len(), 2);
        assert!(cache.get(RouteIdx::new(0), 0, JobIdx::new(0)).is_some());
        assert!(cache.get(RouteIdx::new(1), 0, JobIdx::new(0)).is_none());
        assert_eq!(cache.get(RouteIdx::new(1), 1, JobIdx::new(1)), Some(&None));
    }
}

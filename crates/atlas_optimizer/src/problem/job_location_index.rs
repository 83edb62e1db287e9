use rstar::RTree;
use rstar::primitives::GeomWithData;

use crate::problem::job::{ActivityId, Job, JobIdx};
use crate::utils::enumerate_idx::EnumerateIdx;

use super::distance_method::DistanceMethod;
use super::location::Location;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

type IndexedActivity = GeomWithData<[f64; 2], ActivityId>;

/// Spatial index over job activities, used to find the activities closest
/// to a location.
#[derive(Debug, Clone)]
pub struct JobLocationIndex {
    tree: RTree<IndexedActivity>,
    projection: Projection,
}

/// Maps locations to a plane where euclidean distance approximates travel
/// distance. Geographic coordinates use an equirectangular projection around
/// the mean latitude.
#[derive(Debug, Clone, Copy)]
enum Projection {
    Identity,
    Equirectangular { cos_latitude: f64 },
}

impl Projection {
    fn new(locations: &[Location], distance_method: DistanceMethod) -> Self {
        match distance_method {
            DistanceMethod::Euclidean => Projection::Identity,
            DistanceMethod::Haversine => {
                let mean_latitude = if locations.is_empty() {
                    0.0
                } else {
                    locations.iter().map(Location::lat).sum::<f64>() / locations.len() as f64
                };

                Projection::Equirectangular {
                    cos_latitude: mean_latitude.to_radians().cos(),
                }
            }
        }
    }

    fn project(&self, location: &Location) -> [f64; 2] {
        match self {
            Projection::Identity => [location.x(), location.y()],
            Projection::Equirectangular { cos_latitude } => [
                location.lon().to_radians() * cos_latitude * EARTH_RADIUS_METERS,
                location.lat().to_radians() * EARTH_RADIUS_METERS,
            ],
        }
    }
}

impl JobLocationIndex {
    pub fn new(locations: &[Location], jobs: &[Job], distance_method: DistanceMethod) -> Self {
        let projection = Projection::new(locations, distance_method);

        let activities = jobs
            .iter()
            .enumerate_idx::<JobIdx>()
            .flat_map(|(job_id, job)| job.activity_ids(job_id).zip(job.location_ids()))
            .filter_map(|(activity_id, location_id)| {
                locations
                    .get(location_id.get())
                    .map(|location| IndexedActivity::new(projection.project(location), activity_id))
            })
            .collect();

        JobLocationIndex {
            tree: RTree::bulk_load(activities),
            projection,
        }
    }

    /// Activities ordered by increasing distance to `location`.
    pub fn nearest_activities<'a>(
        &'a self,
        location: &Location,
    ) -> impl Iterator<Item = ActivityId> + 'a {
        let point = self.projection.project(location);
        self.tree
            .nearest_neighbor_iter(&point)
            .map(|indexed| indexed.data)
    }

    pub fn size(&self) -> usize {
        self.tree.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[test]
    fn test_nearest_activities() {
        let locations = test_utils::create_location_grid(3, 3);
        let services = test_utils::create_basic_services(vec![0, 4, 8]);
        let jobs = services.into_iter().map(Job::Service).collect::<Vec<_>>();
        let index = JobLocationIndex::new(&locations, &jobs, DistanceMethod::Euclidean);

        let nearest = index
            .nearest_activities(&Location::from_cartesian(2.0, 2.0))
            .collect::<Vec<_>>();

        assert_eq!(index.size(), 3);
        assert_eq!(
            nearest,
            vec![
                ActivityId::service(2),
                ActivityId::service(1),
                ActivityId::service(0)
            ]
        );
    }
}

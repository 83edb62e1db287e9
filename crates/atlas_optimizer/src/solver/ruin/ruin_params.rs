use rand::{Rng, seq::IndexedRandom};

use super::ruin_strategy::RuinStrategy;

#[derive(Clone, Debug)]
pub struct RuinParams {
    /// Strategies with their selection weight.
    pub ruin_strategies: Vec<(RuinStrategy, f64)>,
    pub ruin_minimum_ratio: f64,
    pub ruin_maximum_ratio: f64,
}

impl Default for RuinParams {
    fn default() -> Self {
        RuinParams {
            ruin_strategies: vec![(RuinStrategy::Random, 1.0), (RuinStrategy::Cluster, 1.0)],
            ruin_minimum_ratio: 0.05,
            ruin_maximum_ratio: 0.3,
        }
    }
}

impl RuinParams {
    /// Weighted draw. Falls back to random ruin when no strategy has a
    /// positive weight.
    pub fn select_strategy<R: Rng>(&self, rng: &mut R) -> RuinStrategy {
        self.ruin_strategies
            .choose_weighted(rng, |(_, weight)| *weight)
            .map(|(strategy, _)| *strategy)
            .unwrap_or(RuinStrategy::Random)
    }

    /// Number of jobs to remove, drawn between the minimum and maximum ratio
    /// of `num_jobs`. At least one job whenever there is a job.
    pub fn num_jobs_to_remove<R: Rng>(&self, num_jobs: usize, rng: &mut R) -> usize {
        if num_jobs == 0 {
            return 0;
        }

        let minimum_ruin_size = ((self.ruin_minimum_ratio * num_jobs as f64).ceil() as usize)
            .clamp(1, num_jobs);
        let maximum_ruin_size = ((self.ruin_maximum_ratio * num_jobs as f64).ceil() as usize)
            .clamp(minimum_ruin_size, num_jobs);

        rng.random_range(minimum_ruin_size..=maximum_ruin_size)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::SmallRng};

    use super::*;

    #[test]
    fn test_num_jobs_to_remove_bounds() {
        let params = RuinParams::default();
        let mut rng = SmallRng::seed_from_u64(3);

        for _ in 0..100 {
            let size = params.num_jobs_to_remove(100, &mut rng);
            assert!((5..=30).contains(&size));
        }

        assert_eq!(params.num_jobs_to_remove(0, &mut rng), 0);
        assert_eq!(params.num_jobs_to_remove(1, &mut rng), 1);
    }

    #[test]
    fn test_select_strategy_respects_weights() {
        let params = RuinParams {
            ruin_strategies: vec![(RuinStrategy::Random, 0.0), (RuinStrategy::Radial, 1.0)],
            ..RuinParams::default()
        };
        let mut rng = SmallRng::seed_from_u64(3);

        for _ in 0..20 {
            assert_eq!(params.select_strategy(&mut rng), RuinStrategy::Radial);
        }

        let empty = RuinParams {
            ruin_strategies: vec![],
            ..RuinParams::default()
        };
        assert_eq!(empty.select_strategy(&mut rng), RuinStrategy::Random);
    }
}

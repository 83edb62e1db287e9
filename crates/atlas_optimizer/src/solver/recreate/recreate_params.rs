use super::recreate_strategy::RecreateStrategy;

#[derive(Clone, Debug)]
pub struct RecreateParams {
    /// Picked uniformly at random on every iteration.
    pub recreate_strategies: Vec<RecreateStrategy>,
}

impl Default for RecreateParams {
    fn default() -> Self {
        RecreateParams {
            recreate_strategies: vec![RecreateStrategy::CheapestInsertion],
        }
    }
}

pub mod ruin_cluster;
pub mod ruin_context;
pub mod ruin_params;
pub mod ruin_radial;
pub mod ruin_random;
pub mod ruin_solution;
pub mod ruin_strategy;

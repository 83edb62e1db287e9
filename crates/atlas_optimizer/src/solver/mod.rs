pub mod accepted_solution;
pub mod algorithm;
pub mod constraints;
pub mod construction;
pub mod insertion;
pub mod insertion_cache;
pub mod insertion_context;
pub mod recreate;
pub mod ruin;
pub mod score;
pub mod score_level;
pub mod search;
pub mod solution;
pub mod solver_params;

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::solver::solution::working_solution::WorkingSolution;

use super::{
    ruin_cluster::RuinCluster, ruin_context::RuinContext, ruin_radial::RuinRadial,
    ruin_random::RuinRandom, ruin_solution::RuinSolution,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuinStrategy {
    Random,
    Cluster,
    Radial,
}

impl Display for RuinStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuinStrategy::Random => write!(f, "Random"),
            RuinStrategy::Cluster => write!(f, "Cluster"),
            RuinStrategy::Radial => write!(f, "Radial"),
        }
    }
}

impl RuinSolution for RuinStrategy {
    fn ruin_solution<R>(&self, solution: &mut WorkingSolution, context: RuinContext<R>)
    where
        R: rand::Rng,
    {
        match self {
            RuinStrategy::Random => RuinRandom.ruin_solution(solution, context),
            RuinStrategy::Cluster => RuinCluster.ruin_solution(solution, context),
            RuinStrategy::Radial => RuinRadial.ruin_solution(solution, context),
        }
    }
}

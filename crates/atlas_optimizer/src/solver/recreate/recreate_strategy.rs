use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::solver::solution::working_solution::WorkingSolution;

use super::{
    best_insertion::{BestInsertion, BestInsertionParams, BestInsertionSortStrategy},
    construction_best_insertion::ConstructionBestInsertion,
    recreate_context::RecreateContext,
    recreate_solution::RecreateSolution,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecreateStrategy {
    CheapestInsertion,
    BestInsertion(BestInsertionSortStrategy),
}

impl Display for RecreateStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CheapestInsertion => write!(f, "CheapestInsertion"),
            Self::BestInsertion(sort_method) => write!(f, "BestInsertion({sort_method})"),
        }
    }
}

impl RecreateSolution for RecreateStrategy {
    fn recreate_solution(&self, solution: &mut WorkingSolution, context: RecreateContext) {
        match self {
            RecreateStrategy::CheapestInsertion => {
                ConstructionBestInsertion.recreate_solution(solution, context);
            }
            RecreateStrategy::BestInsertion(sort_method) => {
                let strategy = BestInsertion::new(BestInsertionParams {
                    sort_strategy: *sort_method,
                    blink_rate: 0.01,
                });
                strategy.recreate_solution(solution, context);
            }
        }
    }
}

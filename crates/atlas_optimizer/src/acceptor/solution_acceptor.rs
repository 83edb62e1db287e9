use crate::solver::accepted_solution::AcceptedSolution;

use super::{
    accept_solution::{AcceptSolution, AcceptSolutionContext},
    schrimpf_acceptor::SchrimpfAcceptor,
    threshold_acceptor::ThresholdAcceptor,
};

pub enum SolutionAcceptor {
    Threshold(ThresholdAcceptor),
    Schrimpf(SchrimpfAcceptor),
}

impl AcceptSolution for SolutionAcceptor {
    fn accept(
        &self,
        current_solution: &AcceptedSolution,
        candidate: &AcceptedSolution,
        context: AcceptSolutionContext,
    ) -> bool {
        match self {
            SolutionAcceptor::Threshold(acceptor) => {
                acceptor.accept(current_solution, candidate, context)
            }
            SolutionAcceptor::Schrimpf(acceptor) => {
                acceptor.accept(current_solution, candidate, context)
            }
        }
    }
}

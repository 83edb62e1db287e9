use crate::solver::accepted_solution::AcceptedSolution;

pub struct AcceptSolutionContext {
    pub iteration: usize,
    /// Share of the search budget already spent, between 0 and 1.
    pub progress: f64,
}

pub trait AcceptSolution {
    fn accept(
        &self,
        current_solution: &AcceptedSolution,
        candidate: &AcceptedSolution,
        context: AcceptSolutionContext,
    ) -> bool;
}

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use jiff::Timestamp;
use parking_lot::{Mutex, RwLock};
use rand::{SeedableRng, rngs::SmallRng, seq::IndexedRandom};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    acceptor::{
        accept_solution::{AcceptSolution, AcceptSolutionContext},
        schrimpf_acceptor::SchrimpfAcceptor,
        solution_acceptor::SolutionAcceptor,
        threshold_acceptor::ThresholdAcceptor,
    },
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    selector::solution_comparator::{best_of, compare_solutions},
    timer_debug,
};

use super::{
    accepted_solution::AcceptedSolution,
    constraints::constraint::{Constraint, default_constraints},
    construction::construct_solution::construct_solution,
    recreate::{
        recreate_context::RecreateContext, recreate_solution::RecreateSolution,
        recreate_strategy::RecreateStrategy,
    },
    ruin::{ruin_context::RuinContext, ruin_solution::RuinSolution},
    solver_params::{SolverAcceptorStrategy, SolverParams, Termination},
};

type BestSolutionHandler = Arc<Mutex<dyn FnMut(&AcceptedSolution) + Send + 'static>>;

/// Ruin and recreate search, run once per restart from the construction
/// solution.
pub struct Search {
    problem: Arc<VehicleRoutingProblem>,
    constraints: Vec<Constraint>,
    params: SolverParams,
    best_solutions: Vec<RwLock<Option<AcceptedSolution>>>,
    on_best_solution_handler: Option<BestSolutionHandler>,
    is_stopped: AtomicBool,
}

struct SearchState {
    restart: usize,
    start: Timestamp,
    iteration: usize,
    iterations_without_improvement: usize,
    current: AcceptedSolution,
    best: AcceptedSolution,
}

impl Search {
    pub fn new(params: SolverParams, problem: Arc<VehicleRoutingProblem>) -> Self {
        let unassigned_job_cost = params
            .unassigned_job_cost
            .unwrap_or_else(|| problem.default_unassigned_job_cost());
        let restarts = params.restarts.max(1);

        if params.terminations.is_empty() {
            warn!("No termination configured, the search stops only when cancelled");
        }

        Search {
            constraints: default_constraints(&problem, unassigned_job_cost),
            best_solutions: (0..restarts).map(|_| RwLock::new(None)).collect(),
            on_best_solution_handler: None,
            is_stopped: AtomicBool::new(false),
            problem,
            params,
        }
    }

    pub fn problem(&self) -> &VehicleRoutingProblem {
        &self.problem
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn on_best_solution<F>(&mut self, callback: F)
    where
        F: FnMut(&AcceptedSolution) + Send + 'static,
    {
        self.on_best_solution_handler = Some(Arc::new(Mutex::new(callback)));
    }

    /// Best solution retained so far over all restarts.
    pub fn best_solution(&self) -> Option<AcceptedSolution> {
        let solutions = self
            .best_solutions
            .iter()
            .filter_map(|best_solution| best_solution.read().clone())
            .collect::<Vec<_>>();

        best_of(&solutions).ok().cloned()
    }

    pub fn stop(&self) {
        self.is_stopped.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.is_stopped.load(Ordering::Relaxed)
    }

    /// Runs every restart and returns their best solutions, in restart order.
    pub fn run(&self) -> Vec<AcceptedSolution> {
        let start = Timestamp::now();

        let initial_solution = AcceptedSolution::new(
            timer_debug!(
                "Construction",
                construct_solution(&self.problem, &self.constraints)
            ),
            &self.constraints,
        );

        info!(
            cost = initial_solution.total_cost(),
            unassigned = initial_solution.unassigned_count(),
            vehicles = initial_solution.vehicles_used(),
            "Initial solution"
        );

        for best_solution in &self.best_solutions {
            *best_solution.write() = Some(initial_solution.clone());
        }
        self.notify_best_solution(&initial_solution);

        // Each restart owns an RNG derived in restart order, results do not
        // depend on thread scheduling.
        let mut master_rng = SmallRng::seed_from_u64(self.params.seed);
        let restarts = (0..self.best_solutions.len())
            .map(|restart| (restart, SmallRng::from_rng(&mut master_rng)))
            .collect::<Vec<_>>();

        let num_threads = self.params.search_threads.number_of_threads();
        debug!("Running {} restarts on {} threads", restarts.len(), num_threads);

        let results = match rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
        {
            Ok(thread_pool) => thread_pool.install(|| {
                restarts
                    .into_par_iter()
                    .map(|(restart, rng)| self.run_restart(restart, &initial_solution, rng, start))
                    .collect::<Vec<_>>()
            }),
            Err(error) => {
                warn!(%error, "Cannot build the search thread pool, running restarts sequentially");
                restarts
                    .into_iter()
                    .map(|(restart, rng)| self.run_restart(restart, &initial_solution, rng, start))
                    .collect()
            }
        };

        if let Ok(best) = best_of(&results) {
            info!(
                cost = best.total_cost(),
                unassigned = best.unassigned_count(),
                vehicles = best.vehicles_used(),
                elapsed = %Timestamp::now().duration_since(start),
                "Search done"
            );
        }

        results
    }

    fn run_restart(
        &self,
        restart: usize,
        initial_solution: &AcceptedSolution,
        mut rng: SmallRng,
        start: Timestamp,
    ) -> AcceptedSolution {
        let solution_acceptor = self.create_solution_acceptor(initial_solution);
        let mut state = SearchState {
            restart,
            start,
            iteration: 0,
            iterations_without_improvement: 0,
            current: initial_solution.clone(),
            best: initial_solution.clone(),
        };

        while !self.should_terminate(&state) {
            self.run_iteration(&mut state, &solution_acceptor, &mut rng);
            state.iteration += 1;
        }

        state.best
    }

    fn create_solution_acceptor(&self, initial_solution: &AcceptedSolution) -> SolutionAcceptor {
        match self.params.solver_acceptor {
            SolverAcceptorStrategy::Threshold { tolerance } => {
                SolutionAcceptor::Threshold(ThresholdAcceptor::new(tolerance))
            }
            SolverAcceptorStrategy::Schrimpf {
                initial_threshold_ratio,
                alpha,
            } => SolutionAcceptor::Schrimpf(SchrimpfAcceptor::new(
                initial_threshold_ratio * initial_solution.total_cost(),
                alpha,
            )),
        }
    }

    fn check_termination(&self, state: &SearchState, termination: &Termination) -> bool {
        match *termination {
            Termination::Iterations(max_iterations) => state.iteration >= max_iterations,
            Termination::Duration(max_duration) => {
                Timestamp::now().duration_since(state.start) >= max_duration
            }
            Termination::IterationsWithoutImprovement(max_iterations_without_improvement) => {
                state.iterations_without_improvement >= max_iterations_without_improvement
            }
        }
    }

    fn should_terminate(&self, state: &SearchState) -> bool {
        if self.is_stopped() {
            debug!(
                restart = state.restart,
                "Search cancelled at iteration {}", state.iteration
            );
            return true;
        }

        self.params.terminations.iter().any(|termination| {
            if self.check_termination(state, termination) {
                debug!(
                    restart = state.restart,
                    "Termination condition met: {:?} at iteration {}", termination, state.iteration
                );
                true
            } else {
                false
            }
        })
    }

    /// Share of the tightest budget already spent.
    fn progress(&self, state: &SearchState) -> f64 {
        let by_iterations = self
            .params
            .max_iterations()
            .map(|max_iterations| state.iteration as f64 / max_iterations.max(1) as f64);
        let by_duration = self.params.max_duration().map(|max_duration| {
            let elapsed = Timestamp::now().duration_since(state.start).as_secs_f64();
            elapsed / max_duration.as_secs_f64().max(f64::EPSILON)
        });

        by_iterations
            .into_iter()
            .chain(by_duration)
            .fold(0.0, f64::max)
            .min(1.0)
    }

    fn run_iteration(
        &self,
        state: &mut SearchState,
        solution_acceptor: &SolutionAcceptor,
        rng: &mut SmallRng,
    ) {
        let mut candidate = state.current.solution.clone();

        let ruin_strategy = self.params.ruin.select_strategy(rng);
        let num_jobs_to_remove = self
            .params
            .ruin
            .num_jobs_to_remove(self.problem.jobs().len(), rng);
        ruin_strategy.ruin_solution(&mut candidate, RuinContext {
            problem: &self.problem,
            rng,
            num_jobs_to_remove,
        });

        let recreate_strategy = self
            .params
            .recreate
            .recreate_strategies
            .choose(rng)
            .copied()
            .unwrap_or(RecreateStrategy::CheapestInsertion);
        recreate_strategy.recreate_solution(&mut candidate, RecreateContext {
            rng,
            constraints: &self.constraints,
            problem: &self.problem,
        });
        candidate.prune_empty_routes();

        let candidate = AcceptedSolution::new(candidate, &self.constraints);

        if !candidate.is_feasible() {
            warn!(
                restart = state.restart,
                iteration = state.iteration,
                "Dropping candidate violating hard constraints: {:?}",
                candidate.score_analysis
            );
            state.iterations_without_improvement += 1;
            return;
        }

        if compare_solutions(&candidate, &state.best).is_lt() {
            debug!(
                restart = state.restart,
                iteration = state.iteration,
                %ruin_strategy,
                %recreate_strategy,
                cost = candidate.total_cost(),
                unassigned = candidate.unassigned_count(),
                "New best solution"
            );

            state.iterations_without_improvement = 0;
            state.best = candidate.clone();
            *self.best_solutions[state.restart].write() = Some(candidate.clone());
            self.notify_best_solution(&candidate);
            state.current = candidate;
            return;
        }

        state.iterations_without_improvement += 1;

        let context = AcceptSolutionContext {
            iteration: state.iteration,
            progress: self.progress(state),
        };
        if solution_acceptor.accept(&state.current, &candidate, context) {
            state.current = candidate;
        }
    }

    fn notify_best_solution(&self, solution: &AcceptedSolution) {
        if let Some(callback) = &self.on_best_solution_handler {
            callback.lock()(solution);
        }
    }
}

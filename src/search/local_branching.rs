use std::time::Instant;

use rand::Rng;
use serde::Serialize;

use dogs::search_algorithm::{StoppingCriterion, TimeStoppingCriterion};

use crate::params::LocalBranchingParams;
use crate::pids::{PidsInstance, Solution, CheckerResult, checker, distance_hamming, is_feasible};
use crate::report::RunLogger;
use crate::search::diversification::diversification;
use crate::search::fixing::{AgeTracker, forced_fixing};
use crate::search::greedy_roulette::greedy_roulette;
use crate::search::intensification::intensification;
use crate::solvers::mip::{MipSolver, Subproblem, solve_subproblem};


/** statistics of a local branching run (exported as JSON) */
#[derive(Debug, Clone, Serialize)]
pub struct LocalBranchingStats {
    /// parameters of the run (including the seed)
    pub params: LocalBranchingParams,
    /// score of the greedy solution
    pub initial_score: usize,
    /// (time, score, phase) for each new incumbent
    pub primal_list: Vec<(f32, usize, &'static str)>,
    /// number of iterations of the main loop
    pub nb_iterations: usize,
    /// number of intensifications
    pub nb_intensifications: usize,
    /// intensifications accepted directly (distance ≤ k)
    pub nb_near_improvements: usize,
    /// far improvements that triggered a re-optimization
    pub nb_reoptimizations: usize,
    /// re-optimizations that improved the incumbent
    pub nb_reoptimization_improvements: usize,
    /// number of diversifications
    pub nb_diversifications: usize,
    /// diversifications that improved the incumbent
    pub nb_diversification_improvements: usize,
    /// solver calls that failed
    pub nb_solver_failures: usize,
    /// vertices excluded for good by the age policy
    pub nb_permanently_excluded: usize,
    /// score of the returned solution
    pub final_score: usize,
    /// time spent in the search
    pub time_searched: f32,
}

impl LocalBranchingStats {
    fn new(params:&LocalBranchingParams) -> Self {
        Self {
            params: params.clone(),
            initial_score: 0,
            primal_list: Vec::new(),
            nb_iterations: 0,
            nb_intensifications: 0,
            nb_near_improvements: 0,
            nb_reoptimizations: 0,
            nb_reoptimization_improvements: 0,
            nb_diversifications: 0,
            nb_diversification_improvements: 0,
            nb_solver_failures: 0,
            nb_permanently_excluded: 0,
            final_score: 0,
            time_searched: 0.,
        }
    }

    /// records a new incumbent
    fn improvement(
        &mut self,
        logger:&mut RunLogger,
        time_init:&Instant,
        sol:&Solution,
        phase:&'static str
    ) {
        let t = time_init.elapsed().as_secs_f32();
        self.primal_list.push((t, sol.score(), phase));
        logger.line(format!("{:<15} new best: {:<8} time: {:.3}", phase, sol.score(), t));
    }
}


/** local branching for the PIDS problem.
 1. builds an initial solution with the roulette greedy.
 2. until the time limit:
    - intensifies around the incumbent (MIP on a local branching neighborhood).
    - if improved within distance k, accepts the new solution. Otherwise, re-optimizes the
      candidate vertices (all free, every other vertex excluded) and accepts the result if it
      improves the incumbent.
    - if not improved, diversifies (destroy and repair) the incumbent.
The ages of the vertices persist across intensifications.
*/
pub fn local_branching<R:Rng + ?Sized>(
    inst:&dyn PidsInstance,
    solver:&mut dyn MipSolver,
    params:&LocalBranchingParams,
    rng:&mut R,
    logger:&mut RunLogger,
) -> (Solution, LocalBranchingStats) {
    let n = inst.nb_vertices();
    let time_init = Instant::now();
    let stopping_criterion = TimeStoppingCriterion::new(params.total_time);
    // seconds left before the global time limit
    let remaining = || (params.total_time - time_init.elapsed().as_secs_f32()).max(0.);
    let mut stats = LocalBranchingStats::new(params);
    let mut ages = AgeTracker::new(n, params.age_limit);
    // initial solution
    let mut incumbent = greedy_roulette(inst, rng);
    match checker(inst, &incumbent) {
        CheckerResult::Ok(_) => {},
        violation => log::warn!("initial solution is not feasible ({:?})", violation),
    }
    stats.initial_score = incumbent.score();
    logger.line(format!(
        "initial solution: {} vertices ({:.3} s)", incumbent.score(), time_init.elapsed().as_secs_f32()
    ));
    stats.primal_list.push((time_init.elapsed().as_secs_f32(), incumbent.score(), "greedy"));
    // main loop
    while !stopping_criterion.is_finished() {
        stats.nb_iterations += 1;
        stats.nb_intensifications += 1;
        let time_limit = params.intensification_time.min(remaining());
        let intensified = intensification(
            inst, solver, &incumbent, params.alpha, &mut ages, time_limit, rng
        );
        if intensified.solver_failed { stats.nb_solver_failures += 1; }
        if intensified.improved {
            let dist = distance_hamming(&incumbent, &intensified.solution);
            if dist <= params.k {
                incumbent = intensified.solution;
                stats.nb_near_improvements += 1;
                stats.improvement(logger, &time_init, &incumbent, "intensification");
            } else {
                // far from the incumbent: re-optimize the candidate vertices only
                stats.nb_reoptimizations += 1;
                logger.line(format!(
                    "improvement {} -> {} at distance {} > {}: re-optimizing",
                    incumbent.score(), intensified.solution.score(), dist, params.k
                ));
                let sub = Subproblem {
                    fixing: forced_fixing(n, &intensified.solution),
                    warm_start: Some(incumbent.clone()),
                    time_limit: remaining().min(params.reoptimization_time_cap),
                };
                let mut local_ages = AgeTracker::new(n, params.age_limit);
                let res = solve_subproblem(inst, solver, &sub, &mut local_ages, &incumbent);
                if res.is_failure() { stats.nb_solver_failures += 1; }
                let candidate = res.into_solution();
                if candidate.score() < incumbent.score() && is_feasible(inst, &candidate) {
                    incumbent = candidate;
                    stats.nb_reoptimization_improvements += 1;
                    stats.improvement(logger, &time_init, &incumbent, "re-optimization");
                }
            }
        } else {
            stats.nb_diversifications += 1;
            let phase_criterion = TimeStoppingCriterion::new(params.diversification_time.min(remaining()));
            let diversified = diversification(inst, &incumbent, params.beta, phase_criterion, rng);
            if diversified.improved {
                incumbent = diversified.solution;
                stats.nb_diversification_improvements += 1;
                stats.improvement(logger, &time_init, &incumbent, "diversification");
            }
        }
    }
    stats.nb_permanently_excluded = ages.nb_excluded();
    stats.final_score = incumbent.score();
    stats.time_searched = time_init.elapsed().as_secs_f32();
    logger.line(format!(
        "local branching: {} iterations, best: {} ({:.3} s)",
        stats.nb_iterations, stats.final_score, stats.time_searched
    ));
    (incumbent, stats)
}

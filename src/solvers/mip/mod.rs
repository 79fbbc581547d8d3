use std::fmt;

use bit_set::BitSet;

use crate::error::SolverFailure;
use crate::pids::{PidsInstance, Solution};
use crate::search::fixing::{AgeTracker, FixingState, count_states};

/// LP / MST / script writers
pub mod lp_format;

/// external CPLEX process
pub mod cplex;


/** restricted problem given to a MIP solver */
#[derive(Debug, Clone)]
pub struct Subproblem {
    /// decision for each vertex
    pub fixing: Vec<FixingState>,
    /// solution given as a hint to the solver (if any)
    pub warm_start: Option<Solution>,
    /// time given to the solver (seconds)
    pub time_limit: f32,
}

/** solves a subproblem: minimize the number of selected vertices such that every vertex is
selected or has half of its neighbors selected, while respecting the fixing.
Returns the selected vertices, or the reason why no solution was obtained.
*/
pub trait MipSolver: fmt::Debug {
    /// solves the subproblem
    fn solve(&mut self, inst:&dyn PidsInstance, sub:&Subproblem) -> Result<BitSet, SolverFailure>;
}


/** result of a solver call seen by the search */
#[derive(Debug)]
pub enum SubproblemResult {
    /// the solver returned an assignment (not validated yet)
    Solved(Solution),
    /// the solver failed. Contains the reference solution
    Failed {
        /// solution given by the caller
        fallback: Solution,
        /// why the call failed
        reason: SolverFailure,
    },
}

impl SubproblemResult {
    /// solution obtained (the fallback in case of failure)
    pub fn solution(&self) -> &Solution {
        match self {
            SubproblemResult::Solved(sol) => sol,
            SubproblemResult::Failed { fallback, .. } => fallback,
        }
    }

    /// consumes the result, returns the solution (the fallback in case of failure)
    pub fn into_solution(self) -> Solution {
        match self {
            SubproblemResult::Solved(sol) => sol,
            SubproblemResult::Failed { fallback, .. } => fallback,
        }
    }

    /// true iff the solver failed
    pub fn is_failure(&self) -> bool { matches!(self, SubproblemResult::Failed { .. }) }
}


/** calls the solver on a subproblem.
On success, updates the ages of the vertices and returns the solution made of the selected
vertices. On failure, returns the reference solution and leaves the ages untouched.
*/
pub fn solve_subproblem(
    inst:&dyn PidsInstance,
    solver:&mut dyn MipSolver,
    sub:&Subproblem,
    ages:&mut AgeTracker,
    reference:&Solution,
) -> SubproblemResult {
    let (nb_excluded, nb_free, nb_kept) = count_states(&sub.fixing);
    log::debug!(
        "subproblem: {} excluded, {} free, {} kept, time limit {:.2}",
        nb_excluded, nb_free, nb_kept, sub.time_limit
    );
    match solver.solve(inst, sub) {
        Ok(selected) => {
            ages.record(&sub.fixing, &selected);
            let sol = Solution::from_bitset(selected);
            log::debug!("solver returned {} vertices", sol.score());
            SubproblemResult::Solved(sol)
        },
        Err(reason) => {
            log::warn!("solver call failed ({}), keeping the solution of score {}", reason, reference.score());
            SubproblemResult::Failed { fallback: reference.clone(), reason }
        }
    }
}


/** test doubles for the solver */
#[cfg(test)]
pub mod stubs {
    use super::*;

    use crate::pids::is_feasible;

    /** enumerates every assignment of the free vertices (small instances only) */
    #[derive(Debug, Default)]
    pub struct ExhaustiveSolver {
        /// number of calls
        pub nb_calls: usize,
    }

    impl MipSolver for ExhaustiveSolver {
        fn solve(&mut self, inst:&dyn PidsInstance, sub:&Subproblem) -> Result<BitSet, SolverFailure> {
            self.nb_calls += 1;
            let free:Vec<usize> = inst.vertices()
                .filter(|v| sub.fixing[*v] == FixingState::Free).collect();
            let kept:Vec<usize> = inst.vertices()
                .filter(|v| sub.fixing[*v] == FixingState::Kept).collect();
            let mut best:Option<Solution> = None;
            for mask in 0..(1u64 << free.len()) {
                let mut sol = Solution::from_vertices(kept.iter().cloned());
                for (i,v) in free.iter().enumerate() {
                    if mask & (1 << i) != 0 { sol.insert(*v); }
                }
                let better = best.as_ref().map_or(true, |b| sol.score() < b.score());
                if better && is_feasible(inst, &sol) { best = Some(sol); }
            }
            best.map(|s| s.bitset().clone()).ok_or(SolverFailure::MissingSolution)
        }
    }

    /** always fails as if the output had no solution listing */
    #[derive(Debug, Default)]
    pub struct FailingSolver {
        /// number of calls
        pub nb_calls: usize,
    }

    impl MipSolver for FailingSolver {
        fn solve(&mut self, _inst:&dyn PidsInstance, _sub:&Subproblem) -> Result<BitSet, SolverFailure> {
            self.nb_calls += 1;
            Err(SolverFailure::MissingSolution)
        }
    }

    /** returns a given assignment, whatever the subproblem */
    #[derive(Debug)]
    pub struct CannedSolver {
        /// assignment returned
        pub selected: BitSet,
    }

    impl MipSolver for CannedSolver {
        fn solve(&mut self, _inst:&dyn PidsInstance, _sub:&Subproblem) -> Result<BitSet, SolverFailure> {
            Ok(self.selected.clone())
        }
    }
}

use crate::pids::{PidsInstance, Solution, CheckerResult, checker};
use crate::search::fixing::{AgeTracker, FixingState};
use crate::solvers::mip::{MipSolver, Subproblem, SubproblemResult, solve_subproblem};


/** solves the whole model at once (every vertex free, no warm start).
returns None if the solver fails or returns an infeasible solution.
*/
pub fn solve_exact(
    inst:&dyn PidsInstance,
    solver:&mut dyn MipSolver,
    time_limit:f32
) -> Option<Solution> {
    let n = inst.nb_vertices();
    let sub = Subproblem {
        fixing: vec![FixingState::Free ; n],
        warm_start: None,
        time_limit,
    };
    let mut ages = AgeTracker::new(n, usize::MAX);
    match solve_subproblem(inst, solver, &sub, &mut ages, &Solution::new()) {
        SubproblemResult::Solved(sol) => match checker(inst, &sol) {
            CheckerResult::Ok(_) => Some(sol),
            violation => {
                log::warn!("exact: solver solution rejected ({:?})", violation);
                None
            }
        },
        SubproblemResult::Failed { .. } => None,
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use bit_set::BitSet;

    use crate::compact_instance::CompactInstance;
    use crate::solvers::mip::stubs::{CannedSolver, ExhaustiveSolver, FailingSolver};

    #[test]
    fn test_exact_path() {
        let inst = CompactInstance::from_edges(4, &[(0,1), (1,2), (2,3)]);
        let sol = solve_exact(&inst, &mut ExhaustiveSolver::default(), 10.).unwrap();
        assert_eq!(sol.score(), 2);
    }

    #[test]
    fn test_exact_failures() {
        let inst = CompactInstance::from_edges(4, &[(0,1), (1,2), (2,3)]);
        assert!(solve_exact(&inst, &mut FailingSolver::default(), 10.).is_none());
        let mut solver = CannedSolver { selected: [0].iter().cloned().collect::<BitSet>() };
        assert!(solve_exact(&inst, &mut solver, 10.).is_none());
    }
}

use rand::Rng;

use crate::pids::{PidsInstance, Solution, CheckerResult, checker};
use crate::search::fixing::{AgeTracker, build_neighborhood};
use crate::solvers::mip::{MipSolver, Subproblem, solve_subproblem};


/** result of an intensification */
#[derive(Debug, Clone)]
pub struct Intensified {
    /// best solution known after the phase (the incumbent if not improved)
    pub solution: Solution,
    /// true iff the solution is strictly better than the incumbent
    pub improved: bool,
    /// true iff the solver call failed
    pub solver_failed: bool,
}

/** searches a local branching neighborhood of the incumbent using the MIP solver.
The neighborhood frees a fraction alpha of the incumbent and some other vertices (with probability
alpha), keeps the other incumbent vertices, and excludes the rest. The solver result is accepted
only if it dominates every vertex and is strictly smaller than the incumbent.
*/
pub fn intensification<R:Rng + ?Sized>(
    inst:&dyn PidsInstance,
    solver:&mut dyn MipSolver,
    incumbent:&Solution,
    alpha:f64,
    ages:&mut AgeTracker,
    time_limit:f32,
    rng:&mut R,
) -> Intensified {
    let fixing = build_neighborhood(inst.nb_vertices(), incumbent, alpha, ages, rng);
    let sub = Subproblem {
        fixing,
        warm_start: Some(incumbent.clone()),
        time_limit,
    };
    let res = solve_subproblem(inst, solver, &sub, ages, incumbent);
    if res.is_failure() {
        return Intensified { solution: incumbent.clone(), improved: false, solver_failed: true };
    }
    let candidate = res.into_solution();
    match checker(inst, &candidate) {
        CheckerResult::Ok(score) if score < incumbent.score() => {
            Intensified { solution: candidate, improved: true, solver_failed: false }
        },
        CheckerResult::Ok(_) => {
            Intensified { solution: incumbent.clone(), improved: false, solver_failed: false }
        },
        violation => {
            log::warn!("intensification: solver solution rejected ({:?})", violation);
            Intensified { solution: incumbent.clone(), improved: false, solver_failed: false }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use bit_set::BitSet;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::compact_instance::CompactInstance;
    use crate::pids::is_feasible;
    use crate::solvers::mip::stubs::{CannedSolver, ExhaustiveSolver, FailingSolver};

    fn path4() -> CompactInstance {
        CompactInstance::from_edges(4, &[(0,1), (1,2), (2,3)])
    }

    #[test]
    fn test_improves_with_everything_free() {
        let inst = path4();
        let incumbent = Solution::from_vertices(vec![0,1,2,3]);
        let mut ages = AgeTracker::new(4, 10);
        let mut rng = StdRng::seed_from_u64(0);
        let res = intensification(&inst, &mut ExhaustiveSolver::default(), &incumbent, 1., &mut ages, 1., &mut rng);
        assert!(res.improved);
        assert!(!res.solver_failed);
        assert_eq!(res.solution.score(), 2);
        assert!(is_feasible(&inst, &res.solution));
    }

    #[test]
    fn test_never_worse_than_incumbent() {
        let inst = path4();
        let incumbent = Solution::from_vertices(vec![1,2]);
        let mut ages = AgeTracker::new(4, 10);
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let res = intensification(&inst, &mut ExhaustiveSolver::default(), &incumbent, 0.5, &mut ages, 1., &mut rng);
            assert!(!res.improved);
            assert_eq!(res.solution, incumbent);
        }
    }

    #[test]
    fn test_rejects_infeasible_solver_output() {
        let inst = path4();
        let incumbent = Solution::from_vertices(vec![0,1,2,3]);
        let mut ages = AgeTracker::new(4, 10);
        let mut solver = CannedSolver { selected: [0].iter().cloned().collect::<BitSet>() };
        let res = intensification(&inst, &mut solver, &incumbent, 0.3, &mut ages, 1., &mut StdRng::seed_from_u64(1));
        assert!(!res.improved);
        assert_eq!(res.solution, incumbent);
    }

    #[test]
    fn test_solver_failure() {
        let inst = path4();
        let incumbent = Solution::from_vertices(vec![0,1,2]);
        let mut ages = AgeTracker::new(4, 10);
        let res = intensification(&inst, &mut FailingSolver::default(), &incumbent, 0.3, &mut ages, 1., &mut StdRng::seed_from_u64(1));
        assert!(res.solver_failed);
        assert!(!res.improved);
        assert_eq!(res.solution.score(), 3);
    }
}

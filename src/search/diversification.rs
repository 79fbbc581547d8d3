use bit_set::BitSet;
use rand::Rng;
use rand::seq::SliceRandom;

use dogs::search_algorithm::StoppingCriterion;

use crate::pids::{PidsInstance, Solution, VertexId, is_feasible, undominated_vertices};
use crate::search::greedy_roulette::greedy_roulette_from_core;


/** result of a diversification */
#[derive(Debug, Clone)]
pub struct Diversified {
    /// best solution found (the input if not improved)
    pub solution: Solution,
    /// true iff the solution is strictly better than the input
    pub improved: bool,
    /// number of destroy and repair rounds performed
    pub nb_rounds: usize,
}

/// number of vertices removed from a solution of the given size
fn nb_destroyed(size:usize, beta:f64) -> usize {
    let nb = (size as f64 * beta).floor() as usize;
    nb.max(1).min(size)
}

/** destroys and repairs the best solution until the time limit is reached.
Each round removes a fraction beta of the best solution (at least one vertex), then rebuilds it
with the roulette greedy restricted to the removed and undominated vertices. A rebuilt solution
replaces the best one if it is feasible and strictly smaller.
*/
pub fn diversification<Stopping:StoppingCriterion, R:Rng + ?Sized>(
    inst:&dyn PidsInstance,
    best:&Solution,
    beta:f64,
    stopping_criterion:Stopping,
    rng:&mut R,
) -> Diversified {
    let mut res = Diversified { solution: best.clone(), improved: false, nb_rounds: 0 };
    while !stopping_criterion.is_finished() {
        if res.solution.is_empty() { break; }
        let members:Vec<VertexId> = res.solution.to_vec();
        let removed:BitSet = members
            .choose_multiple(rng, nb_destroyed(members.len(), beta))
            .cloned()
            .collect();
        let core = Solution::from_vertices(members.iter().cloned().filter(|v| !removed.contains(*v)));
        let mut considerable = undominated_vertices(inst, &core);
        considerable.union_with(&removed);
        let repaired = greedy_roulette_from_core(inst, &core, &considerable, rng);
        res.nb_rounds += 1;
        if repaired.score() < res.solution.score() && is_feasible(inst, &repaired) {
            log::debug!("diversification: {} -> {}", res.solution.score(), repaired.score());
            res.solution = repaired;
            res.improved = true;
        }
    }
    res
}

use bit_set::BitSet;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::pids::{Solution, VertexId};


/** decision taken for a vertex in a subproblem */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixingState {
    /// the vertex is not selected
    Excluded,
    /// the solver decides
    Free,
    /// the vertex is selected
    Kept,
}

impl FixingState {
    /// true iff the vertex takes part in the subproblem (free or kept)
    pub fn is_active(&self) -> bool { *self != FixingState::Excluded }
}


/** ages of the vertices across solver calls.
The age of an active vertex grows each time a solver call leaves it unselected, and is reset when
it is selected. Once it reaches the limit, the vertex is excluded for good.
*/
#[derive(Debug, Clone)]
pub struct AgeTracker {
    /// age of each vertex
    ages: Vec<usize>,
    /// permanently excluded vertices
    excluded: BitSet,
    /// age at which a vertex is excluded
    limit: usize,
}

impl AgeTracker {
    /// all ages start at 0, no vertex is excluded
    pub fn new(n:usize, limit:usize) -> Self {
        Self { ages: vec![0 ; n], excluded: BitSet::with_capacity(n), limit }
    }

    /// age of v
    pub fn age(&self, v:VertexId) -> usize { self.ages[v] }

    /// true iff v reached the age limit
    pub fn is_excluded(&self, v:VertexId) -> bool { self.excluded.contains(v) }

    /// number of permanently excluded vertices
    pub fn nb_excluded(&self) -> usize { self.excluded.len() }

    /** updates the ages after a successful solver call.
    every active vertex that is not excluded yet gets older, or younger (0) if selected.
    */
    pub fn record(&mut self, fixing:&[FixingState], selected:&BitSet) {
        for (v, state) in fixing.iter().enumerate() {
            if !state.is_active() || self.excluded.contains(v) { continue; }
            if selected.contains(v) {
                self.ages[v] = 0;
            } else {
                self.ages[v] += 1;
                if self.ages[v] >= self.limit {
                    log::debug!("vertex {} reached age {}: excluded", v, self.ages[v]);
                    self.excluded.insert(v);
                }
            }
        }
    }
}


/** builds the local branching neighborhood of a solution.
 - selected vertices: shuffled, the first ⌊|S|·alpha⌋ are free, the others kept.
 - other vertices: excluded if too old, free with probability alpha, excluded otherwise.
*/
pub fn build_neighborhood<R:Rng + ?Sized>(
    n:usize,
    sol:&Solution,
    alpha:f64,
    ages:&AgeTracker,
    rng:&mut R
) -> Vec<FixingState> {
    let mut res = vec![FixingState::Excluded ; n];
    let mut selected = sol.to_vec();
    selected.shuffle(rng);
    let nb_free = (selected.len() as f64 * alpha).floor() as usize;
    for (i,v) in selected.iter().enumerate() {
        res[*v] = if i < nb_free { FixingState::Free } else { FixingState::Kept };
    }
    for v in (0..n).filter(|v| !sol.contains(*v)) {
        if ages.is_excluded(v) { continue; }
        if rng.gen::<f64>() < alpha {
            res[v] = FixingState::Free;
        }
    }
    res
}

/** fixing that lets the solver choose among the vertices of a candidate only */
pub fn forced_fixing(n:usize, candidate:&Solution) -> Vec<FixingState> {
    (0..n).map(|v|
        if candidate.contains(v) { FixingState::Free } else { FixingState::Excluded }
    ).collect()
}

/// counts (excluded, free, kept) vertices
pub fn count_states(fixing:&[FixingState]) -> (usize, usize, usize) {
    fixing.iter().fold((0,0,0), |(e,f,k), s| match s {
        FixingState::Excluded => (e+1, f, k),
        FixingState::Free => (e, f+1, k),
        FixingState::Kept => (e, f, k+1),
    })
}

use bit_set::BitSet;
use ordered_float::OrderedFloat;
use rand::Rng;

use crate::pids::{PidsInstance, Solution, VertexId};


/** roulette wheel: each vertex owns an interval [l, l+w/W) of [0,1), in the given order. */
#[derive(Debug, Clone)]
pub struct Roulette {
    /// (vertex, lower bound, upper bound)
    intervals: Vec<(VertexId, f64, f64)>,
}

impl Roulette {
    /// builds the intervals. weights are normalized by their sum
    pub fn new(weighted:&[(VertexId, f64)]) -> Self {
        let total:f64 = weighted.iter().map(|(_,w)| *w).sum();
        let mut intervals = Vec::with_capacity(weighted.len());
        let mut l = 0.;
        for (v,w) in weighted {
            let length = if total > 0. { *w / total } else { 0. };
            intervals.push((*v, l, l + length));
            l += length;
        }
        Self { intervals }
    }

    /// builds the intervals after sorting the vertices by increasing weight
    pub fn sorted(weighted:&[(VertexId, f64)]) -> Self {
        let mut sorted = weighted.to_vec();
        sorted.sort_by_key(|(_,w)| OrderedFloat(*w));
        Self::new(&sorted)
    }

    /** vertex whose interval contains r.
    if none does (rounding errors), returns the last vertex.
    */
    pub fn draw(&self, r:f64) -> Option<VertexId> {
        self.intervals.iter()
            .find(|(_,l,u)| *l <= r && r < *u)
            .or_else(|| self.intervals.last())
            .map(|(v,_,_)| *v)
    }
}


/** remaining needs of the vertices: need(v) = ⌈d(v)/2⌉ - |N(v) ∩ S| for a vertex not
dominated by S, 0 otherwise.
*/
#[derive(Debug, Clone)]
struct Needs {
    /// need[v]
    needs: Vec<usize>,
    /// vertices with a positive need
    undominated: BitSet,
}

impl Needs {
    fn from_solution(inst:&dyn PidsInstance, sol:&Solution) -> Self {
        let n = inst.nb_vertices();
        let mut needs = vec![0 ; n];
        let mut undominated = BitSet::with_capacity(n);
        for v in inst.vertices().filter(|v| !sol.contains(*v)) {
            let nb_selected = inst.neighbors(v).iter().filter(|u| sol.contains(**u)).count();
            needs[v] = inst.threshold(v).saturating_sub(nb_selected);
            if needs[v] > 0 { undominated.insert(v); }
        }
        Self { needs, undominated }
    }

    /// adds v to the solution and updates the needs
    fn select(&mut self, inst:&dyn PidsInstance, sol:&mut Solution, v:VertexId) {
        sol.insert(v);
        self.needs[v] = 0;
        self.undominated.remove(v);
        for u in inst.neighbors(v) {
            if self.needs[*u] > 0 {
                self.needs[*u] -= 1;
                if self.needs[*u] == 0 { self.undominated.remove(*u); }
            }
        }
    }

    fn is_satisfied(&self) -> bool { self.undominated.is_empty() }

    /// uniformly random undominated vertex
    fn random_undominated<R:Rng + ?Sized>(&self, rng:&mut R) -> Option<VertexId> {
        let nb = self.undominated.len();
        if nb == 0 { return None; }
        self.undominated.iter().nth(rng.gen_range(0..nb))
    }
}


/** builds a feasible solution from scratch.
At each step, draws a vertex with a probability proportional to its degree (roulette over the
vertices sorted by probability). If the vertex is already dominated, draws uniformly among the
undominated vertices instead. Stops when every vertex is dominated.
On a graph without edges, every vertex is selected.
*/
pub fn greedy_roulette<R:Rng + ?Sized>(inst:&dyn PidsInstance, rng:&mut R) -> Solution {
    let sum_degrees:usize = inst.vertices().map(|v| inst.degree(v)).sum();
    if sum_degrees == 0 {
        return Solution::from_vertices(inst.vertices());
    }
    let weighted:Vec<(VertexId, f64)> = inst.vertices()
        .map(|v| (v, inst.degree(v) as f64))
        .collect();
    let roulette = Roulette::sorted(&weighted);
    let mut res = Solution::new();
    let mut needs = Needs::from_solution(inst, &res);
    while !needs.is_satisfied() {
        let mut v = match roulette.draw(rng.gen::<f64>()) {
            Some(v) => v,
            None => break,
        };
        if !needs.undominated.contains(v) {
            v = match needs.random_undominated(rng) {
                Some(u) => u,
                None => break,
            };
        }
        needs.select(inst, &mut res, v);
    }
    res
}


/** extends a partial solution (core) into a feasible one.
Candidates are the vertices of `considerable` or undominated, and not selected yet. They are drawn
with a probability proportional to their degree. An undominated vertex has a positive degree and
is never selected, so the candidates keep a positive total weight until the solution is feasible.
*/
pub fn greedy_roulette_from_core<R:Rng + ?Sized>(
    inst:&dyn PidsInstance,
    core:&Solution,
    considerable:&BitSet,
    rng:&mut R
) -> Solution {
    let mut res = core.clone();
    let mut needs = Needs::from_solution(inst, &res);
    while !needs.is_satisfied() {
        let candidates:Vec<VertexId> = considerable.union(&needs.undominated)
            .filter(|v| *v < inst.nb_vertices() && !res.contains(*v))
            .collect();
        let weighted:Vec<(VertexId, f64)> = candidates.iter()
            .map(|v| (*v, inst.degree(*v) as f64))
            .collect();
        match Roulette::new(&weighted).draw(rng.gen::<f64>()) {
            Some(v) => needs.select(inst, &mut res, v),
            None => break,
        }
    }
    res
}


#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::compact_instance::CompactInstance;
    use crate::pids::{checker, is_feasible, CheckerResult};

    /// graph with n vertices where i and j are adjacent iff (i*7 + j*3) % 5 == 0 or j == i+1
    fn pseudo_random_graph(n:usize) -> CompactInstance {
        let mut edges = Vec::new();
        for i in 0..n {
            for j in i+1..n {
                if (i*7 + j*3) % 5 == 0 || j == i+1 { edges.push((i,j)); }
            }
        }
        CompactInstance::from_edges(n, &edges)
    }

    #[test]
    fn test_roulette_draw() {
        let roulette = Roulette::new(&[(3, 1.), (5, 0.), (7, 3.)]);
        assert_eq!(roulette.draw(0.), Some(3));
        assert_eq!(roulette.draw(0.24), Some(3));
        assert_eq!(roulette.draw(0.25), Some(7));
        assert_eq!(roulette.draw(0.99), Some(7));
        // out of every interval: falls back on the last vertex
        assert_eq!(roulette.draw(1.), Some(7));
        assert_eq!(Roulette::new(&[]).draw(0.5), None);
    }

    #[test]
    fn test_roulette_sorted() {
        let roulette = Roulette::sorted(&[(0, 3.), (1, 1.)]);
        assert_eq!(roulette.draw(0.1), Some(1));
        assert_eq!(roulette.draw(0.5), Some(0));
    }

    #[test]
    fn test_edgeless_graph_selects_everything() {
        let inst = CompactInstance::from_edges(6, &[]);
        let mut rng = StdRng::seed_from_u64(1);
        let sol = greedy_roulette(&inst, &mut rng);
        assert_eq!(sol.score(), 6);
        assert_eq!(sol.to_vec(), vec![0,1,2,3,4,5]);
    }

    #[test]
    fn test_greedy_is_feasible() {
        let inst = pseudo_random_graph(40);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let sol = greedy_roulette(&inst, &mut rng);
            assert_eq!(checker(&inst, &sol), CheckerResult::Ok(sol.score()));
        }
    }

    #[test]
    fn test_greedy_is_reproducible() {
        let inst = pseudo_random_graph(30);
        let a = greedy_roulette(&inst, &mut StdRng::seed_from_u64(42));
        let b = greedy_roulette(&inst, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_core_keeps_core_and_repairs() {
        let inst = pseudo_random_graph(30);
        let core = Solution::from_vertices(vec![0, 10, 20]);
        let considerable:BitSet = (0..30).filter(|v| v % 2 == 1).collect();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let sol = greedy_roulette_from_core(&inst, &core, &considerable, &mut rng);
            assert!(is_feasible(&inst, &sol));
            assert!(core.iter().all(|v| sol.contains(v)));
        }
    }

    #[test]
    fn test_from_core_draws_among_undominated() {
        // no considerable vertex: only undominated vertices are drawn
        let inst = CompactInstance::from_edges(4, &[(0,1), (1,2), (2,3)]);
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let sol = greedy_roulette_from_core(&inst, &Solution::new(), &BitSet::new(), &mut rng);
            assert!(is_feasible(&inst, &sol));
        }
        // isolated vertices are dominated by the empty set, and never drawn
        let inst = CompactInstance::from_edges(5, &[(0,1)]);
        let mut rng = StdRng::seed_from_u64(0);
        let sol = greedy_roulette_from_core(&inst, &Solution::new(), &BitSet::new(), &mut rng);
        assert!(is_feasible(&inst, &sol));
        assert!(sol.iter().all(|v| v < 2));
    }

    #[test]
    fn test_from_feasible_core_adds_nothing() {
        let inst = CompactInstance::from_edges(4, &[(0,1), (1,2), (2,3)]);
        let core = Solution::from_vertices(vec![1,2]);
        let considerable:BitSet = (0..4).collect();
        let sol = greedy_roulette_from_core(&inst, &core, &considerable, &mut StdRng::seed_from_u64(0));
        assert_eq!(sol, core);
    }
}

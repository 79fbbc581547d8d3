use std::fmt;

use bit_set::BitSet;

/** Vertex Id */
pub type VertexId = usize;

/** models a Positive Influence Dominating Set instance (an undirected simple graph) */
pub trait PidsInstance: fmt::Debug {
    /// number of vertices
    fn nb_vertices(&self) -> usize;

    /// number of edges
    fn nb_edges(&self) -> usize;

    /// vertices adjacent to u (sorted)
    fn neighbors(&self, u:VertexId) -> &[VertexId];

    /// degree of u
    fn degree(&self, u:VertexId) -> usize { self.neighbors(u).len() }

    /// writes a solution in a file (selected vertices on a single line)
    fn write_solution(&self, filename:&str, solution:&Solution) -> std::io::Result<()>;

    /// iterates over the vertices
    fn vertices(&self) -> std::ops::Range<VertexId> { 0..self.nb_vertices() }

    /** number of neighbors of u that must be selected if u is not:
    ⌈d(u)/2⌉ (exact half for an even degree).
    */
    fn threshold(&self, u:VertexId) -> usize { (self.degree(u) + 1) / 2 }

    /// print statistics of the instance
    fn display_statistics(&self) {
        println!("\t{} \t vertices", self.nb_vertices());
        println!("\t{} \t edges", self.nb_edges());
        let degrees:Vec<usize> = self.vertices().map(|i| self.degree(i)).collect();
        if let (Some(min), Some(max)) = (degrees.iter().min(), degrees.iter().max()) {
            println!("\t{} \t min degree", min);
            println!("\t{} \t max degree", max);
        }
    }
}


/** a set of selected vertices with its score (cardinality).
A solution is not necessarily feasible: use [`checker`] or [`is_feasible`] before accepting it.
*/
#[derive(Debug, Clone, Default)]
pub struct Solution {
    /// selected vertices
    vertices: BitSet,
    /// cached cardinality
    score: usize,
}

impl Solution {
    /// empty solution
    pub fn new() -> Self { Self::default() }

    /// builds a solution from a list of vertices (duplicates are ignored)
    pub fn from_vertices<I:IntoIterator<Item=VertexId>>(vertices:I) -> Self {
        let mut res = Self::new();
        for v in vertices { res.insert(v); }
        res
    }

    /// builds a solution from a bitset
    pub fn from_bitset(vertices:BitSet) -> Self {
        let score = vertices.len();
        Self { vertices, score }
    }

    /// number of selected vertices
    pub fn score(&self) -> usize { self.score }

    /// true iff no vertex is selected
    pub fn is_empty(&self) -> bool { self.score == 0 }

    /// true iff v is selected
    pub fn contains(&self, v:VertexId) -> bool { self.vertices.contains(v) }

    /// selects v. Returns false if it was already selected
    pub fn insert(&mut self, v:VertexId) -> bool {
        let inserted = self.vertices.insert(v);
        if inserted { self.score += 1; }
        inserted
    }

    /// unselects v. Returns false if it was not selected
    pub fn remove(&mut self, v:VertexId) -> bool {
        let removed = self.vertices.remove(v);
        if removed { self.score -= 1; }
        removed
    }

    /// selected vertices, in increasing order
    pub fn iter(&self) -> impl Iterator<Item=VertexId> + '_ { self.vertices.iter() }

    /// underlying bitset
    pub fn bitset(&self) -> &BitSet { &self.vertices }

    /// selected vertices as a sorted vector
    pub fn to_vec(&self) -> Vec<VertexId> { self.vertices.iter().collect() }
}

impl PartialEq for Solution {
    fn eq(&self, other:&Self) -> bool { distance_hamming(self, other) == 0 }
}

impl Eq for Solution {}


/** true iff v is in the solution, or at least ⌈d(v)/2⌉ of its neighbors are. */
pub fn is_dominated(inst:&dyn PidsInstance, v:VertexId, sol:&Solution) -> bool {
    if sol.contains(v) { return true; }
    let threshold = inst.threshold(v);
    let mut nb_selected = 0;
    for u in inst.neighbors(v) {
        if sol.contains(*u) {
            nb_selected += 1;
            if nb_selected >= threshold { return true; }
        }
    }
    nb_selected >= threshold
}

/** result of the feasibility checker */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckerResult {
    /// the solution is feasible, contains its score
    Ok(usize),
    /// a vertex is selected but does not exist in the instance
    UnknownVertex(VertexId),
    /// the vertex is not dominated by the solution
    NotDominated(VertexId),
}

/**
checks that every vertex of the instance is dominated by sol.
returns the score if feasible, the first violation otherwise.
*/
pub fn checker(inst:&dyn PidsInstance, sol:&Solution) -> CheckerResult {
    let n = inst.nb_vertices();
    if let Some(v) = sol.iter().find(|v| *v >= n) {
        return CheckerResult::UnknownVertex(v);
    }
    match inst.vertices().find(|v| !is_dominated(inst, *v, sol)) {
        None => CheckerResult::Ok(sol.score()),
        Some(v) => CheckerResult::NotDominated(v),
    }
}

/// true iff every vertex is dominated by sol
pub fn is_feasible(inst:&dyn PidsInstance, sol:&Solution) -> bool {
    matches!(checker(inst, sol), CheckerResult::Ok(_))
}

/// vertices that are not dominated by sol
pub fn undominated_vertices(inst:&dyn PidsInstance, sol:&Solution) -> BitSet {
    inst.vertices().filter(|v| !is_dominated(inst, *v, sol)).collect()
}

/// size of the symmetric difference between a and b
pub fn distance_hamming(a:&Solution, b:&Solution) -> usize {
    a.vertices.symmetric_difference(&b.vertices).count()
}

use std::fs;

use crate::pids::{PidsInstance, Solution, VertexId};

/** models a PIDS instance using adjacency lists. */
#[derive(Debug, Clone)]
pub struct CompactInstance {
    /// nb vertices
    n: usize,
    /// nb edges
    m: usize,
    /// adj_list[i]: sorted list of vertices adjacent to i
    adj_list: Vec<Vec<VertexId>>,
}

impl PidsInstance for CompactInstance {
    fn nb_vertices(&self) -> usize { self.n }

    fn nb_edges(&self) -> usize { self.m }

    fn neighbors(&self, u:VertexId) -> &[VertexId] { &self.adj_list[u] }

    fn write_solution(&self, filename:&str, solution:&Solution) -> std::io::Result<()> {
        fs::write(filename, self.solution_to_string(&solution.to_vec()))
    }
}


impl CompactInstance {

    /** constructor using an adjacency list.
    the lists are symmetrized, sorted, and self-loops and duplicates are removed.
    */
    pub fn new(adj_list:Vec<Vec<usize>>) -> Self {
        let n = adj_list.len();
        let mut symmetric:Vec<Vec<VertexId>> = vec![Vec::new() ; n];
        for (a,l) in adj_list.iter().enumerate() {
            for b in l.iter().filter(|b| **b != a && **b < n) {
                symmetric[a].push(*b);
                symmetric[*b].push(a);
            }
        }
        for l in symmetric.iter_mut() {
            l.sort_unstable();
            l.dedup();
        }
        let m = symmetric.iter().map(|l| l.len()).sum::<usize>() / 2;
        Self { n, m, adj_list: symmetric }
    }

    /// constructor using an edge list (0-based)
    pub fn from_edges(n:usize, edges:&[(VertexId,VertexId)]) -> Self {
        let mut adj_list = vec![Vec::new() ; n];
        for (a,b) in edges {
            adj_list[*a].push(*b);
        }
        Self::new(adj_list)
    }

    /** writes a string encoding a vertex set (use this to export the solution) */
    pub fn solution_to_string(&self, solution:&[VertexId]) -> String {
        let mut res = solution.iter()
            .map(|v| v.to_string())
            .collect::<Vec<String>>()
            .join(" ");
        res += "\n";
        res
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid2x2() {
        // 0 - 1
        // |   |
        // 2 - 3
        let inst = CompactInstance::from_edges(4, &[(0,1), (0,2), (1,3), (2,3)]);
        assert_eq!(inst.nb_vertices(), 4);
        assert_eq!(inst.nb_edges(), 4);
        assert_eq!(inst.neighbors(0), &[1,2]);
        assert_eq!(inst.neighbors(3), &[1,2]);
    }

    #[test]
    fn test_symmetrize_and_deduplicate() {
        let inst = CompactInstance::new(vec![vec![1,1,0], vec![], vec![1]]);
        assert_eq!(inst.neighbors(0), &[1]);
        assert_eq!(inst.neighbors(1), &[0,2]);
        assert_eq!(inst.degree(2), 1);
        assert_eq!(inst.nb_edges(), 2);
    }

    #[test]
    fn test_solution_to_string() {
        let inst = CompactInstance::from_edges(3, &[(0,1)]);
        assert_eq!(inst.solution_to_string(&[0,2]), "0 2\n");
    }

    #[test]
    fn test_write_solution() {
        let inst = CompactInstance::from_edges(3, &[(0,1)]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sol.txt");
        let filename = path.to_str().unwrap();
        inst.write_solution(filename, &Solution::from_vertices(vec![2,0])).unwrap();
        assert_eq!(fs::read_to_string(filename).unwrap(), "0 2\n");
    }
}

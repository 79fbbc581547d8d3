/*
Implements the text files exchanged with the external MIP solver:
 - the subproblem model (CPLEX LP format)
 - the warm start (MST xml format)
 - the command script (CPLEX interactive optimizer)
Variable x{i+1} indicates that vertex i is selected.
*/
use crate::pids::{PidsInstance, Solution, VertexId};
use crate::search::fixing::FixingState;


/// name of the variable associated to vertex v
pub fn variable_name(v:VertexId) -> String { format!("x{}", v+1) }

/** subproblem model:
 - minimize the number of selected vertices
 - for each vertex v: ∑_{u∈N(v)} x_u + ⌈d(v)/2⌉·x_v ≥ ⌈d(v)/2⌉ (satisfied as soon as v is selected)
 - bounds: excluded vertices = 0, kept vertices = 1, free vertices in [0,1]
 - all variables are binary
*/
pub fn write_lp(inst:&dyn PidsInstance, fixing:&[FixingState]) -> String {
    let n = inst.nb_vertices();
    let mut res = String::new();
    // objective
    let objective:Vec<String> = inst.vertices().map(variable_name).collect();
    res += format!("Minimize\n obj: {}\n", objective.join(" + ")).as_str();
    // domination constraints
    res.push_str("Subject To\n");
    for v in inst.vertices() {
        let rhs = inst.threshold(v);
        res += format!(" c{}: ", v+1).as_str();
        for u in inst.neighbors(v) {
            res += format!("{} + ", variable_name(*u)).as_str();
        }
        res += format!("{} {} >= {}\n", rhs, variable_name(v), rhs).as_str();
    }
    // bounds given by the fixing
    res.push_str("Bounds\n");
    for v in 0..n {
        res += match fixing.get(v).copied().unwrap_or(FixingState::Free) {
            FixingState::Excluded => format!(" {} = 0\n", variable_name(v)),
            FixingState::Kept => format!(" {} = 1\n", variable_name(v)),
            FixingState::Free => format!(" 0 <= {} <= 1\n", variable_name(v)),
        }.as_str();
    }
    res.push_str("Binaries\n");
    for v in 0..n {
        res += format!(" {}\n", variable_name(v)).as_str();
    }
    res.push_str("End\n");
    res
}

/** warm start: 1 for the vertices of the solution, 0 for the others and for the excluded ones */
pub fn write_mst(n:usize, fixing:&[FixingState], warm_start:&Solution) -> String {
    let mut res = String::new();
    res.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    res.push_str("<CPLEXSolutions>\n");
    res.push_str(" <CPLEXSolution version=\"1.0\">\n");
    res.push_str("  <header/>\n");
    res.push_str("  <variables>\n");
    for v in 0..n {
        let excluded = fixing.get(v) == Some(&FixingState::Excluded);
        let value = if !excluded && warm_start.contains(v) { 1 } else { 0 };
        res += format!("   <variable name=\"{}\" value=\"{}\"/>\n", variable_name(v), value).as_str();
    }
    res.push_str("  </variables>\n");
    res.push_str(" </CPLEXSolution>\n");
    res.push_str("</CPLEXSolutions>\n");
    res
}

/** command script: read the model (and warm start), set the limits, optimize and list the
selected variables.
*/
pub fn write_script(
    lp_file:&str,
    mst_file:Option<&str>,
    time_limit:f32,
    mip_emphasis:Option<u8>
) -> String {
    let mut res = String::new();
    res += format!("read {}\n", lp_file).as_str();
    if let Some(mst) = mst_file {
        res += format!("read {}\n", mst).as_str();
    }
    res += format!("set timelimit {}\n", time_limit).as_str();
    if let Some(emphasis) = mip_emphasis {
        res += format!("set emphasis mip {}\n", emphasis).as_str();
    }
    res.push_str("optimize\n");
    res.push_str("display solution variables -\n");
    res.push_str("quit\n");
    res
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::compact_instance::CompactInstance;

    #[test]
    fn test_lp_path3() {
        let inst = CompactInstance::from_edges(3, &[(0,1), (1,2)]);
        let fixing = vec![FixingState::Excluded, FixingState::Free, FixingState::Kept];
        let lp = write_lp(&inst, &fixing);
        let expected = "Minimize\n obj: x1 + x2 + x3\n\
            Subject To\n c1: x2 + 1 x1 >= 1\n c2: x1 + x3 + 1 x2 >= 1\n c3: x2 + 1 x3 >= 1\n\
            Bounds\n x1 = 0\n 0 <= x2 <= 1\n x3 = 1\n\
            Binaries\n x1\n x2\n x3\n\
            End\n";
        assert_eq!(lp, expected);
    }

    #[test]
    fn test_lp_isolated_vertex() {
        let inst = CompactInstance::from_edges(2, &[]);
        let lp = write_lp(&inst, &[FixingState::Free, FixingState::Free]);
        assert!(lp.contains(" c1: 0 x1 >= 0\n"));
    }

    #[test]
    fn test_mst() {
        let fixing = vec![FixingState::Free, FixingState::Excluded, FixingState::Kept];
        let mst = write_mst(3, &fixing, &Solution::from_vertices(vec![0, 1, 2]));
        assert!(mst.contains("<variable name=\"x1\" value=\"1\"/>"));
        assert!(mst.contains("<variable name=\"x2\" value=\"0\"/>"));
        assert!(mst.contains("<variable name=\"x3\" value=\"1\"/>"));
        assert!(mst.starts_with("<?xml"));
        assert!(mst.ends_with("  </variables>\n </CPLEXSolution>\n</CPLEXSolutions>\n"));
        assert_eq!(mst.lines().filter(|l| l.contains("<variable ")).count(), 3);
    }

    #[test]
    fn test_script() {
        assert_eq!(
            write_script("subproblem.lp", Some("start.mst"), 2.5, Some(1)),
            "read subproblem.lp\nread start.mst\nset timelimit 2.5\nset emphasis mip 1\n\
            optimize\ndisplay solution variables -\nquit\n"
        );
        assert_eq!(
            write_script("full.lp", None, 10., None),
            "read full.lp\nset timelimit 10\noptimize\ndisplay solution variables -\nquit\n"
        );
    }
}

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::str::FromStr;

use clap::ArgMatches;
use serde_json::Value;

use crate::{
    dimacs,
    plain,
    error::{InstanceError, ParamsError},
    params::LocalBranchingParams,
    pids::{PidsInstance, Solution, CheckerResult, checker},
    report::RunLogger,
    solvers::mip::cplex::CplexConfig,
};


/** reads an instance given its type: "matrix" (n m + adjacency matrix), "edges" (n m + edge
list), or "dimacs".
*/
pub fn load_instance(filename:&str, instance_type:&str) -> Result<Rc<dyn PidsInstance>, InstanceError> {
    let instance:Rc<dyn PidsInstance> = match instance_type {
        "matrix" => Rc::new(plain::matrix_from_file(filename)?),
        "edges" => Rc::new(plain::edges_from_file(filename)?),
        "dimacs" => Rc::new(dimacs::from_file(filename)?),
        _ => return Err(InstanceError::UnknownType(instance_type.to_string())),
    };
    Ok(instance)
}

/** reads the instance given on the command line ("instance" and "type" arguments) and displays
its statistics. returns (instance filename, instance).
*/
pub fn read_instance(main_args:&ArgMatches) -> Result<(String, Rc<dyn PidsInstance>), InstanceError> {
    let inst_filename = main_args.value_of("instance").unwrap_or_default();
    let instance_type = main_args.value_of("type").unwrap_or("matrix");
    let instance = load_instance(inst_filename, instance_type)?;
    println!("instance: {} ({})", inst_filename, instance_type);
    instance.display_statistics();
    println!("=======================");
    Ok((inst_filename.to_string(), instance))
}

/// parses the value of an optional argument
fn parse_arg<T:FromStr>(main_args:&ArgMatches, name:&str) -> Result<Option<T>, ParamsError> {
    match main_args.value_of(name) {
        None => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(|_| ParamsError::Parse {
            name: name.to_string(),
            value: s.to_string(),
        }),
    }
}

/** reads the search parameters from the command line. Absent arguments keep their default value. */
pub fn read_params(main_args:&ArgMatches) -> Result<LocalBranchingParams, ParamsError> {
    let mut res = LocalBranchingParams::default();
    if let Some(t) = parse_arg(main_args, "time")? { res.total_time = t; }
    if let Some(t) = parse_arg(main_args, "ti")? { res.intensification_time = t; }
    if let Some(t) = parse_arg(main_args, "td")? { res.diversification_time = t; }
    if let Some(a) = parse_arg(main_args, "alpha")? { res.alpha = a; }
    if let Some(b) = parse_arg(main_args, "beta")? { res.beta = b; }
    if let Some(k) = parse_arg(main_args, "k")? { res.k = k; }
    if let Some(l) = parse_arg(main_args, "age-limit")? { res.age_limit = l; }
    if let Some(c) = parse_arg(main_args, "reopt-cap")? { res.reoptimization_time_cap = c; }
    res.seed = parse_arg(main_args, "seed")?;
    res.validate()?;
    Ok(res)
}

/// reads the time limit of the exact resolution
pub fn read_time(main_args:&ArgMatches) -> Result<f32, ParamsError> {
    let t = parse_arg::<f32>(main_args, "time")?.unwrap_or(100.);
    if !t.is_finite() || t < 0. {
        return Err(ParamsError::Time { name: "time limit", value: t });
    }
    Ok(t)
}

/** reads the options of the external solver ("cplex", "workdir", "no-warm-start") */
pub fn read_cplex_config(main_args:&ArgMatches) -> CplexConfig {
    let mut res = CplexConfig::default();
    if let Some(exe) = main_args.value_of("cplex") { res.executable = PathBuf::from(exe); }
    if let Some(dir) = main_args.value_of("workdir") { res.work_dir = PathBuf::from(dir); }
    if main_args.is_present("no-warm-start") { res.warm_start = false; }
    res
}

/// seed of the run: the one given, or a random one
pub fn resolve_seed(params:&LocalBranchingParams) -> u64 {
    params.seed.unwrap_or_else(rand::random)
}

/// run log file used when none is given
pub fn default_log_filename(inst_filename:&str) -> String {
    format!("{}.lb_pids.log", inst_filename)
}

/** displays the final result: score, selected vertices, and whether every vertex is dominated.
returns true iff the solution is feasible.
*/
pub fn final_report(
    instance:&dyn PidsInstance,
    solution:&Solution,
    total_time:f32,
    logger:&mut RunLogger,
) -> bool {
    logger.line("=======================");
    logger.line(format!("best score: {}", solution.score()));
    logger.line(format!("number of selected vertices: {}", solution.score()));
    logger.line(format!("total time: {:.3} seconds", total_time));
    let vertices:Vec<String> = solution.iter().map(|v| v.to_string()).collect();
    logger.line(format!("selected vertices: {}", vertices.join(" ")));
    match checker(instance, solution) {
        CheckerResult::Ok(_) => {
            logger.line("solution verified: all vertices are dominated.");
            true
        },
        CheckerResult::NotDominated(v) => {
            logger.line(format!("vertex {} is not dominated", v));
            logger.line("WARNING: invalid solution!");
            false
        },
        CheckerResult::UnknownVertex(v) => {
            logger.line(format!("vertex {} does not exist", v));
            logger.line("WARNING: invalid solution!");
            false
        },
    }
}

/// exports search results to files
pub fn export_results(
    instance:&dyn PidsInstance,
    solution:&Solution,
    stats:&Value,
    perf_file:Option<&str>,
    sol_file:Option<&str>,
) -> std::io::Result<()> {
    // export statistics
    if let Some(filename) = perf_file {
        let mut file = BufWriter::new(File::create(filename)?);
        serde_json::to_writer_pretty(&mut file, stats)?;
        file.flush()?;
        println!("statistics written in: {}", filename);
    }
    // export solution
    if let Some(filename) = sol_file {
        match checker(instance, solution) {
            CheckerResult::Ok(_) => {},
            checker_result => log::warn!("exporting an invalid solution (reason: {:?})", checker_result),
        }
        instance.write_solution(filename, solution)?;
        println!("solution written in: {}", filename);
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use clap::{App, Arg};
    use serde_json::json;

    use crate::compact_instance::CompactInstance;

    fn app() -> App<'static, 'static> {
        App::new("test")
            .arg(Arg::with_name("time").short("t").takes_value(true))
            .arg(Arg::with_name("alpha").short("a").takes_value(true))
            .arg(Arg::with_name("k").short("k").takes_value(true))
            .arg(Arg::with_name("seed").long("seed").takes_value(true))
            .arg(Arg::with_name("workdir").long("workdir").takes_value(true))
            .arg(Arg::with_name("no-warm-start").long("no-warm-start"))
    }

    #[test]
    fn test_read_params() {
        let args = app().get_matches_from(vec!["test", "-t", "5", "-a", "0.5", "-k", "3", "--seed", "12"]);
        let params = read_params(&args).unwrap();
        assert_eq!(params.total_time, 5.);
        assert!((params.alpha - 0.5).abs() < 1e-12);
        assert_eq!(params.k, 3);
        assert_eq!(params.seed, Some(12));
        assert_eq!(params.age_limit, 10);
        assert_eq!(resolve_seed(&params), 12);
    }

    #[test]
    fn test_read_params_errors() {
        let args = app().get_matches_from(vec!["test", "-t", "ten"]);
        assert_eq!(read_params(&args), Err(ParamsError::Parse { name: "time".to_string(), value: "ten".to_string() }));
        let args = app().get_matches_from(vec!["test", "-a", "2"]);
        assert!(matches!(read_params(&args), Err(ParamsError::Fraction { .. })));
    }

    #[test]
    fn test_read_cplex_config() {
        let args = app().get_matches_from(vec!["test", "--workdir", "/tmp/lb", "--no-warm-start"]);
        let config = read_cplex_config(&args);
        assert_eq!(config.work_dir, PathBuf::from("/tmp/lb"));
        assert!(!config.warm_start);
        assert_eq!(config.mip_emphasis, Some(1));
    }

    #[test]
    fn test_load_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p4.txt");
        fs::write(&path, "4 3\n1 2\n2 3\n3 4\n").unwrap();
        let filename = path.to_str().unwrap();
        assert_eq!(load_instance(filename, "edges").unwrap().nb_edges(), 3);
        assert!(matches!(load_instance(filename, "cgshop"), Err(InstanceError::UnknownType(_))));
        assert!(matches!(load_instance(filename, "matrix"), Err(InstanceError::Matrix(_))));
    }

    #[test]
    fn test_final_report() {
        let inst = CompactInstance::from_edges(4, &[(0,1), (1,2), (2,3)]);
        let mut logger = RunLogger::in_memory();
        assert!(final_report(&inst, &Solution::from_vertices(vec![1,2]), 1., &mut logger));
        assert!(logger.history().contains(&"selected vertices: 1 2".to_string()));
        assert_eq!(logger.history().last().unwrap(), "solution verified: all vertices are dominated.");
        let mut logger = RunLogger::in_memory();
        assert!(!final_report(&inst, &Solution::from_vertices(vec![1]), 1., &mut logger));
        assert_eq!(logger.history().last().unwrap(), "WARNING: invalid solution!");
    }

    #[test]
    fn test_export_results() {
        let inst = CompactInstance::from_edges(4, &[(0,1), (1,2), (2,3)]);
        let dir = tempfile::tempdir().unwrap();
        let perf = dir.path().join("perf.json");
        let sol = dir.path().join("sol.txt");
        let stats = json!({"final_score": 2, "primal_list": [[0.0, 3, "greedy"]]});
        export_results(
            &inst, &Solution::from_vertices(vec![2,1]), &stats,
            perf.to_str(), sol.to_str()
        ).unwrap();
        let read:Value = serde_json::from_str(&fs::read_to_string(&perf).unwrap()).unwrap();
        assert_eq!(read["final_score"], 2);
        assert_eq!(fs::read_to_string(&sol).unwrap(), "1 2\n");
    }
}

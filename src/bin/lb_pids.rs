use std::time::Instant;

use anyhow::Context;
use clap::{App, ArgMatches, load_yaml};
use rand::SeedableRng;
use rand::rngs::StdRng;

use lb_pids::plain::convert_matrix_file;
use lb_pids::report::RunLogger;
use lb_pids::search::exact::solve_exact;
use lb_pids::search::local_branching::local_branching;
use lb_pids::solvers::mip::cplex::CplexProcess;
use lb_pids::util::{
    default_log_filename, export_results, final_report, read_cplex_config, read_instance,
    read_params, read_time, resolve_seed,
};


/** runs the local branching search */
fn run(main_args:&ArgMatches) -> anyhow::Result<()> {
    let mut params = read_params(main_args)?;
    let (inst_filename, instance) = read_instance(main_args)?;
    let log_filename = main_args.value_of("log")
        .map(|s| s.to_string())
        .unwrap_or_else(|| default_log_filename(&inst_filename));
    let mut logger = RunLogger::with_file(&log_filename)
        .with_context(|| format!("unable to create the run log {}", log_filename))?;
    let seed = resolve_seed(&params);
    params.seed = Some(seed);
    logger.line(format!("instance: {}", inst_filename));
    for line in params.summary_lines() { logger.line(line); }
    logger.line(format!("seed: {}", seed));
    let config = read_cplex_config(main_args);
    log::info!("solver: {}", config.executable.display());
    let mut solver = CplexProcess::new(config);
    let mut rng = StdRng::seed_from_u64(seed);
    // solve
    let time_init = Instant::now();
    let (solution, stats) = local_branching(
        instance.as_ref(), &mut solver, &params, &mut rng, &mut logger
    );
    let total_time = time_init.elapsed().as_secs_f32();
    final_report(instance.as_ref(), &solution, total_time, &mut logger);
    // export results
    let mut stats_json = serde_json::to_value(&stats)?;
    stats_json["inst_name"] = serde_json::json!(inst_filename);
    stats_json["nb_solver_runs"] = serde_json::json!(solver.nb_calls());
    stats_json["solver"] = serde_json::to_value(solver.config())?;
    stats_json["total_time"] = serde_json::json!(total_time);
    export_results(
        instance.as_ref(), &solution, &stats_json,
        main_args.value_of("perf"), main_args.value_of("solution")
    ).context("unable to export the results")?;
    Ok(())
}

/** converts an adjacency matrix into an edge list */
fn convert(main_args:&ArgMatches) -> anyhow::Result<()> {
    let input = main_args.value_of("instance").unwrap_or_default();
    let summary = convert_matrix_file(input)?;
    println!(
        "{} vertices, {} edges written in {}",
        summary.n, summary.m, summary.output.display()
    );
    Ok(())
}

/** solves the whole model with the external solver */
fn exact(main_args:&ArgMatches) -> anyhow::Result<()> {
    let t = read_time(main_args)?;
    let (_, instance) = read_instance(main_args)?;
    let mut solver = CplexProcess::new(read_cplex_config(main_args));
    let time_init = Instant::now();
    match solve_exact(instance.as_ref(), &mut solver, t) {
        None => anyhow::bail!("the solver did not return a feasible solution"),
        Some(solution) => {
            let mut logger = RunLogger::console();
            final_report(instance.as_ref(), &solution, time_init.elapsed().as_secs_f32(), &mut logger);
            export_results(
                instance.as_ref(), &solution, &serde_json::json!({}),
                None, main_args.value_of("solution")
            ).context("unable to export the solution")?;
        }
    }
    Ok(())
}

/** Local Branching for the Positive Influence Dominating Set problem */
pub fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    // parse arguments
    let yaml = load_yaml!("lb_pids.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    match main_args.subcommand() {
        ("run", Some(sub_args)) => run(sub_args),
        ("convert", Some(sub_args)) => convert(sub_args),
        ("exact", Some(sub_args)) => exact(sub_args),
        (name, _) => anyhow::bail!("unknown command {}", name),
    }
}

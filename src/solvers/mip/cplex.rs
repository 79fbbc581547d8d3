/*
Implements the CPLEX collaborator: writes the scratch files, runs the interactive optimizer
on the script, and reads the selected variables from its output.
*/
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use bit_set::BitSet;
use nom::IResult;
use nom::character::complete::{char, space0, space1};
use nom::number::complete::double;
use nom::sequence::{preceded, tuple};
use serde::Serialize;

use crate::dimacs::read_integer;
use crate::error::SolverFailure;
use crate::pids::PidsInstance;
use crate::solvers::mip::{MipSolver, Subproblem};
use crate::solvers::mip::lp_format::{write_lp, write_mst, write_script};

/// subproblem model
pub const LP_FILE:&str = "subproblem.lp";
/// warm start
pub const MST_FILE:&str = "start.mst";
/// command script
pub const SCRIPT_FILE:&str = "script_sub.txt";
/// output of the solver
pub const LOG_FILE:&str = "cplex_sub.log";

/// installation directories searched for the CPLEX executable (relative to $HOME if starting with '~')
const CPLEX_INSTALL_DIRS:[&str ; 6] = [
    "~/YaminaBNBCPLEX/cplex_studio_1210",
    "/opt/ibm/ILOG/CPLEX_Studio1210",
    "/opt/ibm/ILOG/CPLEX_Studio129",
    "/opt/ibm/ILOG/CPLEX_Studio128",
    "/usr/local/ibm/ILOG/CPLEX_Studio1210",
    "~/ibm/ILOG/CPLEX_Studio1210",
];


/** locates the CPLEX executable:
 1. the CPLEX_BIN environment variable (if not empty),
 2. the usual installation directories,
 3. "cplex" (found in the PATH).
*/
pub fn resolve_cplex_executable() -> PathBuf {
    resolve_from(
        env::var("CPLEX_BIN").ok(),
        env::var("HOME").ok(),
        |p| p.is_file(),
    )
}

fn resolve_from<F:Fn(&Path) -> bool>(
    env_value:Option<String>,
    home:Option<String>,
    exists:F
) -> PathBuf {
    if let Some(path) = env_value.filter(|s| !s.is_empty()) {
        return PathBuf::from(path);
    }
    if cfg!(windows) {
        return PathBuf::from(r"C:\Program Files\IBM\ILOG\CPLEX_Studio128\cplex\bin\x64_win64\cplex.exe");
    }
    let home = home.unwrap_or_default();
    for dir in CPLEX_INSTALL_DIRS.iter() {
        let base = match dir.strip_prefix('~') {
            Some(rest) => format!("{}{}", home, rest),
            None => dir.to_string(),
        };
        let candidate = Path::new(&base).join("cplex/bin/x86-64_linux/cplex");
        if exists(&candidate) { return candidate; }
    }
    PathBuf::from("cplex")
}


/** options of the external solver */
#[derive(Debug, Clone, Serialize)]
pub struct CplexConfig {
    /// CPLEX interactive optimizer
    pub executable: PathBuf,
    /// directory where the scratch files are written (and the solver runs)
    pub work_dir: PathBuf,
    /// give the reference solution to the solver
    pub warm_start: bool,
    /// "set emphasis mip" value (1: feasibility)
    pub mip_emphasis: Option<u8>,
}

impl Default for CplexConfig {
    fn default() -> Self {
        Self {
            executable: resolve_cplex_executable(),
            work_dir: PathBuf::from("."),
            warm_start: true,
            mip_emphasis: Some(1),
        }
    }
}


/** runs the CPLEX interactive optimizer as an external process */
#[derive(Debug, Clone)]
pub struct CplexProcess {
    /// options
    config: CplexConfig,
    /// number of solver runs
    nb_calls: usize,
}

impl CplexProcess {
    /// builds the collaborator
    pub fn new(config:CplexConfig) -> Self { Self { config, nb_calls: 0 } }

    /// options
    pub fn config(&self) -> &CplexConfig { &self.config }

    /// number of solver runs so far
    pub fn nb_calls(&self) -> usize { self.nb_calls }

    fn scratch_path(&self, name:&str) -> PathBuf { self.config.work_dir.join(name) }

    fn write_scratch(&self, name:&str, content:&str) -> Result<(), SolverFailure> {
        let path = self.scratch_path(name);
        fs::write(&path, content).map_err(|source| SolverFailure::Scratch { path, source })
    }
}

impl MipSolver for CplexProcess {
    fn solve(&mut self, inst:&dyn PidsInstance, sub:&Subproblem) -> Result<BitSet, SolverFailure> {
        self.nb_calls += 1;
        fs::create_dir_all(&self.config.work_dir).map_err(|source| SolverFailure::Scratch {
            path: self.config.work_dir.clone(), source
        })?;
        self.write_scratch(LP_FILE, &write_lp(inst, &sub.fixing))?;
        let mst = match (&sub.warm_start, self.config.warm_start) {
            (Some(start), true) => {
                self.write_scratch(MST_FILE, &write_mst(inst.nb_vertices(), &sub.fixing, start))?;
                Some(MST_FILE)
            },
            _ => None,
        };
        self.write_scratch(
            SCRIPT_FILE,
            &write_script(LP_FILE, mst, sub.time_limit, self.config.mip_emphasis)
        )?;
        // a log from a previous run must never be read
        let log_path = self.scratch_path(LOG_FILE);
        match fs::remove_file(&log_path) {
            Err(e) if e.kind() != ErrorKind::NotFound => {
                return Err(SolverFailure::Scratch { path: log_path, source: e });
            },
            _ => {},
        }
        log::debug!(
            "running {} -f {} (time limit: {})",
            self.config.executable.display(), SCRIPT_FILE, sub.time_limit
        );
        let output = Command::new(&self.config.executable)
            .arg("-f").arg(SCRIPT_FILE)
            .current_dir(&self.config.work_dir)
            .output()
            .map_err(|source| SolverFailure::Launch {
                executable: self.config.executable.display().to_string(), source
            })?;
        let mut content = String::from_utf8_lossy(&output.stdout).to_string();
        content += &String::from_utf8_lossy(&output.stderr);
        fs::write(&log_path, &content)
            .map_err(|source| SolverFailure::Scratch { path: log_path.clone(), source })?;
        if !output.status.success() {
            return Err(SolverFailure::ExitStatus(output.status.code()));
        }
        let selected = parse_solution_listing(&content, inst.nb_vertices())?;
        log::debug!("{} selected variables in {}", selected.len(), log_path.display());
        Ok(selected)
    }
}


/// reads "x<index> <value>", returns the 0-based vertex and the value
fn read_variable_value(s:&str) -> IResult<&str, (usize, f64)> {
    let (remaining, (index, _, value)) = tuple((
        preceded(space0, preceded(char('x'), read_integer)),
        space1,
        double,
    ))(s)?;
    Ok((remaining, (index, value)))
}

/** reads the vertices selected in a solver output.
The listing starts after a "Variable Name" header and stops at the next "CPLEX>" prompt.
Variables with a value above 0.5 are selected. The absence of a listing is a failure (and not an
empty solution).
*/
pub fn parse_solution_listing(log:&str, n:usize) -> Result<BitSet, SolverFailure> {
    let mut res = BitSet::with_capacity(n);
    let mut found_header = false;
    let mut reading = false;
    for line in log.lines() {
        if line.contains("Variable Name") {
            found_header = true;
            reading = true;
            continue;
        }
        if !reading { continue; }
        if line.contains("CPLEX>") {
            reading = false;
            continue;
        }
        if let Ok((_,(index, value))) = read_variable_value(line) {
            if index == 0 || index > n {
                return Err(SolverFailure::UnknownVariable(format!("x{}", index)));
            }
            if value > 0.5 { res.insert(index-1); }
        }
    }
    if !found_header {
        return Err(SolverFailure::MissingSolution);
    }
    Ok(res)
}

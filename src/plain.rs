/*
Implements:
 - readers for the plain text formats: "n m" followed by an adjacency matrix, or by an edge list
 - conversion of an adjacency matrix file into an edge list file
*/
use std::fs;
use std::path::{Path, PathBuf};

use nom::character::complete::multispace0;
use nom::multi::many0;
use nom::sequence::preceded;

use crate::compact_instance::CompactInstance;
use crate::dimacs::read_integer;
use crate::error::InstanceError;
use crate::pids::PidsInstance;


/// reads a file into a string
fn read_file(path:&Path) -> Result<String, InstanceError> {
    fs::read_to_string(path)
        .map_err(|source| InstanceError::Io { path: path.to_path_buf(), source })
}

/// reads all the unsigned integers of a whitespace separated text
fn read_integers(s:&str) -> Result<Vec<usize>, String> {
    let (remaining, values) = many0(preceded(multispace0, read_integer))(s)
        .map_err(|e| e.to_string())?;
    match remaining.split_whitespace().next() {
        None => Ok(values),
        Some(token) => Err(format!("unexpected token '{}' after {} values", token, values.len())),
    }
}

/// reads the "n m" header, returns (n, m, remaining values)
fn split_header(values:&[usize]) -> Result<(usize, usize, &[usize]), InstanceError> {
    match values {
        [n, m, rest @ ..] => Ok((*n, *m, rest)),
        _ => Err(InstanceError::Header("expected the number of vertices and edges".to_string())),
    }
}

/** reads "n m" followed by the n×n 0/1 adjacency matrix.
m is only informative. diagonal entries are ignored.
*/
pub fn matrix_from_str(content:&str) -> Result<CompactInstance, InstanceError> {
    let values = read_integers(content).map_err(InstanceError::Matrix)?;
    let (n, m, entries) = split_header(&values)?;
    let nb_entries = n.checked_mul(n).ok_or_else(|| InstanceError::Header(format!(
        "{} vertices do not fit in an adjacency matrix", n
    )))?;
    if entries.len() < nb_entries {
        return Err(InstanceError::Matrix(format!(
            "expected {} entries, found {}", nb_entries, entries.len()
        )));
    }
    if entries.len() > nb_entries {
        log::warn!("ignoring {} values after the adjacency matrix", entries.len() - nb_entries);
    }
    let mut adj_list = vec![Vec::new() ; n];
    for i in 0..n {
        for j in 0..n {
            match entries[i*n+j] {
                0 => {},
                1 => if i != j { adj_list[i].push(j); },
                e => return Err(InstanceError::Matrix(format!(
                    "entry ({},{}) is {} (expected 0 or 1)", i+1, j+1, e
                ))),
            }
        }
    }
    let inst = CompactInstance::new(adj_list);
    if inst.nb_edges() != m {
        log::debug!("header announces {} edges, the matrix contains {}", m, inst.nb_edges());
    }
    Ok(inst)
}

/// reads an adjacency matrix instance from a file
pub fn matrix_from_file<P:AsRef<Path>>(filename:P) -> Result<CompactInstance, InstanceError> {
    matrix_from_str(&read_file(filename.as_ref())?)
}

/** reads "n m" followed by m pairs "u v" (1-based). duplicated edges are merged. */
pub fn edges_from_str(content:&str) -> Result<CompactInstance, InstanceError> {
    let values = read_integers(content).map_err(InstanceError::Edge)?;
    let (n, m, entries) = split_header(&values)?;
    let nb_entries = m.checked_mul(2).ok_or_else(|| InstanceError::Header(format!(
        "{} edges announced", m
    )))?;
    if entries.len() < nb_entries {
        return Err(InstanceError::Edge(format!(
            "expected {} edges, found {}", m, entries.len()/2
        )));
    }
    let mut edges = Vec::with_capacity(m);
    for pair in entries[..nb_entries].chunks(2) {
        let (a, b) = (pair[0], pair[1]);
        if a == 0 || b == 0 || a > n || b > n {
            return Err(InstanceError::Edge(format!("{} {} (vertices are numbered 1..{})", a, b, n)));
        }
        if a == b {
            return Err(InstanceError::Edge(format!("{} {} is a self-loop", a, b)));
        }
        edges.push((a-1, b-1));
    }
    Ok(CompactInstance::from_edges(n, &edges))
}

/// reads an edge list instance from a file
pub fn edges_from_file<P:AsRef<Path>>(filename:P) -> Result<CompactInstance, InstanceError> {
    edges_from_str(&read_file(filename.as_ref())?)
}


/** summary of a matrix to edge list conversion */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    /// matrix file
    pub input: PathBuf,
    /// edge list file
    pub output: PathBuf,
    /// number of vertices
    pub n: usize,
    /// number of edges
    pub m: usize,
}

/** converts a square 0/1 matrix (no header, blank lines ignored) into the edge list format.
only the upper triangle is read. returns the edge list content and the (n, m) counts.
*/
pub fn matrix_to_edge_list(content:&str) -> Result<(String, usize, usize), InstanceError> {
    let mut matrix:Vec<Vec<usize>> = Vec::new();
    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        let row = read_integers(line).map_err(InstanceError::Matrix)?;
        if !row.is_empty() { matrix.push(row); }
    }
    if matrix.is_empty() {
        return Err(InstanceError::Matrix("empty matrix".to_string()));
    }
    let n = matrix.len();
    if let Some((i, row)) = matrix.iter().enumerate().find(|(_,row)| row.len() != n) {
        return Err(InstanceError::Matrix(format!(
            "the matrix is not square (row {} has {} elements instead of {})", i, row.len(), n
        )));
    }
    let mut edges = Vec::new();
    for (i, row) in matrix.iter().enumerate() {
        for (j, e) in row.iter().enumerate().skip(i+1) {
            if *e != 0 { edges.push((i+1, j+1)); }
        }
    }
    let mut res = format!("{}\n{}\n", n, edges.len());
    for (a,b) in edges.iter() {
        res += format!("{} {}\n", a, b).as_str();
    }
    Ok((res, n, edges.len()))
}

/// output file of the conversion: "output_" + name of the input, in the same directory
pub fn conversion_output_path(input:&Path) -> PathBuf {
    let name = input.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    input.with_file_name(format!("output_{}", name))
}

/** converts an adjacency matrix file into an edge list file (see [`conversion_output_path`]). */
pub fn convert_matrix_file<P:AsRef<Path>>(filename:P) -> Result<ConversionSummary, InstanceError> {
    let input = filename.as_ref();
    let (content, n, m) = matrix_to_edge_list(&read_file(input)?)?;
    let output = conversion_output_path(input);
    fs::write(&output, content)
        .map_err(|source| InstanceError::Io { path: output.clone(), source })?;
    Ok(ConversionSummary { input: input.to_path_buf(), output, n, m })
}

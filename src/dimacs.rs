use std::fs;
use std::path::Path;

use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_until};
use nom::character::complete::{digit1, line_ending, multispace0, space0, space1};
use nom::combinator::{map_res, opt};
use nom::sequence::{preceded, terminated, tuple};

use crate::compact_instance::CompactInstance;
use crate::error::InstanceError;


/// creates an instance from a DIMACS file
pub fn from_file<P:AsRef<Path>>(filename:P) -> Result<CompactInstance, InstanceError> {
    let path = filename.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|source| InstanceError::Io { path: path.to_path_buf(), source })?;
    from_str(&content)
}

/// creates an instance from the content of a DIMACS file
pub fn from_str(content:&str) -> Result<CompactInstance, InstanceError> {
    let (_,_,adj_list) = read_from_str(content)?;
    Ok(CompactInstance::new(adj_list))
}

/// reads an instance from a string, returns (n,m,adj_list)
pub fn read_from_str(content:&str) -> Result<(usize, usize, Vec<Vec<usize>>), InstanceError> {
    let s1 = content.replace("\r","");
    let s2 = skip_comments(s1.as_str())
        .map_err(|e| InstanceError::Header(e.to_string()))?.0;
    let (mut s3,(n,m)) = read_header(s2)
        .map_err(|_| InstanceError::Header("expected 'p edge <n> <m>'".to_string()))?;
    let mut adj_list = vec![Vec::new();n];
    let mut check_nb_edges = 0;
    // comments may be interleaved with edges
    s3 = skip_comments(s3).map(|(r,_)| r).unwrap_or(s3);
    while let Ok((tmp,(a,b))) = read_edge(s3) {
        s3 = skip_comments(tmp).map(|(r,_)| r).unwrap_or(tmp);
        if a == 0 || b == 0 || a > n || b > n {
            return Err(InstanceError::Edge(format!("e {} {} (vertices are numbered 1..{})", a, b, n)));
        }
        adj_list[a-1].push(b-1);
        adj_list[b-1].push(a-1);
        check_nb_edges += 1;
    }
    if check_nb_edges != m && 2*check_nb_edges != m {
        log::warn!("DIMACS header announces {} edges, {} were read", m, check_nb_edges);
    }
    Ok((n, m, adj_list))
}

/// skips a single comment (until the end of the line)
fn skip_comment(s:&str) -> IResult<&str, &str> {
    terminated(preceded(tag("c"), take_until("\n")), line_ending)(s)
}

/// skips all comments and blank lines
pub fn skip_comments(s:&str) -> IResult<&str, Vec<&str>> {
    nom::multi::many0(preceded(multispace0, skip_comment))(s)
        .map(|(remaining, comments)| (remaining.trim_start(), comments))
}

/// reads an unsigned integer
pub(crate) fn read_integer(s:&str) -> IResult<&str, usize> {
    map_res(digit1, |d:&str| d.parse::<usize>())(s)
}

/// reads two numbers separated by spaces, and the end of line if any
fn read_two_integers(s:&str) -> IResult<&str, (usize,usize)> {
    let (remaining, (n1, _, n2, _)) = tuple((
        read_integer, space1, read_integer, space0
    ))(s)?;
    let (remaining, _) = opt(line_ending)(remaining)?;
    Ok((remaining, (n1, n2)))
}

/// reads header containing (n,m)
pub fn read_header(s:&str) -> IResult<&str, (usize,usize)> {
    preceded(alt((tag("p edge "), tag("p col "))), read_two_integers)(s)
}

/// reads edge line (WARNING: indices start at 1 in the DIMACS format)
pub fn read_edge(s:&str) -> IResult<&str, (usize,usize)> {
    preceded(tag("e "), read_two_integers)(s)
}

//! Graph-file reading.
//!
//! A graph source is a whitespace-separated record stream: a header line
//! `precincts districts population`, then one `county minority majority`
//! line per precinct, then `u v` edge lines until end of input. Blank lines
//! and `#` comments are ignored.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, ensure, Context, Result};

use crate::graph::{GraphBuilder, PrecinctGraph};

/// Read a graph from a file on disk.
pub fn read_graph_file(path: &Path) -> Result<PrecinctGraph> {
    let file = File::open(path)
        .with_context(|| format!("[io] failed to open {}", path.display()))?;
    read_graph(BufReader::new(file))
        .with_context(|| format!("[io] failed to parse {}", path.display()))
}

/// Read a graph from any byte source.
pub fn read_graph<R: Read>(mut reader: R) -> Result<PrecinctGraph> {
    let mut text = String::new();
    reader.read_to_string(&mut text).context("[io] failed to read graph source")?;

    let mut records = text.lines().enumerate()
        .map(|(i, line)| (i + 1, line.split('#').next().unwrap_or("").trim()))
        .filter(|(_, line)| !line.is_empty());

    let (line, header) = records.next().ok_or_else(|| anyhow!("[io] graph source is empty"))?;
    let [precincts, districts, population] = parse_fields(line, header)?;
    let mut builder = GraphBuilder::new(
        precincts as usize,
        u32::try_from(districts).with_context(|| format!("[io] line {line}: district count out of range"))?,
        Some(population),
    )?;

    for _ in 0..precincts {
        let (line, record) = records.next()
            .ok_or_else(|| anyhow!("[io] expected {precincts} precinct records, input ended early"))?;
        let [county, minority, majority] = parse_fields(line, record)?;
        builder.add_precinct(narrow(line, county)?, narrow(line, minority)?, narrow(line, majority)?)
            .with_context(|| format!("[io] line {line}: bad precinct record"))?;
    }

    for (line, record) in records {
        let [u, v] = parse_fields(line, record)?;
        builder.add_edge(narrow(line, u)?, narrow(line, v)?)
            .with_context(|| format!("[io] line {line}: bad edge record"))?;
    }

    Ok(builder.finish_loading()?)
}

/// Split a record into exactly `N` unsigned fields.
fn parse_fields<const N: usize>(line: usize, record: &str) -> Result<[u64; N]> {
    let fields = record.split_whitespace().collect::<Vec<_>>();
    ensure!(
        fields.len() == N,
        "[io] line {line}: expected {N} fields, found {}", fields.len()
    );

    let mut out = [0u64; N];
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = u64::from_str(field)
            .with_context(|| format!("[io] line {line}: `{field}` is not a non-negative integer"))?;
    }
    Ok(out)
}

fn narrow(line: usize, value: u64) -> Result<u32> {
    u32::try_from(value).with_context(|| format!("[io] line {line}: {value} out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const SPLIT_SQUARE: &str = "\
        # 2x2 grid, two districts\n\
        4 2 8\n\
        0 1 1\n\
        0 1 1\n\
        1 1 1\n\
        1 1 1\n\
        0 1\n\
        0 2\n\
        1 3\n\
        2 3\n";

    #[test]
    fn parses_a_well_formed_source() {
        let graph = read_graph(SPLIT_SQUARE.as_bytes()).unwrap();
        assert_eq!(graph.num_precincts(), 4);
        assert_eq!(graph.num_districts(), 2);
        assert_eq!(graph.state_pop(), 8);
        assert_eq!(graph.county(2), 1);
        assert!(graph.contains_edge(1, 3));
        assert!(!graph.contains_edge(0, 3));
    }

    #[test]
    fn rejects_an_empty_source() {
        assert!(read_graph("".as_bytes()).is_err());
        assert!(read_graph("# only a comment\n".as_bytes()).is_err());
    }

    #[test]
    fn rejects_a_malformed_header() {
        assert!(read_graph("4 2\n".as_bytes()).is_err());
        assert!(read_graph("four 2 8\n".as_bytes()).is_err());
    }

    #[test]
    fn rejects_truncated_precinct_records() {
        let err = read_graph("2 1 4\n0 1 1\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("ended early"));
    }

    #[test]
    fn population_mismatch_surfaces_the_core_error() {
        let source = "2 1 99\n0 1 1\n0 1 1\n0 1\n";
        let err = read_graph(source.as_bytes()).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvariantBroken(_))));
    }

    #[test]
    fn rejects_edges_to_unknown_precincts() {
        let source = "2 1 4\n0 1 1\n0 1 1\n0 5\n";
        let err = read_graph(source.as_bytes()).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvalidInput(_))));
    }
}

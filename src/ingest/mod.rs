// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! DAG Ingestor: parses per-process input files into labelled, transitively
//! closed DAGs with a synthetic root, suppressing duplicates and dropping
//! non-acyclic input with a diagnostic.
//!
//! Per-file/per-line parsing is dispatched across a worker pool (mirroring
//! the pairwise conflict analyser's fan-out); building the shared
//! [`NodeInterner`] and the final [`ProcessMap`] happens single-threaded
//! during merge, since both require sequential, deterministic ownership.

pub mod gexf;

use crate::context::Context;
use crate::errors::{ParseError, PipelineError};
use crate::graphops;
use crate::model::{Dag, NodeInterner, ProcessMap, ROOT_LABEL};
use crate::observability::messages::ingest::{DistinctDagsCounted, FileSkipped, NonDagDropped};
use crate::observability::messages::StructuredLog;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
enum EdgeAtom {
    Precedence(String, String),
    Cluster(String, String),
    Incomparable(String, String),
    Bare(String),
}

const PRECEDENCE: &str = "->-";
const CLUSTER: &str = "-?-";
const INCOMPARABLE: &str = "-/-";

fn parse_atom(token: &str) -> Option<EdgeAtom> {
    for (sep, wrap) in [
        (PRECEDENCE, EdgeAtom::Precedence as fn(String, String) -> EdgeAtom),
        (CLUSTER, EdgeAtom::Cluster),
        (INCOMPARABLE, EdgeAtom::Incomparable),
    ] {
        if let Some(idx) = token.find(sep) {
            let a = &token[..idx];
            let b = &token[idx + sep.len()..];
            if a.is_empty() || b.is_empty() {
                return None;
            }
            return Some(wrap(a.to_string(), b.to_string()));
        }
    }
    if token.is_empty() {
        None
    } else {
        Some(EdgeAtom::Bare(token.to_string()))
    }
}

/// Splits an optional `<id>,<edges>` name-override prefix from the rest of
/// a line, then tokenises the remainder on whitespace into edge atoms.
fn parse_line(line: &str) -> Result<(Option<String>, Vec<EdgeAtom>), String> {
    let (name_override, rest) = match line.find(',') {
        Some(idx) => (Some(line[..idx].trim().to_string()), &line[idx + 1..]),
        None => (None, line),
    };

    let mut atoms = Vec::new();
    for token in rest.split_whitespace() {
        match parse_atom(token) {
            Some(atom) => atoms.push(atom),
            None => return Err(format!("malformed edge atom {token:?}")),
        }
    }
    Ok((name_override, atoms))
}

/// Parses the `<base>[-<tree_index>]_<suffix>.<ext>` file-name grammar into
/// `(process_id, tree_name)`.
fn parse_file_name_grammar(path: &Path) -> Result<(String, String), ParseError> {
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ParseError::MalformedFileName { path: path.to_path_buf() })?;

    let stem = match file_name.rfind('.') {
        Some(idx) => &file_name[..idx],
        None => file_name,
    };
    let stem = match stem.rfind('_') {
        Some(idx) => &stem[..idx],
        None => stem,
    };

    match stem.rfind('-') {
        Some(idx) if stem[idx + 1..].chars().all(|c| c.is_ascii_digit()) && !stem[idx + 1..].is_empty() => {
            let process_id = stem[..idx].to_string();
            let tree_name = stem.to_string();
            Ok((process_id, tree_name))
        }
        _ => {
            let process_id = stem.to_string();
            let tree_name = format!("{process_id}-0");
            Ok((process_id, tree_name))
        }
    }
}

/// A single parsed line, not yet interned, with its destination process and
/// candidate DAG name already resolved.
struct ParsedDag {
    process_id: String,
    name: String,
    atoms: Vec<EdgeAtom>,
}

struct FileParseResult {
    dags: Vec<ParsedDag>,
    diagnostics: Vec<String>,
}

/// Outcome of the parallel parse phase for a single file, dispatched on
/// extension: `.gexf` is read through [`gexf::parse_gexf`] (not yet
/// interned), everything else through the plain-text atom grammar.
enum ParsedFile {
    Text(FileParseResult),
    Gexf {
        process_id: String,
        name: String,
        graph: gexf::GexfGraph,
    },
}

fn is_gexf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("gexf"))
        .unwrap_or(false)
}

fn parse_gexf_file(path: &Path, is_directory: bool) -> Result<ParsedFile, PipelineError> {
    let contents = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = gexf::parse_gexf(&contents, path)?;
    let (process_id, name) = if is_directory {
        parse_file_name_grammar(path)?
    } else {
        ("0".to_string(), "0-0".to_string())
    };
    Ok(ParsedFile::Gexf { process_id, name, graph })
}

fn parse_one(path: &Path, is_directory: bool) -> Result<ParsedFile, PipelineError> {
    if is_gexf(path) {
        parse_gexf_file(path, is_directory)
    } else if is_directory {
        parse_process_file(path).map(ParsedFile::Text)
    } else {
        parse_flat_file(path).map(ParsedFile::Text)
    }
}

fn parse_process_file(path: &Path) -> Result<FileParseResult, PipelineError> {
    let contents = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (process_id, tree_name) = parse_file_name_grammar(path)?;

    let lines: Vec<&str> = contents.lines().filter(|l| !l.trim().is_empty()).collect();
    let mut dags = Vec::new();
    let mut diagnostics = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        match parse_line(line) {
            Ok((name_override, atoms)) => {
                let name = name_override.unwrap_or_else(|| {
                    if lines.len() > 1 {
                        format!("{tree_name}_{idx}")
                    } else {
                        tree_name.clone()
                    }
                });
                dags.push(ParsedDag { process_id: process_id.clone(), name, atoms });
            }
            Err(reason) => diagnostics.push(format!("{}:{}: {reason}", path.display(), idx + 1)),
        }
    }
    Ok(FileParseResult { dags, diagnostics })
}

/// A single text file where every line is its own process (the
/// single-file ingestion mode), rather than a directory of per-process
/// files.
fn parse_flat_file(path: &Path) -> Result<FileParseResult, PipelineError> {
    let contents = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut dags = Vec::new();
    let mut diagnostics = Vec::new();

    for (idx, line) in contents.lines().filter(|l| !l.trim().is_empty()).enumerate() {
        match parse_line(line) {
            Ok((name_override, atoms)) => {
                let process_id = idx.to_string();
                let name = name_override.unwrap_or_else(|| format!("{process_id}-0"));
                dags.push(ParsedDag { process_id, name, atoms });
            }
            Err(reason) => diagnostics.push(format!("{}:{}: {reason}", path.display(), idx + 1)),
        }
    }
    Ok(FileParseResult { dags, diagnostics })
}

fn build_dag(parsed: ParsedDag, interner: &mut NodeInterner) -> Dag {
    let mut dag = Dag::new(parsed.name);
    for atom in parsed.atoms {
        match atom {
            EdgeAtom::Precedence(a, b) => {
                let ia = interner.intern(&a);
                let ib = interner.intern(&b);
                dag.add_edge(ia, ib);
            }
            EdgeAtom::Cluster(a, b) => {
                let ia = interner.intern(&a);
                let ib = interner.intern(&b);
                dag.add_node(ia);
                dag.add_node(ib);
                dag.add_cluster_pair(ia, ib);
            }
            EdgeAtom::Incomparable(a, b) => {
                let ia = interner.intern(&a);
                let ib = interner.intern(&b);
                dag.add_node(ia);
                dag.add_node(ib);
            }
            EdgeAtom::Bare(a) => {
                let ia = interner.intern(&a);
                dag.add_node(ia);
            }
        }
    }

    let root = interner.intern(ROOT_LABEL);
    dag.add_node(root);
    let others: Vec<_> = dag.nodes().filter(|&n| n != root).collect();
    for n in others {
        dag.add_edge(root, n);
    }
    dag
}

/// Transitively closes `dag` in place. Returns `false` (DAG should be
/// dropped) if the input is not acyclic.
fn close_dag(dag: &mut Dag) -> bool {
    let nodes: Vec<_> = dag.nodes().collect();
    let edges: std::collections::HashSet<_> = dag.edges().collect();
    match graphops::transitive_closure(&nodes, &edges) {
        Some(closure) => {
            for (u, v) in closure {
                dag.add_edge(u, v);
            }
            true
        }
        None => false,
    }
}

/// Ingests `path` (a single file, or a directory of per-process files) into
/// a [`ProcessMap`], interning node labels into `interner` as it goes.
///
/// Per-file I/O and parse errors are logged and that file is skipped;
/// non-acyclic DAGs are logged and dropped; everything else is retained.
pub fn ingest_path(path: &Path, interner: &mut NodeInterner, ctx: &Context) -> Result<ProcessMap, PipelineError> {
    let files: Vec<PathBuf> = if path.is_dir() {
        std::fs::read_dir(path)
            .into_iter()
            .flatten()
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect()
    } else {
        vec![path.to_path_buf()]
    };

    let is_directory = path.is_dir();

    let results: Vec<(PathBuf, Result<ParsedFile, PipelineError>)> = if ctx.cores > 1 {
        use rayon::prelude::*;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(ctx.cores)
            .build()
            .map_err(|source| PipelineError::WorkerPoolInit { cores: ctx.cores, source })?;
        pool.install(|| {
            files
                .par_iter()
                .map(|p| (p.clone(), parse_one(p, is_directory)))
                .collect()
        })
    } else {
        files.iter().map(|p| (p.clone(), parse_one(p, is_directory))).collect()
    };

    let mut process_map = ProcessMap::new();
    for (path, result) in results {
        if ctx.cancel.is_cancelled() {
            break;
        }
        match result {
            Ok(ParsedFile::Text(parsed)) => {
                for reason in &parsed.diagnostics {
                    FileSkipped { path: &path.display().to_string(), reason }.log();
                }
                for parsed_dag in parsed.dags {
                    let process_id = parsed_dag.process_id.clone();
                    let dag_name = parsed_dag.name.clone();
                    let mut dag = build_dag(parsed_dag, interner);
                    if close_dag(&mut dag) {
                        process_map.insert(&process_id, dag);
                    } else {
                        NonDagDropped { dag_name: &dag_name }.log();
                    }
                }
            }
            Ok(ParsedFile::Gexf { process_id, name, graph }) => {
                let mut dag = gexf::to_dag(graph, name.clone(), interner);
                if close_dag(&mut dag) {
                    process_map.insert(&process_id, dag);
                } else {
                    NonDagDropped { dag_name: &name }.log();
                }
            }
            Err(e) => {
                FileSkipped { path: &path.display().to_string(), reason: &e.to_string() }.log();
            }
        }
    }

    if ctx.verbose {
        for (process_id, count) in process_map.distinct_counts() {
            DistinctDagsCounted { process_id, distinct_count: count }.log();
        }
    }

    Ok(process_map)
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Crate-wide error kinds for the conflict-graph and trajectory pipeline.
//!
//! Every stage returns [`PipelineError`] (or a `Result` alias over it); the
//! top-level CLI shim wraps these in `anyhow` for path-level context the way
//! config loading does elsewhere in this crate.

use std::fmt;
use std::path::PathBuf;

/// A single pipeline failure, matching the five error kinds the ingestion
/// and solving stages can raise.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// An input path was missing or unreadable.
    #[error("I/O error reading {path}: {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line, edge atom, or file name did not match the expected grammar.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Transitive closure detected a cycle in an input DAG; that DAG is
    /// dropped, not the whole process.
    #[error("DAG {name} is not acyclic; dropping it")]
    NonDag { name: String },

    /// No DAG-selection satisfies the patient quota for the requested `k`.
    #[error("no selection satisfies patient quota k={k} (|D|={available})")]
    SolverInfeasible { k: usize, available: usize },

    /// A reconstructed trajectory violated an internal invariant: node-count
    /// mismatch against its selection, or a cycle introduced by intersecting
    /// edges. Always fatal.
    #[error(transparent)]
    InvariantViolation(#[from] InvariantViolation),

    /// The data-parallel worker pool failed to start (e.g. the OS refused to
    /// spawn `cores` threads). Distinct from `Io` since it is not tied to a
    /// single input path.
    #[error("failed to start a {cores}-thread worker pool: {source}")]
    WorkerPoolInit {
        cores: usize,
        #[source]
        source: rayon::ThreadPoolBuildError,
    },
}

/// A malformed edge atom, line, or file name encountered during ingestion.
#[derive(Debug)]
pub enum ParseError {
    MalformedAtom {
        path: PathBuf,
        line: usize,
        token: String,
    },
    MalformedFileName {
        path: PathBuf,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MalformedAtom { path, line, token } => write!(
                f,
                "malformed edge atom {token:?} at {}:{line}",
                path.display()
            ),
            ParseError::MalformedFileName { path } => write!(
                f,
                "file name {} does not match the <base>[-<tree_index>]_<suffix>.<ext> grammar",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// The two conditions the reconstructor treats as fatal.
#[derive(Debug)]
pub enum InvariantViolation {
    NodeCountMismatch {
        trajectory_name: String,
        expected: usize,
        actual: usize,
    },
    CyclicAfterIntersection {
        trajectory_name: String,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::NodeCountMismatch {
                trajectory_name,
                expected,
                actual,
            } => write!(
                f,
                "trajectory {trajectory_name}: expected {expected} nodes (selection + root), got {actual}"
            ),
            InvariantViolation::CyclicAfterIntersection { trajectory_name } => write!(
                f,
                "trajectory {trajectory_name} became cyclic after intersecting selected DAGs' edges"
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}

pub type Result<T> = std::result::Result<T, PipelineError>;

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for DAG ingestion: skipped files, dropped non-DAG input,
//! and per-process duplicate-suppression counts.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A single input file was skipped due to an I/O or parse error.
pub struct FileSkipped<'a> {
    pub path: &'a str,
    pub reason: &'a str,
}

impl Display for FileSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "skipping {}: {}", self.path, self.reason)
    }
}

impl StructuredLog for FileSkipped<'_> {
    fn log(&self) {
        tracing::warn!(path = self.path, reason = self.reason, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("file_skipped", span_name = name, path = self.path)
    }
}

/// A DAG was dropped because transitive closure detected a cycle.
pub struct NonDagDropped<'a> {
    pub dag_name: &'a str,
}

impl Display for NonDagDropped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "DAG {} is not acyclic; dropping it", self.dag_name)
    }
}

impl StructuredLog for NonDagDropped<'_> {
    fn log(&self) {
        tracing::warn!(dag_name = self.dag_name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("non_dag_dropped", span_name = name, dag_name = self.dag_name)
    }
}

/// Per-process distinct-DAG count after duplicate suppression.
pub struct DistinctDagsCounted<'a> {
    pub process_id: &'a str,
    pub distinct_count: usize,
}

impl Display for DistinctDagsCounted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "process {} retained {} distinct DAG(s)",
            self.process_id, self.distinct_count
        )
    }
}

impl StructuredLog for DistinctDagsCounted<'_> {
    fn log(&self) {
        tracing::info!(
            process_id = self.process_id,
            distinct_count = self.distinct_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "distinct_dags_counted",
            span_name = name,
            process_id = self.process_id,
            distinct_count = self.distinct_count,
        )
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for trajectory reconstruction.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Intersecting a newly-processed selected graph's edges into the
/// trajectory changed the edge set (a symmetric difference was observed).
/// Emitted once per such difference, not just the last one.
pub struct TrajectoryIntroducesOrder<'a> {
    pub trajectory_name: &'a str,
    pub graph_name: &'a str,
    pub differing_edges: usize,
}

impl Display for TrajectoryIntroducesOrder<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "trajectory {} introduces order while folding in {}: {} differing edge(s)",
            self.trajectory_name, self.graph_name, self.differing_edges
        )
    }
}

impl StructuredLog for TrajectoryIntroducesOrder<'_> {
    fn log(&self) {
        tracing::info!(
            trajectory_name = self.trajectory_name,
            graph_name = self.graph_name,
            differing_edges = self.differing_edges,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "trajectory_introduces_order",
            span_name = name,
            trajectory_name = self.trajectory_name,
        )
    }
}

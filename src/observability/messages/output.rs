// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the output writers.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// All sinks for one run finished writing.
pub struct OutputsWritten {
    pub output_path: String,
    pub trajectory_count: usize,
}

impl Display for OutputsWritten {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "wrote {} trajectory(ies) to {}",
            self.trajectory_count, self.output_path
        )
    }
}

impl StructuredLog for OutputsWritten {
    fn log(&self) {
        tracing::info!(
            output_path = %self.output_path,
            trajectory_count = self.trajectory_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "outputs_written",
            span_name = name,
            output_path = %self.output_path,
            trajectory_count = self.trajectory_count,
        )
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for duplicate-trajectory merging.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Deduplication merged some number of trajectories into existing ones.
pub struct DuplicatesRemoved {
    pub count: usize,
    pub remaining: usize,
}

impl Display for DuplicatesRemoved {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "removed {} duplicate trajectory(ies); {} remain",
            self.count, self.remaining
        )
    }
}

impl StructuredLog for DuplicatesRemoved {
    fn log(&self) {
        tracing::info!(count = self.count, remaining = self.remaining, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "duplicates_removed",
            span_name = name,
            count = self.count,
            remaining = self.remaining,
        )
    }
}

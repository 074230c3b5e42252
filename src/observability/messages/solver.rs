// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the ILP interface: quota clamping and pool truncation.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// `k` exceeded the number of available processes; clamped and retried.
pub struct QuotaClamped {
    pub requested_k: usize,
    pub clamped_k: usize,
}

impl Display for QuotaClamped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "k={} exceeds available processes; clamping to {}",
            self.requested_k, self.clamped_k
        )
    }
}

impl StructuredLog for QuotaClamped {
    fn log(&self) {
        tracing::warn!(
            requested_k = self.requested_k,
            clamped_k = self.clamped_k,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "quota_clamped",
            span_name = name,
            requested_k = self.requested_k,
            clamped_k = self.clamped_k,
        )
    }
}

/// More distinct optimal solutions existed than `solution_pool_size`
/// allowed; the pool was truncated.
pub struct SolutionPoolTruncated {
    pub found: usize,
    pub kept: usize,
}

impl Display for SolutionPoolTruncated {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "found {} optimal solution(s), keeping {} (solution_pool_size)",
            self.found, self.kept
        )
    }
}

impl StructuredLog for SolutionPoolTruncated {
    fn log(&self) {
        tracing::warn!(found = self.found, kept = self.kept, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("solution_pool_truncated", span_name = name, found = self.found, kept = self.kept)
    }
}

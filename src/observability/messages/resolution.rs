// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the resolution policy engine (frequency, threshold).

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Frequency policy found an ordered pair and its reverse equally
/// supported; neither is reinstated and both remain in the potential map.
pub struct SameFrequency {
    pub a: String,
    pub b: String,
    pub count: usize,
}

impl Display for SameFrequency {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "same frequency of edges for ({}, {}) and its reverse: {} each",
            self.a, self.b, self.count
        )
    }
}

impl StructuredLog for SameFrequency {
    fn log(&self) {
        tracing::warn!(a = %self.a, b = %self.b, count = self.count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("same_frequency", span_name = name, a = %self.a, b = %self.b)
    }
}

/// Threshold policy reinstated a weakly-supported potential conflict.
pub struct ThresholdReinstated {
    pub a: String,
    pub b: String,
    pub supporting_graphs: usize,
    pub threshold: usize,
}

impl Display for ThresholdReinstated {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "threshold policy reinstated conflict ({}, {}): {} supporting graph(s) < tau={}",
            self.a, self.b, self.supporting_graphs, self.threshold
        )
    }
}

impl StructuredLog for ThresholdReinstated {
    fn log(&self) {
        tracing::info!(
            a = %self.a,
            b = %self.b,
            supporting_graphs = self.supporting_graphs,
            threshold = self.threshold,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "threshold_reinstated",
            span_name = name,
            a = %self.a,
            b = %self.b,
        )
    }
}

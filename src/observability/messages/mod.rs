// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging and distributed tracing.
//!
//! Each message type implements:
//!
//! * `Display` - Human-readable output
//! * `StructuredLog` - Machine-readable fields + OpenTelemetry span creation
//!
//! # Organization
//!
//! Messages are organized by pipeline stage:
//!
//! * `ingest` - DAG ingestion, duplicate suppression, and invalid input
//! * `resolution` - frequency/threshold policy diagnostics
//! * `reconstruct` - trajectory reconstruction diagnostics
//! * `dedup` - duplicate-trajectory merging
//! * `solver` - ILP interface / quota clamping
//! * `output` - sink writers
//!
//! # Usage
//! ```
//! use max_common_trajectory::observability::messages::{StructuredLog, dedup::DuplicatesRemoved};
//!
//! let msg = DuplicatesRemoved { count: 2, remaining: 5 };
//! tracing::info!("{}", msg);
//! msg.log();
//! ```

pub mod dedup;
pub mod ingest;
pub mod output;
pub mod reconstruct;
pub mod resolution;
pub mod solver;

use tracing::Span;

/// Trait for messages that support structured logging and distributed tracing.
pub trait StructuredLog {
    /// Emit a log event: human-readable message plus structured fields.
    fn log(&self);

    /// Create a span carrying this message's fields as attributes.
    fn span(&self, name: &str) -> Span;
}

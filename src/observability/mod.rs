// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Message types follow a struct-based pattern with `Display` plus
//! `StructuredLog` implementations, organized by pipeline stage. See
//! [`messages`] for the full catalog.
//!
//! ```
//! use max_common_trajectory::observability::messages::resolution::SameFrequency;
//!
//! let msg = SameFrequency { a: "A".into(), b: "B".into(), count: 2 };
//! tracing::warn!("{}", msg);
//! ```

pub mod messages;

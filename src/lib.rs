// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod conflict;       // pairwise conflict analyser
pub mod config;         // run configuration
pub mod context;        // per-run settings
pub mod dedup;          // trajectory deduplication
pub mod errors;         // error handling
pub mod graphops;       // closure / reduction / cycle detection
pub mod ingest;         // DAG ingestion
pub mod model;          // node interning, DAGs, process map
pub mod observability;
pub mod output;         // CSV / GEXF sinks
pub mod pairs;          // pair enumeration
pub mod reconstruct;    // trajectory reconstruction
pub mod resolution;     // frequency / threshold policies
pub mod solver;         // ILP interface + reference solver
pub mod support;        // support computation
pub mod union_graph;    // union conflict graph assembly

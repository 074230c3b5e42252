// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Resolution Policy Engine: two optional, independent policies — applied
//! in order (frequency, then threshold) — that reinstate suppressed
//! conflict edges into the union graph from the aggregated potential
//! conflicts map.

use crate::context::Context;
use crate::model::{NodeId, NodeInterner};
use crate::observability::messages::resolution::{SameFrequency, ThresholdReinstated};
use crate::observability::messages::StructuredLog;
use crate::union_graph::{AggregatedPotentialConflicts, UnionConflictGraph};
use std::collections::HashSet;

fn reinstate(union: &mut UnionConflictGraph, potential: &mut AggregatedPotentialConflicts, key: &(NodeId, NodeId)) {
    if let Some(agg) = potential.remove(key) {
        for label in &agg.labels {
            union.add_edge(key.0, key.1, label.clone());
        }
    }
}

/// For each ordered key whose reverse is also present, reinstates the
/// minority-direction entry's edges; on a tie, leaves both in place and
/// emits a diagnostic.
pub fn frequency_policy(
    potential: &mut AggregatedPotentialConflicts,
    union: &mut UnionConflictGraph,
    interner: &NodeInterner,
    ctx: &Context,
) {
    let keys: Vec<(NodeId, NodeId)> = potential.keys().copied().collect();
    let mut processed: HashSet<(NodeId, NodeId)> = HashSet::new();

    for key in keys {
        if processed.contains(&key) {
            continue;
        }
        let reverse = (key.1, key.0);
        if !potential.contains_key(&reverse) {
            continue;
        }
        processed.insert(key);
        processed.insert(reverse);

        let forward_count = potential.get(&key).map(|e| e.edge_graph_names.len()).unwrap_or(0);
        let backward_count = potential.get(&reverse).map(|e| e.edge_graph_names.len()).unwrap_or(0);

        match forward_count.cmp(&backward_count) {
            std::cmp::Ordering::Greater => reinstate(union, potential, &reverse),
            std::cmp::Ordering::Less => reinstate(union, potential, &key),
            std::cmp::Ordering::Equal => {
                if ctx.verbose {
                    SameFrequency {
                        a: interner.label(key.0).to_string(),
                        b: interner.label(key.1).to_string(),
                        count: forward_count,
                    }
                    .log();
                }
            }
        }
    }
}

/// Reinstates every remaining potential conflict whose supporting-graph
/// count is below `tau`. With `tau == 1` this is a no-op, since no entry
/// can have fewer than one supporting graph.
pub fn threshold_policy(
    potential: &mut AggregatedPotentialConflicts,
    union: &mut UnionConflictGraph,
    tau: usize,
    interner: &NodeInterner,
    ctx: &Context,
) {
    let keys: Vec<(NodeId, NodeId)> = potential.keys().copied().collect();
    for key in keys {
        let Some(agg) = potential.get(&key) else { continue };
        let supporting = agg.edge_graph_names.len();
        if supporting < tau {
            if ctx.verbose {
                ThresholdReinstated {
                    a: interner.label(key.0).to_string(),
                    b: interner.label(key.1).to_string(),
                    supporting_graphs: supporting,
                    threshold: tau,
                }
                .log();
            }
            reinstate(union, potential, &key);
        }
    }
}

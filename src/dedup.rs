// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Deduplicator: merges trajectories that are set-equal in both nodes and
//! edges (label-preserving isomorphism reduces to plain set equality since
//! node labels are global identifiers), folding their names together.

use crate::context::Context;
use crate::model::{Dag, NodeId};
use crate::observability::messages::dedup::DuplicatesRemoved;
use crate::observability::messages::StructuredLog;
use std::collections::BTreeSet;

fn canonical_key(dag: &Dag) -> (Vec<NodeId>, Vec<(NodeId, NodeId)>) {
    let mut nodes: Vec<NodeId> = dag.nodes().collect();
    nodes.sort_unstable();
    let mut edges: Vec<(NodeId, NodeId)> = dag.edges().collect();
    edges.sort_unstable();
    (nodes, edges)
}

/// Merges every pair of trajectories with equal node and edge sets into
/// the earlier one, unioning their names sorted and colon-joined.
pub fn deduplicate(mut trajectories: Vec<Dag>, ctx: &Context) -> Vec<Dag> {
    let mut keys: Vec<(Vec<NodeId>, Vec<(NodeId, NodeId)>)> = trajectories.iter().map(canonical_key).collect();
    let mut removed_count = 0usize;

    let mut i = 0;
    while i < trajectories.len() {
        let mut j = i + 1;
        while j < trajectories.len() {
            if keys[i] == keys[j] {
                let removed = trajectories.remove(j);
                keys.remove(j);

                let mut names: BTreeSet<String> = trajectories[i].name.split(':').map(String::from).collect();
                names.extend(removed.name.split(':').map(String::from));
                trajectories[i].name = names.into_iter().collect::<Vec<_>>().join(":");

                removed_count += 1;
            } else {
                j += 1;
            }
        }
        i += 1;
    }

    if removed_count > 0 && ctx.verbose {
        DuplicatesRemoved { count: removed_count, remaining: trajectories.len() }.log();
    }

    trajectories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeInterner;

    fn context() -> Context {
        Context { verbose: false, cores: 1, cancel: crate::context::CancellationFlag::new() }
    }

    /// S5 — dedup merges names: two pool members produce the same
    /// trajectory from disjoint DAG selections; after dedup exactly one
    /// trajectory remains with a sorted, colon-joined name union.
    #[test]
    fn s5_merges_equal_trajectories_and_unions_names() {
        let mut interner = NodeInterner::new();
        let root = interner.intern("0");
        let a = interner.intern("A");
        let b = interner.intern("B");

        let mut t1 = Dag::new("p1-0:p2-0");
        t1.add_edge(root, a);
        t1.add_edge(a, b);

        let mut t2 = Dag::new("p1-0:p3-0");
        t2.add_edge(root, a);
        t2.add_edge(a, b);

        let result = deduplicate(vec![t1, t2], &context());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "p1-0:p2-0:p3-0");
    }

    #[test]
    fn distinct_trajectories_are_kept() {
        let mut interner = NodeInterner::new();
        let root = interner.intern("0");
        let a = interner.intern("A");
        let b = interner.intern("B");

        let mut t1 = Dag::new("p1-0");
        t1.add_edge(root, a);

        let mut t2 = Dag::new("p2-0");
        t2.add_edge(root, b);

        let result = deduplicate(vec![t1, t2], &context());
        assert_eq!(result.len(), 2);
    }
}

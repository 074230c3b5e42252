// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Cycle detection, transitive closure, and transitive reduction over the
//! `NodeId`-keyed edge sets used throughout this crate.
//!
//! Cycle detection and topological ordering are delegated to `petgraph`'s
//! `DiGraphMap` (node identifiers are used directly as graph keys, avoiding
//! a separate index mapping). Closure and reduction are computed directly
//! over this crate's own edge-set representation: both are simple,
//! well-understood fixed-point computations once a topological order is in
//! hand, and keeping them here avoids relying on a graph-library API
//! surface whose exact generic signature varies across versions.

use crate::model::NodeId;
use petgraph::algo::{is_cyclic_directed, toposort};
use petgraph::graphmap::DiGraphMap;
use std::collections::{HashMap, HashSet};

fn build_graph(nodes: &[NodeId], edges: &HashSet<(NodeId, NodeId)>) -> DiGraphMap<NodeId, ()> {
    let mut g = DiGraphMap::new();
    for &n in nodes {
        g.add_node(n);
    }
    for &(u, v) in edges {
        g.add_edge(u, v, ());
    }
    g
}

/// Returns `true` iff the given node/edge set has no directed cycle.
pub fn is_acyclic(nodes: &[NodeId], edges: &HashSet<(NodeId, NodeId)>) -> bool {
    let g = build_graph(nodes, edges);
    !is_cyclic_directed(&g)
}

/// Computes the transitive closure of the given node/edge set. Returns
/// `None` if the input contains a cycle.
pub fn transitive_closure(
    nodes: &[NodeId],
    edges: &HashSet<(NodeId, NodeId)>,
) -> Option<HashSet<(NodeId, NodeId)>> {
    let g = build_graph(nodes, edges);
    let topo = toposort(&g, None).ok()?;

    let mut reach: HashMap<NodeId, HashSet<NodeId>> = HashMap::new();
    for &n in topo.iter().rev() {
        let mut s = HashSet::new();
        for succ in g.neighbors(n) {
            s.insert(succ);
            if let Some(r) = reach.get(&succ) {
                s.extend(r.iter().copied());
            }
        }
        reach.insert(n, s);
    }

    let mut closure = HashSet::new();
    for (&u, set) in reach.iter() {
        for &v in set {
            closure.insert((u, v));
        }
    }
    Some(closure)
}

/// Transitively reduces an already-transitively-closed edge set: an edge
/// `(u,v)` is redundant iff some other node `w` has both `(u,w)` and
/// `(w,v)` as edges.
pub fn transitive_reduction(
    nodes: &[NodeId],
    edges: &HashSet<(NodeId, NodeId)>,
) -> HashSet<(NodeId, NodeId)> {
    let mut reduced = edges.clone();
    for &(u, v) in edges {
        let redundant = nodes
            .iter()
            .any(|&w| w != u && w != v && edges.contains(&(u, w)) && edges.contains(&(w, v)));
        if redundant {
            reduced.remove(&(u, v));
        }
    }
    reduced
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(i: u32) -> NodeId {
        NodeId(i)
    }

    #[test]
    fn detects_cycle() {
        let nodes = vec![n(0), n(1), n(2)];
        let edges: HashSet<_> = [(n(0), n(1)), (n(1), n(2)), (n(2), n(0))].into_iter().collect();
        assert!(!is_acyclic(&nodes, &edges));
        assert!(transitive_closure(&nodes, &edges).is_none());
    }

    #[test]
    fn closure_adds_transitive_edge() {
        let nodes = vec![n(0), n(1), n(2)];
        let edges: HashSet<_> = [(n(0), n(1)), (n(1), n(2))].into_iter().collect();
        let closure = transitive_closure(&nodes, &edges).unwrap();
        assert!(closure.contains(&(n(0), n(2))));
        assert!(is_acyclic(&nodes, &edges));
    }

    #[test]
    fn reduction_removes_shortcut_edge() {
        let nodes = vec![n(0), n(1), n(2)];
        let closed: HashSet<_> = [(n(0), n(1)), (n(1), n(2)), (n(0), n(2))].into_iter().collect();
        let reduced = transitive_reduction(&nodes, &closed);
        assert!(!reduced.contains(&(n(0), n(2))));
        assert!(reduced.contains(&(n(0), n(1))));
        assert!(reduced.contains(&(n(1), n(2))));
    }

    #[test]
    fn reduction_then_closure_round_trips() {
        let nodes = vec![n(0), n(1), n(2), n(3)];
        let closed: HashSet<_> = [
            (n(0), n(1)),
            (n(0), n(2)),
            (n(0), n(3)),
            (n(1), n(2)),
            (n(1), n(3)),
            (n(2), n(3)),
        ]
        .into_iter()
        .collect();
        let reduced = transitive_reduction(&nodes, &closed);
        let reclosed = transitive_closure(&nodes, &reduced).unwrap();
        assert_eq!(reclosed, closed);
    }
}

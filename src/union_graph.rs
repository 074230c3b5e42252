// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Union Conflict Graph Assembler: merges pairwise conflict graphs into a
//! labelled multigraph, and aggregates potential conflicts from all pairs
//! into a single map the resolution policy engine can act on.

use crate::conflict::PairAnalysis;
use crate::model::NodeId;
use std::collections::{BTreeMap, BTreeSet, HashMap};

fn canon(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Undirected multigraph over all nodes appearing in any pair. Parallel
/// edges between the same endpoints, one per contributing pair, are
/// preserved as a label list keyed by the canonicalised (lesser-id-first)
/// endpoint pair.
#[derive(Debug, Clone, Default)]
pub struct UnionConflictGraph {
    nodes: BTreeSet<NodeId>,
    edges: HashMap<(NodeId, NodeId), Vec<String>>,
}

impl UnionConflictGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, n: NodeId) {
        self.nodes.insert(n);
    }

    /// Adds a labelled edge between `a` and `b`. The label is appended to
    /// the canonical key's label list even if an edge already exists there
    /// (parallel edges, distinguished by label, are preserved).
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, label: impl Into<String>) {
        self.nodes.insert(a);
        self.nodes.insert(b);
        self.edges.entry(canon(a, b)).or_default().push(label.into());
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edges.contains_key(&canon(a, b))
    }

    pub fn labels(&self, a: NodeId, b: NodeId) -> &[String] {
        self.edges.get(&canon(a, b)).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &[String])> + '_ {
        self.edges.iter().map(|(&(a, b), labels)| (a, b, labels.as_slice()))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Aggregated `(a,b) -> {labels, edge_graph_names}` potential-conflict map,
/// keyed by the *ordered* pair exactly as recorded by the analyser
/// (direction matters here, unlike the union graph's own edge keys).
#[derive(Debug, Clone, Default)]
pub struct AggregatedPotentialConflicts {
    entries: BTreeMap<(NodeId, NodeId), PotentialConflictAgg>,
}

#[derive(Debug, Clone, Default)]
pub struct PotentialConflictAgg {
    pub labels: BTreeSet<String>,
    pub edge_graph_names: BTreeSet<String>,
}

impl AggregatedPotentialConflicts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: (NodeId, NodeId), pair_name: String, dag_name: String) {
        let entry = self.entries.entry(key).or_default();
        entry.labels.insert(pair_name);
        entry.edge_graph_names.insert(dag_name);
    }

    pub fn get(&self, key: &(NodeId, NodeId)) -> Option<&PotentialConflictAgg> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &(NodeId, NodeId)) -> Option<PotentialConflictAgg> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &(NodeId, NodeId)) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &(NodeId, NodeId)> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(NodeId, NodeId), &PotentialConflictAgg)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Merges every pairwise analysis's conflict graph and potential-conflict
/// entries into a single union graph and aggregated map. Order-independent
/// for edges (multigraph; labels distinguish) and commutative/associative
/// for the aggregated map, so the result is a deterministic function of the
/// input regardless of fan-out merge order.
pub fn assemble(analyses: &[PairAnalysis]) -> (UnionConflictGraph, AggregatedPotentialConflicts) {
    let mut union = UnionConflictGraph::new();
    let mut potential = AggregatedPotentialConflicts::new();

    for analysis in analyses {
        for &n in &analysis.graph.nodes {
            union.add_node(n);
        }
        for &(a, b) in &analysis.graph.edges {
            union.add_edge(a, b, analysis.graph.name.clone());
        }
        for entry in &analysis.potential_conflicts {
            potential.insert(entry.key, entry.pair_name.clone(), entry.dag_name.clone());
        }
    }

    (union, potential)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::analyze_pair;
    use crate::model::{Dag, NodeInterner};
    use crate::pairs::DagPair;

    #[test]
    fn assembly_is_order_independent() {
        let mut interner = NodeInterner::new();
        let root = interner.intern("0");
        let a = interner.intern("A");
        let b = interner.intern("B");

        let mut g1 = Dag::new("p1-0");
        g1.add_edge(root, a);
        g1.add_edge(root, b);
        g1.add_edge(a, b);
        let mut g2 = Dag::new("p2-0");
        g2.add_edge(root, a);
        g2.add_edge(root, b);
        g2.add_edge(b, a);

        let analysis = analyze_pair(&DagPair { a: &g1, b: &g2 }, root);
        let (forward, _) = assemble(&[analysis]);

        let analysis_rev = analyze_pair(&DagPair { a: &g2, b: &g1 }, root);
        let (backward, _) = assemble(&[analysis_rev]);

        assert_eq!(forward.edge_count(), backward.edge_count());
        assert!(forward.has_edge(a, b));
        assert!(backward.has_edge(a, b));
    }
}

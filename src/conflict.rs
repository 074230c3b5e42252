// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pairwise Conflict Analyser: for each cross-process DAG pair, computes
//! the pair's undirected conflict graph and the set of potential
//! cluster/edge conflicts a resolution policy may later reinstate.
//!
//! Pure function of its input pair; trivially parallel across pairs (see
//! [`analyze_pairs`]).

use crate::context::Context;
use crate::errors::PipelineError;
use crate::model::{Dag, NodeId};
use crate::pairs::DagPair;
use std::collections::{BTreeSet, HashSet};

/// Relation a single DAG asserts between two nodes that are both present
/// in it. Mutually exclusive: a transitively-closed DAG has at most one of
/// these for any ordered pair.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Relation {
    Forward,
    Backward,
    Cluster,
    Incomparable,
}

fn relation_in(dag: &Dag, a: NodeId, b: NodeId) -> Relation {
    if dag.has_edge(a, b) {
        Relation::Forward
    } else if dag.has_edge(b, a) {
        Relation::Backward
    } else if dag.are_cluster_mates(a, b) {
        Relation::Cluster
    } else {
        Relation::Incomparable
    }
}

/// Undirected conflict graph for one DAG pair.
#[derive(Debug, Clone)]
pub struct PairConflictGraph {
    pub name: String,
    pub nodes: BTreeSet<NodeId>,
    pub edges: HashSet<(NodeId, NodeId)>,
}

/// An ordered-pair potential conflict: one DAG in the pair asserted a
/// directed edge, the other asserted cluster membership, and no conflict
/// edge was triggered. Retained for resolution-policy reconsideration.
#[derive(Debug, Clone)]
pub struct PotentialConflictEntry {
    pub key: (NodeId, NodeId),
    pub pair_name: String,
    pub dag_name: String,
}

pub struct PairAnalysis {
    pub graph: PairConflictGraph,
    pub potential_conflicts: Vec<PotentialConflictEntry>,
}

fn pair_name(a: &str, b: &str) -> String {
    let mut names = [a, b];
    names.sort_unstable();
    format!("{}:{}", names[0], names[1])
}

/// Computes the conflict graph and potential conflicts for a single DAG
/// pair, per the 4-bit signature rule. `root` is excluded from the common
/// node set: it precedes every other node in every ingested DAG by
/// construction, so it can never participate in a conflict or potential
/// conflict, and the solver's node objective counts it separately (the
/// reconstructor always adds it back regardless of the selection).
pub fn analyze_pair(pair: &DagPair, root: NodeId) -> PairAnalysis {
    let name = pair_name(&pair.a.name, &pair.b.name);
    let common: BTreeSet<NodeId> = pair.a.nodes().filter(|&n| n != root && pair.b.has_node(n)).collect();

    let mut edges = HashSet::new();
    let mut potential_conflicts = Vec::new();

    let common_vec: Vec<NodeId> = common.iter().copied().collect();
    for (i, &a) in common_vec.iter().enumerate() {
        for &b in &common_vec[i + 1..] {
            let rel_a = relation_in(pair.a, a, b);
            let rel_b = relation_in(pair.b, a, b);

            let bit0 = rel_a == Relation::Forward || rel_b == Relation::Forward;
            let bit1 = rel_a == Relation::Backward || rel_b == Relation::Backward;
            let bit2 = rel_a == Relation::Incomparable || rel_b == Relation::Incomparable;
            let bit3 = rel_a == Relation::Cluster || rel_b == Relation::Cluster;

            let count012 = bit0 as u8 + bit1 as u8 + bit2 as u8;
            let count23 = bit2 as u8 + bit3 as u8;
            let conflict = count012 > 1 || count23 > 1;

            if conflict {
                edges.insert((a, b));
                continue;
            }

            if bit0 && bit3 {
                let dag_name = if rel_a == Relation::Forward { &pair.a.name } else { &pair.b.name };
                potential_conflicts.push(PotentialConflictEntry {
                    key: (a, b),
                    pair_name: name.clone(),
                    dag_name: dag_name.clone(),
                });
            }
            if bit1 && bit3 {
                let dag_name = if rel_a == Relation::Backward { &pair.a.name } else { &pair.b.name };
                potential_conflicts.push(PotentialConflictEntry {
                    key: (b, a),
                    pair_name: name.clone(),
                    dag_name: dag_name.clone(),
                });
            }
        }
    }

    PairAnalysis {
        graph: PairConflictGraph { name, nodes: common, edges },
        potential_conflicts,
    }
}

/// Runs [`analyze_pair`] over every pair, dispatched across the worker pool
/// when more than one core is configured; results are returned in the
/// enumerator's deterministic order.
pub fn analyze_pairs(pairs: &[DagPair], root: NodeId, ctx: &Context) -> Result<Vec<PairAnalysis>, PipelineError> {
    if ctx.cores > 1 {
        use rayon::prelude::*;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(ctx.cores)
            .build()
            .map_err(|source| PipelineError::WorkerPoolInit { cores: ctx.cores, source })?;
        Ok(pool.install(|| pairs.par_iter().map(|p| analyze_pair(p, root)).collect()))
    } else {
        Ok(pairs.iter().map(|p| analyze_pair(p, root)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeInterner;

    /// S1 — basic conflict: G1 asserts A->B, G2 asserts B->A; expect a
    /// conflict edge {A,B}.
    #[test]
    fn s1_basic_conflict() {
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

        let result = analyze_pair(&DagPair { a: &g1, b: &g2 }, root);
        assert!(result.graph.edges.contains(&(a, b)) || result.graph.edges.contains(&(b, a)));
        assert!(result.potential_conflicts.is_empty());
    }

    /// S2 — cluster vs order: G1 clusters A,B; G2 orders A->B. No direct
    /// edge in G1 between A and B, so bits = {0 (from G2), 3 (from G1)}:
    /// no conflict edge, but a potential conflict is recorded.
    #[test]
    fn s2_cluster_vs_order_no_conflict_edge() {
        let mut interner = NodeInterner::new();
        let root = interner.intern("0");
        let a = interner.intern("A");
        let b = interner.intern("B");

        let mut g1 = Dag::new("p1-0");
        g1.add_edge(root, a);
        g1.add_edge(root, b);
        g1.add_cluster_pair(a, b);

        let mut g2 = Dag::new("p2-0");
        g2.add_edge(root, a);
        g2.add_edge(root, b);
        g2.add_edge(a, b);

        let result = analyze_pair(&DagPair { a: &g1, b: &g2 }, root);
        assert!(!result.graph.edges.contains(&(a, b)));
        assert_eq!(result.potential_conflicts.len(), 1);
        assert_eq!(result.potential_conflicts[0].key, (a, b));
        assert_eq!(result.potential_conflicts[0].dag_name, "p2-0");
    }
}

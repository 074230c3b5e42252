// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Trajectory Reconstructor: turns one solver-chosen `(S_nodes, S_graphs)`
//! pair into the common-trajectory DAG it represents.

use crate::context::Context;
use crate::errors::{InvariantViolation, PipelineError};
use crate::graphops;
use crate::model::{Dag, NodeId, ProcessMap};
use crate::observability::messages::reconstruct::TrajectoryIntroducesOrder;
use crate::observability::messages::StructuredLog;
use crate::solver::Solution;
use std::collections::HashSet;

/// The reconstructed trajectory plus the "introduces order" diagnostics
/// raised while folding in the selected DAGs, one line per event
/// regardless of `ctx.verbose` — callers append these to `resolution.txt`.
pub struct ReconstructOutput {
    pub trajectory: Dag,
    pub resolution_log: Vec<String>,
}

/// Builds and validates the trajectory DAG for one optimal solution.
///
/// Folds in each selected DAG's edges (restricted to `solution.nodes`) in
/// sorted-name order, recording an "introduces order" event whenever a
/// later DAG's restricted edges differ from what has accumulated so far
/// (`ctx.verbose` gates only the tracing log line, not the returned
/// diagnostic). Asserts the node-count and acyclicity invariants, applies
/// transitive reduction, then reattaches cluster membership for any
/// non-adjacent pair any selected DAG records as clustered.
pub fn reconstruct(solution: &Solution, processes: &ProcessMap, root: NodeId, ctx: &Context) -> Result<ReconstructOutput, PipelineError> {
    let mut sorted_names = solution.graphs.clone();
    sorted_names.sort();
    let name = sorted_names.join(":");

    let selected_dags: Vec<&Dag> = sorted_names.iter().filter_map(|n| processes.dag_named(n)).collect();

    let mut running_edges: HashSet<(NodeId, NodeId)> = HashSet::new();
    let mut resolution_log = Vec::new();
    for (i, g) in selected_dags.iter().enumerate() {
        let g_edges: HashSet<(NodeId, NodeId)> = g
            .edges()
            .filter(|&(u, v)| solution.nodes.contains(&u) && solution.nodes.contains(&v))
            .collect();

        if i > 0 {
            let differing = running_edges.symmetric_difference(&g_edges).count();
            if differing > 0 {
                let event = TrajectoryIntroducesOrder {
                    trajectory_name: &name,
                    graph_name: &g.name,
                    differing_edges: differing,
                };
                resolution_log.push(event.to_string());
                if ctx.verbose {
                    event.log();
                }
            }
        }

        running_edges = running_edges.union(&g_edges).copied().collect();
    }

    let mut trajectory = Dag::new(name.clone());
    trajectory.add_node(root);
    for &n in &solution.nodes {
        trajectory.add_node(n);
    }
    for &(u, v) in &running_edges {
        trajectory.add_edge(u, v);
    }

    let expected_nodes = solution.nodes.len() + 1;
    if trajectory.node_count() != expected_nodes {
        return Err(PipelineError::InvariantViolation(InvariantViolation::NodeCountMismatch {
            trajectory_name: name,
            expected: expected_nodes,
            actual: trajectory.node_count(),
        }));
    }

    let node_vec: Vec<NodeId> = trajectory.nodes().collect();
    let edge_set: HashSet<(NodeId, NodeId)> = trajectory.edges().collect();
    if !graphops::is_acyclic(&node_vec, &edge_set) {
        return Err(PipelineError::InvariantViolation(InvariantViolation::CyclicAfterIntersection { trajectory_name: name }));
    }

    let reduced = graphops::transitive_reduction(&node_vec, &edge_set);
    let mut trajectory = Dag::new(name);
    for &n in &node_vec {
        trajectory.add_node(n);
    }
    for &(u, v) in &reduced {
        trajectory.add_edge(u, v);
    }

    for i in 0..node_vec.len() {
        for &b in &node_vec[i + 1..] {
            let a = node_vec[i];
            if trajectory.has_edge(a, b) || trajectory.has_edge(b, a) {
                continue;
            }
            if selected_dags.iter().any(|g| g.are_cluster_mates(a, b)) {
                trajectory.add_cluster_pair(a, b);
            }
        }
    }

    Ok(ReconstructOutput { trajectory, resolution_log })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeInterner;
    use std::collections::BTreeSet;

    fn context(verbose: bool) -> Context {
        Context { verbose, cores: 1, cancel: crate::context::CancellationFlag::new() }
    }

    /// S2 — cluster vs order, threshold off: the trajectory keeps the
    /// order `A->B` introduced by the one DAG that asserts it.
    #[test]
    fn s2_trajectory_introduces_order() {
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

        let mut processes = ProcessMap::new();
        processes.insert("p1-0", g1);
        processes.insert("p2-0", g2);

        let solution = Solution {
            nodes: [a, b].into_iter().collect(),
            graphs: vec!["p1-0".to_string(), "p2-0".to_string()],
        };

        let result = reconstruct(&solution, &processes, root, &context(true)).expect("valid trajectory");
        let trajectory = result.trajectory;
        assert_eq!(trajectory.name, "p1-0:p2-0");
        assert_eq!(trajectory.node_count(), 3);
        assert!(trajectory.has_edge(root, a));
        assert!(trajectory.has_edge(root, b));
        assert!(trajectory.has_edge(a, b));
        assert_eq!(result.resolution_log.len(), 1);
    }

    /// A malformed solution that (incorrectly) includes the root node in
    /// `S_nodes` collapses the root-plus-selection count via set dedup,
    /// tripping the node-count invariant.
    #[test]
    fn node_count_mismatch_is_fatal_when_solution_nodes_include_root() {
        let mut interner = NodeInterner::new();
        let root = interner.intern("0");
        let a = interner.intern("A");

        let processes = ProcessMap::new();
        let solution = Solution { nodes: [root, a].into_iter().collect(), graphs: vec![] };

        let err = reconstruct(&solution, &processes, root, &context(false)).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InvariantViolation(InvariantViolation::NodeCountMismatch { .. })
        ));
    }

    #[test]
    fn transitive_reduction_drops_shortcut_edge() {
        let mut interner = NodeInterner::new();
        let root = interner.intern("0");
        let a = interner.intern("A");
        let b = interner.intern("B");
        let c = interner.intern("C");

        let mut g = Dag::new("p1-0");
        g.add_edge(root, a);
        g.add_edge(root, b);
        g.add_edge(root, c);
        g.add_edge(a, b);
        g.add_edge(b, c);
        g.add_edge(a, c);

        let mut processes = ProcessMap::new();
        processes.insert("p1-0", g);

        let solution = Solution {
            nodes: [a, b, c].into_iter().collect::<BTreeSet<_>>(),
            graphs: vec!["p1-0".to_string()],
        };

        let result = reconstruct(&solution, &processes, root, &context(false)).expect("valid trajectory");
        let trajectory = result.trajectory;
        assert!(!trajectory.has_edge(a, c));
        assert!(trajectory.has_edge(a, b));
        assert!(trajectory.has_edge(b, c));
    }
}

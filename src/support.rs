// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Support Computer: for each deduplicated trajectory, determines which
//! input DAGs support it (the trajectory's transitive closure, restricted
//! to its own nodes, matches the input DAG's closure over those nodes).

use crate::graphops;
use crate::model::{Dag, NodeId, ProcessMap};
use std::collections::HashSet;

/// One trajectory's 1-indexed output record: itself, plus which input DAGs
/// support it.
pub struct TrajectorySupport {
    pub id: usize,
    pub trajectory: Dag,
    pub supporting: Vec<String>,
}

impl TrajectorySupport {
    pub fn support_count(&self) -> usize {
        self.supporting.len()
    }
}

fn supports(trajectory_star: &HashSet<(NodeId, NodeId)>, trajectory_nodes: &HashSet<NodeId>, g: &Dag) -> bool {
    let g_nodes: Vec<NodeId> = g.nodes().collect();
    let g_edges: HashSet<(NodeId, NodeId)> = g.edges().collect();
    let Some(g_star) = graphops::transitive_closure(&g_nodes, &g_edges) else {
        return false;
    };
    let h: HashSet<(NodeId, NodeId)> =
        g_star.into_iter().filter(|(u, v)| trajectory_nodes.contains(u) && trajectory_nodes.contains(v)).collect();
    &h == trajectory_star
}

/// Computes support for every trajectory against every input DAG.
/// Trajectories are assumed already deduplicated by the caller; each is
/// hashed implicitly by its own `(nodes, edges)` since that is exactly
/// what determines its closure.
pub fn compute_support(trajectories: &[Dag], processes: &ProcessMap) -> Vec<TrajectorySupport> {
    trajectories
        .iter()
        .enumerate()
        .map(|(idx, trajectory)| {
            let nodes: Vec<NodeId> = trajectory.nodes().collect();
            let edges: HashSet<(NodeId, NodeId)> = trajectory.edges().collect();
            let node_set: HashSet<NodeId> = nodes.iter().copied().collect();
            let star = graphops::transitive_closure(&nodes, &edges).unwrap_or(edges);

            let mut supporting: Vec<String> = processes
                .all_dags()
                .filter(|g| supports(&star, &node_set, g))
                .map(|g| g.name.clone())
                .collect();
            supporting.sort();

            TrajectorySupport { id: idx + 1, trajectory: trajectory.clone(), supporting }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeInterner, ProcessMap};

    /// S6 — support: trajectory `{0->A, A->B}` against four input DAGs,
    /// three containing A->B in their closure and one containing B->A.
    #[test]
    fn s6_three_of_four_dags_support_the_trajectory() {
        let mut interner = NodeInterner::new();
        let root = interner.intern("0");
        let a = interner.intern("A");
        let b = interner.intern("B");

        let mut trajectory = Dag::new("p1-0:p2-0:p3-0");
        trajectory.add_edge(root, a);
        trajectory.add_edge(a, b);

        let mut processes = ProcessMap::new();
        for name in ["p1-0", "p2-0", "p3-0"] {
            let mut g = Dag::new(name);
            g.add_edge(root, a);
            g.add_edge(root, b);
            g.add_edge(a, b);
            processes.insert(name, g);
        }
        let mut g4 = Dag::new("p4-0");
        g4.add_edge(root, a);
        g4.add_edge(root, b);
        g4.add_edge(b, a);
        processes.insert("p4-0", g4);

        let results = compute_support(&[trajectory], &processes);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 1);
        assert_eq!(results[0].support_count(), 3);
        assert_eq!(results[0].supporting, vec!["p1-0", "p2-0", "p3-0"]);
    }

    #[test]
    fn no_support_when_every_dag_disagrees() {
        let mut interner = NodeInterner::new();
        let root = interner.intern("0");
        let a = interner.intern("A");
        let b = interner.intern("B");

        let mut trajectory = Dag::new("p1-0");
        trajectory.add_edge(root, a);
        trajectory.add_edge(a, b);

        let mut processes = ProcessMap::new();
        let mut g1 = Dag::new("p1-0");
        g1.add_edge(root, a);
        g1.add_edge(root, b);
        g1.add_edge(b, a);
        processes.insert("p1-0", g1);

        let results = compute_support(&[trajectory], &processes);
        assert_eq!(results[0].support_count(), 0);
    }
}

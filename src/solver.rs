// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! ILP Interface: the abstract contract a trajectory solver must satisfy,
//! plus an exhaustive/backtracking reference implementation suitable for
//! the small instances exercised by this crate's own tests. A real
//! integer-program solver is an external collaborator and out of scope
//! here; [`BruteForceSolver`] is a working, swappable stand-in.

use crate::context::Context;
use crate::errors::PipelineError;
use crate::model::{Dag, NodeId, ProcessMap};
use crate::observability::messages::solver::{QuotaClamped, SolutionPoolTruncated};
use crate::observability::messages::StructuredLog;
use crate::union_graph::UnionConflictGraph;
use std::collections::BTreeSet;

/// One optimal node selection and the DAGs (`y`-selected, one per
/// contributing process) that cover it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub nodes: BTreeSet<NodeId>,
    pub graphs: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SolutionPool {
    pub objective: usize,
    pub solutions: Vec<Solution>,
}

/// Chooses, for each process, at most one of its DAGs (or none) such that
/// the number of processes contributing a DAG meets the patient quota,
/// then maximises the number of nodes common to every selected DAG and
/// mutually non-conflicting under the union graph's active conflict edges.
pub trait TrajectorySolver {
    fn solve(
        &self,
        union_graph: &UnionConflictGraph,
        processes: &ProcessMap,
        k: usize,
        pool_size: usize,
    ) -> Result<SolutionPool, PipelineError>;
}

/// Builds the cartesian product of per-process choices: `None` (process
/// not selected) or `Some(dag)` for each of the process's retained DAGs.
fn enumerate_selections<'a>(process_options: &[Vec<Option<&'a Dag>>]) -> Vec<Vec<Option<&'a Dag>>> {
    let mut result: Vec<Vec<Option<&'a Dag>>> = vec![Vec::new()];
    for options in process_options {
        let mut next = Vec::with_capacity(result.len() * options.len());
        for partial in &result {
            for opt in options {
                let mut extended = partial.clone();
                extended.push(*opt);
                next.push(extended);
            }
        }
        result = next;
    }
    result
}

fn canon_pair(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Whether the union graph records an active conflict between `a` and `b`
/// given the currently selected DAG names: active iff some edge label
/// `"<g1>:<g2>"` has both halves in `selected_names`.
fn conflict_active(union_graph: &UnionConflictGraph, a: NodeId, b: NodeId, selected_names: &BTreeSet<&str>) -> bool {
    union_graph.labels(a, b).iter().any(|label| match label.split_once(':') {
        Some((g1, g2)) => selected_names.contains(g1) && selected_names.contains(g2),
        None => false,
    })
}

/// Every maximum independent set over `nodes` given a conflict predicate,
/// found by exhaustive subset search. Suitable only for the small
/// candidate sets this reference solver is exercised against.
fn max_independent_sets(nodes: &[NodeId], union_graph: &UnionConflictGraph, selected_names: &BTreeSet<&str>) -> (usize, Vec<BTreeSet<NodeId>>) {
    let n = nodes.len();
    assert!(n <= 20, "reference solver's exhaustive search is not meant for large candidate sets");

    let conflicts: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
        .filter(|&(i, j)| {
            let (a, b) = canon_pair(nodes[i], nodes[j]);
            conflict_active(union_graph, a, b, selected_names)
        })
        .collect();

    let mut best_size = 0usize;
    let mut best_sets: Vec<BTreeSet<NodeId>> = Vec::new();

    for mask in 0u32..(1u32 << n) {
        if conflicts.iter().any(|&(i, j)| mask & (1 << i) != 0 && mask & (1 << j) != 0) {
            continue;
        }
        let size = mask.count_ones() as usize;
        if size > best_size {
            best_size = size;
            best_sets.clear();
        }
        if size == best_size {
            let subset = (0..n).filter(|&i| mask & (1 << i) != 0).map(|i| nodes[i]).collect();
            best_sets.push(subset);
        }
    }

    (best_size, best_sets)
}

/// Reference brute-force solver: enumerates every per-process DAG
/// selection satisfying the patient quota, and for each computes the
/// maximum independent node set(s) over the shared-node candidates.
#[derive(Debug, Default, Clone, Copy)]
pub struct BruteForceSolver;

impl TrajectorySolver for BruteForceSolver {
    fn solve(
        &self,
        union_graph: &UnionConflictGraph,
        processes: &ProcessMap,
        k: usize,
        pool_size: usize,
    ) -> Result<SolutionPool, PipelineError> {
        let available = processes.process_count();
        if available == 0 {
            return Err(PipelineError::SolverInfeasible { k, available });
        }
        // The patient quota enforced here is the literal `k`, not
        // `min(k, |D|)`: the one-call-per-solve contract lets k exceed the
        // available process count, in which case no selection can satisfy
        // it and `solve_with_clamp` retries with `k` clamped to `|D|`.
        let quota = k;

        let process_ids: Vec<&str> = processes.process_ids().collect();
        let process_options: Vec<Vec<Option<&Dag>>> = process_ids
            .iter()
            .map(|p| {
                let mut options: Vec<Option<&Dag>> = vec![None];
                options.extend(processes.dags_for(p).iter().map(Some));
                options
            })
            .collect();

        let mut best_objective = 0usize;
        let mut solutions: Vec<Solution> = Vec::new();

        for selection in enumerate_selections(&process_options) {
            let selected: Vec<&Dag> = selection.into_iter().flatten().collect();
            if selected.len() < quota {
                continue;
            }

            let mut candidate_nodes: Option<BTreeSet<NodeId>> = None;
            for dag in &selected {
                let nodes: BTreeSet<NodeId> = dag.nodes().collect();
                candidate_nodes = Some(match candidate_nodes {
                    None => nodes,
                    Some(acc) => acc.intersection(&nodes).copied().collect(),
                });
            }
            // x_n is only defined for nodes of U; a node the union graph never
            // recorded (no cross-process pair ever shared it) cannot be selected.
            let union_nodes: BTreeSet<NodeId> = union_graph.nodes().collect();
            let candidate_nodes: Vec<NodeId> = candidate_nodes
                .unwrap_or_default()
                .into_iter()
                .filter(|n| union_nodes.contains(n))
                .collect();
            let selected_names: BTreeSet<&str> = selected.iter().map(|d| d.name.as_str()).collect();

            let (size, node_sets) = max_independent_sets(&candidate_nodes, union_graph, &selected_names);

            if size > best_objective {
                best_objective = size;
                solutions.clear();
            }
            if size == best_objective {
                for nodes in node_sets {
                    let graphs: Vec<String> = selected.iter().map(|d| d.name.clone()).collect();
                    let candidate = Solution { nodes, graphs };
                    if !solutions.contains(&candidate) {
                        solutions.push(candidate);
                    }
                }
            }
        }

        if solutions.is_empty() {
            return Err(PipelineError::SolverInfeasible { k, available });
        }

        let found = solutions.len();
        if found > pool_size {
            solutions.truncate(pool_size);
            SolutionPoolTruncated { found, kept: pool_size }.log();
        }

        Ok(SolutionPool { objective: best_objective, solutions })
    }
}

/// Runs `solver` with `k`; on [`PipelineError::SolverInfeasible`], retries
/// once with `k` clamped to the number of available processes, per the
/// automatic-clamping contract.
pub fn solve_with_clamp(
    solver: &dyn TrajectorySolver,
    union_graph: &UnionConflictGraph,
    processes: &ProcessMap,
    k: usize,
    pool_size: usize,
    ctx: &Context,
) -> Result<SolutionPool, PipelineError> {
    match solver.solve(union_graph, processes, k, pool_size) {
        Err(PipelineError::SolverInfeasible { available, .. }) if available > 0 && available < k => {
            if ctx.verbose {
                QuotaClamped { requested_k: k, clamped_k: available }.log();
            }
            solver.solve(union_graph, processes, available, pool_size)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::analyze_pair;
    use crate::model::NodeInterner;
    use crate::pairs::DagPair;
    use crate::union_graph::assemble;

    fn context() -> Context {
        Context { verbose: false, cores: 1, cancel: crate::context::CancellationFlag::new() }
    }

    /// S1 — basic conflict, k=2: with only one non-root node available per
    /// process pair (A and B conflict), each optimal trajectory keeps
    /// exactly one of {A, B}; two pool members.
    #[test]
    fn s1_two_processes_with_conflicting_node_yields_two_solutions() {
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

        let mut processes = ProcessMap::new();
        processes.insert("p1", g1.clone());
        processes.insert("p2", g2.clone());

        let analysis = analyze_pair(&DagPair { a: &g1, b: &g2 }, root);
        let (union, _potential) = assemble(&[analysis]);

        let pool = BruteForceSolver.solve(&union, &processes, 2, 5000).expect("feasible");
        assert_eq!(pool.objective, 1);
        assert_eq!(pool.solutions.len(), 2);
        let node_sets: Vec<BTreeSet<NodeId>> = pool.solutions.iter().map(|s| s.nodes.clone()).collect();
        assert!(node_sets.contains(&[a].into_iter().collect()));
        assert!(node_sets.contains(&[b].into_iter().collect()));
    }

    #[test]
    fn infeasible_when_no_processes_exist() {
        let processes = ProcessMap::new();
        let union = UnionConflictGraph::new();
        let err = BruteForceSolver.solve(&union, &processes, 2, 5000).unwrap_err();
        assert!(matches!(err, PipelineError::SolverInfeasible { available: 0, .. }));
    }

    #[test]
    fn k_clamps_to_available_process_count() {
        let mut interner = NodeInterner::new();
        let root = interner.intern("0");
        let a = interner.intern("A");

        let mut g1 = Dag::new("p1-0");
        g1.add_edge(root, a);
        let mut processes = ProcessMap::new();
        processes.insert("p1", g1);

        let mut union = UnionConflictGraph::new();
        union.add_node(a);
        let pool = solve_with_clamp(&BruteForceSolver, &union, &processes, 5, 5000, &context()).expect("clamped and feasible");
        assert_eq!(pool.objective, 1);
    }
}

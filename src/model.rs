// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Core data model: interned node identifiers, input DAGs, and the process
//! map that groups DAGs by the evolutionary process that produced them.
//!
//! Node labels arrive from input files as strings but every pipeline stage
//! after ingestion works over dense integer ids (`NodeId`) for cheap
//! equality and cache-friendly set operations. The [`NodeInterner`]
//! maintains the bijection back to the original strings for output.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

/// Dense integer identifier for an interned node label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The reserved label for the synthetic root node added to every ingested DAG.
pub const ROOT_LABEL: &str = "0";

/// Bidirectional mapping between node labels and their interned [`NodeId`]s.
///
/// ```
/// use max_common_trajectory::model::NodeInterner;
///
/// let mut interner = NodeInterner::new();
/// let a = interner.intern("A");
/// let b = interner.intern("B");
/// assert_eq!(interner.intern("A"), a);
/// assert_ne!(a, b);
/// assert_eq!(interner.label(a), "A");
/// ```
#[derive(Debug, Clone, Default)]
pub struct NodeInterner {
    labels: Vec<String>,
    ids: HashMap<String, NodeId>,
}

impl NodeInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `label`, interning it if this is the first time it
    /// has been seen.
    pub fn intern(&mut self, label: &str) -> NodeId {
        if let Some(id) = self.ids.get(label) {
            return *id;
        }
        let id = NodeId(self.labels.len() as u32);
        self.labels.push(label.to_string());
        self.ids.insert(label.to_string(), id);
        id
    }

    /// Looks up an already-interned id without creating a new one.
    pub fn lookup(&self, label: &str) -> Option<NodeId> {
        self.ids.get(label).copied()
    }

    /// Returns the original string label for an interned id.
    ///
    /// Panics if `id` was never produced by this interner; every `NodeId`
    /// reaching this function is expected to have been interned first.
    pub fn label(&self, id: NodeId) -> &str {
        &self.labels[id.0 as usize]
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.lookup(ROOT_LABEL)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// A single ingested, transitively-closed input DAG.
///
/// Edges and nodes are stored by [`NodeId`]; cluster membership is tracked
/// as a separate `node_id -> cluster_id` map plus a `cluster_id -> members`
/// table (per the design notes) rather than mutable in-place attribute
/// dictionaries, so updates are by id and never create reference cycles.
#[derive(Debug, Clone)]
pub struct Dag {
    pub name: String,
    nodes: BTreeSet<NodeId>,
    edges: HashSet<(NodeId, NodeId)>,
    node_cluster: HashMap<NodeId, usize>,
    clusters: Vec<HashSet<NodeId>>,
}

impl Dag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: BTreeSet::new(),
            edges: HashSet::new(),
            node_cluster: HashMap::new(),
            clusters: Vec::new(),
        }
    }

    pub fn add_node(&mut self, n: NodeId) {
        self.nodes.insert(n);
    }

    pub fn add_edge(&mut self, u: NodeId, v: NodeId) {
        self.nodes.insert(u);
        self.nodes.insert(v);
        self.edges.insert((u, v));
    }

    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.edges.contains(&(u, v))
    }

    pub fn has_node(&self, n: NodeId) -> bool {
        self.nodes.contains(&n)
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.edges.iter().copied()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Merges `b` into `a`'s cluster, creating a cluster for either node if
    /// it does not already belong to one, and joining the two clusters
    /// (transitively closing membership) if both already belong to
    /// distinct ones.
    pub fn add_cluster_pair(&mut self, a: NodeId, b: NodeId) {
        match (self.node_cluster.get(&a).copied(), self.node_cluster.get(&b).copied()) {
            (None, None) => {
                let idx = self.clusters.len();
                self.clusters.push([a, b].into_iter().collect());
                self.node_cluster.insert(a, idx);
                self.node_cluster.insert(b, idx);
            }
            (Some(idx), None) => {
                self.clusters[idx].insert(b);
                self.node_cluster.insert(b, idx);
            }
            (None, Some(idx)) => {
                self.clusters[idx].insert(a);
                self.node_cluster.insert(a, idx);
            }
            (Some(ia), Some(ib)) if ia != ib => {
                let members: Vec<NodeId> = self.clusters[ib].iter().copied().collect();
                for m in &members {
                    self.node_cluster.insert(*m, ia);
                }
                let moved = std::mem::take(&mut self.clusters[ib]);
                self.clusters[ia].extend(moved);
            }
            _ => {}
        }
    }

    /// The set of nodes sharing `node`'s clone, excluding `node` itself.
    pub fn cluster_nodes(&self, node: NodeId) -> BTreeSet<NodeId> {
        match self.node_cluster.get(&node) {
            Some(idx) => self.clusters[*idx]
                .iter()
                .copied()
                .filter(|&n| n != node)
                .collect(),
            None => BTreeSet::new(),
        }
    }

    pub fn are_cluster_mates(&self, a: NodeId, b: NodeId) -> bool {
        match (self.node_cluster.get(&a), self.node_cluster.get(&b)) {
            (Some(ia), Some(ib)) => ia == ib,
            _ => false,
        }
    }

    /// Unique non-adjacent cluster-mate pairs, one entry per cluster member
    /// combination, canonically ordered `(lesser, greater)` by id. Excludes
    /// pairs already connected by a direct edge in either direction, since
    /// those are order relations rather than `-?-` atoms.
    pub fn cluster_pairs(&self) -> Vec<(NodeId, NodeId)> {
        let mut pairs = Vec::new();
        for cluster in &self.clusters {
            let mut members: Vec<NodeId> = cluster.iter().copied().collect();
            members.sort_unstable();
            for i in 0..members.len() {
                for &b in &members[i + 1..] {
                    let a = members[i];
                    if !self.has_edge(a, b) && !self.has_edge(b, a) {
                        pairs.push((a, b));
                    }
                }
            }
        }
        pairs
    }

    /// Canonical, sort-normalised form used for duplicate suppression: the
    /// sorted edge list and sorted node list, independent of insertion order.
    pub fn canonical_key(&self) -> (Vec<(NodeId, NodeId)>, Vec<NodeId>) {
        let mut edges: Vec<_> = self.edges.iter().copied().collect();
        edges.sort_unstable();
        let nodes: Vec<_> = self.nodes.iter().copied().collect();
        (edges, nodes)
    }
}

/// Mapping *process_id → ordered sequence of DAGs*, in the order they were
/// ingested. Duplicate suppression (per process, by [`Dag::canonical_key`])
/// has already happened by the time a `ProcessMap` is constructed.
#[derive(Debug, Clone, Default)]
pub struct ProcessMap {
    processes: Vec<String>,
    dags: HashMap<String, Vec<Dag>>,
}

impl ProcessMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `dag` to `process_id`'s list, suppressing it if an
    /// equal-under-[`Dag::canonical_key`] DAG is already present for that
    /// process. Returns `true` if the DAG was kept.
    pub fn insert(&mut self, process_id: &str, dag: Dag) -> bool {
        let entry = self.dags.entry(process_id.to_string()).or_insert_with(|| {
            self.processes.push(process_id.to_string());
            Vec::new()
        });
        let key = dag.canonical_key();
        if entry.iter().any(|existing| existing.canonical_key() == key) {
            return false;
        }
        entry.push(dag);
        true
    }

    /// Process ids in first-seen order.
    pub fn process_ids(&self) -> impl Iterator<Item = &str> {
        self.processes.iter().map(String::as_str)
    }

    pub fn dags_for(&self, process_id: &str) -> &[Dag] {
        self.dags.get(process_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    /// All DAGs across all processes, in process-then-insertion order.
    pub fn all_dags(&self) -> impl Iterator<Item = &Dag> {
        self.processes.iter().flat_map(move |p| self.dags_for(p).iter())
    }

    pub fn dag_named(&self, name: &str) -> Option<&Dag> {
        self.all_dags().find(|d| d.name == name)
    }

    /// Counts of distinct DAGs retained per process, in process order, for
    /// the `number_of_distinct_dags_per_sample.csv` side output.
    pub fn distinct_counts(&self) -> Vec<(&str, usize)> {
        self.processes
            .iter()
            .map(|p| (p.as_str(), self.dags_for(p).len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interner_round_trips_labels() {
        let mut interner = NodeInterner::new();
        let a = interner.intern("A");
        let b = interner.intern("B");
        let a2 = interner.intern("A");
        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert_eq!(interner.label(a), "A");
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn cluster_union_is_transitive() {
        let mut dag = Dag::new("p-0");
        let mut interner = NodeInterner::new();
        let a = interner.intern("A");
        let b = interner.intern("B");
        let c = interner.intern("C");
        dag.add_cluster_pair(a, b);
        dag.add_cluster_pair(b, c);
        assert!(dag.are_cluster_mates(a, c));
        assert_eq!(dag.cluster_nodes(a), [b, c].into_iter().collect());
    }

    #[test]
    fn process_map_suppresses_duplicate_dags() {
        let mut interner = NodeInterner::new();
        let a = interner.intern("A");
        let root = interner.intern(ROOT_LABEL);

        let mut d1 = Dag::new("p-0");
        d1.add_edge(root, a);
        let mut d2 = Dag::new("p-1");
        d2.add_edge(root, a);

        let mut map = ProcessMap::new();
        assert!(map.insert("p", d1));
        assert!(!map.insert("p", d2));
        assert_eq!(map.dags_for("p").len(), 1);
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pair Enumerator: produces every cross-process DAG pair in a
//! deterministic order, ready for the pairwise conflict analyser's
//! parallel fan-out.

use crate::model::{Dag, ProcessMap};

/// A single ordered pair of DAGs drawn from two distinct processes, in the
/// order `(p1, p2)` with `p1 < p2` by iteration order of the process map.
pub struct DagPair<'a> {
    pub a: &'a Dag,
    pub b: &'a Dag,
}

/// Produces all `(g1, g2)` pairs over every `(p1, p2)` with `p1` preceding
/// `p2` in `processes`' iteration order, cross-producted over
/// `D[p1] x D[p2]`. Deterministic given a deterministic [`ProcessMap`].
pub fn enumerate_pairs(processes: &ProcessMap) -> Vec<DagPair<'_>> {
    let process_ids: Vec<&str> = processes.process_ids().collect();
    let mut pairs = Vec::new();
    for (i, p1) in process_ids.iter().enumerate() {
        for p2 in &process_ids[i + 1..] {
            for a in processes.dags_for(p1) {
                for b in processes.dags_for(p2) {
                    pairs.push(DagPair { a, b });
                }
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dag, NodeInterner};

    #[test]
    fn enumerates_cross_process_pairs_only() {
        let mut interner = NodeInterner::new();
        let a = interner.intern("A");

        let mut map = ProcessMap::new();
        let mut d1 = Dag::new("p1-0");
        d1.add_node(a);
        map.insert("p1", d1);

        let mut d2 = Dag::new("p2-0");
        d2.add_node(a);
        map.insert("p2", d2);

        let mut d3 = Dag::new("p2-1");
        d3.add_node(a);
        map.insert("p2", d3);

        let pairs = enumerate_pairs(&map);
        // p1 has 1 dag, p2 has 2: only p1 x p2 cross-product, no p2 x p2 self-pairs.
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| p.a.name == "p1-0"));
    }
}

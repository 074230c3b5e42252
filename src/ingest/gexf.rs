// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Optional GEXF input: `<node>`/`<edge>`/`<attvalue>` elements are read
//! as-is, `cluster_nodes` parsed from its comma-separated attribute value,
//! and the result is closed identically to text input (root attached,
//! transitively closed).
//!
//! GEXF has no precedent crate in this codebase's dependency stack or its
//! surrounding ecosystem samples; the subset read here is narrow enough
//! (three element kinds, two attributes each) to walk directly against
//! `roxmltree`'s read-only DOM rather than introduce a GEXF-specific
//! dependency.

use crate::errors::{ParseError, PipelineError};
use crate::model::{Dag, NodeInterner, ROOT_LABEL};
use std::collections::HashMap;
use std::path::Path;

pub(super) struct GexfGraph {
    nodes: Vec<String>,
    edges: Vec<(String, String)>,
    cluster_nodes: HashMap<String, Vec<String>>,
}

pub(super) fn parse_gexf(contents: &str, path: &Path) -> Result<GexfGraph, PipelineError> {
    let doc = roxmltree::Document::parse(contents).map_err(|e| {
        PipelineError::Parse(ParseError::MalformedAtom {
            path: path.to_path_buf(),
            line: 0,
            token: format!("gexf: {e}"),
        })
    })?;

    let cluster_attr_id = doc
        .descendants()
        .filter(|n| n.has_tag_name("attribute"))
        .find(|n| n.attribute("title") == Some("cluster_nodes"))
        .and_then(|n| n.attribute("id"))
        .map(str::to_string);

    let mut nodes = Vec::new();
    let mut cluster_nodes: HashMap<String, Vec<String>> = HashMap::new();

    for node in doc.descendants().filter(|n| n.has_tag_name("node")) {
        let Some(id) = node.attribute("id") else { continue };
        nodes.push(id.to_string());

        if let Some(attr_id) = &cluster_attr_id {
            for attvalue in node.descendants().filter(|n| n.has_tag_name("attvalue")) {
                if attvalue.attribute("for") == Some(attr_id.as_str()) {
                    if let Some(value) = attvalue.attribute("value") {
                        let members = value
                            .split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(str::to_string)
                            .collect();
                        cluster_nodes.insert(id.to_string(), members);
                    }
                }
            }
        }
    }

    let edges = doc
        .descendants()
        .filter(|n| n.has_tag_name("edge"))
        .filter_map(|edge| {
            let source = edge.attribute("source")?;
            let target = edge.attribute("target")?;
            Some((source.to_string(), target.to_string()))
        })
        .collect();

    Ok(GexfGraph { nodes, edges, cluster_nodes })
}

pub(super) fn to_dag(graph: GexfGraph, name: String, interner: &mut NodeInterner) -> Dag {
    let mut dag = Dag::new(name);
    for n in &graph.nodes {
        let id = interner.intern(n);
        dag.add_node(id);
    }
    for (a, b) in &graph.edges {
        let ia = interner.intern(a);
        let ib = interner.intern(b);
        dag.add_edge(ia, ib);
    }
    for (n, members) in &graph.cluster_nodes {
        let ia = interner.intern(n);
        for m in members {
            let ib = interner.intern(m);
            dag.add_cluster_pair(ia, ib);
        }
    }

    let root = interner.intern(ROOT_LABEL);
    dag.add_node(root);
    let others: Vec<_> = dag.nodes().filter(|&x| x != root).collect();
    for o in others {
        dag.add_edge(root, o);
    }
    dag
}

/// Reads a single GEXF file into an (uncosed) [`Dag`] named after the
/// file's stem. Callers are expected to transitively close the result the
/// same way text-sourced DAGs are closed (see [`crate::ingest::ingest_path`]).
pub fn read_gexf(path: &Path, interner: &mut NodeInterner) -> Result<Dag, PipelineError> {
    let contents = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = parse_gexf(&contents, path)?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("gexf")
        .to_string();
    Ok(to_dag(graph, name, interner))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
    <gexf>
      <graph>
        <attributes class="node">
          <attribute id="0" title="cluster_nodes" type="string"/>
        </attributes>
        <nodes>
          <node id="A" label="A">
            <attvalues>
              <attvalue for="0" value="B"/>
            </attvalues>
          </node>
          <node id="B" label="B">
            <attvalues>
              <attvalue for="0" value="A"/>
            </attvalues>
          </node>
          <node id="C" label="C"/>
        </nodes>
        <edges>
          <edge source="A" target="C"/>
        </edges>
      </graph>
    </gexf>
    "#;

    #[test]
    fn parses_nodes_edges_and_cluster_attribute() {
        let graph = parse_gexf(SAMPLE, Path::new("sample.gexf")).unwrap();
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.edges, vec![("A".to_string(), "C".to_string())]);
        assert_eq!(graph.cluster_nodes.get("A").unwrap(), &vec!["B".to_string()]);
    }

    #[test]
    fn to_dag_attaches_root_and_cluster_pair() {
        let mut interner = NodeInterner::new();
        let graph = parse_gexf(SAMPLE, Path::new("sample.gexf")).unwrap();
        let dag = to_dag(graph, "sample".to_string(), &mut interner);

        let root = interner.lookup(ROOT_LABEL).unwrap();
        let a = interner.lookup("A").unwrap();
        let b = interner.lookup("B").unwrap();
        assert!(dag.has_edge(root, a));
        assert!(dag.are_cluster_mates(a, b));
    }
}

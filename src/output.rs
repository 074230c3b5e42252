// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Output sinks: the trajectories CSV, the converted-format file, one GEXF
//! file per trajectory, and the distinct-DAG-count side output.
//!
//! None of these formats warrants a dependency: the CSV rows never need
//! quoting (node ids and DAG names never contain commas), and the GEXF
//! subset written here is exactly the subset [`crate::ingest::gexf`] reads
//! back, so a hand-rolled writer mirrors the hand-rolled reader rather than
//! pulling in a full GEXF crate for three element kinds.

use crate::errors::PipelineError;
use crate::model::{Dag, NodeId, NodeInterner, ProcessMap};
use crate::observability::messages::output::OutputsWritten;
use crate::observability::messages::StructuredLog;
use crate::support::TrajectorySupport;
use std::fmt::Write as _;
use std::path::Path;

fn io_err(path: &Path, source: std::io::Error) -> PipelineError {
    PipelineError::Io { path: path.to_path_buf(), source }
}

fn write_file(path: &Path, contents: &str) -> Result<(), PipelineError> {
    std::fs::write(path, contents).map_err(|source| io_err(path, source))
}

/// Formats a trajectory's edges as a space-separated edge-atom list:
/// `A->-B` for each directed edge, `A-?-B` for each non-adjacent
/// cluster-mate pair, both sorted by rendered label for determinism.
fn format_edges(trajectory: &Dag, interner: &NodeInterner) -> String {
    let mut atoms: Vec<String> = trajectory
        .edges()
        .map(|(u, v)| format!("{}->-{}", interner.label(u), interner.label(v)))
        .collect();
    atoms.extend(
        trajectory
            .cluster_pairs()
            .into_iter()
            .map(|(u, v)| format!("{}-?-{}", interner.label(u), interner.label(v))),
    );
    atoms.sort();
    atoms.join(" ")
}

/// Trajectories with more than a bare root count as output rows; a
/// single-node trajectory (root only) carries no useful common structure.
fn is_reportable(support: &TrajectorySupport) -> bool {
    support.trajectory.node_count() > 1
}

/// Writes `trajectories.csv`: header `File Index,Support,Supporting
/// Graphs,Edges`, one row per trajectory with more than one node.
pub fn write_trajectories_csv(path: &Path, supports: &[TrajectorySupport], interner: &NodeInterner) -> Result<(), PipelineError> {
    let mut out = String::from("File Index,Support,Supporting Graphs,Edges\n");
    for support in supports.iter().filter(|s| is_reportable(s)) {
        let _ = writeln!(
            out,
            "{},{},{},{}",
            support.id,
            support.support_count(),
            support.supporting.join(" "),
            format_edges(&support.trajectory, interner),
        );
    }
    write_file(path, &out)
}

/// Writes the converted-format file: two lines per trajectory, `<edges>
/// (<support>)` followed by the supporting-graph token sequence with any
/// `L` character stripped (a no-op here; see the format's own doc note).
pub fn write_converted_format(path: &Path, supports: &[TrajectorySupport], interner: &NodeInterner) -> Result<(), PipelineError> {
    let mut out = String::new();
    for support in supports.iter().filter(|s| is_reportable(s)) {
        let edges = format_edges(&support.trajectory, interner);
        let _ = writeln!(out, "{} ({})", edges, support.support_count());
        let names = support.supporting.join(" ").replace('L', "");
        let _ = writeln!(out, "{names}");
    }
    write_file(path, &out)
}

fn gexf_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

/// Renders one trajectory as the minimal GEXF subset the reader parses
/// back: `<node>`/`<edge>` elements plus a `cluster_nodes` attvalue for any
/// node with non-adjacent cluster mates.
fn render_gexf(trajectory: &Dag, interner: &NodeInterner) -> String {
    let mut out = String::new();
    out.push_str("<gexf>\n  <graph>\n");
    out.push_str("    <attributes class=\"node\">\n");
    out.push_str("      <attribute id=\"0\" title=\"cluster_nodes\" type=\"string\"/>\n");
    out.push_str("    </attributes>\n");

    let mut cluster_members: std::collections::BTreeMap<NodeId, Vec<NodeId>> = std::collections::BTreeMap::new();
    for (a, b) in trajectory.cluster_pairs() {
        cluster_members.entry(a).or_default().push(b);
        cluster_members.entry(b).or_default().push(a);
    }

    out.push_str("    <nodes>\n");
    for n in trajectory.nodes() {
        let label = gexf_escape(interner.label(n));
        match cluster_members.get(&n) {
            Some(mates) => {
                let value = mates.iter().map(|m| gexf_escape(interner.label(*m))).collect::<Vec<_>>().join(",");
                let _ = writeln!(
                    out,
                    "      <node id=\"{label}\" label=\"{label}\">\n        <attvalues>\n          <attvalue for=\"0\" value=\"{value}\"/>\n        </attvalues>\n      </node>"
                );
            }
            None => {
                let _ = writeln!(out, "      <node id=\"{label}\" label=\"{label}\"/>");
            }
        }
    }
    out.push_str("    </nodes>\n");

    out.push_str("    <edges>\n");
    let mut edges: Vec<(NodeId, NodeId)> = trajectory.edges().collect();
    edges.sort_unstable();
    for (u, v) in edges {
        let _ = writeln!(
            out,
            "      <edge source=\"{}\" target=\"{}\"/>",
            gexf_escape(interner.label(u)),
            gexf_escape(interner.label(v))
        );
    }
    out.push_str("    </edges>\n");

    out.push_str("  </graph>\n</gexf>\n");
    out
}

/// Writes one GEXF file per reportable trajectory into `dir`, named
/// `trajectory_<file_index>.gexf`, plus `traj_graphs_names.csv` mapping
/// each trajectory index to the DAGs that support it.
pub fn write_trajectory_gexf(dir: &Path, supports: &[TrajectorySupport], interner: &NodeInterner) -> Result<(), PipelineError> {
    std::fs::create_dir_all(dir).map_err(|source| io_err(dir, source))?;

    let mut names_csv = String::from("File Index,Graph Names\n");
    for support in supports.iter().filter(|s| is_reportable(s)) {
        let file_path = dir.join(format!("trajectory_{}.gexf", support.id));
        write_file(&file_path, &render_gexf(&support.trajectory, interner))?;
        let _ = writeln!(names_csv, "{},{}", support.id, support.supporting.join(" "));
    }
    write_file(&dir.join("traj_graphs_names.csv"), &names_csv)
}

/// Writes `resolution.txt`: one line per "introduces order" diagnostic
/// collected across every reconstructed trajectory. Only created when at
/// least one such event occurred; an all-consistent run leaves no file
/// behind, matching the origin system's own append-on-first-event
/// behavior.
pub fn write_resolution_log(path: &Path, resolution_log: &[String]) -> Result<(), PipelineError> {
    if resolution_log.is_empty() {
        return Ok(());
    }
    let mut out = resolution_log.join("\n");
    out.push('\n');
    write_file(path, &out)
}

/// Writes `number_of_distinct_dags_per_sample.csv`: one row per process,
/// `process_id,distinct_dag_count`.
pub fn write_distinct_dag_counts(path: &Path, processes: &ProcessMap) -> Result<(), PipelineError> {
    let mut out = String::from("process_id,distinct_dag_count\n");
    for (process_id, count) in processes.distinct_counts() {
        let _ = writeln!(out, "{process_id},{count}");
    }
    write_file(path, &out)
}

/// Writes every sink under `output_dir`: `trajectories.csv`, the converted
/// format file, `trajectories_gexf/`, `resolution.txt` (when non-empty),
/// and the distinct-DAG-count side output.
pub fn write_all(
    output_dir: &Path,
    supports: &[TrajectorySupport],
    processes: &ProcessMap,
    interner: &NodeInterner,
    resolution_log: &[String],
) -> Result<(), PipelineError> {
    std::fs::create_dir_all(output_dir).map_err(|source| io_err(output_dir, source))?;

    write_trajectories_csv(&output_dir.join("trajectories.csv"), supports, interner)?;
    write_converted_format(&output_dir.join("trajectories_converted.txt"), supports, interner)?;
    write_trajectory_gexf(&output_dir.join("trajectories_gexf"), supports, interner)?;
    write_resolution_log(&output_dir.join("resolution.txt"), resolution_log)?;
    write_distinct_dag_counts(&output_dir.join("number_of_distinct_dags_per_sample.csv"), processes)?;

    OutputsWritten {
        output_path: output_dir.display().to_string(),
        trajectory_count: supports.iter().filter(|s| is_reportable(s)).count(),
    }
    .log();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeInterner;

    fn sample() -> (Vec<TrajectorySupport>, NodeInterner) {
        let mut interner = NodeInterner::new();
        let root = interner.intern("0");
        let a = interner.intern("A");
        let b = interner.intern("B");
        let c = interner.intern("C");

        let mut trajectory = Dag::new("p1-0:p2-0");
        trajectory.add_edge(root, a);
        trajectory.add_edge(root, b);
        trajectory.add_edge(a, b);
        trajectory.add_node(c);
        trajectory.add_cluster_pair(b, c);

        let support = TrajectorySupport {
            id: 1,
            trajectory,
            supporting: vec!["p1-0".to_string(), "p2-0".to_string()],
        };
        (vec![support], interner)
    }

    #[test]
    fn trajectories_csv_has_header_and_one_row_per_reportable_trajectory() {
        let (supports, interner) = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trajectories.csv");
        write_trajectories_csv(&path, &supports, &interner).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next().unwrap(), "File Index,Support,Supporting Graphs,Edges");
        let row = lines.next().unwrap();
        assert!(row.starts_with("1,0,p1-0 p2-0,"));
        assert!(row.contains("A->-B"));
        assert!(row.contains("B-?-C"));
    }

    #[test]
    fn single_node_trajectory_is_not_reportable() {
        let mut interner = NodeInterner::new();
        let root = interner.intern("0");
        let mut trajectory = Dag::new("p1-0");
        trajectory.add_node(root);
        let support = TrajectorySupport { id: 1, trajectory, supporting: vec![] };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trajectories.csv");
        write_trajectories_csv(&path, &[support], &interner).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }

    #[test]
    fn gexf_output_round_trips_through_the_reader() {
        let (supports, interner) = sample();
        let dir = tempfile::tempdir().unwrap();
        write_trajectory_gexf(dir.path(), &supports, &interner).unwrap();

        let gexf_path = dir.path().join("trajectory_1.gexf");
        assert!(gexf_path.exists());

        let mut read_interner = NodeInterner::new();
        let dag = crate::ingest::gexf::read_gexf(&gexf_path, &mut read_interner).unwrap();
        let a = read_interner.lookup("A").unwrap();
        let b = read_interner.lookup("B").unwrap();
        let c = read_interner.lookup("C").unwrap();
        assert!(dag.has_edge(a, b));
        assert!(dag.are_cluster_mates(b, c));

        let names = std::fs::read_to_string(dir.path().join("traj_graphs_names.csv")).unwrap();
        assert!(names.contains("1,p1-0 p2-0"));
    }

    #[test]
    fn resolution_log_is_not_written_when_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resolution.txt");
        write_resolution_log(&path, &[]).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn resolution_log_is_appended_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resolution.txt");
        let events = vec!["trajectory p1-0:p2-0 introduces order while folding in p2-0: 1 differing edge(s)".to_string()];
        write_resolution_log(&path, &events).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.contains("introduces order"));
    }

    #[test]
    fn distinct_dag_counts_has_one_row_per_process() {
        let mut processes = ProcessMap::new();
        processes.insert("p1", Dag::new("p1-0"));
        processes.insert("p1", Dag::new("p1-1"));
        processes.insert("p2", Dag::new("p2-0"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counts.csv");
        write_distinct_dag_counts(&path, &processes).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "process_id,distinct_dag_count\np1,2\np2,1\n");
    }
}

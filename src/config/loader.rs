// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Run configuration: every tunable named in the external interfaces, with
//! defaults matching the original tool's where the source names one
//! explicitly, loaded from an optional YAML or JSON file and overridable by
//! CLI flags.

use serde::Deserialize;
use std::path::Path;

fn default_cores() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn default_solution_pool_size() -> usize {
    5000
}

fn default_k() -> usize {
    2
}

fn default_true() -> bool {
    true
}

/// All tunables the pipeline needs for a single run.
///
/// Every field has a default, so a partial config document only overrides
/// what it names:
///
/// ```
/// use max_common_trajectory::config::RunConfig;
///
/// let cfg: RunConfig = serde_yaml::from_str("dags: input/\n").unwrap();
/// assert_eq!(cfg.dags, "input/");
/// assert_eq!(cfg.k, 2);
/// assert!(cfg.parallelize);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Path to a single input file or a directory of per-process files.
    pub dags: String,

    /// Minimum number of distinct processes a selection must draw from.
    #[serde(default = "default_k")]
    pub k: usize,

    /// Directory into which trajectories.csv, the converted format, and
    /// trajectories_gexf/ are written.
    #[serde(default = "default_output_path")]
    pub output_path: String,

    /// Worker-pool size for the Ingestor and Pairwise Conflict Analyser.
    #[serde(default = "default_cores")]
    pub cores: usize,

    /// Threshold-policy `tau`; `None` disables the policy.
    #[serde(default)]
    pub resolution_threshold: Option<usize>,

    /// Whether the frequency policy runs before the threshold policy.
    #[serde(default)]
    pub resolution_frequency: bool,

    /// Upper bound on the number of distinct optimal solutions enumerated.
    #[serde(default = "default_solution_pool_size")]
    pub solution_pool_size: usize,

    /// Whether ingestion and conflict analysis use the worker pool at all.
    #[serde(default = "default_true")]
    pub parallelize: bool,

    /// Emit verbose diagnostics to stderr.
    #[serde(default)]
    pub verbose: bool,
}

fn default_output_path() -> String {
    "output".to_string()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dags: String::new(),
            k: default_k(),
            output_path: default_output_path(),
            cores: default_cores(),
            resolution_threshold: None,
            resolution_frequency: false,
            solution_pool_size: default_solution_pool_size(),
            parallelize: true,
            verbose: false,
        }
    }
}

/// Loads a [`RunConfig`] from a YAML or JSON file, chosen by extension
/// (`.json` parses as JSON; anything else as YAML, matching the rest of
/// this crate's config surface).
pub fn load_config<P: AsRef<Path>>(path: P) -> anyhow::Result<RunConfig> {
    use anyhow::Context;
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        serde_json::from_str(&contents)
            .with_context(|| format!("parsing {} as JSON", path.display()))
    } else {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing {} as YAML", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_takes_documented_defaults() {
        let cfg: RunConfig = serde_yaml::from_str("dags: some/path\n").unwrap();
        assert_eq!(cfg.dags, "some/path");
        assert_eq!(cfg.k, 2);
        assert_eq!(cfg.solution_pool_size, 5000);
        assert!(cfg.parallelize);
        assert!(!cfg.verbose);
        assert!(cfg.resolution_threshold.is_none());
    }

    #[test]
    fn load_config_reads_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.yaml");
        std::fs::write(&path, "dags: input\nk: 3\nverbose: true\n").unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.dags, "input");
        assert_eq!(cfg.k, 3);
        assert!(cfg.verbose);
    }

    #[test]
    fn load_config_reads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, r#"{"dags": "input", "k": 5}"#).unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.dags, "input");
        assert_eq!(cfg.k, 5);
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = load_config("/nonexistent/path/run.yaml");
        assert!(result.is_err());
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! CLI shim: parses a small, fixed set of flags, assembles a [`RunConfig`],
//! and drives the pipeline end to end. Manual `std::env::args()` parsing
//! matches this codebase's own entry point rather than reaching for an
//! argument-parsing crate for what is explicitly an out-of-scope shim.

use max_common_trajectory::config::RunConfig;
use max_common_trajectory::context::Context;
use max_common_trajectory::model::{NodeInterner, ROOT_LABEL};
use max_common_trajectory::solver::{solve_with_clamp, BruteForceSolver};
use max_common_trajectory::{conflict, dedup, ingest, output, pairs, reconstruct, resolution, support, union_graph};
use std::path::PathBuf;
use std::process::ExitCode;

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} --dags <path> [--k N] [--output-path DIR] [--cores N] \
         [--resolution_threshold N] [--resolution_frequency] [--solution-pool-size N] \
         [--parallelize BOOL] [--verbose] [--config FILE]"
    )
}

/// Overrides loaded (or default) config fields from CLI flags. Flags named
/// in the external interfaces take precedence over anything in a config
/// file, and the config file itself is optional.
fn parse_args(args: &[String], mut config: RunConfig) -> Result<RunConfig, String> {
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let mut take_value = || {
            i += 1;
            args.get(i).cloned().ok_or_else(|| format!("{flag} requires a value"))
        };
        match flag {
            "--dags" => config.dags = take_value()?,
            "--k" => config.k = take_value()?.parse().map_err(|_| "--k must be an integer".to_string())?,
            "--output-path" => config.output_path = take_value()?,
            "--cores" => config.cores = take_value()?.parse().map_err(|_| "--cores must be an integer".to_string())?,
            "--resolution_threshold" => {
                config.resolution_threshold = Some(take_value()?.parse().map_err(|_| "--resolution_threshold must be an integer".to_string())?)
            }
            "--resolution_frequency" => config.resolution_frequency = true,
            "--solution-pool-size" => {
                config.solution_pool_size = take_value()?.parse().map_err(|_| "--solution-pool-size must be an integer".to_string())?
            }
            "--parallelize" => config.parallelize = take_value()?.parse().map_err(|_| "--parallelize must be true/false".to_string())?,
            "--verbose" => config.verbose = true,
            "--config" => {
                take_value()?;
            }
            other => return Err(format!("unrecognized flag {other}")),
        }
        i += 1;
    }
    Ok(config)
}

fn find_config_flag(args: &[String]) -> Option<PathBuf> {
    args.iter().position(|a| a == "--config").and_then(|idx| args.get(idx + 1)).map(PathBuf::from)
}

fn run(args: Vec<String>) -> Result<(), String> {
    let base_config = match find_config_flag(&args) {
        Some(path) => max_common_trajectory::config::load_config(&path).map_err(|e| e.to_string())?,
        None => RunConfig::default(),
    };

    let config = parse_args(&args, base_config)?;
    if config.dags.is_empty() {
        return Err("--dags is required".to_string());
    }

    let mut ctx = Context::from_config(&config);
    if !config.parallelize {
        ctx.cores = 1;
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut interner = NodeInterner::new();
    let dags_path = PathBuf::from(&config.dags);
    let processes = ingest::ingest_path(&dags_path, &mut interner, &ctx).map_err(|e| e.to_string())?;

    let root = interner.root_id().unwrap_or_else(|| interner.intern(ROOT_LABEL));

    let pairs = pairs::enumerate_pairs(&processes);
    let analyses = conflict::analyze_pairs(&pairs, root, &ctx).map_err(|e| e.to_string())?;
    let (mut union, mut potential) = union_graph::assemble(&analyses);

    if config.resolution_frequency {
        resolution::frequency_policy(&mut potential, &mut union, &interner, &ctx);
    }
    if let Some(tau) = config.resolution_threshold {
        resolution::threshold_policy(&mut potential, &mut union, tau, &interner, &ctx);
    }

    let pool = solve_with_clamp(&BruteForceSolver, &union, &processes, config.k, config.solution_pool_size, &ctx)
        .map_err(|e| e.to_string())?;

    let mut trajectories = Vec::with_capacity(pool.solutions.len());
    let mut resolution_log = Vec::new();
    for solution in &pool.solutions {
        let result = reconstruct::reconstruct(solution, &processes, root, &ctx).map_err(|e| e.to_string())?;
        resolution_log.extend(result.resolution_log);
        trajectories.push(result.trajectory);
    }
    let trajectories = dedup::deduplicate(trajectories, &ctx);
    let supports = support::compute_support(&trajectories, &processes);

    output::write_all(&PathBuf::from(&config.output_path), &supports, &processes, &interner, &resolution_log)
        .map_err(|e| e.to_string())?;

    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| "max-common-trajectory".to_string());

    if args.len() < 2 {
        eprintln!("{}", usage(&program));
        return ExitCode::FAILURE;
    }

    match run(args[1..].to_vec()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Small value threaded through every pipeline stage in place of a
//! module-level mutable `verbose` flag.

use crate::config::RunConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation signal, checked between chunks of parallel work.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-run settings passed by reference into every stage entry point.
#[derive(Debug, Clone)]
pub struct Context {
    pub verbose: bool,
    pub cores: usize,
    pub cancel: CancellationFlag,
}

impl Context {
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            verbose: config.verbose,
            cores: config.cores.max(1),
            cancel: CancellationFlag::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_flag_is_shared_across_clones() {
        let flag = CancellationFlag::new();
        let clone = flag.clone();
        assert!(!flag.is_cancelled());
        clone.cancel();
        assert!(flag.is_cancelled());
    }

    #[test]
    fn cores_is_floored_at_one() {
        let mut config = RunConfig::default();
        config.cores = 0;
        let ctx = Context::from_config(&config);
        assert_eq!(ctx.cores, 1);
    }
}

//! Evaluation limits.

use tracing::warn;

/// Environment variable overriding [`EvalConfig::max_depth`]
pub const MAX_DEPTH_VAR: &str = "DIYLISP_MAX_DEPTH";

/// Default nesting limit: deep enough for ordinary recursive programs,
/// small enough that a runaway recursion is reported quickly.
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    /// Maximum number of nested `evaluate` calls before the evaluation
    /// fails with `StackExhausted`
    pub max_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EvalConfig {
    pub fn with_max_depth(max_depth: usize) -> Self {
        EvalConfig { max_depth }
    }

    /// Defaults, overridden by `DIYLISP_MAX_DEPTH` when it holds a positive
    /// integer
    pub fn from_env() -> Self {
        match std::env::var(MAX_DEPTH_VAR) {
            Ok(raw) => Self::default().with_depth_str(&raw),
            Err(_) => Self::default(),
        }
    }

    /// Apply a textual depth override, keeping the current value if `raw`
    /// is not a positive integer
    pub fn with_depth_str(self, raw: &str) -> Self {
        match raw.trim().parse::<usize>() {
            Ok(depth) if depth > 0 => EvalConfig { max_depth: depth },
            _ => {
                warn!(value = raw, default = self.max_depth, "ignoring invalid max depth");
                self
            }
        }
    }
}

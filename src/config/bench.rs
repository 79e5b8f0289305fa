//! Benchmark harness configuration.

use super::parse::{env_bool, env_parse};
use super::ConfigError;

/// Iteration counts for `form_parse bench`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchConfig {
    /// Parses per round (BENCH_ITERATIONS).
    pub iterations: usize,
    /// Rounds to run; 0 runs until interrupted (BENCH_ROUNDS).
    pub rounds: usize,
    /// Submit parses through the worker pool (BENCH_CONCURRENT).
    pub concurrent: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: 100_000,
            rounds: 10,
            concurrent: false,
        }
    }
}

impl BenchConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let iterations = env_parse("BENCH_ITERATIONS", defaults.iterations)?;
        if iterations == 0 {
            return Err(ConfigError::Invalid {
                key: "BENCH_ITERATIONS".into(),
                message: "must be at least 1".into(),
            });
        }

        Ok(Self {
            iterations,
            rounds: env_parse("BENCH_ROUNDS", defaults.rounds)?,
            concurrent: env_bool("BENCH_CONCURRENT", defaults.concurrent),
        })
    }

    /// Whether the bench stops on its own.
    pub fn is_bounded(&self) -> bool {
        self.rounds > 0
    }
}

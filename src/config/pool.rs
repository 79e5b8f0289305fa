//! Worker pool configuration.

use std::num::NonZeroUsize;
use std::time::Duration;

use super::parse::{env_duration, env_parse};
use super::ConfigError;
use crate::pool::DEFAULT_QUEUE_MULTIPLIER;

/// Worker pool configuration loaded from environment.
///
/// Counts are resolved at construction, so accessors never see zero.
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Resolved worker count.
    worker_count: NonZeroUsize,
    /// Resolved queue capacity.
    queue_capacity: NonZeroUsize,
    /// Per-job timeout (None = wait forever).
    pub timeout: Option<Duration>,
}

impl PoolConfig {
    /// Build from raw values; zero workers means CPU count, zero capacity
    /// means `workers * 100`.
    pub fn new(workers: usize, queue_capacity: usize, timeout: Option<Duration>) -> Self {
        let workers = if workers == 0 { num_cpus::get() } else { workers };
        let capacity = if queue_capacity == 0 {
            workers.saturating_mul(DEFAULT_QUEUE_MULTIPLIER)
        } else {
            queue_capacity
        };

        Self {
            worker_count: NonZeroUsize::new(workers).unwrap_or(NonZeroUsize::MIN),
            queue_capacity: NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            timeout,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let workers: usize = env_parse("PARSE_WORKERS", 0)?;
        let capacity: usize = env_parse("QUEUE_CAPACITY", 0)?;
        let timeout = env_duration("PARSE_TIMEOUT", "off")?;

        Ok(Self::new(workers, capacity, timeout))
    }

    #[inline]
    pub fn worker_count(&self) -> usize {
        self.worker_count.get()
    }

    #[inline]
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity.get()
    }
}

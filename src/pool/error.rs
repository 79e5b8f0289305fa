//! Errors from running a parse job on the pool.
//!
//! Parsing itself is total, so every variant describes what happened to the
//! job around the parse: it never got queued, the caller stopped waiting, or
//! the worker running it panicked.

use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Every queue slot was taken when the job arrived.
    Saturated { capacity: usize, pending: usize },
    /// The caller gave up after `limit`; the job may still finish.
    TimedOut { limit: Duration },
    /// The job panicked on `worker` after waiting `queued` for it.
    Panicked {
        worker: usize,
        queued: Duration,
        message: String,
    },
    /// The pool stopped accepting jobs, or dropped one before replying.
    Closed,
}

impl PoolError {
    pub fn is_saturated(&self) -> bool {
        matches!(self, PoolError::Saturated { .. })
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, PoolError::TimedOut { .. })
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, PoolError::Closed)
    }

    /// Saturation and timeouts depend on load; resubmitting may succeed.
    pub fn is_transient(&self) -> bool {
        self.is_saturated() || self.is_timed_out()
    }
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::Saturated { capacity, pending } => {
                write!(f, "parse queue saturated ({}/{} jobs waiting)", pending, capacity)
            }
            PoolError::TimedOut { limit } => {
                write!(f, "parse job gave no result within {}ms", limit.as_millis())
            }
            PoolError::Panicked {
                worker,
                queued,
                message,
            } => write!(
                f,
                "parse job panicked on worker {} (queued {}us): {}",
                worker,
                queued.as_micros(),
                message
            ),
            PoolError::Closed => f.write_str("parse pool is closed"),
        }
    }
}

impl std::error::Error for PoolError {}

pub type PoolResult<T> = Result<T, PoolError>;

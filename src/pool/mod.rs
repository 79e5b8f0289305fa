//! Worker pool for running independent parse jobs in parallel.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      ParsePool                             │
//! ├────────────────────────────────────────────────────────────┤
//! │  ┌─────────┐    ┌─────────┐    ┌─────────┐                 │
//! │  │ Worker1 │    │ Worker2 │    │ Worker3 │  ...            │
//! │  └────┬────┘    └────┬────┘    └────┬────┘                 │
//! │       │              │              │                      │
//! │       └──────┬───────┴──────────────┘                      │
//! │              │ rent / return                               │
//! │      ┌───────▼───────┐       ┌───────────────┐             │
//! │      │  BufferPool   │       │ mpsc channel  │ (bounded)   │
//! │      └───────────────┘       └───────▲───────┘             │
//! │                                      │                     │
//! │                              ┌───────┴───────┐             │
//! │                              │    parse()    │ (async)     │
//! │                              └───────────────┘             │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each job is one `form::parse_in` call on a worker thread. Jobs never share
//! a scratch buffer; they only share the pool the buffers come from.

mod error;
mod thread;

pub use error::{PoolError, PoolResult};
pub use thread::{ThreadPool, DEFAULT_QUEUE_MULTIPLIER};

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;

use crate::buffer::BufferPool;
use crate::config::PoolConfig;
use crate::form::{self, FormMap, ParseOptions};

/// One unit of work: an input body and how to parse it.
#[derive(Debug, Clone)]
pub struct ParseJob {
    pub input: Bytes,
    pub options: ParseOptions,
}

impl ParseJob {
    pub fn new(input: impl Into<Bytes>, options: ParseOptions) -> Self {
        Self {
            input: input.into(),
            options,
        }
    }
}

/// Job counters for a pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JobStats {
    /// Jobs that ran to completion (including failed ones).
    pub completed: u64,
    /// Jobs refused because the queue was full.
    pub rejected: u64,
    /// Jobs whose caller stopped waiting.
    pub timeouts: u64,
    /// Jobs that panicked.
    pub panics: u64,
}

/// Thread pool specialised to form parsing.
pub struct ParsePool {
    inner: ThreadPool<ParseJob, FormMap>,
    buffers: Arc<BufferPool>,
    timeout: Option<Duration>,
}

impl ParsePool {
    /// Create a pool sized from `config`, renting scratch space from `buffers`.
    pub fn new(config: &PoolConfig, buffers: Arc<BufferPool>) -> std::io::Result<Self> {
        let handler_buffers = Arc::clone(&buffers);
        let inner = ThreadPool::with_capacity(
            config.worker_count(),
            config.queue_capacity(),
            "parse",
            move |job: ParseJob| form::parse_in(&job.input, job.options, &handler_buffers),
        )?;

        Ok(Self {
            inner,
            buffers,
            timeout: config.timeout,
        })
    }

    /// Parse one body on a worker.
    pub async fn parse(&self, job: ParseJob) -> PoolResult<FormMap> {
        match self.timeout {
            Some(timeout) => self.inner.execute_with_timeout(job, timeout).await,
            None => self.inner.execute(job).await,
        }
    }

    /// Parse many bodies concurrently; results keep the order of `jobs`.
    pub async fn parse_all<I>(&self, jobs: I) -> Vec<PoolResult<FormMap>>
    where
        I: IntoIterator<Item = ParseJob>,
    {
        futures_util::future::join_all(jobs.into_iter().map(|job| self.parse(job))).await
    }

    /// Buffer pool shared by the workers.
    pub fn buffers(&self) -> &BufferPool {
        &self.buffers
    }

    pub fn worker_count(&self) -> usize {
        self.inner.worker_count()
    }

    pub fn queue_capacity(&self) -> usize {
        self.inner.queue_capacity()
    }

    pub fn stats(&self) -> JobStats {
        self.inner.stats()
    }

    /// Stop accepting jobs and wait for the workers to exit.
    pub fn shutdown(&self) {
        self.inner.shutdown();
        self.inner.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(workers: usize, capacity: usize) -> PoolConfig {
        PoolConfig::new(workers, capacity, None)
    }

    #[tokio::test]
    async fn test_parse_job() {
        let pool = ParsePool::new(&config(2, 16), Arc::new(BufferPool::new())).unwrap();

        let map = pool
            .parse(ParseJob::new(&b"a=%41&b=x+y"[..], ParseOptions::query_string()))
            .await
            .unwrap();

        assert_eq!(map.get("a"), Some("A"));
        assert_eq!(map.get("b"), Some("x y"));
    }

    #[tokio::test]
    async fn test_parse_all_keeps_order() {
        let pool = ParsePool::new(&config(4, 64), Arc::new(BufferPool::new())).unwrap();

        let jobs = (0..20).map(|i| {
            ParseJob::new(format!("n={}&v=%3{}", i, i % 10), ParseOptions::default())
        });
        let results = pool.parse_all(jobs).await;

        for (i, result) in results.into_iter().enumerate() {
            let map = result.unwrap();
            assert_eq!(map.get("n"), Some(i.to_string().as_str()));
            assert_eq!(map.get("v"), Some((i % 10).to_string().as_str()));
        }

        assert_eq!(pool.stats().completed, 20);
        assert_eq!(pool.buffers().stats().outstanding(), 0);
    }

    #[tokio::test]
    async fn test_shutdown() {
        let pool = ParsePool::new(&config(1, 4), Arc::new(BufferPool::new())).unwrap();
        pool.shutdown();

        let err = pool
            .parse(ParseJob::new(&b"a=1"[..], ParseOptions::default()))
            .await
            .unwrap_err();
        assert!(err.is_closed());
    }
}

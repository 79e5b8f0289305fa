//! Repeated-parse benchmark harness.
//!
//! Each round parses the same body `iterations` times and reports the elapsed
//! time and how many fresh scratch buffers the pool had to allocate. A warm
//! pool should report zero allocations after the first round.

use std::time::{Duration, Instant};

use bytes::Bytes;
use serde::Serialize;
use tracing::Instrument;

use crate::buffer::{BufferPool, PoolStats};
use crate::config::BenchConfig;
use crate::form::{self, ParseOptions};
use crate::pool::{ParseJob, ParsePool, PoolError, PoolResult};

/// Target of the events logged here. The JSON formatter tags them as
/// `"type":"bench"`.
pub const LOG_TARGET: &str = module_path!();

/// Outcome of one benchmark round.
#[derive(Debug, Clone, Serialize)]
pub struct RoundReport {
    /// 1-based round number.
    pub round: usize,
    pub iterations: usize,
    #[serde(serialize_with = "as_millis")]
    pub elapsed: Duration,
    /// Pairs in the parsed map (identical every iteration).
    pub pairs: usize,
    /// Buffer pool activity during the round.
    pub buffers: PoolStats,
}

impl RoundReport {
    pub fn parses_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.iterations as f64 / secs
    }
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64() * 1000.0)
}

/// Parse `body` `iterations` times on the calling thread.
pub fn run_round(
    round: usize,
    body: &[u8],
    options: ParseOptions,
    iterations: usize,
    buffers: &BufferPool,
) -> RoundReport {
    let before = buffers.stats();
    let started = Instant::now();
    let mut pairs = 0;

    for _ in 0..iterations {
        let map = form::parse_in(body, options, buffers);
        pairs = map.len();
    }

    RoundReport {
        round,
        iterations,
        elapsed: started.elapsed(),
        pairs,
        buffers: buffers.stats().since(&before),
    }
}

/// Parse `body` `iterations` times through the worker pool.
///
/// Jobs are submitted in batches no larger than the queue so a round never
/// fails with a full queue.
pub async fn run_round_concurrent(
    round: usize,
    body: &Bytes,
    options: ParseOptions,
    iterations: usize,
    pool: &ParsePool,
) -> PoolResult<RoundReport> {
    let before = pool.buffers().stats();
    let started = Instant::now();
    let batch = pool.queue_capacity().max(1);
    let mut remaining = iterations;
    let mut pairs = 0;

    while remaining > 0 {
        let n = remaining.min(batch);
        let jobs = (0..n).map(|_| ParseJob {
            input: body.clone(),
            options,
        });

        for result in pool.parse_all(jobs).await {
            pairs = result?.len();
        }
        remaining -= n;
    }

    Ok(RoundReport {
        round,
        iterations,
        elapsed: started.elapsed(),
        pairs,
        buffers: pool.buffers().stats().since(&before),
    })
}

/// Run the configured rounds. With `rounds == 0` this only returns on error,
/// so the caller is expected to race it against a shutdown signal.
pub async fn run(
    body: Bytes,
    options: ParseOptions,
    config: &BenchConfig,
    pool: &ParsePool,
) -> PoolResult<Vec<RoundReport>> {
    let run_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("bench", %run_id, bytes = body.len());

    async {
        tracing::info!(
            iterations = config.iterations,
            rounds = config.rounds,
            concurrent = config.concurrent,
            "bench started"
        );

        let mut reports = Vec::new();
        let mut round = 1;

        while !config.is_bounded() || round <= config.rounds {
            let report = if config.concurrent {
                run_round_concurrent(round, &body, options, config.iterations, pool).await?
            } else {
                run_round(round, &body, options, config.iterations, pool.buffers())
            };

            tracing::info!(
                round = report.round,
                elapsed_ms = report.elapsed.as_secs_f64() * 1000.0,
                per_sec = report.parses_per_sec(),
                pairs = report.pairs as u64,
                allocated = report.buffers.allocated,
                rented = report.buffers.rented,
                "round finished"
            );

            if config.is_bounded() {
                reports.push(report);
            }
            round += 1;

            // Sequential rounds never await; give a racing shutdown signal a turn
            tokio::task::yield_now().await;
        }

        Ok::<_, PoolError>(reports)
    }
    .instrument(span)
    .await
}

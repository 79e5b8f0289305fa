//! Generic thread pool with async job submission.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tokio::sync::oneshot;

use super::error::{PoolError, PoolResult};
use super::JobStats;

/// Default queue capacity multiplier per worker.
pub const DEFAULT_QUEUE_MULTIPLIER: usize = 100;

/// A job with its response channel.
struct WorkerRequest<Req, Res> {
    request: Req,
    response_tx: oneshot::Sender<PoolResult<Res>>,
    queued_at: Instant,
}

type RequestRx<Req, Res> = Arc<Mutex<mpsc::Receiver<WorkerRequest<Req, Res>>>>;

/// Counters shared between the pool handle and its workers.
#[derive(Default)]
struct Counters {
    pending: AtomicUsize,
    completed: AtomicU64,
    rejected: AtomicU64,
    timeouts: AtomicU64,
    panics: AtomicU64,
}

/// A thread pool running blocking jobs.
///
/// Workers pull jobs from one bounded queue and run them through a shared
/// handler. Submission is async: the caller awaits a oneshot reply.
pub struct ThreadPool<Req, Res>
where
    Req: Send + 'static,
    Res: Send + 'static,
{
    /// Job sender; taken on shutdown so workers drain and exit.
    request_tx: Mutex<Option<mpsc::SyncSender<WorkerRequest<Req, Res>>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    worker_count: usize,
    queue_capacity: usize,
    counters: Arc<Counters>,
    shutdown: AtomicBool,
    /// Pool name, used for thread names and logging.
    name: String,
}

impl<Req, Res> ThreadPool<Req, Res>
where
    Req: Send + 'static,
    Res: Send + 'static,
{
    /// Create a pool with a queue of `num_workers * 100` slots.
    ///
    /// `num_workers == 0` means one worker per CPU.
    pub fn new<F>(num_workers: usize, name: impl Into<String>, handler: F) -> std::io::Result<Self>
    where
        F: Fn(Req) -> Res + Send + Sync + Clone + 'static,
    {
        let num_workers = if num_workers == 0 {
            num_cpus::get()
        } else {
            num_workers
        };
        Self::with_capacity(
            num_workers,
            num_workers.saturating_mul(DEFAULT_QUEUE_MULTIPLIER),
            name,
            handler,
        )
    }

    /// Create a pool with an explicit queue capacity.
    pub fn with_capacity<F>(
        num_workers: usize,
        queue_capacity: usize,
        name: impl Into<String>,
        handler: F,
    ) -> std::io::Result<Self>
    where
        F: Fn(Req) -> Res + Send + Sync + Clone + 'static,
    {
        let name = name.into();
        let (request_tx, request_rx) = mpsc::sync_channel::<WorkerRequest<Req, Res>>(queue_capacity);
        let request_rx = Arc::new(Mutex::new(request_rx));
        let counters = Arc::new(Counters::default());

        let mut workers = Vec::with_capacity(num_workers);

        for id in 0..num_workers {
            let rx = Arc::clone(&request_rx);
            let handler = handler.clone();
            let counters = Arc::clone(&counters);

            let handle = thread::Builder::new()
                .name(format!("{}-{}", name, id))
                .spawn(move || Self::worker_loop(id, rx, handler, counters))?;

            workers.push(handle);
        }

        tracing::info!(
            pool = %name,
            workers = num_workers,
            capacity = queue_capacity,
            "thread pool created"
        );

        Ok(Self {
            request_tx: Mutex::new(Some(request_tx)),
            workers: Mutex::new(workers),
            worker_count: num_workers,
            queue_capacity,
            counters,
            shutdown: AtomicBool::new(false),
            name,
        })
    }

    fn worker_loop<F>(id: usize, rx: RequestRx<Req, Res>, handler: F, counters: Arc<Counters>)
    where
        F: Fn(Req) -> Res,
    {
        tracing::debug!(worker = id, "worker started");

        loop {
            let work = {
                let guard = rx.lock().unwrap_or_else(|e| e.into_inner());
                guard.recv()
            };

            let Ok(WorkerRequest {
                request,
                response_tx,
                queued_at,
            }) = work
            else {
                // Sender dropped: pool shut down
                break;
            };

            counters.pending.fetch_sub(1, Ordering::SeqCst);
            let queued = queued_at.elapsed();
            tracing::trace!(
                worker = id,
                queue_wait_us = queued.as_micros() as u64,
                "job dequeued"
            );

            let result = panic::catch_unwind(AssertUnwindSafe(|| handler(request))).map_err(
                |payload| {
                    counters.panics.fetch_add(1, Ordering::Relaxed);
                    let message = panic_message(payload.as_ref());
                    tracing::error!(worker = id, error = %message, "job panicked");
                    PoolError::Panicked {
                        worker: id,
                        queued,
                        message,
                    }
                },
            );

            counters.completed.fetch_add(1, Ordering::Relaxed);
            let _ = response_tx.send(result);
        }

        tracing::debug!(worker = id, "worker stopped");
    }

    /// Queue a job and return the channel its result arrives on.
    fn submit(&self, request: Req) -> PoolResult<oneshot::Receiver<PoolResult<Res>>> {
        if self.shutdown.load(Ordering::SeqCst) {
            return Err(PoolError::Closed);
        }

        let (response_tx, response_rx) = oneshot::channel();
        let work = WorkerRequest {
            request,
            response_tx,
            queued_at: Instant::now(),
        };

        let sender = self.request_tx.lock().unwrap_or_else(|e| e.into_inner());
        let Some(tx) = sender.as_ref() else {
            return Err(PoolError::Closed);
        };

        self.counters.pending.fetch_add(1, Ordering::SeqCst);

        // Use try_send to detect queue full
        if let Err(e) = tx.try_send(work) {
            self.counters.pending.fetch_sub(1, Ordering::SeqCst);
            return match e {
                mpsc::TrySendError::Full(_) => {
                    self.counters.rejected.fetch_add(1, Ordering::Relaxed);
                    Err(PoolError::Saturated {
                        capacity: self.queue_capacity,
                        pending: self.pending_count(),
                    })
                }
                mpsc::TrySendError::Disconnected(_) => Err(PoolError::Closed),
            };
        }

        Ok(response_rx)
    }

    /// Run a job on the pool.
    pub async fn execute(&self, request: Req) -> PoolResult<Res> {
        let response_rx = self.submit(request)?;

        response_rx.await.unwrap_or(Err(PoolError::Closed))
    }

    /// Run a job, giving up after `timeout`.
    ///
    /// A timed-out job still runs to completion on its worker; only the
    /// result is discarded.
    pub async fn execute_with_timeout(&self, request: Req, timeout: Duration) -> PoolResult<Res> {
        let response_rx = self.submit(request)?;

        match tokio::time::timeout(timeout, response_rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(PoolError::Closed),
            Err(_) => {
                self.counters.timeouts.fetch_add(1, Ordering::Relaxed);
                Err(PoolError::TimedOut { limit: timeout })
            }
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Jobs queued but not yet picked up by a worker.
    pub fn pending_count(&self) -> usize {
        self.counters.pending.load(Ordering::SeqCst)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Counter snapshot.
    pub fn stats(&self) -> JobStats {
        JobStats {
            completed: self.counters.completed.load(Ordering::Relaxed),
            rejected: self.counters.rejected.load(Ordering::Relaxed),
            timeouts: self.counters.timeouts.load(Ordering::Relaxed),
            panics: self.counters.panics.load(Ordering::Relaxed),
        }
    }

    /// Stop accepting jobs. Workers finish the queued ones, then exit.
    pub fn shutdown(&self) {
        if self.shutdown.swap(true, Ordering::SeqCst) {
            return; // Already shutting down
        }

        tracing::info!(pool = %self.name, "shutting down thread pool");

        // Dropping the sender makes recv() fail once the queue is drained
        self.request_tx
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
    }

    /// Wait for all workers to exit (call after shutdown).
    pub fn join(&self) {
        let mut workers = self.workers.lock().unwrap_or_else(|e| e.into_inner());
        for worker in workers.drain(..) {
            let _ = worker.join();
        }
    }
}

impl<Req, Res> Drop for ThreadPool<Req, Res>
where
    Req: Send + 'static,
    Res: Send + 'static,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

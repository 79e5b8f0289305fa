//! Pool implementation and the scoped rental guard.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock};

use super::{PoolStats, DEFAULT_MAX_BUFFER_SIZE, DEFAULT_MAX_RETAINED, MIN_BUFFER_SIZE};

/// Thread-safe pool of reusable byte buffers.
///
/// Rentals are served from a bounded free list when a large enough buffer is
/// idle, otherwise fresh storage is allocated (rounded up to a power of two).
pub struct BufferPool {
    /// Idle buffers, most recently returned at the back.
    free: Mutex<Vec<Vec<u8>>>,
    /// Maximum idle buffers kept.
    max_retained: usize,
    /// Buffers with larger capacity are released on return.
    max_buffer_size: usize,
    rented: AtomicU64,
    returned: AtomicU64,
    allocated: AtomicU64,
    discarded: AtomicU64,
}

impl BufferPool {
    /// Create a pool with default limits.
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_RETAINED, DEFAULT_MAX_BUFFER_SIZE)
    }

    /// Create a pool keeping at most `max_retained` idle buffers, each no
    /// larger than `max_buffer_size` bytes.
    pub fn with_limits(max_retained: usize, max_buffer_size: usize) -> Self {
        Self {
            free: Mutex::new(Vec::with_capacity(max_retained.min(DEFAULT_MAX_RETAINED))),
            max_retained,
            max_buffer_size,
            rented: AtomicU64::new(0),
            returned: AtomicU64::new(0),
            allocated: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
        }
    }

    /// Process-wide pool used by [`crate::form::parse`].
    pub fn shared() -> &'static BufferPool {
        static SHARED: OnceLock<BufferPool> = OnceLock::new();
        SHARED.get_or_init(BufferPool::new)
    }

    /// Rent an empty buffer with capacity of at least `min_capacity` bytes.
    pub fn rent(&self, min_capacity: usize) -> ScratchBuffer<'_> {
        self.rented.fetch_add(1, Ordering::Relaxed);

        let mut free = self.lock_free();
        let found = free.iter().rposition(|b| b.capacity() >= min_capacity);
        let reused = found.map(|idx| free.swap_remove(idx));
        drop(free);

        let buf = match reused {
            Some(buf) => buf,
            None => {
                self.allocated.fetch_add(1, Ordering::Relaxed);
                Vec::with_capacity(bucket_size(min_capacity))
            }
        };

        ScratchBuffer { buf, pool: self }
    }

    /// Current counter snapshot.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            rented: self.rented.load(Ordering::Relaxed),
            returned: self.returned.load(Ordering::Relaxed),
            allocated: self.allocated.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            idle: self.lock_free().len(),
        }
    }

    /// Maximum idle buffers kept.
    pub fn max_retained(&self) -> usize {
        self.max_retained
    }

    /// Largest buffer capacity kept on return.
    pub fn max_buffer_size(&self) -> usize {
        self.max_buffer_size
    }

    /// Release every idle buffer.
    pub fn clear(&self) {
        self.lock_free().clear();
    }

    fn give_back(&self, mut buf: Vec<u8>) {
        self.returned.fetch_add(1, Ordering::Relaxed);

        if buf.capacity() > self.max_buffer_size {
            self.discarded.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let mut free = self.lock_free();
        if free.len() >= self.max_retained {
            self.discarded.fetch_add(1, Ordering::Relaxed);
            return;
        }

        buf.clear();
        free.push(buf);
    }

    // The free list holds plain byte vectors, so a poisoned lock carries no
    // broken invariant and is recovered rather than propagated.
    fn lock_free(&self) -> MutexGuard<'_, Vec<Vec<u8>>> {
        self.free.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPool")
            .field("max_retained", &self.max_retained)
            .field("max_buffer_size", &self.max_buffer_size)
            .field("stats", &self.stats())
            .finish()
    }
}

/// Round a requested capacity up to the pool's allocation bucket.
fn bucket_size(min_capacity: usize) -> usize {
    min_capacity
        .checked_next_power_of_two()
        .unwrap_or(min_capacity)
        .max(MIN_BUFFER_SIZE)
}

/// A buffer checked out of a [`BufferPool`].
///
/// Returned to its pool exactly once, when the guard is dropped.
pub struct ScratchBuffer<'p> {
    buf: Vec<u8>,
    pool: &'p BufferPool,
}

impl ScratchBuffer<'_> {
    /// Capacity of the underlying storage.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }
}

impl Deref for ScratchBuffer<'_> {
    type Target = Vec<u8>;

    #[inline]
    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for ScratchBuffer<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for ScratchBuffer<'_> {
    fn drop(&mut self) {
        self.pool.give_back(std::mem::take(&mut self.buf));
    }
}

impl fmt::Debug for ScratchBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScratchBuffer")
            .field("len", &self.buf.len())
            .field("capacity", &self.buf.capacity())
            .finish()
    }
}

//! Shared scratch buffer pool.
//!
//! Parse calls rent a [`ScratchBuffer`] only when a segment actually needs
//! percent-decoding. The guard hands its storage back to the pool when it is
//! dropped, so a call can never leak a buffer, whatever path it exits by.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      BufferPool                          │
//! ├──────────────────────────────────────────────────────────┤
//! │   free list: Mutex<Vec<Vec<u8>>>   (bounded, LIFO)       │
//! │   counters:  AtomicU64 x 4         (rented / returned /  │
//! │                                     allocated / dropped) │
//! └──────────────┬──────────────────────────────▲────────────┘
//!                │ rent(min_capacity)           │ Drop
//!        ┌───────▼──────────┐           ┌───────┴──────────┐
//!        │ ScratchBuffer<'p>│ ────────▶ │  give back       │
//!        └──────────────────┘           └──────────────────┘
//! ```

mod pool;

pub use pool::{BufferPool, ScratchBuffer};

use serde::Serialize;

/// Smallest buffer the pool hands out.
pub const MIN_BUFFER_SIZE: usize = 64;

/// Default number of idle buffers kept for reuse.
pub const DEFAULT_MAX_RETAINED: usize = 64;

/// Default size above which returned buffers are dropped instead of kept.
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 1024 * 1024;

/// Snapshot of pool counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Buffers handed out by `rent`.
    pub rented: u64,
    /// Buffers handed back by guard drop.
    pub returned: u64,
    /// Rentals that had to allocate fresh storage.
    pub allocated: u64,
    /// Returned buffers released instead of kept (pool full or oversized).
    pub discarded: u64,
    /// Idle buffers currently in the free list.
    pub idle: usize,
}

impl PoolStats {
    /// Buffers currently checked out.
    pub fn outstanding(&self) -> u64 {
        self.rented.saturating_sub(self.returned)
    }

    /// Counter deltas since an earlier snapshot (`idle` is taken from `self`).
    pub fn since(&self, earlier: &PoolStats) -> PoolStats {
        PoolStats {
            rented: self.rented.saturating_sub(earlier.rented),
            returned: self.returned.saturating_sub(earlier.returned),
            allocated: self.allocated.saturating_sub(earlier.allocated),
            discarded: self.discarded.saturating_sub(earlier.discarded),
            idle: self.idle,
        }
    }
}

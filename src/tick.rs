//! Hardware tick source.
//!
//! The periodic timer interrupt is the only producer; the scheduler scan in
//! the main loop is the only consumer.  This is the single piece of state
//! shared between the two execution contexts.
//!
//! ```text
//! ┌──────────────┐  signal()   ┌──────────────┐  take()   ┌──────────────┐
//! │ Periodic ISR │────────────▶│  TickSource  │──────────▶│ TimerRegistry│
//! │ (every tick) │             │  (atomic)    │           │    scan()    │
//! └──────────────┘             └──────────────┘           └──────────────┘
//! ```
//!
//! The producer side performs exactly one atomic RMW and nothing else, so
//! interrupt latency stays bounded.  The consumer swaps the pending count
//! back to zero in one operation, so no tick signalled between the read and
//! the clear can be lost.

use core::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

/// How the scan accounts for ticks that elapsed while the main loop was
/// blocked (presence wait, dwell delay, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TickPolicy {
    /// Any number of pending ticks counts as a single tick, like a plain
    /// "tick happened" flag.  Timers run slow while the loop is blocked.
    Coalesce,
    /// Every elapsed tick is counted and replayed by the next scan.
    #[default]
    Accumulate,
}

/// Single-producer / single-consumer tick counter.
pub struct TickSource {
    pending: AtomicU32,
}

/// The process-wide tick source fed by the hardware timer.
pub static TICK: TickSource = TickSource::new();

impl TickSource {
    pub const fn new() -> Self {
        Self {
            pending: AtomicU32::new(0),
        }
    }

    /// Record one elapsed tick.  Lock-free — safe to call from interrupt
    /// context.  Saturates instead of wrapping so a stalled consumer never
    /// sees the count fall back to zero.
    pub fn signal(&self) {
        let _ = self
            .pending
            .fetch_update(Ordering::Release, Ordering::Relaxed, |n| {
                Some(n.saturating_add(1))
            });
    }

    /// Consume pending ticks and return how many the scan should apply.
    pub fn take(&self, policy: TickPolicy) -> u32 {
        let pending = self.pending.swap(0, Ordering::Acquire);
        match policy {
            TickPolicy::Coalesce => pending.min(1),
            TickPolicy::Accumulate => pending,
        }
    }

    /// True when at least one tick is waiting for the scan.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire) != 0
    }

    /// Raw number of ticks signalled since the last `take`.
    pub fn pending(&self) -> u32 {
        self.pending.load(Ordering::Acquire)
    }
}

impl Default for TickSource {
    fn default() -> Self {
        Self::new()
    }
}

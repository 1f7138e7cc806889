//! Per-worker working-storage accounting.
//!
//! Workloads charge the buffers they allocate (copies, recursion frames)
//! and release them when freed. The tracker keeps a high-water mark, which
//! is the memory figure reported for the run.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic current/peak byte counters.
pub struct MemoryTracker {
    current: AtomicU64,
    peak: AtomicU64,
}

impl MemoryTracker {
    /// Create a tracker with nothing charged.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: AtomicU64::new(0),
            peak: AtomicU64::new(0),
        }
    }

    /// Charge `bytes` of working storage.
    pub fn charge(&self, bytes: usize) {
        let bytes = bytes as u64;
        let now = self.current.fetch_add(bytes, Ordering::Relaxed) + bytes;
        self.peak.fetch_max(now, Ordering::Relaxed);
    }

    /// Release `bytes` previously charged. Saturates at zero.
    pub fn release(&self, bytes: usize) {
        let bytes = bytes as u64;
        let _ = self
            .current
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |c| {
                Some(c.saturating_sub(bytes))
            });
    }

    /// Charge the allocated capacity of a vector.
    pub fn charge_vec<T>(&self, v: &Vec<T>) {
        self.charge(v.capacity() * std::mem::size_of::<T>());
    }

    /// High-water mark.
    #[must_use]
    pub fn peak(&self) -> u64 {
        self.peak.load(Ordering::Relaxed)
    }
}

impl Default for MemoryTracker {
    fn default() -> Self {
        Self::new()
    }
}

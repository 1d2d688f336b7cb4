//! Delivery counters kept by the dispatcher.
//!
//! Drops are never reported to senders or recipients; these counters are the
//! one place they can be observed.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub(crate) struct Counters {
    dispatched: AtomicU64,
    delivered: AtomicU64,
    dropped_full: AtomicU64,
    dropped_unknown: AtomicU64,
    dropped_closed: AtomicU64,
}

impl Counters {
    pub(crate) fn record_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_full(&self) {
        self.dropped_full.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unknown(&self) {
        self.dropped_unknown.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_closed(&self) {
        self.dropped_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> DeliveryStats {
        DeliveryStats {
            dispatched: self.dispatched.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            dropped_full: self.dropped_full.load(Ordering::Relaxed),
            dropped_unknown: self.dropped_unknown.load(Ordering::Relaxed),
            dropped_closed: self.dropped_closed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of the dispatcher counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    /// Messages taken off the input queue and stamped.
    pub dispatched: u64,
    /// Copies placed in a participant's outbound queue.
    pub delivered: u64,
    /// Copies dropped because the participant's queue was full.
    pub dropped_full: u64,
    /// Direct messages whose recipient was not registered.
    pub dropped_unknown: u64,
    /// Copies dropped because the participant's receiver was gone.
    pub dropped_closed: u64,
}

impl DeliveryStats {
    pub fn dropped(&self) -> u64 {
        self.dropped_full + self.dropped_unknown + self.dropped_closed
    }
}

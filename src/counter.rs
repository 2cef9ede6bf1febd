//! Monotonic event counter
//!
//! The simplest collector a registry holds next to datapoint samplers. It
//! is lock-free; a resetting report swaps the value out, so no increment is
//! lost or reported twice.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::traits::{Collector, CollectorKind, ReportSink};

/// Lock-free event counter
///
/// # Example
///
/// ```
/// use datapoints::counter::Counter;
///
/// let requests = Counter::new();
/// requests.incr(1);
/// requests.incr(2);
///
/// assert_eq!(requests.report(true), 3);
/// assert_eq!(requests.value(), 0);
/// ```
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    /// Create a counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `n` to the counter
    pub fn incr(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    /// Get the current value
    pub fn value(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Read the value, resetting it to zero if `reset`
    pub fn report(&self, reset: bool) -> u64 {
        if reset {
            self.value.swap(0, Ordering::Relaxed)
        } else {
            self.value()
        }
    }
}

impl Collector for Counter {
    fn static_kind() -> CollectorKind {
        CollectorKind::Counter
    }

    fn kind(&self) -> CollectorKind {
        CollectorKind::Counter
    }

    fn report(&self, name: &str, reset: bool, sink: &mut dyn ReportSink) {
        sink.counter(name, Counter::report(self, reset));
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_concurrent_incr_with_resets() {
        let counter = Counter::new();
        let mut reported = 0;

        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..10_000 {
                        counter.incr(1);
                    }
                });
            }
            for _ in 0..100 {
                reported += counter.report(true);
            }
        });
        reported += counter.report(true);

        assert_eq!(reported, 40_000);
        assert_eq!(counter.value(), 0);
    }

    #[test]
    fn test_report_without_reset() {
        let counter = Counter::new();
        counter.incr(5);

        assert_eq!(counter.report(false), 5);
        assert_eq!(counter.report(false), 5);
    }
}

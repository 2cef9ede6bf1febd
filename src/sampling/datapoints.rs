//! Thread-safe datapoint collector
//!
//! Wraps a [`Reservoir`] in a single mutex. Every `add` and every `report`
//! is one critical section: counter updates, the random draws and at most
//! one row copy happen under the lock, nothing else does.

use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{DatapointReport, Reservoir, Row};
use crate::config::SamplerConfig;
use crate::traits::{Collector, CollectorKind, ReportSink};

/// Concurrent reservoir sampler for multi-value observations
///
/// Producers call [`add`](Self::add) from any thread; a reporter calls
/// [`report`](Self::report) to read, and optionally reset, the sample.
/// Memory is bounded by `collection_max` rows whatever the input rate.
///
/// # Example
///
/// ```
/// use datapoints::sampling::DatapointSampler;
/// use std::sync::Arc;
/// use std::thread;
///
/// let sampler = Arc::new(DatapointSampler::new(1.0, 100));
///
/// let handles: Vec<_> = (0..4)
///     .map(|t| {
///         let sampler = Arc::clone(&sampler);
///         thread::spawn(move || {
///             for i in 0..1000 {
///                 sampler.add(&[t as f64, i as f64]);
///             }
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// let report = sampler.report(true);
/// assert_eq!(report.total, 4000);
/// assert_eq!(report.rows.len(), 100);
/// assert!(report.clipped);
/// ```
#[derive(Debug)]
pub struct DatapointSampler {
    inner: Mutex<Reservoir>,
}

impl DatapointSampler {
    /// Create a sampler considering `collection_fraction` of all observations
    /// and keeping at most `collection_max` of them
    ///
    /// Out-of-range values are accepted; see [`Reservoir::new`] for how they
    /// behave. Use [`SamplerConfig::validate`] to reject them up front.
    pub fn new(collection_fraction: f64, collection_max: usize) -> Self {
        Self::from_reservoir(Reservoir::new(collection_fraction, collection_max))
    }

    /// Create a sampler with a fixed random seed
    pub fn with_seed(collection_fraction: f64, collection_max: usize, seed: u64) -> Self {
        Self::from_reservoir(Reservoir::with_seed(
            collection_fraction,
            collection_max,
            seed,
        ))
    }

    /// Create a sampler from a [`SamplerConfig`]
    pub fn from_config(config: &SamplerConfig) -> Self {
        Self::new(config.collection_fraction, config.collection_max)
    }

    /// Wrap an existing reservoir, keeping its state
    pub fn from_reservoir(reservoir: Reservoir) -> Self {
        Self {
            inner: Mutex::new(reservoir),
        }
    }

    /// Record one observation
    ///
    /// Never fails. An empty slice is stored as a zero-length row.
    pub fn add(&self, values: &[f64]) {
        self.inner.lock().add(values);
    }

    /// Record an already shared row without copying it
    pub fn add_row(&self, row: Row) {
        self.inner.lock().add_row(row);
    }

    /// Snapshot the sampler, handing the rows off and resetting if `reset`
    ///
    /// With `reset`, the caller owns the returned rows and the sampler
    /// starts over empty. Without it, the caller gets a copy of the row list
    /// and sampling continues undisturbed.
    pub fn report(&self, reset: bool) -> DatapointReport {
        let mut inner = self.inner.lock();
        if reset {
            inner.take()
        } else {
            inner.snapshot()
        }
    }

    /// Snapshot the sampler and pass the report to `consume` with the lock
    /// already released
    pub fn report_with<F, R>(&self, reset: bool, consume: F) -> R
    where
        F: FnOnce(DatapointReport) -> R,
    {
        let report = self.report(reset);
        consume(report)
    }

    /// Get the number of observations offered since the last reset
    pub fn total(&self) -> u64 {
        self.inner.lock().total()
    }

    /// Get the number of observations that passed the pre-filter
    pub fn considered_total(&self) -> u64 {
        self.inner.lock().considered()
    }

    /// Current number of sampled rows
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if no row is sampled
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Check if the sample no longer holds every considered observation
    pub fn is_clipped(&self) -> bool {
        self.inner.lock().is_clipped()
    }

    /// Get the pre-filter probability
    pub fn collection_fraction(&self) -> f64 {
        self.inner.lock().fraction()
    }

    /// Get the maximum number of sampled rows
    pub fn collection_max(&self) -> usize {
        self.inner.lock().capacity()
    }
}

impl Default for DatapointSampler {
    fn default() -> Self {
        Self::from_config(&SamplerConfig::default())
    }
}

impl Collector for DatapointSampler {
    fn static_kind() -> CollectorKind {
        CollectorKind::Datapoints
    }

    fn kind(&self) -> CollectorKind {
        CollectorKind::Datapoints
    }

    fn report(&self, name: &str, reset: bool, sink: &mut dyn ReportSink) {
        let report = DatapointSampler::report(self, reset);
        sink.datapoints(name, report);
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

//! Named collector registry
//!
//! Maps string keys to collectors created lazily on first use. Lookups take
//! a read lock; creation takes the write lock and checks again, so a
//! factory runs at most once per name and every caller sees one instance.
//!
//! # Example
//!
//! ```
//! use datapoints::prelude::*;
//!
//! struct Print;
//!
//! impl ReportSink for Print {
//!     fn datapoints(&mut self, name: &str, report: DatapointReport) {
//!         println!("{}: {} of {} sampled", name, report.rows.len(), report.total);
//!     }
//!
//!     fn counter(&mut self, name: &str, value: u64) {
//!         println!("{}: {}", name, value);
//!     }
//! }
//!
//! let registry = Registry::new(SamplerConfig::default().with_collection_fraction(1.0));
//!
//! registry.datapoint("rpc.latency", &[0.012, 512.0]);
//! registry.count("rpc.calls", 1);
//!
//! registry.report(true, &mut Print);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error};

use crate::config::SamplerConfig;
use crate::counter::Counter;
use crate::error::RegistryError;
use crate::sampling::DatapointSampler;
use crate::traits::{Collector, ReportSink};

type ErrorHandler = Box<dyn Fn(&RegistryError) + Send + Sync>;

/// Registry of named collectors
pub struct Registry {
    config: SamplerConfig,
    collectors: RwLock<BTreeMap<String, Arc<dyn Collector>>>,
    on_error: ErrorHandler,
}

impl Registry {
    /// Create an empty registry whose samplers use `config`
    pub fn new(config: SamplerConfig) -> Self {
        Self {
            config,
            collectors: RwLock::new(BTreeMap::new()),
            on_error: Box::new(log_error),
        }
    }

    /// Replace the handler for errors swallowed by [`datapoint`](Self::datapoint)
    /// and [`count`](Self::count)
    ///
    /// The default handler logs them with `tracing`.
    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&RegistryError) + Send + Sync + 'static,
    {
        self.on_error = Box::new(handler);
        self
    }

    /// Get the config used for samplers created on demand
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Get the collector bound to `name`, creating it with `factory` if absent
    ///
    /// Returns [`RegistryError::KindMismatch`] if `name` is bound to a
    /// collector of another type.
    pub fn get_or_create<C, F>(&self, name: &str, factory: F) -> Result<Arc<C>, RegistryError>
    where
        C: Collector,
        F: FnOnce() -> C,
    {
        let existing = self.collectors.read().get(name).cloned();
        if let Some(existing) = existing {
            return downcast(name, existing);
        }

        let mut collectors = self.collectors.write();
        if let Some(existing) = collectors.get(name) {
            return downcast(name, Arc::clone(existing));
        }

        let created = Arc::new(factory());
        let erased: Arc<dyn Collector> = created.clone();
        collectors.insert(name.to_owned(), erased);
        debug!(name, kind = %C::static_kind(), "created collector");

        Ok(created)
    }

    /// Get or create the sampler for `name` with the registry's config
    pub fn sampler(&self, name: &str) -> Result<Arc<DatapointSampler>, RegistryError> {
        let config = self.config;
        self.get_or_create(name, || DatapointSampler::from_config(&config))
    }

    /// Get or create the counter for `name`
    pub fn counter(&self, name: &str) -> Result<Arc<Counter>, RegistryError> {
        self.get_or_create(name, Counter::new)
    }

    /// Record one observation under `name`
    ///
    /// A lookup error goes to the error handler and the observation is
    /// dropped.
    pub fn datapoint(&self, name: &str, values: &[f64]) {
        match self.sampler(name) {
            Ok(sampler) => sampler.add(values),
            Err(err) => (self.on_error)(&err),
        }
    }

    /// Add `n` to the counter under `name`
    ///
    /// A lookup error goes to the error handler and the increment is
    /// dropped.
    pub fn count(&self, name: &str, n: u64) {
        match self.counter(name) {
            Ok(counter) => counter.incr(n),
            Err(err) => (self.on_error)(&err),
        }
    }

    /// Report every collector into `sink`, in name order
    ///
    /// The collector list is copied first, so the sink runs without the
    /// registry lock and collectors created meanwhile are picked up on the
    /// next call.
    pub fn report(&self, reset: bool, sink: &mut dyn ReportSink) {
        let collectors: Vec<(String, Arc<dyn Collector>)> = self
            .collectors
            .read()
            .iter()
            .map(|(name, collector)| (name.clone(), Arc::clone(collector)))
            .collect();

        for (name, collector) in &collectors {
            collector.report(name, reset, sink);
        }
    }

    /// Get the number of registered collectors
    pub fn len(&self) -> usize {
        self.collectors.read().len()
    }

    /// Check if no collector is registered
    pub fn is_empty(&self) -> bool {
        self.collectors.read().is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        self.collectors.read().keys().cloned().collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(SamplerConfig::default())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("names", &self.names())
            .finish_non_exhaustive()
    }
}

fn log_error(err: &RegistryError) {
    error!(%err, "collector lookup failed");
}

fn downcast<C: Collector>(
    name: &str,
    collector: Arc<dyn Collector>,
) -> Result<Arc<C>, RegistryError> {
    let existing = collector.kind();
    collector
        .into_any()
        .downcast::<C>()
        .map_err(|_| RegistryError::KindMismatch {
            name: name.to_owned(),
            existing,
            requested: C::static_kind(),
        })
}

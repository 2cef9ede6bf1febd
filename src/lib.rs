//! # Datapoints
//!
//! Concurrent, bounded-memory sampling of numeric event streams.
//!
//! Producers record observations at any rate from any number of threads; a
//! reporter periodically reads a uniformly random sample of them (and
//! optionally resets) for export to a monitoring backend. Memory stays
//! bounded whatever the input volume.
//!
//! ## Features
//!
//! - **Reservoir Sampling**: Algorithm R behind a probabilistic pre-filter
//! - **Multi-value Rows**: several fields of one event are sampled together
//! - **One Lock per Sampler**: counters and sample are always read together
//! - **Named Registry**: get-or-create collectors by name, report them all
//!
//! ## Quick Start
//!
//! ```rust
//! use datapoints::prelude::*;
//!
//! // Consider 10% of observations, keep at most 500
//! let sampler = DatapointSampler::from_config(&SamplerConfig::default());
//!
//! for i in 0..100_000 {
//!     let latency = (i % 250) as f64 / 1000.0;
//!     let size = (i % 4096) as f64;
//!     sampler.add(&[latency, size]);
//! }
//!
//! let report = sampler.report(true);
//! assert_eq!(report.total, 100_000);
//! assert!(report.rows.len() <= 500);
//! ```
//!
//! ## Registry
//!
//! A [`Registry`] binds names to collectors, creating them on first use,
//! and drives them all into a [`ReportSink`](traits::ReportSink):
//!
//! ```rust
//! use datapoints::prelude::*;
//!
//! let registry = Registry::default();
//! registry.datapoint("db.query", &[0.004, 12.0]);
//!
//! let sampler = registry.sampler("db.query").unwrap();
//! assert_eq!(sampler.total(), 1);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: deserialize [`SamplerConfig`] and serialize
//!   [`DatapointReport`](sampling::DatapointReport)

pub mod config;
pub mod counter;
pub mod error;
pub mod registry;
pub mod sampling;
pub mod traits;

pub mod prelude {
    pub use crate::traits::*;

    pub use crate::config::SamplerConfig;
    pub use crate::counter::Counter;
    pub use crate::error::{ConfigError, RegistryError};
    pub use crate::registry::Registry;
    pub use crate::sampling::{DatapointReport, DatapointSampler, Reservoir, Row};
}

pub use config::SamplerConfig;
pub use registry::Registry;
pub use sampling::{DatapointReport, DatapointSampler};

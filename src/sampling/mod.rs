//! Stream sampling for numeric datapoints
//!
//! This module keeps a bounded, uniformly random sample of a stream of
//! observations. Each observation is a row of `f64` values (e.g. latency
//! plus payload size), so several fields of one event stay together.
//!
//! - [`Reservoir`]: single-owner algorithm state
//! - [`DatapointSampler`]: the same behind one mutex, shared by producers
//!
//! # Example
//!
//! ```
//! use datapoints::sampling::DatapointSampler;
//!
//! // Consider every observation, keep at most 10
//! let sampler = DatapointSampler::new(1.0, 10);
//!
//! for i in 0..1_000_000 {
//!     sampler.add(&[i as f64]);
//! }
//!
//! // Each observation had equal probability of being sampled
//! let report = sampler.report(true);
//! assert_eq!(report.rows.len(), 10);
//! assert_eq!(report.total, 1_000_000);
//! ```

mod datapoints;
mod report;
mod reservoir;

pub use datapoints::DatapointSampler;
pub use report::DatapointReport;
pub use reservoir::{Reservoir, Row};

//! Core traits for named collectors
//!
//! A [`Registry`](crate::registry::Registry) holds heterogeneous collectors
//! behind the [`Collector`] trait and drives them into a [`ReportSink`] when
//! a reporter asks for their state.

use core::fmt;
use std::any::Any;
use std::sync::Arc;

use crate::sampling::DatapointReport;

/// Kind of a registered collector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectorKind {
    /// [`DatapointSampler`](crate::sampling::DatapointSampler)
    Datapoints,
    /// [`Counter`](crate::counter::Counter)
    Counter,
}

impl CollectorKind {
    /// Get the lowercase name used in logs and errors
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectorKind::Datapoints => "datapoints",
            CollectorKind::Counter => "counter",
        }
    }
}

impl fmt::Display for CollectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receiver of collector reports
///
/// Called with no registry or collector lock held, so implementations may
/// take as long as they need (serialize, buffer, send).
pub trait ReportSink {
    /// A datapoint sampler's snapshot
    fn datapoints(&mut self, name: &str, report: DatapointReport);

    /// A counter's value
    fn counter(&mut self, name: &str, value: u64);
}

/// Core trait for everything a registry can hold
pub trait Collector: Any + Send + Sync {
    /// Kind of this collector type, known without an instance
    fn static_kind() -> CollectorKind
    where
        Self: Sized;

    /// Kind of this collector
    fn kind(&self) -> CollectorKind;

    /// Report current state under `name`, resetting it if `reset`
    fn report(&self, name: &str, reset: bool, sink: &mut dyn ReportSink);

    /// Erase to `Any` so the registry can downcast back to the concrete type
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

//! Error types
//!
//! Sampling itself never fails. Errors come from binding names to collectors
//! and from strict configuration checks.

use thiserror::Error;

use crate::traits::CollectorKind;

/// Error while looking up or creating a named collector
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The name is already bound to a collector of another kind
    #[error("collector {name:?} already exists as {existing}, requested {requested}")]
    KindMismatch {
        name: String,
        existing: CollectorKind,
        requested: CollectorKind,
    },
}

/// Error from [`SamplerConfig::validate`](crate::config::SamplerConfig::validate)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Collection fraction outside `[0, 1]` or NaN
    #[error("collection fraction must be within [0, 1], got {0}")]
    InvalidFraction(f64),
    /// A zero maximum would never retain anything
    #[error("collection max must be positive")]
    ZeroCapacity,
}

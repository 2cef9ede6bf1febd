//! Sampler configuration
//!
//! Passed explicitly to a [`Registry`](crate::registry::Registry), which
//! uses it for every sampler it creates on demand.

use crate::error::ConfigError;

/// Default fraction of observations considered for the sample
pub const DEFAULT_COLLECTION_FRACTION: f64 = 0.1;

/// Default maximum number of sampled rows
pub const DEFAULT_COLLECTION_MAX: usize = 500;

/// Tunables for a [`DatapointSampler`](crate::sampling::DatapointSampler)
///
/// # Example
///
/// ```
/// use datapoints::config::SamplerConfig;
///
/// let config = SamplerConfig::default()
///     .with_collection_fraction(0.5)
///     .with_collection_max(1000);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SamplerConfig {
    /// Probability that an observation is considered for the sample
    pub collection_fraction: f64,
    /// Maximum number of rows kept per sampler
    pub collection_max: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            collection_fraction: DEFAULT_COLLECTION_FRACTION,
            collection_max: DEFAULT_COLLECTION_MAX,
        }
    }
}

impl SamplerConfig {
    /// Create a config with explicit values
    pub fn new(collection_fraction: f64, collection_max: usize) -> Self {
        Self {
            collection_fraction,
            collection_max,
        }
    }

    /// Set the fraction of observations considered for the sample
    pub fn with_collection_fraction(mut self, collection_fraction: f64) -> Self {
        self.collection_fraction = collection_fraction;
        self
    }

    /// Set the maximum number of rows kept per sampler
    pub fn with_collection_max(mut self, collection_max: usize) -> Self {
        self.collection_max = collection_max;
        self
    }

    /// Reject settings that make a sampler degenerate
    ///
    /// Samplers accept any setting; this is the opt-in strict check for
    /// callers that prefer failing at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.collection_fraction) {
            return Err(ConfigError::InvalidFraction(self.collection_fraction));
        }
        if self.collection_max == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

use super::Row;

/// Point-in-time view of a sampler
///
/// Produced by [`DatapointSampler::report`](super::DatapointSampler::report)
/// and [`Reservoir::take`](super::Reservoir::take)/[`snapshot`](super::Reservoir::snapshot).
/// The counters and the rows were read together, in one critical section.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DatapointReport {
    /// Sampled observations
    pub rows: Vec<Row>,
    /// Observations offered since the last reset
    pub total: u64,
    /// Observations that passed the pre-filter since the last reset
    pub considered: u64,
    /// `rows` is a sample of the considered observations, not all of them
    pub clipped: bool,
    /// Pre-filter probability of the sampler that produced this report
    pub fraction: f64,
}

impl DatapointReport {
    /// Number of sampled rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if no row was sampled
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Probability that any single offered observation is in `rows`
    ///
    /// Combines the pre-filter with the reservoir's own thinning. Divide
    /// sample sums by this to estimate population sums.
    pub fn sampling_probability(&self) -> f64 {
        if self.considered == 0 {
            return 0.0;
        }

        let kept = (self.rows.len() as f64 / self.considered as f64).min(1.0);
        self.fraction.clamp(0.0, 1.0) * kept
    }
}

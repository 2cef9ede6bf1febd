//! Reservoir sampling with a probabilistic pre-filter
//!
//! Every offered observation is counted, but only a `fraction` of them is
//! *considered* for the sample. Considered observations go through
//! Algorithm R: the first `capacity` are kept as-is, after that each new one
//! replaces a uniformly chosen slot with probability `capacity / considered`.

use std::mem;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::trace;

use super::DatapointReport;

/// One multi-value observation (e.g. latency and payload size).
///
/// Rows are immutable once stored, so reports share them by reference with
/// the reservoir instead of copying the values.
pub type Row = Arc<[f64]>;

/// Single-threaded reservoir of [`Row`]s
///
/// This is the unsynchronized core of
/// [`DatapointSampler`](super::DatapointSampler). Use it directly when a
/// single owner feeds the stream; wrap it in the sampler when producers run
/// on several threads.
///
/// # Algorithm
///
/// For each offered row:
/// 1. `total += 1`
/// 2. draw `u` in `[0, 1)`; if `u >= fraction` stop here
/// 3. `considered += 1`
/// 4. while not clipped, append; reaching `capacity` rows sets `clipped`
/// 5. once clipped, draw `j` in `[0, considered)` and overwrite slot `j` if
///    `j < capacity`
///
/// # Example
///
/// ```
/// use datapoints::sampling::Reservoir;
///
/// let mut reservoir = Reservoir::with_seed(1.0, 5, 42);
///
/// for i in 0..100 {
///     reservoir.add(&[i as f64]);
/// }
///
/// assert_eq!(reservoir.len(), 5);
/// assert_eq!(reservoir.total(), 100);
/// assert!(reservoir.is_clipped());
/// ```
///
/// Cloning copies the sample and counters but seeds a fresh random source,
/// so a clone never repeats the original's draws.
#[derive(Debug)]
pub struct Reservoir {
    /// Probability that an offered row is considered
    fraction: f64,
    /// Maximum number of retained rows
    capacity: usize,
    /// Current sample
    rows: Vec<Row>,
    /// Rows offered since the last reset
    total: u64,
    /// Rows that passed the pre-filter since the last reset
    considered: u64,
    /// Set once a considered row could not simply be appended
    clipped: bool,
    rng: Xoshiro256PlusPlus,
}

impl Reservoir {
    /// Create a reservoir seeded from OS entropy
    ///
    /// No validation is performed: a `fraction <= 0` never considers
    /// anything, a `fraction >= 1` considers everything and a `capacity` of
    /// zero clips on the first considered row and retains nothing.
    pub fn new(fraction: f64, capacity: usize) -> Self {
        Self::with_rng(fraction, capacity, Xoshiro256PlusPlus::from_entropy())
    }

    /// Create a reservoir with a fixed seed (for reproducibility)
    pub fn with_seed(fraction: f64, capacity: usize, seed: u64) -> Self {
        Self::with_rng(fraction, capacity, Xoshiro256PlusPlus::seed_from_u64(seed))
    }

    fn with_rng(fraction: f64, capacity: usize, rng: Xoshiro256PlusPlus) -> Self {
        Self {
            fraction,
            capacity,
            rows: Vec::new(),
            total: 0,
            considered: 0,
            clipped: false,
            rng,
        }
    }

    /// Offer one observation, copying `values` only if it is retained
    pub fn add(&mut self, values: &[f64]) {
        self.offer(|| Row::from(values));
    }

    /// Offer an already shared row
    pub fn add_row(&mut self, row: Row) {
        self.offer(|| row);
    }

    fn offer(&mut self, row: impl FnOnce() -> Row) {
        self.total += 1;

        if self.rng.gen::<f64>() >= self.fraction {
            return;
        }

        self.considered += 1;

        if !self.clipped && self.rows.len() < self.capacity {
            self.rows.push(row());
            if self.rows.len() >= self.capacity {
                self.clipped = true;
                trace!(capacity = self.capacity, total = self.total, "reservoir clipped");
            }
            return;
        }

        // Only reachable before clipping when capacity is zero
        self.clipped = true;

        // considered >= 1 here, so the range is never empty
        let j = self.rng.gen_range(0..self.considered);
        if j < self.rows.len() as u64 {
            self.rows[j as usize] = row();
        }
    }

    /// Hand the current sample off and reset every counter
    pub fn take(&mut self) -> DatapointReport {
        let report = DatapointReport {
            rows: mem::take(&mut self.rows),
            total: self.total,
            considered: self.considered,
            clipped: self.clipped,
            fraction: self.fraction,
        };

        self.total = 0;
        self.considered = 0;
        self.clipped = false;

        report
    }

    /// Copy the current state without disturbing it
    ///
    /// Only the outer sequence is copied; rows are shared.
    pub fn snapshot(&self) -> DatapointReport {
        DatapointReport {
            rows: self.rows.clone(),
            total: self.total,
            considered: self.considered,
            clipped: self.clipped,
            fraction: self.fraction,
        }
    }

    /// Get the current sample
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get the pre-filter probability
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Get the reservoir capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the current sample size
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the sample is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows offered since the last reset
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of rows that passed the pre-filter since the last reset
    pub fn considered(&self) -> u64 {
        self.considered
    }

    /// Whether the sample no longer holds every considered row
    pub fn is_clipped(&self) -> bool {
        self.clipped
    }
}

impl Clone for Reservoir {
    fn clone(&self) -> Self {
        Self {
            fraction: self.fraction,
            capacity: self.capacity,
            rows: self.rows.clone(),
            total: self.total,
            considered: self.considered,
            clipped: self.clipped,
            rng: Xoshiro256PlusPlus::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(reservoir: &Reservoir) -> Vec<f64> {
        reservoir.rows().iter().map(|row| row[0]).collect()
    }

    #[test]
    fn test_basic() {
        let mut reservoir = Reservoir::with_seed(1.0, 5, 7);

        for i in 0..10 {
            reservoir.add(&[i as f64]);
        }

        assert_eq!(reservoir.len(), 5);
        assert_eq!(reservoir.total(), 10);
        assert_eq!(reservoir.considered(), 10);
        assert!(reservoir.is_clipped());
    }

    #[test]
    fn test_underfilled() {
        let mut reservoir = Reservoir::with_seed(1.0, 10, 7);

        for i in 0..5 {
            reservoir.add(&[i as f64]);
        }

        assert_eq!(reservoir.len(), 5);
        assert!(!reservoir.is_clipped());

        // Appends keep arrival order before clipping
        assert_eq!(values(&reservoir), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_clips_exactly_at_capacity() {
        let mut reservoir = Reservoir::with_seed(1.0, 3, 7);

        reservoir.add(&[1.0]);
        reservoir.add(&[2.0]);
        assert!(!reservoir.is_clipped());

        reservoir.add(&[3.0]);
        assert!(reservoir.is_clipped());
        assert_eq!(values(&reservoir), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_reproducibility() {
        let mut r1 = Reservoir::with_seed(0.5, 5, 42);
        let mut r2 = Reservoir::with_seed(0.5, 5, 42);

        for i in 0..100 {
            r1.add(&[i as f64]);
            r2.add(&[i as f64]);
        }

        assert_eq!(r1.rows(), r2.rows());
        assert_eq!(r1.considered(), r2.considered());
    }

    #[test]
    fn test_uniformity() {
        // Each of 10 items should land in a 3-slot reservoir ~30% of the time
        let mut counts = [0usize; 10];
        let iterations = 10_000;

        for i in 0..iterations {
            let seed = (i as u64)
                .wrapping_mul(0x9e3779b97f4a7c15)
                .wrapping_add(0x853c49e6748fea9b);
            let mut reservoir = Reservoir::with_seed(1.0, 3, seed);
            for item in 0..10 {
                reservoir.add(&[item as f64]);
            }
            for row in reservoir.rows() {
                counts[row[0] as usize] += 1;
            }
        }

        let expected = iterations * 3 / 10;
        for (item, &count) in counts.iter().enumerate() {
            let deviation = (count as i64 - expected as i64).abs() as f64 / expected as f64;
            assert!(
                deviation < 0.1,
                "Item {} appeared {} times (expected ~{})",
                item,
                count,
                expected
            );
        }
    }

    #[test]
    fn test_zero_fraction_considers_nothing() {
        let mut reservoir = Reservoir::with_seed(0.0, 10, 1);

        for i in 0..1000 {
            reservoir.add(&[i as f64]);
        }

        assert_eq!(reservoir.total(), 1000);
        assert_eq!(reservoir.considered(), 0);
        assert!(reservoir.is_empty());
        assert!(!reservoir.is_clipped());
    }

    #[test]
    fn test_zero_capacity() {
        let mut reservoir = Reservoir::with_seed(1.0, 0, 1);

        reservoir.add(&[1.0]);
        reservoir.add(&[2.0]);

        assert!(reservoir.is_empty());
        assert!(reservoir.is_clipped());
        assert_eq!(reservoir.considered(), 2);
    }

    #[test]
    fn test_empty_row_is_stored() {
        let mut reservoir = Reservoir::with_seed(1.0, 2, 1);

        reservoir.add(&[]);

        assert_eq!(reservoir.len(), 1);
        assert!(reservoir.rows()[0].is_empty());
    }

    #[test]
    fn test_take_resets() {
        let mut reservoir = Reservoir::with_seed(1.0, 2, 1);

        for i in 0..5 {
            reservoir.add(&[i as f64]);
        }

        let report = reservoir.take();
        assert_eq!(report.total, 5);
        assert_eq!(report.considered, 5);
        assert!(report.clipped);
        assert_eq!(report.rows.len(), 2);

        assert!(reservoir.is_empty());
        assert_eq!(reservoir.total(), 0);
        assert_eq!(reservoir.considered(), 0);
        assert!(!reservoir.is_clipped());

        // Fills again from scratch after a reset
        reservoir.add(&[9.0]);
        assert_eq!(values(&reservoir), vec![9.0]);
    }

    #[test]
    fn test_snapshot_shares_rows() {
        let mut reservoir = Reservoir::with_seed(1.0, 4, 1);
        reservoir.add(&[1.0, 2.0]);

        let report = reservoir.snapshot();

        assert!(Arc::ptr_eq(&report.rows[0], &reservoir.rows()[0]));
        assert_eq!(reservoir.len(), 1);
    }

    #[test]
    fn test_clone_draws_independently() {
        let mut original = Reservoir::with_seed(0.5, 1000, 42);
        for i in 0..10 {
            original.add(&[i as f64]);
        }

        let mut copy = original.clone();
        assert_eq!(copy.rows(), original.rows());
        assert_eq!(copy.total(), original.total());

        // Same stream through both: shared rng state would make these identical
        let mut same_decisions = true;
        for i in 10..2_000 {
            let before = (original.considered(), copy.considered());
            original.add(&[i as f64]);
            copy.add(&[i as f64]);
            let original_kept = original.considered() > before.0;
            let copy_kept = copy.considered() > before.1;
            same_decisions &= original_kept == copy_kept;
        }

        assert!(!same_decisions, "clone repeated the original's draws");
    }

    #[test]
    fn test_add_row_keeps_identity() {
        let mut reservoir = Reservoir::with_seed(1.0, 4, 1);
        let row: Row = Arc::from(vec![3.0, 4.0]);

        reservoir.add_row(Arc::clone(&row));

        assert!(Arc::ptr_eq(&row, &reservoir.rows()[0]));
    }
}

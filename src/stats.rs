//! The statistics engine: running moments plus an adaptive histogram
//!
//! [`Stats`] owns both accumulators and feeds them from a single
//! [`push`](Stats::push). It never allocates after construction.

use crate::config::StatsConfig;
use crate::histogram::{AdaptiveHistogram, BinRange};
use crate::statistics::Moments;
use crate::traits::{BinError, ConfigError, MergeError, Sketch};

#[cfg(not(feature = "std"))]
use alloc::string::String;

/// Fixed-memory streaming statistics
///
/// Tracks count, min, max, average and variance of every pushed sample, and
/// bins each sample into a histogram with a fixed number of bins.
///
/// Statistics that are undefined for the samples seen so far are reported
/// as `NaN` (or `±inf` for min/max); each has a `try_*` companion returning
/// `None` instead.
///
/// # Invariants
///
/// After every [`push`](Self::push):
/// - the bin counts plus [`out_of_range`](Self::out_of_range) equal
///   [`sample_count`](Self::sample_count);
/// - in adaptive mode, every finite sample lies inside [`range`](Self::range).
///
/// # Example
///
/// ```
/// use binstats::{Stats, StatsConfig};
///
/// let config = StatsConfig::new("loop_time", 4, 0.0, 1.0).with_adaptive(true);
/// let mut stats = Stats::new(config).unwrap();
///
/// for x in [1.0, 2.0, 3.0] {
///     stats.push(x);
/// }
///
/// assert_eq!(stats.sample_count(), 3);
/// assert_eq!(stats.average(), 2.0);
/// assert!((stats.variance() - 2.0 / 3.0).abs() < 1e-12);
/// assert_eq!(stats.range().max, 4.0);
/// assert_eq!(stats.bins().iter().sum::<u64>(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct Stats {
    /// Label for reports
    identifier: String,
    moments: Moments,
    histogram: AdaptiveHistogram,
}

impl Stats {
    /// Create an engine from a validated configuration
    pub fn new(config: StatsConfig) -> Result<Self, ConfigError> {
        let histogram = AdaptiveHistogram::new(
            config.bin_count,
            config.adaptive,
            config.range_min,
            config.range_max,
        )?;
        Ok(Self {
            identifier: config.identifier,
            moments: Moments::new(),
            histogram,
        })
    }

    /// Create an engine from positional arguments
    pub fn with_range(
        identifier: &str,
        bin_count: usize,
        adaptive: bool,
        range_min: f64,
        range_max: f64,
    ) -> Result<Self, ConfigError> {
        Self::new(StatsConfig::new(identifier, bin_count, range_min, range_max).with_adaptive(adaptive))
    }

    /// Add a sample
    pub fn push(&mut self, value: f64) {
        self.moments.add(value);
        self.histogram.add(value);
    }

    /// Report label
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Number of samples pushed
    pub fn sample_count(&self) -> u64 {
        self.moments.len()
    }

    /// Smallest sample, `+inf` while empty
    pub fn min(&self) -> f64 {
        self.moments.min()
    }

    /// Largest sample, `-inf` while empty
    pub fn max(&self) -> f64 {
        self.moments.max()
    }

    /// Average, NaN while empty
    pub fn average(&self) -> f64 {
        self.moments.average()
    }

    /// Population variance, NaN with fewer than two samples
    pub fn variance(&self) -> f64 {
        self.moments.variance()
    }

    /// Sample variance, NaN with fewer than two samples
    pub fn sample_variance(&self) -> f64 {
        self.moments.sample_variance()
    }

    /// Population standard deviation, NaN with fewer than two samples
    pub fn std_dev(&self) -> f64 {
        self.moments.std_dev()
    }

    /// Smallest sample, `None` while empty
    pub fn try_min(&self) -> Option<f64> {
        self.moments.try_min()
    }

    /// Largest sample, `None` while empty
    pub fn try_max(&self) -> Option<f64> {
        self.moments.try_max()
    }

    /// Average, `None` while empty
    pub fn try_average(&self) -> Option<f64> {
        self.moments.try_average()
    }

    /// Population variance, `None` with fewer than two samples
    pub fn try_variance(&self) -> Option<f64> {
        self.moments.try_variance()
    }

    /// Population standard deviation, `None` with fewer than two samples
    pub fn try_std_dev(&self) -> Option<f64> {
        self.moments.try_std_dev()
    }

    /// Count in bin `index`, `None` if there is no such bin
    ///
    /// Out-of-range samples are available separately from
    /// [`out_of_range`](Self::out_of_range).
    pub fn bin(&self, index: usize) -> Option<u64> {
        self.histogram.get(index)
    }

    /// Count in bin `index`, or an error naming the valid bin count
    pub fn try_bin(&self, index: usize) -> Result<u64, BinError> {
        self.histogram.get(index).ok_or(BinError::IndexOutOfBounds {
            index,
            bin_count: self.histogram.bin_count(),
        })
    }

    /// All bin counts, lowest bin first
    pub fn bins(&self) -> &[u64] {
        self.histogram.bins()
    }

    /// Number of bins
    pub fn num_bins(&self) -> usize {
        self.histogram.bin_count()
    }

    /// Sum of all bin counts
    pub fn bin_total(&self) -> u64 {
        self.histogram.bin_total()
    }

    /// Samples that were not binned
    pub fn out_of_range(&self) -> u64 {
        self.histogram.out_of_range()
    }

    /// Currently binned range
    pub fn range(&self) -> BinRange {
        self.histogram.range()
    }

    /// Width of a single bin
    pub fn bin_width(&self) -> f64 {
        self.histogram.bin_width()
    }

    /// Bounds `[lo, hi)` of bin `index`
    pub fn bin_bounds(&self, index: usize) -> Option<(f64, f64)> {
        self.histogram.bin_bounds(index)
    }

    /// Whether the range grows to cover new samples
    pub fn is_adaptive(&self) -> bool {
        self.histogram.is_adaptive()
    }

    /// The moment accumulator
    pub fn moments(&self) -> &Moments {
        &self.moments
    }

    /// The histogram
    pub fn histogram(&self) -> &AdaptiveHistogram {
        &self.histogram
    }
}

impl Sketch for Stats {
    type Item = f64;

    fn update(&mut self, item: &Self::Item) {
        self.push(*item);
    }

    /// Merge another engine's samples into this one
    ///
    /// The histograms are merged first; if they are incompatible nothing changes.
    fn merge(&mut self, other: &Self) -> Result<(), MergeError> {
        self.histogram.merge_histogram(&other.histogram)?;
        self.moments.merge_moments(&other.moments);
        Ok(())
    }

    fn clear(&mut self) {
        self.moments.clear();
        self.histogram.clear();
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>() - core::mem::size_of::<AdaptiveHistogram>()
            + self.histogram.size_bytes()
            + self.identifier.capacity()
    }

    fn count(&self) -> u64 {
        self.moments.len()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Stats {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Stats", 3)?;
        state.serialize_field("identifier", &self.identifier)?;
        state.serialize_field("moments", &self.moments)?;
        state.serialize_field("histogram", &self.histogram)?;
        state.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Stats {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        #[derive(serde::Deserialize)]
        struct StatsData {
            identifier: String,
            moments: Moments,
            histogram: AdaptiveHistogram,
        }

        let data = StatsData::deserialize(deserializer)?;
        if data.histogram.count() != data.moments.len() {
            return Err(D::Error::custom(
                "bin counts and out-of-range tally do not add up to the sample count",
            ));
        }
        Ok(Stats {
            identifier: data.identifier,
            moments: data.moments,
            histogram: data.histogram,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let stats = Stats::with_range("empty", 4, true, 0.0, 1.0).unwrap();

        assert_eq!(stats.sample_count(), 0);
        assert!(stats.average().is_nan());
        assert!(stats.variance().is_nan());
        assert!(stats.std_dev().is_nan());
        assert_eq!(stats.min(), f64::INFINITY);
        assert_eq!(stats.max(), f64::NEG_INFINITY);
        assert_eq!(stats.try_min(), None);
        assert_eq!(stats.try_max(), None);
        assert_eq!(stats.try_average(), None);
        assert_eq!(stats.try_variance(), None);
        assert_eq!(stats.try_std_dev(), None);
        assert!(stats.is_adaptive());
        assert!(stats.is_empty());
    }

    #[test]
    fn test_one_two_three() {
        let mut stats = Stats::with_range("abc", 4, true, 0.0, 1.0).unwrap();
        for x in [1.0, 2.0, 3.0] {
            stats.push(x);
        }

        assert_eq!(stats.sample_count(), 3);
        assert_eq!(stats.average(), 2.0);
        assert!((stats.variance() - 2.0 / 3.0).abs() < 1e-12);
        assert!((stats.std_dev() - 0.8165).abs() < 1e-4);
        assert_eq!(stats.min(), 1.0);
        assert_eq!(stats.max(), 3.0);
        assert_eq!(stats.try_min(), Some(1.0));
        assert_eq!(stats.try_max(), Some(3.0));
        assert_eq!(stats.try_average(), Some(2.0));
        assert_eq!(stats.try_variance(), Some(stats.variance()));
        assert_eq!(stats.try_std_dev(), Some(stats.std_dev()));
    }

    #[test]
    fn test_fixed_range() {
        let mut stats = Stats::with_range("fixed", 4, false, 0.0, 4.0).unwrap();
        for x in [0.5, 1.5, 2.5, 3.5, 5.0] {
            stats.push(x);
        }

        assert!(!stats.is_adaptive());
        assert_eq!(stats.bins(), &[1, 1, 1, 1]);
        assert_eq!(stats.out_of_range(), 1);
        assert_eq!(stats.sample_count(), 5);
        assert_eq!(stats.max(), 5.0);
    }

    #[test]
    fn test_adaptive_keeps_old_sample() {
        let mut stats = Stats::with_range("grow", 4, true, 0.0, 1.0).unwrap();
        stats.push(0.5);
        stats.push(10.0);

        let range = stats.range();
        assert_eq!(range.min, 0.0);
        assert!(range.max > 10.0);
        assert_eq!(stats.bin_total(), 2);

        // 0.5 is still counted in the bin that now covers it
        let width = stats.bin_width();
        let idx = (0.5 / width) as usize;
        assert!(stats.bin(idx).unwrap() >= 1);
    }

    #[test]
    fn test_bin_queries() {
        let mut stats = Stats::with_range("q", 4, false, 0.0, 4.0).unwrap();
        stats.push(2.5);
        stats.push(7.0);

        assert_eq!(stats.bin(2), Some(1));
        assert_eq!(stats.bin(4), None);
        assert_eq!(stats.try_bin(2), Ok(1));
        assert_eq!(
            stats.try_bin(10),
            Err(BinError::IndexOutOfBounds {
                index: 10,
                bin_count: 4
            })
        );
        // The out-of-range tally is never returned through a bin query
        assert_eq!(stats.out_of_range(), 1);
        assert_eq!(stats.num_bins(), 4);
        assert_eq!(stats.bin_bounds(1), Some((1.0, 2.0)));
    }

    #[test]
    fn test_upper_bound_policy() {
        let mut fixed = Stats::with_range("edge", 4, false, 0.0, 4.0).unwrap();
        fixed.push(4.0);
        fixed.push(f64::from_bits(4.0f64.to_bits() - 1));
        assert_eq!(fixed.out_of_range(), 1);
        assert_eq!(fixed.bin(3), Some(1));

        let mut adaptive = Stats::with_range("edge", 4, true, 0.0, 4.0).unwrap();
        adaptive.push(4.0);
        assert_eq!(adaptive.range().max, 8.0);
        assert_eq!(adaptive.bin(2), Some(1));
        assert_eq!(adaptive.out_of_range(), 0);
    }

    #[test]
    fn test_invalid_config() {
        assert_eq!(
            Stats::with_range("bad", 5, true, 0.0, 1.0).unwrap_err(),
            ConfigError::OddBinCount(5)
        );
        assert!(Stats::with_range("bad", 4, true, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_merge() {
        let mut a = Stats::with_range("a", 4, true, 0.0, 4.0).unwrap();
        let mut b = Stats::with_range("b", 4, true, 0.0, 4.0).unwrap();
        for x in [1.0, 2.0, 3.0] {
            a.push(x);
        }
        for x in [4.0, 5.0, 6.0] {
            b.push(x);
        }

        a.merge(&b).unwrap();
        assert_eq!(a.sample_count(), 6);
        assert!((a.average() - 3.5).abs() < 1e-12);
        assert_eq!(a.range(), BinRange { min: 0.0, max: 8.0 });
        assert_eq!(a.bin_total(), 6);
        assert_eq!(a.identifier(), "a");
    }

    #[test]
    fn test_merge_incompatible_leaves_moments() {
        let mut a = Stats::with_range("a", 4, false, 0.0, 4.0).unwrap();
        let mut b = Stats::with_range("b", 8, false, 0.0, 4.0).unwrap();
        a.push(1.0);
        b.push(2.0);

        assert!(a.merge(&b).is_err());
        assert_eq!(a.sample_count(), 1);
    }

    #[test]
    fn test_clear() {
        let mut stats = Stats::with_range("c", 4, true, 0.0, 1.0).unwrap();
        stats.push(100.0);
        stats.clear();

        assert_eq!(stats.sample_count(), 0);
        assert_eq!(stats.bin_total(), 0);
        assert_eq!(stats.range(), BinRange { min: 0.0, max: 1.0 });
    }

    #[test]
    fn test_size_bytes_is_fixed() {
        let mut stats = Stats::with_range("s", 64, true, 0.0, 1.0).unwrap();
        let before = stats.size_bytes();
        for i in 0..10_000 {
            stats.push(i as f64 * 0.37 - 500.0);
        }
        assert_eq!(stats.size_bytes(), before);
        assert!(before >= 64 * 8);
    }
}

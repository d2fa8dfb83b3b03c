//! Running moments (count, sum, mean, variance, min, max)
//!
//! Computes streaming statistics using Welford's numerically stable online algorithm.
//! Supports merging for distributed computation.

use crate::math;
use crate::traits::{MergeError, Sketch};

/// Running moment accumulator using Welford's algorithm
///
/// Tracks count, sum, mean, variance, min and max in a single pass with O(1)
/// memory. The average is reported from the plain running sum; the variance
/// comes from Welford's `M2` accumulator so it does not suffer catastrophic
/// cancellation.
///
/// Undefined statistics are reported as `NaN` (average of nothing, variance
/// of fewer than two samples) and min/max report `+inf`/`-inf` while empty.
/// The `try_*` accessors return `None` in those cases instead.
///
/// # Example
///
/// ```
/// use binstats::statistics::Moments;
///
/// let mut moments = Moments::new();
///
/// for value in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     moments.add(value);
/// }
///
/// assert!((moments.average() - 5.0).abs() < 0.001);
/// assert!((moments.variance() - 4.0).abs() < 0.001);
/// assert!((moments.std_dev() - 2.0).abs() < 0.001);
/// assert_eq!(moments.min(), 2.0);
/// assert_eq!(moments.try_max(), Some(9.0));
/// ```
#[derive(Clone, Debug)]
pub struct Moments {
    /// Number of values seen
    count: u64,
    /// Running sum, used for the average
    sum: f64,
    /// Running mean
    mean: f64,
    /// Sum of squared differences from mean (M2 in Welford's algorithm)
    m2: f64,
    /// Minimum value
    min: f64,
    /// Maximum value
    max: f64,
}

impl Default for Moments {
    fn default() -> Self {
        Self::new()
    }
}

impl Moments {
    /// Create a new empty accumulator
    pub fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Add a value
    ///
    /// Every value is counted, NaN included; a NaN poisons the average and
    /// variance from then on.
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;

        // Welford's algorithm
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;

        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Get the number of values
    pub fn len(&self) -> u64 {
        self.count
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Get the sum of all values
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Get the average, or NaN if no value was added
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }

    /// Get the population variance, or NaN with fewer than two values
    ///
    /// Use `sample_variance()` if the data is a sample.
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            f64::NAN
        } else {
            self.m2 / self.count as f64
        }
    }

    /// Get the sample variance (Bessel's correction), or NaN with fewer than two values
    pub fn sample_variance(&self) -> f64 {
        if self.count < 2 {
            f64::NAN
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Get the population standard deviation, NaN when the variance is
    pub fn std_dev(&self) -> f64 {
        let variance = self.variance();
        if variance.is_nan() {
            f64::NAN
        } else {
            math::sqrt(variance)
        }
    }

    /// Get the minimum value, `+inf` while empty
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Get the maximum value, `-inf` while empty
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Average, `None` while empty
    pub fn try_average(&self) -> Option<f64> {
        self.defined(self.average(), 1)
    }

    /// Population variance, `None` with fewer than two values
    pub fn try_variance(&self) -> Option<f64> {
        self.defined(self.variance(), 2)
    }

    /// Population standard deviation, `None` with fewer than two values
    pub fn try_std_dev(&self) -> Option<f64> {
        self.defined(self.std_dev(), 2)
    }

    /// Minimum, `None` while empty
    pub fn try_min(&self) -> Option<f64> {
        self.defined(self.min, 1)
    }

    /// Maximum, `None` while empty
    pub fn try_max(&self) -> Option<f64> {
        self.defined(self.max, 1)
    }

    fn defined(&self, value: f64, needed: u64) -> Option<f64> {
        if self.count < needed {
            None
        } else {
            Some(value)
        }
    }

    /// Merge with another accumulator using the parallel algorithm
    ///
    /// Uses Chan et al.'s parallel algorithm for combining statistics.
    pub fn merge_moments(&mut self, other: &Self) {
        if other.count == 0 {
            return;
        }

        if self.count == 0 {
            *self = other.clone();
            return;
        }

        let combined_count = self.count + other.count;
        let delta = other.mean - self.mean;

        let combined_mean = self.mean + delta * (other.count as f64 / combined_count as f64);

        // Combined M2 (Chan et al.'s parallel algorithm)
        let combined_m2 = self.m2
            + other.m2
            + delta * delta * (self.count as f64 * other.count as f64 / combined_count as f64);

        self.count = combined_count;
        self.sum += other.sum;
        self.mean = combined_mean;
        self.m2 = combined_m2;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }
}

impl Sketch for Moments {
    type Item = f64;

    fn update(&mut self, item: &Self::Item) {
        self.add(*item);
    }

    fn merge(&mut self, other: &Self) -> Result<(), MergeError> {
        self.merge_moments(other);
        Ok(())
    }

    fn clear(&mut self) {
        *self = Self::new();
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>()
    }

    fn count(&self) -> u64 {
        self.count
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Moments {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Moments", 6)?;
        state.serialize_field("count", &self.count)?;
        state.serialize_field("sum", &self.sum)?;
        state.serialize_field("mean", &self.mean)?;
        state.serialize_field("m2", &self.m2)?;
        // Infinite sentinels do not survive every format, so emptiness is explicit
        state.serialize_field("min", &self.try_min())?;
        state.serialize_field("max", &self.try_max())?;
        state.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Moments {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct MomentsData {
            count: u64,
            sum: f64,
            mean: f64,
            m2: f64,
            min: Option<f64>,
            max: Option<f64>,
        }

        let data = MomentsData::deserialize(deserializer)?;
        Ok(Moments {
            count: data.count,
            sum: data.sum,
            mean: data.mean,
            m2: data.m2,
            min: data.min.unwrap_or(f64::INFINITY),
            max: data.max.unwrap_or(f64::NEG_INFINITY),
        })
    }
}

//! Half-open value range covered by a histogram

use crate::math;

/// Half-open interval `[min, max)` split into equal-width bins
///
/// `min < max` always holds and both bounds are finite.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinRange {
    /// Inclusive lower bound
    pub min: f64,
    /// Exclusive upper bound
    pub max: f64,
}

impl BinRange {
    pub(crate) fn new(min: f64, max: f64) -> Self {
        debug_assert!(min < max);
        Self { min, max }
    }

    /// Width of the whole range
    #[inline]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Check `min <= value < max`
    ///
    /// NaN is never contained.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value < self.max
    }

    /// Width of one of `bin_count` bins
    #[inline]
    pub fn bin_width(&self, bin_count: usize) -> f64 {
        self.width() / bin_count as f64
    }

    /// Bounds `[lo, hi)` of bin `index` of `bin_count`
    pub fn bin_bounds(&self, index: usize, bin_count: usize) -> Option<(f64, f64)> {
        if index >= bin_count {
            return None;
        }
        let bin_width = self.bin_width(bin_count);
        let lo = self.min + bin_width * index as f64;
        let hi = if index + 1 == bin_count {
            self.max
        } else {
            self.min + bin_width * (index + 1) as f64
        };
        Some((lo, hi))
    }

    /// Raw bin index of a contained value, before any bounds guard
    ///
    /// Returns `None` when the value is outside the range. The result can
    /// equal `bin_count` for values a rounding step below `max`.
    pub(crate) fn raw_index(&self, value: f64, bin_count: usize) -> Option<usize> {
        if !self.contains(value) {
            return None;
        }
        // Divide first so ranges near f64::MAX wide do not overflow
        let scaled = (value - self.min) / self.width() * bin_count as f64;
        Some(math::floor(scaled) as usize)
    }

    /// Range with the width doubled, `min` held fixed
    ///
    /// `None` when the doubled range would not be finite or would not grow.
    pub(crate) fn doubled_up(&self) -> Option<Self> {
        let max = self.min + 2.0 * self.width();
        if !max.is_finite() || !(max - self.min).is_finite() || max <= self.max {
            return None;
        }
        Some(Self { min: self.min, max })
    }

    /// Range with the width doubled, `max` held fixed
    pub(crate) fn doubled_down(&self) -> Option<Self> {
        let min = self.max - 2.0 * self.width();
        if !min.is_finite() || !(self.max - min).is_finite() || min >= self.min {
            return None;
        }
        Some(Self { min, max: self.max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let range = BinRange::new(0.0, 4.0);
        assert!(range.contains(0.0));
        assert!(range.contains(3.999));
        assert!(!range.contains(4.0));
        assert!(!range.contains(-0.001));
        assert!(!range.contains(f64::NAN));
    }

    #[test]
    fn test_bin_bounds_tile_range() {
        let range = BinRange::new(-2.0, 6.0);
        let mut prev_hi = range.min;
        for i in 0..4 {
            let (lo, hi) = range.bin_bounds(i, 4).unwrap();
            assert_eq!(lo, prev_hi);
            assert!((hi - lo - 2.0).abs() < 1e-12);
            prev_hi = hi;
        }
        assert_eq!(prev_hi, range.max);
        assert_eq!(range.bin_bounds(4, 4), None);
    }

    #[test]
    fn test_raw_index() {
        let range = BinRange::new(0.0, 4.0);
        assert_eq!(range.raw_index(0.0, 4), Some(0));
        assert_eq!(range.raw_index(1.5, 4), Some(1));
        assert_eq!(range.raw_index(3.5, 4), Some(3));
        assert_eq!(range.raw_index(4.0, 4), None);
        assert_eq!(range.raw_index(-1.0, 4), None);
    }

    #[test]
    fn test_raw_index_rounding_at_upper_edge() {
        // The float just below -7 lands at index 2 of 2 after rounding
        let range = BinRange::new(-20.0, -7.0);
        let below_max = f64::from_bits((-7.0f64).to_bits() + 1);
        assert!(range.contains(below_max));
        assert_eq!(range.raw_index(below_max, 2), Some(2));
    }

    #[test]
    fn test_wide_range_stays_finite() {
        let range = BinRange::new(0.0, 1.0e308);
        assert_eq!(range.raw_index(0.6e308, 4), Some(2));
        assert_eq!(range.raw_index(0.1e308, 4), Some(0));

        for i in 0..4 {
            let (lo, hi) = range.bin_bounds(i, 4).unwrap();
            assert!(lo.is_finite() && hi.is_finite());
            assert!(lo < hi);
        }
        let (lo, hi) = range.bin_bounds(2, 4).unwrap();
        assert!(lo <= 0.6e308 && 0.6e308 < hi);
        assert_eq!(range.bin_bounds(3, 4).unwrap().1, 1.0e308);
    }

    #[test]
    fn test_doubling() {
        let range = BinRange::new(1.0, 3.0);
        assert_eq!(range.doubled_up(), Some(BinRange::new(1.0, 5.0)));
        assert_eq!(range.doubled_down(), Some(BinRange::new(-1.0, 3.0)));

        let huge = BinRange::new(0.0, f64::MAX);
        assert_eq!(huge.doubled_up(), None);
        assert_eq!(huge.doubled_down(), None);
    }
}

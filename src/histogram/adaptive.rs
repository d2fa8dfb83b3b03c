//! Fixed-capacity histogram whose range grows by in-place bin merging
//!
//! The bin buffer is allocated once, at construction, and never resized. When
//! adaptive mode is on and a sample lands outside the covered range, the range
//! doubles and the bins are folded pairwise so that the same buffer now
//! describes twice the width at half the resolution. Folding only ever moves
//! counts between slots, so no sample is lost or counted twice.

use super::range::BinRange;
use crate::config::validate_layout;
use crate::traits::{ConfigError, MergeError, Sketch};
use log::{debug, trace, warn};

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, format, vec};

/// Histogram over `[min, max)` with a fixed number of equal-width bins
///
/// # Range extension
///
/// With adaptive mode on, a sample `x >= max` doubles the range upward
/// (holding `min`) and a sample `x < min` doubles it downward (holding `max`),
/// as many times as needed to cover `x`. Each doubling folds adjacent bin pairs
/// into one half of the buffer and leaves the other half empty.
///
/// Without adaptive mode the range never changes and samples outside it are
/// tallied in [`out_of_range`](Self::out_of_range).
///
/// # Example
///
/// ```
/// use binstats::histogram::AdaptiveHistogram;
///
/// let mut hist = AdaptiveHistogram::new(4, true, 0.0, 1.0).unwrap();
/// hist.add(0.5);
/// hist.add(10.0);
///
/// assert_eq!(hist.range().min, 0.0);
/// assert!(hist.range().max > 10.0);
/// assert_eq!(hist.bin_total(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct AdaptiveHistogram {
    /// Per-bin counts, length fixed at construction
    bins: Box<[u64]>,
    /// Currently covered range
    range: BinRange,
    /// Range at construction, restored by `clear`
    initial: BinRange,
    /// Samples that were not binned
    out_of_range: u64,
    adaptive: bool,
}

impl AdaptiveHistogram {
    /// Create an empty histogram with `bin_count` bins over `[min, max)`
    ///
    /// `bin_count` must be even and positive; the bounds must be finite with
    /// `min < max`.
    pub fn new(bin_count: usize, adaptive: bool, min: f64, max: f64) -> Result<Self, ConfigError> {
        validate_layout(bin_count, min, max)?;
        let range = BinRange::new(min, max);
        Ok(Self {
            bins: vec![0u64; bin_count].into_boxed_slice(),
            range,
            initial: range,
            out_of_range: 0,
            adaptive,
        })
    }

    /// Add a sample
    ///
    /// Returns the index of the bin that received it, or `None` when it was
    /// tallied as out-of-range.
    pub fn add(&mut self, value: f64) -> Option<usize> {
        if self.adaptive {
            self.extend_to_cover(value);
        }

        let bin_count = self.bins.len();
        match self.range.raw_index(value, bin_count) {
            Some(idx) if idx < bin_count => {
                self.bins[idx] += 1;
                Some(idx)
            }
            Some(idx) => {
                // value < max, so the last bin is where it belongs
                warn!(
                    "sample {} mapped to bin {} of {} in [{}, {}); using last bin",
                    value, idx, bin_count, self.range.min, self.range.max
                );
                self.bins[bin_count - 1] += 1;
                Some(bin_count - 1)
            }
            None => {
                debug!(
                    "sample {} out of bins range [{}, {})",
                    value, self.range.min, self.range.max
                );
                self.out_of_range += 1;
                None
            }
        }
    }

    /// Double the range until it covers `value`
    ///
    /// Non-finite values never trigger an extension.
    fn extend_to_cover(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        while value >= self.range.max {
            if !self.extend_up() {
                return;
            }
        }
        while value < self.range.min {
            if !self.extend_down() {
                return;
            }
        }
    }

    /// One upward extension pass; false if the range cannot double
    fn extend_up(&mut self) -> bool {
        let Some(next) = self.range.doubled_up() else {
            warn!(
                "cannot extend [{}, {}) upward without overflow",
                self.range.min, self.range.max
            );
            return false;
        };
        trace!("extending up to [{}, {})", next.min, next.max);
        self.range = next;
        fold_toward_start(&mut self.bins);
        true
    }

    /// One downward extension pass; false if the range cannot double
    fn extend_down(&mut self) -> bool {
        let Some(next) = self.range.doubled_down() else {
            warn!(
                "cannot extend [{}, {}) downward without overflow",
                self.range.min, self.range.max
            );
            return false;
        };
        trace!("extending down to [{}, {})", next.min, next.max);
        self.range = next;
        fold_toward_end(&mut self.bins);
        true
    }

    /// Currently covered range
    pub fn range(&self) -> BinRange {
        self.range
    }

    /// Number of bins
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    /// All bin counts, lowest bin first
    pub fn bins(&self) -> &[u64] {
        &self.bins
    }

    /// Count in bin `index`, `None` if there is no such bin
    pub fn get(&self, index: usize) -> Option<u64> {
        self.bins.get(index).copied()
    }

    /// Bounds `[lo, hi)` of bin `index`
    pub fn bin_bounds(&self, index: usize) -> Option<(f64, f64)> {
        self.range.bin_bounds(index, self.bins.len())
    }

    /// Width of a single bin
    pub fn bin_width(&self) -> f64 {
        self.range.bin_width(self.bins.len())
    }

    /// Samples that were not binned
    pub fn out_of_range(&self) -> u64 {
        self.out_of_range
    }

    /// Sum of all bin counts
    pub fn bin_total(&self) -> u64 {
        self.bins.iter().sum()
    }

    /// Whether the range grows to cover new samples
    pub fn is_adaptive(&self) -> bool {
        self.adaptive
    }

    /// Merge another histogram's counts into this one
    ///
    /// An adaptive histogram first extends to cover the other's range. The
    /// other's bins must then each fall inside a single bin of this one.
    pub fn merge_histogram(&mut self, other: &Self) -> Result<(), MergeError> {
        let bin_count = self.bins.len();
        if other.bins.len() != bin_count {
            return Err(MergeError::IncompatibleConfig {
                expected: format!("{} bins", bin_count),
                found: format!("{} bins", other.bins.len()),
            });
        }

        // Plan the extension on the range alone so a failure leaves self untouched
        let mut range = self.range;
        let mut passes_up = 0usize;
        let mut passes_down = 0usize;
        if self.adaptive {
            while other.range.max > range.max {
                range = range.doubled_up().ok_or(MergeError::MisalignedBins)?;
                passes_up += 1;
            }
            while other.range.min < range.min {
                range = range.doubled_down().ok_or(MergeError::MisalignedBins)?;
                passes_down += 1;
            }
        }
        let (offset, ratio) = nesting(&range, &other.range, bin_count)?;

        for _ in 0..passes_up {
            fold_toward_start(&mut self.bins);
        }
        for _ in 0..passes_down {
            fold_toward_end(&mut self.bins);
        }
        self.range = range;

        for (j, &c) in other.bins.iter().enumerate() {
            self.bins[(offset + j) / ratio] += c;
        }
        self.out_of_range += other.out_of_range;
        Ok(())
    }
}

/// Locate `inner`'s grid inside `outer`'s
///
/// Returns `(offset, ratio)` such that inner bin `j` falls in outer bin
/// `(offset + j) / ratio`.
fn nesting(outer: &BinRange, inner: &BinRange, bin_count: usize) -> Result<(usize, usize), MergeError> {
    if inner.min < outer.min || inner.max > outer.max {
        return Err(MergeError::MisalignedBins);
    }
    let inner_width = inner.bin_width(bin_count);
    let ratio = outer.bin_width(bin_count) / inner_width;
    let offset = (inner.min - outer.min) / inner_width;
    if ratio < 1.0 || ratio.fract() != 0.0 || offset.fract() != 0.0 {
        return Err(MergeError::MisalignedBins);
    }
    Ok((offset as usize, ratio as usize))
}

/// Fold bin pairs into the lower half after an upward doubling
///
/// New bin `i` holds old bins `2i` and `2i + 1`; the upper half is left empty.
/// Ascending order means every slot is read before it is overwritten.
pub(crate) fn fold_toward_start(bins: &mut [u64]) {
    let half = bins.len() / 2;
    bins[0] += bins[1];
    bins[1] = 0;
    for i in 1..half {
        bins[i] = bins[2 * i] + bins[2 * i + 1];
        bins[2 * i] = 0;
        bins[2 * i + 1] = 0;
    }
}

/// Fold bin pairs into the upper half after a downward doubling
///
/// Mirror of [`fold_toward_start`]: the lower half is left empty.
pub(crate) fn fold_toward_end(bins: &mut [u64]) {
    let n = bins.len();
    let half = n / 2;
    bins[n - 1] += bins[n - 2];
    bins[n - 2] = 0;
    for i in 1..half {
        bins[n - 1 - i] = bins[n - 1 - 2 * i] + bins[n - 2 - 2 * i];
        bins[n - 1 - 2 * i] = 0;
        bins[n - 2 - 2 * i] = 0;
    }
}

impl Sketch for AdaptiveHistogram {
    type Item = f64;

    fn update(&mut self, item: &Self::Item) {
        self.add(*item);
    }

    fn merge(&mut self, other: &Self) -> Result<(), MergeError> {
        self.merge_histogram(other)
    }

    fn clear(&mut self) {
        self.bins.iter_mut().for_each(|c| *c = 0);
        self.range = self.initial;
        self.out_of_range = 0;
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>() + self.bins.len() * core::mem::size_of::<u64>()
    }

    fn count(&self) -> u64 {
        self.bin_total() + self.out_of_range
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for AdaptiveHistogram {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("AdaptiveHistogram", 5)?;
        state.serialize_field("bins", &self.bins)?;
        state.serialize_field("range", &self.range)?;
        state.serialize_field("initial", &self.initial)?;
        state.serialize_field("out_of_range", &self.out_of_range)?;
        state.serialize_field("adaptive", &self.adaptive)?;
        state.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for AdaptiveHistogram {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        #[derive(serde::Deserialize)]
        struct HistogramData {
            bins: Box<[u64]>,
            range: BinRange,
            initial: BinRange,
            out_of_range: u64,
            adaptive: bool,
        }

        let data = HistogramData::deserialize(deserializer)?;
        validate_layout(data.bins.len(), data.range.min, data.range.max).map_err(D::Error::custom)?;
        validate_layout(data.bins.len(), data.initial.min, data.initial.max)
            .map_err(D::Error::custom)?;
        Ok(AdaptiveHistogram {
            bins: data.bins,
            range: data.range,
            initial: data.initial,
            out_of_range: data.out_of_range,
            adaptive: data.adaptive,
        })
    }
}

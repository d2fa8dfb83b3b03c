//! Core trait and error types
//!
//! Every accumulator in this crate implements the base [`Sketch`] trait, so a
//! moment accumulator, a bare histogram and the combined [`Stats`](crate::Stats)
//! engine can all be fed, merged and reset the same way.

use core::fmt::Debug;

#[cfg(not(feature = "std"))]
use alloc::string::String;

/// Error during sketch merge operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// Sketches have incompatible configurations
    IncompatibleConfig { expected: String, found: String },
    /// The other histogram's bins do not nest inside this histogram's bins
    MisalignedBins,
}

impl core::fmt::Display for MergeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MergeError::IncompatibleConfig { expected, found } => {
                write!(f, "incompatible config: expected {}, found {}", expected, found)
            }
            MergeError::MisalignedBins => {
                write!(f, "histogram bins are not aligned on a common grid")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MergeError {}

/// Error while validating a histogram configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Bin count was zero
    ZeroBins,
    /// Bin count was odd; pairwise merging needs an even count
    OddBinCount(usize),
    /// A range bound was NaN or infinite
    NonFiniteBound,
    /// `min >= max`
    EmptyRange { min: f64, max: f64 },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroBins => write!(f, "bin count must be positive"),
            ConfigError::OddBinCount(n) => write!(f, "bin count must be even, got {}", n),
            ConfigError::NonFiniteBound => write!(f, "range bounds must be finite"),
            ConfigError::EmptyRange { min, max } => {
                write!(f, "empty range: min {} is not below max {}", min, max)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Error for a per-bin query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinError {
    /// Requested bin does not exist
    IndexOutOfBounds { index: usize, bin_count: usize },
}

impl core::fmt::Display for BinError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BinError::IndexOutOfBounds { index, bin_count } => {
                write!(f, "bin index {} out of bounds for {} bins", index, bin_count)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BinError {}

/// Core trait for all streaming accumulators
pub trait Sketch: Clone + Debug {
    /// The type of item this sketch processes
    type Item: ?Sized;

    /// Add an item to the sketch
    fn update(&mut self, item: &Self::Item);

    /// Merge another sketch into this one
    ///
    /// Returns an error if sketches are incompatible; `self` is unchanged in that case.
    fn merge(&mut self, other: &Self) -> Result<(), MergeError>;

    /// Reset sketch to empty state
    fn clear(&mut self);

    /// Memory usage in bytes
    fn size_bytes(&self) -> usize;

    /// Number of items processed
    fn count(&self) -> u64;

    /// Check if sketch is empty
    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::OddBinCount(5);
        assert_eq!(format!("{}", err), "bin count must be even, got 5");

        let err = ConfigError::EmptyRange { min: 2.0, max: 1.0 };
        assert_eq!(format!("{}", err), "empty range: min 2 is not below max 1");

        let err = BinError::IndexOutOfBounds {
            index: 9,
            bin_count: 8,
        };
        assert_eq!(format!("{}", err), "bin index 9 out of bounds for 8 bins");

        let err = MergeError::IncompatibleConfig {
            expected: "8 bins".into(),
            found: "4 bins".into(),
        };
        assert_eq!(
            format!("{}", err),
            "incompatible config: expected 8 bins, found 4 bins"
        );
    }
}

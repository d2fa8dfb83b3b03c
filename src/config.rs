//! Construction configuration for [`Stats`](crate::Stats)
//!
//! A configuration names the engine, fixes the number of histogram bins for
//! the lifetime of the instance and sets the initial binned range.

use crate::traits::ConfigError;

#[cfg(not(feature = "std"))]
use alloc::string::String;

/// Configuration for a statistics engine
///
/// # Example
///
/// ```
/// use binstats::StatsConfig;
///
/// let config = StatsConfig::new("latency", 16, 0.0, 10.0).with_adaptive(true);
/// assert!(config.validate().is_ok());
/// assert!(config.is_power_of_two_bins());
///
/// let bad = StatsConfig::new("odd", 7, 0.0, 10.0);
/// assert!(bad.validate().is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsConfig {
    /// Label used only by reports
    pub identifier: String,
    /// Number of histogram bins, even and at least 2
    pub bin_count: usize,
    /// Whether the binned range grows to cover out-of-range samples
    #[cfg_attr(feature = "serde", serde(default))]
    pub adaptive: bool,
    /// Inclusive lower bound of the initial range
    pub range_min: f64,
    /// Exclusive upper bound of the initial range
    pub range_max: f64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            identifier: String::from("stats"),
            bin_count: 16,
            adaptive: true,
            range_min: 0.0,
            range_max: 1.0,
        }
    }
}

impl StatsConfig {
    /// Create a non-adaptive configuration over `[range_min, range_max)`
    pub fn new(identifier: impl Into<String>, bin_count: usize, range_min: f64, range_max: f64) -> Self {
        Self {
            identifier: identifier.into(),
            bin_count,
            adaptive: false,
            range_min,
            range_max,
        }
    }

    /// Set adaptive mode
    pub fn with_adaptive(mut self, adaptive: bool) -> Self {
        self.adaptive = adaptive;
        self
    }

    /// Set the number of bins
    pub fn with_bin_count(mut self, bin_count: usize) -> Self {
        self.bin_count = bin_count;
        self
    }

    /// Set the initial range
    pub fn with_range(mut self, range_min: f64, range_max: f64) -> Self {
        self.range_min = range_min;
        self.range_max = range_max;
        self
    }

    /// Set the report label
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Check the bin count and range
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_layout(self.bin_count, self.range_min, self.range_max)
    }

    /// Whether the bin count is a power of two
    ///
    /// Any even count keeps every doubling exact; a power of two additionally
    /// keeps bin edges on a binary grid, which histogram merges rely on.
    pub fn is_power_of_two_bins(&self) -> bool {
        self.bin_count.is_power_of_two()
    }
}

/// Validate a bin count and range pair
pub(crate) fn validate_layout(bin_count: usize, min: f64, max: f64) -> Result<(), ConfigError> {
    if bin_count == 0 {
        return Err(ConfigError::ZeroBins);
    }
    if bin_count % 2 != 0 {
        return Err(ConfigError::OddBinCount(bin_count));
    }
    if !min.is_finite() || !max.is_finite() {
        return Err(ConfigError::NonFiniteBound);
    }
    if min >= max || !(max - min).is_finite() {
        return Err(ConfigError::EmptyRange { min, max });
    }
    Ok(())
}

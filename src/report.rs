//! Text reports over a [`Stats`] engine
//!
//! Reports only read the engine's public accessors and write to any
//! [`core::fmt::Write`] sink, so they work the same into a `String`, a
//! formatter, or a serial-port adapter on a device.

use crate::stats::Stats;
use core::fmt::{self, Write};

/// Default bar length of the histogram chart, in characters
pub const DEFAULT_BAR_WIDTH: usize = 40;

/// Summary line and bar chart for a [`Stats`] engine
///
/// # Example
///
/// ```
/// use binstats::{Report, Stats};
///
/// let mut stats = Stats::with_range("adc", 4, false, 0.0, 4.0).unwrap();
/// for x in [1.0, 2.0, 3.0] {
///     stats.push(x);
/// }
///
/// let text = Report::new(&stats).to_string();
/// assert!(text.starts_with("Stats adc has 3 samples"));
/// assert!(text.ends_with("out of range : 0\n"));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Report<'a> {
    stats: &'a Stats,
    bar_width: usize,
}

impl<'a> Report<'a> {
    /// Report over `stats` with the default bar width
    pub fn new(stats: &'a Stats) -> Self {
        Self {
            stats,
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }

    /// Set the length of a full bar
    pub fn with_bar_width(mut self, bar_width: usize) -> Self {
        self.bar_width = bar_width;
        self
    }

    /// Write the one-line summary
    pub fn write_summary<W: Write>(&self, out: &mut W) -> fmt::Result {
        let stats = self.stats;
        writeln!(
            out,
            "Stats {} has {} samples, min {:.3} to max {:.3}, average {:.3}, stdDev {:.3}",
            stats.identifier(),
            stats.sample_count(),
            stats.min(),
            stats.max(),
            stats.average(),
            stats.std_dev()
        )
    }

    /// Write one bar per bin, then the out-of-range tally
    ///
    /// Bars are scaled so the fullest bin spans the whole bar width.
    pub fn write_histogram<W: Write>(&self, out: &mut W) -> fmt::Result {
        let stats = self.stats;
        let total = stats.sample_count();
        if total == 0 {
            return writeln!(out, "No sample recorded yet.");
        }

        let fullest = stats.bins().iter().copied().max().unwrap_or(0);
        for (i, &count) in stats.bins().iter().enumerate() {
            let Some((lo, hi)) = stats.bin_bounds(i) else {
                continue;
            };
            let bar = if fullest == 0 {
                0
            } else {
                (self.bar_width as u64 * count / fullest) as usize
            };

            write!(out, "[{:.3}; {:.3}[ : ", lo, hi)?;
            for j in 0..self.bar_width {
                out.write_char(if j < bar { '#' } else { ' ' })?;
            }
            writeln!(
                out,
                "  {} samples \t({:.3}%)",
                count,
                100.0 * count as f64 / total as f64
            )?;
        }
        writeln!(out, "out of range : {}", stats.out_of_range())
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_summary(f)?;
        self.write_histogram(f)
    }
}

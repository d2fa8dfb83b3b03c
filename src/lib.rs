//! # Binstats
//!
//! Fixed-memory streaming statistics for constrained devices.
//!
//! Binstats ingests floating-point samples one at a time and keeps, in
//! constant memory, the running count, min, max, average and variance of the
//! stream together with an approximate distribution histogram.
//!
//! ## Features
//!
//! - **Running moments**: count, sum, min, max, average and variance via
//!   Welford's online algorithm
//! - **Adaptive histogram**: a fixed bin buffer whose range doubles on demand by
//!   folding bin pairs in place, never reallocating and never losing counts
//! - **Explicit undefined values**: `NaN` sentinels with `Option`-returning
//!   companions, and checked bin queries
//! - **Mergeability**: engines built from the same configuration can be combined
//!
//! ## Quick Start
//!
//! ```rust
//! use binstats::prelude::*;
//!
//! let config = StatsConfig::new("loop_time", 8, 0.0, 1.0).with_adaptive(true);
//! let mut stats = Stats::new(config).unwrap();
//!
//! for x in [0.2, 0.4, 3.5, 0.9] {
//!     stats.push(x);
//! }
//!
//! assert_eq!(stats.sample_count(), 4);
//! assert!(stats.range().contains(3.5));
//! assert_eq!(stats.bin_total() + stats.out_of_range(), 4);
//! println!("{}", Report::new(&stats));
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Standard library support; without it the crate is
//!   `no_std` and needs only `alloc` for the bin buffer
//! - `serde`: Enable serialization
//!
//! ## Logging
//!
//! Range extensions are logged at `trace`, unbinned samples at `debug` and
//! floating-point boundary faults at `warn`, through the [`log`] facade.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod math;

pub mod config;
pub mod histogram;
pub mod report;
pub mod statistics;
pub mod stats;
pub mod traits;

pub mod prelude {
    pub use crate::traits::*;

    pub use crate::config::StatsConfig;
    pub use crate::histogram::{AdaptiveHistogram, BinRange};
    pub use crate::report::Report;
    pub use crate::statistics::Moments;
    pub use crate::stats::Stats;
}

pub use config::StatsConfig;
pub use histogram::{AdaptiveHistogram, BinRange};
pub use report::Report;
pub use statistics::Moments;
pub use stats::Stats;
pub use traits::{BinError, ConfigError, MergeError, Sketch};

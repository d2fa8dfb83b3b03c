//! Fixed-memory histograms
//!
//! # Algorithms
//!
//! - [`AdaptiveHistogram`]: equal-width bins over a half-open range that
//!   doubles by folding bin pairs in place, never reallocating
//!
//! # Example
//!
//! ```
//! use binstats::histogram::AdaptiveHistogram;
//!
//! let mut hist = AdaptiveHistogram::new(4, false, 0.0, 4.0).unwrap();
//!
//! for value in [0.5, 1.5, 2.5, 3.5, 5.0] {
//!     hist.add(value);
//! }
//!
//! assert_eq!(hist.bins(), &[1, 1, 1, 1]);
//! assert_eq!(hist.out_of_range(), 1);
//! ```

mod adaptive;
mod range;

pub use adaptive::AdaptiveHistogram;
pub use range::BinRange;

//! Statistical moments for streaming data
//!
//! This module computes count, sum, min, max, mean and variance over a
//! stream in a single pass with constant memory.
//!
//! # Example
//!
//! ```
//! use binstats::statistics::Moments;
//!
//! let mut moments = Moments::new();
//!
//! for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
//!     moments.add(value);
//! }
//!
//! println!("Average: {}", moments.average());
//! println!("Stddev: {}", moments.std_dev());
//! println!("Min: {:?}", moments.try_min());
//! println!("Max: {:?}", moments.try_max());
//! ```

mod moments;

pub use moments::Moments;

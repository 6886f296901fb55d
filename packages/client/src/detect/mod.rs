//! Timeout history detectors
//!
//! Two complementary views over recent outcomes: a run detector that trips
//! on W timeouts in a row, and a sliding window that trips when the timeout
//! share of the last K outcomes passes a threshold.

pub mod consecutive;
pub mod window;

pub use consecutive::ConsecutiveRunDetector;
pub use window::{SlidingWindowDetector, WindowSnapshot, WindowVerdict};

//! Adaptive controller configuration
//!
//! - `types`: the `AdaptiveConfig` struct and its validation
//! - `defaults`: named default constants and the `Default` impl
//! - `builders`: fluent `with_*` methods, one per construction option
//! - `millis`: serde adapter for millisecond durations

pub mod builders;
pub mod defaults;
pub mod millis;
pub mod types;

pub use types::AdaptiveConfig;

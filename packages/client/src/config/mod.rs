//! Configuration for the adaptive timeout controller
//!
//! Timeout values, escalation bounds and detector parameters, with
//! validation and JSON loading.

pub mod core;
pub mod timeouts;
pub mod validation;

pub use self::core::AdaptiveConfig;
pub use self::core::defaults::*;
pub use timeouts::{Dimension, TimeoutConfiguration};
pub use validation::{ConfigResult, ConfigValidator, ConfigurationError, Validator};

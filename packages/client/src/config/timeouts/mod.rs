//! Timeout dimensions and the configuration the controller escalates
//!
//! A `TimeoutConfiguration` is a plain value: escalation produces a new one
//! and the controller swaps it in whole.

pub mod dimension;
pub mod timeout_config;

pub use dimension::Dimension;
pub use timeout_config::TimeoutConfiguration;

//! Adaptive controller orchestration

pub mod core;
pub mod decision;

pub use self::core::AdaptiveController;
pub use decision::Decision;

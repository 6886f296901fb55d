//! Timeout escalation policy

pub mod engine;

pub use engine::{EscalationResult, compute_update};

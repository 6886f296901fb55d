//! Adaptive client builder
//!
//! Every construction option is a fluent method; validation runs once in
//! [`AdaptiveClientBuilder::build`].

pub mod core;

pub use self::core::AdaptiveClientBuilder;

//! Adaptive HTTP timeouts, public API
//!
//! Wraps any transport in an [`AdaptiveClient`] that classifies every
//! attempt, feeds the outcome to the timeout controller and swaps in a
//! rebuilt transport when a DNS or TLS timeout is escalated.
//!
//! ```
//! use std::time::Duration;
//! use pto::{Pto, TimeoutConfiguration};
//!
//! let client = Pto::builder()
//!     .default_timeout(Duration::from_millis(10))
//!     .transport_timeouts(Duration::from_millis(10), Duration::from_millis(10))
//!     .timeout_increment(Duration::from_millis(10))
//!     .consecutive_style(true)
//!     .build(|timeouts: &TimeoutConfiguration| timeouts.dns_timeout)
//!     .expect("valid config");
//! assert_eq!(*client.snapshot().transport, Duration::from_millis(10));
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod builder;
pub mod client;

pub use builder::AdaptiveClientBuilder;
pub use client::{AdaptiveClient, Attempt, AttemptError, Generation};

// Re-export important types from client package
pub use pto_client::prelude::*;
pub use pto_client::{Error, Result};

/// Main entry point
pub struct Pto;

impl Pto {
    /// Start configuring an [`AdaptiveClient`]
    #[must_use]
    pub fn builder() -> AdaptiveClientBuilder {
        AdaptiveClientBuilder::new()
    }

    /// Build a client from a complete configuration, e.g. parsed from JSON.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails validation.
    pub fn with_config<F: TransportFactory>(
        config: AdaptiveConfig,
        factory: F,
    ) -> Result<AdaptiveClient<F>> {
        AdaptiveClientBuilder::new().config(config).build(factory)
    }
}

/// Shorthand for [`Pto::builder`]
#[must_use]
pub fn builder() -> AdaptiveClientBuilder {
    Pto::builder()
}

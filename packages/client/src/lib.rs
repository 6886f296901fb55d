//! # Progressive Timeout Controller
//!
//! Adaptive timeout decision engine for HTTP clients. Every request outcome
//! is classified (success, DNS timeout, TLS timeout, request timeout or an
//! unmanaged failure) and fed to two detectors:
//!
//! - a **consecutive-run detector**, a W-bit rolling bitmap that trips when
//!   the last W outcomes were all timeouts
//! - a **sliding-window detector**, a FIFO of the last K outcomes that trips
//!   when a timeout insert pushes the timeout share over a threshold
//!
//! When an enabled detector trips, exactly one timeout dimension is raised
//! (DNS before TLS before the overall request) by a fixed increment, never
//! past the configured maximum.
//!
//! ## Usage
//!
//! ```
//! use std::time::Duration;
//! use pto_client::prelude::*;
//!
//! let config = AdaptiveConfig::default()
//!     .with_default_timeout(Duration::from_millis(10))
//!     .with_max_timeout(Duration::from_millis(10_000))
//!     .with_timeout_increment(Duration::from_millis(10))
//!     .with_consecutive_style(true);
//! let controller = AdaptiveController::new(config).expect("valid config");
//!
//! let mut next = controller.current();
//! for _ in 0..5 {
//!     let outcome = Outcome::new(Classification::RequestTimeout, "https://example.com", &next);
//!     next = controller.on_outcome(outcome);
//! }
//! assert_eq!(next.request_timeout, Duration::from_millis(20));
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classify;
pub mod config;
pub mod controller;
pub mod detect;
pub mod error;
pub mod escalation;
pub mod telemetry;
pub mod transport;

pub mod prelude;

pub use crate::error::{Error, Result};
pub use crate::prelude::*;

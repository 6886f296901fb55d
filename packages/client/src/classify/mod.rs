//! Outcome classification
//!
//! Maps what the transport reports about one request into a
//! [`Classification`], and packages it with phase timings as an [`Outcome`].

pub mod classification;
pub mod outcome;
pub mod signal;

pub use classification::{Classification, NO_TIMEOUT, TimeoutCause};
pub use outcome::{Outcome, Phase, PhaseTimings, TimeoutSnapshot};
pub use signal::{ErrorChain, FailurePhase, FailureSignal, classify, classify_error, classify_text};

//! Observability for the adaptive controller
//!
//! Event types, the injectable sink interface with its stock
//! implementations, and atomic running statistics.

pub mod controller_stats;
pub mod events;
pub mod sink;

pub use controller_stats::{ControllerStats, ControllerStatsSnapshot};
pub use events::ControllerEvent;
pub use sink::{NoopSink, ObservabilitySink, RecordingSink, TracingSink};

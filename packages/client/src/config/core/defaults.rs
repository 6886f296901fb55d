//! Default values for the adaptive controller
//!
//! Starting timeouts, increment and detector sizes are conservative: both
//! escalation styles ship disabled and must be switched on explicitly.

use std::time::Duration;

use super::types::AdaptiveConfig;
use crate::config::timeouts::TimeoutConfiguration;

/// Starting value for the request, DNS and TLS timeouts.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Amount added to a dimension on each escalation.
pub const DEFAULT_TIMEOUT_INCREMENT: Duration = Duration::from_millis(2000);

/// Ceiling no dimension may be escalated past.
pub const DEFAULT_MAX_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Consecutive timeouts needed before the run detector trips.
pub const DEFAULT_CONSECUTIVE_RUN_SIZE: u32 = 5;

/// Outcomes held by the sliding window.
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Timeout percentage the full window must exceed to escalate.
pub const DEFAULT_WINDOW_THRESHOLD_PERCENT: u8 = 70;

/// Widest run the consecutive detector's bitmap can hold.
pub const MAX_CONSECUTIVE_RUN_SIZE: u32 = u64::BITS;

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            timeouts: TimeoutConfiguration::default(),
            consecutive_run_size: DEFAULT_CONSECUTIVE_RUN_SIZE,
            consecutive_style_enabled: false,
            window_size: DEFAULT_WINDOW_SIZE,
            window_threshold_percent: DEFAULT_WINDOW_THRESHOLD_PERCENT,
            window_style_enabled: false,
        }
    }
}

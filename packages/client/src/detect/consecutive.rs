//! Consecutive-run detector
//!
//! The last W outcomes live in a W-bit rolling bitmap: a set bit is a
//! non-timeout, a clear bit a timeout. The cursor walks the bits modulo W,
//! so after W records every bit holds exactly one of the last W outcomes.
//! The run is complete when no bit under the mask is set.

use crate::config::MAX_CONSECUTIVE_RUN_SIZE;

/// Rolling "were the last W outcomes all timeouts" detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsecutiveRunDetector {
    bitmap: u64,
    mask: u64,
    cursor: u32,
    run_size: u32,
}

/// All-set mask covering the low `run_size` bits.
#[inline]
fn no_timeout_mask(run_size: u32) -> u64 {
    if run_size >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << run_size) - 1
    }
}

impl ConsecutiveRunDetector {
    /// Create a detector for runs of `run_size` timeouts.
    ///
    /// `run_size` is clamped to `1..=64`; configuration validation rejects
    /// values outside that range before they get here.
    #[must_use]
    pub fn new(run_size: u32) -> Self {
        let run_size = run_size.clamp(1, MAX_CONSECUTIVE_RUN_SIZE);
        let mask = no_timeout_mask(run_size);
        Self {
            bitmap: mask,
            mask,
            cursor: 0,
            run_size,
        }
    }

    /// Record one outcome. Returns true when the last W outcomes, this one
    /// included, were all timeouts.
    pub fn record(&mut self, is_timeout: bool) -> bool {
        let bit = 1u64 << self.cursor;
        if is_timeout {
            self.bitmap &= !bit;
        } else {
            self.bitmap |= bit;
        }
        self.cursor = (self.cursor + 1) % self.run_size;
        self.all_timeouts()
    }

    /// Whether every tracked slot currently holds a timeout.
    #[inline]
    #[must_use]
    pub fn all_timeouts(&self) -> bool {
        self.bitmap & self.mask == 0
    }

    /// Change W. History is discarded: cursor back to 0, every slot "no timeout".
    pub fn reconfigure(&mut self, run_size: u32) {
        *self = Self::new(run_size);
    }

    #[inline]
    #[must_use]
    pub fn run_size(&self) -> u32 {
        self.run_size
    }

    #[inline]
    #[must_use]
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// Raw bitmap, low W bits meaningful.
    #[inline]
    #[must_use]
    pub fn bitmap(&self) -> u64 {
        self.bitmap & self.mask
    }
}

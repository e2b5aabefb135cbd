//! Decoder configuration.
//!
//! All timing constants for one specific remote's modulation live here.
//! The defaults were measured against the reference hardware (an 80 MHz
//! core feeding the capture timer); other remotes or timer setups swap in
//! their own values instead of editing the classifier.

/// Pulse gaps up to this many microseconds classify as [`Symbol::Short`].
///
/// [`Symbol::Short`]: crate::pulse::Symbol::Short
pub const SHORT_MAX_US: u32 = 750;

/// Pulse gaps up to this many microseconds classify as [`Symbol::Long`].
///
/// [`Symbol::Long`]: crate::pulse::Symbol::Long
pub const LONG_MAX_US: u32 = 1450;

/// Capture counter ticks per microsecond on the reference board.
pub const TICKS_PER_US: u32 = 80;

/// Default stall watchdog threshold: ~50 ms without an edge mid-capture.
pub const STALL_TIMEOUT_US: u32 = 50_000;

/// Timing configuration for the pulse classifier and capture session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Upper bound (inclusive, µs) for a short pulse gap.
    pub short_max_us: u32,

    /// Upper bound (inclusive, µs) for a long pulse gap.
    pub long_max_us: u32,

    /// Tick-to-microsecond conversion factor of the capture counter.
    pub ticks_per_us: u32,

    /// Mid-capture resync threshold in microseconds.
    ///
    /// `None` (the default) preserves the reference behavior: a stalled
    /// transmission leaves the session capturing indefinitely. When set, an
    /// edge arriving after a longer gap restarts the encoding at position
    /// zero before being recorded.
    pub stall_timeout_us: Option<u32>,
}

impl DecoderConfig {
    /// Reference configuration: 750/1450 µs thresholds, 80 ticks/µs,
    /// watchdog off.
    pub const DEFAULT: Self = Self {
        short_max_us: SHORT_MAX_US,
        long_max_us: LONG_MAX_US,
        ticks_per_us: TICKS_PER_US,
        stall_timeout_us: None,
    };

    /// Create a config with custom classification thresholds.
    pub const fn with_thresholds(short_max_us: u32, long_max_us: u32) -> Self {
        Self {
            short_max_us,
            long_max_us,
            ..Self::DEFAULT
        }
    }

    /// Enable the stall watchdog at the default ~50 ms threshold.
    pub const fn with_stall_watchdog(mut self) -> Self {
        self.stall_timeout_us = Some(STALL_TIMEOUT_US);
        self
    }

    /// Convert a tick count from the capture counter to microseconds.
    #[inline]
    pub const fn us_from_ticks(&self, ticks: u32) -> u32 {
        ticks / self.ticks_per_us
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

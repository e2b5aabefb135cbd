//! Decoder diagnostics counters.
//!
//! Updated from the edge ISR with relaxed atomics, read from the main loop
//! at leisure. The counters never drive control flow; they exist so a
//! console or log drain can report what the decoder has been doing.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::logging::LogStream;
use crate::rt_info;

/// Lock-free counters shared between the edge handler and the main loop.
pub struct DecoderStats {
    /// Edges delivered to the decoder, in any session state.
    edges: AtomicU32,

    /// Edges discarded because a result was still waiting to be consumed.
    discarded: AtomicU32,

    /// Capture sessions that ran to completion (matched or not).
    sessions: AtomicU32,

    /// Completed sessions that matched no catalog entry.
    no_match: AtomicU32,

    /// Stall-watchdog resyncs (always zero with the watchdog disabled).
    resyncs: AtomicU32,
}

impl DecoderStats {
    /// Create zeroed counters.
    pub const fn new() -> Self {
        Self {
            edges: AtomicU32::new(0),
            discarded: AtomicU32::new(0),
            sessions: AtomicU32::new(0),
            no_match: AtomicU32::new(0),
            resyncs: AtomicU32::new(0),
        }
    }

    #[inline]
    pub(crate) fn record_edge(&self) {
        self.edges.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_discarded(&self) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_session(&self) {
        self.sessions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_no_match(&self) {
        self.no_match.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_resync(&self) {
        self.resyncs.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy all counters at a point in time.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            edges: self.edges.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            sessions: self.sessions.load(Ordering::Relaxed),
            no_match: self.no_match.load(Ordering::Relaxed),
            resyncs: self.resyncs.load(Ordering::Relaxed),
        }
    }
}

impl Default for DecoderStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`DecoderStats`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub edges: u32,
    pub discarded: u32,
    pub sessions: u32,
    pub no_match: u32,
    pub resyncs: u32,
}

impl StatsSnapshot {
    /// Push a one-line summary onto the log ring for the drain task.
    pub fn log_to<const M: usize>(&self, log: &LogStream<M>, timestamp_us: i64) {
        rt_info!(
            log,
            timestamp_us,
            "edges {} discarded {} sessions {} no-match {} resyncs {}",
            self.edges,
            self.discarded,
            self.sessions,
            self.no_match,
            self.resyncs
        );
    }
}

//! Capture session state machine and producer/consumer handoff.
//!
//! This is the timing-sensitive core of the crate. One asynchronous
//! producer (the capture ISR) classifies edges into the encoding buffer;
//! one synchronous consumer polls for the decoded result and requests the
//! next session.
//!
//! # Handoff design
//!
//! Session state, write cursor, and result code are packed into a single
//! `AtomicU32`, published with `Release` and read with `Acquire`. The
//! consumer can therefore never observe a ready flag without the result
//! that belongs to it, and never a torn {state, cursor, result} triple.
//! Independent flag variables would only be safe on a single in-order
//! core; the packed word is safe anywhere.
//!
//! # Rules
//!
//! - `on_edge` never blocks, never allocates, never logs
//! - Exactly one producer calls `on_edge`; exactly one consumer calls
//!   `request_next_digit`
//! - The consumer calls `request_next_digit` only after observing a ready
//!   result

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::catalog::{Catalog, DecodeResult, NO_MATCH_CODE};
use crate::clock;
use crate::config::DecoderConfig;
use crate::encoding::{Encoding, ENCODING_LENGTH};
use crate::pulse;
use crate::stats::{DecoderStats, StatsSnapshot};

/// Whether the decoder is accumulating edges or holding a finished result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Edges are being classified into the encoding buffer.
    Capturing,
    /// A result is available; further edges are discarded.
    Ready,
}

// Packed state word layout:
//   bits 0..8   result wire code
//   bits 8..16  published cursor position
//   bit  16     ready flag
const RESULT_MASK: u32 = 0xFF;
const CURSOR_SHIFT: u32 = 8;
const CURSOR_MASK: u32 = 0xFF << CURSOR_SHIFT;
const READY_BIT: u32 = 1 << 16;

const fn pack(ready: bool, cursor: usize, result_code: u8) -> u32 {
    let mut word = (result_code as u32) | ((cursor as u32) << CURSOR_SHIFT);
    if ready {
        word |= READY_BIT;
    }
    word
}

/// IR decoding engine: one capture session at a time, cycling for the
/// lifetime of the process.
///
/// # Session lifecycle
///
/// Starts `Capturing` with an empty buffer. Each edge is classified by the
/// gap since the previous edge and appended. The 34th symbol triggers the
/// table matcher; the result is published, the buffer cursor returns to
/// zero, and the state becomes `Ready`. Edges are then discarded until the
/// consumer calls [`request_next_digit`].
///
/// `request_next_digit` deliberately does not touch the cursor: in the
/// reference behavior only session completion resets it, and completion
/// always leaves it at zero. The quirk is observable only if a new session
/// is requested while one is still mid-capture.
///
/// # Safety
///
/// The buffer and previous-edge timestamp live in `UnsafeCell`s touched
/// only by `on_edge`. With a single producer there is no aliasing; the
/// consumer reads nothing but the packed atomic word.
///
/// [`request_next_digit`]: IrDecoder::request_next_digit
pub struct IrDecoder<'a, const N: usize = ENCODING_LENGTH> {
    catalog: &'a Catalog<N>,
    config: DecoderConfig,

    /// Packed {ready, cursor, result} word. The single point of
    /// producer/consumer synchronization.
    state: AtomicU32,

    /// Producer-only: symbols accumulated this session.
    encoding: UnsafeCell<Encoding<N>>,

    /// Producer-only: counter value at the previous edge.
    previous_edge: UnsafeCell<u32>,

    stats: DecoderStats,
}

// SAFETY: single producer (ISR), single consumer (task loop). Producer-only
// fields are never touched outside `on_edge`; shared state is the atomic
// word and the relaxed counters.
unsafe impl<'a, const N: usize> Sync for IrDecoder<'a, N> {}
unsafe impl<'a, const N: usize> Send for IrDecoder<'a, N> {}

impl<'a, const N: usize> IrDecoder<'a, N> {
    /// Create a decoder over `catalog` with the given timing config.
    ///
    /// Suitable for statics:
    ///
    /// ```
    /// use ir_timer_remote::{Catalog, DecoderConfig, IrDecoder};
    ///
    /// static DECODER: IrDecoder =
    ///     IrDecoder::new(Catalog::standard(), DecoderConfig::DEFAULT);
    /// ```
    pub const fn new(catalog: &'a Catalog<N>, config: DecoderConfig) -> Self {
        assert!(N > 0 && N <= 0xFF, "encoding length must fit the cursor field");

        Self {
            catalog,
            config,
            state: AtomicU32::new(pack(false, 0, NO_MATCH_CODE)),
            encoding: UnsafeCell::new(Encoding::new()),
            previous_edge: UnsafeCell::new(0),
            stats: DecoderStats::new(),
        }
    }

    /// Feed one falling-edge timestamp from the capture counter.
    ///
    /// This is the registration point for the capture ISR: call it once per
    /// edge with the free-running counter value. Completes in bounded time
    /// with no blocking and no allocation.
    ///
    /// While `Ready`, edges are counted and discarded; state, cursor, and
    /// result are left untouched.
    pub fn on_edge(&self, timestamp: u32) {
        self.stats.record_edge();

        let word = self.state.load(Ordering::Acquire);
        if word & READY_BIT != 0 {
            self.stats.record_discarded();
            return;
        }

        // SAFETY: producer-only field, see type-level safety note.
        let previous = unsafe { *self.previous_edge.get() };
        let ticks = clock::delta(previous, timestamp);
        // SAFETY: as above.
        unsafe {
            *self.previous_edge.get() = timestamp;
        }

        let delta_us = self.config.us_from_ticks(ticks);

        // SAFETY: as above.
        let encoding = unsafe { &mut *self.encoding.get() };

        if let Some(timeout_us) = self.config.stall_timeout_us {
            if delta_us > timeout_us && !encoding.is_empty() {
                // Gap long enough that this edge must open a new
                // transmission: realign instead of misfiling it.
                encoding.reset();
                self.stats.record_resync();
            }
        }

        encoding.push(pulse::classify(delta_us, &self.config));

        if encoding.is_full() {
            let result = self.catalog.decode(encoding);
            if result == DecodeResult::NoMatch {
                self.stats.record_no_match();
            }
            self.stats.record_session();

            // Next session starts clean.
            encoding.reset();
            self.state
                .store(pack(true, 0, result.code()), Ordering::Release);
        } else {
            self.state.store(
                pack(false, encoding.len(), (word & RESULT_MASK) as u8),
                Ordering::Release,
            );
        }
    }

    /// Non-blocking check for a finished session.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.state.load(Ordering::Acquire) & READY_BIT != 0
    }

    /// Current session state.
    #[inline]
    pub fn session_state(&self) -> SessionState {
        if self.is_ready() {
            SessionState::Ready
        } else {
            SessionState::Capturing
        }
    }

    /// The most recent decode result.
    ///
    /// Valid to call at any time; meaningful only once [`is_ready`] holds.
    /// Before the first completed session it is [`DecodeResult::NoMatch`],
    /// afterwards it is the previous session's value until the next one
    /// completes.
    ///
    /// [`is_ready`]: IrDecoder::is_ready
    #[inline]
    pub fn current_result(&self) -> DecodeResult {
        let word = self.state.load(Ordering::Acquire);
        DecodeResult::from_code((word & RESULT_MASK) as u8)
    }

    /// Published cursor position of the in-progress session.
    #[inline]
    pub fn cursor(&self) -> usize {
        let word = self.state.load(Ordering::Acquire);
        ((word & CURSOR_MASK) >> CURSOR_SHIFT) as usize
    }

    /// Start a new capture session after consuming a result.
    ///
    /// Clears the ready flag and nothing else; idempotent. Call from the
    /// consumer only, after [`is_ready`] has been observed true.
    ///
    /// [`is_ready`]: IrDecoder::is_ready
    #[inline]
    pub fn request_next_digit(&self) {
        self.state.fetch_and(!READY_BIT, Ordering::AcqRel);
    }

    /// Timing configuration in effect.
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Diagnostics counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ButtonId;

    // 80 ticks per µs at the default config.
    fn ticks(us: u32) -> u32 {
        us * 80
    }

    fn feed_symbol(decoder: &IrDecoder, t: &mut u32, symbol: char) {
        let gap_us = match symbol {
            'A' => 600,
            'B' => 1000,
            'X' => 5000,
            _ => unreachable!(),
        };
        *t = t.wrapping_add(ticks(gap_us));
        decoder.on_edge(*t);
    }

    #[test]
    fn test_initial_state() {
        let decoder = IrDecoder::new(Catalog::standard(), DecoderConfig::DEFAULT);
        assert_eq!(decoder.session_state(), SessionState::Capturing);
        assert!(!decoder.is_ready());
        assert_eq!(decoder.current_result(), DecodeResult::NoMatch);
        assert_eq!(decoder.cursor(), 0);
    }

    #[test]
    fn test_cursor_advances_per_edge() {
        let decoder = IrDecoder::new(Catalog::standard(), DecoderConfig::DEFAULT);
        let mut t = 0u32;

        feed_symbol(&decoder, &mut t, 'X');
        assert_eq!(decoder.cursor(), 1);
        feed_symbol(&decoder, &mut t, 'X');
        assert_eq!(decoder.cursor(), 2);
        assert!(!decoder.is_ready());
    }

    #[test]
    fn test_full_session_decodes_digit_five() {
        let decoder = IrDecoder::new(Catalog::standard(), DecoderConfig::DEFAULT);
        let mut t = 0u32;

        let (_, pattern) = crate::catalog::STANDARD_PATTERNS[5];
        for symbol in pattern.chars() {
            feed_symbol(&decoder, &mut t, symbol);
        }

        assert!(decoder.is_ready());
        assert_eq!(
            decoder.current_result(),
            DecodeResult::Button(ButtonId::Five)
        );
        // Completion rewound the cursor for the next session.
        assert_eq!(decoder.cursor(), 0);
    }

    #[test]
    fn test_edges_while_ready_are_discarded() {
        let decoder = IrDecoder::new(Catalog::standard(), DecoderConfig::DEFAULT);
        let mut t = 0u32;

        let (_, pattern) = crate::catalog::STANDARD_PATTERNS[0];
        for symbol in pattern.chars() {
            feed_symbol(&decoder, &mut t, symbol);
        }
        assert!(decoder.is_ready());
        let result = decoder.current_result();

        for _ in 0..10 {
            feed_symbol(&decoder, &mut t, 'A');
        }

        assert!(decoder.is_ready());
        assert_eq!(decoder.current_result(), result);
        assert_eq!(decoder.cursor(), 0);
        assert_eq!(decoder.stats().discarded, 10);
    }

    #[test]
    fn test_request_next_digit_is_idempotent() {
        let decoder = IrDecoder::new(Catalog::standard(), DecoderConfig::DEFAULT);

        for _ in 0..3 {
            decoder.request_next_digit();
            assert!(!decoder.is_ready());
            assert_eq!(decoder.session_state(), SessionState::Capturing);
        }
    }

    #[test]
    fn test_result_stale_until_next_completion() {
        let decoder = IrDecoder::new(Catalog::standard(), DecoderConfig::DEFAULT);
        let mut t = 0u32;

        let (_, pattern) = crate::catalog::STANDARD_PATTERNS[7];
        for symbol in pattern.chars() {
            feed_symbol(&decoder, &mut t, symbol);
        }
        assert_eq!(
            decoder.current_result(),
            DecodeResult::Button(ButtonId::Seven)
        );

        decoder.request_next_digit();
        // Stale but unchanged until the next session completes.
        assert!(!decoder.is_ready());
        assert_eq!(
            decoder.current_result(),
            DecodeResult::Button(ButtonId::Seven)
        );
    }

    #[test]
    fn test_garbage_session_yields_no_match() {
        let decoder = IrDecoder::new(Catalog::standard(), DecoderConfig::DEFAULT);
        let mut t = 0u32;

        for _ in 0..ENCODING_LENGTH {
            feed_symbol(&decoder, &mut t, 'A');
        }

        assert!(decoder.is_ready());
        assert_eq!(decoder.current_result(), DecodeResult::NoMatch);
        assert_eq!(decoder.stats().no_match, 1);
    }

    #[test]
    fn test_counter_wrap_mid_session() {
        let decoder = IrDecoder::new(Catalog::standard(), DecoderConfig::DEFAULT);

        // Land the previous edge just below the wrap point, then cross it.
        let mut t = u32::MAX - ticks(300);
        decoder.on_edge(t);
        assert_eq!(decoder.cursor(), 1);

        t = t.wrapping_add(ticks(600));
        decoder.on_edge(t);
        assert_eq!(decoder.cursor(), 2);
    }

    #[test]
    fn test_watchdog_resyncs_mid_capture() {
        let config = DecoderConfig::DEFAULT.with_stall_watchdog();
        let decoder = IrDecoder::new(Catalog::standard(), config);
        let mut t = 0u32;

        // A few symbols of a transmission that then stalls.
        feed_symbol(&decoder, &mut t, 'X');
        feed_symbol(&decoder, &mut t, 'X');
        feed_symbol(&decoder, &mut t, 'A');
        assert_eq!(decoder.cursor(), 3);

        // Edge after a 60 ms gap: realigned to position 1.
        t = t.wrapping_add(ticks(60_000));
        decoder.on_edge(t);
        assert_eq!(decoder.cursor(), 1);
        assert_eq!(decoder.stats().resyncs, 1);

        // The realigned session still decodes: feed the rest of OK's
        // pattern after its leading X.
        let (_, pattern) = crate::catalog::STANDARD_PATTERNS[10];
        for symbol in pattern.chars().skip(1) {
            feed_symbol(&decoder, &mut t, symbol);
        }
        assert!(decoder.is_ready());
        assert_eq!(decoder.current_result(), DecodeResult::Button(ButtonId::Ok));
    }
}

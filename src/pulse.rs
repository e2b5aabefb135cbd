//! Pulse classification: inter-edge gaps become symbols.
//!
//! The remote encodes each bit in the gap between two falling edges of the
//! receiver output. Three gap classes are enough to describe every
//! transmission, including the over-length gaps that frame it.

use crate::config::DecoderConfig;

/// Classified meaning of the gap between two consecutive edges.
///
/// Catalog patterns render these as ASCII: `A` for short, `B` for long,
/// `X` for anything beyond the long threshold. The first two positions of
/// every real transmission are `X`: the gap since the previous transmission
/// and the leader gap both exceed the thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Symbol {
    /// Gap at or below the short threshold (default 750 µs).
    Short,
    /// Gap at or below the long threshold (default 1450 µs).
    Long,
    /// Gap beyond both thresholds.
    Invalid,
}

impl Symbol {
    /// ASCII rendering used by the catalog pattern tables.
    pub const fn as_ascii(self) -> u8 {
        match self {
            Symbol::Short => b'A',
            Symbol::Long => b'B',
            Symbol::Invalid => b'X',
        }
    }

    /// Parse a pattern byte, `None` for anything but `A`/`B`/`X`.
    pub const fn from_ascii(byte: u8) -> Option<Self> {
        match byte {
            b'A' => Some(Symbol::Short),
            b'B' => Some(Symbol::Long),
            b'X' => Some(Symbol::Invalid),
            _ => None,
        }
    }
}

/// Classify a gap, given in microseconds, against the configured thresholds.
///
/// Pure function: no side effects, safe in interrupt context.
#[inline]
pub fn classify(delta_us: u32, config: &DecoderConfig) -> Symbol {
    if delta_us <= config.short_max_us {
        Symbol::Short
    } else if delta_us <= config.long_max_us {
        Symbol::Long
    } else {
        Symbol::Invalid
    }
}

//! Button identifiers and the table-based digit matcher.
//!
//! Decoding is an exact table lookup: a completed 34-symbol encoding either
//! equals one of the 13 catalog patterns or it does not. No fuzzy matching,
//! no partial credit. The two-symbol `XX` preamble every real transmission
//! shares is matched as part of the full comparison, never special-cased.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::encoding::{Encoding, ENCODING_LENGTH};
use crate::pulse::Symbol;

/// Number of buttons on the remote.
pub const BUTTON_COUNT: usize = 13;

/// Wire code reserved for "no catalog entry matched".
pub const NO_MATCH_CODE: u8 = 99;

/// Semantic identifier of a decoded remote button.
///
/// The discriminants are the wire codes the application layer consumes:
/// 0–9 for digits, 10 for OK, 11 for BACK, 12 for MODE SWITCH.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive,
)]
#[repr(u8)]
pub enum ButtonId {
    Zero = 0,
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ok = 10,
    Back = 11,
    ModeSwitch = 12,
}

impl ButtonId {
    /// Numeric value for digit buttons, `None` for OK/BACK/MODE SWITCH.
    pub fn digit(self) -> Option<u8> {
        let code: u8 = self.into();
        (code <= 9).then_some(code)
    }
}

/// Outcome of matching a completed encoding against the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeResult {
    /// The encoding equals this button's canonical pattern.
    Button(ButtonId),
    /// The encoding equals no catalog entry.
    NoMatch,
}

impl DecodeResult {
    /// Wire code: the button code, or [`NO_MATCH_CODE`].
    pub fn code(self) -> u8 {
        match self {
            DecodeResult::Button(id) => id.into(),
            DecodeResult::NoMatch => NO_MATCH_CODE,
        }
    }

    /// Rebuild a result from its wire code. Unknown codes map to `NoMatch`.
    pub fn from_code(code: u8) -> Self {
        ButtonId::try_from(code)
            .map(DecodeResult::Button)
            .unwrap_or(DecodeResult::NoMatch)
    }

    /// The matched button, if any.
    pub fn button(self) -> Option<ButtonId> {
        match self {
            DecodeResult::Button(id) => Some(id),
            DecodeResult::NoMatch => None,
        }
    }
}

/// Canonical pattern text for every button, ascending by button code.
///
/// Captured from the reference remote one button at a time. Each pattern
/// opens with `XX`: the first edge of a transmission arrives after an
/// arbitrarily long idle gap, and the second after the leader gap, so both
/// classify beyond the long threshold.
pub const STANDARD_PATTERNS: [(ButtonId, &str); BUTTON_COUNT] = [
    (ButtonId::Zero, "XXAABAAAAABBABBBBBAAAABAAABBBBABBB"),
    (ButtonId::One, "XXAABAAAAABBABBBBBBAAABAAAABBBABBB"),
    (ButtonId::Two, "XXAABAAAAABBABBBBBABAABAAABABBABBB"),
    (ButtonId::Three, "XXAABAAAAABBABBBBBBBAABAAAAABBABBB"),
    (ButtonId::Four, "XXAABAAAAABBABBBBBAABABAAABBABABBB"),
    (ButtonId::Five, "XXAABAAAAABBABBBBBBABABAAAABABABBB"),
    (ButtonId::Six, "XXAABAAAAABBABBBBBABBABAAABAABABBB"),
    (ButtonId::Seven, "XXAABAAAAABBABBBBBBBBABAAAAAABABBB"),
    (ButtonId::Eight, "XXAABAAAAABBABBBBBAAABBAAABBBAABBB"),
    (ButtonId::Nine, "XXAABAAAAABBABBBBBBAABBAAAABBAABBB"),
    (ButtonId::Ok, "XXAABAAAAABBABBBBBAABAAABABBABBBAB"),
    (ButtonId::Back, "XXAABAAAAABBABBBBBAAABABAABBBABABB"),
    (ButtonId::ModeSwitch, "XXAABAAAAABBABBBBBBAAAAABAABBBBBAB"),
];

/// Compile-time pattern parser for the standard table. Bad pattern text is
/// a build error, not a runtime condition.
const fn pattern_symbols(pattern: &str) -> [Symbol; ENCODING_LENGTH] {
    let bytes = pattern.as_bytes();
    assert!(bytes.len() == ENCODING_LENGTH, "pattern length mismatch");

    let mut symbols = [Symbol::Invalid; ENCODING_LENGTH];
    let mut i = 0;
    while i < ENCODING_LENGTH {
        symbols[i] = match bytes[i] {
            b'A' => Symbol::Short,
            b'B' => Symbol::Long,
            b'X' => Symbol::Invalid,
            _ => panic!("pattern byte must be A, B, or X"),
        };
        i += 1;
    }
    symbols
}

static STANDARD: Catalog = {
    let mut entries =
        [(ButtonId::Zero, [Symbol::Invalid; ENCODING_LENGTH]); BUTTON_COUNT];
    let mut i = 0;
    while i < BUTTON_COUNT {
        entries[i] = (STANDARD_PATTERNS[i].0, pattern_symbols(STANDARD_PATTERNS[i].1));
        i += 1;
    }
    Catalog { entries }
};

/// Immutable mapping from button to canonical symbol sequence.
///
/// Built once at startup and handed by reference to the decoding engine.
/// Entries are stored, and matched, in ascending button-code order.
pub struct Catalog<const N: usize = ENCODING_LENGTH> {
    entries: [(ButtonId, [Symbol; N]); BUTTON_COUNT],
}

impl Catalog<ENCODING_LENGTH> {
    /// The 13-entry catalog for the reference remote.
    pub const fn standard() -> &'static Self {
        &STANDARD
    }
}

impl<const N: usize> Catalog<N> {
    /// Build a catalog from explicit entries, one per button, ascending by
    /// button code.
    pub const fn new(entries: [(ButtonId, [Symbol; N]); BUTTON_COUNT]) -> Self {
        Self { entries }
    }

    /// Canonical symbol sequence for one button.
    pub fn pattern(&self, id: ButtonId) -> &[Symbol; N] {
        let code: u8 = id.into();
        &self.entries[code as usize].1
    }

    /// Match a completed encoding against the catalog.
    ///
    /// Returns the first entry equal element-by-element to `encoding`,
    /// in table order, or [`DecodeResult::NoMatch`].
    pub fn decode(&self, encoding: &Encoding<N>) -> DecodeResult {
        debug_assert!(encoding.is_full());

        for (id, pattern) in &self.entries {
            if encoding.symbols() == pattern {
                return DecodeResult::Button(*id);
            }
        }
        DecodeResult::NoMatch
    }
}

//! Fixed-length symbol buffer for one IR transmission.

use thiserror::Error;

use crate::pulse::Symbol;

/// Symbols per complete transmission. Empirically, the remote always sends
/// 34 of them.
pub const ENCODING_LENGTH: usize = 34;

/// Error parsing a pattern string into an [`Encoding`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PatternError {
    /// Pattern text has the wrong number of symbols.
    #[error("pattern is {found} symbols long, expected {expected}")]
    Length { expected: usize, found: usize },

    /// Pattern text contains a byte other than `A`, `B`, or `X`.
    #[error("unrecognized symbol byte {byte:#04x} at position {index}")]
    UnknownSymbol { byte: u8, index: usize },
}

/// Ordered, fixed-capacity sequence of symbols plus a write cursor.
///
/// Owned exclusively by the decoding engine and mutated only from the edge
/// handler. The symbol sequence is only meaningful once [`is_full`] holds;
/// until then trailing positions hold leftovers from the previous session.
///
/// [`is_full`]: Encoding::is_full
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Encoding<const N: usize = ENCODING_LENGTH> {
    symbols: [Symbol; N],
    cursor: usize,
}

impl<const N: usize> Encoding<N> {
    /// Create an empty encoding.
    pub const fn new() -> Self {
        Self {
            symbols: [Symbol::Invalid; N],
            cursor: 0,
        }
    }

    /// Build a full encoding from pattern text such as `"XXAAB..."`.
    pub fn from_pattern(pattern: &str) -> Result<Self, PatternError> {
        let bytes = pattern.as_bytes();
        if bytes.len() != N {
            return Err(PatternError::Length {
                expected: N,
                found: bytes.len(),
            });
        }

        let mut symbols = [Symbol::Invalid; N];
        for (index, &byte) in bytes.iter().enumerate() {
            symbols[index] = Symbol::from_ascii(byte)
                .ok_or(PatternError::UnknownSymbol { byte, index })?;
        }

        Ok(Self { symbols, cursor: N })
    }

    /// Rewind the cursor to position zero. Called once at session start.
    #[inline]
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Write `symbol` at the cursor and advance.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is already full. The session state machine
    /// stops feeding edges once the buffer fills, so reaching this is a
    /// logic defect, not a recoverable condition.
    #[inline]
    pub fn push(&mut self, symbol: Symbol) {
        assert!(self.cursor < N, "encoding buffer overrun");
        self.symbols[self.cursor] = symbol;
        self.cursor += 1;
    }

    /// Number of symbols written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.cursor
    }

    /// True when no symbols have been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    /// True once the cursor has reached capacity.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.cursor == N
    }

    /// The full symbol sequence. Meaningful only when [`is_full`] holds.
    ///
    /// [`is_full`]: Encoding::is_full
    #[inline]
    pub fn symbols(&self) -> &[Symbol; N] {
        &self.symbols
    }
}

impl<const N: usize> Default for Encoding<N> {
    fn default() -> Self {
        Self::new()
    }
}

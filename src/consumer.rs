//! Consumer-side polling over the decoder handoff.
//!
//! The application loop is cooperative: it must keep yielding to other
//! pending work (display refresh, countdown ticks) while a button press is
//! still in flight. The producer side is an ISR and must never be waited
//! on with anything blocking, so the consumer busy-polls and the yield is
//! an injected capability rather than a scheduler dependency.

use crate::catalog::DecodeResult;
use crate::decoder::IrDecoder;
use crate::encoding::ENCODING_LENGTH;
use crate::logging::LogStream;
use crate::{rt_info, rt_warn};

/// Polling front-end for one [`IrDecoder`].
///
/// # Example
///
/// ```
/// use ir_timer_remote::{Catalog, DecoderConfig, DigitConsumer, IrDecoder};
///
/// static DECODER: IrDecoder =
///     IrDecoder::new(Catalog::standard(), DecoderConfig::DEFAULT);
///
/// fn interpret_next_button() {
///     let consumer = DigitConsumer::new(&DECODER);
///     let result = consumer.wait_with(|| {
///         // run other scheduled work while the transmission completes
///     });
///     consumer.acknowledge();
///     let _ = result;
/// }
/// ```
pub struct DigitConsumer<'d, 'c, const N: usize = ENCODING_LENGTH> {
    decoder: &'d IrDecoder<'c, N>,
}

impl<'d, 'c, const N: usize> DigitConsumer<'d, 'c, N> {
    /// Wrap a decoder reference.
    pub fn new(decoder: &'d IrDecoder<'c, N>) -> Self {
        Self { decoder }
    }

    /// Non-blocking poll: the result if a session has completed, else
    /// `None`.
    #[inline]
    pub fn poll(&self) -> Option<DecodeResult> {
        self.decoder
            .is_ready()
            .then(|| self.decoder.current_result())
    }

    /// Busy-poll until a result is ready, invoking `yield_fn` between
    /// polls so cooperative work keeps running.
    ///
    /// Does not acknowledge the result; the decoder stays `Ready` and
    /// discards edges until [`acknowledge`] is called.
    ///
    /// [`acknowledge`]: DigitConsumer::acknowledge
    pub fn wait_with(&self, mut yield_fn: impl FnMut()) -> DecodeResult {
        while !self.decoder.is_ready() {
            yield_fn();
        }
        self.decoder.current_result()
    }

    /// Wait for a result, acknowledge it, and hand it back.
    ///
    /// Convenience for the common consume-then-rearm sequence.
    pub fn take_with(&self, yield_fn: impl FnMut()) -> DecodeResult {
        let result = self.wait_with(yield_fn);
        self.acknowledge();
        result
    }

    /// [`take_with`] plus a log record for the drain task: matched
    /// buttons at info, unmatched transmissions at warn.
    ///
    /// `timestamp_us` stamps the entry; the caller owns the clock.
    ///
    /// [`take_with`]: DigitConsumer::take_with
    pub fn take_logged<const M: usize>(
        &self,
        log: &LogStream<M>,
        timestamp_us: i64,
        yield_fn: impl FnMut(),
    ) -> DecodeResult {
        let result = self.take_with(yield_fn);
        match result.button() {
            Some(button) => {
                rt_info!(log, timestamp_us, "button {:?} (code {})", button, result.code());
            }
            None => {
                rt_warn!(log, timestamp_us, "unmatched transmission (code {})", result.code());
            }
        }
        result
    }

    /// Consume the pending result and start the next capture session.
    #[inline]
    pub fn acknowledge(&self) {
        self.decoder.request_next_digit();
    }
}

//! # ir-timer-remote
//!
//! Infrared remote decoder and clock logic for a 4-digit kitchen timer.
//!
//! ## Architecture
//!
//! The decoding core is split between one asynchronous producer and one
//! synchronous consumer:
//! - The capture ISR calls [`IrDecoder::on_edge`] once per falling edge,
//!   never blocking and never allocating
//! - The application busy-polls [`IrDecoder::is_ready`] from a cooperative
//!   task loop, yielding to other work between polls
//! - Session state, write cursor, and decode result travel together in a
//!   single atomic word, so the consumer can never observe a torn update
//!
//! Everything in this crate is pure logic: the capture timer, display,
//! buzzer, and scheduler are collaborators the application wires up.

#![cfg_attr(not(test), no_std)]

pub mod alarm;
pub mod app;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod consumer;
pub mod decoder;
pub mod encoding;
pub mod logging;
pub mod pulse;
pub mod stats;

pub use alarm::AlarmPattern;
pub use app::{TickEvent, TimerApp};
pub use catalog::{ButtonId, Catalog, DecodeResult};
pub use config::DecoderConfig;
pub use consumer::DigitConsumer;
pub use decoder::{IrDecoder, SessionState};
pub use encoding::{Encoding, ENCODING_LENGTH};
pub use pulse::Symbol;
pub use stats::DecoderStats;

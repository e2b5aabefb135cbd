//! Timer/stopwatch application state machine.
//!
//! Pure logic, no hardware dependencies. Consumes decoded buttons and
//! 1 Hz ticks, produces digit values for the 7-segment driver. Fully
//! testable on host.
//!
//! # Modes
//!
//! - **Entry**: digits shift into a 4-slot buffer; OK starts the countdown
//!   with the entered mm:ss, MODE SWITCH starts the stopwatch from 00:00
//! - **Timer**: counts down once per second; 00:00 fires the alarm and the
//!   app returns to Entry
//! - **Stopwatch**: counts up once per second, wrapping at 59:59
//!
//! In Timer and Stopwatch, OK toggles run/pause; MODE SWITCH while paused
//! abandons the clock and returns to Entry.

use crate::catalog::{ButtonId, DecodeResult};

/// Digit slots on the display.
pub const DISPLAY_DIGITS: usize = 4;

/// Digit value the 7-segment driver renders as blank.
pub const BLANK: u8 = 10;

/// Top-level application mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Entry,
    Timer,
    Stopwatch,
}

/// Whether the clock is ticking or held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Run,
    Pause,
}

/// What a 1 Hz tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickEvent {
    /// Nothing to do: paused, or in Entry mode.
    Idle,
    /// The clock advanced; redraw the display.
    Updated,
    /// The countdown reached 00:00. The caller starts the alarm; the app
    /// has already returned to Entry.
    Expired,
}

/// mm:ss clock value as four display digits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClockDisplay {
    pub m1: u8,
    pub m2: u8,
    pub s1: u8,
    pub s2: u8,
}

impl ClockDisplay {
    const ZERO: Self = Self {
        m1: 0,
        m2: 0,
        s1: 0,
        s2: 0,
    };

    fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Count up one second, wrapping at 59:59.
    fn increment(&mut self) {
        self.s2 += 1;
        if self.s2 >= 10 {
            self.s2 = 0;
            self.s1 += 1;
            if self.s1 >= 6 {
                self.s1 = 0;
                self.m2 += 1;
                if self.m2 >= 10 {
                    self.m2 = 0;
                    self.m1 += 1;
                    if self.m1 >= 6 {
                        self.m1 = 0;
                    }
                }
            }
        }
    }

    /// Count down one second with borrow. Caller checks for zero first.
    fn decrement(&mut self) {
        if self.s2 != 0 {
            self.s2 -= 1;
        } else if self.s1 != 0 {
            self.s1 -= 1;
            self.s2 = 9;
        } else if self.m2 != 0 {
            self.m2 -= 1;
            self.s1 = 5;
            self.s2 = 9;
        } else {
            self.m1 -= 1;
            self.m2 = 9;
            self.s1 = 5;
            self.s2 = 9;
        }
    }

    fn digits(&self) -> [u8; DISPLAY_DIGITS] {
        [self.m1, self.m2, self.s1, self.s2]
    }
}

/// The kitchen-timer UI state machine.
pub struct TimerApp {
    mode: Mode,
    run: RunState,
    /// Entry buffer, most significant first. Blank slots hold [`BLANK`].
    digits: [u8; DISPLAY_DIGITS],
    clock: ClockDisplay,
}

impl TimerApp {
    /// Start in Entry mode with a blank display.
    pub const fn new() -> Self {
        Self {
            mode: Mode::Entry,
            run: RunState::Pause,
            digits: [BLANK; DISPLAY_DIGITS],
            clock: ClockDisplay::ZERO,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn run_state(&self) -> RunState {
        self.run
    }

    /// Digit values to hand to the 7-segment driver.
    ///
    /// Entry mode shows the entry buffer (with blanks); Timer and
    /// Stopwatch show the clock.
    pub fn display(&self) -> [u8; DISPLAY_DIGITS] {
        match self.mode {
            Mode::Entry => self.digits,
            Mode::Timer | Mode::Stopwatch => self.clock.digits(),
        }
    }

    /// React to one decoded button press.
    ///
    /// Returns `true` when the display contents changed. `NoMatch` is
    /// ignored in every mode.
    pub fn handle_button(&mut self, result: DecodeResult) -> bool {
        let Some(button) = result.button() else {
            return false;
        };

        match self.mode {
            Mode::Entry => self.handle_entry_button(button),
            Mode::Timer | Mode::Stopwatch => self.handle_clock_button(button),
        }
    }

    /// Advance the clock by one second. Call at 1 Hz.
    pub fn tick_second(&mut self) -> TickEvent {
        if self.run != RunState::Run {
            return TickEvent::Idle;
        }

        match self.mode {
            Mode::Entry => TickEvent::Idle,
            Mode::Stopwatch => {
                self.clock.increment();
                TickEvent::Updated
            }
            Mode::Timer => {
                if self.clock.is_zero() {
                    self.reset_to_entry();
                    TickEvent::Expired
                } else {
                    self.clock.decrement();
                    TickEvent::Updated
                }
            }
        }
    }

    fn handle_entry_button(&mut self, button: ButtonId) -> bool {
        match button {
            ButtonId::ModeSwitch => {
                self.mode = Mode::Stopwatch;
                self.clock = ClockDisplay::ZERO;
                self.run = RunState::Run;
                true
            }
            ButtonId::Ok => {
                self.mode = Mode::Timer;
                self.clock = ClockDisplay {
                    m1: blank_as_zero(self.digits[0]),
                    m2: blank_as_zero(self.digits[1]),
                    s1: blank_as_zero(self.digits[2]),
                    s2: blank_as_zero(self.digits[3]),
                };
                self.run = RunState::Run;
                true
            }
            ButtonId::Back => {
                // Drop the least significant digit, shifting right.
                self.digits[3] = self.digits[2];
                self.digits[2] = self.digits[1];
                self.digits[1] = self.digits[0];
                self.digits[0] = BLANK;
                true
            }
            digit => {
                let Some(value) = digit.digit() else {
                    return false;
                };
                if self.digits[0] != BLANK {
                    // All four slots taken.
                    return false;
                }
                self.digits[0] = self.digits[1];
                self.digits[1] = self.digits[2];
                self.digits[2] = self.digits[3];
                self.digits[3] = value;
                true
            }
        }
    }

    fn handle_clock_button(&mut self, button: ButtonId) -> bool {
        match (self.run, button) {
            (RunState::Run, ButtonId::Ok) => {
                self.run = RunState::Pause;
                false
            }
            (RunState::Pause, ButtonId::Ok) => {
                self.run = RunState::Run;
                false
            }
            (RunState::Pause, ButtonId::ModeSwitch) => {
                self.reset_to_entry();
                true
            }
            _ => false,
        }
    }

    fn reset_to_entry(&mut self) {
        self.mode = Mode::Entry;
        self.run = RunState::Pause;
        self.digits = [BLANK; DISPLAY_DIGITS];
    }
}

impl Default for TimerApp {
    fn default() -> Self {
        Self::new()
    }
}

fn blank_as_zero(digit: u8) -> u8 {
    if digit == BLANK {
        0
    } else {
        digit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(app: &mut TimerApp, button: ButtonId) -> bool {
        app.handle_button(DecodeResult::Button(button))
    }

    #[test]
    fn test_digit_entry_shifts_left() {
        let mut app = TimerApp::new();

        press(&mut app, ButtonId::One);
        assert_eq!(app.display(), [BLANK, BLANK, BLANK, 1]);

        press(&mut app, ButtonId::Two);
        press(&mut app, ButtonId::Three);
        assert_eq!(app.display(), [BLANK, 1, 2, 3]);

        press(&mut app, ButtonId::Four);
        assert_eq!(app.display(), [1, 2, 3, 4]);

        // Fifth digit has nowhere to go.
        assert!(!press(&mut app, ButtonId::Five));
        assert_eq!(app.display(), [1, 2, 3, 4]);
    }

    #[test]
    fn test_back_deletes_least_significant() {
        let mut app = TimerApp::new();
        press(&mut app, ButtonId::One);
        press(&mut app, ButtonId::Two);

        press(&mut app, ButtonId::Back);
        assert_eq!(app.display(), [BLANK, BLANK, BLANK, 1]);

        press(&mut app, ButtonId::Back);
        assert_eq!(app.display(), [BLANK; 4]);

        // Deleting from empty is harmless.
        press(&mut app, ButtonId::Back);
        assert_eq!(app.display(), [BLANK; 4]);
    }

    #[test]
    fn test_ok_starts_countdown_with_blanks_as_zero() {
        let mut app = TimerApp::new();
        press(&mut app, ButtonId::One);
        press(&mut app, ButtonId::Five);

        press(&mut app, ButtonId::Ok);
        assert_eq!(app.mode(), Mode::Timer);
        assert_eq!(app.run_state(), RunState::Run);
        assert_eq!(app.display(), [0, 0, 1, 5]);
    }

    #[test]
    fn test_countdown_borrow_chain() {
        let mut app = TimerApp::new();
        press(&mut app, ButtonId::One);
        press(&mut app, ButtonId::Zero);
        press(&mut app, ButtonId::Zero);
        press(&mut app, ButtonId::Zero);
        press(&mut app, ButtonId::Ok);
        assert_eq!(app.display(), [1, 0, 0, 0]);

        assert_eq!(app.tick_second(), TickEvent::Updated);
        assert_eq!(app.display(), [0, 9, 5, 9]);
    }

    #[test]
    fn test_countdown_expires_to_entry() {
        let mut app = TimerApp::new();
        press(&mut app, ButtonId::One);
        press(&mut app, ButtonId::Ok);
        assert_eq!(app.display(), [0, 0, 0, 1]);

        assert_eq!(app.tick_second(), TickEvent::Updated);
        assert_eq!(app.display(), [0, 0, 0, 0]);

        assert_eq!(app.tick_second(), TickEvent::Expired);
        assert_eq!(app.mode(), Mode::Entry);
        assert_eq!(app.run_state(), RunState::Pause);
        assert_eq!(app.display(), [BLANK; 4]);
    }

    #[test]
    fn test_stopwatch_counts_up_and_wraps() {
        let mut app = TimerApp::new();
        press(&mut app, ButtonId::ModeSwitch);
        assert_eq!(app.mode(), Mode::Stopwatch);
        assert_eq!(app.display(), [0, 0, 0, 0]);

        for _ in 0..61 {
            app.tick_second();
        }
        assert_eq!(app.display(), [0, 1, 0, 1]);
    }

    #[test]
    fn test_stopwatch_full_wrap() {
        let mut app = TimerApp::new();
        press(&mut app, ButtonId::ModeSwitch);

        for _ in 0..(60 * 60) {
            app.tick_second();
        }
        assert_eq!(app.display(), [0, 0, 0, 0]);
    }

    #[test]
    fn test_ok_toggles_pause() {
        let mut app = TimerApp::new();
        press(&mut app, ButtonId::ModeSwitch);

        press(&mut app, ButtonId::Ok);
        assert_eq!(app.run_state(), RunState::Pause);
        assert_eq!(app.tick_second(), TickEvent::Idle);

        press(&mut app, ButtonId::Ok);
        assert_eq!(app.run_state(), RunState::Run);
        assert_eq!(app.tick_second(), TickEvent::Updated);
    }

    #[test]
    fn test_mode_switch_while_paused_returns_to_entry() {
        let mut app = TimerApp::new();
        press(&mut app, ButtonId::ModeSwitch);
        app.tick_second();

        // Running: MODE SWITCH is ignored.
        assert!(!press(&mut app, ButtonId::ModeSwitch));
        assert_eq!(app.mode(), Mode::Stopwatch);

        press(&mut app, ButtonId::Ok);
        press(&mut app, ButtonId::ModeSwitch);
        assert_eq!(app.mode(), Mode::Entry);
        assert_eq!(app.display(), [BLANK; 4]);
    }

    #[test]
    fn test_no_match_is_ignored_everywhere() {
        let mut app = TimerApp::new();
        assert!(!app.handle_button(DecodeResult::NoMatch));

        press(&mut app, ButtonId::ModeSwitch);
        assert!(!app.handle_button(DecodeResult::NoMatch));
        assert_eq!(app.mode(), Mode::Stopwatch);
        assert_eq!(app.run_state(), RunState::Run);
    }

    #[test]
    fn test_digits_ignored_outside_entry() {
        let mut app = TimerApp::new();
        press(&mut app, ButtonId::ModeSwitch);
        app.tick_second();

        assert!(!press(&mut app, ButtonId::Seven));
        assert_eq!(app.display(), [0, 0, 0, 1]);
    }
}

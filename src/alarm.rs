//! Alarm waveform generator for the expired countdown.
//!
//! Pure tick-driven FSM: the caller samples [`AlarmPattern::tick`] from its
//! task loop and drives the buzzer pin with the returned level. No
//! busy-waits, so the rest of the application (including the IR consumer)
//! keeps running while the alarm sounds.
//!
//! The pattern reproduces the reference firmware's egg-timer sound: 700
//! on/off cycles at 1 ms half-period per burst, 15 bursts, 5 s of rest
//! between bursts. The rest after the final burst is elided; trailing
//! silence is indistinguishable from the idle state.

/// Bursts before the alarm goes quiet for good.
pub const BURST_COUNT: u32 = 15;

/// Square-wave cycles per burst.
pub const CYCLES_PER_BURST: u32 = 700;

/// Half-period of the square wave in microseconds.
pub const HALF_PERIOD_US: i64 = 1_000;

/// Quiet gap between bursts in microseconds.
pub const REST_US: i64 = 5_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    /// Mid-burst; even half-cycles are the "on" phase.
    Burst { burst: u32, half_cycle: u32 },
    Rest { burst: u32 },
}

/// Alarm pattern FSM.
pub struct AlarmPattern {
    state: State,
    next_change_us: i64,
}

impl AlarmPattern {
    /// Create an idle (silent) pattern.
    pub const fn new() -> Self {
        Self {
            state: State::Idle,
            next_change_us: 0,
        }
    }

    /// Begin the pattern. The buzzer turns on immediately.
    pub fn start(&mut self, now_us: i64) {
        self.state = State::Burst {
            burst: 0,
            half_cycle: 0,
        };
        self.next_change_us = now_us + HALF_PERIOD_US;
    }

    /// True while the pattern has bursts left to play.
    pub fn is_active(&self) -> bool {
        self.state != State::Idle
    }

    /// Silence the alarm before the pattern completes.
    pub fn cancel(&mut self) {
        self.state = State::Idle;
    }

    /// Advance to `now_us` and return the buzzer level.
    ///
    /// Catches up over however many phase boundaries have passed, so the
    /// caller's polling interval only bounds the output resolution, not
    /// correctness.
    pub fn tick(&mut self, now_us: i64) -> bool {
        while self.is_active() && now_us >= self.next_change_us {
            self.advance();
        }
        matches!(self.state, State::Burst { half_cycle, .. } if half_cycle % 2 == 0)
    }

    fn advance(&mut self) {
        match self.state {
            State::Idle => {}
            State::Burst { burst, half_cycle } => {
                let next_half = half_cycle + 1;
                if next_half < CYCLES_PER_BURST * 2 {
                    self.state = State::Burst {
                        burst,
                        half_cycle: next_half,
                    };
                    self.next_change_us += HALF_PERIOD_US;
                } else if burst + 1 < BURST_COUNT {
                    self.state = State::Rest { burst: burst + 1 };
                    self.next_change_us += REST_US;
                } else {
                    // The trailing rest after the final burst is elided:
                    // with the buzzer already low it is indistinguishable
                    // from Idle.
                    self.state = State::Idle;
                }
            }
            State::Rest { burst } => {
                self.state = State::Burst {
                    burst,
                    half_cycle: 0,
                };
                self.next_change_us += HALF_PERIOD_US;
            }
        }
    }
}

impl Default for AlarmPattern {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BURST_US: i64 = 2 * CYCLES_PER_BURST as i64 * HALF_PERIOD_US;

    #[test]
    fn test_idle_until_started() {
        let mut alarm = AlarmPattern::new();
        assert!(!alarm.is_active());
        assert!(!alarm.tick(0));
        assert!(!alarm.tick(1_000_000));
    }

    #[test]
    fn test_square_wave_phases() {
        let mut alarm = AlarmPattern::new();
        alarm.start(0);

        assert!(alarm.tick(0));
        assert!(alarm.tick(999));
        assert!(!alarm.tick(1_000));
        assert!(!alarm.tick(1_999));
        assert!(alarm.tick(2_000));
    }

    #[test]
    fn test_rest_between_bursts() {
        let mut alarm = AlarmPattern::new();
        alarm.start(0);

        // End of the first burst: quiet for 5 s.
        assert!(!alarm.tick(BURST_US));
        assert!(!alarm.tick(BURST_US + REST_US - 1));
        assert!(alarm.is_active());

        // Second burst opens with the buzzer on.
        assert!(alarm.tick(BURST_US + REST_US));
    }

    #[test]
    fn test_pattern_completes() {
        let total = BURST_COUNT as i64 * BURST_US + (BURST_COUNT as i64 - 1) * REST_US;

        let mut alarm = AlarmPattern::new();
        alarm.start(0);

        assert!(alarm.tick(total - 1) || alarm.is_active());
        assert!(!alarm.tick(total));
        assert!(!alarm.is_active());
    }

    #[test]
    fn test_cancel_silences() {
        let mut alarm = AlarmPattern::new();
        alarm.start(0);
        assert!(alarm.tick(0));

        alarm.cancel();
        assert!(!alarm.is_active());
        assert!(!alarm.tick(100));
    }

    #[test]
    fn test_restart_after_completion() {
        let total = BURST_COUNT as i64 * BURST_US + (BURST_COUNT as i64 - 1) * REST_US;

        let mut alarm = AlarmPattern::new();
        alarm.start(0);
        alarm.tick(total);
        assert!(!alarm.is_active());

        alarm.start(total + 10);
        assert!(alarm.tick(total + 10));
    }
}

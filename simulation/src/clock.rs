//! Fixed-timestep accumulator that converts wall-clock time into ticks.

use std::time::Duration;

use path_defence_core::GameSpeed;

/// Accumulates scaled wall-clock time and releases it in fixed increments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameClock {
    step: Duration,
    accumulator: Duration,
}

impl FrameClock {
    /// Creates a clock that releases one tick per `step` of virtual time.
    #[must_use]
    pub const fn new(step: Duration) -> Self {
        Self {
            step,
            accumulator: Duration::ZERO,
        }
    }

    /// Adds `real_dt` scaled by `speed` and returns how many whole ticks are due.
    ///
    /// The remainder below one tick carries over to the next call.
    pub fn accumulate(&mut self, real_dt: Duration, speed: GameSpeed) -> u32 {
        if self.step.is_zero() {
            return 0;
        }
        self.accumulator = self
            .accumulator
            .saturating_add(real_dt.saturating_mul(speed.multiplier()));

        let mut due: u32 = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            due = due.saturating_add(1);
        }
        due
    }

    /// Virtual time waiting to be released.
    #[must_use]
    pub fn pending(&self) -> Duration {
        self.accumulator
    }

    /// Drops any partially accumulated time.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_defence_core::TICK_DURATION;

    #[test]
    fn partial_frames_carry_over() {
        let mut clock = FrameClock::new(TICK_DURATION);
        assert_eq!(clock.accumulate(Duration::from_millis(10), GameSpeed::Normal), 0);
        assert_eq!(clock.accumulate(Duration::from_millis(10), GameSpeed::Normal), 1);
        assert_eq!(
            clock.pending(),
            Duration::from_millis(20) - TICK_DURATION
        );
    }

    #[test]
    fn speed_scales_released_ticks() {
        let mut clock = FrameClock::new(TICK_DURATION);
        assert_eq!(clock.accumulate(TICK_DURATION, GameSpeed::Fast), 2);
        assert_eq!(clock.accumulate(TICK_DURATION, GameSpeed::Faster), 3);
        assert_eq!(clock.accumulate(Duration::from_secs(1), GameSpeed::Normal), 59);
    }

    #[test]
    fn reset_discards_pending_time() {
        let mut clock = FrameClock::new(TICK_DURATION);
        let _ = clock.accumulate(Duration::from_millis(16), GameSpeed::Normal);
        clock.reset();
        assert_eq!(clock.pending(), Duration::ZERO);
    }
}

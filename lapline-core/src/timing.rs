//! Cadence timers on a millisecond clock
//!
//! Both timers work on a free-running `u32` millisecond counter and
//! tolerate wrap-around. A reference time that lies ahead of `now` counts
//! as "not yet due".

/// Signed distance from `since` to `now`, wrap-safe for spans under ~24 days
fn elapsed(now_ms: u32, since_ms: u32) -> i64 {
    now_ms.wrapping_sub(since_ms) as i32 as i64
}

/// Fixed-rate timer
///
/// Fires when `threshold` has elapsed since the accumulator, then advances
/// the accumulator by `step` (not to `now`). Successive fires therefore
/// target an arithmetic progression and jitter in the polling loop never
/// accumulates. After a stall the timer catches up by firing on
/// consecutive polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixedRateTimer {
    threshold_ms: u32,
    step_ms: u32,
    accumulator_ms: u32,
}

impl FixedRateTimer {
    /// Timer firing once per `period_ms`
    pub const fn new(period_ms: u32) -> Self {
        Self::with_threshold(period_ms, period_ms)
    }

    /// Timer that becomes due after `threshold_ms` but advances by `step_ms`
    pub const fn with_threshold(threshold_ms: u32, step_ms: u32) -> Self {
        Self {
            threshold_ms,
            step_ms,
            accumulator_ms: 0,
        }
    }

    /// Check the timer, returning true if it fired
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if elapsed(now_ms, self.accumulator_ms) >= self.threshold_ms as i64 {
            self.accumulator_ms = self.accumulator_ms.wrapping_add(self.step_ms);
            true
        } else {
            false
        }
    }

    /// Restart the progression from `now_ms`
    pub fn reset(&mut self, now_ms: u32) {
        self.accumulator_ms = now_ms;
    }

    /// Current accumulator value
    pub fn accumulator_ms(&self) -> u32 {
        self.accumulator_ms
    }
}

/// Fixed-delay timer
///
/// Fires when `period` has elapsed since the last fire and restarts from
/// `now`. Late polls push every later fire back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixedDelayTimer {
    period_ms: u32,
    last_fired_ms: u32,
}

impl FixedDelayTimer {
    pub const fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            last_fired_ms: 0,
        }
    }

    /// Check the timer, returning true if it fired
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if elapsed(now_ms, self.last_fired_ms) >= self.period_ms as i64 {
            self.last_fired_ms = now_ms;
            true
        } else {
            false
        }
    }

    pub fn last_fired_ms(&self) -> u32 {
        self.last_fired_ms
    }
}

//! Countdown clocks for both players.
//!
//! Remaining time is kept in whole seconds. Time is charged from wall-clock
//! deltas between observations (`now`, milliseconds since the Unix epoch);
//! only whole elapsed seconds are deducted per observation.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::piece::Color;

/// Default budget per player: ten minutes.
pub const DEFAULT_BUDGET_SECS: u64 = 600;

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Clock {
    pub white_time: u64,
    pub black_time: u64,
    /// Last observed wall-clock time, in milliseconds.
    pub last_tick: u64,
    #[serde(default)]
    pub paused: bool,
}

impl Clock {
    pub fn new(budget_secs: u64, now: u64) -> Self {
        Clock {
            white_time: budget_secs,
            black_time: budget_secs,
            last_tick: now,
            paused: false,
        }
    }

    pub fn remaining(&self, color: Color) -> u64 {
        match color {
            Color::White => self.white_time,
            Color::Black => self.black_time,
        }
    }

    fn remaining_mut(&mut self, color: Color) -> &mut u64 {
        match color {
            Color::White => &mut self.white_time,
            Color::Black => &mut self.black_time,
        }
    }

    /// Charge the time since the last observation to `active`. While paused
    /// only the observation point moves. A `now` earlier than the last
    /// observation counts as no time at all and does not rewind it.
    pub fn tick(&mut self, active: Color, now: u64) {
        if self.paused {
            self.last_tick = self.last_tick.max(now);
            return;
        }
        let elapsed_secs = now.saturating_sub(self.last_tick) / 1000;
        let left = self.remaining_mut(active);
        *left = left.saturating_sub(elapsed_secs);
        self.last_tick = self.last_tick.max(now);
    }

    /// Settle the running clock before switching the pause state, so nothing
    /// is lost or counted twice across the transition.
    pub fn set_paused(&mut self, active: Color, paused: bool, now: u64) {
        self.tick(active, now);
        self.paused = paused;
    }

    pub fn is_expired(&self, color: Color) -> bool {
        self.remaining(color) == 0
    }

    /// The first color found out of time, white before black.
    pub fn expired(&self) -> Option<Color> {
        [Color::White, Color::Black]
            .into_iter()
            .find(|&c| self.is_expired(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: u64 = 1_700_000_000_000;

    #[test]
    fn tick_charges_whole_seconds_to_the_active_side() {
        let mut clock = Clock::new(600, T0);
        clock.tick(Color::White, T0 + 12_900);
        assert_eq!(clock.white_time, 588);
        assert_eq!(clock.black_time, 600);
        assert_eq!(clock.last_tick, T0 + 12_900);
        clock.tick(Color::Black, T0 + 15_900);
        assert_eq!(clock.black_time, 597);
    }

    #[test]
    fn tick_never_goes_below_zero() {
        let mut clock = Clock::new(10, T0);
        clock.tick(Color::White, T0 + 3_600_000);
        assert_eq!(clock.white_time, 0);
        assert!(clock.is_expired(Color::White));
        assert!(!clock.is_expired(Color::Black));
        assert_eq!(clock.expired(), Some(Color::White));
    }

    #[test]
    fn paused_clock_only_moves_the_observation_point() {
        let mut clock = Clock::new(600, T0);
        clock.set_paused(Color::White, true, T0 + 5_000);
        assert_eq!(clock.white_time, 595);
        clock.tick(Color::White, T0 + 500_000);
        assert_eq!(clock.white_time, 595);
        assert_eq!(clock.last_tick, T0 + 500_000);
        // Resuming starts counting from the resume point, not the pause point.
        clock.set_paused(Color::White, false, T0 + 600_000);
        assert_eq!(clock.white_time, 595);
        clock.tick(Color::White, T0 + 602_000);
        assert_eq!(clock.white_time, 593);
    }

    #[test]
    fn out_of_order_time_is_clamped() {
        let mut clock = Clock::new(600, T0);
        clock.tick(Color::White, T0 - 60_000);
        assert_eq!(clock.white_time, 600);
        assert_eq!(clock.last_tick, T0);
        clock.tick(Color::White, T0 + 1_000);
        assert_eq!(clock.white_time, 599);
    }

    #[test]
    fn deduction_bounded_by_wall_clock_delta() {
        let mut clock = Clock::new(600, T0);
        let mut now = T0;
        for step in [250u64, 999, 1_000, 1_750, 40, 3_001] {
            let before = clock.white_time;
            now += step;
            clock.tick(Color::White, now);
            assert!(before - clock.white_time <= step / 1000);
        }
    }
}

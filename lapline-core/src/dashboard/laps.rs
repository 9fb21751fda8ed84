//! Lap and attempt timers
//!
//! Both timers are driven by changes of the lap counter sent by the
//! transmitter:
//!
//! - any change restarts the lap timer
//! - reaching lap 1 also restarts the attempt timer
//! - dropping to lap 0 stops both and shows zero

use core::fmt::Write;

use heapless::String;
use lapline_display::{DashboardBackend, DisplayError, Label};

/// `MM:SS.CC`
pub type ElapsedText = String<8>;

/// Shown on both timers after a reset
pub const ZERO_ELAPSED: &str = "00:00.00";

/// What a lap counter change did to the timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LapEvent {
    /// First lap: attempt and lap timers both started
    AttemptStarted,
    /// Later lap: lap timer restarted, attempt timer kept running
    LapStarted,
    /// Counter went back to zero: both timers stopped
    Reset,
}

/// Edge-triggered lap/attempt timers
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LapTimers {
    last_laps: u8,
    attempt_start_ms: Option<u32>,
    lap_start_ms: Option<u32>,
    /// Lap counter changed but its labels are not drawn yet
    labels_stale: bool,
}

impl LapTimers {
    pub const fn new() -> Self {
        Self {
            last_laps: 0,
            attempt_start_ms: None,
            lap_start_ms: None,
            labels_stale: false,
        }
    }

    /// Track the lap counter, returning an event if it changed
    pub fn observe(&mut self, laps: u8, now_ms: u32) -> Option<LapEvent> {
        if laps == self.last_laps {
            return None;
        }
        self.last_laps = laps;

        let event = match laps {
            0 => {
                self.attempt_start_ms = None;
                self.lap_start_ms = None;
                LapEvent::Reset
            }
            1 => {
                self.attempt_start_ms = Some(now_ms);
                self.lap_start_ms = Some(now_ms);
                LapEvent::AttemptStarted
            }
            _ => {
                self.lap_start_ms = Some(now_ms);
                LapEvent::LapStarted
            }
        };
        Some(event)
    }

    /// Milliseconds since the attempt started, if running
    pub fn attempt_elapsed(&self, now_ms: u32) -> Option<u32> {
        self.attempt_start_ms.map(|start| now_ms.wrapping_sub(start))
    }

    /// Milliseconds since the current lap started, if running
    pub fn lap_elapsed(&self, now_ms: u32) -> Option<u32> {
        self.lap_start_ms.map(|start| now_ms.wrapping_sub(start))
    }

    /// Observe the counter and redraw the lap and timer labels
    pub fn update<B: DashboardBackend>(
        &mut self,
        laps: u8,
        now_ms: u32,
        backend: &mut B,
    ) -> Result<Option<LapEvent>, DisplayError> {
        let event = self.observe(laps, now_ms);
        if event.is_some() {
            self.labels_stale = true;
        }

        if self.labels_stale {
            if self.last_laps == 0 {
                backend.set_label_text(Label::AttemptTime, ZERO_ELAPSED)?;
                backend.set_label_text(Label::LapTime, ZERO_ELAPSED)?;
            }
            let mut text = String::<4>::new();
            let _ = write!(text, "{}", self.last_laps);
            backend.set_label_text(Label::Laps, &text)?;
            self.labels_stale = false;
        }

        if let Some(elapsed) = self.attempt_elapsed(now_ms) {
            backend.set_label_text(Label::AttemptTime, &format_elapsed(elapsed))?;
        }
        if let Some(elapsed) = self.lap_elapsed(now_ms) {
            backend.set_label_text(Label::LapTime, &format_elapsed(elapsed))?;
        }

        Ok(event)
    }
}

/// Format a duration as `MM:SS.CC`, minutes clamped at 99
pub fn format_elapsed(elapsed_ms: u32) -> ElapsedText {
    let hundredths = (elapsed_ms / 10) % 100;
    let seconds = (elapsed_ms / 1000) % 60;
    let minutes = (elapsed_ms / 60_000).min(99);

    let mut text = ElapsedText::new();
    let _ = write!(text, "{:02}:{:02}.{:02}", minutes, seconds, hundredths);
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use lapline_display::Panel;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0).as_str(), "00:00.00");
        assert_eq!(format_elapsed(1_234).as_str(), "00:01.23");
        assert_eq!(format_elapsed(61_999).as_str(), "01:01.99");
        assert_eq!(format_elapsed(99 * 60_000 + 59_990).as_str(), "99:59.99");
        // Minutes clamp, seconds keep counting
        assert_eq!(format_elapsed(100 * 60_000 + 5_000).as_str(), "99:05.00");
        assert_eq!(format_elapsed(u32::MAX).len(), 8);
    }

    #[test]
    fn test_lap_sequence_edges() {
        let mut timers = LapTimers::new();
        let laps = [0u8, 1, 1, 2, 2, 0];
        let events: std::vec::Vec<_> = laps
            .iter()
            .enumerate()
            .map(|(i, &l)| timers.observe(l, 1_000 * (i as u32 + 1)))
            .collect();

        assert_eq!(
            events,
            [
                None,
                Some(LapEvent::AttemptStarted),
                None,
                Some(LapEvent::LapStarted),
                None,
                Some(LapEvent::Reset),
            ]
        );
        assert_eq!(timers.attempt_elapsed(10_000), None);
        assert_eq!(timers.lap_elapsed(10_000), None);
    }

    #[test]
    fn test_lap_keeps_attempt_running() {
        let mut timers = LapTimers::new();
        timers.observe(1, 1_000);
        timers.observe(2, 5_000);
        assert_eq!(timers.attempt_elapsed(6_000), Some(5_000));
        assert_eq!(timers.lap_elapsed(6_000), Some(1_000));
    }

    #[test]
    fn test_start_at_time_zero_still_runs() {
        let mut timers = LapTimers::new();
        timers.observe(1, 0);
        assert_eq!(timers.attempt_elapsed(2_500), Some(2_500));
    }

    #[test]
    fn test_failed_reset_redraw_is_retried() {
        let mut timers = LapTimers::new();
        let mut panel = Panel::default();
        timers.update(1, 1_000, &mut panel).unwrap();
        timers.update(2, 2_000, &mut panel).unwrap();

        panel.fail_label_writes(1);
        assert_eq!(
            timers.update(0, 3_000, &mut panel),
            Err(DisplayError::Communication)
        );
        assert_eq!(panel.label(Label::Laps), "2");

        assert_eq!(timers.update(0, 3_010, &mut panel), Ok(None));
        assert_eq!(panel.label(Label::Laps), "0");
        assert_eq!(panel.label(Label::AttemptTime), ZERO_ELAPSED);
        assert_eq!(panel.label(Label::LapTime), ZERO_ELAPSED);
    }

    #[test]
    fn test_labels() {
        let mut timers = LapTimers::new();
        let mut panel = Panel::default();

        // No lap yet: timers stay untouched
        assert_eq!(timers.update(0, 10, &mut panel), Ok(None));
        assert_eq!(panel.label_writes(Label::AttemptTime), 0);

        timers.update(1, 1_000, &mut panel).unwrap();
        timers.update(1, 2_230, &mut panel).unwrap();
        assert_eq!(panel.label(Label::Laps), "1");
        assert_eq!(panel.label(Label::AttemptTime), "00:01.23");
        assert_eq!(panel.label(Label::LapTime), "00:01.23");

        timers.update(2, 3_000, &mut panel).unwrap();
        timers.update(2, 3_500, &mut panel).unwrap();
        assert_eq!(panel.label(Label::Laps), "2");
        assert_eq!(panel.label(Label::AttemptTime), "00:02.50");
        assert_eq!(panel.label(Label::LapTime), "00:00.50");

        assert_eq!(
            timers.update(0, 4_000, &mut panel),
            Ok(Some(LapEvent::Reset))
        );
        assert_eq!(panel.label(Label::Laps), "0");
        assert_eq!(panel.label(Label::AttemptTime), ZERO_ELAPSED);
        assert_eq!(panel.label(Label::LapTime), ZERO_ELAPSED);

        let writes = panel.label_writes(Label::LapTime);
        timers.update(0, 5_000, &mut panel).unwrap();
        assert_eq!(panel.label_writes(Label::LapTime), writes);
    }
}

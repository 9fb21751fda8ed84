//! Speed, RPM and power readouts

use core::fmt::Write;

use heapless::String;
use lapline_display::{palette, Color, DashboardBackend, DisplayError, Label};

use crate::telemetry::TelemetryData;

/// Text buffer for one numeric label
type LabelText = String<16>;

/// Largest magnitude a numeric label shows
const READING_LIMIT: f32 = 99_999.0;

/// Format a decoded float with fixed decimals
///
/// Clamped so the text always fits the label buffer. NaN stays "NaN".
fn format_reading(value: f32, decimals: usize) -> LabelText {
    let mut text = LabelText::new();
    let _ = write!(
        text,
        "{:.*}",
        decimals,
        value.clamp(-READING_LIMIT, READING_LIMIT)
    );
    text
}

/// RPM and velocity labels, redrawn only when the value changes
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpeedLabels {
    last_rpm: Option<u16>,
    /// Bit pattern, so NaN compares equal to itself
    last_velocity_bits: Option<u32>,
}

impl SpeedLabels {
    pub const fn new() -> Self {
        Self {
            last_rpm: None,
            last_velocity_bits: None,
        }
    }

    pub fn update<B: DashboardBackend>(
        &mut self,
        data: &TelemetryData,
        backend: &mut B,
    ) -> Result<(), DisplayError> {
        if self.last_rpm != Some(data.rpm) {
            let mut text = LabelText::new();
            let _ = write!(text, "{:>3} rpm", data.rpm);
            backend.set_label_text(Label::Rpm, &text)?;
            self.last_rpm = Some(data.rpm);
        }

        let bits = data.velocity.to_bits();
        if self.last_velocity_bits != Some(bits) {
            backend.set_label_text(Label::Velocity, &format_reading(data.velocity, 1))?;
            self.last_velocity_bits = Some(bits);
        }

        Ok(())
    }
}

/// Exponential follower for the speed arc
///
/// Runs on every fast tick whether or not the velocity changed, so the
/// needle keeps easing toward the target between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ArcSmoother {
    display: f32,
    alpha: f32,
    max: u16,
}

impl ArcSmoother {
    pub const fn new(alpha: f32, max: u16) -> Self {
        Self {
            display: 0.0,
            alpha,
            max,
        }
    }

    /// Advance one tick toward `velocity`, returning the arc position
    pub fn step(&mut self, velocity: f32) -> u16 {
        // Saturating cast: negative and NaN map to 0
        let target = (velocity as u16).min(self.max) as f32;
        self.display += (target - self.display) * self.alpha;
        self.display as u16
    }

    /// Smoothed value before truncation
    pub fn display(&self) -> f32 {
        self.display
    }
}

/// Arc color for a velocity
///
/// Blue up to 50, blending to purple at 90, then to red at 100.
pub fn arc_color(velocity: f32) -> Color {
    if velocity <= 50.0 {
        palette::BLUE
    } else if velocity <= 90.0 {
        let t = ((velocity - 50.0) * 255.0 / 40.0) as u8;
        Color::mix(palette::PURPLE, palette::BLUE, t)
    } else {
        let t = ((velocity - 90.0) * 255.0 / 10.0) as u8;
        Color::mix(palette::RED, palette::PURPLE, t)
    }
}

/// Consumption and efficiency labels, two decimals, no change gating
pub fn update_power_labels<B: DashboardBackend>(
    data: &TelemetryData,
    backend: &mut B,
) -> Result<(), DisplayError> {
    backend.set_label_text(Label::Consumption, &format_reading(data.consumption, 2))?;
    backend.set_label_text(Label::Efficiency, &format_reading(data.efficiency, 2))
}

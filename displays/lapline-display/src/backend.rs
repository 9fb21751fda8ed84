//! Dashboard backend trait
//!
//! Defines the interface between the receiver update engine and whatever
//! draws the dashboard.

use crate::color::Color;

/// Number of samples in each chart series
pub const CHART_POINTS: usize = 60;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Widget does not exist on the current screen
    MissingWidget,
    /// Display not initialized
    NotInitialized,
}

/// Text labels on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Label {
    Rpm,
    Velocity,
    Laps,
    /// Time since the first lap started
    AttemptTime,
    /// Time since the current lap started
    LapTime,
    Consumption,
    Efficiency,
    /// Status banner
    Message,
}

impl Label {
    /// Number of labels
    pub const COUNT: usize = 8;

    pub const ALL: [Label; Self::COUNT] = [
        Label::Rpm,
        Label::Velocity,
        Label::Laps,
        Label::AttemptTime,
        Label::LapTime,
        Label::Consumption,
        Label::Efficiency,
        Label::Message,
    ];

    /// Dense index, for per-label tables
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Size and origin of the battery image, read once when the clip is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClipGeometry {
    /// Height of the full battery image
    pub full_height: i16,
    /// Y coordinate of the clip container when created
    pub base_y: i16,
}

/// Visible window of the battery fill image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClipRegion {
    pub y: i16,
    pub height: i16,
}

/// Dashboard backend trait
///
/// Every call carries final, literal values. Implementations should not
/// need to know anything about telemetry.
pub trait DashboardBackend {
    /// Replace the text of a label
    fn set_label_text(&mut self, label: Label, text: &str) -> Result<(), DisplayError>;

    /// Change the text color of a label
    fn set_label_color(&mut self, label: Label, color: Color) -> Result<(), DisplayError>;

    /// Set the speed arc position (0-99)
    fn set_arc_value(&mut self, value: u16) -> Result<(), DisplayError>;

    /// Set the color of the speed arc indicator
    fn set_arc_color(&mut self, color: Color) -> Result<(), DisplayError>;

    /// Redraw the power chart from the given series
    ///
    /// - `current_x10`: current in 0.1 A, oldest first
    /// - `voltage_x10`: battery voltage in 0.1 V, oldest first
    fn refresh_chart(&mut self, current_x10: &[i32], voltage_x10: &[i32])
        -> Result<(), DisplayError>;

    /// Wrap the battery fill image in a clip container
    ///
    /// Called once, before the first [`set_battery_clip`](Self::set_battery_clip).
    fn attach_battery_clip(&mut self) -> Result<ClipGeometry, DisplayError>;

    /// Move and resize the battery clip container
    fn set_battery_clip(&mut self, region: ClipRegion) -> Result<(), DisplayError>;

    /// Let the rendering engine run its timers and flush dirty areas
    fn render_tick(&mut self) -> Result<(), DisplayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_indices_are_dense() {
        for (i, label) in Label::ALL.iter().enumerate() {
            assert_eq!(label.index(), i);
        }
    }
}

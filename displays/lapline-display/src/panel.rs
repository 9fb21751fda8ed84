//! In-memory dashboard
//!
//! Records the latest value pushed to every widget. Used as the headless
//! backend for simulation and as the observation point in tests.

use heapless::{String, Vec};

use crate::backend::{
    ClipGeometry, ClipRegion, DashboardBackend, DisplayError, Label, CHART_POINTS,
};
use crate::color::Color;

/// Maximum characters kept per label
pub const LABEL_LEN: usize = 40;

/// Recording dashboard backend
#[derive(Clone)]
pub struct Panel {
    /// Current label text
    labels: [String<LABEL_LEN>; Label::COUNT],
    /// Label color, if ever set
    label_colors: [Option<Color>; Label::COUNT],
    /// Number of text writes per label
    label_writes: [u32; Label::COUNT],
    arc_value: u16,
    arc_color: Option<Color>,
    chart_current: Vec<i32, CHART_POINTS>,
    chart_voltage: Vec<i32, CHART_POINTS>,
    chart_refreshes: u32,
    /// Geometry reported when the battery clip is attached
    battery_geometry: ClipGeometry,
    clip_attach_count: u32,
    clip: Option<ClipRegion>,
    render_ticks: u32,
    /// Label writes still to be refused
    failing_label_writes: u32,
    /// Whether anything changed since the last `mark_clean`
    dirty: bool,
}

impl Default for Panel {
    fn default() -> Self {
        Self::new(ClipGeometry {
            full_height: 100,
            base_y: 0,
        })
    }
}

impl Panel {
    /// Create an empty panel whose battery image has the given geometry
    pub fn new(battery_geometry: ClipGeometry) -> Self {
        Self {
            labels: core::array::from_fn(|_| String::new()),
            label_colors: [None; Label::COUNT],
            label_writes: [0; Label::COUNT],
            arc_value: 0,
            arc_color: None,
            chart_current: Vec::new(),
            chart_voltage: Vec::new(),
            chart_refreshes: 0,
            battery_geometry,
            clip_attach_count: 0,
            clip: None,
            render_ticks: 0,
            failing_label_writes: 0,
            dirty: true,
        }
    }

    /// Get the text of a label
    pub fn label(&self, label: Label) -> &str {
        self.labels[label.index()].as_str()
    }

    /// Get the color of a label
    pub fn label_color(&self, label: Label) -> Option<Color> {
        self.label_colors[label.index()]
    }

    /// Number of times a label's text was written
    pub fn label_writes(&self, label: Label) -> u32 {
        self.label_writes[label.index()]
    }

    pub fn arc_value(&self) -> u16 {
        self.arc_value
    }

    pub fn arc_color(&self) -> Option<Color> {
        self.arc_color
    }

    /// Current series as last drawn, oldest first
    pub fn chart_current(&self) -> &[i32] {
        &self.chart_current
    }

    /// Voltage series as last drawn, oldest first
    pub fn chart_voltage(&self) -> &[i32] {
        &self.chart_voltage
    }

    pub fn chart_refreshes(&self) -> u32 {
        self.chart_refreshes
    }

    /// How many times the battery clip was attached
    pub fn clip_attach_count(&self) -> u32 {
        self.clip_attach_count
    }

    pub fn battery_clip(&self) -> Option<ClipRegion> {
        self.clip
    }

    pub fn render_ticks(&self) -> u32 {
        self.render_ticks
    }

    /// Check if anything changed since the last render
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark panel as clean (after rendering)
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Refuse the next `count` label text writes with `Communication`
    pub fn fail_label_writes(&mut self, count: u32) {
        self.failing_label_writes = count;
    }
}

impl DashboardBackend for Panel {
    fn set_label_text(&mut self, label: Label, text: &str) -> Result<(), DisplayError> {
        if self.failing_label_writes > 0 {
            self.failing_label_writes -= 1;
            return Err(DisplayError::Communication);
        }
        let line = &mut self.labels[label.index()];
        line.clear();
        // Truncate on a char boundary if too long
        for ch in text.chars() {
            if line.push(ch).is_err() {
                break;
            }
        }
        self.label_writes[label.index()] += 1;
        self.dirty = true;
        Ok(())
    }

    fn set_label_color(&mut self, label: Label, color: Color) -> Result<(), DisplayError> {
        self.label_colors[label.index()] = Some(color);
        self.dirty = true;
        Ok(())
    }

    fn set_arc_value(&mut self, value: u16) -> Result<(), DisplayError> {
        self.arc_value = value;
        self.dirty = true;
        Ok(())
    }

    fn set_arc_color(&mut self, color: Color) -> Result<(), DisplayError> {
        self.arc_color = Some(color);
        self.dirty = true;
        Ok(())
    }

    fn refresh_chart(
        &mut self,
        current_x10: &[i32],
        voltage_x10: &[i32],
    ) -> Result<(), DisplayError> {
        self.chart_current.clear();
        self.chart_voltage.clear();
        // Cannot fail: slices are cut to capacity
        let _ = self.chart_current.extend_from_slice(latest(current_x10));
        let _ = self.chart_voltage.extend_from_slice(latest(voltage_x10));
        self.chart_refreshes += 1;
        self.dirty = true;
        Ok(())
    }

    fn attach_battery_clip(&mut self) -> Result<ClipGeometry, DisplayError> {
        self.clip_attach_count += 1;
        Ok(self.battery_geometry)
    }

    fn set_battery_clip(&mut self, region: ClipRegion) -> Result<(), DisplayError> {
        if self.clip_attach_count == 0 {
            return Err(DisplayError::NotInitialized);
        }
        self.clip = Some(region);
        self.dirty = true;
        Ok(())
    }

    fn render_tick(&mut self) -> Result<(), DisplayError> {
        self.render_ticks += 1;
        self.dirty = false;
        Ok(())
    }
}

/// Last `CHART_POINTS` samples of a series
fn latest(series: &[i32]) -> &[i32] {
    &series[series.len().saturating_sub(CHART_POINTS)..]
}

#[cfg(feature = "defmt")]
impl defmt::Format for Panel {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Panel[");
        for (i, label) in self.labels.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{}", label.as_str());
        }
        defmt::write!(f, "; arc={}]", self.arc_value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_text_and_write_count() {
        let mut panel = Panel::default();
        panel.set_label_text(Label::Rpm, "120 rpm").unwrap();
        panel.set_label_text(Label::Rpm, "121 rpm").unwrap();
        assert_eq!(panel.label(Label::Rpm), "121 rpm");
        assert_eq!(panel.label_writes(Label::Rpm), 2);
        assert_eq!(panel.label_writes(Label::Velocity), 0);
    }

    #[test]
    fn test_refused_label_writes() {
        let mut panel = Panel::default();
        panel.fail_label_writes(1);
        assert_eq!(
            panel.set_label_text(Label::Laps, "3"),
            Err(DisplayError::Communication)
        );
        assert_eq!(panel.label_writes(Label::Laps), 0);
        panel.set_label_text(Label::Laps, "3").unwrap();
        assert_eq!(panel.label(Label::Laps), "3");
    }

    #[test]
    fn test_long_label_truncated() {
        let mut panel = Panel::default();
        let long = "0123456789012345678901234567890123456789-overflow";
        panel.set_label_text(Label::Message, long).unwrap();
        assert_eq!(panel.label(Label::Message).len(), LABEL_LEN);
    }

    #[test]
    fn test_clip_requires_attach() {
        let mut panel = Panel::new(ClipGeometry {
            full_height: 80,
            base_y: 12,
        });
        let region = ClipRegion { y: 0, height: 1 };
        assert_eq!(
            panel.set_battery_clip(region),
            Err(DisplayError::NotInitialized)
        );
        let geometry = panel.attach_battery_clip().unwrap();
        assert_eq!(geometry.full_height, 80);
        panel.set_battery_clip(region).unwrap();
        assert_eq!(panel.battery_clip(), Some(region));
    }

    #[test]
    fn test_chart_keeps_latest_points() {
        let mut panel = Panel::default();
        let data: [i32; 70] = core::array::from_fn(|i| i as i32);
        panel.refresh_chart(&data, &data[..3]).unwrap();
        assert_eq!(panel.chart_current().len(), CHART_POINTS);
        assert_eq!(panel.chart_current()[0], 10);
        assert_eq!(panel.chart_voltage(), &[0, 1, 2]);
        assert_eq!(panel.chart_refreshes(), 1);
    }

    #[test]
    fn test_render_tick_clears_dirty() {
        let mut panel = Panel::default();
        assert!(panel.is_dirty());
        panel.render_tick().unwrap();
        assert!(!panel.is_dirty());
        panel.set_arc_value(42).unwrap();
        assert!(panel.is_dirty());
        assert_eq!(panel.arc_value(), 42);
    }
}

//! Power chart window and battery overlay

use lapline_display::{
    ClipGeometry, ClipRegion, DashboardBackend, DisplayError, CHART_POINTS,
};

use crate::telemetry::TelemetryData;

/// Fixed-length sample window, oldest first
///
/// Pushing shifts every sample one slot left and writes the new one at
/// the end. Slots not yet filled hold zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartWindow<const N: usize> {
    samples: [i32; N],
}

impl<const N: usize> Default for ChartWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ChartWindow<N> {
    pub const fn new() -> Self {
        Self { samples: [0; N] }
    }

    pub fn push(&mut self, sample: i32) {
        if N == 0 {
            return;
        }
        self.samples.copy_within(1.., 0);
        self.samples[N - 1] = sample;
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.samples
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<i32> {
        self.samples.last().copied()
    }
}

/// Scale to tenths, rounding half up
pub fn to_fixed_x10(value: f32) -> i32 {
    (value * 10.0 + 0.5) as i32
}

/// Current and voltage history
#[derive(Debug, Clone, Default)]
pub struct PowerChart {
    current: ChartWindow<CHART_POINTS>,
    voltage: ChartWindow<CHART_POINTS>,
}

impl PowerChart {
    pub const fn new() -> Self {
        Self {
            current: ChartWindow::new(),
            voltage: ChartWindow::new(),
        }
    }

    /// Append the latest readings and redraw the chart
    pub fn update<B: DashboardBackend>(
        &mut self,
        data: &TelemetryData,
        backend: &mut B,
    ) -> Result<(), DisplayError> {
        self.current.push(to_fixed_x10(data.current_amps));
        self.voltage.push(to_fixed_x10(data.battery_voltage));
        backend.refresh_chart(self.current.as_slice(), self.voltage.as_slice())
    }

    pub fn current(&self) -> &ChartWindow<CHART_POINTS> {
        &self.current
    }

    pub fn voltage(&self) -> &ChartWindow<CHART_POINTS> {
        &self.voltage
    }
}

/// Battery image clipped in proportion to velocity
///
/// The clip container is built on the first update and reused after that.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryGauge {
    geometry: Option<ClipGeometry>,
    offset_y: i16,
}

impl BatteryGauge {
    pub const fn new(offset_y: i16) -> Self {
        Self {
            geometry: None,
            offset_y,
        }
    }

    pub fn update<B: DashboardBackend>(
        &mut self,
        velocity: f32,
        backend: &mut B,
    ) -> Result<ClipRegion, DisplayError> {
        let geometry = match self.geometry {
            Some(geometry) => geometry,
            None => {
                let geometry = backend.attach_battery_clip()?;
                self.geometry = Some(geometry);
                geometry
            }
        };

        let region = clip_region(velocity, geometry, self.offset_y);
        backend.set_battery_clip(region)?;
        Ok(region)
    }

    pub fn is_attached(&self) -> bool {
        self.geometry.is_some()
    }
}

/// Visible part of the battery image for a velocity in 0..=100
///
/// At least one row stays visible. The region is anchored to the bottom
/// of the image.
pub fn clip_region(velocity: f32, geometry: ClipGeometry, offset_y: i16) -> ClipRegion {
    // NaN falls through both clamps; treat it as empty
    let v = if velocity.is_nan() {
        0.0
    } else {
        velocity.clamp(0.0, 100.0)
    };
    let full = geometry.full_height;
    let visible = ((full as f32 * (v / 100.0)) as i16).max(1);
    ClipRegion {
        y: offset_y
            .wrapping_add(geometry.base_y)
            .wrapping_add(full.wrapping_sub(visible)),
        height: visible,
    }
}

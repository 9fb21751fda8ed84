//! Configuration type definitions
//!
//! These types hold the fixed constants of both nodes. They can be
//! serialized when the `serde` feature is on, for tooling that wants to
//! display or compare them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Transmitter cadences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TransmitConfig {
    /// Sensor sampling period
    pub sample_period_ms: u32,
    /// FAST frame period
    pub fast_period_ms: u32,
    /// AWARENESS frame period
    pub awareness_period_ms: u32,
    /// GRAPH frame period
    pub graph_period_ms: u32,
    /// Elapsed time that makes a HEARTBEAT due
    pub heartbeat_threshold_ms: u32,
    /// Amount the HEARTBEAT accumulator advances per send
    pub heartbeat_step_ms: u32,
    /// Copies of each custom message put on the wire
    pub message_repeats: u8,
}

impl TransmitConfig {
    pub const DEFAULT: Self = Self {
        sample_period_ms: 10,
        fast_period_ms: 10,
        awareness_period_ms: 100,
        graph_period_ms: 1000,
        heartbeat_threshold_ms: 200,
        heartbeat_step_ms: 500,
        message_repeats: 2,
    };
}

impl Default for TransmitConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Uniform integer range scaled down to a float, for simulated readings
///
/// A sample is drawn from `low..high` and divided by `divisor`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimRange {
    pub low: u32,
    pub high: u32,
    pub divisor: f32,
}

/// Transmitter sensor scaling
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorConfig {
    /// Full-scale ADC reading
    pub adc_max: u16,
    /// Velocity at full scale, in 0.1 km/h
    pub velocity_full_scale_x10: f32,
    /// Drivetrain constant for the RPM estimate
    pub rpm_k: f32,
    /// Wheel radius in meters
    pub wheel_radius_m: f32,
    /// Lap button debounce time
    pub debounce_ms: u32,
    /// Simulated battery voltage (V)
    pub battery_voltage: SimRange,
    /// Simulated current draw (A)
    pub current_amps: SimRange,
    /// Simulated consumption
    pub consumption: SimRange,
    /// Simulated efficiency
    pub efficiency: SimRange,
}

impl SensorConfig {
    pub const DEFAULT: Self = Self {
        adc_max: 4095,
        velocity_full_scale_x10: 999.0,
        rpm_k: 2.65,
        wheel_radius_m: 0.5,
        debounce_ms: 50,
        battery_voltage: SimRange {
            low: 220,
            high: 260,
            divisor: 10.0,
        },
        current_amps: SimRange {
            low: 70,
            high: 100,
            divisor: 10.0,
        },
        consumption: SimRange {
            low: 12_000,
            high: 15_000,
            divisor: 100.0,
        },
        efficiency: SimRange {
            low: 16_000,
            high: 20_000,
            divisor: 100.0,
        },
    };
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Dashboard cadences and presentation constants
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DashboardConfig {
    /// Rendering engine tick
    pub render_period_ms: u32,
    /// Labels, arc and lap timers
    pub fast_period_ms: u32,
    /// Arc color, consumption and efficiency
    pub medium_period_ms: u32,
    /// Chart window and battery overlay
    pub slow_period_ms: u32,
    /// Arc smoothing factor
    pub arc_alpha: f32,
    /// Highest arc position
    pub arc_max: u16,
    /// Screen offset added to the battery clip position
    pub battery_clip_offset_y: i16,
}

impl DashboardConfig {
    pub const DEFAULT: Self = Self {
        render_period_ms: 5,
        fast_period_ms: 10,
        medium_period_ms: 100,
        slow_period_ms: 2000,
        arc_alpha: 0.18,
        arc_max: 99,
        battery_clip_offset_y: 339,
    };
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

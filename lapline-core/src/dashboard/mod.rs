//! Dashboard update engine and projections
//!
//! The engine runs each projection on its own cadence from the latest
//! telemetry in the store:
//!
//! | cadence | projections |
//! |---|---|
//! | 5 ms | rendering engine tick |
//! | every step | status banner |
//! | 10 ms | RPM/velocity labels, speed arc, lap timers |
//! | 100 ms | arc color, consumption/efficiency labels |
//! | 2000 ms | power chart, battery overlay |

pub mod banner;
pub mod chart;
pub mod engine;
pub mod gauges;
pub mod laps;

pub use banner::MessageBanner;
pub use chart::{clip_region, to_fixed_x10, BatteryGauge, ChartWindow, PowerChart};
pub use engine::{Fired, UpdateScheduler};
pub use gauges::{arc_color, update_power_labels, ArcSmoother, SpeedLabels};
pub use laps::{format_elapsed, LapEvent, LapTimers};

//! Multi-cadence dashboard update engine

use lapline_display::{DashboardBackend, DisplayError};

use super::banner::MessageBanner;
use super::chart::{BatteryGauge, PowerChart};
use super::gauges::{arc_color, update_power_labels, ArcSmoother, SpeedLabels};
use super::laps::LapTimers;
use crate::config::DashboardConfig;
use crate::store::TelemetryStore;
use crate::timing::FixedDelayTimer;

/// Which cadences ran in one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fired {
    pub render: bool,
    /// The banner was redrawn
    pub banner: bool,
    pub fast: bool,
    pub medium: bool,
    pub slow: bool,
}

/// Receiver-side update scheduler
///
/// Cadences restart from the time they fire, so a late loop delays every
/// later update instead of bunching them up.
pub struct UpdateScheduler {
    render: FixedDelayTimer,
    fast: FixedDelayTimer,
    medium: FixedDelayTimer,
    slow: FixedDelayTimer,
    speed: SpeedLabels,
    arc: ArcSmoother,
    laps: LapTimers,
    chart: PowerChart,
    battery: BatteryGauge,
    banner: MessageBanner,
}

impl UpdateScheduler {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            render: FixedDelayTimer::new(config.render_period_ms),
            fast: FixedDelayTimer::new(config.fast_period_ms),
            medium: FixedDelayTimer::new(config.medium_period_ms),
            slow: FixedDelayTimer::new(config.slow_period_ms),
            speed: SpeedLabels::new(),
            arc: ArcSmoother::new(config.arc_alpha, config.arc_max),
            laps: LapTimers::new(),
            chart: PowerChart::new(),
            battery: BatteryGauge::new(config.battery_clip_offset_y),
            banner: MessageBanner::new(),
        }
    }

    /// Run whatever is due at `now_ms`
    ///
    /// A backend error aborts the rest of the step. Cadences that already
    /// fired stay fired.
    pub fn step<B: DashboardBackend>(
        &mut self,
        now_ms: u32,
        store: &mut TelemetryStore,
        backend: &mut B,
    ) -> Result<Fired, DisplayError> {
        let mut fired = Fired::default();

        if self.render.poll(now_ms) {
            backend.render_tick()?;
            fired.render = true;
        }

        fired.banner = self.banner.update(store, backend)?;

        let data = *store.data();

        if self.fast.poll(now_ms) {
            self.speed.update(&data, backend)?;
            let position = self.arc.step(data.velocity);
            backend.set_arc_value(position)?;
            self.laps.update(data.laps, now_ms, backend)?;
            fired.fast = true;
        }

        if self.medium.poll(now_ms) {
            backend.set_arc_color(arc_color(data.velocity))?;
            update_power_labels(&data, backend)?;
            fired.medium = true;
        }

        if self.slow.poll(now_ms) {
            self.chart.update(&data, backend)?;
            self.battery.update(data.velocity, backend)?;
            fired.slow = true;
        }

        Ok(fired)
    }

    pub fn arc(&self) -> &ArcSmoother {
        &self.arc
    }

    pub fn lap_timers(&self) -> &LapTimers {
        &self.laps
    }

    pub fn chart(&self) -> &PowerChart {
        &self.chart
    }
}

impl Default for UpdateScheduler {
    fn default() -> Self {
        Self::new(&DashboardConfig::DEFAULT)
    }
}

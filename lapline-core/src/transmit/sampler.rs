//! Sensor sampling
//!
//! Velocity and RPM come from the throttle potentiometer. The power
//! readings are simulated until the bike has real sensors for them.

use rand_core::{impls, Error, RngCore};

use crate::config::{SensorConfig, SimRange};
use crate::telemetry::TelemetryData;

/// Small linear congruential generator for the simulated readings
#[derive(Debug, Clone)]
pub struct SimRng {
    state: u64,
}

impl SimRng {
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl RngCore for SimRng {
    fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.state >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let upper = self.next_u32() as u64;
        let lower = self.next_u32() as u64;
        (upper << 32) | lower
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Turns raw inputs into a telemetry record
pub struct TelemetrySampler<R> {
    config: SensorConfig,
    rng: R,
}

impl<R: RngCore> TelemetrySampler<R> {
    pub fn new(config: SensorConfig, rng: R) -> Self {
        Self { config, rng }
    }

    /// Build a full record from the ADC reading and the node's lap/status
    pub fn sample(&mut self, velocity_raw: u16, laps: u8, status: u8) -> TelemetryData {
        let (velocity, rpm) = self.scale_velocity(velocity_raw);
        TelemetryData {
            battery_voltage: self.simulate(self.config.battery_voltage),
            current_amps: self.simulate(self.config.current_amps),
            laps,
            consumption: self.simulate(self.config.consumption),
            efficiency: self.simulate(self.config.efficiency),
            rpm,
            velocity,
            status,
        }
    }

    /// Velocity (km/h, 0.1 resolution) and RPM for an ADC reading
    pub fn scale_velocity(&self, raw: u16) -> (f32, u16) {
        let c = &self.config;
        let fraction = raw.min(c.adc_max) as f32 / c.adc_max as f32;
        let velocity_x10 = (fraction * c.velocity_full_scale_x10) as u16;
        let velocity = velocity_x10 as f32 / 10.0;
        let rpm = (fraction * (c.velocity_full_scale_x10 / 10.0) * c.rpm_k / c.wheel_radius_m) as u16;
        (velocity, rpm)
    }

    fn simulate(&mut self, range: SimRange) -> f32 {
        let span = range.high.saturating_sub(range.low).max(1);
        let value = range.low + self.rng.next_u32() % span;
        value as f32 / range.divisor
    }
}

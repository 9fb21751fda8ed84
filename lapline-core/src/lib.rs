//! Board-agnostic logic for both ends of the telemetry link
//!
//! This crate contains everything that does not depend on a specific
//! board:
//!
//! - Drift-free and fixed-delay cadence timers
//! - Transmitter: sensor sampling, lap button, operator console and the
//!   multi-rate transmit scheduler
//! - Receiver: link decoding into the telemetry store
//! - Dashboard: the multi-cadence update engine and its projections (arc
//!   smoothing, lap timers, chart window, status banner)
//! - Configuration constants
//!
//! Both nodes are plain structs with a `step(now_ms, ...)` function. The
//! firmware calls `step` from its main loop; tests call it with a
//! simulated clock.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod dashboard;
pub mod receive;
pub mod store;
pub mod telemetry;
pub mod timing;
pub mod transmit;

pub use dashboard::{Fired, UpdateScheduler};
pub use receive::{LinkReceiver, LinkStats, NodeError, ReceiverNode};
pub use store::TelemetryStore;
pub use telemetry::TelemetryData;
pub use transmit::{SensorInputs, TransmitScheduler, TransmitterNode, TxError};

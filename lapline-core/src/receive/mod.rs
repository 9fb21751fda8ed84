//! Receiver node
//!
//! Drains the link into the telemetry store and drives the dashboard.

pub mod link;
pub mod node;

pub use link::{LinkReceiver, LinkStats};
pub use node::{NodeError, ReceiverNode};

//! Lapline Hardware Abstraction Layer
//!
//! The telemetry link only needs two things from the hardware: a byte
//! source that can be polled without blocking, and a byte sink that is
//! always ready to accept a write. This crate defines those two traits so
//! the protocol and node logic can run on any UART driver, or on an
//! in-memory queue during host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Link nodes (lapline-core)              │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lapline-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  embedded-io  │       │   ByteQueue   │
//! │  UART drivers │       │  (loopback)   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::ByteSource`] - non-blocking "bytes available" / "read one byte"
//! - [`uart::ByteSink`] - "write bytes"

#![no_std]
#![deny(unsafe_code)]

pub mod queue;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use queue::{ByteQueue, QueueError};
pub use uart::{ByteSink, ByteSource, DataBits, IoSink, IoSource, Parity, StopBits, UartConfig};

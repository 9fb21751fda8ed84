//! Lapline Telemetry Link Protocol
//!
//! This crate defines the one-way UART protocol from the sensor node
//! (transmitter) to the dashboard (receiver). The protocol is
//! fire-and-forget: no acknowledgement, no checksum, no retransmission.
//! Correctness means the receiver stays synchronized and recovers, not
//! that every frame arrives.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌──────┬─────────┬────────┬─────────────┐
//! │ SYNC │ COMMAND │ LENGTH │ PAYLOAD     │
//! │ 1B   │ 1B      │ 1B     │ 0–32B       │
//! └──────┴─────────┴────────┴─────────────┘
//! ```
//!
//! Frames follow each other with no delimiter other than the next SYNC
//! byte. The only traffic in the other direction is a bare SYNC byte,
//! which asks the transmitter to reset its lap counter.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;
pub mod status;

pub use frame::{Frame, FrameError, FrameParser, RxState, MAX_PAYLOAD_SIZE, SYNC_BYTE};
pub use messages::{
    AwarenessData, DecodeError, FastData, GraphData, Message, MessageClass, MessageText,
    MAX_MESSAGE_LEN,
};
pub use status::StatusKind;

//! Dashboard presentation contract for Lapline
//!
//! This crate provides:
//! - `DashboardBackend` trait: the calls the update engine makes on the UI
//!   (label text, arc value/color, chart refresh, clip regions, render tick)
//! - `Color` and the fixed dashboard palette, with 8-bit linear mixing
//! - `Panel`, an in-memory backend that records the last value of every
//!   widget
//!
//! # Architecture
//!
//! The receiver core computes literal values and hands them to a backend.
//! How those values turn into pixels is the backend's business:
//!
//! - **Widget toolkit backends** (e.g. a TFT driven by a retained-mode GUI
//!   library) forward each call to the matching widget.
//!
//! - **Headless backends** such as [`Panel`] keep the values in memory for
//!   host-side simulation and tests.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod backend;
pub mod color;
pub mod panel;

// Re-export key types
pub use backend::{ClipGeometry, ClipRegion, DashboardBackend, DisplayError, Label, CHART_POINTS};
pub use color::{palette, Color};
pub use panel::{Panel, LABEL_LEN};

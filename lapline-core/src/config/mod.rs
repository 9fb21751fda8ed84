//! Configuration types
//!
//! All timing, scaling and layout constants are fixed at build time. Each
//! group has a `DEFAULT` constant and a `Default` impl returning it.

pub mod types;

pub use types::*;

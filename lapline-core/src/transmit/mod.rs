//! Transmitter node
//!
//! Samples the sensors, tracks laps and operator status, and puts frames
//! on the link at fixed rates.

pub mod button;
pub mod console;
pub mod node;
pub mod sampler;
pub mod scheduler;

pub use button::LapButton;
pub use console::{ConsoleCommand, ConsoleParser, CONSOLE_LINE_LEN};
pub use node::{SensorInputs, TransmitterNode, TxError, TxReport};
pub use sampler::{SimRng, TelemetrySampler};
pub use scheduler::{DueClasses, TransmitScheduler};

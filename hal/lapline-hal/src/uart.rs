//! UART serial communication abstractions
//!
//! The link treats the serial port as an already-reliable byte pipe. Reads
//! never wait: a source with nothing buffered reports "no data" and the
//! caller moves on with its loop iteration.

use embedded_io::{Read, ReadReady, Write};

/// Non-blocking byte source
pub trait ByteSource {
    /// Error type for receive operations
    type Error;

    /// Check whether at least one byte can be read without waiting
    fn bytes_available(&mut self) -> Result<bool, Self::Error>;

    /// Read a single byte
    ///
    /// Returns `Ok(None)` when nothing is buffered.
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error>;
}

/// Byte sink, assumed always ready
pub trait ByteSink {
    /// Error type for transmit operations
    type Error;

    /// Write all of `data` to the sink
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

/// [`ByteSource`] over any `embedded-io` reader that can report readiness
///
/// Buffered UART receivers from the embassy HALs implement both
/// [`Read`] and [`ReadReady`], so they plug in directly.
pub struct IoSource<T> {
    inner: T,
}

impl<T> IoSource<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read + ReadReady> ByteSource for IoSource<T> {
    type Error = T::Error;

    fn bytes_available(&mut self) -> Result<bool, Self::Error> {
        self.inner.read_ready()
    }

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        if !self.inner.read_ready()? {
            return Ok(None);
        }
        let mut buf = [0u8; 1];
        match self.inner.read(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }
}

/// [`ByteSink`] over any `embedded-io` writer
pub struct IoSink<T> {
    inner: T,
}

impl<T> IoSink<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Write> ByteSink for IoSink<T> {
    type Error = T::Error;

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(data)
    }
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl UartConfig {
    /// Line settings of the telemetry link (115200 8N1)
    pub const LINK: Self = Self {
        baudrate: 115_200,
        data_bits: DataBits::Eight,
        parity: Parity::None,
        stop_bits: StopBits::One,
    };
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::LINK
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

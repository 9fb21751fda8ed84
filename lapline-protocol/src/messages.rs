//! Message classes for the telemetry link
//!
//! Each class has a fixed payload layout. Multi-byte integers are
//! big-endian; floats travel as their raw 4-byte IEEE-754 representation
//! in little-endian order (the native order of both nodes).

use heapless::Vec;

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};
use crate::status::StatusKind;

// Command IDs: transmitter → receiver
pub const CMD_FAST: u8 = 0x01;
pub const CMD_AWARENESS: u8 = 0x02;
pub const CMD_GRAPH: u8 = 0x03;
pub const CMD_HEARTBEAT: u8 = 0x04;
pub const CMD_MESSAGE: u8 = 0x05;

/// Payload lengths of the fixed-layout classes
pub const FAST_LEN: usize = 6;
pub const AWARENESS_LEN: usize = 9;
pub const GRAPH_LEN: usize = 8;
pub const HEARTBEAT_LEN: usize = 1;

/// Maximum custom message length in bytes
pub const MAX_MESSAGE_LEN: usize = 32;

/// Errors from decoding a frame into a [`Message`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Command byte is not one of the known classes
    UnknownCommand(u8),
    /// Payload length does not match the class layout
    LengthMismatch { command: u8, len: u8 },
}

/// The closed set of message classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageClass {
    /// RPM and velocity, every 10 ms
    Fast,
    /// Laps, consumption and efficiency, every 100 ms
    Awareness,
    /// Battery voltage and current, every second
    Graph,
    /// Link status
    Heartbeat,
    /// Custom text, on demand
    Message,
}

impl MessageClass {
    pub const ALL: [MessageClass; 5] = [
        MessageClass::Fast,
        MessageClass::Awareness,
        MessageClass::Graph,
        MessageClass::Heartbeat,
        MessageClass::Message,
    ];

    /// Parse a class from its command byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CMD_FAST => Some(MessageClass::Fast),
            CMD_AWARENESS => Some(MessageClass::Awareness),
            CMD_GRAPH => Some(MessageClass::Graph),
            CMD_HEARTBEAT => Some(MessageClass::Heartbeat),
            CMD_MESSAGE => Some(MessageClass::Message),
            _ => None,
        }
    }

    /// Convert to command byte
    pub fn to_byte(self) -> u8 {
        match self {
            MessageClass::Fast => CMD_FAST,
            MessageClass::Awareness => CMD_AWARENESS,
            MessageClass::Graph => CMD_GRAPH,
            MessageClass::Heartbeat => CMD_HEARTBEAT,
            MessageClass::Message => CMD_MESSAGE,
        }
    }

    /// Payload length for fixed-layout classes, `None` for text
    pub fn fixed_len(self) -> Option<usize> {
        match self {
            MessageClass::Fast => Some(FAST_LEN),
            MessageClass::Awareness => Some(AWARENESS_LEN),
            MessageClass::Graph => Some(GRAPH_LEN),
            MessageClass::Heartbeat => Some(HEARTBEAT_LEN),
            MessageClass::Message => None,
        }
    }

    /// Whether a payload of `len` bytes is valid for this class
    pub fn accepts_len(self, len: usize) -> bool {
        match self.fixed_len() {
            Some(expected) => len == expected,
            None => (1..=MAX_MESSAGE_LEN).contains(&len),
        }
    }
}

/// FAST payload
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FastData {
    pub rpm: u16,
    /// km/h
    pub velocity: f32,
}

/// AWARENESS payload
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AwarenessData {
    pub laps: u8,
    pub consumption: f32,
    pub efficiency: f32,
}

/// GRAPH payload
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GraphData {
    pub battery_voltage: f32,
    pub current_amps: f32,
}

/// Custom message text, at most [`MAX_MESSAGE_LEN`] bytes
///
/// The bytes are kept as received. [`MessageText::as_str`] returns the
/// longest valid UTF-8 prefix so a mangled message still shows something.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MessageText {
    bytes: Vec<u8, MAX_MESSAGE_LEN>,
}

impl MessageText {
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Build from raw bytes, failing if longer than [`MAX_MESSAGE_LEN`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        let mut text = Self::new();
        text.bytes
            .extend_from_slice(bytes)
            .map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(text)
    }

    /// Build from a string, cutting it at [`MAX_MESSAGE_LEN`] bytes
    pub fn truncated(text: &str) -> Self {
        let len = text.len().min(MAX_MESSAGE_LEN);
        let mut out = Self::new();
        // Cannot fail: len is within capacity
        let _ = out.bytes.extend_from_slice(&text.as_bytes()[..len]);
        out
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_str(&self) -> &str {
        match core::str::from_utf8(&self.bytes) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&self.bytes[..e.valid_up_to()]).unwrap_or(""),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A decoded (or to-be-encoded) telemetry message
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Message {
    Fast(FastData),
    Awareness(AwarenessData),
    Graph(GraphData),
    /// Raw status byte; see [`StatusKind`]
    Heartbeat { status: u8 },
    Text(MessageText),
}

impl Message {
    /// Heartbeat carrying a known status
    pub fn heartbeat(status: StatusKind) -> Self {
        Message::Heartbeat {
            status: status.to_byte(),
        }
    }

    /// Class of this message
    pub fn class(&self) -> MessageClass {
        match self {
            Message::Fast(_) => MessageClass::Fast,
            Message::Awareness(_) => MessageClass::Awareness,
            Message::Graph(_) => MessageClass::Graph,
            Message::Heartbeat { .. } => MessageClass::Heartbeat,
            Message::Text(_) => MessageClass::Message,
        }
    }

    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
        let overflow = |_| FrameError::PayloadTooLarge;

        match self {
            Message::Fast(data) => {
                // Payload: [rpm:u16 BE][velocity:f32]
                payload
                    .extend_from_slice(&data.rpm.to_be_bytes())
                    .map_err(overflow)?;
                payload
                    .extend_from_slice(&data.velocity.to_le_bytes())
                    .map_err(overflow)?;
            }
            Message::Awareness(data) => {
                // Payload: [laps:u8][consumption:f32][efficiency:f32]
                payload.push(data.laps).map_err(|_| FrameError::PayloadTooLarge)?;
                payload
                    .extend_from_slice(&data.consumption.to_le_bytes())
                    .map_err(overflow)?;
                payload
                    .extend_from_slice(&data.efficiency.to_le_bytes())
                    .map_err(overflow)?;
            }
            Message::Graph(data) => {
                // Payload: [battery_voltage:f32][current_amps:f32]
                payload
                    .extend_from_slice(&data.battery_voltage.to_le_bytes())
                    .map_err(overflow)?;
                payload
                    .extend_from_slice(&data.current_amps.to_le_bytes())
                    .map_err(overflow)?;
            }
            Message::Heartbeat { status } => {
                payload.push(*status).map_err(|_| FrameError::PayloadTooLarge)?;
            }
            Message::Text(text) => {
                payload
                    .extend_from_slice(text.as_bytes())
                    .map_err(overflow)?;
            }
        }

        Frame::new(self.class().to_byte(), &payload)
    }

    /// Encode this message straight into a wire buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        self.to_frame()?.encode(buffer)
    }

    /// Decode a frame
    ///
    /// The payload length must match the class layout exactly; anything
    /// else is rejected whole, so a truncated payload never yields a
    /// partially filled message.
    pub fn from_frame(frame: &Frame) -> Result<Self, DecodeError> {
        let class = MessageClass::from_byte(frame.command)
            .ok_or(DecodeError::UnknownCommand(frame.command))?;
        let p = frame.payload.as_slice();

        if !class.accepts_len(p.len()) {
            return Err(DecodeError::LengthMismatch {
                command: frame.command,
                len: p.len() as u8,
            });
        }

        let message = match class {
            MessageClass::Fast => Message::Fast(FastData {
                rpm: u16::from_be_bytes([p[0], p[1]]),
                velocity: read_f32(p, 2),
            }),
            MessageClass::Awareness => Message::Awareness(AwarenessData {
                laps: p[0],
                consumption: read_f32(p, 1),
                efficiency: read_f32(p, 5),
            }),
            MessageClass::Graph => Message::Graph(GraphData {
                battery_voltage: read_f32(p, 0),
                current_amps: read_f32(p, 4),
            }),
            MessageClass::Heartbeat => Message::Heartbeat { status: p[0] },
            MessageClass::Message => {
                // Length already validated against MAX_MESSAGE_LEN
                let text = MessageText::from_bytes(p).map_err(|_| DecodeError::LengthMismatch {
                    command: frame.command,
                    len: p.len() as u8,
                })?;
                Message::Text(text)
            }
        };

        Ok(message)
    }
}

fn read_f32(p: &[u8], at: usize) -> f32 {
    f32::from_le_bytes([p[at], p[at + 1], p[at + 2], p[at + 3]])
}

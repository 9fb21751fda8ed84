//! Frame encoding and decoding for the telemetry link.
//!
//! Frame format:
//! - SYNC (1 byte): 0xAA synchronization marker
//! - COMMAND (1 byte): message class identifier
//! - LENGTH (1 byte): payload length (0-32)
//! - PAYLOAD (0-32 bytes): class-specific data
//!
//! There is no checksum and no escaping. A SYNC byte inside a payload is
//! ordinary data; the parser only looks for SYNC between frames.
//!
//! A LENGTH of 0 completes the frame at the length byte. The parser does
//! not wait for a payload byte that was never sent.

use heapless::Vec;

/// Frame synchronization byte
pub const SYNC_BYTE: u8 = 0xAA;

/// Byte the receiver sends back to ask for a lap reset
pub const RESET_REQUEST: u8 = SYNC_BYTE;

/// Maximum payload size in bytes (receiver buffer capacity)
pub const MAX_PAYLOAD_SIZE: usize = 32;

/// SYNC + COMMAND + LENGTH
pub const HEADER_SIZE: usize = 3;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = HEADER_SIZE + MAX_PAYLOAD_SIZE;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Received LENGTH byte exceeds the payload buffer; frame discarded
    LengthOverflow(u8),
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Message class identifier
    pub command: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given command and payload
    pub fn new(command: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            command,
            payload: payload_vec,
        })
    }

    /// Number of bytes this frame occupies on the wire
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[0] = SYNC_BYTE;
        buffer[1] = self.command;
        buffer[2] = self.payload.len() as u8;
        buffer[HEADER_SIZE..frame_len].copy_from_slice(&self.payload);

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }
}

/// Receive state of a [`FrameParser`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxState {
    /// Discarding bytes until a SYNC byte
    WaitSync,
    /// Got SYNC, next byte is the command
    WaitCommand,
    /// Got command, next byte is the payload length
    WaitLength,
    /// Collecting payload bytes
    WaitPayload,
}

/// Incremental frame parser
///
/// Keeps its state between calls, so bytes can be fed one at a time as
/// they trickle out of the UART. A frame whose LENGTH exceeds
/// [`MAX_PAYLOAD_SIZE`] is dropped and the parser goes back to hunting
/// for SYNC.
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: RxState,
    buffer: Vec<u8, MAX_PAYLOAD_SIZE>,
    expected_length: u8,
    command: u8,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub const fn new() -> Self {
        Self {
            state: RxState::WaitSync,
            buffer: Vec::new(),
            expected_length: 0,
            command: 0,
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.state = RxState::WaitSync;
        self.buffer.clear();
        self.expected_length = 0;
        self.command = 0;
    }

    /// Current receive state
    pub fn state(&self) -> RxState {
        self.state
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` when the frame in
    /// progress was discarded.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            RxState::WaitSync => {
                if byte == SYNC_BYTE {
                    self.state = RxState::WaitCommand;
                }
                // Silently ignore non-SYNC bytes while waiting
                Ok(None)
            }
            RxState::WaitCommand => {
                self.command = byte;
                self.state = RxState::WaitLength;
                Ok(None)
            }
            RxState::WaitLength => {
                if byte as usize > MAX_PAYLOAD_SIZE {
                    self.reset();
                    return Err(FrameError::LengthOverflow(byte));
                }
                self.expected_length = byte;
                self.buffer.clear();
                if byte == 0 {
                    return Ok(Some(self.take_frame()));
                }
                self.state = RxState::WaitPayload;
                Ok(None)
            }
            RxState::WaitPayload => {
                // Cannot overflow: expected_length was checked against capacity
                let _ = self.buffer.push(byte);
                if self.buffer.len() == self.expected_length as usize {
                    return Ok(Some(self.take_frame()));
                }
                Ok(None)
            }
        }
    }

    /// Feed a run of bytes, yielding every frame (or error) they complete
    ///
    /// Bytes left over after the last complete frame stay buffered in the
    /// parser for the next call.
    pub fn feed_bytes<'a>(&'a mut self, bytes: &'a [u8]) -> Frames<'a> {
        Frames {
            parser: self,
            bytes: bytes.iter(),
        }
    }

    fn take_frame(&mut self) -> Frame {
        let frame = Frame {
            command: self.command,
            payload: core::mem::take(&mut self.buffer),
        };
        self.reset();
        frame
    }
}

/// Iterator returned by [`FrameParser::feed_bytes`]
pub struct Frames<'a> {
    parser: &'a mut FrameParser,
    bytes: core::slice::Iter<'a, u8>,
}

impl Iterator for Frames<'_> {
    type Item = Result<Frame, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        for &byte in self.bytes.by_ref() {
            match self.parser.feed(byte) {
                Ok(None) => continue,
                Ok(Some(frame)) => return Some(Ok(frame)),
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

//! Link decoding into the telemetry store

use lapline_hal::ByteSource;
use lapline_protocol::{FrameParser, RxState};

use crate::store::TelemetryStore;

/// Link health counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    /// Frames decoded and applied
    pub frames: u32,
    /// Frames dropped for an oversized length byte
    pub framing_errors: u32,
    /// Complete frames with an unknown class or wrong payload length
    pub rejected: u32,
}

/// Byte-stream front end of the receiver
#[derive(Debug, Clone, Default)]
pub struct LinkReceiver {
    parser: FrameParser,
    stats: LinkStats,
}

impl LinkReceiver {
    pub const fn new() -> Self {
        Self {
            parser: FrameParser::new(),
            stats: LinkStats {
                frames: 0,
                framing_errors: 0,
                rejected: 0,
            },
        }
    }

    /// Drain every buffered byte from `source` into `store`
    ///
    /// Returns the number of bytes consumed. A read error ends the drain
    /// as if the source were empty.
    pub fn poll<S: ByteSource>(&mut self, source: &mut S, store: &mut TelemetryStore) -> usize {
        let mut consumed = 0;
        while let Ok(Some(byte)) = source.read_byte() {
            self.feed(byte, store);
            consumed += 1;
        }
        consumed
    }

    /// Advance the parser by one byte
    pub fn feed(&mut self, byte: u8, store: &mut TelemetryStore) {
        match self.parser.feed(byte) {
            Ok(None) => {}
            Ok(Some(frame)) => match store.apply_frame(&frame) {
                Ok(_class) => {
                    self.stats.frames = self.stats.frames.wrapping_add(1);
                    #[cfg(feature = "defmt")]
                    defmt::trace!("link: applied {}", _class);
                }
                Err(_e) => {
                    self.stats.rejected = self.stats.rejected.wrapping_add(1);
                    #[cfg(feature = "defmt")]
                    defmt::trace!("link: rejected frame: {}", _e);
                }
            },
            Err(_e) => {
                self.stats.framing_errors = self.stats.framing_errors.wrapping_add(1);
                #[cfg(feature = "defmt")]
                defmt::warn!("link: framing error: {}", _e);
            }
        }
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    pub fn parser_state(&self) -> RxState {
        self.parser.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lapline_hal::{ByteQueue, ByteSink};
    use lapline_protocol::frame::MAX_FRAME_SIZE;
    use lapline_protocol::{FastData, GraphData, Message, MessageText, SYNC_BYTE};

    fn wire(messages: &[Message]) -> ByteQueue<512> {
        let mut queue = ByteQueue::new();
        for message in messages {
            let mut buf = [0u8; MAX_FRAME_SIZE];
            let len = message.encode(&mut buf).unwrap();
            queue.write_bytes(&buf[..len]).unwrap();
        }
        queue
    }

    #[test]
    fn test_poll_applies_frames() {
        let mut link = LinkReceiver::new();
        let mut store = TelemetryStore::new();
        let mut source = wire(&[
            Message::Fast(FastData {
                rpm: 12,
                velocity: 3.5,
            }),
            Message::Graph(GraphData {
                battery_voltage: 25.0,
                current_amps: 9.0,
            }),
            Message::Text(MessageText::truncated("hi")),
        ]);

        let consumed = link.poll(&mut source, &mut store);
        assert_eq!(consumed, 9 + 11 + 5);
        assert!(source.is_empty());
        assert_eq!(link.stats().frames, 3);
        assert_eq!(store.data().rpm, 12);
        assert_eq!(store.data().battery_voltage, 25.0);
        assert_eq!(store.custom_text().as_str(), "hi");
        assert_eq!(link.parser_state(), RxState::WaitSync);
    }

    #[test]
    fn test_counts_errors() {
        let mut link = LinkReceiver::new();
        let mut store = TelemetryStore::new();
        let mut source = ByteQueue::<64>::from_slice(&[
            // Oversized length
            SYNC_BYTE, 0x01, 200,
            // Unknown class
            SYNC_BYTE, 0x09, 1, 0x00,
            // FAST with a short payload
            SYNC_BYTE, 0x01, 2, 0x00, 0x01,
        ])
        .unwrap();

        link.poll(&mut source, &mut store);
        assert_eq!(
            link.stats(),
            LinkStats {
                frames: 0,
                framing_errors: 1,
                rejected: 2
            }
        );
        assert_eq!(store.data().rpm, 0);
    }

    #[test]
    fn test_partial_frame_survives_polls() {
        let mut link = LinkReceiver::new();
        let mut store = TelemetryStore::new();
        let mut full = wire(&[Message::Fast(FastData {
            rpm: 999,
            velocity: 50.0,
        })]);

        let mut first = ByteQueue::<16>::new();
        for _ in 0..4 {
            first.write_bytes(&[full.pop().unwrap()]).unwrap();
        }
        link.poll(&mut first, &mut store);
        assert_eq!(link.parser_state(), RxState::WaitPayload);
        assert_eq!(store.data().rpm, 0);

        link.poll(&mut full, &mut store);
        assert_eq!(store.data().rpm, 999);
        assert_eq!(link.stats().frames, 1);
    }
}

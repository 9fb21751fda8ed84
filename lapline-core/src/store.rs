//! Receiver-side telemetry store
//!
//! Single writer: the link receiver applies decoded messages here. The
//! dashboard projections only read, apart from acknowledging the message
//! dirty flag.

use lapline_protocol::{DecodeError, Frame, Message, MessageClass, MessageText};

use crate::telemetry::TelemetryData;

/// Last decoded value of every field, plus the custom message text
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryStore {
    data: TelemetryData,
    text: MessageText,
    message_dirty: bool,
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the fields carried by `message`
    ///
    /// A MESSAGE replaces the custom text and raises the dirty flag.
    pub fn apply(&mut self, message: &Message) {
        match message {
            Message::Fast(fast) => {
                self.data.rpm = fast.rpm;
                self.data.velocity = fast.velocity;
            }
            Message::Awareness(awareness) => {
                self.data.laps = awareness.laps;
                self.data.consumption = awareness.consumption;
                self.data.efficiency = awareness.efficiency;
            }
            Message::Graph(graph) => {
                self.data.battery_voltage = graph.battery_voltage;
                self.data.current_amps = graph.current_amps;
            }
            Message::Heartbeat { status } => {
                self.data.status = *status;
            }
            Message::Text(text) => {
                self.text = text.clone();
                self.message_dirty = true;
            }
        }
    }

    /// Decode a frame and apply it
    ///
    /// On error the store is left untouched.
    pub fn apply_frame(&mut self, frame: &Frame) -> Result<MessageClass, DecodeError> {
        let message = Message::from_frame(frame)?;
        self.apply(&message);
        Ok(message.class())
    }

    pub fn data(&self) -> &TelemetryData {
        &self.data
    }

    /// Most recent custom message text
    pub fn custom_text(&self) -> &MessageText {
        &self.text
    }

    /// True when a new custom message arrived and has not been shown yet
    pub fn message_dirty(&self) -> bool {
        self.message_dirty
    }

    pub fn clear_message_dirty(&mut self) {
        self.message_dirty = false;
    }
}

//! Telemetry record shared by both nodes
//!
//! The transmitter fills one of these from its sensors and slices it into
//! messages. The receiver keeps one in its store and overwrites it one
//! message at a time.

use lapline_protocol::{
    AwarenessData, FastData, GraphData, Message, MessageClass, StatusKind,
};

/// Latest value of every telemetry field
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryData {
    /// Battery voltage (V)
    pub battery_voltage: f32,
    /// Current draw (A)
    pub current_amps: f32,
    pub laps: u8,
    pub consumption: f32,
    pub efficiency: f32,
    pub rpm: u16,
    /// km/h
    pub velocity: f32,
    /// Raw heartbeat status byte
    pub status: u8,
}

impl TelemetryData {
    pub fn fast(&self) -> Message {
        Message::Fast(FastData {
            rpm: self.rpm,
            velocity: self.velocity,
        })
    }

    pub fn awareness(&self) -> Message {
        Message::Awareness(AwarenessData {
            laps: self.laps,
            consumption: self.consumption,
            efficiency: self.efficiency,
        })
    }

    pub fn graph(&self) -> Message {
        Message::Graph(GraphData {
            battery_voltage: self.battery_voltage,
            current_amps: self.current_amps,
        })
    }

    pub fn heartbeat(&self) -> Message {
        Message::Heartbeat {
            status: self.status,
        }
    }

    /// Message for a scheduled class
    ///
    /// Returns `None` for [`MessageClass::Message`], which carries operator
    /// text rather than telemetry.
    pub fn message(&self, class: MessageClass) -> Option<Message> {
        match class {
            MessageClass::Fast => Some(self.fast()),
            MessageClass::Awareness => Some(self.awareness()),
            MessageClass::Graph => Some(self.graph()),
            MessageClass::Heartbeat => Some(self.heartbeat()),
            MessageClass::Message => None,
        }
    }

    /// Status as a known kind, if the byte is one
    pub fn status_kind(&self) -> Option<StatusKind> {
        StatusKind::from_byte(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TelemetryData {
        TelemetryData {
            battery_voltage: 24.1,
            current_amps: 8.5,
            laps: 3,
            consumption: 130.25,
            efficiency: 181.5,
            rpm: 420,
            velocity: 79.9,
            status: StatusKind::Custom.to_byte(),
        }
    }

    #[test]
    fn test_scheduled_messages_carry_fields() {
        let data = sample();
        assert_eq!(
            data.message(MessageClass::Fast),
            Some(Message::Fast(FastData {
                rpm: 420,
                velocity: 79.9
            }))
        );
        assert_eq!(
            data.message(MessageClass::Graph),
            Some(Message::Graph(GraphData {
                battery_voltage: 24.1,
                current_amps: 8.5
            }))
        );
        assert_eq!(
            data.message(MessageClass::Heartbeat),
            Some(Message::Heartbeat { status: 2 })
        );
        assert_eq!(data.message(MessageClass::Message), None);
    }

    #[test]
    fn test_status_kind() {
        let mut data = sample();
        assert_eq!(data.status_kind(), Some(StatusKind::Custom));
        data.status = 9;
        assert_eq!(data.status_kind(), None);
    }
}

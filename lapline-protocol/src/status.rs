//! Link status carried by the heartbeat

/// Status values sent in every HEARTBEAT frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusKind {
    /// Nothing to announce
    #[default]
    Idle,
    /// Lap counter was just reset from the dashboard
    Reset,
    /// A custom text message is active
    Custom,
}

// Wire format values
const STATUS_IDLE: u8 = 0x00;
const STATUS_RESET: u8 = 0x01;
const STATUS_CUSTOM: u8 = 0x02;

impl StatusKind {
    /// Parse a status from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            STATUS_IDLE => Some(StatusKind::Idle),
            STATUS_RESET => Some(StatusKind::Reset),
            STATUS_CUSTOM => Some(StatusKind::Custom),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            StatusKind::Idle => STATUS_IDLE,
            StatusKind::Reset => STATUS_RESET,
            StatusKind::Custom => STATUS_CUSTOM,
        }
    }

    /// Returns true if the dashboard should show the custom message text
    pub fn shows_custom_text(&self) -> bool {
        matches!(self, StatusKind::Custom)
    }
}

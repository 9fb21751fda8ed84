//! Status banner
//!
//! Shows what the transmitter's heartbeat status says, and the custom
//! text when there is one. Redrawn only when the status changes or a new
//! custom message arrives.

use lapline_display::{palette, DashboardBackend, DisplayError, Label};
use lapline_protocol::StatusKind;

use crate::store::TelemetryStore;

pub const IDLE_TEXT: &str = "Waiting for message...";
pub const RESET_TEXT: &str = "Full attempt timer reset.";

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MessageBanner {
    last_status: Option<u8>,
}

impl MessageBanner {
    pub const fn new() -> Self {
        Self { last_status: None }
    }

    /// Redraw if needed, returning true if the banner was written
    ///
    /// Clears the store's message dirty flag once the banner is drawn. A
    /// failed write leaves the state alone so the next update retries.
    /// Unknown status values are remembered but leave the banner as it was.
    pub fn update<B: DashboardBackend>(
        &mut self,
        store: &mut TelemetryStore,
        backend: &mut B,
    ) -> Result<bool, DisplayError> {
        let status = store.data().status;
        if !store.message_dirty() && self.last_status == Some(status) {
            return Ok(false);
        }

        let drawn = match StatusKind::from_byte(status) {
            Some(kind) if kind.shows_custom_text() => {
                backend.set_label_text(Label::Message, store.custom_text().as_str())?;
                backend.set_label_color(Label::Message, palette::TEXT_BRIGHT)?;
                true
            }
            Some(kind) => {
                let text = match kind {
                    StatusKind::Reset => RESET_TEXT,
                    _ => IDLE_TEXT,
                };
                backend.set_label_text(Label::Message, text)?;
                backend.set_label_color(Label::Message, palette::TEXT_MUTED)?;
                true
            }
            None => false,
        };

        self.last_status = Some(status);
        store.clear_message_dirty();
        Ok(drawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lapline_display::Panel;
    use lapline_protocol::{Message, MessageText};

    #[test]
    fn test_first_update_draws_idle() {
        let mut banner = MessageBanner::new();
        let mut store = TelemetryStore::new();
        let mut panel = Panel::default();

        assert_eq!(banner.update(&mut store, &mut panel), Ok(true));
        assert_eq!(panel.label(Label::Message), IDLE_TEXT);
        assert_eq!(panel.label_color(Label::Message), Some(palette::TEXT_MUTED));

        assert_eq!(banner.update(&mut store, &mut panel), Ok(false));
        assert_eq!(panel.label_writes(Label::Message), 1);
    }

    #[test]
    fn test_status_change_and_new_text() {
        let mut banner = MessageBanner::new();
        let mut store = TelemetryStore::new();
        let mut panel = Panel::default();
        banner.update(&mut store, &mut panel).unwrap();

        store.apply(&Message::Text(MessageText::truncated("pit in 2")));
        store.apply(&Message::heartbeat(StatusKind::Custom));
        assert_eq!(banner.update(&mut store, &mut panel), Ok(true));
        assert_eq!(panel.label(Label::Message), "pit in 2");
        assert_eq!(panel.label_color(Label::Message), Some(palette::TEXT_BRIGHT));
        assert!(!store.message_dirty());

        // Same status, new text: dirty flag forces a redraw
        store.apply(&Message::Text(MessageText::truncated("pit now")));
        assert_eq!(banner.update(&mut store, &mut panel), Ok(true));
        assert_eq!(panel.label(Label::Message), "pit now");
        assert_eq!(banner.update(&mut store, &mut panel), Ok(false));

        store.apply(&Message::heartbeat(StatusKind::Reset));
        assert_eq!(banner.update(&mut store, &mut panel), Ok(true));
        assert_eq!(panel.label(Label::Message), RESET_TEXT);
    }

    #[test]
    fn test_failed_write_is_retried() {
        let mut banner = MessageBanner::new();
        let mut store = TelemetryStore::new();
        let mut panel = Panel::default();
        banner.update(&mut store, &mut panel).unwrap();

        store.apply(&Message::heartbeat(StatusKind::Reset));
        panel.fail_label_writes(1);
        assert_eq!(
            banner.update(&mut store, &mut panel),
            Err(DisplayError::Communication)
        );
        assert_eq!(panel.label(Label::Message), IDLE_TEXT);

        assert_eq!(banner.update(&mut store, &mut panel), Ok(true));
        assert_eq!(panel.label(Label::Message), RESET_TEXT);
        assert_eq!(banner.update(&mut store, &mut panel), Ok(false));
    }

    #[test]
    fn test_failed_custom_text_keeps_dirty_flag() {
        let mut banner = MessageBanner::new();
        let mut store = TelemetryStore::new();
        let mut panel = Panel::default();
        store.apply(&Message::heartbeat(StatusKind::Custom));
        banner.update(&mut store, &mut panel).unwrap();

        store.apply(&Message::Text(MessageText::truncated("box")));
        panel.fail_label_writes(1);
        assert!(banner.update(&mut store, &mut panel).is_err());
        assert!(store.message_dirty());
        assert_eq!(banner.update(&mut store, &mut panel), Ok(true));
        assert_eq!(panel.label(Label::Message), "box");
    }

    #[test]
    fn test_unknown_status_leaves_banner() {
        let mut banner = MessageBanner::new();
        let mut store = TelemetryStore::new();
        let mut panel = Panel::default();
        banner.update(&mut store, &mut panel).unwrap();

        store.apply(&Message::Heartbeat { status: 0x42 });
        assert_eq!(banner.update(&mut store, &mut panel), Ok(false));
        assert_eq!(panel.label(Label::Message), IDLE_TEXT);
        assert_eq!(panel.label_writes(Label::Message), 1);
    }
}

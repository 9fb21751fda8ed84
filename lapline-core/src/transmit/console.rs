//! Operator console
//!
//! Line-oriented commands typed on the transmitter's debug serial port:
//!
//! - `idle`: back to the idle status
//! - `msg <text>`: show `<text>` on the dashboard
//!
//! Anything else is ignored.

use heapless::Vec;
use lapline_protocol::{MessageText, MAX_MESSAGE_LEN};

/// Longest line kept, excluding the terminator
pub const CONSOLE_LINE_LEN: usize = 63;

const MSG_PREFIX: &[u8] = b"msg ";

/// A parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleCommand {
    Idle,
    /// Custom text, cut to the message capacity
    Message(MessageText),
}

/// Accumulates console bytes into lines and parses them
#[derive(Debug, Default)]
pub struct ConsoleParser {
    line: Vec<u8, CONSOLE_LINE_LEN>,
}

impl ConsoleParser {
    pub const fn new() -> Self {
        Self { line: Vec::new() }
    }

    /// Feed one byte, returning a command when a line completes
    ///
    /// Bytes past the line capacity are dropped until the terminator.
    pub fn feed(&mut self, byte: u8) -> Option<ConsoleCommand> {
        match byte {
            b'\r' | b'\n' => {
                let command = parse_line(&self.line);
                self.line.clear();
                command
            }
            _ => {
                let _ = self.line.push(byte);
                None
            }
        }
    }
}

fn parse_line(line: &[u8]) -> Option<ConsoleCommand> {
    if line == b"idle" {
        return Some(ConsoleCommand::Idle);
    }
    let text = line.strip_prefix(MSG_PREFIX)?;
    let text = &text[..text.len().min(MAX_MESSAGE_LEN)];
    MessageText::from_bytes(text).ok().map(ConsoleCommand::Message)
}

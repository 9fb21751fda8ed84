//! Debounced lap button

/// Push button that counts presses
///
/// A level change is accepted once the raw input has held it for the
/// debounce time. A press is reported on the accepted released-to-pressed
/// edge.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LapButton {
    debounce_ms: u32,
    /// Raw level seen on the last update
    raw: bool,
    /// When `raw` last changed
    raw_since_ms: u32,
    /// Accepted level
    stable: bool,
}

impl LapButton {
    pub const fn new(debounce_ms: u32) -> Self {
        Self {
            debounce_ms,
            raw: false,
            raw_since_ms: 0,
            stable: false,
        }
    }

    /// Feed the raw pressed level, returning true on a new press
    pub fn update(&mut self, pressed: bool, now_ms: u32) -> bool {
        if pressed != self.raw {
            self.raw = pressed;
            self.raw_since_ms = now_ms;
            return false;
        }

        if self.stable != self.raw && now_ms.wrapping_sub(self.raw_since_ms) >= self.debounce_ms {
            self.stable = self.raw;
            return self.stable;
        }

        false
    }

    /// Debounced level
    pub fn is_pressed(&self) -> bool {
        self.stable
    }
}

//! RGB colors and the dashboard palette

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a `0xRRGGBB` literal
    pub const fn hex(value: u32) -> Self {
        Self {
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        }
    }

    /// Pack as `0xRRGGBB`
    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Linear mix of two colors
    ///
    /// `ratio` 255 yields `a`, 0 yields `b`.
    pub fn mix(a: Color, b: Color, ratio: u8) -> Color {
        Color {
            r: mix_channel(a.r, b.r, ratio),
            g: mix_channel(a.g, b.g, ratio),
            b: mix_channel(a.b, b.b, ratio),
        }
    }
}

fn mix_channel(a: u8, b: u8, ratio: u8) -> u8 {
    let ratio = ratio as u16;
    ((a as u16 * ratio + b as u16 * (255 - ratio) + 127) / 255) as u8
}

/// Fixed dashboard colors
pub mod palette {
    use super::Color;

    /// Arc color at low speed
    pub const BLUE: Color = Color::hex(0x2196F3);
    /// Arc color around 90 km/h
    pub const PURPLE: Color = Color::hex(0x9C27B0);
    /// Arc color at top speed
    pub const RED: Color = Color::hex(0xF44336);
    /// Status banner text for built-in messages
    pub const TEXT_MUTED: Color = Color::hex(0x7D7E82);
    /// Status banner text for custom messages
    pub const TEXT_BRIGHT: Color = Color::hex(0xD4D3D6);
}

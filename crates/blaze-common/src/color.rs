//! RGBA color values packed as `0xRRGGBBAA`.

use serde::{Deserialize, Serialize};

/// Color value in RGBA format, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Decode a packed `0xRRGGBBAA` value.
    #[inline]
    pub const fn from_hex(hex: u32) -> Self {
        let [r, g, b, a] = hex.to_be_bytes();
        Self { r, g, b, a }
    }

    /// Encode back to `0xRRGGBBAA`.
    #[inline]
    pub const fn to_hex(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }

    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub const fn from_array([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }

    /// Channels mapped to [0, 1].
    #[inline(always)]
    pub fn to_unit(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    /// Parse `#RRGGBBAA` or `#RRGGBB` (opaque). The leading `#` is optional.
    pub fn parse_hex_str(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let value = u32::from_str_radix(hex, 16).ok()?;
        match hex.len() {
            8 => Some(Self::from_hex(value)),
            6 => Some(Self::from_hex((value << 8) | 0xff)),
            _ => None,
        }
    }
}

impl From<u32> for Rgba {
    fn from(hex: u32) -> Self {
        Self::from_hex(hex)
    }
}

impl From<Rgba> for u32 {
    fn from(color: Rgba) -> Self {
        color.to_hex()
    }
}

//! Presentation colour carried by each agent.  The simulation never reads it.

use std::fmt;

use crate::{PsError, PsResult};

/// 8-bit RGBA colour.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Parse `#rrggbb`, `rrggbb`, or the same with a trailing alpha byte.
    pub fn from_hex(hex: &str) -> PsResult<Color> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.is_ascii() || !matches!(digits.len(), 6 | 8) {
            return Err(PsError::Parse(format!("colour {hex:?} is not 6 or 8 hex digits")));
        }
        let byte = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|e| PsError::Parse(format!("colour {hex:?}: {e}")))
        };
        let a = if digits.len() == 8 { byte(6)? } else { 0xff };
        Ok(Color { r: byte(0)?, g: byte(2)?, b: byte(4)?, a })
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 0xff {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

//! The 16-color console palette.
//!
//! Colors are identified by a palette index 0-15 under the historical
//! console numbering: 0=Black, 1=DarkBlue, 2=DarkGreen, ... 7=Gray,
//! 8=DarkGray, ... 15=White. Note that blue sorts before green in this
//! scheme (it is bit-plane order, not RGB order); both backends rely on
//! the exact numbering, so it must never be rearranged.

use crate::error::{ConsoleError, Result};

/// One of the sixteen fixed console colors.
///
/// The discriminant is the palette index. Indices 0-7 are the dark
/// (standard-intensity) colors, 8-15 the bright variants in the same
/// relative order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    DarkBlue = 1,
    DarkGreen = 2,
    DarkCyan = 3,
    DarkRed = 4,
    DarkMagenta = 5,
    DarkYellow = 6,
    Gray = 7,
    DarkGray = 8,
    Blue = 9,
    Green = 10,
    Cyan = 11,
    Red = 12,
    Magenta = 13,
    Yellow = 14,
    White = 15,
}

/// All sixteen colors in palette order, for index lookups.
const PALETTE: [Color; 16] = [
    Color::Black,
    Color::DarkBlue,
    Color::DarkGreen,
    Color::DarkCyan,
    Color::DarkRed,
    Color::DarkMagenta,
    Color::DarkYellow,
    Color::Gray,
    Color::DarkGray,
    Color::Blue,
    Color::Green,
    Color::Cyan,
    Color::Red,
    Color::Magenta,
    Color::Yellow,
    Color::White,
];

impl Color {
    /// Returns the color for a palette index.
    ///
    /// This is the only way to turn an integer into a `Color`; indices
    /// above 15 are rejected here and can never reach a backend, so a
    /// failed conversion leaves console state untouched.
    pub fn from_index(index: u8) -> Result<Self> {
        PALETTE
            .get(index as usize)
            .copied()
            .ok_or(ConsoleError::InvalidColor(index))
    }

    /// The palette index (0-15) of this color.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Whether this is one of the bright (8-15) variants.
    pub fn is_bright(self) -> bool {
        self.index() >= 8
    }
}

/// A packed color pair: background in the high nibble, foreground in the
/// low nibble, the layout the Win32 console attribute word uses.
///
/// Every `u8` is a valid attribute since both nibbles are 0-15 by
/// construction, so setting a combined attribute can only fail on the
/// output path, never on validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute(u8);

impl Attribute {
    /// Packs a foreground/background pair.
    pub fn new(foreground: Color, background: Color) -> Self {
        Attribute((background.index() << 4) | foreground.index())
    }

    /// Wraps a raw attribute byte as-is.
    pub fn from_raw(raw: u8) -> Self {
        Attribute(raw)
    }

    /// The foreground color (low nibble).
    pub fn foreground(self) -> Color {
        PALETTE[(self.0 & 0x0F) as usize]
    }

    /// The background color (high nibble).
    pub fn background(self) -> Color {
        PALETTE[(self.0 >> 4) as usize]
    }

    /// The packed byte.
    pub fn raw(self) -> u8 {
        self.0
    }
}

impl From<Color> for Attribute {
    /// A bare color is a foreground on the default black background.
    fn from(foreground: Color) -> Self {
        Attribute::new(foreground, Color::Black)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_indices_round_trip() {
        for index in 0..=15u8 {
            let color = Color::from_index(index).unwrap();
            assert_eq!(color.index(), index);
        }
    }

    #[test]
    fn indices_above_fifteen_are_rejected() {
        for index in [16u8, 17, 100, 255] {
            match Color::from_index(index) {
                Err(ConsoleError::InvalidColor(i)) => assert_eq!(i, index),
                other => panic!("expected InvalidColor, got {other:?}"),
            }
        }
    }

    #[test]
    fn historical_ordering_is_preserved() {
        // Blue before green: bit-plane order, not RGB order.
        assert_eq!(Color::DarkBlue.index(), 1);
        assert_eq!(Color::DarkGreen.index(), 2);
        assert_eq!(Color::Gray.index(), 7);
        assert_eq!(Color::DarkGray.index(), 8);
        assert_eq!(Color::White.index(), 15);
    }

    #[test]
    fn intensity_split_is_at_eight() {
        assert!(!Color::Gray.is_bright());
        assert!(Color::DarkGray.is_bright());
        assert!(Color::White.is_bright());
    }

    #[test]
    fn attribute_packs_nibbles() {
        let attr = Attribute::new(Color::Yellow, Color::DarkBlue);
        assert_eq!(attr.raw(), 0x1E);
        assert_eq!(attr.foreground(), Color::Yellow);
        assert_eq!(attr.background(), Color::DarkBlue);
    }

    #[test]
    fn any_raw_byte_is_a_valid_attribute() {
        let attr = Attribute::from_raw(0xFF);
        assert_eq!(attr.foreground(), Color::White);
        assert_eq!(attr.background(), Color::White);
    }

    #[test]
    fn bare_color_becomes_foreground_on_black() {
        let attr: Attribute = Color::Red.into();
        assert_eq!(attr.foreground(), Color::Red);
        assert_eq!(attr.background(), Color::Black);
    }
}

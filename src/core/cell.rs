//! Braille cells as dot masks.
//!
//! A cell in the Unicode Braille Patterns block (U+2800..=U+28FF) encodes its
//! raised dots in the low byte of the code point: bit `i` is dot `i + 1`.
//! Dots 7 and 8 (bits 6 and 7) are the "lowered" dots of computer braille.

use std::fmt;

/// First code point of the Braille Patterns block.
pub const BRAILLE_BASE: u32 = 0x2800;

/// The blank cell. It stands for a space and is never matched as content.
pub const BLANK: char = '\u{2800}';

const LOWERED_DOTS: u8 = 0b1100_0000;

/// One braille cell, stored as its 8-bit dot mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BrailleCell(u8);

impl BrailleCell {
    pub const BLANK: BrailleCell = BrailleCell(0);

    pub const fn from_mask(mask: u8) -> Self {
        BrailleCell(mask)
    }

    /// Returns the cell for `c`, or `None` if `c` is outside the braille block.
    pub fn from_char(c: char) -> Option<Self> {
        let offset = (c as u32).checked_sub(BRAILLE_BASE)?;
        u8::try_from(offset).ok().map(BrailleCell)
    }

    pub const fn mask(self) -> u8 {
        self.0
    }

    pub fn to_char(self) -> char {
        // Every u8 offset lands inside the block, so this never falls back.
        char::from_u32(BRAILLE_BASE + u32::from(self.0)).unwrap_or(BLANK)
    }

    pub const fn is_blank(self) -> bool {
        self.0 == 0
    }

    /// True if dot 7 or dot 8 is raised.
    pub const fn is_eight_dot(self) -> bool {
        self.0 & LOWERED_DOTS != 0
    }

    /// The 6-dot cell left after lowering dots 7 and 8.
    pub const fn six_dot(self) -> Self {
        BrailleCell(strip_lowered_dots(self.0))
    }

    /// Raised dots as digits, e.g. `"1237"`; the blank cell gives `"0"`.
    pub fn dot_numbers(self) -> String {
        if self.is_blank() {
            return "0".to_string();
        }
        (0u8..8)
            .filter(|&bit| self.0 & (1 << bit) != 0)
            .map(|bit| char::from(b'1' + bit))
            .collect()
    }
}

impl fmt::Display for BrailleCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Removes dots 7 and 8 from a dot mask.
///
/// Masks below 64 are already 6-dot and come back unchanged; every other mask
/// collapses onto exactly one 6-dot mask.
pub const fn strip_lowered_dots(mask: u8) -> u8 {
    match mask {
        0..64 => mask,
        64..128 => mask - 64,
        128..192 => mask - 128,
        _ => mask - 192,
    }
}

pub fn is_braille(c: char) -> bool {
    BrailleCell::from_char(c).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_char_bounds() {
        assert_eq!(BrailleCell::from_char('\u{2800}'), Some(BrailleCell::BLANK));
        assert_eq!(
            BrailleCell::from_char('\u{28FF}'),
            Some(BrailleCell::from_mask(0xFF))
        );
        assert_eq!(BrailleCell::from_char('\u{27FF}'), None);
        assert_eq!(BrailleCell::from_char('\u{2900}'), None);
        assert_eq!(BrailleCell::from_char('a'), None);
    }

    #[test]
    fn test_strip_lowered_dots_branches() {
        assert_eq!(strip_lowered_dots(0x07), 0x07);
        assert_eq!(strip_lowered_dots(0x47), 0x07); // dot 7
        assert_eq!(strip_lowered_dots(0x87), 0x07); // dot 8
        assert_eq!(strip_lowered_dots(0xC7), 0x07); // dots 7 and 8
    }

    #[test]
    fn test_eight_dot_range_collapses_to_six_dot() {
        for code in 0x2840u32..=0x28FF {
            let c = char::from_u32(code).unwrap();
            let cell = BrailleCell::from_char(c).unwrap();
            assert!(cell.is_eight_dot());

            let stripped = cell.six_dot();
            assert!((0x2800..=0x283F).contains(&(stripped.to_char() as u32)));
            assert_eq!(stripped.six_dot(), stripped);
        }
    }

    #[test]
    fn test_six_dot_cells_unchanged() {
        for mask in 0u8..64 {
            let cell = BrailleCell::from_mask(mask);
            assert!(!cell.is_eight_dot());
            assert_eq!(cell.six_dot(), cell);
        }
    }

    #[test]
    fn test_four_masks_per_six_dot_base() {
        let collapsed = (0u8..=255)
            .filter(|&mask| strip_lowered_dots(mask) == 0x15)
            .count();
        assert_eq!(collapsed, 4);
    }

    #[test]
    fn test_dot_numbers() {
        assert_eq!(BrailleCell::from_mask(0x47).dot_numbers(), "1237");
        assert_eq!(BrailleCell::from_mask(0x80).dot_numbers(), "8");
        assert_eq!(BrailleCell::BLANK.dot_numbers(), "0");
    }
}

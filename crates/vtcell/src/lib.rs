#![warn(clippy::pedantic)]

//! The screen cell: the unit copied to/from history and returned in a
//! terminal's cooked image.
//!
//! A [`Cell`] is a Unicode code point plus a [`Rendition`] (foreground and
//! background color slots, plus a bitset of bold/underline/blink/reverse).
//! It is `Copy` and cheap to duplicate into scrollback or a render buffer.

use bitflags::bitflags;

/// A single screen position: a code point and the attributes it was
/// written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub codepoint: char,
    pub rendition: Rendition,
}

impl Cell {
    /// A cell with a given code point, written under the given rendition.
    #[must_use]
    pub const fn new(codepoint: char, rendition: Rendition) -> Self {
        Self { codepoint, rendition }
    }

    /// Whether this cell is indistinguishable from a freshly cleared one.
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self { codepoint: ' ', rendition: Rendition::default() }
    }
}

/// Foreground or background color: either the terminal's default or one
/// of the 16 indexed ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSlot {
    #[default]
    Default,
    Indexed(u8),
}

impl ColorSlot {
    /// Build an indexed slot, clamping out-of-range indices to the top of
    /// the 0..=15 palette rather than panicking — malformed SGR params are
    /// non-fatal per the interpreter's error policy.
    #[must_use]
    pub fn indexed(idx: u8) -> Self {
        Self::Indexed(idx.min(15))
    }

    /// The named ANSI color this slot holds, if it's an indexed slot.
    #[must_use]
    pub fn named(self) -> Option<AnsiColor> {
        match self {
            Self::Indexed(idx) => AnsiColor::try_from(idx).ok(),
            Self::Default => None,
        }
    }
}

/// The 16 named colors an SGR color index (0..=15) can select, for
/// diagnostics and host palette lookups — `ColorSlot` itself only stores
/// the raw index.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    num_enum::TryFromPrimitive,
    num_enum::IntoPrimitive,
    strum::Display,
)]
#[repr(u8)]
pub enum AnsiColor {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
    BrightBlack = 8,
    BrightRed = 9,
    BrightGreen = 10,
    BrightYellow = 11,
    BrightBlue = 12,
    BrightMagenta = 13,
    BrightCyan = 14,
    BrightWhite = 15,
}

bitflags! {
    /// Bold/underline/blink/reverse, the four attribute bits SGR toggles.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RenditionAttrs: u8 {
        const BOLD      = 0b0001;
        const UNDERLINE = 0b0010;
        const BLINK     = 0b0100;
        const REVERSE   = 0b1000;
    }
}

/// The visual attributes applied when writing a cell: colors plus the
/// bold/underline/blink/reverse bitset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rendition {
    pub fg: ColorSlot,
    pub bg: ColorSlot,
    pub attrs: RenditionAttrs,
}

impl Rendition {
    /// Rendition with the cursor or selection overlay applied: colors
    /// swapped, matching the cooked-image "reversed rendition" overlay
    /// rule rather than toggling the `REVERSE` bit (which would be
    /// indistinguishable from an SGR-set reverse once restored).
    #[must_use]
    pub fn swapped(self) -> Self {
        Self { fg: self.bg, bg: self.fg, attrs: self.attrs }
    }
}

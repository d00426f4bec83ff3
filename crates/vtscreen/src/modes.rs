use bitflags::bitflags;

bitflags! {
    /// The mode bits that live on a [`Screen`](crate::Screen), per the
    /// component design's mode table. `Ansi`, `AppKeyPad`, `AppCuKeys`
    /// and `Mouse1000` live on the emulator instead (see `vtinterp`);
    /// `NewLine` is mirrored onto the screen because
    /// [`Screen::new_line`](crate::Screen::new_line) needs to read it
    /// directly.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ScreenModes: u16 {
        /// Auto-wrap at the right margin.
        const WRAP        = 0b000_0001;
        /// Insert (vs. replace) mode for new characters.
        const INSERT      = 0b000_0010;
        /// Origin mode: cursor addressing is relative to the scrolling
        /// region.
        const ORIGIN      = 0b000_0100;
        /// Cursor is visible in the cooked image.
        const CURSOR      = 0b000_1000;
        /// Reverse video across the whole screen.
        const REVERSE     = 0b001_0000;
        /// The alternate screen buffer is active.
        const APP_SCREEN  = 0b010_0000;
        /// Mirrors the emulator-level newline mode.
        const NEW_LINE    = 0b100_0000;
    }
}

impl ScreenModes {
    /// The modes a freshly created screen starts with: wrap and cursor
    /// visibility on, everything else off.
    #[must_use]
    pub fn initial() -> Self {
        Self::WRAP | Self::CURSOR
    }
}

use bitflags::bitflags;

bitflags! {
    /// The mode bits the component table places on the emulator rather
    /// than a `Screen`: `Ansi`, `NewLine` (mirrored onto the screen
    /// too), `AppKeyPad`, `AppCuKeys`, `Mouse1000`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EmulatorModes: u8 {
        /// ANSI mode (vs. VT52).
        const ANSI       = 0b0_0001;
        /// Newline mode: LF also does a carriage return.
        const NEW_LINE   = 0b0_0010;
        /// Application keypad mode.
        const APP_KEYPAD = 0b0_0100;
        /// Application cursor keys mode.
        const APP_CU_KEYS = 0b0_1000;
        /// Mouse reporting: modes 1000/1002/1003 collapse to this one
        /// bit (a preserved wart, see the open-questions note).
        const MOUSE1000  = 0b1_0000;
    }
}

impl EmulatorModes {
    #[must_use]
    pub fn initial() -> Self {
        Self::ANSI
    }
}

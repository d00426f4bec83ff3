//! External contracts (spec §6): the narrow interfaces `Emulation` calls
//! through rather than owning PTY plumbing, pixel rendering, keyboard
//! translation tables, or a byte-to-Unicode codec itself. A host wires a
//! concrete implementation of each trait to its own event loop; the core
//! never spawns a process, opens a socket, or touches a window toolkit.

use vtcell::Cell;

/// Spawns and drives the child process. Inbound bytes arrive through
/// whatever callback mechanism the host's event loop uses (it calls
/// [`crate::Emulation::feed`] directly); this trait only covers the
/// outbound half plus window-size propagation and teardown.
pub trait Pty {
    /// Write bytes produced by the emulator (key input, replies).
    fn write(&mut self, bytes: &[u8]);
    /// Propagate a window size change to the child's controlling tty.
    fn resize(&mut self, lines: usize, columns: usize);
    /// Send a signal to the child process.
    fn kill(&mut self, signal: i32);
}

/// Render target. Receives a freshly copied cooked image per refresh; it
/// must never retain pointers into screen storage, since the grid is
/// mutated in place between refreshes.
pub trait Display {
    fn set_image(&mut self, cells: &[Cell], lines: usize, columns: usize);
    fn set_cursor_pos(&mut self, x: usize, y: usize);
    fn set_line_wrapped(&mut self, line: usize, wrapped: bool);
    fn set_scroll(&mut self, hist_cursor: usize, hist_lines: usize);
    fn bell(&mut self);
    fn set_selection(&mut self, text: &str);
}

/// One-shot wake-up for the bulk-refresh heuristic's 20 ms quiet window.
/// Any cooperative scheduler works provided its timer resolution is
/// <= 20 ms — the host supplies the scheduler and calls
/// [`crate::Emulation::on_refresh_timer`] when it fires; the core only
/// ever asks to be woken once, never polls.
pub trait RefreshScheduler {
    fn arm(&mut self, millis: u32);
    fn cancel(&mut self);
}

/// What a `KeyTrans` lookup hands back: literal bytes to write to the
/// `Pty`, and whether the keymap entry had an explicit "meta" qualifier
/// (used to disambiguate Alt-as-Meta from Alt-as-nothing bindings).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLookup {
    pub text: Vec<u8>,
    pub meta_specified: bool,
}

/// Keyboard translation table. The emulator folds its own mode state
/// (`NewLine`, `Ansi`, `AppCuKeys`) into `modifier_bits` before calling
/// `lookup`, per spec §6.
pub trait KeyTrans {
    fn lookup(&self, key_code: u32, modifier_bits: u32) -> Option<KeyLookup>;
}

/// Stateful byte-to-code-point decoder, switchable at runtime between a
/// locale codec and UTF-8 (`ESC % G` selects UTF-8, `ESC % @` selects
/// locale). Switching resets the decoder's internal state.
pub trait Codec {
    fn decode(&mut self, bytes: &[u8]) -> Vec<u32>;
    fn reset(&mut self);
}

/// `$PRINT_COMMAND` (or `cat > /dev/null`) target for the `CSI 5 i` /
/// `CSI 4 i` printer pass-through. Spawning the actual subprocess is the
/// host's job; this trait is just the byte sink.
pub trait PrinterSink {
    fn write(&mut self, byte: u8);
}

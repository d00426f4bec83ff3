#![warn(clippy::pedantic)]

//! `Emulation`: the single-threaded feed loop, the bulk-refresh timer
//! heuristic, reconnect semantics, and the external contracts
//! (`Pty`, `Display`, `KeyTrans`, `Codec`, `PrinterSink`,
//! `RefreshScheduler`) a host implements to drive it.
//!
//! Everything here is single-threaded and cooperative: `feed` is the
//! only mutation entry point, driven by whichever of the three event
//! sources (inbound PTY bytes, GUI input, the refresh timer) the host's
//! loop is currently handling. No locking, no background threads.

pub mod codec;
pub mod contracts;
mod config;

pub use codec::{LocaleCodec, Utf8Codec};
pub use config::EmulationConfig;
pub use contracts::{Codec, Display, KeyLookup, KeyTrans, PrinterSink, Pty, RefreshScheduler};

use smallvec::SmallVec;
use vtinterp::{EmulatorModes, InterpEvent, Interpreter};
use vthistory::HistoryOps;
use vtscreen::{BadGeometry, Screen};

/// The bulk-refresh quiet window, per spec §5.
const REFRESH_TIMER_MS: u32 = 20;
/// Above this many bulk blocks since the last refresh, flush immediately
/// rather than waiting out the quiet window.
const BULK_BLOCK_THRESHOLD: usize = 20;

/// Events `feed` can't resolve on its own and hands back to the caller:
/// currently just the window-title change (there is no `Display` method
/// for it in the external-interface contract, so it's surfaced here
/// rather than silently dropped).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmulationEvent {
    TitleChange { arg: u32, text: String },
}

pub type EmulationEvents = SmallVec<[EmulationEvent; 2]>;

/// Owns the interpreter, the runtime-switchable codec, and the
/// bulk-refresh counters. Everything else (PTY, Display, KeyTrans,
/// PrinterSink, RefreshScheduler) is supplied per call by the host,
/// matching spec §6's externalization pattern.
pub struct Emulation {
    interp: Interpreter,
    codec: Box<dyn Codec>,
    printer_sink: Option<Box<dyn PrinterSink>>,
    connected: bool,
    bulk_nlcnt: usize,
    bulk_incnt: usize,
}

impl Emulation {
    #[must_use]
    pub fn new(config: EmulationConfig) -> Self {
        let interp =
            Interpreter::new(config.lines, config.columns, config.history, config.answerback);
        Self {
            interp,
            codec: Box::new(LocaleCodec),
            printer_sink: None,
            connected: true,
            bulk_nlcnt: 0,
            bulk_incnt: 0,
        }
    }

    #[must_use]
    pub fn screen(&self) -> &Screen {
        self.interp.screen()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// `setConnect(false)`: inhibits bell and outbound bytes, but feed
    /// keeps mutating screen state so reconnection is consistent.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn attach_printer(&mut self, sink: Box<dyn PrinterSink>) {
        self.printer_sink = Some(sink);
    }

    pub fn resize(
        &mut self,
        lines: usize,
        columns: usize,
        pty: &mut dyn Pty,
    ) -> Result<(), BadGeometry> {
        self.interp.resize(lines, columns)?;
        pty.resize(lines, columns);
        Ok(())
    }

    /// Encode a key event through `keytrans`, folding current mode state
    /// into the modifier bits per spec §6, and write the result to the
    /// `Pty` (suppressed while disconnected).
    pub fn send_key(&mut self, key_code: u32, modifier_bits: u32, keytrans: &dyn KeyTrans, pty: &mut dyn Pty) {
        let bits = modifier_bits | self.mode_bits();
        if let Some(lookup) = keytrans.lookup(key_code, bits) {
            if self.connected {
                pty.write(&lookup.text);
            }
        }
    }

    /// `Display::beginSelection(x, y)` relay.
    pub fn begin_selection(&mut self, x: usize, y: usize) {
        self.interp.screen_mut().begin_selection(y, x);
    }

    /// `Display::extendSelection(x, y)` relay.
    pub fn extend_selection(&mut self, x: usize, y: usize) {
        self.interp.screen_mut().extend_selection(y, x);
    }

    /// `Display::endSelection(x, y)` relay: extends the range to its
    /// final point and, if anything is selected, hands the resulting
    /// text back to `Display::setSelection` so the host can own the
    /// system clipboard.
    pub fn end_selection(&mut self, x: usize, y: usize, keep_breaks: bool, display: &mut dyn Display) {
        let screen = self.interp.screen_mut();
        screen.end_selection(y, x);
        if screen.selection().is_some() {
            display.set_selection(&screen.sel_text(keep_breaks));
        }
    }

    /// `Display::clearSelection` relay.
    pub fn clear_selection(&mut self) {
        self.interp.screen_mut().clear_selection();
    }

    /// `Display::changedHistoryCursor(n)` relay: the host scrolled its
    /// view into the primary screen's scrollback, so the displayed
    /// `histCursor` offset (clamped to the retained line count by
    /// `Screen::set_hist_cursor`) moves to follow it.
    pub fn set_hist_cursor(&mut self, n: usize) {
        self.interp.primary_screen_mut().set_hist_cursor(n);
    }

    /// `Display::mouseSignal(button, x, y)` relay: formats and writes the
    /// `ESC [ M ...` report (button 0-2, release 3; `x`/`y` 1-based),
    /// grounded in `TEmuVt102::onMouse`. The GUI only forwards the signal
    /// once mouse reporting has been turned on via `CSI ? 1000 h` and
    /// friends, but this also gates on that mode directly rather than
    /// trusting the host to replicate that suppression.
    pub fn send_mouse(&mut self, button: u8, x: usize, y: usize, pty: &mut dyn Pty) {
        if !self.connected || !self.interp.modes().contains(EmulatorModes::MOUSE1000) {
            return;
        }
        let cx = u8::try_from(x).unwrap_or(u8::MAX);
        let cy = u8::try_from(y).unwrap_or(u8::MAX);
        pty.write(&vtinterp::reply::mouse_report(button, cx, cy));
    }

    fn mode_bits(&self) -> u32 {
        let modes = self.interp.modes();
        let mut bits = 0u32;
        if modes.contains(EmulatorModes::NEW_LINE) {
            bits |= 0b001;
        }
        if modes.contains(EmulatorModes::ANSI) {
            bits |= 0b010;
        }
        if modes.contains(EmulatorModes::APP_CU_KEYS) {
            bits |= 0b100;
        }
        bits
    }

    /// Feed one inbound byte block from the `Pty`. Cancels any pending
    /// refresh timer, decodes and dispatches every code point, then
    /// either refreshes immediately (bulk output) or arms a fresh 20 ms
    /// timer (sparse output), per spec §5.
    pub fn feed(
        &mut self,
        bytes: &[u8],
        pty: &mut dyn Pty,
        display: &mut dyn Display,
        scheduler: &mut dyn RefreshScheduler,
    ) -> EmulationEvents {
        scheduler.cancel();
        let mut out = EmulationEvents::new();
        self.bulk_incnt += 1;

        let code_points = self.codec.decode(bytes);
        for cp in code_points {
            if cp == u32::from(b'\n') {
                self.bulk_nlcnt += 1;
            }
            for event in self.interp.feed(cp) {
                self.handle_event(event, pty, display, &mut out);
            }
        }

        if self.bulk_nlcnt > self.interp.screen().lines() || self.bulk_incnt > BULK_BLOCK_THRESHOLD {
            self.refresh(display);
        } else {
            scheduler.arm(REFRESH_TIMER_MS);
        }
        out
    }

    fn handle_event(
        &mut self,
        event: InterpEvent,
        pty: &mut dyn Pty,
        display: &mut dyn Display,
        out: &mut EmulationEvents,
    ) {
        match event {
            InterpEvent::Bell => {
                if self.connected {
                    tracing::trace!("bell");
                    display.bell();
                }
            }
            InterpEvent::TitleChange { arg, text } => out.push(EmulationEvent::TitleChange { arg, text }),
            InterpEvent::Reply(bytes) => {
                if self.connected {
                    pty.write(&bytes);
                }
            }
            InterpEvent::PrinterByte(b) => {
                if let Some(sink) = &mut self.printer_sink {
                    sink.write(b);
                }
            }
            InterpEvent::CodecSwitch { utf8 } => {
                self.codec = if utf8 { Box::new(Utf8Codec::new()) } else { Box::new(LocaleCodec) };
                self.codec.reset();
            }
        }
    }

    /// Fired by the host when the armed `RefreshScheduler` timer elapses.
    pub fn on_refresh_timer(&mut self, display: &mut dyn Display) {
        self.refresh(display);
    }

    fn refresh(&mut self, display: &mut dyn Display) {
        let screen = self.interp.screen();
        let image = screen.cooked_image();
        display.set_image(&image, screen.lines(), screen.columns());
        let (cy, cx) = screen.cursor();
        display.set_cursor_pos(cx, cy);
        if screen.wrap_pending() {
            display.set_line_wrapped(cy, true);
        }
        let hist_lines = screen.history().map_or(0, HistoryOps::line_count);
        display.set_scroll(screen.hist_cursor(), hist_lines);
        self.bulk_nlcnt = 0;
        self.bulk_incnt = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vthistory::HistoryKind;

    #[derive(Default)]
    struct FakePty {
        written: Vec<u8>,
        resized: Option<(usize, usize)>,
        killed: Option<i32>,
    }

    impl Pty for FakePty {
        fn write(&mut self, bytes: &[u8]) {
            self.written.extend_from_slice(bytes);
        }

        fn resize(&mut self, lines: usize, columns: usize) {
            self.resized = Some((lines, columns));
        }

        fn kill(&mut self, signal: i32) {
            self.killed = Some(signal);
        }
    }

    #[derive(Default)]
    struct FakeDisplay {
        refreshes: usize,
        last_cursor: Option<(usize, usize)>,
        bells: usize,
    }

    impl Display for FakeDisplay {
        fn set_image(&mut self, _cells: &[vtcell::Cell], _lines: usize, _columns: usize) {
            self.refreshes += 1;
        }

        fn set_cursor_pos(&mut self, x: usize, y: usize) {
            self.last_cursor = Some((x, y));
        }

        fn set_line_wrapped(&mut self, _line: usize, _wrapped: bool) {}

        fn set_scroll(&mut self, _hist_cursor: usize, _hist_lines: usize) {}

        fn bell(&mut self) {
            self.bells += 1;
        }

        fn set_selection(&mut self, _text: &str) {}
    }

    #[derive(Default)]
    struct FakeScheduler {
        armed_ms: Option<u32>,
        cancels: usize,
    }

    impl RefreshScheduler for FakeScheduler {
        fn arm(&mut self, millis: u32) {
            self.armed_ms = Some(millis);
        }

        fn cancel(&mut self) {
            self.cancels += 1;
            self.armed_ms = None;
        }
    }

    #[derive(Default)]
    struct FakePrinter {
        bytes: Vec<u8>,
    }

    impl PrinterSink for FakePrinter {
        fn write(&mut self, byte: u8) {
            self.bytes.push(byte);
        }
    }

    struct FakeKeyTrans;

    impl KeyTrans for FakeKeyTrans {
        fn lookup(&self, key_code: u32, _modifier_bits: u32) -> Option<KeyLookup> {
            Some(KeyLookup { text: vec![key_code as u8], meta_specified: false })
        }
    }

    fn config() -> EmulationConfig {
        EmulationConfig { lines: 5, columns: 10, history: HistoryKind::None, answerback: String::new() }
    }

    #[test]
    fn sparse_input_arms_timer_instead_of_refreshing() {
        let mut emu = Emulation::new(config());
        let mut pty = FakePty::default();
        let mut display = FakeDisplay::default();
        let mut scheduler = FakeScheduler::default();
        emu.feed(b"hi", &mut pty, &mut display, &mut scheduler);
        assert_eq!(display.refreshes, 0);
        assert_eq!(scheduler.armed_ms, Some(20));
        assert_eq!(scheduler.cancels, 1);
    }

    #[test]
    fn bulk_newlines_trigger_immediate_refresh() {
        let mut emu = Emulation::new(config());
        let mut pty = FakePty::default();
        let mut display = FakeDisplay::default();
        let mut scheduler = FakeScheduler::default();
        let block = "a\nb\nc\nd\ne\nf\n".as_bytes(); // 6 newlines > 5 lines
        emu.feed(block, &mut pty, &mut display, &mut scheduler);
        assert_eq!(display.refreshes, 1);
        assert_eq!(scheduler.armed_ms, None);
    }

    #[test]
    fn many_blocks_trigger_immediate_refresh_even_without_newlines() {
        let mut emu = Emulation::new(config());
        let mut pty = FakePty::default();
        let mut display = FakeDisplay::default();
        let mut scheduler = FakeScheduler::default();
        for _ in 0..21 {
            emu.feed(b"x", &mut pty, &mut display, &mut scheduler);
        }
        assert_eq!(display.refreshes, 1);
    }

    #[test]
    fn on_refresh_timer_flushes_and_resets_counters() {
        let mut emu = Emulation::new(config());
        let mut pty = FakePty::default();
        let mut display = FakeDisplay::default();
        let mut scheduler = FakeScheduler::default();
        emu.feed(b"hi", &mut pty, &mut display, &mut scheduler);
        emu.on_refresh_timer(&mut display);
        assert_eq!(display.refreshes, 1);
        assert_eq!(display.last_cursor, Some((2, 0)));
    }

    #[test]
    fn disconnect_suppresses_replies_but_keeps_mutating_screen() {
        let mut emu = Emulation::new(config());
        let mut pty = FakePty::default();
        let mut display = FakeDisplay::default();
        let mut scheduler = FakeScheduler::default();
        emu.set_connected(false);
        emu.feed(b"A\x1b[c", &mut pty, &mut display, &mut scheduler);
        assert!(pty.written.is_empty());
        assert_eq!(emu.screen().cursor(), (0, 1));
    }

    #[test]
    fn bel_reaches_display_bell() {
        let mut emu = Emulation::new(config());
        let mut pty = FakePty::default();
        let mut display = FakeDisplay::default();
        let mut scheduler = FakeScheduler::default();
        emu.feed(b"\x07", &mut pty, &mut display, &mut scheduler);
        assert_eq!(display.bells, 1);
    }

    #[test]
    fn bel_is_suppressed_while_disconnected() {
        let mut emu = Emulation::new(config());
        let mut pty = FakePty::default();
        let mut display = FakeDisplay::default();
        let mut scheduler = FakeScheduler::default();
        emu.set_connected(false);
        emu.feed(b"\x07", &mut pty, &mut display, &mut scheduler);
        assert_eq!(display.bells, 0);
    }

    #[test]
    fn printer_bytes_reach_attached_sink() {
        let mut emu = Emulation::new(config());
        emu.attach_printer(Box::new(FakePrinter::default()));
        let mut pty = FakePty::default();
        let mut display = FakeDisplay::default();
        let mut scheduler = FakeScheduler::default();
        emu.feed(b"\x1b[5ihi\x1b[4i", &mut pty, &mut display, &mut scheduler);
        // nothing observable from the test's side without downcasting the
        // trait object; the absence of a panic and a normal timer arm is
        // the behavioural check here.
        assert_eq!(scheduler.armed_ms, Some(20));
    }

    #[test]
    fn send_key_writes_translated_bytes() {
        let mut emu = Emulation::new(config());
        let mut pty = FakePty::default();
        emu.send_key(b'q' as u32, 0, &FakeKeyTrans, &mut pty);
        assert_eq!(pty.written, vec![b'q']);
    }

    #[derive(Default)]
    struct SelectionDisplay {
        base: FakeDisplay,
        last_selection: Option<String>,
    }

    impl Display for SelectionDisplay {
        fn set_image(&mut self, cells: &[vtcell::Cell], lines: usize, columns: usize) {
            self.base.set_image(cells, lines, columns);
        }

        fn set_cursor_pos(&mut self, x: usize, y: usize) {
            self.base.set_cursor_pos(x, y);
        }

        fn set_line_wrapped(&mut self, line: usize, wrapped: bool) {
            self.base.set_line_wrapped(line, wrapped);
        }

        fn set_scroll(&mut self, hist_cursor: usize, hist_lines: usize) {
            self.base.set_scroll(hist_cursor, hist_lines);
        }

        fn bell(&mut self) {
            self.base.bell();
        }

        fn set_selection(&mut self, text: &str) {
            self.last_selection = Some(text.to_string());
        }
    }

    #[test]
    fn selection_round_trip_relays_text_to_display() {
        let mut emu = Emulation::new(config());
        let mut pty = FakePty::default();
        let mut display = FakeDisplay::default();
        let mut scheduler = FakeScheduler::default();
        emu.feed(b"Hello", &mut pty, &mut display, &mut scheduler);

        let mut sel_display = SelectionDisplay::default();
        emu.begin_selection(0, 0);
        emu.extend_selection(4, 0);
        emu.end_selection(4, 0, false, &mut sel_display);
        assert_eq!(sel_display.last_selection, Some("Hello".to_string()));

        emu.clear_selection();
        assert!(emu.screen().selection().is_none());
    }

    #[test]
    fn set_hist_cursor_clamps_to_retained_line_count() {
        let mut emu = Emulation::new(EmulationConfig {
            lines: 1,
            columns: 4,
            history: HistoryKind::Buffered { capacity: 10 },
            answerback: String::new(),
        });
        let mut pty = FakePty::default();
        let mut display = FakeDisplay::default();
        let mut scheduler = FakeScheduler::default();
        emu.feed(b"ABCDEFGHI", &mut pty, &mut display, &mut scheduler); // 2 wraps pushed
        emu.set_hist_cursor(100);
        assert_eq!(emu.screen().hist_cursor(), 2);
    }

    #[test]
    fn send_mouse_is_suppressed_until_mouse1000_mode_is_enabled() {
        let mut emu = Emulation::new(config());
        let mut pty = FakePty::default();
        let mut display = FakeDisplay::default();
        let mut scheduler = FakeScheduler::default();
        emu.send_mouse(0, 2, 3, &mut pty);
        assert!(pty.written.is_empty());

        emu.feed(b"\x1b[?1000h", &mut pty, &mut display, &mut scheduler);
        emu.send_mouse(0, 2, 3, &mut pty);
        assert_eq!(pty.written, vec![0x1b, b'[', b'M', 32, 34, 35]);
    }

    #[test]
    fn send_mouse_suppressed_while_disconnected() {
        let mut emu = Emulation::new(config());
        let mut pty = FakePty::default();
        let mut display = FakeDisplay::default();
        let mut scheduler = FakeScheduler::default();
        emu.feed(b"\x1b[?1000h", &mut pty, &mut display, &mut scheduler);
        emu.set_connected(false);
        emu.send_mouse(0, 1, 1, &mut pty);
        assert!(pty.written.is_empty());
    }

    #[test]
    fn title_change_surfaces_to_caller() {
        let mut emu = Emulation::new(config());
        let mut pty = FakePty::default();
        let mut display = FakeDisplay::default();
        let mut scheduler = FakeScheduler::default();
        let events = emu.feed(b"\x1b]0;hello\x07", &mut pty, &mut display, &mut scheduler);
        assert_eq!(
            events.into_vec(),
            vec![EmulationEvent::TitleChange { arg: 0, text: "hello".to_string() }]
        );
    }
}

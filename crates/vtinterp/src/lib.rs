#![warn(clippy::pedantic)]

//! Action dispatch: turns [`vttoken::Token`]s into [`vtscreen::Screen`]
//! mutations, owns the two screens (primary/alternate) and the
//! emulator-level mode/charset state that doesn't belong on a screen.
//!
//! `Interpreter` is the single point that knows both "what a token
//! means" and "which of the two screens it currently applies to" — the
//! dual-screen switch and its selection-reset invariant live here, not
//! on `Screen` itself.

mod charset;
mod modes;
pub mod reply;

pub use modes::EmulatorModes;

use smallvec::SmallVec;
use vthistory::{History, HistoryKind};
use vtscreen::{CharsetState, Screen, ScreenModes};
use vttoken::{Emission, Token, TokenError, Tokenizer};

/// Everything outside the grid that a fed code point can produce: a
/// bell, a title change, bytes to write back to the `Pty`, or a byte to
/// forward to the printer sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpEvent {
    Bell,
    TitleChange { arg: u32, text: String },
    /// Bytes the host should write to the PTY (DA/status/position
    /// replies, mouse reports).
    Reply(Vec<u8>),
    /// A byte to forward to the `PrinterSink` while printer mode is on.
    PrinterByte(u8),
    /// `ESC % G` / `ESC % @` — switch the host's `Codec` to UTF-8 or
    /// back to the locale codec. The interpreter has no codec of its
    /// own; this just relays the request outward.
    CodecSwitch { utf8: bool },
}

pub type Events = SmallVec<[InterpEvent; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Charsets {
    primary: charset::CharsetSlots,
    alternate: charset::CharsetSlots,
}

/// The interpreter: a tokenizer, two screens, and the emulator-level
/// mode/charset state, wired into one `feed` entry point.
#[derive(Debug, Clone)]
pub struct Interpreter {
    tokenizer: Tokenizer,
    primary: Screen,
    alternate: Screen,
    alt_active: bool,
    lines: usize,
    columns: usize,
    modes: EmulatorModes,
    charsets: Charsets,
    printer: Option<vttoken::PrintScanner>,
    answerback: String,
    /// `CSI ? n s` / `CSI ? n r`: generic per-mode-number save/restore,
    /// independent of whatever bitset a given mode happens to live on.
    saved_dec_modes: SmallVec<[(u32, bool); 8]>,
}

impl Interpreter {
    #[must_use]
    pub fn new(lines: usize, columns: usize, history: HistoryKind, answerback: String) -> Self {
        let primary = Screen::new(lines, columns).with_history(History::new(history));
        let alternate = Screen::new(lines, columns);
        Self {
            tokenizer: Tokenizer::new(),
            primary,
            alternate,
            alt_active: false,
            lines,
            columns,
            modes: EmulatorModes::initial(),
            charsets: Charsets::default(),
            printer: None,
            answerback,
            saved_dec_modes: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn screen(&self) -> &Screen {
        if self.alt_active { &self.alternate } else { &self.primary }
    }

    /// Mutable access to whichever screen is currently active. Public so
    /// that `vtemu` can relay `Display`'s selection callbacks
    /// (`begin`/`extend`/`endSelection`, `clearSelection`) straight
    /// through without the interpreter needing its own selection API.
    pub fn screen_mut(&mut self) -> &mut Screen {
        if self.alt_active { &mut self.alternate } else { &mut self.primary }
    }

    #[must_use]
    pub fn primary_screen(&self) -> &Screen {
        &self.primary
    }

    /// Mutable access to the primary screen specifically — used for
    /// `histCursor` scrolling, which only ever applies to the screen
    /// carrying the attached `History` (data-model invariant 6).
    pub fn primary_screen_mut(&mut self) -> &mut Screen {
        &mut self.primary
    }

    #[must_use]
    pub fn modes(&self) -> EmulatorModes {
        self.modes
    }

    #[must_use]
    pub fn is_printer_enabled(&self) -> bool {
        self.printer.is_some()
    }

    fn active_charset(&self) -> charset::CharsetSlots {
        if self.alt_active { self.charsets.alternate } else { self.charsets.primary }
    }

    fn active_charset_mut(&mut self) -> &mut charset::CharsetSlots {
        if self.alt_active { &mut self.charsets.alternate } else { &mut self.charsets.primary }
    }

    /// Feed one decoded code point. While printer mode is enabled,
    /// bytes bypass the tokenizer entirely and go through the
    /// pass-through scanner instead.
    pub fn feed(&mut self, cc: u32) -> Events {
        let mut out = Events::new();
        if let Some(printer) = &mut self.printer {
            let result = printer.feed(cc as u8);
            out.extend(result.forward.into_iter().map(InterpEvent::PrinterByte));
            if result.disable {
                self.printer = None;
            }
            return out;
        }

        let emissions = self.tokenizer.feed(cc);
        for emission in emissions {
            match emission {
                Emission::Token(tok) => out.extend(self.dispatch_token(tok)),
                Emission::TitleChange { arg, text } => {
                    out.push(InterpEvent::TitleChange { arg, text });
                }
                Emission::Error(TokenError::MalformedOsc) => {
                    tracing::debug!("malformed OSC body");
                }
            }
        }
        out
    }

    pub fn resize(&mut self, lines: usize, columns: usize) -> Result<(), vtscreen::BadGeometry> {
        self.primary.resize(lines, columns)?;
        self.alternate.resize(lines, columns)?;
        self.lines = lines;
        self.columns = columns;
        Ok(())
    }

    fn full_reset(&mut self) {
        let history = self.primary.history().map_or(History::new(HistoryKind::None), Clone::clone);
        self.primary = Screen::new(self.lines, self.columns).with_history(history);
        self.alternate = Screen::new(self.lines, self.columns);
        self.alt_active = false;
        self.modes = EmulatorModes::initial();
        self.charsets = Charsets::default();
        self.tokenizer.set_ansi_mode(true);
        self.printer = None;
    }

    fn enter_alt(&mut self, clear: bool) {
        if clear {
            self.alternate.clear_entire_screen();
        }
        if !self.alt_active {
            self.alternate.clear_selection();
        }
        self.alt_active = true;
    }

    fn leave_alt(&mut self, clear: bool) {
        if clear {
            self.alternate.clear_entire_screen();
        }
        self.alt_active = false;
    }

    fn dispatch_token(&mut self, tok: Token) -> Events {
        let mut out = Events::new();
        tracing::trace!(kind = %tok.kind(), "dispatch");
        match tok {
            Token::Chr(cp) => {
                let active = self.active_charset().active_charset();
                let mapped = charset::apply(active, cp);
                self.screen_mut().show_character(mapped);
            }
            Token::Ctl(b) => self.dispatch_ctl(b, &mut out),
            Token::Esc(b) => self.dispatch_esc(b, &mut out),
            Token::EscCs(mid, fin) => self.dispatch_esc_cs(mid, fin, &mut out),
            Token::EscDe(fin) => self.dispatch_esc_de(fin),
            Token::CsiPs(fin, n) => self.dispatch_csi_ps(fin, n, &mut out),
            Token::CsiPn(fin, p, q) => self.dispatch_csi_pn(fin, p, q, &mut out),
            Token::CsiPr(fin, n) => self.dispatch_csi_pr(fin, n),
            Token::CsiPg(fin) => self.dispatch_csi_pg(fin, &mut out),
            Token::Vt52(fin, coords) => self.dispatch_vt52(fin, coords, &mut out),
        }
        out
    }

    fn dispatch_ctl(&mut self, b: u8, out: &mut Events) {
        match b {
            b'E' => out.push(InterpEvent::Reply(reply::answerback(&self.answerback))),
            b'G' => out.push(InterpEvent::Bell),
            b'H' => self.screen_mut().back_space(),
            b'I' => self.screen_mut().tabulate(),
            b'J' | b'K' | b'L' => self.screen_mut().new_line(),
            b'M' => self.screen_mut().carriage_return(),
            b'N' => self.active_charset_mut().set_active_slot(1),
            b'O' => self.active_charset_mut().set_active_slot(0),
            _ => {}
        }
    }

    fn dispatch_esc(&mut self, b: u8, out: &mut Events) {
        match b {
            b'D' => self.screen_mut().index(),
            b'E' => self.screen_mut().next_line(),
            b'H' => self.screen_mut().change_tab_stop(true),
            b'M' => self.screen_mut().reverse_index(),
            b'Z' => out.push(InterpEvent::Reply(reply::primary_da(!self.modes.contains(EmulatorModes::ANSI)))),
            b'c' => self.full_reset(),
            b'7' => {
                let charset = self.active_charset().to_state();
                self.screen_mut().save_cursor(charset);
            }
            b'8' => {
                let charset = self.screen_mut().restore_cursor();
                *self.active_charset_mut() = charset::CharsetSlots::from_state(charset);
            }
            b'=' => self.modes.insert(EmulatorModes::APP_KEYPAD),
            b'>' => self.modes.remove(EmulatorModes::APP_KEYPAD),
            b'<' => {
                self.modes.insert(EmulatorModes::ANSI);
                self.tokenizer.set_ansi_mode(true);
            }
            b'n' => self.active_charset_mut().set_active_slot(2),
            b'o' => self.active_charset_mut().set_active_slot(3),
            _ => tracing::debug!(byte = b, "unknown ESC final"),
        }
    }

    fn dispatch_esc_cs(&mut self, mid: u8, fin: u8, out: &mut Events) {
        if mid == b'%' {
            match fin {
                b'G' => out.push(InterpEvent::CodecSwitch { utf8: true }),
                b'@' => out.push(InterpEvent::CodecSwitch { utf8: false }),
                _ => {}
            }
            return;
        }
        if let Some(slot) = charset::slot_for_introducer(mid) {
            self.active_charset_mut().designate(slot, fin);
        }
    }

    fn dispatch_esc_de(&mut self, fin: u8) {
        if fin == b'8' {
            self.screen_mut().fill_with_e();
        }
        // '3'/'4'/'5'/'6' (double-width/height markers) explicitly ignored.
    }

    #[allow(clippy::too_many_lines)]
    fn dispatch_csi_ps(&mut self, fin: u8, n: u32, out: &mut Events) {
        match (fin, n) {
            (b'K', 0) => self.screen_mut().clear_to_eol(),
            (b'K', 1) => self.screen_mut().clear_to_bol(),
            (b'K', 2) => self.screen_mut().clear_entire_line(),
            (b'J', 0) => self.screen_mut().clear_to_eos(),
            (b'J', 1) => self.screen_mut().clear_to_bos(),
            (b'J', 2) => self.screen_mut().clear_entire_screen(),
            (b'g', 0) => self.screen_mut().change_tab_stop(false),
            (b'g', 3) => self.screen_mut().clear_tab_stops(),
            (b'h', 4) => self.screen_mut().set_mode(ScreenModes::INSERT),
            (b'l', 4) => self.screen_mut().reset_mode(ScreenModes::INSERT),
            (b'h', 20) => {
                self.screen_mut().set_mode(ScreenModes::NEW_LINE);
                self.modes.insert(EmulatorModes::NEW_LINE);
            }
            (b'l', 20) => {
                self.screen_mut().reset_mode(ScreenModes::NEW_LINE);
                self.modes.remove(EmulatorModes::NEW_LINE);
            }
            (b'i', 5) => self.printer = Some(vttoken::PrintScanner::new()),
            (b'i', 4) => self.printer = None,
            (b'i', 0 | 1) => {} // print-screen / print-line: no physical printer to drive
            (b's', 0) => {
                let charset = self.active_charset().to_state();
                self.screen_mut().save_cursor(charset);
            }
            (b'u', 0) => {
                let charset = self.screen_mut().restore_cursor();
                *self.active_charset_mut() = charset::CharsetSlots::from_state(charset);
            }
            (b'm', n) => self.dispatch_sgr(n),
            (b'n', 5) => out.push(InterpEvent::Reply(reply::device_status())),
            (b'n', 6) => {
                let (y, x) = self.screen().cursor();
                out.push(InterpEvent::Reply(reply::cursor_position(y + 1, x + 1)));
            }
            (b'q', 0..=4) => {} // XTERM keyboard-LED no-ops
            (b'x', 0 | 1) => out.push(InterpEvent::Reply(reply::terminal_parameters())),
            _ => tracing::debug!(fin = fin as char, n, "unknown CSI_PS"),
        }
    }

    fn dispatch_sgr(&mut self, n: u32) {
        use vtcell::RenditionAttrs as A;
        let screen = self.screen_mut();
        match n {
            0 => screen.set_default_rendition(),
            1 => screen.set_rendition(A::BOLD),
            4 => screen.set_rendition(A::UNDERLINE),
            5 => screen.set_rendition(A::BLINK),
            7 => screen.set_rendition(A::REVERSE),
            22 => screen.reset_rendition(A::BOLD),
            24 => screen.reset_rendition(A::UNDERLINE),
            25 => screen.reset_rendition(A::BLINK),
            27 => screen.reset_rendition(A::REVERSE),
            30..=37 => screen.set_fore_color((n - 30) as u8),
            40..=47 => screen.set_back_color((n - 40) as u8),
            39 => screen.set_fore_color_default(),
            49 => screen.set_back_color_default(),
            90..=97 => screen.set_fore_color((n - 90 + 8) as u8),
            100..=107 => screen.set_back_color((n - 100 + 8) as u8),
            _ => {}
        }
    }

    fn dispatch_csi_pn(&mut self, fin: u8, p: u32, q: u32, out: &mut Events) {
        let p1 = p.max(1) as usize;
        let q1 = q.max(1) as usize;
        match fin {
            b'A' => self.screen_mut().cursor_up(p1),
            b'B' => self.screen_mut().cursor_down(p1),
            b'C' => {
                let (_, cx) = self.screen().cursor();
                self.screen_mut().set_cursor_x(cx + 1 + p1);
            }
            b'D' => {
                let (_, cx) = self.screen().cursor();
                self.screen_mut().set_cursor_x((cx + 1).saturating_sub(p1).max(1));
            }
            b'G' => self.screen_mut().set_cursor_x(p1),
            b'd' => self.screen_mut().set_cursor_y(p1),
            b'H' | b'f' => self.screen_mut().set_cursor_yx(p1, q1),
            b'@' => self.screen_mut().insert_chars(p1),
            b'L' => self.screen_mut().insert_lines(p1),
            b'M' => self.screen_mut().delete_lines(p1),
            b'P' => self.screen_mut().delete_chars(p1),
            b'X' => self.screen_mut().erase_chars(p1),
            b'r' => {
                let bottom = if q == 0 { self.lines } else { q1 };
                self.screen_mut().set_margins(p1, bottom);
            }
            b'c' => out.push(InterpEvent::Reply(reply::primary_da(false))),
            _ => tracing::debug!(fin = fin as char, "unknown CSI_PN"),
        }
    }

    fn dispatch_csi_pr(&mut self, fin: u8, n: u32) {
        match fin {
            b'h' => self.set_dec_mode(n, true),
            b'l' => {
                if n == 2 {
                    self.modes.remove(EmulatorModes::ANSI);
                    self.tokenizer.set_ansi_mode(false);
                    return;
                }
                self.set_dec_mode(n, false);
            }
            b's' => {
                let on = self.is_dec_mode_on(n);
                if let Some(slot) = self.saved_dec_modes.iter_mut().find(|(m, _)| *m == n) {
                    slot.1 = on;
                } else {
                    self.saved_dec_modes.push((n, on));
                }
            }
            b'r' => {
                if let Some(&(_, on)) = self.saved_dec_modes.iter().find(|(m, _)| *m == n) {
                    self.set_dec_mode(n, on);
                }
            }
            _ => tracing::debug!(fin = fin as char, n, "unknown CSI_PR"),
        }
    }

    fn is_dec_mode_on(&self, n: u32) -> bool {
        match n {
            1 => self.modes.contains(EmulatorModes::APP_CU_KEYS),
            5 => self.screen().modes().contains(ScreenModes::REVERSE),
            6 => self.screen().modes().contains(ScreenModes::ORIGIN),
            7 => self.screen().modes().contains(ScreenModes::WRAP),
            25 => self.screen().modes().contains(ScreenModes::CURSOR),
            1000..=1003 => self.modes.contains(EmulatorModes::MOUSE1000),
            47 | 1047 | 1049 => self.alt_active,
            _ => false,
        }
    }

    fn set_dec_mode(&mut self, n: u32, on: bool) {
        match n {
            1 => self.modes.set(EmulatorModes::APP_CU_KEYS, on),
            3 | 8 | 9 | 4 => {} // 80/132 cols, auto-repeat, interlace, soft-scroll: no-ops
            5 => self.toggle_screen_mode(ScreenModes::REVERSE, on),
            6 => self.toggle_screen_mode(ScreenModes::ORIGIN, on),
            7 => self.toggle_screen_mode(ScreenModes::WRAP, on),
            25 => self.toggle_screen_mode(ScreenModes::CURSOR, on),
            47 => {
                if on {
                    self.enter_alt(false);
                } else {
                    self.leave_alt(false);
                }
            }
            1000..=1003 => self.modes.set(EmulatorModes::MOUSE1000, on),
            1047 => {
                if on {
                    self.enter_alt(false);
                } else {
                    self.leave_alt(true);
                }
            }
            1048 => {
                if on {
                    let charset = self.active_charset().to_state();
                    self.screen_mut().save_cursor(charset);
                } else {
                    let charset = self.screen_mut().restore_cursor();
                    *self.active_charset_mut() = charset::CharsetSlots::from_state(charset);
                }
            }
            1049 => {
                if on {
                    let charset = self.active_charset().to_state();
                    self.primary.save_cursor(charset);
                    self.enter_alt(true);
                } else {
                    self.leave_alt(false);
                    let charset = self.primary.restore_cursor();
                    self.charsets.primary = charset::CharsetSlots::from_state(charset);
                }
            }
            _ => tracing::debug!(n, on, "unrecognised DEC-private mode"),
        }
    }

    fn toggle_screen_mode(&mut self, mask: ScreenModes, on: bool) {
        let screen = self.screen_mut();
        if on {
            screen.set_mode(mask);
        } else {
            screen.reset_mode(mask);
        }
    }

    fn dispatch_csi_pg(&mut self, fin: u8, out: &mut Events) {
        match fin {
            b'c' => out.push(InterpEvent::Reply(reply::secondary_da())),
            _ => tracing::debug!(fin = fin as char, "unknown CSI_PG"),
        }
    }

    fn dispatch_vt52(&mut self, fin: u8, coords: Option<(u8, u8)>, out: &mut Events) {
        match fin {
            b'A' => self.screen_mut().cursor_up(1),
            b'B' => self.screen_mut().cursor_down(1),
            b'C' => {
                let (_, cx) = self.screen().cursor();
                self.screen_mut().set_cursor_x(cx + 2);
            }
            b'D' => {
                let (_, cx) = self.screen().cursor();
                self.screen_mut().set_cursor_x(cx.max(1));
            }
            b'H' => self.screen_mut().set_cursor_yx(1, 1),
            b'I' => self.screen_mut().reverse_index(),
            b'J' => self.screen_mut().clear_to_eos(),
            b'K' => self.screen_mut().clear_to_eol(),
            b'Y' => {
                if let Some((row, col)) = coords {
                    // Direct cursor address: each byte is 0x20 + 1-based position.
                    let y = usize::from(row.saturating_sub(0x20)).max(1);
                    let x = usize::from(col.saturating_sub(0x20)).max(1);
                    self.screen_mut().set_cursor_yx(y, x);
                }
            }
            b'Z' => out.push(InterpEvent::Reply(reply::primary_da(true))),
            b'<' => {
                self.modes.insert(EmulatorModes::ANSI);
                self.tokenizer.set_ansi_mode(true);
            }
            b'=' => self.modes.insert(EmulatorModes::APP_KEYPAD),
            b'>' => self.modes.remove(EmulatorModes::APP_KEYPAD),
            _ => tracing::debug!(fin = fin as char, "unknown VT52 command"),
        }
    }

    #[must_use]
    pub fn answerback(&self) -> &str {
        &self.answerback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn feed_str(interp: &mut Interpreter, s: &str) -> Events {
        let mut out = Events::new();
        for c in s.chars() {
            out.extend(interp.feed(c as u32));
        }
        out
    }

    #[test]
    fn printable_scenario() {
        let mut interp = Interpreter::new(24, 80, HistoryKind::None, String::new());
        feed_str(&mut interp, "Hello");
        let screen = interp.screen();
        let text: String = (0..5).map(|x| screen.cooked_image()[x].codepoint).collect();
        assert_eq!(text, "Hello");
        assert_eq!(screen.cursor(), (0, 5));
    }

    #[test]
    fn csi_cursor_and_sgr_scenario() {
        let mut interp = Interpreter::new(24, 80, HistoryKind::None, String::new());
        feed_str(&mut interp, "\x1b[2;3H\x1b[31mX");
        let screen = interp.screen();
        let image = screen.cooked_image();
        let cell = image[1 * 80 + 2];
        assert_eq!(cell.codepoint, 'X');
        assert_eq!(cell.rendition.fg, vtcell::ColorSlot::Indexed(1));
        assert_eq!(screen.cursor(), (1, 3));
    }

    #[test]
    fn clear_screen_scenario() {
        let mut interp = Interpreter::new(3, 3, HistoryKind::None, String::new());
        for _ in 0..9 {
            feed_str(&mut interp, "A");
        }
        feed_str(&mut interp, "\x1b[2J");
        for cell in interp.screen().cooked_image() {
            assert!(cell.is_default());
        }
    }

    #[test]
    fn osc_title_scenario_does_not_mutate_screen() {
        let mut interp = Interpreter::new(24, 80, HistoryKind::None, String::new());
        let before = interp.screen().cooked_image();
        let events = feed_str(&mut interp, "\x1b]0;My Title\x07");
        assert_eq!(
            events.into_vec(),
            vec![InterpEvent::TitleChange { arg: 0, text: "My Title".to_string() }]
        );
        assert_eq!(interp.screen().cooked_image(), before);
    }

    #[test]
    fn vt52_cursor_scenario() {
        let mut interp = Interpreter::new(24, 80, HistoryKind::None, String::new());
        interp.modes.remove(EmulatorModes::ANSI);
        interp.tokenizer.set_ansi_mode(false);
        feed_str(&mut interp, "\x1bY\u{21}\u{22}");
        assert_eq!(interp.screen().cursor(), (0, 1));
    }

    #[test]
    fn wrap_and_history_scenario() {
        let mut interp = Interpreter::new(1, 4, HistoryKind::Buffered { capacity: 10 }, String::new());
        feed_str(&mut interp, "ABCDE");
        let screen = interp.primary_screen();
        let history = screen.history().unwrap();
        assert_eq!(vthistory::HistoryOps::line_count(history), 1);
        assert!(vthistory::HistoryOps::is_wrapped(history, 0));
        assert_eq!(screen.cursor(), (0, 1));
    }

    #[test]
    fn csi_cursor_up_down_at_margins_do_not_scroll() {
        let mut interp = Interpreter::new(5, 3, HistoryKind::None, String::new());
        feed_str(&mut interp, "\x1b[2;4r"); // region rows 2..=4, 0-based 1..=3
        feed_str(&mut interp, "\x1b[2;1Habc"); // write "abc" at the top of the region
        feed_str(&mut interp, "\x1b[2;1H"); // cursor back to the top margin
        feed_str(&mut interp, "\x1b[9A"); // CUU far past the top margin
        assert_eq!(interp.screen().cursor().0, 1); // clamped at the margin, not scrolled
        let row = |interp: &Interpreter, y: usize| {
            let image = interp.screen().cooked_image();
            (0..3).map(|x| image[y * 3 + x].codepoint).collect::<String>()
        };
        assert_eq!(row(&interp, 1), "abc");

        feed_str(&mut interp, "\x1b[9B"); // CUD far past the bottom margin
        assert_eq!(interp.screen().cursor().0, 3); // clamped at the margin, not scrolled
        assert_eq!(row(&interp, 1), "abc");
    }

    #[test]
    fn alt_screen_round_trip_restores_primary_exactly() {
        let mut interp = Interpreter::new(5, 5, HistoryKind::None, String::new());
        feed_str(&mut interp, "hi");
        let before = interp.primary_screen().cooked_image();
        feed_str(&mut interp, "\x1b[?47h");
        feed_str(&mut interp, "xyz");
        feed_str(&mut interp, "\x1b[?47l");
        assert_eq!(interp.primary_screen().cooked_image(), before);
    }

    #[test]
    fn line_drawing_charset_remaps_chr() {
        let mut interp = Interpreter::new(3, 3, HistoryKind::None, String::new());
        feed_str(&mut interp, "\x1b(0q");
        let cell = interp.screen().cooked_image()[0];
        assert_eq!(cell.codepoint, '\u{2500}');
    }

    #[test]
    fn generic_dec_mode_save_restore_round_trips_origin() {
        let mut interp = Interpreter::new(5, 5, HistoryKind::None, String::new());
        feed_str(&mut interp, "\x1b[?6h");
        feed_str(&mut interp, "\x1b[?6s"); // save: currently on
        feed_str(&mut interp, "\x1b[?6l"); // toggle off
        assert!(!interp.screen().modes().contains(ScreenModes::ORIGIN));
        feed_str(&mut interp, "\x1b[?6r"); // restore: back on
        assert!(interp.screen().modes().contains(ScreenModes::ORIGIN));
    }

    #[test]
    fn save_restore_mode_round_trip_via_dec_private_origin() {
        let mut interp = Interpreter::new(5, 5, HistoryKind::None, String::new());
        feed_str(&mut interp, "\x1b[?6h");
        assert!(interp.screen().modes().contains(ScreenModes::ORIGIN));
        feed_str(&mut interp, "\x1b[?6l");
        assert!(!interp.screen().modes().contains(ScreenModes::ORIGIN));
    }
}

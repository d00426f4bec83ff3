#![warn(clippy::pedantic)]

//! The escape-sequence tokenizer: turns a stream of decoded code points
//! into the nine-shape [`Token`] sum type, plus the OSC title event and
//! the printer pass-through sub-state.
//!
//! The tokenizer owns no screen or mode state beyond the pending buffer,
//! the decoded-argument vector, and the ANSI/VT52 mode flag a caller
//! toggles explicitly — charset interpretation, dispatch, and reply
//! formatting all live one layer up in `vtinterp`.

mod class;
mod printer;
mod token;

pub use printer::{PrintFeedResult, PrintScanner};
pub use token::{Emission, Token, TokenError, TokenKind};

use smallvec::SmallVec;

const ESC: u32 = 0x1b;
const CAN: u32 = 0x18;
const SUB: u32 = 0x1a;
const BEL: u32 = 0x07;

/// Pending-buffer capacity; the longest legitimate escape sequence is
/// well under this.
const PENDING_CAPACITY: usize = 80;
/// Argument-vector capacity.
const ARGV_CAPACITY: usize = 16;

type Pending = SmallVec<[u32; PENDING_CAPACITY]>;
type Argv = SmallVec<[u32; ARGV_CAPACITY]>;

/// Up to four emissions from a single `feed` call — the CSI_PS/PR/PG
/// terminator loop can emit one token per accumulated parameter.
pub type Emissions = SmallVec<[Emission; 4]>;

/// The escape-sequence tokenizer/dispatcher described by the
/// classification table and predicate ladder.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pending: Pending,
    argv: Argv,
    argc: usize,
    ansi_mode: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    #[must_use]
    pub fn new() -> Self {
        let mut argv = Argv::new();
        argv.push(0);
        Self { pending: Pending::new(), argv, argc: 0, ansi_mode: true }
    }

    #[must_use]
    pub fn is_ansi_mode(&self) -> bool {
        self.ansi_mode
    }

    /// Switch between the ANSI and VT52 decision ladders. Driven by the
    /// interpreter (`CSI ? 2 l` enters VT52, the VT52 `<` command or any
    /// ANSI-mode-restoring sequence returns to ANSI).
    pub fn set_ansi_mode(&mut self, ansi: bool) {
        self.ansi_mode = ansi;
        self.reset_token();
    }

    fn reset_token(&mut self) {
        self.pending.clear();
        self.argv.clear();
        self.argv.push(0);
        self.argc = 0;
    }

    fn push_to_token(&mut self, cc: u32) {
        if self.pending.len() < PENDING_CAPACITY {
            self.pending.push(cc);
        }
    }

    fn add_digit(&mut self, d: u32) {
        let slot = &mut self.argv[self.argc];
        *slot = slot.saturating_mul(10).saturating_add(d);
    }

    fn add_argument(&mut self) {
        if self.argc + 1 < ARGV_CAPACITY {
            self.argc += 1;
        }
        if self.argc == self.argv.len() {
            self.argv.push(0);
        } else {
            self.argv[self.argc] = 0;
        }
    }

    fn p(&self) -> usize {
        self.pending.len()
    }

    fn s(&self, i: usize) -> u32 {
        self.pending[i]
    }

    fn class_of(&self, i: usize) -> u8 {
        class::classify(self.s(i))
    }

    // ---- predicates (spec 4.1), named to match the spec's vocabulary --

    fn lec(&self, want_p: usize, l: usize, c: u32) -> bool {
        self.p() == want_p && self.s(l) == c
    }

    fn lun(&self, cc: u32) -> bool {
        self.p() == 1 && cc >= 0x20
    }

    fn les(&self, want_p: usize, l: usize, class_bit: u8) -> bool {
        self.p() == want_p && self.class_of(l) & class_bit != 0
    }

    fn eec(&self, cc: u32, c: u32) -> bool {
        self.p() >= 3 && cc == c
    }

    fn ees(&self, cc: u32, class_bit: u8) -> bool {
        self.p() >= 3 && class::classify(cc) & class_bit != 0
    }

    fn eps(&self, cc: u32, class_bit: u8) -> bool {
        self.p() >= 3 && self.s(2) != u32::from(b'?') && self.s(2) != u32::from(b'>')
            && class::classify(cc) & class_bit != 0
    }

    fn epp(&self) -> bool {
        self.p() >= 3 && self.s(2) == u32::from(b'?')
    }

    fn egt(&self) -> bool {
        self.p() >= 3 && self.s(2) == u32::from(b'>')
    }

    fn xpe(&self) -> bool {
        self.p() >= 2 && self.s(1) == u32::from(b']')
    }

    fn xte(&self, cc: u32) -> bool {
        self.xpe() && cc == BEL
    }

    fn ces(&self, cc: u32, class_bit: u8) -> bool {
        class::classify(cc) & class_bit != 0 && !self.xte(cc)
    }

    /// Feed one decoded code point, advancing the tokenizer's state and
    /// returning whatever it emits (zero or more items).
    pub fn feed(&mut self, cc: u32) -> Emissions {
        if self.ansi_mode { self.feed_ansi(cc) } else { self.feed_vt52(cc) }
    }

    fn feed_ansi(&mut self, cc: u32) -> Emissions {
        let mut out = Emissions::new();

        if self.ces(cc, class::CTL) {
            if cc == CAN || cc == SUB || cc == ESC {
                self.reset_token();
            }
            if cc != ESC {
                out.push(Emission::Token(Token::Ctl((cc + u32::from(b'@')) as u8)));
                return out;
            }
            // cc == ESC: buffer was just reset; fall through to push it.
        }

        self.push_to_token(cc);

        if self.lec(1, 0, ESC) {
            return out;
        }
        if self.les(2, 1, class::GRP) {
            return out;
        }
        if self.xte(cc) {
            out.push(self.emit_osc());
            self.reset_token();
            return out;
        }
        if self.xpe() {
            return out;
        }
        if self.lec(3, 2, u32::from(b'?')) || self.lec(3, 2, u32::from(b'>')) {
            return out;
        }
        if self.lun(cc) {
            out.push(Emission::Token(Token::Chr(
                char::from_u32(cc).unwrap_or('\u{fffd}'),
            )));
            self.reset_token();
            return out;
        }
        if self.lec(2, 0, ESC) {
            out.push(Emission::Token(Token::Esc(self.s(1) as u8)));
            self.reset_token();
            return out;
        }
        if self.les(3, 1, class::SCS) {
            out.push(Emission::Token(Token::EscCs(self.s(1) as u8, self.s(2) as u8)));
            self.reset_token();
            return out;
        }
        if self.lec(3, 1, u32::from(b'#')) {
            out.push(Emission::Token(Token::EscDe(self.s(2) as u8)));
            self.reset_token();
            return out;
        }
        if self.eps(cc, class::CPN) {
            let p = self.argv.first().copied().unwrap_or(0);
            let q = self.argv.get(1).copied().unwrap_or(0);
            out.push(Emission::Token(Token::CsiPn(cc as u8, p, q)));
            self.reset_token();
            return out;
        }
        if self.ees(cc, class::DIG) {
            self.add_digit(cc - u32::from(b'0'));
            return out;
        }
        if self.eec(cc, u32::from(b';')) {
            self.add_argument();
            return out;
        }

        // Terminator of a CSI_PS/PR/PG sequence: one emission per argv slot.
        for i in 0..=self.argc {
            let n = self.argv[i];
            let tok = if self.epp() {
                Token::CsiPr(cc as u8, n)
            } else if self.egt() {
                Token::CsiPg(cc as u8)
            } else {
                Token::CsiPs(cc as u8, n)
            };
            out.push(Emission::Token(tok));
            if self.egt() {
                break; // CSI_PG is reported once, ignoring argv.
            }
        }
        self.reset_token();
        out
    }

    fn emit_osc(&self) -> Emission {
        // s[2..p-1] is "ddd;text" — the trailing element is the BEL
        // terminator itself, already pushed onto pending by this point.
        let end = self.pending.len().saturating_sub(1);
        let body: String = self.pending[2..end]
            .iter()
            .filter_map(|&cp| char::from_u32(cp))
            .collect();
        match body.split_once(';') {
            Some((num, text)) => match num.parse::<u32>() {
                Ok(arg) => Emission::TitleChange { arg, text: text.to_string() },
                Err(_) => Emission::Error(TokenError::MalformedOsc),
            },
            None => Emission::Error(TokenError::MalformedOsc),
        }
    }

    fn feed_vt52(&mut self, cc: u32) -> Emissions {
        let mut out = Emissions::new();
        self.push_to_token(cc);

        if self.lec(1, 0, ESC) {
            return out;
        }
        if self.les(1, 0, class::CHR) {
            out.push(Emission::Token(Token::Chr(
                char::from_u32(self.s(0)).unwrap_or('\u{fffd}'),
            )));
            self.reset_token();
            return out;
        }
        if self.lec(2, 1, u32::from(b'Y')) {
            return out;
        }
        if self.lec(3, 1, u32::from(b'Y')) {
            return out;
        }
        if self.p() < 4 {
            out.push(Emission::Token(Token::Vt52(self.s(1) as u8, None)));
            self.reset_token();
        } else {
            out.push(Emission::Token(Token::Vt52(
                self.s(1) as u8,
                Some((self.s(2) as u8, self.s(3) as u8)),
            )));
            self.reset_token();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn feed_str(t: &mut Tokenizer, s: &str) -> Vec<Emission> {
        let mut out = Vec::new();
        for c in s.chars() {
            out.extend(t.feed(c as u32));
        }
        out
    }

    #[test]
    fn plain_printable_emits_chr() {
        let mut t = Tokenizer::new();
        let emissions = feed_str(&mut t, "Hi");
        assert_eq!(
            emissions,
            vec![
                Emission::Token(Token::Chr('H')),
                Emission::Token(Token::Chr('i')),
            ]
        );
    }

    #[test]
    fn control_character_emits_ctl_without_buffering() {
        let mut t = Tokenizer::new();
        let emissions = t.feed(0x07); // BEL outside any OSC
        assert_eq!(emissions, vec![Emission::Token(Token::Ctl(b'G'))]);
    }

    #[test]
    fn can_aborts_pending_escape_but_still_emits_ctl() {
        let mut t = Tokenizer::new();
        t.feed(ESC);
        let emissions = t.feed(CAN);
        assert_eq!(emissions, vec![Emission::Token(Token::Ctl(b'X'))]);
        // tokenizer is back at rest: a fresh ESC starts a new sequence.
        let mut all = Vec::new();
        all.extend(t.feed(ESC));
        all.extend(feed_str(&mut t, "[2;3H"));
        assert_eq!(all, vec![Emission::Token(Token::CsiPn(b'H', 2, 3))]);
    }

    #[test]
    fn csi_pn_with_two_params() {
        let mut t = Tokenizer::new();
        let mut all = Vec::new();
        all.extend(t.feed(ESC));
        all.extend(feed_str(&mut t, "[2;3H"));
        assert_eq!(all, vec![Emission::Token(Token::CsiPn(b'H', 2, 3))]);
    }

    #[test]
    fn csi_ps_terminator_emits_one_token_per_argument() {
        let mut t = Tokenizer::new();
        t.feed(ESC);
        let emissions = feed_str(&mut t, "[1;4;5m");
        assert_eq!(
            emissions,
            vec![
                Emission::Token(Token::CsiPs(b'm', 1)),
                Emission::Token(Token::CsiPs(b'm', 4)),
                Emission::Token(Token::CsiPs(b'm', 5)),
            ]
        );
    }

    #[test]
    fn csi_private_mode_tags_params_as_csi_pr() {
        let mut t = Tokenizer::new();
        t.feed(ESC);
        let emissions = feed_str(&mut t, "[?25l");
        assert_eq!(emissions, vec![Emission::Token(Token::CsiPr(b'l', 25))]);
    }

    #[test]
    fn secondary_da_reports_once_ignoring_argv() {
        let mut t = Tokenizer::new();
        t.feed(ESC);
        let emissions = feed_str(&mut t, "[>c");
        assert_eq!(emissions, vec![Emission::Token(Token::CsiPg(b'c'))]);
    }

    #[test]
    fn osc_title_terminates_on_bel_and_does_not_reach_chr() {
        let mut t = Tokenizer::new();
        t.feed(ESC);
        let emissions = feed_str(&mut t, "]0;My Title");
        assert!(emissions.is_empty());
        let emissions = t.feed(BEL);
        assert_eq!(
            emissions,
            vec![Emission::TitleChange { arg: 0, text: "My Title".to_string() }]
        );
    }

    #[test]
    fn malformed_osc_body_reports_error() {
        let mut t = Tokenizer::new();
        t.feed(ESC);
        feed_str(&mut t, "]no-semicolon");
        let emissions = t.feed(BEL);
        assert_eq!(emissions, vec![Emission::Error(TokenError::MalformedOsc)]);
    }

    #[test]
    fn vt52_cursor_with_coordinates() {
        let mut t = Tokenizer::new();
        t.set_ansi_mode(false);
        t.feed(ESC);
        let emissions = feed_str(&mut t, "Y\u{21}\u{22}");
        assert_eq!(
            emissions,
            vec![Emission::Token(Token::Vt52(b'Y', Some((0x21, 0x22))))]
        );
    }

    #[test]
    fn token_kind_names_shape_for_diagnostics() {
        assert_eq!(Token::CsiPr(b'h', 47).kind().to_string(), "CsiPr");
        assert_eq!(Token::Chr('x').kind().to_string(), "Chr");
    }

    #[test]
    fn streaming_invariance_byte_at_a_time_matches_blocked() {
        let input = "Hello\x1b[2;3H\x1b[31mX";
        let mut byte_at_a_time = Tokenizer::new();
        let mut per_byte_out = Vec::new();
        for c in input.chars() {
            per_byte_out.extend(byte_at_a_time.feed(c as u32));
        }

        let mut blocked = Tokenizer::new();
        let mut blocked_out = Vec::new();
        for chunk in [&input[0..5], &input[5..10], &input[10..]] {
            for c in chunk.chars() {
                blocked_out.extend(blocked.feed(c as u32));
            }
        }

        assert_eq!(per_byte_out, blocked_out);
    }
}

/// The nine token shapes, as a plain unit-variant enum for logging —
/// printing a full [`Token`] in a `tracing` field would include its
/// payload; this is just "which shape" for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
pub enum TokenKind {
    Chr,
    Ctl,
    Esc,
    EscCs,
    EscDe,
    CsiPs,
    CsiPn,
    CsiPr,
    CsiPg,
    Vt52,
}

/// The nine token shapes the tokenizer can emit, each carrying up to
/// three small integers. The packing into a dense 32-bit word the
/// original used for dispatch is an implementation detail of whatever
/// consumes these, not of the shape itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A single printable code point, already past the tokenizer; any
    /// charset remapping is the interpreter's job.
    Chr(char),
    /// A C0 control character, delivered as `cc + '@'` (so `^A` arrives
    /// as `b'A'`, matching the original's `CTL(cc+'@')` encoding).
    Ctl(u8),
    /// Two-byte `ESC <final>`.
    Esc(u8),
    /// Character-set designation: `ESC <mid> <final>`, e.g. `ESC ( B`.
    EscCs(u8, u8),
    /// `ESC # <final>`, e.g. `ESC # 8` (DECALN).
    EscDe(u8),
    /// CSI terminator taking a single numeric parameter: `CSI <n> <final>`.
    CsiPs(u8, u32),
    /// CSI terminator taking up to two numeric parameters.
    CsiPn(u8, u32, u32),
    /// DEC-private CSI terminator (`CSI ? <n> <final>`).
    CsiPr(u8, u32),
    /// Secondary-DA-style CSI terminator (`CSI > <final>`), params ignored.
    CsiPg(u8),
    /// A VT52 single-letter command, optionally with a two-byte cursor
    /// coordinate (`ESC Y <row> <col>`, already bias-corrected by the
    /// caller is NOT assumed here — raw bytes are carried as-is).
    Vt52(u8, Option<(u8, u8)>),
}

impl Token {
    /// Which of the nine shapes this token is, for diagnostics — callers
    /// that log an unrecognized final byte attach this alongside it.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Chr(_) => TokenKind::Chr,
            Self::Ctl(_) => TokenKind::Ctl,
            Self::Esc(_) => TokenKind::Esc,
            Self::EscCs(..) => TokenKind::EscCs,
            Self::EscDe(_) => TokenKind::EscDe,
            Self::CsiPs(..) => TokenKind::CsiPs,
            Self::CsiPn(..) => TokenKind::CsiPn,
            Self::CsiPr(..) => TokenKind::CsiPr,
            Self::CsiPg(_) => TokenKind::CsiPg,
            Self::Vt52(..) => TokenKind::Vt52,
        }
    }
}

/// Everything a single `Tokenizer::feed` call can produce: zero or more
/// tokens (the CSI_PS/PR/PG terminator loop can emit several at once),
/// or the out-of-band OSC title event, or a decode error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    Token(Token),
    /// `onTitleChange(arg, text)` — `arg` is `0` (title+icon), `1`
    /// (icon only), or `2` (title only).
    TitleChange { arg: u32, text: String },
    Error(TokenError),
}

/// Non-fatal tokenizer-level errors; the offending input is dropped and
/// tokenizing continues, per the error-handling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// An OSC body with no `;` separator.
    MalformedOsc,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedOsc => write!(f, "OSC body missing ';' separator"),
        }
    }
}

impl std::error::Error for TokenError {}

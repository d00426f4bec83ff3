use smallvec::SmallVec;

const ESC: u8 = 0x1b;
const NUL: u8 = 0x00;
const XON: u8 = 0x11;
const XOFF: u8 = 0x13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ScanState {
    #[default]
    Idle,
    SawEsc,
    SawBracket,
    SawFour,
}

/// The printer pass-through sub-state entered once the interpreter has
/// enabled printer mode (`CSI 5 i`). It watches only for `ESC [ 4 i`
/// (printer off) and otherwise forwards bytes verbatim to the printer
/// sink, dropping `XON`/`XOFF`/`NUL` along the way.
#[derive(Debug, Clone, Default)]
pub struct PrintScanner {
    state: ScanState,
}

/// What a single byte fed to [`PrintScanner`] produces: bytes to hand to
/// the printer sink (held-back escape prefixes are flushed here once a
/// match fails), and whether the byte completed `ESC [ 4 i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrintFeedResult {
    pub forward: SmallVec<[u8; 4]>,
    pub disable: bool,
}

impl PrintScanner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, b: u8) -> PrintFeedResult {
        let mut out = PrintFeedResult::default();
        self.feed_into(b, &mut out);
        out
    }

    fn feed_into(&mut self, b: u8, out: &mut PrintFeedResult) {
        match self.state {
            ScanState::Idle => {
                if matches!(b, NUL | XON | XOFF) {
                    // dropped silently
                } else if b == ESC {
                    self.state = ScanState::SawEsc;
                } else {
                    out.forward.push(b);
                }
            }
            ScanState::SawEsc => {
                if b == b'[' {
                    self.state = ScanState::SawBracket;
                } else {
                    self.state = ScanState::Idle;
                    out.forward.push(ESC);
                    self.feed_into(b, out);
                }
            }
            ScanState::SawBracket => {
                if b == b'4' {
                    self.state = ScanState::SawFour;
                } else {
                    self.state = ScanState::Idle;
                    out.forward.extend([ESC, b'[']);
                    self.feed_into(b, out);
                }
            }
            ScanState::SawFour => {
                if b == b'i' {
                    self.state = ScanState::Idle;
                    out.disable = true;
                } else {
                    self.state = ScanState::Idle;
                    out.forward.extend([ESC, b'[', b'4']);
                    self.feed_into(b, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(scanner: &mut PrintScanner, bytes: &[u8]) -> (Vec<u8>, bool) {
        let mut forwarded = Vec::new();
        let mut disable = false;
        for &b in bytes {
            let r = scanner.feed(b);
            forwarded.extend(r.forward);
            disable |= r.disable;
        }
        (forwarded, disable)
    }

    #[test]
    fn plain_bytes_pass_through() {
        let mut s = PrintScanner::new();
        let (fwd, disable) = feed_all(&mut s, b"hello");
        assert_eq!(fwd, b"hello");
        assert!(!disable);
    }

    #[test]
    fn xon_xoff_nul_are_dropped() {
        let mut s = PrintScanner::new();
        let (fwd, _) = feed_all(&mut s, &[b'a', NUL, XON, XOFF, b'b']);
        assert_eq!(fwd, b"ab");
    }

    #[test]
    fn disable_sequence_is_recognised_and_not_forwarded() {
        let mut s = PrintScanner::new();
        let (fwd, disable) = feed_all(&mut s, b"\x1b[4i");
        assert!(fwd.is_empty());
        assert!(disable);
    }

    #[test]
    fn near_miss_prefix_is_flushed_verbatim() {
        let mut s = PrintScanner::new();
        let (fwd, disable) = feed_all(&mut s, b"\x1b[5i");
        assert_eq!(fwd, b"\x1b[5i");
        assert!(!disable);
    }
}

//! Built-in [`Codec`] implementations. A host is free to wire its own
//! (an ICU-backed locale codec, say); these two cover the pair the
//! dispatch table can switch between at runtime.

use crate::contracts::Codec;

/// Treats each incoming byte as its own Latin-1 code point. Stands in
/// for "the locale codec" when no locale-specific decoder is wired up —
/// correct for any single-byte locale, a reasonable default otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleCodec;

impl Codec for LocaleCodec {
    fn decode(&mut self, bytes: &[u8]) -> Vec<u32> {
        bytes.iter().map(|&b| u32::from(b)).collect()
    }

    fn reset(&mut self) {}
}

/// Incremental UTF-8 decoder: bytes can arrive split mid-sequence across
/// separate `feed` calls, so a partially decoded multi-byte sequence is
/// held in `pending` rather than assuming one call sees a whole character.
#[derive(Debug, Clone, Default)]
pub struct Utf8Codec {
    pending: Vec<u8>,
    need: usize,
}

impl Utf8Codec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn sequence_len(lead: u8) -> usize {
        if lead & 0x80 == 0 {
            1
        } else if lead & 0xe0 == 0xc0 {
            2
        } else if lead & 0xf0 == 0xe0 {
            3
        } else if lead & 0xf8 == 0xf0 {
            4
        } else {
            1 // invalid lead byte: treated as a single replacement unit
        }
    }
}

impl Codec for Utf8Codec {
    fn decode(&mut self, bytes: &[u8]) -> Vec<u32> {
        let mut out = Vec::with_capacity(bytes.len());
        for &b in bytes {
            if self.pending.is_empty() {
                self.need = Self::sequence_len(b);
                self.pending.push(b);
            } else {
                self.pending.push(b);
            }
            if self.pending.len() >= self.need {
                let cp = match std::str::from_utf8(&self.pending) {
                    Ok(s) => s.chars().next().map_or(0xfffd, |c| c as u32),
                    Err(_) => 0xfffd,
                };
                out.push(cp);
                self.pending.clear();
            }
        }
        out
    }

    fn reset(&mut self) {
        self.pending.clear();
        self.need = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn locale_codec_is_byte_identity() {
        let mut c = LocaleCodec;
        assert_eq!(c.decode(&[b'A', 0xe9]), vec![0x41, 0xe9]);
    }

    #[test]
    fn utf8_codec_decodes_whole_sequence() {
        let mut c = Utf8Codec::new();
        let bytes = "é".as_bytes();
        assert_eq!(c.decode(bytes), vec!['é' as u32]);
    }

    #[test]
    fn utf8_codec_handles_split_sequence_across_calls() {
        let mut c = Utf8Codec::new();
        let bytes = "é".as_bytes();
        let mut out = c.decode(&bytes[..1]);
        out.extend(c.decode(&bytes[1..]));
        assert_eq!(out, vec!['é' as u32]);
    }

    #[test]
    fn reset_clears_partial_sequence() {
        let mut c = Utf8Codec::new();
        let bytes = "é".as_bytes();
        c.decode(&bytes[..1]);
        c.reset();
        let out = c.decode(&[b'A']);
        assert_eq!(out, vec![0x41]);
    }
}

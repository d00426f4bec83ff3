//! Outbound wire replies: self-identification, status, and position
//! reports the interpreter formats and hands back to the emulator for
//! writing to the `Pty`.

/// Primary DA: `ESC [ ? 1 ; 2 c` (VT100/ANSI) or `ESC / Z` (VT52).
#[must_use]
pub fn primary_da(vt52: bool) -> Vec<u8> {
    if vt52 { b"\x1b/Z".to_vec() } else { b"\x1b[?1;2c".to_vec() }
}

/// Secondary DA: `ESC [ > 0 ; 115 ; 0 c`.
#[must_use]
pub fn secondary_da() -> Vec<u8> {
    b"\x1b[>0;115;0c".to_vec()
}

/// Device status report: `ESC [ 0 n`.
#[must_use]
pub fn device_status() -> Vec<u8> {
    b"\x1b[0n".to_vec()
}

/// Cursor position report: `ESC [ <row> ; <col> R`, both 1-based.
#[must_use]
pub fn cursor_position(row: usize, col: usize) -> Vec<u8> {
    format!("\x1b[{row};{col}R").into_bytes()
}

/// Mouse report: `ESC [ M <cb+32> <cx+32> <cy+32>`.
#[must_use]
pub fn mouse_report(button: u8, cx: u8, cy: u8) -> Vec<u8> {
    vec![0x1b, b'[', b'M', button.wrapping_add(32), cx.wrapping_add(32), cy.wrapping_add(32)]
}

/// `CSI x` terminal-parameters report. There is no physical UART
/// behind this emulator, so the reply is the fixed synthetic block
/// "no parity, 8 bits, 38400 baud" the original hard-codes.
#[must_use]
pub fn terminal_parameters() -> Vec<u8> {
    b"\x1b[2;1;1;120;120;1;0x".to_vec()
}

/// Answerback: the value of the `ANSWER_BACK` environment variable, as
/// sourced by the host and handed in through config rather than read
/// directly by this library.
#[must_use]
pub fn answerback(value: &str) -> Vec<u8> {
    value.as_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn primary_da_switches_on_vt52() {
        assert_eq!(primary_da(false), b"\x1b[?1;2c");
        assert_eq!(primary_da(true), b"\x1b/Z");
    }

    #[test]
    fn cursor_position_report_is_one_based() {
        assert_eq!(cursor_position(2, 4), b"\x1b[2;4R");
    }

    #[test]
    fn mouse_report_applies_32_offset() {
        assert_eq!(mouse_report(0, 1, 2), vec![0x1b, b'[', b'M', 32, 33, 34]);
    }
}

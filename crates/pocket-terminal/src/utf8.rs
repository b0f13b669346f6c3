//! Incremental UTF-8 decoding with degradation to single ASCII bytes.
//!
//! The panel font only covers printable ASCII, so every decoded code point is
//! either mapped to one approximating ASCII byte or dropped.

/// Outcome of feeding one byte to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utf8Step {
    /// The byte was absorbed; more continuation bytes are expected.
    Pending,
    /// A code point was completed. `Some` carries its ASCII substitute,
    /// `None` means the code point has no substitute and is dropped.
    Complete(Option<u8>),
    /// The byte does not continue the pending sequence. The sequence was
    /// abandoned and the caller must process the byte again from the ground
    /// state.
    Reprocess,
}

/// Accumulates continuation bytes of one multi-byte sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utf8Decoder {
    remaining: u8,
    codepoint: u32,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a sequence is in progress.
    pub fn is_pending(&self) -> bool {
        self.remaining > 0
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Begin a sequence if `byte` is a lead byte. Returns `false` (and leaves
    /// the decoder idle) for anything else.
    pub fn start(&mut self, byte: u8) -> bool {
        let (remaining, bits) = match byte {
            0xC0..=0xDF => (1, byte & 0x1F),
            0xE0..=0xEF => (2, byte & 0x0F),
            0xF0..=0xF7 => (3, byte & 0x07),
            _ => return false,
        };
        self.remaining = remaining;
        self.codepoint = u32::from(bits);
        true
    }

    /// Feed the next byte of a pending sequence.
    pub fn advance(&mut self, byte: u8) -> Utf8Step {
        if self.remaining == 0 {
            return Utf8Step::Reprocess;
        }
        if byte & 0xC0 != 0x80 {
            self.reset();
            return Utf8Step::Reprocess;
        }
        self.codepoint = (self.codepoint << 6) | u32::from(byte & 0x3F);
        self.remaining -= 1;
        if self.remaining > 0 {
            return Utf8Step::Pending;
        }
        let substitute = ascii_substitute(self.codepoint);
        self.codepoint = 0;
        Utf8Step::Complete(substitute)
    }
}

/// Map a code point to the ASCII byte drawn in its place.
///
/// Code points below 0x80 only arrive here through overlong encodings and
/// are dropped.
pub fn ascii_substitute(cp: u32) -> Option<u8> {
    let byte = match cp {
        0x2500..=0x257F => box_drawing(cp),
        // Block elements and shades.
        0x2580..=0x259F => b'#',
        0x25A0..=0x25AB => b'#',
        0x25B2..=0x25B5 => b'^',
        0x25B6..=0x25BB => b'>',
        0x25BC..=0x25BF => b'v',
        0x25C0..=0x25C5 => b'<',
        0x25C6..=0x25C8 | 0x25CB..=0x25CF => b'o',
        // Braille patterns, blank first.
        0x2800 => b' ',
        0x2801..=0x28FF => b'.',
        // Powerline separators.
        0xE0B0 | 0xE0B1 => b'>',
        0xE0B2 | 0xE0B3 => b'<',
        0x00A0 => b' ',
        0x00AB => b'<',
        0x00BB => b'>',
        0x00B0 => b'o',
        0x00B7 => b'.',
        0x00D7 => b'x',
        0x00A9 => b'c',
        0x2010..=0x2015 | 0x2212 => b'-',
        0x2018 | 0x2019 | 0x201A | 0x2032 => b'\'',
        0x201C..=0x201E | 0x2033 => b'"',
        0x2022 | 0x2023 | 0x2043 | 0x2219 => b'*',
        0x2026 => b'.',
        0x2190 => b'<',
        0x2191 => b'^',
        0x2192 => b'>',
        0x2193 => b'v',
        0x2194 => b'-',
        0x2195 => b'|',
        0x21B5 => b'<',
        0x2261 => b'=',
        0x22EE => b':',
        0x2713 | 0x2714 => b'v',
        0x2717 | 0x2718 => b'x',
        _ => return None,
    };
    Some(byte)
}

/// Box-drawing block U+2500..U+257F.
fn box_drawing(cp: u32) -> u8 {
    match cp {
        0x2500 | 0x2501 | 0x2504 | 0x2505 | 0x2508 | 0x2509 => b'-',
        0x2502 | 0x2503 | 0x2506 | 0x2507 | 0x250A | 0x250B => b'|',
        0x254C | 0x254D | 0x2550 => b'-',
        0x254E | 0x254F | 0x2551 => b'|',
        0x2571 => b'/',
        0x2572 => b'\\',
        0x2573 => b'X',
        // Half lines alternate horizontal / vertical.
        0x2574..=0x257F if cp % 2 == 0 => b'-',
        0x2574..=0x257F => b'|',
        // Corners, tees and crosses, single, double and rounded.
        _ => b'+',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Vec<Utf8Step> {
        let mut decoder = Utf8Decoder::new();
        let (first, rest) = bytes.split_first().unwrap();
        assert!(decoder.start(*first));
        rest.iter().map(|&b| decoder.advance(b)).collect()
    }

    #[test]
    fn horizontal_line_decodes_to_dash() {
        let steps = decode("\u{2500}".as_bytes());
        assert_eq!(
            steps,
            vec![Utf8Step::Pending, Utf8Step::Complete(Some(b'-'))]
        );
    }

    #[test]
    fn two_byte_sequence_completes_after_one_continuation() {
        let steps = decode("\u{00B7}".as_bytes());
        assert_eq!(steps, vec![Utf8Step::Complete(Some(b'.'))]);
    }

    #[test]
    fn four_byte_sequence_without_substitute_is_dropped() {
        let steps = decode("\u{1F600}".as_bytes());
        assert_eq!(
            steps,
            vec![
                Utf8Step::Pending,
                Utf8Step::Pending,
                Utf8Step::Complete(None)
            ]
        );
    }

    #[test]
    fn invalid_continuation_requests_reprocess() {
        let mut decoder = Utf8Decoder::new();
        assert!(decoder.start(0xE2));
        assert_eq!(decoder.advance(b'A'), Utf8Step::Reprocess);
        assert!(!decoder.is_pending());
    }

    #[test]
    fn start_rejects_non_lead_bytes() {
        let mut decoder = Utf8Decoder::new();
        assert!(!decoder.start(b'a'));
        assert!(!decoder.start(0x80));
        assert!(!decoder.start(0xF8));
        assert!(!decoder.is_pending());
    }

    #[test]
    fn advance_when_idle_requests_reprocess() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.advance(0x80), Utf8Step::Reprocess);
    }

    #[test]
    fn box_drawing_sub_ranges() {
        assert_eq!(ascii_substitute(0x2502), Some(b'|'));
        assert_eq!(ascii_substitute(0x250C), Some(b'+'));
        assert_eq!(ascii_substitute(0x253C), Some(b'+'));
        assert_eq!(ascii_substitute(0x2550), Some(b'-'));
        assert_eq!(ascii_substitute(0x2551), Some(b'|'));
        assert_eq!(ascii_substitute(0x256D), Some(b'+'));
        assert_eq!(ascii_substitute(0x2574), Some(b'-'));
        assert_eq!(ascii_substitute(0x2575), Some(b'|'));
    }

    #[test]
    fn blocks_and_symbols() {
        assert_eq!(ascii_substitute(0x2588), Some(b'#'));
        assert_eq!(ascii_substitute(0x2591), Some(b'#'));
        assert_eq!(ascii_substitute(0x2022), Some(b'*'));
        assert_eq!(ascii_substitute(0x2192), Some(b'>'));
        assert_eq!(ascii_substitute(0x201C), Some(b'"'));
        assert_eq!(ascii_substitute(0x2019), Some(b'\''));
    }

    #[test]
    fn unmapped_and_overlong_are_dropped() {
        assert_eq!(ascii_substitute(0x00E9), None);
        assert_eq!(ascii_substitute(0x4E2D), None);
        assert_eq!(ascii_substitute(u32::from(b'A')), None);
    }
}

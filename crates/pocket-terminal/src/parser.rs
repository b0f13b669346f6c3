use crate::csi::{self, CsiParams};
use crate::screen::Screen;
use crate::utf8::{Utf8Decoder, Utf8Step};

/// Events produced while parsing that the screen itself cannot represent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// Bell character received.
    Bell,
    /// `ESC c` reset the whole terminal.
    Reset,
}

/// Parser states for the escape-sequence state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    Ground,
    Escape,
    Csi,
    Osc,
    /// ESC seen inside an OSC string; `\` ends the string.
    OscEscape,
    /// Charset designation, one byte to skip.
    Charset,
}

/// Byte-at-a-time escape-sequence parser that mutates a [`Screen`].
///
/// State persists across calls to [`VtParser::process`], so a sequence may
/// be split over any number of chunks.
#[derive(Debug, Clone)]
pub struct VtParser {
    state: ParserState,
    params: CsiParams,
    /// Digits of the parameter being accumulated.
    current: u16,
    /// Whether any digit of the current parameter has been seen.
    in_param: bool,
    private: bool,
    utf8: Utf8Decoder,
}

impl Default for VtParser {
    fn default() -> Self {
        Self::new()
    }
}

impl VtParser {
    /// Create a new parser in the ground state.
    pub fn new() -> Self {
        Self {
            state: ParserState::Ground,
            params: CsiParams::new(),
            current: 0,
            in_param: false,
            private: false,
            utf8: Utf8Decoder::new(),
        }
    }

    /// Drop any partial sequence and return to the ground state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Whether the parser is between sequences.
    pub fn is_ground(&self) -> bool {
        self.state == ParserState::Ground && !self.utf8.is_pending()
    }

    /// Process a chunk of bytes, updating the screen and returning any events.
    pub fn process(&mut self, data: &[u8], screen: &mut Screen) -> Vec<TerminalEvent> {
        let mut events = Vec::new();
        for &byte in data {
            self.advance(byte, screen, &mut events);
        }
        events
    }

    fn advance(&mut self, byte: u8, screen: &mut Screen, events: &mut Vec<TerminalEvent>) {
        if self.utf8.is_pending() {
            match self.utf8.advance(byte) {
                Utf8Step::Pending => return,
                Utf8Step::Complete(Some(substitute)) => {
                    screen.put_char(substitute);
                    return;
                }
                Utf8Step::Complete(None) => return,
                // Abandoned sequence; the byte is handled normally below.
                Utf8Step::Reprocess => {}
            }
        }

        match self.state {
            ParserState::Ground => self.handle_ground(byte, screen, events),
            ParserState::Escape => self.handle_escape(byte, screen, events),
            ParserState::Csi => self.handle_csi(byte, screen),
            ParserState::Osc => self.handle_osc(byte),
            ParserState::OscEscape => self.handle_osc_escape(byte, screen, events),
            ParserState::Charset => self.state = ParserState::Ground,
        }
    }

    fn handle_ground(&mut self, byte: u8, screen: &mut Screen, events: &mut Vec<TerminalEvent>) {
        match byte {
            0x1b => self.state = ParserState::Escape,
            0x07 => events.push(TerminalEvent::Bell),
            // BS and DEL both erase the previous cell.
            0x08 | 0x7f => screen.backspace(),
            0x09 => screen.tab(),
            // LF, VT and FF imply a carriage return.
            0x0a..=0x0c => screen.newline(),
            0x0d => screen.carriage_return(),
            0x20..=0x7e => screen.put_char(byte),
            0xc0..=0xff => {
                if !self.utf8.start(byte) {
                    tracing::trace!("dropping invalid UTF-8 lead byte {:#04x}", byte);
                }
            }
            _ => {}
        }
    }

    fn handle_escape(&mut self, byte: u8, screen: &mut Screen, events: &mut Vec<TerminalEvent>) {
        self.state = ParserState::Ground;
        match byte {
            b'[' => {
                self.params.clear();
                self.current = 0;
                self.in_param = false;
                self.private = false;
                self.state = ParserState::Csi;
            }
            b']' => self.state = ParserState::Osc,
            b'(' | b')' | b'*' | b'+' => self.state = ParserState::Charset,
            b'7' => screen.save_cursor(),
            b'8' => screen.restore_cursor(),
            b'D' => screen.line_feed(),
            b'E' => screen.newline(),
            b'M' => screen.reverse_index(),
            b'c' => {
                screen.reset();
                self.reset();
                events.push(TerminalEvent::Reset);
            }
            _ => tracing::trace!("unhandled ESC sequence: {:?}", byte as char),
        }
    }

    fn handle_csi(&mut self, byte: u8, screen: &mut Screen) {
        match byte {
            b'0'..=b'9' => {
                self.current = self
                    .current
                    .saturating_mul(10)
                    .saturating_add(u16::from(byte - b'0'));
                self.in_param = true;
            }
            b';' => {
                self.params.push(self.current);
                self.current = 0;
                self.in_param = false;
            }
            b'?' => {
                if self.params.is_empty() && !self.in_param {
                    self.private = true;
                }
            }
            b'A'..=b'Z' | b'a'..=b'z' | b'@' | b'`' => {
                if self.in_param {
                    self.params.push(self.current);
                }
                self.state = ParserState::Ground;
                csi::dispatch(byte, &self.params, self.private, screen);
            }
            // A stray ESC abandons the sequence and starts a new one.
            0x1b => self.state = ParserState::Escape,
            // Intermediates such as '>', '!' and ' ' are skipped.
            _ => {}
        }
    }

    fn handle_osc(&mut self, byte: u8) {
        match byte {
            0x07 => self.state = ParserState::Ground,
            0x1b => self.state = ParserState::OscEscape,
            _ => {}
        }
    }

    fn handle_osc_escape(
        &mut self,
        byte: u8,
        screen: &mut Screen,
        events: &mut Vec<TerminalEvent>,
    ) {
        if byte == b'\\' {
            self.state = ParserState::Ground;
        } else {
            self.handle_escape(byte, screen, events);
        }
    }
}

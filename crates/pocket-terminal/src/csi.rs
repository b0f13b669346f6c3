//! CSI parameter collection and final-byte dispatch.

use crate::screen::Screen;

/// Parameters kept per CSI sequence; extra ones are dropped.
pub const MAX_PARAMS: usize = 8;

/// Numeric parameters of one CSI sequence.
///
/// Absent and empty parameters read as 0. Values saturate at `u16::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CsiParams {
    values: [u16; MAX_PARAMS],
    len: usize,
}

impl CsiParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slice(values: &[u16]) -> Self {
        let mut params = Self::new();
        for &v in values {
            params.push(v);
        }
        params
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Append a parameter. Returns `false` once the array is full.
    pub fn push(&mut self, value: u16) -> bool {
        if self.len >= MAX_PARAMS {
            return false;
        }
        self.values[self.len] = value;
        self.len += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Parameter `i`, or 0 when absent.
    pub fn get(&self, i: usize) -> u16 {
        self.as_slice().get(i).copied().unwrap_or(0)
    }

    /// Parameter `i` used as a repeat count: absent or 0 means 1.
    pub fn count(&self, i: usize) -> u16 {
        self.get(i).max(1)
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.values[..self.len]
    }
}

/// Apply a complete CSI sequence to the screen.
pub fn dispatch(final_byte: u8, params: &CsiParams, private: bool, screen: &mut Screen) {
    if private {
        dispatch_private(final_byte, params, screen);
        return;
    }

    match final_byte {
        b'A' => screen.cursor_up(params.count(0)),
        b'B' => screen.cursor_down(params.count(0)),
        b'C' => screen.cursor_forward(params.count(0)),
        b'D' => screen.cursor_back(params.count(0)),
        b'E' => screen.cursor_next_line(params.count(0)),
        b'F' => screen.cursor_prev_line(params.count(0)),
        // HPA: G and its backtick alias.
        b'G' | b'`' => screen.set_column(params.count(0) - 1),
        b'H' | b'f' => screen.set_cursor(params.count(0) - 1, params.count(1) - 1),
        b'd' => screen.set_row(params.count(0) - 1),
        b'J' => screen.erase_display(params.get(0)),
        b'K' => screen.erase_line(params.get(0)),
        b'L' => screen.insert_lines(params.count(0)),
        b'M' => screen.delete_lines(params.count(0)),
        b'P' => screen.delete_chars(params.count(0)),
        b'@' => screen.insert_chars(params.count(0)),
        b'X' => screen.erase_chars(params.count(0)),
        b'S' => screen.scroll_up(params.count(0)),
        b'T' => screen.scroll_down(params.count(0)),
        b'r' => screen.set_scroll_region(params.get(0), params.get(1)),
        b's' => screen.save_cursor(),
        b'u' => screen.restore_cursor(),
        // Graphic rendition, device status, standard modes and the like have
        // nothing to act on with a one-bit panel.
        b'm' | b'n' | b'c' | b'h' | b'l' | b't' | b'q' => {}
        _ => tracing::trace!(
            "unhandled CSI final byte: {:?} params={:?}",
            final_byte as char,
            params.as_slice()
        ),
    }
}

/// `CSI ? Pm h` / `CSI ? Pm l`. Every listed mode is applied in order.
fn dispatch_private(final_byte: u8, params: &CsiParams, screen: &mut Screen) {
    let enable = match final_byte {
        b'h' => true,
        b'l' => false,
        _ => {
            tracing::trace!(
                "unhandled private CSI final byte: {:?}",
                final_byte as char
            );
            return;
        }
    };

    for &mode in params.as_slice() {
        match mode {
            1049 if enable => screen.enter_alternate(true),
            1049 => screen.leave_alternate(true),
            47 | 1047 if enable => screen.enter_alternate(false),
            47 | 1047 => screen.leave_alternate(false),
            25 => screen.set_cursor_visible(enable),
            _ => tracing::trace!("unhandled private mode: {} (enable={})", mode, enable),
        }
    }
}

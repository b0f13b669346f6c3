use crate::grid::CursorPosition;
use crate::screen::Screen;

/// An owned copy of the visible window, taken so rendering can proceed
/// without holding the terminal lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSnapshot {
    pub cols: u16,
    /// Exactly `screen_rows` rows of `cols` bytes each.
    pub rows: Vec<Vec<u8>>,
    /// Cursor in grid coordinates.
    pub cursor: CursorPosition,
    pub cursor_visible: bool,
    pub line_count: u16,
    /// Grid row shown at the top of the window.
    pub scroll_offset: u16,
    pub alternate: bool,
}

impl GridSnapshot {
    /// Copy the window `scroll_offset..scroll_offset + screen_rows` of the
    /// active grid. Rows past the end of the grid come out blank.
    pub fn capture(screen: &Screen) -> Self {
        let dims = screen.dimensions();
        let grid = screen.grid();
        let offset = screen.scroll_offset();
        let rows = (0..dims.screen_rows)
            .map(|i| {
                grid.row(offset.saturating_add(i))
                    .map(<[u8]>::to_vec)
                    .unwrap_or_else(|| vec![crate::grid::BLANK; dims.cols as usize])
            })
            .collect();
        Self {
            cols: dims.cols,
            rows,
            cursor: screen.cursor(),
            cursor_visible: screen.cursor_visible(),
            line_count: screen.line_count(),
            scroll_offset: offset,
            alternate: screen.is_alternate(),
        }
    }

    pub fn visible_rows(&self) -> u16 {
        self.rows.len() as u16
    }

    pub fn row(&self, i: u16) -> Option<&[u8]> {
        self.rows.get(i as usize).map(Vec::as_slice)
    }

    pub fn row_text(&self, i: u16) -> String {
        self.row(i)
            .map(|r| String::from_utf8_lossy(r).into_owned())
            .unwrap_or_default()
    }

    /// Cursor position within the window, if it is visible there.
    pub fn cursor_in_window(&self) -> Option<CursorPosition> {
        if !self.cursor_visible {
            return None;
        }
        let row = self.cursor.row.checked_sub(self.scroll_offset)?;
        (row < self.visible_rows()).then_some(CursorPosition::new(row, self.cursor.col))
    }
}

use serde::{Deserialize, Serialize};

/// Columns on the reference panel (240px wide, 11px glyphs, 4px margins).
pub const DEFAULT_COLS: u16 = 21;
/// Visible text rows on the reference panel.
pub const DEFAULT_SCREEN_ROWS: u16 = 20;
/// Capacity of the main grid, i.e. the visible rows plus the growing log.
pub const DEFAULT_HISTORY_ROWS: u16 = 100;

/// The blank cell value.
pub const BLANK: u8 = b' ';

/// Fixed geometry of the terminal.
///
/// `history_rows` is the height of the main grid, `screen_rows` the height of
/// the visible window and of the alternate grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    pub cols: u16,
    pub screen_rows: u16,
    pub history_rows: u16,
}

impl GridDimensions {
    /// Build dimensions, raising zero values to 1 and the history to at least
    /// one screen.
    pub fn new(cols: u16, screen_rows: u16, history_rows: u16) -> Self {
        let cols = cols.max(1);
        let screen_rows = screen_rows.max(1);
        Self {
            cols,
            screen_rows,
            history_rows: history_rows.max(screen_rows),
        }
    }

    /// The size reported to the remote side in a pty request.
    pub fn screen_size(&self) -> TerminalSize {
        TerminalSize::new(self.cols, self.screen_rows)
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self::new(DEFAULT_COLS, DEFAULT_SCREEN_ROWS, DEFAULT_HISTORY_ROWS)
    }
}

/// Terminal dimensions as seen by the remote program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalSize {
    pub cols: u16,
    pub rows: u16,
}

impl TerminalSize {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }
}

/// Cursor position within a grid, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorPosition {
    pub row: u16,
    pub col: u16,
}

impl CursorPosition {
    pub fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }
}

/// A fixed-size matrix of single-byte characters.
///
/// Every row is exactly `cols` bytes wide and unused cells hold [`BLANK`].
/// `line_count` is one past the highest row written so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharGrid {
    cols: u16,
    rows: Vec<Vec<u8>>,
    line_count: u16,
}

impl CharGrid {
    /// Create a blank grid.
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows: Self::create_rows(cols, rows),
            line_count: 1,
        }
    }

    fn create_rows(cols: u16, rows: u16) -> Vec<Vec<u8>> {
        (0..rows as usize)
            .map(|_| Self::blank_row(cols))
            .collect()
    }

    fn blank_row(cols: u16) -> Vec<u8> {
        vec![BLANK; cols as usize]
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    /// Number of rows the grid can hold.
    pub fn row_count(&self) -> u16 {
        self.rows.len() as u16
    }

    pub fn line_count(&self) -> u16 {
        self.line_count
    }

    pub fn set_line_count(&mut self, count: u16) {
        self.line_count = count.clamp(1, self.row_count().max(1));
    }

    /// Grow `line_count` so that it covers `row`.
    pub fn extend_line_count(&mut self, row: u16) {
        if row >= self.line_count {
            self.set_line_count(row.saturating_add(1));
        }
    }

    /// Blank every cell and reset the line counter.
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(BLANK);
        }
        self.line_count = 1;
    }

    pub fn get(&self, row: u16, col: u16) -> Option<u8> {
        self.rows
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
    }

    /// Write a byte; writes outside the grid are dropped.
    pub fn set(&mut self, row: u16, col: u16, byte: u8) {
        if let Some(cell) = self
            .rows
            .get_mut(row as usize)
            .and_then(|r| r.get_mut(col as usize))
        {
            *cell = byte;
        }
    }

    pub fn row(&self, row: u16) -> Option<&[u8]> {
        self.rows.get(row as usize).map(Vec::as_slice)
    }

    /// Row contents as a `String`, including trailing blanks.
    pub fn row_text(&self, row: u16) -> String {
        self.row(row)
            .map(|r| String::from_utf8_lossy(r).into_owned())
            .unwrap_or_default()
    }

    /// Blank columns `start..end` of `row`, clipped to the grid.
    pub fn clear_span(&mut self, row: u16, start: u16, end: u16) {
        let cols = self.cols as usize;
        if let Some(r) = self.rows.get_mut(row as usize) {
            let end = (end as usize).min(cols);
            let start = (start as usize).min(end);
            r[start..end].fill(BLANK);
        }
    }

    pub fn clear_row(&mut self, row: u16) {
        self.clear_span(row, 0, self.cols);
    }

    /// Shift rows `top+1..=bottom` up by `n`, blanking the rows freed at the
    /// bottom of the range.
    pub fn scroll_up(&mut self, top: u16, bottom: u16, n: u16) {
        let Some((top, bottom)) = self.range(top, bottom) else {
            return;
        };
        let n = (n as usize).min(bottom - top + 1);
        for _ in 0..n {
            self.rows.remove(top);
            self.rows.insert(bottom, Self::blank_row(self.cols));
        }
    }

    /// Shift rows `top..bottom` down by `n`, blanking the rows freed at the
    /// top of the range.
    pub fn scroll_down(&mut self, top: u16, bottom: u16, n: u16) {
        let Some((top, bottom)) = self.range(top, bottom) else {
            return;
        };
        let n = (n as usize).min(bottom - top + 1);
        for _ in 0..n {
            self.rows.remove(bottom);
            self.rows.insert(top, Self::blank_row(self.cols));
        }
    }

    fn range(&self, top: u16, bottom: u16) -> Option<(usize, usize)> {
        let (top, bottom) = (top as usize, bottom as usize);
        (top <= bottom && bottom < self.rows.len()).then_some((top, bottom))
    }

    /// Insert `n` blanks at `col`, pushing the rest of the row right. Bytes
    /// shifted past the last column are lost.
    pub fn insert_blanks(&mut self, row: u16, col: u16, n: u16) {
        let cols = self.cols as usize;
        let col = col as usize;
        let Some(r) = self.rows.get_mut(row as usize) else {
            return;
        };
        if col >= cols {
            return;
        }
        let n = (n as usize).min(cols - col);
        r.copy_within(col..cols - n, col + n);
        r[col..col + n].fill(BLANK);
    }

    /// Delete `n` cells at `col`, pulling the rest of the row left and
    /// padding the end with blanks.
    pub fn delete_cells(&mut self, row: u16, col: u16, n: u16) {
        let cols = self.cols as usize;
        let col = col as usize;
        let Some(r) = self.rows.get_mut(row as usize) else {
            return;
        };
        if col >= cols {
            return;
        }
        let n = (n as usize).min(cols - col);
        r.copy_within(col + n..cols, col);
        r[cols - n..cols].fill(BLANK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_rows(cols: u16, lines: &[&str]) -> CharGrid {
        let mut grid = CharGrid::new(cols, lines.len() as u16);
        for (r, line) in lines.iter().enumerate() {
            for (c, b) in line.bytes().enumerate() {
                grid.set(r as u16, c as u16, b);
            }
        }
        grid
    }

    #[test]
    fn grid_new_is_blank() {
        let grid = CharGrid::new(10, 4);
        assert_eq!(grid.cols(), 10);
        assert_eq!(grid.row_count(), 4);
        assert_eq!(grid.line_count(), 1);
        for row in 0..4 {
            assert_eq!(grid.row(row).unwrap(), b"          ");
        }
    }

    #[test]
    fn grid_set_out_of_bounds_is_dropped() {
        let mut grid = CharGrid::new(3, 2);
        grid.set(5, 0, b'x');
        grid.set(0, 9, b'x');
        assert_eq!(grid.row_text(0), "   ");
        assert_eq!(grid.row_text(1), "   ");
        assert!(grid.get(2, 0).is_none());
    }

    #[test]
    fn grid_scroll_up_region_only() {
        let mut grid = grid_with_rows(3, &["aaa", "bbb", "ccc", "ddd", "eee"]);
        grid.scroll_up(1, 3, 1);
        assert_eq!(grid.row_text(0), "aaa");
        assert_eq!(grid.row_text(1), "ccc");
        assert_eq!(grid.row_text(2), "ddd");
        assert_eq!(grid.row_text(3), "   ");
        assert_eq!(grid.row_text(4), "eee");
    }

    #[test]
    fn grid_scroll_down_region_only() {
        let mut grid = grid_with_rows(3, &["aaa", "bbb", "ccc", "ddd", "eee"]);
        grid.scroll_down(1, 3, 2);
        assert_eq!(grid.row_text(0), "aaa");
        assert_eq!(grid.row_text(1), "   ");
        assert_eq!(grid.row_text(2), "   ");
        assert_eq!(grid.row_text(3), "bbb");
        assert_eq!(grid.row_text(4), "eee");
    }

    #[test]
    fn grid_scroll_count_clamped_to_region() {
        let mut grid = grid_with_rows(2, &["aa", "bb", "cc"]);
        grid.scroll_up(0, 2, 50);
        for row in 0..3 {
            assert_eq!(grid.row_text(row), "  ");
        }
        assert_eq!(grid.row_count(), 3);
    }

    #[test]
    fn grid_scroll_invalid_range_is_noop() {
        let mut grid = grid_with_rows(2, &["aa", "bb"]);
        grid.scroll_up(1, 0, 1);
        grid.scroll_down(0, 7, 1);
        assert_eq!(grid.row_text(0), "aa");
        assert_eq!(grid.row_text(1), "bb");
    }

    #[test]
    fn grid_insert_blanks_shifts_right() {
        let mut grid = grid_with_rows(6, &["abcdef"]);
        grid.insert_blanks(0, 2, 2);
        assert_eq!(grid.row_text(0), "ab  cd");
    }

    #[test]
    fn grid_delete_cells_shifts_left() {
        let mut grid = grid_with_rows(6, &["abcdef"]);
        grid.delete_cells(0, 1, 2);
        assert_eq!(grid.row_text(0), "adef  ");
    }

    #[test]
    fn grid_delete_cells_past_end_clears_tail() {
        let mut grid = grid_with_rows(4, &["abcd"]);
        grid.delete_cells(0, 2, 99);
        assert_eq!(grid.row_text(0), "ab  ");
    }

    #[test]
    fn grid_clear_span_clips() {
        let mut grid = grid_with_rows(4, &["abcd"]);
        grid.clear_span(0, 3, 40);
        assert_eq!(grid.row_text(0), "abc ");
        grid.clear_span(0, 9, 12);
        assert_eq!(grid.row_text(0), "abc ");
    }

    #[test]
    fn grid_line_count_extends_and_clamps() {
        let mut grid = CharGrid::new(4, 5);
        grid.extend_line_count(2);
        assert_eq!(grid.line_count(), 3);
        grid.extend_line_count(1);
        assert_eq!(grid.line_count(), 3);
        grid.extend_line_count(40);
        assert_eq!(grid.line_count(), 5);
        grid.clear();
        assert_eq!(grid.line_count(), 1);
    }

    #[test]
    fn dimensions_normalise() {
        let dims = GridDimensions::new(0, 0, 0);
        assert_eq!(dims, GridDimensions::new(1, 1, 1));
        let dims = GridDimensions::new(80, 24, 10);
        assert_eq!(dims.history_rows, 24);
        assert_eq!(dims.screen_size(), TerminalSize::new(80, 24));
    }

    #[test]
    fn dimensions_default_matches_panel() {
        let dims = GridDimensions::default();
        assert_eq!(dims.cols, DEFAULT_COLS);
        assert_eq!(dims.screen_rows, DEFAULT_SCREEN_ROWS);
        assert_eq!(dims.history_rows, DEFAULT_HISTORY_ROWS);
    }
}

use crate::grid::{CharGrid, CursorPosition, GridDimensions, BLANK};

/// Which of the two grids receives output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveScreen {
    Main,
    Alternate,
}

/// Row bounds, inclusive and 0-based, that confine line-feed scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRegion {
    pub top: u16,
    pub bottom: u16,
    /// Set by `CSI r`; the default full-height region is not explicit.
    pub explicit: bool,
}

/// Main-screen state captured on alternate-screen entry and put back
/// verbatim on exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MainState {
    cursor: CursorPosition,
    line_count: u16,
    scroll_offset: u16,
}

/// The two character grids with cursor, scroll region, and alternate-screen
/// bookkeeping.
///
/// The main grid is `history_rows` tall and behaves as a growing log: line
/// feeds move down until the grid is full and only then scroll it. The
/// alternate grid is exactly one screen tall and always scrolls inside its
/// scroll region.
#[derive(Debug, Clone)]
pub struct Screen {
    dims: GridDimensions,
    main: CharGrid,
    alternate: CharGrid,
    active: ActiveScreen,
    cursor: CursorPosition,
    cursor_visible: bool,
    /// Slot for `ESC 7`/`ESC 8` and `CSI s`/`CSI u`.
    saved_cursor: CursorPosition,
    /// Cursor captured by `CSI ? 1049 h`.
    alt_entry_cursor: Option<CursorPosition>,
    saved_main: Option<MainState>,
    region: ScrollRegion,
    /// First main-grid row shown in the visible window.
    scroll_offset: u16,
}

impl Screen {
    pub fn new(dims: GridDimensions) -> Self {
        Self {
            dims,
            main: CharGrid::new(dims.cols, dims.history_rows),
            alternate: CharGrid::new(dims.cols, dims.screen_rows),
            active: ActiveScreen::Main,
            cursor: CursorPosition::default(),
            cursor_visible: true,
            saved_cursor: CursorPosition::default(),
            alt_entry_cursor: None,
            saved_main: None,
            region: Self::full_region(dims),
            scroll_offset: 0,
        }
    }

    fn full_region(dims: GridDimensions) -> ScrollRegion {
        ScrollRegion {
            top: 0,
            bottom: dims.screen_rows.saturating_sub(1),
            explicit: false,
        }
    }

    /// Return every field to its initial value.
    pub fn reset(&mut self) {
        self.main.clear();
        self.alternate.clear();
        self.active = ActiveScreen::Main;
        self.cursor = CursorPosition::default();
        self.cursor_visible = true;
        self.saved_cursor = CursorPosition::default();
        self.alt_entry_cursor = None;
        self.saved_main = None;
        self.region = Self::full_region(self.dims);
        self.scroll_offset = 0;
    }

    // ── accessors ──────────────────────────────────────────────────────────

    pub fn dimensions(&self) -> GridDimensions {
        self.dims
    }

    pub fn is_alternate(&self) -> bool {
        self.active == ActiveScreen::Alternate
    }

    /// The grid currently receiving output.
    pub fn grid(&self) -> &CharGrid {
        match self.active {
            ActiveScreen::Main => &self.main,
            ActiveScreen::Alternate => &self.alternate,
        }
    }

    fn grid_mut(&mut self) -> &mut CharGrid {
        match self.active {
            ActiveScreen::Main => &mut self.main,
            ActiveScreen::Alternate => &mut self.alternate,
        }
    }

    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    pub fn scroll_region(&self) -> ScrollRegion {
        self.region
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll_offset
    }

    /// Logical line count of the active grid.
    pub fn line_count(&self) -> u16 {
        self.grid().line_count()
    }

    /// Row contents of the active grid.
    pub fn row_text(&self, row: u16) -> String {
        self.grid().row_text(row)
    }

    fn cols(&self) -> u16 {
        self.dims.cols
    }

    /// Number of addressable rows on the active grid.
    fn max_row(&self) -> u16 {
        self.grid().row_count()
    }

    fn last_row(&self) -> u16 {
        self.max_row().saturating_sub(1)
    }

    fn last_col(&self) -> u16 {
        self.cols().saturating_sub(1)
    }

    /// Rows that insert/delete-line and scroll commands act on. Without an
    /// explicit region the main screen uses the whole log.
    fn effective_region(&self) -> (u16, u16) {
        if self.region.explicit || self.is_alternate() {
            (self.region.top, self.region.bottom)
        } else {
            (0, self.last_row())
        }
    }

    // ── writing ────────────────────────────────────────────────────────────

    /// Write a byte at the cursor and advance, wrapping at the last column.
    pub fn put_char(&mut self, byte: u8) {
        let CursorPosition { row, col } = self.cursor;
        let grid = self.grid_mut();
        grid.set(row, col, byte);
        grid.extend_line_count(row);
        self.cursor.col += 1;
        if self.cursor.col >= self.cols() {
            self.cursor.col = 0;
            self.advance_line();
        }
    }

    /// `\n`: column 0 and down one row.
    pub fn newline(&mut self) {
        self.cursor.col = 0;
        self.advance_line();
    }

    /// Index: down one row keeping the column.
    pub fn line_feed(&mut self) {
        self.advance_line();
    }

    pub fn carriage_return(&mut self) {
        self.cursor.col = 0;
    }

    /// Destructive backspace.
    pub fn backspace(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
            let CursorPosition { row, col } = self.cursor;
            self.grid_mut().set(row, col, BLANK);
        }
    }

    /// Advance to the next multiple of 8, blanking the cells passed over.
    pub fn tab(&mut self) {
        let cols = self.cols();
        let next_stop = ((self.cursor.col / 8) + 1).saturating_mul(8).min(cols);
        let row = self.cursor.row;
        while self.cursor.col < next_stop {
            let col = self.cursor.col;
            self.grid_mut().set(row, col, BLANK);
            self.cursor.col += 1;
        }
        if self.cursor.col >= cols {
            self.cursor.col = 0;
            self.advance_line();
        }
    }

    /// Move the cursor down one row. Inside a scroll region (explicit, or
    /// any region on the alternate screen) the region scrolls when the
    /// cursor sits on its bottom row; on the main screen the log grows until
    /// the grid is full and then the whole grid scrolls.
    fn advance_line(&mut self) {
        let row = self.cursor.row;
        if self.region.explicit || self.is_alternate() {
            let ScrollRegion { top, bottom, .. } = self.region;
            if row == bottom {
                self.grid_mut().scroll_up(top, bottom, 1);
            } else if row < self.last_row() {
                self.cursor.row += 1;
            }
        } else {
            let last = self.last_row();
            if row >= last {
                self.main.scroll_up(0, last, 1);
                self.cursor.row = last;
            } else {
                self.cursor.row += 1;
            }
        }
        let row = self.cursor.row;
        self.grid_mut().extend_line_count(row);
    }

    /// Reverse index: up one row, scrolling the region down from its top.
    pub fn reverse_index(&mut self) {
        let (top, bottom) = self.effective_region();
        if self.cursor.row == top {
            self.grid_mut().scroll_down(top, bottom, 1);
        } else {
            self.cursor.row = self.cursor.row.saturating_sub(1);
        }
    }

    /// Keep the cursor row inside the visible window of the main grid.
    pub fn follow_cursor(&mut self) {
        if self.is_alternate() {
            self.scroll_offset = 0;
            return;
        }
        let visible = self.dims.screen_rows;
        let row = self.cursor.row;
        if row >= self.scroll_offset.saturating_add(visible) {
            self.scroll_offset = row + 1 - visible;
        }
        if row < self.scroll_offset {
            self.scroll_offset = row;
        }
    }

    // ── cursor motion ──────────────────────────────────────────────────────

    pub fn cursor_up(&mut self, n: u16) {
        self.cursor.row = self.cursor.row.saturating_sub(n);
    }

    pub fn cursor_down(&mut self, n: u16) {
        self.cursor.row = self.cursor.row.saturating_add(n).min(self.last_row());
    }

    pub fn cursor_forward(&mut self, n: u16) {
        self.cursor.col = self.cursor.col.saturating_add(n).min(self.last_col());
    }

    pub fn cursor_back(&mut self, n: u16) {
        self.cursor.col = self.cursor.col.saturating_sub(n);
    }

    pub fn cursor_next_line(&mut self, n: u16) {
        self.cursor.col = 0;
        self.cursor_down(n);
    }

    pub fn cursor_prev_line(&mut self, n: u16) {
        self.cursor.col = 0;
        self.cursor_up(n);
    }

    /// Absolute position, 0-based, clamped to the active grid.
    pub fn set_cursor(&mut self, row: u16, col: u16) {
        self.set_row(row);
        self.set_column(col);
    }

    pub fn set_column(&mut self, col: u16) {
        self.cursor.col = col.min(self.last_col());
    }

    pub fn set_row(&mut self, row: u16) {
        let row = row.min(self.last_row());
        self.cursor.row = row;
        self.grid_mut().extend_line_count(row);
    }

    pub fn save_cursor(&mut self) {
        self.saved_cursor = self.cursor;
    }

    pub fn restore_cursor(&mut self) {
        let saved = self.saved_cursor;
        self.cursor.row = saved.row.min(self.last_row());
        self.cursor.col = saved.col.min(self.last_col());
    }

    // ── erasing and editing ────────────────────────────────────────────────

    /// `CSI J`: 0 cursor to end, 1 start to cursor inclusive, 2/3 everything
    /// plus cursor home and scroll offset reset.
    pub fn erase_display(&mut self, mode: u16) {
        let CursorPosition { row, col } = self.cursor;
        let cols = self.cols();
        let max_row = self.max_row();
        match mode {
            0 => {
                let grid = self.grid_mut();
                grid.clear_span(row, col, cols);
                for r in row.saturating_add(1)..max_row {
                    grid.clear_row(r);
                }
            }
            1 => {
                let grid = self.grid_mut();
                for r in 0..row {
                    grid.clear_row(r);
                }
                grid.clear_span(row, 0, col.saturating_add(1));
            }
            2 | 3 => {
                self.grid_mut().clear();
                self.cursor = CursorPosition::default();
                self.scroll_offset = 0;
            }
            _ => tracing::trace!("unhandled erase display mode: {}", mode),
        }
    }

    /// `CSI K`: 0 cursor to end, 1 start to cursor inclusive, 2 whole line.
    pub fn erase_line(&mut self, mode: u16) {
        let CursorPosition { row, col } = self.cursor;
        let cols = self.cols();
        match mode {
            0 => self.grid_mut().clear_span(row, col, cols),
            1 => self.grid_mut().clear_span(row, 0, col.saturating_add(1)),
            2 => self.grid_mut().clear_row(row),
            _ => tracing::trace!("unhandled erase line mode: {}", mode),
        }
    }

    pub fn insert_chars(&mut self, n: u16) {
        let CursorPosition { row, col } = self.cursor;
        self.grid_mut().insert_blanks(row, col, n);
    }

    pub fn delete_chars(&mut self, n: u16) {
        let CursorPosition { row, col } = self.cursor;
        self.grid_mut().delete_cells(row, col, n);
    }

    /// Blank `n` cells from the cursor without shifting.
    pub fn erase_chars(&mut self, n: u16) {
        let CursorPosition { row, col } = self.cursor;
        self.grid_mut().clear_span(row, col, col.saturating_add(n));
    }

    /// Insert `n` blank lines at the cursor row, pushing the rest of the
    /// region down. No-op when the cursor is outside the region.
    pub fn insert_lines(&mut self, n: u16) {
        let (top, bottom) = self.effective_region();
        let row = self.cursor.row;
        if (top..=bottom).contains(&row) {
            self.grid_mut().scroll_down(row, bottom, n);
        }
    }

    /// Delete `n` lines at the cursor row, pulling the rest of the region up.
    pub fn delete_lines(&mut self, n: u16) {
        let (top, bottom) = self.effective_region();
        let row = self.cursor.row;
        if (top..=bottom).contains(&row) {
            self.grid_mut().scroll_up(row, bottom, n);
        }
    }

    pub fn scroll_up(&mut self, n: u16) {
        let (top, bottom) = self.effective_region();
        self.grid_mut().scroll_up(top, bottom, n);
    }

    pub fn scroll_down(&mut self, n: u16) {
        let (top, bottom) = self.effective_region();
        self.grid_mut().scroll_down(top, bottom, n);
    }

    /// `CSI r` with raw 1-based parameters (0 = omitted). Both omitted, or a
    /// region that is not at least two rows tall, restores the full-height
    /// default. The cursor always goes home.
    pub fn set_scroll_region(&mut self, top: u16, bottom: u16) {
        let full = Self::full_region(self.dims);
        self.region = if top == 0 && bottom == 0 {
            full
        } else {
            let top = top.max(1) - 1;
            let bottom = if bottom == 0 {
                full.bottom
            } else {
                bottom - 1
            }
            .min(self.last_row());
            if top >= bottom {
                full
            } else {
                ScrollRegion {
                    top,
                    bottom,
                    explicit: true,
                }
            }
        };
        self.cursor = CursorPosition::default();
    }

    // ── alternate screen ───────────────────────────────────────────────────

    /// Switch output to the alternate grid. With `remember_cursor` the
    /// current cursor is also kept for [`Screen::leave_alternate`]. Ignored
    /// when the alternate grid is already active.
    pub fn enter_alternate(&mut self, remember_cursor: bool) {
        if self.is_alternate() {
            return;
        }
        if remember_cursor {
            self.alt_entry_cursor = Some(self.cursor);
        }
        self.saved_main = Some(MainState {
            cursor: self.cursor,
            line_count: self.main.line_count(),
            scroll_offset: self.scroll_offset,
        });
        self.active = ActiveScreen::Alternate;
        self.alternate.clear();
        self.cursor = CursorPosition::default();
        self.scroll_offset = 0;
        self.region = Self::full_region(self.dims);
        tracing::debug!("entered alternate screen");
    }

    /// Switch back to the main grid and restore the state saved on entry.
    /// With `restore_entry_cursor` the cursor captured by
    /// `enter_alternate(true)` is applied last.
    pub fn leave_alternate(&mut self, restore_entry_cursor: bool) {
        if !self.is_alternate() {
            return;
        }
        self.active = ActiveScreen::Main;
        if let Some(saved) = self.saved_main.take() {
            self.cursor = saved.cursor;
            self.main.set_line_count(saved.line_count);
            self.scroll_offset = saved.scroll_offset;
        }
        let entry_cursor = self.alt_entry_cursor.take();
        if restore_entry_cursor {
            if let Some(cursor) = entry_cursor {
                self.cursor = cursor;
            }
        }
        self.region = Self::full_region(self.dims);
        tracing::debug!("left alternate screen");
    }
}

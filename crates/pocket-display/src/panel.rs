use crate::error::{DisplayError, DisplayResult};

/// Trait for the character display (e-ink driver or host stand-in).
///
/// A frame is `begin_full` or `begin_partial`, any number of `draw_row`
/// and `draw_status` calls, then `finish`. Rows are window rows, not grid
/// rows.
pub trait Panel {
    /// Text area as `(cols, rows)`, excluding the status line.
    fn size(&self) -> DisplayResult<(u16, u16)>;
    /// Start a clean refresh of the whole panel.
    fn begin_full(&mut self) -> DisplayResult<()>;
    /// Start a partial refresh covering `first_row..=last_row`.
    fn begin_partial(&mut self, first_row: u16, last_row: u16) -> DisplayResult<()>;
    /// Paint one row. `cursor_col` marks the cell drawn inverted.
    fn draw_row(&mut self, row: u16, text: &[u8], cursor_col: Option<u16>) -> DisplayResult<()>;
    fn draw_status(&mut self, text: &str) -> DisplayResult<()>;
    /// Push the frame to the glass.
    fn finish(&mut self) -> DisplayResult<()>;
}

/// Kind of refresh a [`MockPanel`] was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelRefresh {
    Full,
    Partial { first_row: u16, last_row: u16 },
}

/// Mock panel for testing; records all operations.
#[derive(Debug)]
pub struct MockPanel {
    cols: u16,
    rows: Vec<String>,
    cursor: Option<(u16, u16)>,
    status: String,
    in_frame: bool,
    pub refreshes: Vec<PanelRefresh>,
    pub drawn_rows: Vec<u16>,
    pub finish_count: usize,
}

impl MockPanel {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows: vec![" ".repeat(cols as usize); rows as usize],
            cursor: None,
            status: String::new(),
            in_frame: false,
            refreshes: Vec::new(),
            drawn_rows: Vec::new(),
            finish_count: 0,
        }
    }

    /// Contents of a painted row, trailing blanks trimmed.
    pub fn read_row(&self, row: u16) -> String {
        self.rows
            .get(row as usize)
            .map(|r| r.trim_end().to_string())
            .unwrap_or_default()
    }

    /// Where the inverted cursor cell was last drawn, as `(row, col)`.
    pub fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    fn begin(&mut self, refresh: PanelRefresh) -> DisplayResult<()> {
        if self.in_frame {
            return Err(DisplayError::Render("frame already open".into()));
        }
        self.in_frame = true;
        self.drawn_rows.clear();
        self.refreshes.push(refresh);
        Ok(())
    }

    fn require_frame(&self) -> DisplayResult<()> {
        if self.in_frame {
            Ok(())
        } else {
            Err(DisplayError::Render("draw outside of a frame".into()))
        }
    }
}

impl Panel for MockPanel {
    fn size(&self) -> DisplayResult<(u16, u16)> {
        Ok((self.cols, self.rows.len() as u16))
    }

    fn begin_full(&mut self) -> DisplayResult<()> {
        self.begin(PanelRefresh::Full)?;
        for row in &mut self.rows {
            *row = " ".repeat(self.cols as usize);
        }
        self.cursor = None;
        Ok(())
    }

    fn begin_partial(&mut self, first_row: u16, last_row: u16) -> DisplayResult<()> {
        self.begin(PanelRefresh::Partial {
            first_row,
            last_row,
        })
    }

    fn draw_row(&mut self, row: u16, text: &[u8], cursor_col: Option<u16>) -> DisplayResult<()> {
        self.require_frame()?;
        let cols = self.cols as usize;
        let slot = self
            .rows
            .get_mut(row as usize)
            .ok_or_else(|| DisplayError::Render(format!("row {} out of range", row)))?;
        let mut line = String::from_utf8_lossy(&text[..text.len().min(cols)]).into_owned();
        while line.len() < cols {
            line.push(' ');
        }
        *slot = line;
        self.drawn_rows.push(row);
        match cursor_col {
            Some(col) => self.cursor = Some((row, col)),
            None if self.cursor.map(|(r, _)| r) == Some(row) => self.cursor = None,
            None => {}
        }
        Ok(())
    }

    fn draw_status(&mut self, text: &str) -> DisplayResult<()> {
        self.require_frame()?;
        self.status = text.to_string();
        Ok(())
    }

    fn finish(&mut self) -> DisplayResult<()> {
        self.require_frame()?;
        self.in_frame = false;
        self.finish_count += 1;
        Ok(())
    }
}

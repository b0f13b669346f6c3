use std::io::{Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use pocket_display::{DisplayResult, Panel};

/// Draws the simulated panel in the top-left corner of the host terminal,
/// framed by a border, with the status line under it.
pub(crate) struct CrosstermPanel {
    stdout: Stdout,
    cols: u16,
    rows: u16,
}

impl CrosstermPanel {
    pub(crate) fn new(cols: u16, rows: u16) -> Self {
        Self {
            stdout: std::io::stdout(),
            cols,
            rows,
        }
    }

    fn draw_frame(&mut self) -> DisplayResult<()> {
        let horizontal = "-".repeat(self.cols as usize);
        self.stdout
            .queue(MoveTo(0, 0))?
            .queue(Print(format!("+{}+", horizontal)))?;
        for row in 0..self.rows {
            self.stdout
                .queue(MoveTo(0, row + 1))?
                .queue(Print('|'))?
                .queue(MoveTo(self.cols + 1, row + 1))?
                .queue(Print('|'))?;
        }
        self.stdout
            .queue(MoveTo(0, self.rows + 1))?
            .queue(Print(format!("+{}+", horizontal)))?;
        Ok(())
    }
}

impl Panel for CrosstermPanel {
    fn size(&self) -> DisplayResult<(u16, u16)> {
        Ok((self.cols, self.rows))
    }

    fn begin_full(&mut self) -> DisplayResult<()> {
        self.stdout.queue(Clear(ClearType::All))?;
        self.draw_frame()
    }

    fn begin_partial(&mut self, _first_row: u16, _last_row: u16) -> DisplayResult<()> {
        Ok(())
    }

    fn draw_row(&mut self, row: u16, text: &[u8], cursor_col: Option<u16>) -> DisplayResult<()> {
        let width = self.cols as usize;
        let mut line: Vec<char> = text.iter().take(width).map(|&b| b as char).collect();
        line.resize(width, ' ');

        self.stdout.queue(MoveTo(1, row + 1))?;
        match cursor_col.map(usize::from).filter(|&c| c < width) {
            Some(col) => {
                let before: String = line[..col].iter().collect();
                let after: String = line[col + 1..].iter().collect();
                self.stdout
                    .queue(Print(before))?
                    .queue(SetAttribute(Attribute::Reverse))?
                    .queue(Print(line[col]))?
                    .queue(SetAttribute(Attribute::NoReverse))?
                    .queue(Print(after))?;
            }
            None => {
                self.stdout.queue(Print(line.iter().collect::<String>()))?;
            }
        }
        Ok(())
    }

    fn draw_status(&mut self, text: &str) -> DisplayResult<()> {
        let clipped: String = text.chars().take(self.cols as usize + 2).collect();
        self.stdout
            .queue(MoveTo(0, self.rows + 2))?
            .queue(Clear(ClearType::CurrentLine))?
            .queue(Print(clipped))?;
        Ok(())
    }

    fn finish(&mut self) -> DisplayResult<()> {
        self.stdout.flush()?;
        Ok(())
    }
}

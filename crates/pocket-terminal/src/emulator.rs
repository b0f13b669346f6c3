use crate::grid::GridDimensions;
use crate::parser::{TerminalEvent, VtParser};
use crate::screen::Screen;
use crate::snapshot::GridSnapshot;

/// The terminal emulation core: a parser driving a screen.
///
/// Feeding never fails; malformed input is absorbed or skipped.
#[derive(Debug, Clone)]
pub struct TerminalEmulator {
    screen: Screen,
    parser: VtParser,
}

impl Default for TerminalEmulator {
    fn default() -> Self {
        Self::new(GridDimensions::default())
    }
}

impl TerminalEmulator {
    pub fn new(dims: GridDimensions) -> Self {
        Self {
            screen: Screen::new(dims),
            parser: VtParser::new(),
        }
    }

    /// Process a chunk of remote output.
    ///
    /// The visible window is re-aligned to the cursor once per chunk.
    pub fn feed(&mut self, data: &[u8]) -> Vec<TerminalEvent> {
        let events = self.parser.process(data, &mut self.screen);
        self.screen.follow_cursor();
        events
    }

    /// Clear both grids and drop any partial sequence.
    pub fn reset(&mut self) {
        self.screen.reset();
        self.parser.reset();
        tracing::debug!("terminal reset");
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.screen.dimensions()
    }

    /// Copy of the visible window for rendering.
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::capture(&self.screen)
    }
}

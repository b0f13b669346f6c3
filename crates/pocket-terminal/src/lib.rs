pub mod csi;
pub mod emulator;
pub mod error;
pub mod grid;
pub mod parser;
pub mod screen;
pub mod session;
pub mod shared;
pub mod snapshot;
pub mod utf8;

pub use csi::CsiParams;
pub use emulator::TerminalEmulator;
pub use error::{TerminalError, TerminalResult};
pub use grid::{
    CharGrid, CursorPosition, GridDimensions, TerminalSize, DEFAULT_COLS, DEFAULT_HISTORY_ROWS,
    DEFAULT_SCREEN_ROWS,
};
pub use parser::{TerminalEvent, VtParser};
pub use screen::{ActiveScreen, Screen, ScrollRegion};
pub use session::{Channel, MockChannel, SessionState, TerminalSession};
pub use shared::SharedTerminal;
pub use snapshot::GridSnapshot;
pub use utf8::{ascii_substitute, Utf8Decoder, Utf8Step};

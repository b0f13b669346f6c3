use pocket_terminal::{
    CursorPosition, GridDimensions, MockChannel, SessionState, SharedTerminal, TerminalEmulator,
    TerminalSession,
};

// ── Helpers ─────────────────────────────────────────────────────

fn emulator(cols: u16, screen_rows: u16, history_rows: u16) -> TerminalEmulator {
    TerminalEmulator::new(GridDimensions::new(cols, screen_rows, history_rows))
}

fn all_rows(emu: &TerminalEmulator) -> Vec<String> {
    let rows = emu.screen().grid().row_count();
    (0..rows).map(|r| emu.screen().row_text(r)).collect()
}

fn padded(text: &str, cols: usize) -> String {
    format!("{:<width$}", text, width = cols)
}

// ── Reset ───────────────────────────────────────────────────────

#[test]
fn reset_is_idempotent_from_any_state() {
    let mut emu = emulator(10, 4, 8);
    emu.feed(b"garbage\n\n\x1b[2;3r\x1b[?25l\x1b[?1049hmore\x1b[12");
    emu.reset();
    let first = all_rows(&emu);
    emu.reset();
    assert_eq!(all_rows(&emu), first);

    let screen = emu.screen();
    assert!(first.iter().all(|r| r == &padded("", 10)));
    assert_eq!(screen.line_count(), 1);
    assert_eq!(screen.cursor(), CursorPosition::new(0, 0));
    assert!(screen.cursor_visible());
    assert!(!screen.is_alternate());
    assert!(!screen.scroll_region().explicit);
    assert_eq!(screen.scroll_region().bottom, 3);

    emu.feed(b"ok");
    assert_eq!(emu.screen().row_text(0), padded("ok", 10));
}

// ── Writing ─────────────────────────────────────────────────────

#[test]
fn printable_text_lands_on_row_zero() {
    let mut emu = emulator(21, 20, 100);
    emu.feed(b"pocket");
    assert_eq!(emu.screen().cursor(), CursorPosition::new(0, 6));
    assert_eq!(emu.screen().row_text(0), padded("pocket", 21));
}

#[test]
fn exactly_cols_bytes_wrap_to_next_row() {
    let mut emu = emulator(21, 20, 100);
    emu.feed(&[b'x'; 21]);
    assert_eq!(emu.screen().cursor(), CursorPosition::new(1, 0));
    assert_eq!(emu.screen().row_text(0), "x".repeat(21));
}

#[test]
fn crlf_scenario() {
    let mut emu = emulator(21, 20, 100);
    emu.feed(b"AB\r\nCD");
    assert_eq!(emu.screen().row_text(0), padded("AB", 21));
    assert_eq!(emu.screen().row_text(1), padded("CD", 21));
    assert_eq!(emu.screen().cursor(), CursorPosition::new(1, 2));
}

#[test]
fn clear_then_home_scenario() {
    let mut emu = emulator(21, 20, 100);
    emu.feed(b"first line\r\nsecond line");
    emu.feed(b"\x1b[2J\x1b[1;1HHI");
    let rows = all_rows(&emu);
    assert_eq!(rows[0], padded("HI", 21));
    assert!(rows[1..].iter().all(|r| r == &padded("", 21)));
    assert_eq!(emu.screen().cursor(), CursorPosition::new(0, 2));
}

// ── Clamping and unknown input ──────────────────────────────────

#[test]
fn cursor_position_clamps_to_grid() {
    let mut emu = emulator(80, 24, 24);
    emu.feed(b"\x1b[9999;9999H");
    assert_eq!(emu.screen().cursor(), CursorPosition::new(23, 79));
}

#[test]
fn unknown_sequence_with_many_params_is_consumed() {
    let mut emu = emulator(21, 20, 100);
    // The first 'z' ends the sequence; the two after it are plain text.
    emu.feed(b"\x1b[5;9;2;7;1;1;1;1;9;9;9zzz");
    assert_eq!(emu.screen().row_text(0), padded("zz", 21));
    assert_eq!(emu.screen().cursor(), CursorPosition::new(0, 2));
    assert!(all_rows(&emu)[1..].iter().all(|r| r == &padded("", 21)));
}

#[test]
fn unknown_sequence_leaves_existing_text_alone() {
    let mut emu = emulator(21, 20, 100);
    emu.feed(b"keep\r\n");
    let before = all_rows(&emu);
    let cursor = emu.screen().cursor();

    emu.feed(b"\x1b[5;9;2;7;1;1;1;1;9;9;9z");
    assert_eq!(all_rows(&emu), before);
    assert_eq!(emu.screen().cursor(), cursor);
}

#[test]
fn box_drawing_degrades_to_one_cell() {
    let mut emu = emulator(21, 20, 100);
    emu.feed("\u{2500}".as_bytes());
    assert_eq!(emu.screen().cursor(), CursorPosition::new(0, 1));
    assert_eq!(emu.screen().row_text(0), padded("-", 21));
}

#[test]
fn chunking_does_not_change_result() {
    let input = "top\r\n\x1b[1;33m\u{2502}bar\u{2502}\x1b[0m\r\n\x1b[3;2Hxy\x1b]0;t\x07\x1b[?1049h\x1b[?1049lz"
        .as_bytes();
    let mut whole = emulator(12, 5, 10);
    whole.feed(input);

    let mut split = emulator(12, 5, 10);
    for byte in input {
        split.feed(std::slice::from_ref(byte));
    }
    assert_eq!(all_rows(&whole), all_rows(&split));
    assert_eq!(whole.screen().cursor(), split.screen().cursor());
}

// ── Scroll region and alternate screen ──────────────────────────

#[test]
fn scroll_region_contains_scrolling() {
    let mut emu = emulator(8, 10, 10);
    for r in 0..10 {
        emu.feed(format!("\x1b[{};1Hrow{}", r + 1, r).as_bytes());
    }
    let before = all_rows(&emu);

    emu.feed(b"\x1b[3;6r\x1b[6;1H\nnew");
    let after = all_rows(&emu);

    assert_eq!(after[0..2], before[0..2]);
    assert_eq!(after[6..], before[6..]);
    assert_eq!(after[2], before[3]);
    assert_eq!(after[3], before[4]);
    assert_eq!(after[4], before[5]);
    assert_eq!(after[5], padded("new", 8));
}

#[test]
fn alternate_screen_round_trip() {
    let mut emu = emulator(21, 20, 100);
    emu.feed(b"$ vim notes.txt\r\nline two\r\n\x1b[5Gpartial");
    let before = all_rows(&emu);
    let cursor = emu.screen().cursor();
    let offset = emu.screen().scroll_offset();

    emu.feed(b"\x1b[?1049h\x1b[2J\x1b[Hediting\r\n~\r\n~\x1b[5;10r\x1b[20;1H\n\n");
    assert!(emu.screen().is_alternate());
    emu.feed(b"\x1b[?1049l");

    assert!(!emu.screen().is_alternate());
    assert_eq!(all_rows(&emu), before);
    assert_eq!(emu.screen().cursor(), cursor);
    assert_eq!(emu.screen().scroll_offset(), offset);
}

#[test]
fn main_log_scrolls_at_capacity() {
    let mut emu = emulator(6, 3, 5);
    for i in 0..8 {
        emu.feed(format!("l{}\r\n", i).as_bytes());
    }
    let snap = emu.snapshot();
    assert_eq!(emu.screen().cursor().row, 4);
    assert_eq!(snap.scroll_offset, 2);
    assert_eq!(snap.row_text(0), padded("l6", 6));
    assert_eq!(snap.row_text(1), padded("l7", 6));
    assert_eq!(snap.row_text(2), padded("", 6));
}

// ── Session ─────────────────────────────────────────────────────

#[test]
fn session_loss_blanks_screen_and_forces_full_refresh() {
    let terminal = SharedTerminal::new(GridDimensions::default());
    let mut session = TerminalSession::new(terminal.clone(), "vt100");
    let channel = MockChannel::new();
    session.connect(Box::new(channel.clone())).unwrap();
    terminal.take_full_refresh();

    channel.push_output(b"\x1b[31mremote\x1b[");
    session.pump().unwrap();
    assert!(terminal.take_render_request());
    assert!(!terminal.take_full_refresh());

    channel.hang_up();
    assert!(session.pump().is_err());
    assert_eq!(session.state(), SessionState::Disconnected);
    assert!(terminal.take_full_refresh());

    let snap = terminal.snapshot();
    assert!(snap.rows.iter().all(|r| r.iter().all(|&b| b == b' ')));
    assert_eq!(snap.cursor, CursorPosition::new(0, 0));
}

/// Errors raised by the session layer around the terminal emulator.
///
/// The emulator itself never fails: every byte sequence is a valid input.
#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    /// The remote side refused the pseudo-terminal request.
    #[error("pty request failed: {0}")]
    PtyRequest(String),

    /// Reading from or writing to the remote channel failed.
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The remote channel was closed.
    #[error("channel closed")]
    ChannelClosed,

    /// An operation needed a live session but none was connected.
    #[error("no session connected")]
    NotConnected,
}

/// Result type alias for session operations.
pub type TerminalResult<T> = Result<T, TerminalError>;

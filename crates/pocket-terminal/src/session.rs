use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{TerminalError, TerminalResult};
use crate::grid::TerminalSize;
use crate::parser::TerminalEvent;
use crate::shared::SharedTerminal;

/// Trait abstracting the remote byte stream (an SSH channel on the device,
/// a child process on the host) for testability.
pub trait Channel: std::fmt::Debug + Send {
    /// Ask the remote side for a pseudo-terminal of the given type and size.
    fn request_pty(&mut self, term_type: &str, size: TerminalSize) -> TerminalResult<()>;

    /// Send keystrokes to the remote side.
    fn write(&mut self, data: &[u8]) -> TerminalResult<()>;

    /// Read available remote output. Returns an empty vec if nothing is
    /// available yet.
    fn read(&mut self) -> TerminalResult<Vec<u8>>;

    /// Whether the remote side may still produce output.
    fn is_open(&self) -> bool;

    /// Close the channel.
    fn close(&mut self) -> TerminalResult<()>;
}

/// Connection state of a [`TerminalSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected,
}

/// Binds a [`Channel`] to a [`SharedTerminal`].
///
/// Connecting and disconnecting both reset the terminal, so a new session
/// always starts from a blank screen.
#[derive(Debug)]
pub struct TerminalSession {
    terminal: SharedTerminal,
    channel: Option<Box<dyn Channel>>,
    term_type: String,
}

impl TerminalSession {
    pub fn new(terminal: SharedTerminal, term_type: impl Into<String>) -> Self {
        Self {
            terminal,
            channel: None,
            term_type: term_type.into(),
        }
    }

    pub fn terminal(&self) -> &SharedTerminal {
        &self.terminal
    }

    pub fn state(&self) -> SessionState {
        if self.channel.is_some() {
            SessionState::Connected
        } else {
            SessionState::Disconnected
        }
    }

    /// Request a pty sized to the visible screen and start a fresh session.
    /// An existing session is closed first.
    pub fn connect(&mut self, mut channel: Box<dyn Channel>) -> TerminalResult<()> {
        if self.channel.is_some() {
            self.disconnect();
        }
        let size = self.terminal.dimensions().screen_size();
        channel.request_pty(&self.term_type, size)?;
        self.terminal.reset();
        self.channel = Some(channel);
        tracing::info!(
            term = %self.term_type,
            cols = size.cols,
            rows = size.rows,
            "session connected"
        );
        Ok(())
    }

    /// Move available remote output into the terminal.
    ///
    /// Returns the number of bytes fed. A read error or a closed channel
    /// ends the session.
    pub fn pump(&mut self) -> TerminalResult<usize> {
        let (read, open) = match self.channel.as_mut() {
            Some(channel) => {
                let read = channel.read();
                (read, channel.is_open())
            }
            None => return Err(TerminalError::NotConnected),
        };

        let data = match read {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("channel read failed: {}", e);
                self.disconnect();
                return Err(e);
            }
        };

        if data.is_empty() {
            if !open {
                self.disconnect();
                return Err(TerminalError::ChannelClosed);
            }
            return Ok(0);
        }

        for event in self.terminal.feed(&data) {
            if event == TerminalEvent::Bell {
                tracing::trace!("bell");
            }
        }
        Ok(data.len())
    }

    /// Forward keystrokes to the remote side.
    pub fn send(&mut self, data: &[u8]) -> TerminalResult<()> {
        let channel = self.channel.as_mut().ok_or(TerminalError::NotConnected)?;
        if let Err(e) = channel.write(data) {
            tracing::warn!("channel write failed: {}", e);
            self.disconnect();
            return Err(e);
        }
        Ok(())
    }

    /// Close the channel, if any, and blank the terminal.
    pub fn disconnect(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            if let Err(e) = channel.close() {
                tracing::warn!("channel close failed: {}", e);
            }
            tracing::info!("session disconnected");
        }
        self.terminal.reset();
    }
}

#[derive(Debug, Default)]
struct MockState {
    pending: VecDeque<Vec<u8>>,
    written: Vec<u8>,
    pty_requests: Vec<(String, TerminalSize)>,
    closed: bool,
    refuse_pty: bool,
}

/// An in-memory [`Channel`] for tests.
///
/// Clones share state, so a test can keep one handle while the session owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct MockChannel {
    state: Arc<Mutex<MockState>>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a chunk to be returned by a later read.
    pub fn push_output(&self, data: &[u8]) {
        self.state().pending.push_back(data.to_vec());
    }

    /// Everything written to the channel so far.
    pub fn written(&self) -> Vec<u8> {
        self.state().written.clone()
    }

    pub fn pty_requests(&self) -> Vec<(String, TerminalSize)> {
        self.state().pty_requests.clone()
    }

    /// Make the next pty request fail.
    pub fn refuse_pty(&self) {
        self.state().refuse_pty = true;
    }

    /// Simulate the remote side hanging up. Queued output is still readable.
    pub fn hang_up(&self) {
        self.state().closed = true;
    }
}

impl Channel for MockChannel {
    fn request_pty(&mut self, term_type: &str, size: TerminalSize) -> TerminalResult<()> {
        let mut state = self.state();
        if state.refuse_pty {
            return Err(TerminalError::PtyRequest("refused".to_string()));
        }
        state.pty_requests.push((term_type.to_string(), size));
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> TerminalResult<()> {
        let mut state = self.state();
        if state.closed {
            return Err(TerminalError::ChannelClosed);
        }
        state.written.extend_from_slice(data);
        Ok(())
    }

    fn read(&mut self) -> TerminalResult<Vec<u8>> {
        Ok(self.state().pending.pop_front().unwrap_or_default())
    }

    fn is_open(&self) -> bool {
        !self.state().closed
    }

    fn close(&mut self) -> TerminalResult<()> {
        self.state().closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridDimensions;

    fn session() -> (TerminalSession, MockChannel) {
        let terminal = SharedTerminal::new(GridDimensions::new(21, 20, 100));
        (TerminalSession::new(terminal, "vt100"), MockChannel::new())
    }

    #[test]
    fn connect_requests_pty_with_screen_size() {
        let (mut s, channel) = session();
        s.connect(Box::new(channel.clone())).unwrap();
        assert_eq!(s.state(), SessionState::Connected);
        assert_eq!(
            channel.pty_requests(),
            vec![("vt100".to_string(), TerminalSize::new(21, 20))]
        );
    }

    #[test]
    fn connect_refused_stays_disconnected() {
        let (mut s, channel) = session();
        channel.refuse_pty();
        let err = s.connect(Box::new(channel)).unwrap_err();
        assert!(matches!(err, TerminalError::PtyRequest(_)));
        assert_eq!(s.state(), SessionState::Disconnected);
    }

    #[test]
    fn pump_feeds_terminal() {
        let (mut s, channel) = session();
        s.connect(Box::new(channel.clone())).unwrap();
        channel.push_output(b"$ ls");
        assert_eq!(s.pump().unwrap(), 4);
        assert_eq!(&s.terminal().snapshot().row_text(0)[..4], "$ ls");
        assert_eq!(s.pump().unwrap(), 0);
    }

    #[test]
    fn pump_without_session_fails() {
        let (mut s, _) = session();
        assert!(matches!(s.pump(), Err(TerminalError::NotConnected)));
    }

    #[test]
    fn hang_up_disconnects_and_clears() {
        let (mut s, channel) = session();
        s.connect(Box::new(channel.clone())).unwrap();
        channel.push_output(b"bye");
        channel.hang_up();
        assert_eq!(s.pump().unwrap(), 3);
        assert!(matches!(s.pump(), Err(TerminalError::ChannelClosed)));
        assert_eq!(s.state(), SessionState::Disconnected);
        assert_eq!(s.terminal().snapshot().row_text(0).trim(), "");
    }

    #[test]
    fn send_forwards_keystrokes() {
        let (mut s, channel) = session();
        s.connect(Box::new(channel.clone())).unwrap();
        s.send(b"ls\r").unwrap();
        assert_eq!(channel.written(), b"ls\r");
    }

    #[test]
    fn send_failure_disconnects() {
        let (mut s, channel) = session();
        s.connect(Box::new(channel.clone())).unwrap();
        channel.hang_up();
        assert!(s.send(b"x").is_err());
        assert_eq!(s.state(), SessionState::Disconnected);
    }

    #[test]
    fn reconnect_starts_blank() {
        let (mut s, first) = session();
        s.connect(Box::new(first.clone())).unwrap();
        first.push_output(b"old");
        s.pump().unwrap();

        let second = MockChannel::new();
        s.connect(Box::new(second)).unwrap();
        assert!(!first.is_open());
        assert_eq!(s.terminal().snapshot().row_text(0).trim(), "");
    }
}

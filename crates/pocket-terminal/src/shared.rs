use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::emulator::TerminalEmulator;
use crate::grid::GridDimensions;
use crate::parser::TerminalEvent;
use crate::snapshot::GridSnapshot;

/// A terminal shared between the thread feeding remote output and the
/// thread drawing it.
///
/// The emulator sits behind a mutex held only for one feed or one snapshot.
/// The render-request and full-refresh flags are atomics so the drawing side
/// can poll them without locking.
#[derive(Debug, Clone)]
pub struct SharedTerminal {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    emulator: Mutex<TerminalEmulator>,
    dims: GridDimensions,
    render_requested: AtomicBool,
    full_refresh: AtomicBool,
}

impl SharedTerminal {
    pub fn new(dims: GridDimensions) -> Self {
        Self {
            inner: Arc::new(Inner {
                emulator: Mutex::new(TerminalEmulator::new(dims)),
                dims,
                render_requested: AtomicBool::new(false),
                full_refresh: AtomicBool::new(false),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TerminalEmulator> {
        self.inner.emulator.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("terminal lock poisoned, continuing with inner state");
            poisoned.into_inner()
        })
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.inner.dims
    }

    /// Feed remote output and flag a render. A full reset inside the chunk
    /// also flags a full refresh.
    pub fn feed(&self, data: &[u8]) -> Vec<TerminalEvent> {
        if data.is_empty() {
            return Vec::new();
        }
        let events = self.lock().feed(data);
        if events.contains(&TerminalEvent::Reset) {
            self.inner.full_refresh.store(true, Ordering::Release);
        }
        self.inner.render_requested.store(true, Ordering::Release);
        events
    }

    /// Reset the emulator and ask for a full redraw.
    pub fn reset(&self) {
        self.lock().reset();
        self.request_full_refresh();
    }

    pub fn snapshot(&self) -> GridSnapshot {
        self.lock().snapshot()
    }

    pub fn request_full_refresh(&self) {
        self.inner.full_refresh.store(true, Ordering::Release);
        self.inner.render_requested.store(true, Ordering::Release);
    }

    /// Consume the pending render request, if any.
    pub fn take_render_request(&self) -> bool {
        self.inner.render_requested.swap(false, Ordering::AcqRel)
    }

    /// Consume the pending full-refresh request, if any.
    pub fn take_full_refresh(&self) -> bool {
        self.inner.full_refresh.swap(false, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn feed_requests_render_once() {
        let term = SharedTerminal::new(GridDimensions::new(5, 2, 2));
        assert!(!term.take_render_request());
        term.feed(b"hi");
        assert!(term.take_render_request());
        assert!(!term.take_render_request());
    }

    #[test]
    fn empty_feed_requests_nothing() {
        let term = SharedTerminal::new(GridDimensions::new(5, 2, 2));
        assert!(term.feed(b"").is_empty());
        assert!(!term.take_render_request());
    }

    #[test]
    fn full_reset_requests_full_refresh() {
        let term = SharedTerminal::new(GridDimensions::new(5, 2, 2));
        term.feed(b"abc");
        assert!(!term.take_full_refresh());
        term.feed(b"\x1bc");
        assert!(term.take_full_refresh());
        assert!(!term.take_full_refresh());
    }

    #[test]
    fn reset_requests_full_refresh() {
        let term = SharedTerminal::new(GridDimensions::new(5, 2, 2));
        term.feed(b"abc");
        term.take_render_request();
        term.reset();
        assert!(term.take_render_request());
        assert!(term.take_full_refresh());
        assert_eq!(term.snapshot().row_text(0), "     ");
    }

    #[test]
    fn clones_share_state_across_threads() {
        let term = SharedTerminal::new(GridDimensions::new(8, 2, 2));
        let writer = term.clone();
        let handle = thread::spawn(move || {
            writer.feed(b"threaded");
        });
        handle.join().unwrap();
        assert_eq!(term.snapshot().row_text(0), "threaded");
        assert!(term.take_render_request());
    }
}

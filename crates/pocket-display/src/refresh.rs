use std::time::{Duration, Instant};

use pocket_terminal::GridSnapshot;

/// Partial refreshes allowed before a clean full refresh clears ghosting.
pub const DEFAULT_FULL_REFRESH_EVERY: u32 = 30;
/// Minimum spacing between frames so bursts of output share one refresh.
pub const DEFAULT_MIN_RENDER_INTERVAL: Duration = Duration::from_millis(100);

/// What the next frame has to repaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPlan {
    /// Nothing visible changed.
    Skip,
    /// Clean refresh of every row.
    Full,
    /// Partial refresh of window rows `first_row..=last_row`.
    Partial { first_row: u16, last_row: u16 },
}

/// Decides between full, partial, and no refresh by diffing successive
/// snapshots.
#[derive(Debug)]
pub struct RefreshPlanner {
    full_refresh_every: u32,
    partial_count: u32,
    force_full: bool,
    previous: Option<GridSnapshot>,
}

impl Default for RefreshPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_FULL_REFRESH_EVERY)
    }
}

impl RefreshPlanner {
    pub fn new(full_refresh_every: u32) -> Self {
        Self {
            full_refresh_every: full_refresh_every.max(1),
            partial_count: 0,
            force_full: true,
            previous: None,
        }
    }

    /// Make the next plan a full refresh regardless of content.
    pub fn force_full(&mut self) {
        self.force_full = true;
    }

    pub fn partial_count(&self) -> u32 {
        self.partial_count
    }

    /// Plan the frame for `snapshot` and remember it for the next diff.
    pub fn plan(&mut self, snapshot: &GridSnapshot) -> RefreshPlan {
        let plan = match self.diff(snapshot) {
            RefreshPlan::Skip => return RefreshPlan::Skip,
            RefreshPlan::Partial { .. } if self.partial_count >= self.full_refresh_every => {
                RefreshPlan::Full
            }
            plan => plan,
        };

        match plan {
            RefreshPlan::Full => {
                self.partial_count = 0;
                self.force_full = false;
            }
            _ => self.partial_count += 1,
        }
        self.previous = Some(snapshot.clone());
        plan
    }

    fn diff(&self, snapshot: &GridSnapshot) -> RefreshPlan {
        let Some(prev) = self.previous.as_ref() else {
            return RefreshPlan::Full;
        };
        if self.force_full
            || prev.alternate != snapshot.alternate
            || prev.rows.len() != snapshot.rows.len()
        {
            return RefreshPlan::Full;
        }

        let last_row = snapshot.visible_rows().saturating_sub(1);
        if prev.scroll_offset != snapshot.scroll_offset {
            return RefreshPlan::Partial {
                first_row: 0,
                last_row,
            };
        }

        let mut changed = prev
            .rows
            .iter()
            .zip(&snapshot.rows)
            .enumerate()
            .filter(|(_, (old, new))| old != new)
            .map(|(i, _)| i as u16)
            .collect::<Vec<_>>();

        let old_cursor = prev.cursor_in_window();
        let new_cursor = snapshot.cursor_in_window();
        if old_cursor != new_cursor {
            changed.extend(old_cursor.map(|c| c.row));
            changed.extend(new_cursor.map(|c| c.row));
        }

        match (changed.iter().min(), changed.iter().max()) {
            (Some(&first_row), Some(&last_row)) => RefreshPlan::Partial {
                first_row,
                last_row,
            },
            _ => RefreshPlan::Skip,
        }
    }
}

/// Enforces a minimum interval between rendered frames.
#[derive(Debug, Clone)]
pub struct RenderThrottle {
    interval: Duration,
    last_frame: Option<Instant>,
}

impl Default for RenderThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_RENDER_INTERVAL)
    }
}

impl RenderThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_frame: None,
        }
    }

    /// Whether a frame may be drawn at `now`.
    pub fn ready(&self, now: Instant) -> bool {
        self.time_until_ready(now).is_zero()
    }

    /// How long to wait before the next frame is allowed.
    pub fn time_until_ready(&self, now: Instant) -> Duration {
        match self.last_frame {
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    pub fn mark_rendered(&mut self, now: Instant) {
        self.last_frame = Some(now);
    }
}

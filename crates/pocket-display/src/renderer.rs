use pocket_terminal::GridSnapshot;

use crate::error::{DisplayError, DisplayResult};
use crate::panel::Panel;
use crate::refresh::{RefreshPlan, RefreshPlanner};

/// Paints snapshots onto a [`Panel`], repainting only what the planner asks
/// for.
#[derive(Debug)]
pub struct Renderer {
    planner: RefreshPlanner,
    show_status: bool,
}

impl Renderer {
    pub fn new(planner: RefreshPlanner, show_status: bool) -> Self {
        Self {
            planner,
            show_status,
        }
    }

    /// Make the next frame a clean full refresh.
    pub fn force_full(&mut self) {
        self.planner.force_full();
    }

    /// Draw one frame and return the plan that was carried out.
    pub fn render<P: Panel + ?Sized>(
        &mut self,
        panel: &mut P,
        snapshot: &GridSnapshot,
        status: &str,
    ) -> DisplayResult<RefreshPlan> {
        let (cols, rows) = panel.size()?;
        if snapshot.cols > cols || snapshot.visible_rows() > rows {
            return Err(DisplayError::Render(format!(
                "{}x{} grid does not fit a {}x{} panel",
                snapshot.cols,
                snapshot.visible_rows(),
                cols,
                rows
            )));
        }

        let plan = self.planner.plan(snapshot);
        let (first_row, last_row) = match plan {
            RefreshPlan::Skip => return Ok(plan),
            RefreshPlan::Full => {
                panel.begin_full()?;
                (0, snapshot.visible_rows().saturating_sub(1))
            }
            RefreshPlan::Partial {
                first_row,
                last_row,
            } => {
                panel.begin_partial(first_row, last_row)?;
                (first_row, last_row)
            }
        };

        let cursor = snapshot.cursor_in_window();
        for row in first_row..=last_row {
            let text = snapshot.row(row).unwrap_or_default();
            let cursor_col = cursor.filter(|c| c.row == row).map(|c| c.col);
            panel.draw_row(row, text, cursor_col)?;
        }
        if self.show_status {
            panel.draw_status(status)?;
        }
        panel.finish()?;

        tracing::trace!(?plan, "frame rendered");
        Ok(plan)
    }
}

/// Status bar text: a label, the cursor line against the line count, and a
/// marker while the alternate screen is active. Clipped to the panel width.
pub fn status_line(label: &str, snapshot: &GridSnapshot) -> String {
    let mut text = format!(
        "{} {}/{}",
        label,
        snapshot.cursor.row + 1,
        snapshot.line_count
    );
    if snapshot.alternate {
        text.push_str(" ALT");
    }
    text.chars().take(snapshot.cols as usize).collect()
}

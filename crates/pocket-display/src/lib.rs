pub mod error;
pub mod panel;
pub mod refresh;
pub mod renderer;

pub use error::{DisplayError, DisplayResult};
pub use panel::{MockPanel, Panel, PanelRefresh};
pub use refresh::{
    RefreshPlan, RefreshPlanner, RenderThrottle, DEFAULT_FULL_REFRESH_EVERY,
    DEFAULT_MIN_RENDER_INTERVAL,
};
pub use renderer::{status_line, Renderer};

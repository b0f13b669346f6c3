use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Log verbosity level.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Character grid geometry and the terminal type announced to the remote
/// side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// Characters per row.
    #[serde(default = "default_cols")]
    pub cols: u16,
    /// Visible rows, also the height of the alternate screen.
    #[serde(default = "default_screen_rows")]
    pub screen_rows: u16,
    /// Rows kept on the main screen including the visible ones.
    #[serde(default = "default_history_rows")]
    pub history_rows: u16,
    /// Value sent in the pty request.
    #[serde(default = "default_term_type")]
    pub term_type: String,
}

fn default_cols() -> u16 {
    21
}
fn default_screen_rows() -> u16 {
    20
}
fn default_history_rows() -> u16 {
    100
}
fn default_term_type() -> String {
    "vt100".to_string()
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            cols: default_cols(),
            screen_rows: default_screen_rows(),
            history_rows: default_history_rows(),
            term_type: default_term_type(),
        }
    }
}

/// Refresh policy of the display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Partial refreshes between two clean full refreshes.
    #[serde(default = "default_full_refresh_every")]
    pub full_refresh_every: u32,
    /// Minimum time between frames.
    #[serde(default = "default_min_render_interval_ms")]
    pub min_render_interval_ms: u64,
    /// Draw the status line under the grid.
    #[serde(default = "default_true")]
    pub status: bool,
}

fn default_full_refresh_every() -> u32 {
    30
}
fn default_min_render_interval_ms() -> u64 {
    100
}
fn default_true() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            full_refresh_every: default_full_refresh_every(),
            min_render_interval_ms: default_min_render_interval_ms(),
            status: true,
        }
    }
}

/// The remote program the simulator connects to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default = "default_args")]
    pub args: Vec<String>,
}

fn default_command() -> String {
    "/bin/sh".to_string()
}
fn default_args() -> Vec<String> {
    vec!["-i".to_string()]
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: default_args(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub level: LogLevel,
    /// Log file; the platform data directory is used when unset.
    pub file: Option<PathBuf>,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub terminal: TerminalConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub log: LogConfig,
}

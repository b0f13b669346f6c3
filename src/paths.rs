use std::path::{Path, PathBuf};

/// Standard directories of the simulator under the user's home.
#[derive(Debug, Clone)]
pub struct AppPaths {
    home: PathBuf,
}

impl AppPaths {
    /// Resolve the home directory, falling back to `$HOME`.
    pub fn detect() -> Option<Self> {
        dirs::home_dir()
            .or_else(|| std::env::var_os("HOME").map(PathBuf::from))
            .map(Self::with_home)
    }

    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// `~/.config/pocket`
    pub fn config_dir(&self) -> PathBuf {
        self.home.join(".config").join("pocket")
    }

    /// `~/.local/share/pocket/logs`
    pub fn log_dir(&self) -> PathBuf {
        self.home
            .join(".local")
            .join("share")
            .join("pocket")
            .join("logs")
    }

    pub fn default_log_file(&self) -> PathBuf {
        self.log_dir().join("pocket.log")
    }
}

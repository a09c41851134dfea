//! XDG Base Directory Support
//!
//! Resolves where Strata keeps its configuration file and its index
//! generations on Linux/Unix systems.

use std::env;
use std::fs;
use std::path::PathBuf;

/// XDG directory structure for Strata
#[derive(Debug, Clone)]
pub struct XdgDirs {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub state_dir: PathBuf,
}

impl XdgDirs {
    /// Create new XDG directory structure with proper resolution order
    ///
    /// Priority order (highest to lowest):
    /// 1. Explicit STRATA_* env vars
    /// 2. XDG_* environment variables
    /// 3. XDG defaults (~/.config, ~/.local/share, ~/.local/state)
    pub fn new() -> Self {
        Self {
            config_dir: resolve("STRATA_CONFIG_DIR", "XDG_CONFIG_HOME", &[".config"]),
            data_dir: resolve("STRATA_DATA_DIR", "XDG_DATA_HOME", &[".local", "share"]),
            state_dir: resolve("STRATA_STATE_DIR", "XDG_STATE_HOME", &[".local", "state"]),
        }
    }

    /// Get config file path
    pub fn config_file(&self) -> PathBuf {
        if let Ok(file) = env::var("STRATA_CONFIG_FILE") {
            return PathBuf::from(file);
        }

        self.config_dir.join("config.toml")
    }

    /// Directory holding all index generations
    pub fn generations_dir(&self) -> PathBuf {
        self.data_dir.join("generations")
    }

    /// Get logs directory path
    pub fn logs_dir(&self) -> PathBuf {
        self.state_dir.join("logs")
    }

    /// Create all XDG directories if they don't exist
    pub fn ensure_dirs_exist(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.config_dir)?;
        fs::create_dir_all(self.generations_dir())?;
        fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }

    /// Log resolved paths
    pub fn log_paths(&self) {
        tracing::info!("XDG config dir: {:?}", self.config_dir);
        tracing::info!("XDG data dir: {:?}", self.data_dir);
        tracing::info!("XDG state dir: {:?}", self.state_dir);
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve(explicit_var: &str, xdg_var: &str, fallback: &[&str]) -> PathBuf {
    if let Ok(dir) = env::var(explicit_var) {
        return PathBuf::from(dir);
    }

    if let Ok(xdg) = env::var(xdg_var) {
        return PathBuf::from(xdg).join("strata");
    }

    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    for segment in fallback {
        path.push(segment);
    }
    path.join("strata")
}

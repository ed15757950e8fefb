//! XDG-compliant log directory management
//!
//! Logs are stored in `$XDG_STATE_HOME/fresh-repl/logs/` (typically
//! `~/.local/state/fresh-repl/logs/`). Each process writes its own
//! PID-based log file so concurrent runs never share one.

use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

const APP_DIR: &str = "fresh-repl";

static LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Get the base log directory, creating it if necessary.
///
/// Falls back to the system temp directory when the XDG directory cannot be
/// determined or created.
pub fn log_dir() -> &'static PathBuf {
    LOG_DIR.get_or_init(|| {
        let fallback = || std::env::temp_dir().join("fresh-repl-logs");
        let dir = xdg_log_dir().unwrap_or_else(fallback);

        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!("Failed to create log directory {:?}: {}", dir, e);
            return fallback();
        }

        dir
    })
}

fn xdg_log_dir() -> Option<PathBuf> {
    if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
        let path = PathBuf::from(state_home);
        if path.is_absolute() {
            return Some(path.join(APP_DIR).join("logs"));
        }
    }

    home_dir().map(|home| home.join(".local").join("state").join(APP_DIR).join("logs"))
}

fn home_dir() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }

    #[cfg(windows)]
    if let Ok(profile) = std::env::var("USERPROFILE") {
        return Some(PathBuf::from(profile));
    }

    None
}

/// Path of the main log file for this process.
///
/// Returns `{log_dir}/fresh-repl-{PID}.log`
pub fn main_log_path() -> PathBuf {
    log_dir().join(format!("{}-{}.log", APP_DIR, std::process::id()))
}

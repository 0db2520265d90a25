//! Shared configuration locations.
//!
//! All state lives under one directory, `~/.deploy-notify/` by default:
//!
//! ```text
//! ~/.deploy-notify/
//! ├── .env          # Optional environment overrides (bot token, chat id)
//! ├── sites/        # Site records with their notification settings
//! └── deployments/  # Deployment records, grouped by site
//! ```
//!
//! # Environment Variables
//!
//! - `DEPLOY_NOTIFY_STATE_DIR`: Override the base state directory

use std::path::{Path, PathBuf};

use tracing::debug;

/// Environment variable for a custom state directory.
pub const STATE_DIR_ENV: &str = "DEPLOY_NOTIFY_STATE_DIR";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".deploy-notify";

/// Get the state directory.
///
/// Resolved from:
/// 1. `DEPLOY_NOTIFY_STATE_DIR` if set
/// 2. `~/.deploy-notify` if a home directory is available
/// 3. `.deploy-notify` in the current directory
pub fn state_dir() -> PathBuf {
    std::env::var(STATE_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(DEFAULT_STATE_DIR))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
        })
}

/// Path of the `.env` file inside a state directory.
pub fn env_file(state_dir: &Path) -> PathBuf {
    state_dir.join(".env")
}

/// Creates the state directory if needed and returns it.
pub fn ensure_state_dir() -> std::io::Result<PathBuf> {
    let dir = state_dir();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Loads environment overrides.
///
/// The state directory's `.env` is read first, then `.env` in the working
/// directory. Variables already set in the process are never overwritten.
pub fn load_env() {
    let path = env_file(&state_dir());
    if path.exists() {
        match dotenvy::from_path(&path) {
            Ok(()) => debug!(path = %path.display(), "Loaded environment file"),
            Err(e) => debug!(path = %path.display(), error = %e, "Could not load environment file"),
        }
    }
    let _ = dotenvy::dotenv();
}

pub mod config;
pub mod store;

pub use config::ModeConfig;
pub use store::StateStore;

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/sabbathlock[-dev]/` based on SABBATHLOCK_ENV.
///
/// Set SABBATHLOCK_ENV=dev to use a separate development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SABBATHLOCK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("sabbathlock-dev")
    } else {
        base_dir.join("sabbathlock")
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDir(e.to_string()))?;
    Ok(dir)
}

mod config;

pub use config::{Config, TimerConfig, UiConfig};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the settings directory, creating it if needed.
///
/// `TOMATO_CONFIG_DIR` wins when set. Otherwise `~/.config/tomato[-dev]/`,
/// with the `-dev` suffix when `TOMATO_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("TOMATO_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("TOMATO_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("tomato-dev")
            } else {
                base_dir.join("tomato")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

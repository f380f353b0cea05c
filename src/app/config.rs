//! Configuration loading from disk.

use std::path::{Path, PathBuf};

use crate::domain::config::parse_config_content;
use crate::domain::{AppError, GuidiaConfig};

pub const DEFAULT_CONFIG_FILE: &str = "guidia.toml";

/// Load `guidia.toml`.
///
/// An explicit path must exist. Without one, `guidia.toml` in the working
/// directory is used when present and defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<GuidiaConfig, AppError> {
    let path: PathBuf = match path {
        Some(path) => {
            if !path.is_file() {
                return Err(AppError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.is_file() {
                return Ok(GuidiaConfig::default());
            }
            default
        }
    };

    let content = std::fs::read_to_string(&path)?;
    parse_config_content(&content)
}

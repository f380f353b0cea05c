//! Pure parse/validate for `guidia.toml`.

use crate::domain::AppError;

use super::GuidiaConfig;

/// Parse and validate configuration from TOML content.
pub fn parse_config_content(content: &str) -> Result<GuidiaConfig, AppError> {
    let config: GuidiaConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::domain::AppError;
use crate::domain::prompt_assembly::InstructionSettings;

/// Application configuration (`guidia.toml`). Every key has a default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuidiaConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl GuidiaConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        self.server.validate()?;
        self.gateway.validate()?;
        self.export.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address the web server listens on.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Sessions with no request for this long are dropped.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind(), session_idle_secs: default_session_idle_secs() }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        self.bind
            .parse()
            .map_err(|e| AppError::config_error(format!("Invalid server.bind '{}': {}", self.bind, e)))
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.session_idle_secs == 0 {
            return Err(AppError::config_error("server.session_idle_secs must be greater than 0"));
        }
        self.socket_addr().map(|_| ())
    }
}

/// Text-generation endpoint settings. The API key is read from the
/// environment variable named by `api_key_env`, never from this file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Base URL of the Generative Language API.
    #[serde(default = "default_api_url")]
    pub api_url: Url,
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Total attempts per generation, including the single retry.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the retry in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.timeout_secs == 0 {
            return Err(AppError::config_error("gateway.timeout_secs must be greater than 0"));
        }
        if !(1..=2).contains(&self.max_attempts) {
            return Err(AppError::config_error("gateway.max_attempts must be 1 or 2"));
        }
        if self.model.trim().is_empty() {
            return Err(AppError::config_error("gateway.model must not be empty"));
        }
        if self.api_key_env.trim().is_empty() {
            return Err(AppError::config_error("gateway.api_key_env must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssistantConfig {
    #[serde(default = "default_persona")]
    pub persona: String,
    #[serde(default = "default_region")]
    pub region: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self { persona: default_persona(), region: default_region() }
    }
}

impl AssistantConfig {
    pub fn instruction_settings(&self) -> InstructionSettings {
        InstructionSettings { persona: self.persona.clone(), region: self.region.clone() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// File name stem for downloaded documents.
    #[serde(default = "default_base_name")]
    pub base_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { base_name: default_base_name() }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<(), AppError> {
        let name = self.base_name.trim();
        if name.is_empty() || name.contains(['/', '\\', '"']) {
            return Err(AppError::config_error(
                "export.base_name must be a non-empty file name without separators or quotes",
            ));
        }
        Ok(())
    }
}

fn default_bind() -> String {
    "127.0.0.1:8050".to_string()
}

fn default_session_idle_secs() -> u64 {
    30 * 60
}

fn default_api_url() -> Url {
    Url::parse("https://generativelanguage.googleapis.com/v1beta")
        .expect("Default API URL must be valid")
}

fn default_model() -> String {
    "gemini-pro-latest".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_max_attempts() -> u32 {
    2
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

fn default_persona() -> String {
    "Guidia".to_string()
}

fn default_region() -> String {
    "Mendoza".to_string()
}

fn default_base_name() -> String {
    "guidia-plan".to_string()
}

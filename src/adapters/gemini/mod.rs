//! Text generation backed by the Generative Language API.

mod client_http;
mod retrying;

use std::sync::Arc;

use crate::domain::GenerationError;
use crate::domain::config::GatewayConfig;
use crate::ports::{TextGenerator, TextGeneratorFactory};

pub use client_http::HttpGeminiClient;
pub(crate) use retrying::format_error_for_log;
pub use retrying::{RetryPolicy, RetryingTextGenerator};

/// Reads the API key from the environment each time a generator is built.
///
/// Build generators off the async runtime: the blocking HTTP client must be
/// created and dropped on a blocking thread.
#[derive(Debug, Clone)]
pub struct EnvTextGeneratorFactory {
    config: GatewayConfig,
}

impl EnvTextGeneratorFactory {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }
}

impl TextGeneratorFactory for EnvTextGeneratorFactory {
    fn create(&self) -> Result<Arc<dyn TextGenerator>, GenerationError> {
        let variable = &self.config.api_key_env;
        let api_key = std::env::var(variable)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| GenerationError::GenerationGatewayUnconfigured(variable.clone()))?;

        let client = HttpGeminiClient::new(api_key, &self.config)?;
        let policy = RetryPolicy::from_config(&self.config);
        Ok(Arc::new(RetryingTextGenerator::new(Box::new(client), policy)))
    }
}

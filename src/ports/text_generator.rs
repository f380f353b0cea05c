//! Text generation port definition.

use std::sync::Arc;

use crate::domain::GenerationError;

/// Opaque `instruction -> text` capability.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, instruction: &str) -> Result<String, GenerationError>;
}

/// Builds a generator on demand so a missing key only affects generation.
pub trait TextGeneratorFactory: Send + Sync {
    fn create(&self) -> Result<Arc<dyn TextGenerator>, GenerationError>;
}

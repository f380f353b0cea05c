use thiserror::Error;

use crate::domain::error::ValidationError;

/// Error while turning a generation request into an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptAssemblyError {
    /// A required form field is missing.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The embedded instruction template was not found.
    #[error("Instruction template not found: {0}")]
    TemplateNotFound(String),

    /// Failed to render a template with the provided fields.
    #[error("Failed to render template {template}: {reason}")]
    TemplateRender { template: String, reason: String },
}

use std::time::Instant;

use serde::Serialize;
use tracing::{error, info};

use crate::adapters::gemini::format_error_for_log;
use crate::adapters::markdown::render_html;
use crate::app::AppContext;
use crate::domain::context_selector::{self, ContextOptions};
use crate::domain::document::normalize_bullets;
use crate::domain::{
    AppError, AssistantForm, GenerationError, InstitutionId, Level, Profile, SessionId,
    ValidationError, assemble_instruction,
};
use crate::ports::TextGeneratorFactory;

/// Generated text, normalized, with its HTML rendering. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedDocument {
    pub markdown: String,
    pub html: String,
}

impl GeneratedDocument {
    pub fn from_generated(text: &str) -> Self {
        let markdown = normalize_bullets(text);
        let html = render_html(&markdown);
        Self { markdown, html }
    }
}

fn require_profile(ctx: &AppContext, session: &SessionId) -> Result<Profile, AppError> {
    ctx.sessions().get(session)?.profile.ok_or(ValidationError::ProfileMissing.into())
}

pub fn context_options(
    ctx: &AppContext,
    session: &SessionId,
    institution: &InstitutionId,
    level: Option<Level>,
) -> Result<ContextOptions, AppError> {
    let profile = require_profile(ctx, session)?;
    Ok(context_selector::context_options(&profile, institution, level)?)
}

/// Resolve the form against the session profile and assemble the instruction.
pub fn prepare_instruction(
    ctx: &AppContext,
    session: &SessionId,
    form: &AssistantForm,
) -> Result<String, AppError> {
    let profile = require_profile(ctx, session)?;
    let request = form.to_request(&profile)?;
    Ok(assemble_instruction(&request, ctx.settings())?)
}

/// Send an instruction to the generator. Blocks for the whole call, retries included.
pub fn generate(
    generators: &dyn TextGeneratorFactory,
    instruction: &str,
) -> Result<GeneratedDocument, AppError> {
    if instruction.trim().is_empty() {
        return Err(GenerationError::EmptyInstruction.into());
    }

    let generator = generators.create()?;
    let started = Instant::now();
    match generator.generate(instruction) {
        Ok(text) => {
            info!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                chars = text.chars().count(),
                "generation completed"
            );
            Ok(GeneratedDocument::from_generated(&text))
        }
        Err(err) => {
            error!(error = %format_error_for_log(&err), "generation failed");
            Err(err.into())
        }
    }
}

use serde::{Deserialize, Serialize};

use super::context_selector::resolve_context;
use super::error::ValidationError;
use super::mode::{AssistantForm, Mode, ModeFields};
use super::profile::{Level, Profile, SchoolContext};

/// Where the generated material will be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationContext {
    pub institution_name: String,
    pub level: Option<Level>,
    pub context_tag: SchoolContext,
}

/// Input of one "Generate" action. Built fresh each time, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub teacher_name: String,
    pub context: GenerationContext,
    pub task: ModeFields,
}

impl GenerationRequest {
    pub fn mode(&self) -> Mode {
        self.task.mode()
    }
}

impl AssistantForm {
    /// Resolve the form against the session profile into a request for the active mode.
    pub fn to_request(&self, profile: &Profile) -> Result<GenerationRequest, ValidationError> {
        let context = resolve_context(profile, self.institution.as_ref(), self.level)?;
        Ok(GenerationRequest {
            teacher_name: profile.teacher_name.clone(),
            context,
            task: self.active_fields(),
        })
    }
}

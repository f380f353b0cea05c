pub mod config;
pub mod context_selector;
pub mod document;
pub mod error;
pub mod feedback;
pub mod generation;
pub mod mode;
pub mod profile;
pub mod prompt_assembly;
pub mod route;
pub mod session;

pub use config::GuidiaConfig;
pub use document::{ExportLayout, ExportedDocument};
pub use error::{AppError, AuthError, ExportError, GenerationError, RequiredField, ValidationError};
pub use generation::{GenerationContext, GenerationRequest};
pub use mode::{AssistantForm, Mode, ModeFields};
pub use profile::{Institution, InstitutionId, Level, Profile, ProfileForm, SchoolContext};
pub use prompt_assembly::{InstructionSettings, PromptAssemblyError, assemble_instruction};
pub use route::Route;
pub use session::{SessionId, SessionState};

use std::fmt;
use std::io;

use thiserror::Error;

use super::prompt_assembly::PromptAssemblyError;

/// Form field whose absence blocks an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Institution,
    Subject,
    GradeOrYear,
    PlanType,
    /// Document pasted for analysis.
    DocumentToAnalyze,
    /// Daily activity pasted for adaptation.
    ActivityToAdapt,
}

impl RequiredField {
    pub fn label(&self) -> &'static str {
        match self {
            RequiredField::Institution => "institution",
            RequiredField::Subject => "subject",
            RequiredField::GradeOrYear => "grade or year",
            RequiredField::PlanType => "plan type",
            RequiredField::DocumentToAnalyze => "document to analyze",
            RequiredField::ActivityToAdapt => "activity to adapt",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// User input that cannot be accepted. Always recoverable by correcting the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name and surname are required")]
    MissingIdentity,

    #[error("At least one institution is required")]
    NoInstitutions,

    /// Zero-based row index; the message counts from one like the form does.
    #[error("Please fill in the name of institution #{}", .0 + 1)]
    MissingInstitutionName(usize),

    #[error("Missing required field: {0}")]
    MissingField(RequiredField),

    #[error("Profile not found. Save your profile before using the assistant")]
    ProfileMissing,

    #[error("Institution '{0}' is not part of your profile")]
    UnknownInstitution(String),

    #[error("Level '{level}' is not taught at '{institution}'")]
    LevelNotOffered { level: String, institution: String },

    #[error("Unknown value '{value}' for {field}")]
    UnknownValue { field: &'static str, value: String },

    #[error("Feedback message must not be empty")]
    EmptyFeedback,

    #[error("Rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
}

/// Failures of the single-account demo gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("All fields are required")]
    MissingFields,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("No account is registered yet. Please register first")]
    NoRegisteredAccount,

    #[error("Incorrect email or password")]
    InvalidCredentials,
}

/// Failures of the text-generation capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Remote failure. `status` is `None` for transport errors and timeouts.
    #[error("Generation service unavailable: {message}")]
    GenerationUnavailable { message: String, status: Option<u16> },

    #[error("Generation service is not configured: {0} is not set")]
    GenerationGatewayUnconfigured(String),

    #[error("A generation request is already running for this session")]
    GenerationInProgress,

    #[error("Refusing to send an empty instruction")]
    EmptyInstruction,
}

impl GenerationError {
    pub fn unavailable<S: Into<String>>(message: S, status: Option<u16>) -> Self {
        GenerationError::GenerationUnavailable { message: message.into(), status }
    }

    /// Transport failures, timeouts, 408, 429 and 5xx are worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            GenerationError::GenerationUnavailable { status: None, .. } => true,
            GenerationError::GenerationUnavailable { status: Some(code), .. } => {
                *code == 408 || *code == 429 || *code >= 500
            }
            _ => false,
        }
    }
}

/// Markdown that could not be laid out as a structured document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("Export failed: malformed table at line {line}: {reason}")]
    MalformedTable { line: usize, reason: String },

    #[error("Export failed: nothing to export")]
    EmptyDocument,

    #[error("Export failed: {0}")]
    ExportFailure(String),
}

/// Library-wide error type for guidia operations.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Export(#[from] ExportError),

    /// Template failure while assembling an instruction.
    #[error(transparent)]
    PromptAssembly(PromptAssemblyError),

    /// A protected API was called without signing in.
    #[error("Sign in to continue")]
    Unauthenticated,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Failed to render page {page}: {reason}")]
    PageRender { page: String, reason: String },

    #[error("Failed to parse {what}: {details}")]
    ParseError { what: String, details: String },

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

impl From<PromptAssemblyError> for AppError {
    fn from(err: PromptAssemblyError) -> Self {
        match err {
            PromptAssemblyError::Validation(inner) => AppError::Validation(inner),
            other => AppError::PromptAssembly(other),
        }
    }
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }
}

//! guidia: inclusive lesson-planning assistant. Session-scoped teacher
//! profiles, mode-conditioned instruction assembly, and Markdown/PDF export.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

use std::path::Path;

use adapters::PdfExporter;
use app::{AppContext, commands};

pub use app::commands::assistant::GeneratedDocument;
pub use app::web::SESSION_COOKIE;
pub use domain::{AppError, ExportedDocument, GenerationRequest, GuidiaConfig};

/// Build the web application with production adapters.
pub fn router(config: &GuidiaConfig) -> Result<axum::Router, AppError> {
    Ok(app::web::router(AppContext::from_config(config)?))
}

/// Build the web application around an existing context.
pub fn router_with(ctx: AppContext) -> axum::Router {
    app::web::router(ctx)
}

/// Assemble the instruction for a request stored as JSON. No network access.
pub fn assemble_prompt(request: &Path, config: &GuidiaConfig) -> Result<String, AppError> {
    commands::prompt::assemble_from_file(request, &config.assistant.instruction_settings())
}

/// Export Markdown to PDF, falling back to plain text when tables are malformed.
pub fn export_markdown(markdown: &str, config: &GuidiaConfig) -> Result<ExportedDocument, AppError> {
    commands::export::export_document(&PdfExporter::default(), &config.export, markdown)
}

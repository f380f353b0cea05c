use tracing::{info, warn};

use crate::domain::config::ExportConfig;
use crate::domain::document::PDF_CONTENT_TYPE;
use crate::domain::{AppError, ExportError, ExportLayout, ExportedDocument};
use crate::ports::DocumentExporter;

/// Export Markdown as PDF, falling back to a plain-text layout when the
/// structured one fails. Only empty input is refused.
pub fn export_document(
    exporter: &dyn DocumentExporter,
    config: &ExportConfig,
    markdown: &str,
) -> Result<ExportedDocument, AppError> {
    if markdown.trim().is_empty() {
        return Err(ExportError::EmptyDocument.into());
    }

    let (layout, bytes) = match exporter.export_structured(markdown) {
        Ok(bytes) => (ExportLayout::Structured, bytes),
        Err(err) => {
            warn!(error = %err, "structured export failed, exporting plain text");
            (ExportLayout::Plain, exporter.export_plain(markdown)?)
        }
    };

    let file_name = layout.file_name(&config.base_name);
    info!(file_name = %file_name, bytes = bytes.len(), "document exported");
    Ok(ExportedDocument { file_name, content_type: PDF_CONTENT_TYPE, layout, bytes })
}
